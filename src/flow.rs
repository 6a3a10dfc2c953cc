//! The home-page view flow, modeled as a pure state machine plus a tokio
//! driver with cancelable timers.
//!
//! States loop `Initial -> Animating -> Showing -> Selected -> Initial`. The
//! pure [`HomeFlow`] core decides transitions and asks for effects via
//! [`Command`]; [`FlowDriver`] interprets those commands with real timers and
//! an [`IdeasApi`] backend. Timers are aborted when the driver is dropped so
//! no callback fires after teardown.

use std::time::Duration;

use tokio::{
    sync::mpsc::{self, UnboundedReceiver, UnboundedSender},
    task::JoinHandle,
};

use crate::types::Idea;

/// How long the decorative pick animation runs.
pub const ANIMATION_DURATION: Duration = Duration::from_millis(3500);
/// How long the confirmation view stays up before returning to the start.
pub const CONFIRMATION_DELAY: Duration = Duration::from_secs(3);

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum View {
    #[default]
    Initial,
    Animating,
    Showing,
    Selected,
}

/// Effects requested by the pure machine.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    StartAnimationTimer,
    FetchPicks,
    MarkCompleted(String),
    StartReturnTimer,
    CancelTimer,
}

/// Pure view-state core. The error message is a side channel, not a state:
/// it can be set in `Initial` (failed pick) or `Showing` (failed select).
#[derive(Debug, Default)]
pub struct HomeFlow {
    view: View,
    ideas: Vec<Idea>,
    error: Option<String>,
}

impl HomeFlow {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn view(&self) -> View {
        self.view
    }

    pub fn ideas(&self) -> &[Idea] {
        &self.ideas
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// User hit the pick button.
    pub fn request_pick(&mut self) -> Option<Command> {
        if self.view != View::Initial {
            return None;
        }
        self.error = None;
        self.view = View::Animating;
        Some(Command::StartAnimationTimer)
    }

    /// The animation timer fired.
    pub fn animation_finished(&mut self) -> Option<Command> {
        (self.view == View::Animating).then_some(Command::FetchPicks)
    }

    pub fn picks_loaded(&mut self, ideas: Vec<Idea>) {
        if self.view != View::Animating {
            return;
        }
        self.ideas = ideas;
        self.view = View::Showing;
    }

    /// Pick call failed: fall back to the start with a message.
    pub fn pick_failed(&mut self, message: String) {
        self.error = Some(message);
        self.ideas.clear();
        self.view = View::Initial;
    }

    /// User chose one of the shown cards.
    pub fn choose(&mut self, id: &str) -> Option<Command> {
        if self.view != View::Showing {
            return None;
        }
        self.ideas
            .iter()
            .any(|i| i.id == id)
            .then(|| Command::MarkCompleted(id.to_string()))
    }

    pub fn selection_confirmed(&mut self) -> Option<Command> {
        if self.view != View::Showing {
            return None;
        }
        self.view = View::Selected;
        Some(Command::StartReturnTimer)
    }

    /// Select call failed: surface the error but do not advance.
    pub fn selection_failed(&mut self, message: String) {
        self.error = Some(message);
    }

    /// The auto-return timer fired.
    pub fn return_elapsed(&mut self) {
        if self.view != View::Selected {
            return;
        }
        self.ideas.clear();
        self.view = View::Initial;
    }

    /// Manual reset from the error box.
    pub fn try_again(&mut self) -> Command {
        self.view = View::Initial;
        self.ideas.clear();
        self.error = None;
        Command::CancelTimer
    }
}

/// Backend seam for the flow driver. [`crate::client::ApiClient`] implements
/// it for a live server; tests use an in-process fake. Errors are the
/// human-readable messages the view surfaces.
pub trait IdeasApi: Send + Sync {
    fn pick_three(&self) -> impl Future<Output = Result<Vec<Idea>, String>> + Send;
    fn select(&self, id: &str) -> impl Future<Output = Result<Idea, String>> + Send;
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TimerEvent {
    AnimationDone,
    ReturnToInitial,
}

/// Drives a [`HomeFlow`] with real timers and API calls.
pub struct FlowDriver<A> {
    flow: HomeFlow,
    api: A,
    timer: Option<JoinHandle<()>>,
    events_tx: UnboundedSender<TimerEvent>,
    events_rx: UnboundedReceiver<TimerEvent>,
}

impl<A: IdeasApi> FlowDriver<A> {
    pub fn new(api: A) -> Self {
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        Self {
            flow: HomeFlow::new(),
            api,
            timer: None,
            events_tx,
            events_rx,
        }
    }

    pub fn flow(&self) -> &HomeFlow {
        &self.flow
    }

    /// User input: start a pick. Schedules the animation timer.
    pub fn pick(&mut self) {
        if let Some(Command::StartAnimationTimer) = self.flow.request_pick() {
            self.schedule(ANIMATION_DURATION, TimerEvent::AnimationDone);
        }
    }

    /// User input: choose a shown card. Calls select and, on success, moves
    /// to the confirmation view and schedules the auto-return.
    pub async fn choose(&mut self, id: &str) {
        let Some(Command::MarkCompleted(id)) = self.flow.choose(id) else {
            return;
        };
        match self.api.select(&id).await {
            Ok(_) => {
                if let Some(Command::StartReturnTimer) = self.flow.selection_confirmed() {
                    self.schedule(CONFIRMATION_DELAY, TimerEvent::ReturnToInitial);
                }
            }
            Err(message) => self.flow.selection_failed(message),
        }
    }

    /// User input: manual reset from the error box.
    pub fn try_again(&mut self) {
        if self.flow.try_again() == Command::CancelTimer {
            self.cancel_timer();
        }
    }

    /// Wait for the next scheduled timer to fire and apply it. Returns the
    /// event that was handled.
    pub async fn tick(&mut self) -> Option<TimerEvent> {
        let event = self.events_rx.recv().await?;
        match event {
            TimerEvent::AnimationDone => {
                if self.flow.animation_finished() == Some(Command::FetchPicks) {
                    match self.api.pick_three().await {
                        Ok(ideas) => self.flow.picks_loaded(ideas),
                        Err(message) => self.flow.pick_failed(message),
                    }
                }
            }
            TimerEvent::ReturnToInitial => self.flow.return_elapsed(),
        }
        Some(event)
    }

    fn schedule(&mut self, delay: Duration, event: TimerEvent) {
        self.cancel_timer();
        let tx = self.events_tx.clone();
        self.timer = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let _ = tx.send(event);
        }));
    }

    fn cancel_timer(&mut self) {
        if let Some(timer) = self.timer.take() {
            timer.abort();
        }
    }
}

impl<A> Drop for FlowDriver<A> {
    // No timer callback may fire after the view is torn down.
    fn drop(&mut self) {
        if let Some(timer) = self.timer.take() {
            timer.abort();
        }
    }
}
