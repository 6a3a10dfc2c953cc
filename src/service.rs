use chrono::Utc;
use rand::{Rng, SeedableRng, rngs::StdRng};
use tokio::sync::Mutex;

use crate::{
    error::{AppError, ServiceResult},
    storage::IdeaStore,
    types::Idea,
};

/// Business operations over the idea collection.
///
/// Every operation is a load → mutate → save cycle performed under one lock,
/// so concurrent requests cannot lose each other's writes. The RNG lives
/// behind the same lock; tests construct the service with a fixed seed.
pub struct IdeaService<S> {
    inner: Mutex<Inner<S>>,
}

struct Inner<S> {
    store: S,
    rng: StdRng,
}

impl<S: IdeaStore> IdeaService<S> {
    pub fn new(store: S) -> Self {
        Self::with_rng(store, StdRng::from_os_rng())
    }

    pub fn with_rng(store: S, rng: StdRng) -> Self {
        Self {
            inner: Mutex::new(Inner { store, rng }),
        }
    }

    pub async fn list(&self) -> ServiceResult<Vec<Idea>> {
        let mut inner = self.inner.lock().await;
        Ok(inner.store.load().await?.ideas)
    }

    pub async fn create(&self, text: &str) -> ServiceResult<Idea> {
        let text = validated(text)?;
        let mut inner = self.inner.lock().await;
        let mut data = inner.store.load().await?;
        let idea = Idea::new(data.next_id(), text);
        data.ideas.push(idea.clone());
        inner.store.save(&data).await?;
        Ok(idea)
    }

    pub async fn update(&self, id: &str, text: &str) -> ServiceResult<Idea> {
        let text = validated(text)?;
        let mut inner = self.inner.lock().await;
        let mut data = inner.store.load().await?;
        let updated = {
            let idea = data
                .find_mut(id)
                .ok_or_else(|| AppError::IdeaNotFound(id.to_string()))?;
            idea.idea = text;
            idea.clone()
        };
        inner.store.save(&data).await?;
        Ok(updated)
    }

    pub async fn delete(&self, id: &str) -> ServiceResult<()> {
        let mut inner = self.inner.lock().await;
        let mut data = inner.store.load().await?;
        let before = data.ideas.len();
        data.ideas.retain(|i| i.id != id);
        if data.ideas.len() == before {
            return Err(AppError::IdeaNotFound(id.to_string()));
        }
        inner.store.save(&data).await?;
        Ok(())
    }

    /// Mark an idea as the final choice. There is deliberately no check that
    /// the idea was previously shown.
    pub async fn select(&self, id: &str) -> ServiceResult<Idea> {
        let mut inner = self.inner.lock().await;
        let mut data = inner.store.load().await?;
        let selected = {
            let idea = data
                .find_mut(id)
                .ok_or_else(|| AppError::IdeaNotFound(id.to_string()))?;
            idea.last_completed = Some(Utc::now());
            idea.clone()
        };
        inner.store.save(&data).await?;
        Ok(selected)
    }

    /// Clear both tracking timestamps on every idea, keeping the records.
    pub async fn reset(&self) -> ServiceResult<()> {
        let mut inner = self.inner.lock().await;
        let mut data = inner.store.load().await?;
        for idea in &mut data.ideas {
            idea.last_shown = None;
            idea.last_completed = None;
        }
        inner.store.save(&data).await?;
        Ok(())
    }

    /// Pick 3 ideas, balancing novelty and fairness.
    ///
    /// Completed ideas are excluded outright. Among the rest, never-shown
    /// ideas take priority over previously-shown ones (oldest `lastShown`
    /// first), and the final 3 are drawn uniformly at random without
    /// replacement from that priority pool. Each picked idea gets a fresh
    /// `lastShown` stamp before the collection is persisted.
    pub async fn pick_three(&self) -> ServiceResult<Vec<Idea>> {
        let mut inner = self.inner.lock().await;
        let mut data = inner.store.load().await?;

        let mut never_shown = Vec::new();
        let mut shown = Vec::new();
        for idea in data.ideas.iter().filter(|i| i.is_eligible()) {
            if idea.last_shown.is_none() {
                never_shown.push(idea.clone());
            } else {
                shown.push(idea.clone());
            }
        }
        shown.sort_by_key(|i| i.last_shown);

        let mut pool = never_shown;
        pool.extend(shown);

        if pool.len() < 3 {
            return Err(AppError::InsufficientPool);
        }

        let mut selected = Vec::with_capacity(3);
        for _ in 0..3 {
            let index = inner.rng.random_range(0..pool.len());
            selected.push(pool.remove(index));
        }

        let now = Utc::now();
        for picked in &mut selected {
            picked.last_shown = Some(now);
            if let Some(idea) = data.find_mut(&picked.id) {
                idea.last_shown = Some(now);
            }
        }

        inner.store.save(&data).await?;
        Ok(selected)
    }
}

fn validated(text: &str) -> ServiceResult<String> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(AppError::EmptyIdeaText);
    }
    Ok(trimmed.to_string())
}
