use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single date-activity record. Wire format uses camelCase field names.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Idea {
    pub id: String,
    pub idea: String,
    #[serde(rename = "lastShown")]
    pub last_shown: Option<DateTime<Utc>>,
    #[serde(rename = "lastCompleted")]
    pub last_completed: Option<DateTime<Utc>>,
}

impl Idea {
    pub fn new(id: String, text: String) -> Self {
        Self {
            id,
            idea: text,
            last_shown: None,
            last_completed: None,
        }
    }

    /// Eligible for the pick pool: not yet marked completed.
    pub fn is_eligible(&self) -> bool {
        self.last_completed.is_none()
    }
}

/// The persisted document: the sole source of truth on disk.
#[derive(Clone, Debug, Serialize, Deserialize, Default, PartialEq)]
pub struct IdeaData {
    pub ideas: Vec<Idea>,
}

impl IdeaData {
    pub fn find(&self, id: &str) -> Option<&Idea> {
        self.ideas.iter().find(|i| i.id == id)
    }

    pub fn find_mut(&mut self, id: &str) -> Option<&mut Idea> {
        self.ideas.iter_mut().find(|i| i.id == id)
    }

    /// Next id is max(numeric ids) + 1, rendered as a string. Non-numeric
    /// ids are ignored; an empty collection starts at "1".
    pub fn next_id(&self) -> String {
        let max = self
            .ideas
            .iter()
            .filter_map(|i| i.id.parse::<u64>().ok())
            .max()
            .unwrap_or(0);
        (max + 1).to_string()
    }
}

/// Response body of the pick-three endpoint.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PickedIdeas {
    pub ideas: Vec<Idea>,
}
