use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Speaker {
    Human,
    Agent,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeliveryState {
    Sent,
    Delivered,
    Read,
}

/// One chat bubble in a conversation timeline.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Message {
    pub id: String,
    pub speaker: Speaker,
    pub text: String,
    pub created_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delivery: Option<DeliveryState>,
}

impl Message {
    pub fn human(id: impl Into<String>, text: impl Into<String>) -> Self {
        Self::new(id.into(), Speaker::Human, text.into())
    }

    pub fn agent(id: impl Into<String>, text: impl Into<String>) -> Self {
        Self::new(id.into(), Speaker::Agent, text.into())
    }

    fn new(id: String, speaker: Speaker, text: String) -> Self {
        Self {
            id,
            speaker,
            text,
            created_at: Utc::now(),
            delivery: None,
        }
    }

    pub fn with_delivery(mut self, delivery: DeliveryState) -> Self {
        self.delivery = Some(delivery);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TimelineError {
    #[error("message id '{0}' already exists in this timeline")]
    DuplicateId(String),
}

/// Append-only, ordered message log scoped to a single screen instance.
#[derive(Debug, Default, Clone)]
pub struct Timeline {
    messages: Vec<Message>,
    ids: HashSet<String>,
    typing: bool,
    sequence: u64,
}

impl Timeline {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&mut self, message: Message) -> Result<(), TimelineError> {
        if !self.ids.insert(message.id.clone()) {
            return Err(TimelineError::DuplicateId(message.id));
        }
        self.messages.push(message);
        Ok(())
    }

    /// Generates an id such as `user-3`, unique within this timeline.
    pub fn next_id(&mut self, prefix: &str) -> String {
        loop {
            self.sequence += 1;
            let candidate = format!("{prefix}-{}", self.sequence);
            if !self.ids.contains(&candidate) {
                return candidate;
            }
        }
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn last(&self) -> Option<&Message> {
        self.messages.last()
    }

    pub fn contains_id(&self, id: &str) -> bool {
        self.ids.contains(id)
    }

    pub fn is_typing(&self) -> bool {
        self.typing
    }

    pub(crate) fn set_typing(&mut self, typing: bool) {
        self.typing = typing;
    }
}
