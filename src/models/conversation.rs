use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ConversationMessage {
    pub role: String,
    pub content: String,
}

impl ConversationMessage {
    pub fn user(content: &str) -> Self {
        Self {
            role: "user".to_string(),
            content: content.to_string(),
        }
    }

    pub fn assistant(content: &str) -> Self {
        Self {
            role: "assistant".to_string(),
            content: content.to_string(),
        }
    }
}

/// Chat history of one session. The first message is always the welcome text.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Conversation {
    pub session_id: String,
    pub messages: Vec<ConversationMessage>,
    pub started_at: NaiveDateTime,
    pub last_active: NaiveDateTime,
}

impl Conversation {
    pub const MAX_MESSAGES: usize = 100;

    pub fn new(session_id: &str, welcome: &str, started_at: NaiveDateTime) -> Self {
        Self {
            session_id: session_id.to_string(),
            messages: vec![ConversationMessage::assistant(welcome)],
            started_at,
            last_active: started_at,
        }
    }

    pub fn record_exchange(&mut self, user: &str, assistant: &str, at: NaiveDateTime) {
        self.messages.push(ConversationMessage::user(user));
        self.messages.push(ConversationMessage::assistant(assistant));
        self.last_active = at;

        if self.messages.len() > Self::MAX_MESSAGES {
            let excess = (self.messages.len() - Self::MAX_MESSAGES).next_multiple_of(2);
            self.messages.drain(1..=excess);
        }
    }

    pub fn reset(&mut self) {
        self.messages.truncate(1);
    }
}
