use std::collections::HashMap;

use chrono::{Duration, Local, NaiveDateTime};
use serde::Serialize;

use crate::models::{Conversation, Intent};
use crate::services::classifier::IntentClassifier;
use crate::services::responder::ResponseGenerator;
use crate::services::templates;
use crate::state::AppState;

const SESSION_IDLE_HOURS: i64 = 12;
const MAX_SESSIONS: usize = 10_000;

#[derive(Debug, Clone, Serialize)]
pub struct ChatReply {
    pub session_id: String,
    pub intent: Intent,
    pub reply: String,
}

pub fn process_message(
    state: &AppState,
    session_id: &str,
    message: &str,
) -> anyhow::Result<ChatReply> {
    process_message_at(state, session_id, message, Local::now().naive_local())
}

pub fn process_message_at(
    state: &AppState,
    session_id: &str,
    message: &str,
    now: NaiveDateTime,
) -> anyhow::Result<ChatReply> {
    let classifier = match state.store.list_services() {
        Ok(services) => IntentClassifier::from_services(&services),
        Err(e) => {
            tracing::warn!(error = %e, "service catalog unavailable, using built-in names");
            IntentClassifier::with_fallback_catalog()
        }
    };

    let intent = classifier.classify(message);
    let reply = ResponseGenerator::new(state.store.as_ref(), &state.config.clinic, now)
        .respond(message, intent);

    let mut conversations = state
        .conversations
        .lock()
        .map_err(|_| anyhow::anyhow!("conversation store lock poisoned"))?;
    if !conversations.contains_key(session_id) {
        evict_stale(&mut conversations, now, MAX_SESSIONS - 1);
    }
    conversations
        .entry(session_id.to_string())
        .or_insert_with(|| {
            Conversation::new(session_id, &templates::welcome(&state.config.clinic), now)
        })
        .record_exchange(message, &reply, now);

    tracing::info!(session = session_id, intent = intent.as_str(), "processed message");

    Ok(ChatReply {
        session_id: session_id.to_string(),
        intent,
        reply,
    })
}

pub fn reset_conversation(state: &AppState, session_id: &str) -> anyhow::Result<Conversation> {
    let mut conversations = state
        .conversations
        .lock()
        .map_err(|_| anyhow::anyhow!("conversation store lock poisoned"))?;
    let now = Local::now().naive_local();
    if !conversations.contains_key(session_id) {
        evict_stale(&mut conversations, now, MAX_SESSIONS - 1);
    }
    let conv = conversations
        .entry(session_id.to_string())
        .or_insert_with(|| {
            Conversation::new(session_id, &templates::welcome(&state.config.clinic), now)
        });
    conv.reset();
    tracing::info!(session = session_id, "conversation reset");
    Ok(conv.clone())
}

/// Drops sessions idle past the TTL, then the least recently active ones
/// until at most `keep` remain.
fn evict_stale(conversations: &mut HashMap<String, Conversation>, now: NaiveDateTime, keep: usize) {
    let before = conversations.len();
    let cutoff = now - Duration::hours(SESSION_IDLE_HOURS);
    conversations.retain(|_, conv| conv.last_active > cutoff);

    if conversations.len() > keep {
        let mut by_activity: Vec<(NaiveDateTime, String)> = conversations
            .iter()
            .map(|(id, conv)| (conv.last_active, id.clone()))
            .collect();
        by_activity.sort();
        let excess = conversations.len() - keep;
        for (_, id) in by_activity.into_iter().take(excess) {
            conversations.remove(&id);
        }
    }

    let evicted = before - conversations.len();
    if evicted > 0 {
        tracing::info!(evicted, remaining = conversations.len(), "evicted idle conversations");
    }
}
