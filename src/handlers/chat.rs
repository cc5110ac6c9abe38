use std::sync::Arc;

use axum::extract::{Path, State};
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::models::{Conversation, ConversationMessage};
use crate::services::conversation::{self, ChatReply};
use crate::state::AppState;

const MAX_SESSION_ID_LEN: usize = 64;

// POST /api/chat
#[derive(Deserialize)]
pub struct ChatRequest {
    pub session_id: Option<String>,
    pub message: String,
}

pub async fn send_message(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<ChatRequest>,
) -> Result<Json<ChatReply>, AppError> {
    let session_id = match payload.session_id.as_deref().map(str::trim) {
        Some(id) if id.len() > MAX_SESSION_ID_LEN => {
            return Err(AppError::BadRequest(format!(
                "session_id longer than {MAX_SESSION_ID_LEN} bytes"
            )));
        }
        Some(id) if !id.is_empty() => id.to_string(),
        _ => uuid::Uuid::new_v4().to_string(),
    };

    let reply = conversation::process_message(&state, &session_id, payload.message.trim())
        .map_err(|e| AppError::Internal(e.to_string()))?;
    Ok(Json(reply))
}

#[derive(Serialize)]
pub struct HistoryResponse {
    pub session_id: String,
    pub started_at: String,
    pub messages: Vec<ConversationMessage>,
}

impl From<Conversation> for HistoryResponse {
    fn from(conv: Conversation) -> Self {
        Self {
            session_id: conv.session_id,
            started_at: conv.started_at.format("%Y-%m-%d %H:%M:%S").to_string(),
            messages: conv.messages,
        }
    }
}

// GET /api/chat/:session_id/history
pub async fn history(
    State(state): State<Arc<AppState>>,
    Path(session_id): Path<String>,
) -> Result<Json<HistoryResponse>, AppError> {
    let conv = {
        let conversations = state
            .conversations
            .lock()
            .map_err(|_| AppError::Internal("conversation store lock poisoned".to_string()))?;
        conversations
            .get(&session_id)
            .cloned()
            .ok_or_else(|| AppError::NotFound(format!("session {session_id}")))?
    };

    Ok(Json(conv.into()))
}

// POST /api/chat/:session_id/reset
pub async fn reset(
    State(state): State<Arc<AppState>>,
    Path(session_id): Path<String>,
) -> Result<Json<HistoryResponse>, AppError> {
    let conv = conversation::reset_conversation(&state, &session_id)
        .map_err(|e| AppError::Internal(e.to_string()))?;
    Ok(Json(conv.into()))
}
