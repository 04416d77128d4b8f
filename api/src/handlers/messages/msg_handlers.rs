use axum::extract::State;
use axum::Json;

use abi::errors::Error;
use abi::model::{Message, SendMsgRequest};

use crate::api_utils::custom_extract::{AuthSession, JsonExtractor, PathExtractor};
use crate::AppState;

/// `null` when the content was blank and nothing got stored
pub async fn send_msg(
    State(state): State<AppState>,
    AuthSession(session): AuthSession,
    JsonExtractor(req): JsonExtractor<SendMsgRequest>,
) -> Result<Json<Option<Message>>, Error> {
    let msg = state
        .chat
        .conversation
        .send(&session, &req.recipient_id, &req.content)
        .await?;
    Ok(Json(msg))
}

pub async fn get_history(
    State(state): State<AppState>,
    AuthSession(session): AuthSession,
    PathExtractor(friend_id): PathExtractor<String>,
) -> Result<Json<Vec<Message>>, Error> {
    let messages = state.chat.conversation.history(&session, &friend_id).await?;
    Ok(Json(messages))
}
