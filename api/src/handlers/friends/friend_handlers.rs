use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};

use abi::errors::Error;
use abi::model::{FriendRequest, Friendship, User};

use crate::api_utils::custom_extract::{AuthSession, JsonExtractor, PathExtractor};
use crate::AppState;

#[derive(Debug, Deserialize, Serialize)]
pub struct FriendApply {
    pub recipient_id: String,
}

pub async fn get_friends(
    State(app_state): State<AppState>,
    AuthSession(session): AuthSession,
) -> Result<Json<Vec<User>>, Error> {
    let friends = app_state.chat.directory.friends(&session).await?;
    Ok(Json(friends))
}

/// pending requests addressed to the caller
pub async fn get_apply_list(
    State(app_state): State<AppState>,
    AuthSession(session): AuthSession,
) -> Result<Json<Vec<FriendRequest>>, Error> {
    let list = app_state.chat.directory.incoming_requests(&session).await?;
    Ok(Json(list))
}

pub async fn get_sent_list(
    State(app_state): State<AppState>,
    AuthSession(session): AuthSession,
) -> Result<Json<Vec<FriendRequest>>, Error> {
    let list = app_state.chat.directory.outgoing_requests(&session).await?;
    Ok(Json(list))
}

pub async fn create_friend_request(
    State(app_state): State<AppState>,
    AuthSession(session): AuthSession,
    JsonExtractor(apply): JsonExtractor<FriendApply>,
) -> Result<Json<FriendRequest>, Error> {
    tracing::debug!("{:?}", &apply);
    let req = app_state
        .chat
        .directory
        .send_request(&session, &apply.recipient_id)
        .await?;
    Ok(Json(req))
}

pub async fn agree(
    State(app_state): State<AppState>,
    AuthSession(session): AuthSession,
    PathExtractor(id): PathExtractor<String>,
) -> Result<Json<Friendship>, Error> {
    let (_, friendship) = app_state.chat.directory.accept(&session, &id).await?;
    Ok(Json(friendship))
}

pub async fn decline(
    State(app_state): State<AppState>,
    AuthSession(session): AuthSession,
    PathExtractor(id): PathExtractor<String>,
) -> Result<Json<FriendRequest>, Error> {
    let req = app_state.chat.directory.decline(&session, &id).await?;
    Ok(Json(req))
}

pub async fn delete_friend(
    State(app_state): State<AppState>,
    AuthSession(session): AuthSession,
    PathExtractor(friend_id): PathExtractor<String>,
) -> Result<(), Error> {
    app_state
        .chat
        .directory
        .unfriend(&session, &friend_id)
        .await?;
    Ok(())
}
