use std::sync::Arc;
use std::time::Duration;

use axum::extract::ws::{Message, WebSocket};
use axum::extract::{State, WebSocketUpgrade};
use axum::response::{IntoResponse, Response};
use futures::{SinkExt, StreamExt};
use tokio::sync::RwLock;
use tracing::{debug, error, info, warn};

use abi::model::Session;

use crate::api_utils::custom_extract::{verify_token, PathExtractor};
use crate::AppState;

pub const HEART_BEAT_INTERVAL: u64 = 30;

/// the browser websocket api cannot set headers, so the token rides in the path
pub async fn conversation_handler(
    State(state): State<AppState>,
    PathExtractor((friend_id, token)): PathExtractor<(String, String)>,
    ws: WebSocketUpgrade,
) -> Response {
    let session = match verify_token(&token, &state.jwt_secret) {
        Ok(session) => session,
        Err(err) => {
            error!("token verification failed: {}", err);
            return err.into_response();
        }
    };
    ws.on_upgrade(move |socket| websocket(session, friend_id, socket, state))
}

async fn websocket(session: Session, friend_id: String, ws: WebSocket, state: AppState) {
    info!(
        "conversation {} <-> {} connected",
        session.user_id, friend_id
    );
    let (ws_tx, mut ws_rx) = ws.split();
    let shared_tx = Arc::new(RwLock::new(ws_tx));

    // push conversation events as json text frames
    let mut events = state.chat.conversation.subscribe(&session, &friend_id);
    let cloned_tx = shared_tx.clone();
    let mut push_task = tokio::spawn(async move {
        while let Some(event) = events.next().await {
            let event = match event {
                Ok(event) => event,
                Err(e) => {
                    error!("conversation stream failed: {}", e);
                    break;
                }
            };
            let text = match serde_json::to_string(&event) {
                Ok(text) => text,
                Err(e) => {
                    error!("serialize event error: {:?}", e);
                    continue;
                }
            };
            if let Err(e) = cloned_tx.write().await.send(Message::Text(text)).await {
                debug!("push event error: {:?}", e);
                break;
            }
        }
    });

    let cloned_tx = shared_tx.clone();
    let mut ping_task = tokio::spawn(async move {
        loop {
            if let Err(e) = cloned_tx
                .write()
                .await
                .send(Message::Ping(Vec::new()))
                .await
            {
                error!("send ping error: {:?}", e);
                break;
            }
            tokio::time::sleep(Duration::from_secs(HEART_BEAT_INTERVAL)).await;
        }
    });

    // text frames from the client are messages to the friend
    let conversation = state.chat.conversation.clone();
    let mut rec_task = tokio::spawn(async move {
        while let Some(Ok(msg)) = ws_rx.next().await {
            match msg {
                Message::Text(text) => {
                    if let Err(e) = conversation.send(&session, &friend_id, &text).await {
                        error!("send message error: {}", e);
                    }
                }
                Message::Ping(_) => {
                    if let Err(e) = shared_tx
                        .write()
                        .await
                        .send(Message::Pong(Vec::new()))
                        .await
                    {
                        error!("reply ping error: {:?}", e);
                        break;
                    }
                }
                Message::Pong(_) => {}
                Message::Close(info) => {
                    if let Some(info) = info {
                        warn!("client closed {}", info.reason);
                    }
                    break;
                }
                Message::Binary(_) => {
                    warn!("binary frame ignored");
                }
            }
        }
    });

    tokio::select! {
        _ = (&mut push_task) => {
            ping_task.abort();
            rec_task.abort();
        }
        _ = (&mut ping_task) => {
            push_task.abort();
            rec_task.abort();
        }
        _ = (&mut rec_task) => {
            push_task.abort();
            ping_task.abort();
        }
    }
    debug!("conversation socket closed");
}
