use axum::Router;
use tracing::info;

use abi::config::Config;
use abi::errors::Error;
use chat::ChatService;

mod api_utils;
pub(crate) mod handlers;
pub(crate) mod routes;

#[derive(Clone, Debug)]
pub struct AppState {
    pub chat: ChatService,
    pub jwt_secret: String,
}

impl AppState {
    pub async fn new(config: &Config) -> Result<Self, Error> {
        let chat = ChatService::new(config).await?;
        Ok(Self::with_chat(chat, config.server.jwt_secret.clone()))
    }

    pub fn with_chat(chat: ChatService, jwt_secret: impl Into<String>) -> Self {
        Self {
            chat,
            jwt_secret: jwt_secret.into(),
        }
    }
}

/// every route, ready to serve
pub fn app(state: AppState) -> Router {
    routes::app_routes(state)
}

pub async fn start(config: Config) -> Result<(), Error> {
    let state = AppState::new(&config).await?;
    let app = app(state);
    let listener = tokio::net::TcpListener::bind(&config.server.server_url()).await?;
    info!("listening on {}", listener.local_addr()?);
    axum::serve(listener, app).await?;
    Ok(())
}
