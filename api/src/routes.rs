use axum::extract::DefaultBodyLimit;
use axum::routing::{delete, get, post, put};
use axum::Router;

use crate::handlers::files::file::get_avatar;
use crate::handlers::friends::friend_handlers::{
    agree, create_friend_request, decline, delete_friend, get_apply_list, get_friends,
    get_sent_list,
};
use crate::handlers::messages::msg_handlers::{get_history, send_msg};
use crate::handlers::messages::ws::conversation_handler;
use crate::handlers::users::{
    create_user, directory, gate, get_user_by_id, login, logout, refresh_token, search_user,
    update_user,
};
use crate::AppState;

pub(crate) fn app_routes(state: AppState) -> Router {
    Router::new()
        .nest("/user", user_routes(state.clone()))
        .nest("/friend", friend_routes(state.clone()))
        .nest("/file", file_routes(state.clone()))
        .nest("/message", msg_routes(state))
}

const MAX_AVATAR_UPLOAD_SIZE: usize = 1024 * 1024 * 10;

fn user_routes(state: AppState) -> Router {
    Router::new()
        .route(
            "/",
            post(create_user).layer(DefaultBodyLimit::max(MAX_AVATAR_UPLOAD_SIZE)),
        )
        .route("/", put(update_user))
        .route("/login", post(login))
        .route("/logout", delete(logout))
        .route("/gate/:user_id", get(gate))
        .route("/directory", get(directory))
        .route("/search/:keyword", get(search_user))
        .route("/refresh_token/:token/:is_refresh", get(refresh_token))
        .route("/:id", get(get_user_by_id))
        .with_state(state)
}

fn friend_routes(state: AppState) -> Router {
    Router::new()
        .route("/", post(create_friend_request))
        .route("/", get(get_friends))
        .route("/apply", get(get_apply_list))
        .route("/sent", get(get_sent_list))
        .route("/accept/:id", put(agree))
        .route("/decline/:id", put(decline))
        .route("/:friend_id", delete(delete_friend))
        .with_state(state)
}

fn file_routes(state: AppState) -> Router {
    Router::new()
        .route("/avatar/*key", get(get_avatar))
        .with_state(state)
}

fn msg_routes(state: AppState) -> Router {
    Router::new()
        .route("/", post(send_msg))
        .route("/:friend_id", get(get_history))
        .route("/ws/:friend_id/:token", get(conversation_handler))
        .with_state(state)
}
