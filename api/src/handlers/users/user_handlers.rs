use axum::extract::{Multipart, State};
use axum::Json;
use tracing::debug;

use abi::errors::Error;
use abi::model::User;
use chat::{AvatarUpload, Landing, SignupForm};

use crate::api_utils::custom_extract::{decode_claims, AuthSession, JsonExtractor, PathExtractor};
use crate::handlers::users::{gen_token, Claims, LoginRequest, ProfileUpdate, Token, TokenKind};
use crate::AppState;

/// register from a multipart form: `name`, `email`, `password` and an optional `avatar` file
pub async fn create_user(
    State(app_state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<User>, Error> {
    let mut form = SignupForm::default();
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| Error::body_parsing(e.to_string()))?
    {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "avatar" => {
                let filename = field.file_name().unwrap_or("avatar").to_string();
                let content = field
                    .bytes()
                    .await
                    .map_err(|e| Error::body_parsing(e.to_string()))?;
                // browsers send an empty part when no file was picked
                if !content.is_empty() {
                    form.avatar = Some(AvatarUpload {
                        filename,
                        content: content.to_vec(),
                    });
                }
            }
            "name" | "email" | "password" => {
                let value = field
                    .text()
                    .await
                    .map_err(|e| Error::body_parsing(e.to_string()))?;
                match name.as_str() {
                    "name" => form.name = value,
                    "email" => form.email = value,
                    _ => form.password = value,
                }
            }
            _ => debug!("ignoring signup field {}", name),
        }
    }

    let user = app_state.chat.signup.signup(form).await?;
    Ok(Json(user))
}

pub async fn login(
    State(app_state): State<AppState>,
    JsonExtractor(login): JsonExtractor<LoginRequest>,
) -> Result<Json<Token>, Error> {
    let user = app_state
        .chat
        .signup
        .login(&login.email, &login.password)
        .await?;
    app_state.chat.gate.enter(&user.id).await?;
    Ok(Json(gen_token(&app_state.jwt_secret, user)?))
}

pub async fn logout(
    State(app_state): State<AppState>,
    AuthSession(session): AuthSession,
) -> Result<(), Error> {
    app_state.chat.gate.leave(&session.user_id).await?;
    Ok(())
}

/// a fresh access token, or a refresh token when `is_refresh` is set
pub async fn refresh_token(
    State(app_state): State<AppState>,
    PathExtractor((token, is_refresh)): PathExtractor<(String, bool)>,
) -> Result<String, Error> {
    let claims = decode_claims(&token, &app_state.jwt_secret, TokenKind::Refresh)
        .inspect_err(|_| debug!("refresh token rejected"))?;
    let kind = if is_refresh {
        TokenKind::Refresh
    } else {
        TokenKind::Access
    };
    Claims::new(claims.sub, kind).encode(&app_state.jwt_secret)
}

/// where a visitor claiming `user_id` lands
pub async fn gate(
    State(app_state): State<AppState>,
    PathExtractor(user_id): PathExtractor<String>,
) -> Result<Json<Landing>, Error> {
    let landing = app_state.chat.gate.resolve(Some(&user_id)).await?;
    Ok(Json(landing))
}

pub async fn get_user_by_id(
    State(app_state): State<AppState>,
    PathExtractor(id): PathExtractor<String>,
) -> Result<Json<User>, Error> {
    let user = app_state.chat.directory.get_user(&id).await?;
    Ok(Json(user))
}

pub async fn update_user(
    State(app_state): State<AppState>,
    AuthSession(session): AuthSession,
    JsonExtractor(update): JsonExtractor<ProfileUpdate>,
) -> Result<Json<User>, Error> {
    let user = app_state
        .chat
        .directory
        .update_profile(&session, update.name, update.avatar)
        .await?;
    Ok(Json(user))
}

pub async fn directory(
    State(app_state): State<AppState>,
    AuthSession(session): AuthSession,
) -> Result<Json<Vec<User>>, Error> {
    let users = app_state.chat.directory.list_users(&session).await?;
    Ok(Json(users))
}

pub async fn search_user(
    State(app_state): State<AppState>,
    AuthSession(session): AuthSession,
    PathExtractor(keyword): PathExtractor<String>,
) -> Result<Json<Vec<User>>, Error> {
    let users = app_state.chat.directory.search(&session, &keyword).await?;
    Ok(Json(users))
}
