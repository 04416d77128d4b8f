use axum::extract::{FromRef, FromRequestParts, MatchedPath};
use axum::http::request::Parts;
use axum::{async_trait, RequestPartsExt};
use jsonwebtoken::{decode, DecodingKey, Validation};
use tracing::debug;

use abi::errors::Error;
use abi::model::Session;

use crate::handlers::users::{Claims, TokenKind};
use crate::AppState;

const AUTHORIZATION_HEADER: &str = "Authorization";
const BEARER: &str = "Bearer";

/// the caller behind a valid `Authorization: Bearer <jwt>` header
pub struct AuthSession(pub Session);

/// signature and expiry checked, then the kind has to match
pub fn decode_claims(token: &str, jwt_secret: &str, kind: TokenKind) -> Result<Claims, Error> {
    let data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(jwt_secret.as_bytes()),
        &Validation::default(),
    )
    .map_err(|err| Error::unauthorized(err, "invalid token"))?;
    if data.claims.typ != kind {
        return Err(Error::unauthorized_with_details(format!(
            "expected {kind:?} token"
        )));
    }
    Ok(data.claims)
}

/// decodes an access token and turns its subject into a session
pub fn verify_token(token: &str, jwt_secret: &str) -> Result<Session, Error> {
    let claims = decode_claims(token, jwt_secret, TokenKind::Access)?;
    Ok(Session::new(claims.sub, token))
}

#[async_trait]
impl<S> FromRequestParts<S> for AuthSession
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = Error;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let path = parts
            .extract::<MatchedPath>()
            .await
            .map(|path| path.as_str().to_owned())
            .unwrap_or_default();
        let app_state = AppState::from_ref(state);

        let header = parts
            .headers
            .get(AUTHORIZATION_HEADER)
            .and_then(|header| header.to_str().ok())
            .ok_or_else(|| {
                Error::unauthorized_with_details(format!("UnAuthorized Request: {path}"))
            })?;

        let mut header = header.split_whitespace();
        let token = match (header.next(), header.next()) {
            (Some(BEARER), Some(token)) => token,
            _ => {
                debug!("malformed authorization header on {}", path);
                return Err(Error::unauthorized_with_details(format!(
                    "UnAuthorized Request: {path}"
                )));
            }
        };

        let session = verify_token(token, &app_state.jwt_secret)?;
        Ok(Self(session))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use abi::errors::ErrorKind;

    #[test]
    fn token_kinds_should_not_mix() {
        let access = Claims::new("u1".to_string(), TokenKind::Access)
            .encode("secret")
            .unwrap();
        let refresh = Claims::new("u1".to_string(), TokenKind::Refresh)
            .encode("secret")
            .unwrap();

        assert_eq!(verify_token(&access, "secret").unwrap().user_id, "u1");
        let err = verify_token(&refresh, "secret").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnAuthorized);

        let claims = decode_claims(&refresh, "secret", TokenKind::Refresh).unwrap();
        assert!(claims.exp > Claims::new("u1".to_string(), TokenKind::Access).exp);
        assert!(decode_claims(&access, "secret", TokenKind::Refresh).is_err());
        assert!(verify_token(&access, "other-secret").is_err());
    }
}
