use abi::errors::Error;
use axum::{
    async_trait,
    extract::{rejection::JsonRejection, FromRequest, MatchedPath, Request},
    http::StatusCode,
    RequestExt,
};
use serde::de::DeserializeOwned;
use tracing::debug;

/// `axum::Json` with our error body, naming the route that refused the payload
pub struct JsonExtractor<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for JsonExtractor<T>
where
    T: DeserializeOwned + Send,
    S: Send + Sync,
{
    type Rejection = (StatusCode, Error);

    async fn from_request(mut req: Request, state: &S) -> Result<Self, Self::Rejection> {
        // the body is consumed below, read the route first
        let path = req
            .extract_parts::<MatchedPath>()
            .await
            .map(|path| path.as_str().to_owned())
            .unwrap_or_default();

        let rejection = match axum::Json::<T>::from_request(req, state).await {
            Ok(value) => return Ok(Self(value.0)),
            Err(rejection) => rejection,
        };
        debug!("json body rejected on {}: {}", path, rejection);
        let status = match &rejection {
            JsonRejection::JsonDataError(_) => StatusCode::UNPROCESSABLE_ENTITY,
            JsonRejection::JsonSyntaxError(_) | JsonRejection::BytesRejection(_) => {
                StatusCode::BAD_REQUEST
            }
            JsonRejection::MissingJsonContentType(_) => StatusCode::UNSUPPORTED_MEDIA_TYPE,
            _ => rejection.status(),
        };
        Err((
            status,
            Error::body_parsing(format!("{path}: {}", rejection.body_text())),
        ))
    }
}
