use axum::extract::State;
use axum::http::{header, HeaderMap, HeaderValue};

use abi::errors::Error;
use oss::Oss;

use crate::api_utils::custom_extract::PathExtractor;
use crate::AppState;

/// avatar bytes by object key, for the in-memory blob store
pub async fn get_avatar(
    State(state): State<AppState>,
    PathExtractor(key): PathExtractor<String>,
) -> Result<(HeaderMap, Vec<u8>), Error> {
    let bytes = state.chat.oss.download_avatar(&key).await?;
    let mut headers = HeaderMap::new();
    headers.insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static(image_type(&key)),
    );
    headers.insert(
        header::CACHE_CONTROL,
        HeaderValue::from_static("private, max-age=31536000"),
    );
    Ok((headers, bytes.to_vec()))
}

// keys keep the uploaded file's extension
fn image_type(key: &str) -> &'static str {
    let ext = key
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .unwrap_or_default();
    match ext.as_str() {
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "webp" => "image/webp",
        _ => "application/octet-stream",
    }
}
