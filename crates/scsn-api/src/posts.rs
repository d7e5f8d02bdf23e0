use axum::{
    Json,
    extract::{Query, State},
    response::{IntoResponse, Response},
};
use bytes::Bytes;
use tracing::{debug, error};

use scsn_types::api::{CreatePostRequest, HealthResponse, PostResponse};

use crate::error::ApiError;
use crate::feed::FeedError;
use crate::state::{AppState, AppStateInner};

pub const LIST_SELECTOR: &str = "posts-list";
pub const CREATE_SELECTOR: &str = "posts-create";

/// `/?api=<selector>`: the query-selected JSON API. Accepts any method.
///
/// When `api` is repeated the last value wins.
pub async fn dispatch(
    State(state): State<AppState>,
    Query(params): Query<Vec<(String, String)>>,
    body: Bytes,
) -> Result<Response, ApiError> {
    match selector(&params) {
        Some(LIST_SELECTOR) => Ok(list_posts(State(state)).await?.into_response()),
        Some(CREATE_SELECTOR) => Ok(create_post(State(state), body).await?.into_response()),
        other => {
            debug!("Unknown API selector {:?}", other);
            Err(ApiError::UnknownEndpoint)
        }
    }
}

/// GET /posts: the feed, oldest first, capped.
pub async fn list_posts(State(state): State<AppState>) -> Result<Json<Vec<PostResponse>>, ApiError> {
    let posts = run_blocking(state, |s| s.feed.list_posts()).await?;
    Ok(Json(posts))
}

/// POST /posts with body `{"body": "...", "kind": "normal|help|911|emergency_address"}`.
///
/// Takes raw bytes: anything that is not a JSON object must answer with the
/// API's `Invalid JSON` error, not axum's `Json` rejection.
pub async fn create_post(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<PostResponse>, ApiError> {
    let req = parse_create_request(&body)?;

    let post = run_blocking(state, move |s| {
        s.feed
            .create_post(req.body.as_deref().unwrap_or_default(), req.kind.as_deref())
    })
    .await?;

    Ok(Json(post))
}

/// GET /health
pub async fn health(State(state): State<AppState>) -> Result<Json<HealthResponse>, ApiError> {
    let (users, posts) = run_blocking(state, |s| s.feed.counts()).await?;
    Ok(Json(HealthResponse {
        status: "ok".into(),
        users,
        posts,
    }))
}

pub async fn not_found() -> ApiError {
    ApiError::UnknownEndpoint
}

fn selector(params: &[(String, String)]) -> Option<&str> {
    params
        .iter()
        .rev()
        .find(|(key, _)| key == "api")
        .map(|(_, value)| value.as_str())
}

fn parse_create_request(body: &[u8]) -> Result<CreatePostRequest, ApiError> {
    let value: serde_json::Value =
        serde_json::from_slice(body).map_err(|_| ApiError::InvalidJson)?;
    if !value.is_object() {
        return Err(ApiError::InvalidJson);
    }
    serde_json::from_value(value).map_err(|_| ApiError::InvalidJson)
}

// Run blocking DB work off the async runtime
async fn run_blocking<T, F>(state: AppState, f: F) -> Result<T, ApiError>
where
    F: FnOnce(&AppStateInner) -> Result<T, FeedError> + Send + 'static,
    T: Send + 'static,
{
    let result = tokio::task::spawn_blocking(move || f(&state))
        .await
        .map_err(|e| {
            error!("spawn_blocking join error: {}", e);
            ApiError::Join(e)
        })?;

    Ok(result?)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
        pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
    }

    #[test]
    fn last_api_value_selects() {
        assert_eq!(selector(&params(&[("api", "posts-list")])), Some("posts-list"));
        assert_eq!(
            selector(&params(&[("api", "posts-delete"), ("x", "1"), ("api", "posts-create")])),
            Some("posts-create")
        );
        assert_eq!(selector(&params(&[("other", "posts-list")])), None);
        assert_eq!(selector(&[]), None);
    }

    #[test]
    fn create_request_accepts_partial_objects() {
        let req = parse_create_request(br#"{"body":"hi"}"#).unwrap();
        assert_eq!(req.body.as_deref(), Some("hi"));
        assert!(req.kind.is_none());

        let req = parse_create_request(br#"{"kind":"help","extra":1}"#).unwrap();
        assert!(req.body.is_none());
        assert_eq!(req.kind.as_deref(), Some("help"));

        let req = parse_create_request(br#"{"body":null}"#).unwrap();
        assert!(req.body.is_none());
    }

    #[test]
    fn create_request_rejects_non_objects() {
        let inputs: [&[u8]; 6] = [b"", b"not json", b"[]", b"\"text\"", b"42", b"null"];
        for raw in inputs {
            assert!(matches!(parse_create_request(raw), Err(ApiError::InvalidJson)));
        }
    }

    #[test]
    fn create_request_rejects_mistyped_fields() {
        assert!(matches!(
            parse_create_request(br#"{"body":123}"#),
            Err(ApiError::InvalidJson)
        ));
        assert!(matches!(
            parse_create_request(br#"{"body":"x","kind":["help"]}"#),
            Err(ApiError::InvalidJson)
        ));
    }
}
