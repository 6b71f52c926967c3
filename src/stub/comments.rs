//! Request handlers for the stub comments service
//!
//! Each handler mimics one endpoint of the real discussion backend closely
//! enough for the acceptance tests that talk to it: fixture lookups by id,
//! the pagination envelope, and the write endpoints the application touches
//! during teardown flows.

use std::collections::HashMap;
use std::sync::PoisonError;

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::{Method, StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use serde_json::{Value, json};

use super::SharedConfig;
use super::config::{
    ConfigUpdate, DEFAULT_PER_PAGE, DEFAULT_RESP_LIMIT, StubConfig, paginate, window,
};

fn read_config(state: &SharedConfig) -> std::sync::RwLockReadGuard<'_, StubConfig> {
    state.read().unwrap_or_else(PoisonError::into_inner)
}

fn query_usize(params: &HashMap<String, String>, key: &str, default: usize) -> usize {
    params.get(key).and_then(|v| v.parse().ok()).unwrap_or(default)
}

fn not_found() -> Response {
    (StatusCode::NOT_FOUND, "404 Not Found").into_response()
}

/// GET /api/v1/users/{user_id}
pub(super) async fn user(
    Path(user_id): Path<String>,
    Query(params): Query<HashMap<String, String>>,
) -> Json<Value> {
    let mut response = json!({
        "id": user_id,
        "upvoted_ids": [],
        "downvoted_ids": [],
        "subscribed_thread_ids": [],
    });

    // Course-scoped lookups also carry the user's per-course counts
    if params.contains_key("course_id") {
        if let Some(obj) = response.as_object_mut() {
            obj.insert("threads_count".to_string(), json!(1));
            obj.insert("comments_count".to_string(), json!(2));
        }
    }

    Json(response)
}

/// GET /api/v1/users/{user_id}/active_threads
pub(super) async fn user_active_threads(
    State(state): State<SharedConfig>,
    Path(_user_id): Path<String>,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    let config = read_config(&state);
    let Some(items) = config.active_threads.as_deref() else {
        return not_found();
    };

    let page = query_usize(&params, "page", 1);
    let per_page = query_usize(&params, "per_page", DEFAULT_PER_PAGE);
    let paged = paginate(items, page, per_page);

    Json(json!({
        "collection": paged.collection,
        "page": paged.page,
        "num_pages": paged.num_pages,
    }))
    .into_response()
}

/// GET /api/v1/threads
pub(super) async fn threads() -> Json<Value> {
    Json(json!({"collection": [], "page": 1, "num_pages": 1}))
}

/// GET /api/v1/threads/{thread_id}
pub(super) async fn thread(
    State(state): State<SharedConfig>,
    Path(thread_id): Path<String>,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    let mut thread = {
        let config = read_config(&state);
        match config.threads.get(&thread_id) {
            Some(thread) => thread.clone(),
            None => return not_found(),
        }
    };

    if params.get("recursive").is_some_and(|v| v == "True") {
        if let Some(obj) = thread.as_object_mut() {
            // resp_total reflects the full child count, before windowing
            let child_count = obj
                .get("children")
                .and_then(Value::as_array)
                .map_or(0, Vec::len);
            obj.entry("children").or_insert_with(|| json!([]));
            obj.entry("resp_total").or_insert_with(|| json!(child_count));

            let resp_skip = query_usize(&params, "resp_skip", 0);
            let resp_limit = query_usize(&params, "resp_limit", DEFAULT_RESP_LIMIT);
            if let Some(children) = obj.get_mut("children").and_then(Value::as_array_mut) {
                let windowed = window(children.as_slice(), resp_skip, resp_limit);
                *children = windowed;
            }
        }
    }

    Json(thread).into_response()
}

/// GET /api/v1/comments/{comment_id}
///
/// The application fetches a comment before deleting it; only configured
/// comments exist.
pub(super) async fn comment(
    State(state): State<SharedConfig>,
    Path(comment_id): Path<String>,
) -> Response {
    let config = read_config(&state);
    match config.comments.get(&comment_id) {
        Some(comment) => Json(comment.clone()).into_response(),
        None => not_found(),
    }
}

/// GET /api/v1/{commentable_id}/threads
pub(super) async fn commentable_threads(
    State(state): State<SharedConfig>,
    Path(commentable_id): Path<String>,
) -> Json<Value> {
    let config = read_config(&state);
    let collection: Vec<Value> = config
        .threads
        .values()
        .filter(|thread| {
            thread.get("commentable_id").and_then(Value::as_str) == Some(commentable_id.as_str())
        })
        .cloned()
        .collect();

    Json(json!({"collection": collection, "page": 1, "num_pages": 1}))
}

/// PUT /set_config
pub(super) async fn set_config(
    State(state): State<SharedConfig>,
    Json(update): Json<ConfigUpdate>,
) -> StatusCode {
    let mut config = state.write().unwrap_or_else(PoisonError::into_inner);
    config.apply(update);
    tracing::debug!(
        threads = config.threads.len(),
        comments = config.comments.len(),
        "stub fixtures updated"
    );
    StatusCode::NO_CONTENT
}

/// GET /get_config
pub(super) async fn get_config(State(state): State<SharedConfig>) -> Json<StubConfig> {
    Json(read_config(&state).clone())
}

/// DELETE on any resource acknowledges with an empty object.
pub(super) async fn delete_resource() -> Json<Value> {
    Json(json!({}))
}

/// PUT on anything but /set_config is accepted and ignored.
pub(super) async fn put_passthrough() -> StatusCode {
    StatusCode::NO_CONTENT
}

/// Routes the table doesn't know: writes are still acknowledged, reads 404.
pub(super) async fn fallback(method: Method, uri: Uri) -> Response {
    if method == Method::DELETE {
        Json(json!({})).into_response()
    } else if method == Method::PUT {
        StatusCode::NO_CONTENT.into_response()
    } else {
        tracing::debug!(%method, %uri, "no stub route");
        not_found()
    }
}
