//! User resources: `/user` (collection) and `/user/{user_id}` (single user).

use crate::args::{user_parser, RequestFields};
use crate::error::{ApiError, ApiResult};
use crate::AppState;
use axum::extract::{FromRequest, Path, Request, State};
use axum::http::{Method, StatusCode};
use axum::Json;
use serde_json::{Map, Value};
use tracing::{debug, info};
use userbase_model::{User, UserId};
use userbase_store::StoreResult;

/// Non-standard method accepted as an alias for `PUT` on a single user.
pub const UPDATE_METHOD: &str = "UPDATE";

/// Runs a store call on the blocking pool.
async fn blocking<T, F>(f: F) -> ApiResult<T>
where
    F: FnOnce() -> StoreResult<T> + Send + 'static,
    T: Send + 'static,
{
    Ok(tokio::task::spawn_blocking(f).await??)
}

/// Parses a path segment as a user id. Only plain runs of ASCII digits are
/// ids; anything else addresses no user.
fn parse_user_id(segment: &str) -> Option<UserId> {
    if segment.is_empty() || !segment.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    segment.parse().ok()
}

async fn load_user(state: &AppState, id: UserId) -> ApiResult<User> {
    let store = state.store.clone();
    blocking(move || store.get(id)).await?.ok_or_else(|| {
        debug!("user {} not found", id);
        ApiError::NotFound
    })
}

// ── Single user ──────────────────────────────────────────────────

/// `GET /user/{user_id}`
pub async fn get_user(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> ApiResult<Json<Map<String, Value>>> {
    let id = parse_user_id(&user_id).ok_or(ApiError::NotFound)?;
    let user = load_user(&state, id).await?;
    Ok(Json(user.to_mapping()))
}

/// `PUT /user/{user_id}`
///
/// Only fields present in the request change; the rest keep their values.
pub async fn update_user(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    RequestFields(fields): RequestFields,
) -> ApiResult<StatusCode> {
    let id = parse_user_id(&user_id).ok_or(ApiError::NotFound)?;
    let mut user = load_user(&state, id).await?;
    let args = user_parser().parse_args(fields, true)?;

    if let Some(name) = args.get("name") {
        user.set_name(name);
    }
    if let Some(gender) = args.get("gender") {
        user.set_gender(gender);
    }

    let store = state.store.clone();
    blocking(move || store.update(&user)).await?;
    info!("updated user {}", id);
    Ok(StatusCode::NO_CONTENT)
}

/// Catch-all for other methods on `/user/{user_id}`. Routes the
/// non-standard `UPDATE` method to [`update_user`].
pub async fn update_user_by_method(
    State(state): State<AppState>,
    method: Method,
    path: Path<String>,
    req: Request,
) -> ApiResult<StatusCode> {
    if method.as_str() != UPDATE_METHOD {
        return Err(ApiError::MethodNotAllowed);
    }
    let fields = RequestFields::from_request(req, &state).await?;
    update_user(State(state), path, fields).await
}

// ── Collection ───────────────────────────────────────────────────

/// `GET /user`
pub async fn list_users(State(state): State<AppState>) -> ApiResult<Json<Vec<Map<String, Value>>>> {
    let store = state.store.clone();
    let users = blocking(move || store.list()).await?;
    Ok(Json(users.iter().map(User::to_mapping).collect()))
}

/// `POST /user`
///
/// Responds `204 No Content`; the assigned id is not returned.
pub async fn create_user(
    State(state): State<AppState>,
    RequestFields(fields): RequestFields,
) -> ApiResult<StatusCode> {
    let args = user_parser().parse_args(fields, true)?;

    let mut user = User::new();
    user.set_name(args.get("name").unwrap_or(&Value::Null));
    user.set_gender(args.get("gender").unwrap_or(&Value::Null));

    let store = state.store.clone();
    let id = blocking(move || store.insert(&user)).await?;
    info!("created user {}", id);
    Ok(StatusCode::NO_CONTENT)
}
