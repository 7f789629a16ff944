/// Request routing and dispatch
///
/// The API has a single entry point. The target is named by a path, either
/// the `path` query parameter (`/?path=articles/3`) or the URL path of a
/// proxied request (`/articles/3`). Dispatch then runs, in order:
///
/// 1. no path → 403
/// 2. unknown resource (first segment) → 404
/// 3. protected `(resource, method)` with a bad token → 401
/// 4. route shape: non-numeric article id → 400, unknown shape → 404,
///    known shape with an unsupported method → 405
/// 5. handler
///
/// Resources and routes are plain enums; the protected-route table is a
/// `match`. Nothing is looked up by name at runtime.
///
/// ```text
/// GET    articles          list (optional ?page=&perPage=)
/// POST   articles          create            [auth]
/// GET    articles/{id}     show
/// PUT    articles/{id}     update (owner)    [auth]
/// DELETE articles/{id}     delete (owner)    [auth]
/// POST   auth/register     register
/// POST   auth/login        login
/// ```

use std::collections::HashMap;

use axum::{
    body::Bytes,
    extract::{Path, Query, State},
    http::{HeaderMap, Method},
    response::{IntoResponse, Response},
};
use quill_shared::auth::middleware::{verify_request, AuthIdentity};

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
    routes,
};

/// Top-level resources
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resource {
    Articles,
    Auth,
}

impl Resource {
    /// Maps the first path segment to a resource
    pub fn from_segment(segment: &str) -> Option<Self> {
        match segment {
            "articles" => Some(Resource::Articles),
            "auth" => Some(Resource::Auth),
            _ => None,
        }
    }

    /// Whether `method` on this resource needs a bearer token
    pub fn requires_auth(self, method: &Method) -> bool {
        match self {
            Resource::Articles => {
                *method == Method::POST || *method == Method::PUT || *method == Method::DELETE
            }
            Resource::Auth => false,
        }
    }
}

/// A fully resolved route
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    ListArticles,
    CreateArticle,
    ShowArticle(i64),
    UpdateArticle(i64),
    DeleteArticle(i64),
    Register,
    Login,
}

/// Splits a path into segments, ignoring leading and trailing slashes
///
/// ```
/// use quill_api::dispatch::split_path;
///
/// assert_eq!(split_path("/articles/3/"), vec!["articles", "3"]);
/// assert!(split_path("///").is_empty());
/// ```
pub fn split_path(path: &str) -> Vec<&str> {
    let trimmed = path.trim_matches('/');
    if trimmed.is_empty() {
        return Vec::new();
    }
    trimmed.split('/').collect()
}

fn parse_id(raw: &str) -> ApiResult<i64> {
    if raw.is_empty() || !raw.bytes().all(|b| b.is_ascii_digit()) {
        return Err(ApiError::BadRequest("Invalid id".to_string()));
    }
    raw.parse()
        .map_err(|_| ApiError::BadRequest("Invalid id".to_string()))
}

fn not_allowed(allowed: &[Method]) -> ApiError {
    ApiError::MethodNotAllowed {
        allowed: allowed.to_vec(),
        message: "Method not allowed for this resource".to_string(),
    }
}

fn route_not_found() -> ApiError {
    ApiError::NotFound("The requested resource was not found".to_string())
}

/// Resolves segments under a known resource to a [`Route`]
///
/// `segments[0]` is the resource segment itself.
pub fn resolve_route(resource: Resource, method: &Method, segments: &[&str]) -> ApiResult<Route> {
    match (resource, segments) {
        (Resource::Auth, [_, action]) => {
            let route = match *action {
                "login" => Route::Login,
                "register" => Route::Register,
                _ => return Err(route_not_found()),
            };
            if *method == Method::POST {
                Ok(route)
            } else {
                Err(not_allowed(&[Method::POST]))
            }
        }
        (Resource::Articles, [_]) => match *method {
            Method::GET => Ok(Route::ListArticles),
            Method::POST => Ok(Route::CreateArticle),
            _ => Err(not_allowed(&[Method::GET, Method::POST])),
        },
        (Resource::Articles, [_, raw_id]) => {
            let id = parse_id(raw_id)?;
            match *method {
                Method::GET => Ok(Route::ShowArticle(id)),
                Method::PUT => Ok(Route::UpdateArticle(id)),
                Method::DELETE => Ok(Route::DeleteArticle(id)),
                _ => Err(not_allowed(&[Method::GET, Method::PUT, Method::DELETE])),
            }
        }
        _ => Err(route_not_found()),
    }
}

/// Everything the dispatcher needs from one request
#[derive(Debug)]
pub struct DispatchRequest<'a> {
    pub method: Method,
    pub path: Option<&'a str>,
    pub headers: &'a HeaderMap,
    pub query: &'a HashMap<String, String>,
    pub body: &'a [u8],
}

/// Routes one request and runs its handler
pub async fn dispatch(state: &AppState, request: DispatchRequest<'_>) -> ApiResult<Response> {
    let path = request
        .path
        .filter(|path| !path.trim_matches('/').is_empty())
        .ok_or_else(|| ApiError::Forbidden("Direct access is not allowed".to_string()))?;

    let segments = split_path(path);
    let resource = segments
        .first()
        .and_then(|segment| Resource::from_segment(segment))
        .ok_or_else(route_not_found)?;

    let identity = if resource.requires_auth(&request.method) {
        match verify_request(request.headers, state.jwt_secret()) {
            Ok(identity) => Some(identity),
            Err(err) => {
                tracing::warn!(method = %request.method, path, error = %err, "Rejected unauthenticated request");
                return Err(err.into());
            }
        }
    } else {
        None
    };

    let route = resolve_route(resource, &request.method, &segments)?;
    tracing::debug!(?route, user_id = identity.as_ref().map(|i| i.user_id), "Dispatching request");

    match route {
        Route::ListArticles => routes::articles::index(state, request.query).await,
        Route::ShowArticle(id) => routes::articles::show(state, id).await,
        Route::CreateArticle => {
            routes::articles::store(state, authenticated(identity)?, request.body).await
        }
        Route::UpdateArticle(id) => {
            routes::articles::update(state, authenticated(identity)?, id, request.body).await
        }
        Route::DeleteArticle(id) => {
            routes::articles::delete(state, authenticated(identity)?, id).await
        }
        Route::Register => routes::auth::register(state, request.body).await,
        Route::Login => routes::auth::login(state, request.body).await,
    }
}

fn authenticated(identity: Option<AuthIdentity>) -> ApiResult<AuthIdentity> {
    // Always Some for protected routes
    identity.ok_or_else(|| ApiError::Unauthorized("Invalid token: No authorization token provided".to_string()))
}

/// Axum handler behind `/` and `/*path`
///
/// The `path` query parameter wins over the URL path.
pub async fn entry(
    State(state): State<AppState>,
    method: Method,
    url_path: Option<Path<String>>,
    query: Option<Query<HashMap<String, String>>>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let query = query.map(|Query(query)| query).unwrap_or_default();
    let url_path = url_path.map(|Path(path)| path);

    let path = query
        .get("path")
        .filter(|path| !path.is_empty())
        .map(String::as_str)
        .or(url_path.as_deref());

    let request = DispatchRequest {
        method,
        path,
        headers: &headers,
        query: &query,
        body: &body,
    };

    match dispatch(&state, request).await {
        Ok(response) => response,
        Err(err) => err.into_response(),
    }
}
