/// Authentication endpoints
///
/// # Endpoints
///
/// - `POST auth/register` - Create an account
/// - `POST auth/login` - Exchange credentials for a bearer token
///
/// Login answers unknown usernames and wrong passwords with the same 401 so
/// the response does not reveal which usernames exist.

use axum::response::Response;
use quill_shared::{
    auth::{jwt, password},
    models::user::CreateUser,
};
use serde::{Deserialize, Serialize};
use validator::Validate;

use super::{is_blank, parse_body, validation_message};
use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
    response,
};

const INVALID_CREDENTIALS: &str = "Invalid username or password";

/// Register request
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    #[serde(default)]
    #[validate(length(max = 255, message = "Username must be at most 255 characters"))]
    pub username: String,

    #[serde(default)]
    pub password: String,

    #[serde(default)]
    #[validate(email(message = "Invalid email format"))]
    pub email: String,
}

/// Register response
#[derive(Debug, Serialize)]
pub struct RegisterResponse {
    pub user_id: i64,
}

/// Login request
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub username: String,

    #[serde(default)]
    pub password: String,
}

/// Login response
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    /// HS256 bearer token
    pub token: String,
}

/// Registers a new user
///
/// # Endpoint
///
/// ```text
/// POST auth/register
///
/// {"username": "alice", "password": "secret1", "email": "alice@example.com"}
/// ```
///
/// # Response
///
/// ```json
/// {"status": "success", "data": {"user_id": 1}, "message": "Registration successful"}
/// ```
///
/// # Errors
///
/// - `400 Bad Request`: missing field, bad email, password not 6-20
///   characters, or username taken
pub async fn register(state: &AppState, body: &[u8]) -> ApiResult<Response> {
    let req: RegisterRequest = parse_body(body)?;

    if is_blank(&req.username) || is_blank(&req.password) || is_blank(&req.email) {
        return Err(ApiError::BadRequest(
            "Username, password and email are required".to_string(),
        ));
    }

    req.validate()
        .map_err(|e| ApiError::BadRequest(validation_message(&e)))?;

    password::validate_password_length(&req.password).map_err(ApiError::BadRequest)?;

    if state.users.find_by_username(&req.username).await?.is_some() {
        return Err(ApiError::BadRequest(
            "Username is already taken".to_string(),
        ));
    }

    let user_id = state
        .users
        .create(CreateUser {
            username: req.username,
            password: req.password,
            email: req.email,
        })
        .await?;

    Ok(response::created(
        RegisterResponse { user_id },
        "Registration successful",
    ))
}

/// Logs a user in
///
/// # Endpoint
///
/// ```text
/// POST auth/login
///
/// {"username": "alice", "password": "secret1"}
/// ```
///
/// # Response
///
/// ```json
/// {"status": "success", "data": {"token": "eyJ..."}, "message": "Login successful"}
/// ```
///
/// # Errors
///
/// - `400 Bad Request`: missing username or password
/// - `401 Unauthorized`: unknown user or wrong password
pub async fn login(state: &AppState, body: &[u8]) -> ApiResult<Response> {
    let req: LoginRequest = parse_body(body)?;

    if is_blank(&req.username) || is_blank(&req.password) {
        return Err(ApiError::BadRequest(
            "Username and password are required".to_string(),
        ));
    }

    let user = match state.users.find_by_username(&req.username).await? {
        Some(user) => user,
        None => {
            tracing::debug!(username = %req.username, "Login for unknown user");
            return Err(ApiError::Unauthorized(INVALID_CREDENTIALS.to_string()));
        }
    };

    let hash = user.password.clone();
    let valid = tokio::task::spawn_blocking(move || password::verify_password(&req.password, &hash))
        .await
        .map_err(|e| ApiError::InternalError(format!("Password verification task failed: {}", e)))??;

    if !valid {
        tracing::debug!(user_id = user.id, "Login with wrong password");
        return Err(ApiError::Unauthorized(INVALID_CREDENTIALS.to_string()));
    }

    let token = jwt::issue_token(
        user.id,
        &user.username,
        state.config.jwt.expire_seconds,
        state.jwt_secret(),
    )?;

    tracing::info!(user_id = user.id, "User logged in");

    Ok(response::ok(LoginResponse { token }, "Login successful"))
}
