use axum::{extract::State, Json};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use serde::Deserialize;
use serde_json::{json, Value};
use time::Duration;

use crate::app::AppState;
use crate::auth::{generate_jwt, Claims, TOKEN_COOKIE};
use crate::config::AppConfig;
use crate::error::ApiError;
use crate::middleware::ApiResponse;

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: Option<String>,
}

/// Build the HttpOnly session cookie carrying the signed token
fn session_cookie(token: String, config: &AppConfig) -> Cookie<'static> {
    Cookie::build((TOKEN_COOKIE, token))
        .http_only(true)
        .secure(config.security.cookie_secure)
        .same_site(SameSite::Lax)
        .path("/")
        .max_age(Duration::hours(config.security.jwt_expiry_hours))
        .build()
}

/// Replace the session cookie with an expired empty one
fn clear_session_cookie(config: &AppConfig) -> Cookie<'static> {
    Cookie::build((TOKEN_COOKIE, ""))
        .http_only(true)
        .secure(config.security.cookie_secure)
        .same_site(SameSite::Lax)
        .path("/")
        .max_age(Duration::seconds(-1)) // Negative max_age deletes the cookie
        .build()
}

/// POST /login - Issue a signed session token for the supplied email and set
/// it as a cookie. There is no refresh; clients log in again after expiry.
pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(payload): Json<LoginRequest>,
) -> Result<(CookieJar, ApiResponse<Value>), ApiError> {
    let email = payload
        .email
        .as_deref()
        .map(str::trim)
        .filter(|email| !email.is_empty())
        .ok_or_else(|| ApiError::bad_request("Email is required"))?;

    let claims = Claims::new(email.to_string(), state.config.security.jwt_expiry_hours);
    let token = generate_jwt(&claims, &state.config.security.jwt_secret)?;

    tracing::info!("Session issued for {}", email);

    let jar = jar.add(session_cookie(token, &state.config));
    Ok((jar, ApiResponse::success(json!({}))))
}

/// POST /logout - Clear the session cookie
pub async fn logout(
    State(state): State<AppState>,
    jar: CookieJar,
) -> (CookieJar, ApiResponse<Value>) {
    let jar = jar.add(clear_session_cookie(&state.config));
    (jar, ApiResponse::success(json!({})))
}
