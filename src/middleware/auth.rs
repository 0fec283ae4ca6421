use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use axum_extra::extract::cookie::CookieJar;

use crate::app::AppState;
use crate::auth::{self, Claims, TOKEN_COOKIE};
use crate::error::ApiError;

/// Authenticated user context extracted from the session token
#[derive(Clone, Debug)]
pub struct AuthUser {
    pub email: String,
}

impl From<Claims> for AuthUser {
    fn from(claims: Claims) -> Self {
        Self {
            email: claims.email,
        }
    }
}

impl AuthUser {
    /// Single ownership-resolution check used by every handler: the claimed
    /// email (query param, body field, or stored document owner) must equal
    /// the authenticated email. A missing claim is rejected the same way.
    pub fn authorize_email(&self, claimed: Option<&str>) -> Result<(), ApiError> {
        match claimed {
            Some(email) if email == self.email => Ok(()),
            _ => Err(ApiError::forbidden(
                "Email does not match authenticated user",
            )),
        }
    }
}

/// Session authentication middleware. Reads the token cookie, verifies it
/// against the secret carried in application state, and injects [`AuthUser`]
/// into the request for downstream handlers.
pub async fn require_auth(
    State(state): State<AppState>,
    jar: CookieJar,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = jar
        .get(TOKEN_COOKIE)
        .map(|cookie| cookie.value().to_string())
        .ok_or_else(|| ApiError::unauthorized("Authentication required"))?;

    let claims = auth::verify_jwt(&token, &state.config.security.jwt_secret)
        .map_err(ApiError::unauthorized)?;

    request.extensions_mut().insert(AuthUser::from(claims));

    Ok(next.run(request).await)
}
