//! Authentication extractor for Axum handlers.

use axum::extract::FromRequestParts;
use axum::http::header::{AUTHORIZATION, COOKIE};
use axum::http::request::Parts;
use axum::http::HeaderMap;
use reelcraft_core::api_keys::hash_api_key;
use reelcraft_core::error::CoreError;
use reelcraft_core::roles::ROLE_ADMIN;
use reelcraft_core::types::DbId;
use reelcraft_db::repositories::{ApiKeyRepo, UserRepo};

use crate::auth::jwt::validate_token;
use crate::error::AppError;
use crate::state::AppState;

/// Header carrying a scripted client's API key.
pub const API_KEY_HEADER: &str = "x-api-key";

/// Cookie holding the browser session JWT.
pub const SESSION_COOKIE: &str = "session";

/// The authenticated caller.
///
/// Credentials are tried in order: `Authorization: Bearer <jwt>`, the
/// `session` cookie, then `X-Api-Key`. The first one present decides; an
/// invalid credential is rejected rather than falling through.
///
/// ```ignore
/// async fn my_handler(user: AuthUser) -> AppResult<Json<()>> {
///     tracing::info!(user_id = user.user_id, role = %user.role, "handling request");
///     Ok(Json(()))
/// }
/// ```
#[derive(Debug, Clone)]
pub struct AuthUser {
    /// The user's internal database id.
    pub user_id: DbId,
    /// The user's role name (`"admin"` or `"member"`).
    pub role: String,
}

impl AuthUser {
    pub fn is_admin(&self) -> bool {
        self.role == ROLE_ADMIN
    }
}

fn unauthorized(message: &str) -> AppError {
    AppError::Core(CoreError::Unauthorized(message.to_string()))
}

fn bearer_token(headers: &HeaderMap) -> Option<Result<&str, AppError>> {
    let value = headers.get(AUTHORIZATION)?;
    Some(
        value
            .to_str()
            .ok()
            .and_then(|v| v.strip_prefix("Bearer "))
            .map(str::trim)
            .ok_or_else(|| {
                unauthorized("Invalid Authorization format. Expected: Bearer <token>")
            }),
    )
}

fn session_cookie(headers: &HeaderMap) -> Option<&str> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, value)| *name == SESSION_COOKIE && !value.is_empty())
        .map(|(_, value)| value)
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let jwt = match bearer_token(&parts.headers) {
            Some(token) => Some(token?),
            None => session_cookie(&parts.headers),
        };

        if let Some(token) = jwt {
            let claims = validate_token(token, &state.config.jwt)
                .map_err(|_| unauthorized("Invalid or expired token"))?;
            return Ok(AuthUser {
                user_id: claims.sub,
                role: claims.role,
            });
        }

        let api_key = parts
            .headers
            .get(API_KEY_HEADER)
            .and_then(|v| v.to_str().ok())
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .ok_or_else(|| unauthorized("Missing credentials"))?;

        let key = ApiKeyRepo::authenticate(&state.pool, &hash_api_key(api_key))
            .await?
            .ok_or_else(|| unauthorized("Invalid or revoked API key"))?;
        let user = UserRepo::find_by_id(&state.pool, key.user_id)
            .await?
            .ok_or_else(|| unauthorized("API key owner no longer exists"))?;

        tracing::debug!(user_id = user.id, key_prefix = %key.key_prefix, "Authenticated via API key");
        Ok(AuthUser {
            user_id: user.id,
            role: user.role,
        })
    }
}
