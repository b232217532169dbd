//! Auth HTTP Routes
//!
//! HTTP endpoints for registration, login, logout, and the current
//! principal, plus an admin-gated stats endpoint. The session identifier
//! travels as an HttpOnly cookie; the cookie value is only a lookup key
//! into server-side state.

use std::sync::Arc;

use axum::{
    extract::{Json, State},
    http::{header, HeaderMap, StatusCode},
    response::IntoResponse,
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};

use crate::auth::errors::AuthError;
use crate::auth::principal::{LoginRequest, RegisterRequest, SessionPrincipal};
use crate::auth::service::AuthService;
use crate::auth::session::{InMemorySessionStore, SessionConfig};
use crate::auth::store::InMemoryCredentialStore;

use super::config::HttpServerConfig;

/// Shared auth state
pub struct AuthState {
    pub service: AuthService<InMemoryCredentialStore, InMemorySessionStore>,
    cookie_name: String,
    cookie_secure: bool,
    cookie_max_age_secs: i64,
}

impl AuthState {
    /// Create new auth state from server config, with in-memory stores
    pub fn new(config: &HttpServerConfig) -> Self {
        let session_config = SessionConfig::default();
        let cookie_max_age_secs = session_config.ttl.num_seconds();
        Self {
            service: AuthService::new(
                InMemoryCredentialStore::new(),
                InMemorySessionStore::new(),
                session_config,
            ),
            cookie_name: config.cookie_name.clone(),
            cookie_secure: config.cookie_secure,
            cookie_max_age_secs,
        }
    }
}

/// Auth routes with shared state
pub fn auth_routes(state: Arc<AuthState>) -> Router {
    Router::new()
        .route("/register", post(register_handler))
        .route("/login", post(login_handler))
        .route("/logout", post(logout_handler))
        .route("/user", get(current_user_handler))
        .route("/admin/stats", get(admin_stats_handler))
        .with_state(state)
}

// ==================
// Request/Response Types
// ==================

#[derive(Debug, Serialize)]
pub struct AdminStats {
    pub user_count: u64,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: u16,
}

/// Map an auth error to its HTTP response.
///
/// Client errors carry their own message; server-side failures are
/// logged with detail and surfaced generically.
fn error_response(err: AuthError) -> (StatusCode, Json<ErrorResponse>) {
    let code = err.status_code();
    let status = StatusCode::from_u16(code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    let message = if err.is_client_error() {
        err.to_string()
    } else {
        tracing::error!(error = %err, "auth operation failed");
        "Internal server error".to_string()
    };
    (status, Json(ErrorResponse { error: message, code }))
}

fn join_error() -> (StatusCode, Json<ErrorResponse>) {
    error_response(AuthError::Storage("hashing task failed".to_string()))
}

// ==================
// Cookie Handling
// ==================

/// Extract the session identifier from the request's `Cookie` header
fn session_id_from_headers(headers: &HeaderMap, cookie_name: &str) -> Option<String> {
    let raw = headers.get(header::COOKIE)?.to_str().ok()?;
    raw.split(';').find_map(|pair| {
        let (name, value) = pair.trim().split_once('=')?;
        (name == cookie_name).then(|| value.to_string())
    })
}

impl AuthState {
    fn session_cookie(&self, session_id: &str) -> String {
        let mut cookie = format!(
            "{}={}; Path=/; HttpOnly; SameSite=Lax; Max-Age={}",
            self.cookie_name, session_id, self.cookie_max_age_secs
        );
        if self.cookie_secure {
            cookie.push_str("; Secure");
        }
        cookie
    }

    /// Expire the session cookie on the client
    fn clear_cookie(&self) -> String {
        let mut cookie = format!(
            "{}=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0",
            self.cookie_name
        );
        if self.cookie_secure {
            cookie.push_str("; Secure");
        }
        cookie
    }
}

// ==================
// Handlers
// ==================

/// Register handler: creates the principal and authenticates it
async fn register_handler(
    State(state): State<Arc<AuthState>>,
    Json(request): Json<RegisterRequest>,
) -> Result<impl IntoResponse, (StatusCode, Json<ErrorResponse>)> {
    // The KDF is deliberately expensive; keep it off the async workers
    let result = tokio::task::spawn_blocking({
        let state = state.clone();
        move || state.service.register(request)
    })
    .await
    .map_err(|_| join_error())?;

    match result {
        Ok((session_id, principal)) => Ok((
            StatusCode::CREATED,
            [(header::SET_COOKIE, state.session_cookie(&session_id))],
            Json(principal),
        )),
        Err(e) => Err(error_response(e)),
    }
}

/// Login handler
async fn login_handler(
    State(state): State<Arc<AuthState>>,
    Json(request): Json<LoginRequest>,
) -> Result<impl IntoResponse, (StatusCode, Json<ErrorResponse>)> {
    let result = tokio::task::spawn_blocking({
        let state = state.clone();
        move || state.service.login(request)
    })
    .await
    .map_err(|_| join_error())?;

    match result {
        Ok((session_id, principal)) => Ok((
            StatusCode::OK,
            [(header::SET_COOKIE, state.session_cookie(&session_id))],
            Json(principal),
        )),
        Err(e) => Err(error_response(e)),
    }
}

/// Logout handler: destroys the server-side record and expires the cookie
async fn logout_handler(
    State(state): State<Arc<AuthState>>,
    headers: HeaderMap,
) -> Result<impl IntoResponse, (StatusCode, Json<ErrorResponse>)> {
    if let Some(session_id) = session_id_from_headers(&headers, &state.cookie_name) {
        state.service.logout(&session_id).map_err(error_response)?;
    }

    Ok((
        StatusCode::OK,
        [(header::SET_COOKIE, state.clear_cookie())],
        Json(MessageResponse {
            message: "Logged out".to_string(),
        }),
    ))
}

/// Current principal handler
async fn current_user_handler(
    State(state): State<Arc<AuthState>>,
    headers: HeaderMap,
) -> Result<Json<SessionPrincipal>, (StatusCode, Json<ErrorResponse>)> {
    let session_id = session_id_from_headers(&headers, &state.cookie_name)
        .ok_or_else(|| error_response(AuthError::Unauthorized))?;

    state
        .service
        .require_authenticated(&session_id)
        .map(Json)
        .map_err(error_response)
}

/// Admin stats handler (admin gate in front)
async fn admin_stats_handler(
    State(state): State<Arc<AuthState>>,
    headers: HeaderMap,
) -> Result<Json<AdminStats>, (StatusCode, Json<ErrorResponse>)> {
    let session_id = session_id_from_headers(&headers, &state.cookie_name)
        .ok_or_else(|| error_response(AuthError::Unauthorized))?;

    state
        .service
        .require_admin(&session_id)
        .map_err(error_response)?;

    let user_count = state
        .service
        .registered_count()
        .map_err(error_response)?;

    Ok(Json(AdminStats { user_count }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn test_session_id_from_headers() {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::COOKIE,
            HeaderValue::from_static("other=1; digimart_sid=abc123; theme=dark"),
        );

        assert_eq!(
            session_id_from_headers(&headers, "digimart_sid").as_deref(),
            Some("abc123")
        );
        assert!(session_id_from_headers(&headers, "missing").is_none());
    }

    #[test]
    fn test_session_id_absent_without_cookie_header() {
        let headers = HeaderMap::new();
        assert!(session_id_from_headers(&headers, "digimart_sid").is_none());
    }

    #[test]
    fn test_cookie_attributes() {
        let state = AuthState::new(&HttpServerConfig::default());

        let cookie = state.session_cookie("abc123");
        assert!(cookie.starts_with("digimart_sid=abc123"));
        assert!(cookie.contains("HttpOnly"));
        assert!(cookie.contains("SameSite=Lax"));
        assert!(!cookie.contains("Secure"));

        let cleared = state.clear_cookie();
        assert!(cleared.contains("Max-Age=0"));
    }

    #[test]
    fn test_secure_cookie_flag() {
        let config = HttpServerConfig {
            cookie_secure: true,
            ..Default::default()
        };
        let state = AuthState::new(&config);
        assert!(state.session_cookie("abc").contains("Secure"));
        assert!(state.clear_cookie().contains("Secure"));
    }
}
