//! Session token handling and the route gate.
//!
//! The token lives in a single cookie. The gate only checks that a token is
//! present; it never verifies signatures or expiry. A stale token is found
//! out when the backend rejects a request.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum_extra::extract::CookieJar;
use std::convert::Infallible;
use std::fmt;
use tracing::{info, warn};

use crate::backend::BookstoreBackend;
use crate::claims::{Claims, ClaimsReader};

/// Cookie holding the bearer token.
pub const TOKEN_COOKIE: &str = "adminToken";

pub const LOGIN_PATH: &str = "/login";
pub const LOGOUT_PATH: &str = "/logout";
pub const DASHBOARD_PATH: &str = "/dashboard-admin";

/// Opaque bearer token issued by the backend at login.
#[derive(Clone, PartialEq, Eq)]
pub struct SessionToken(String);

impl SessionToken {
    /// Wrap a raw token; blank strings are not tokens.
    pub fn new(raw: impl Into<String>) -> Option<Self> {
        let raw = raw.into();
        if raw.trim().is_empty() {
            None
        } else {
            Some(Self(raw))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for SessionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SessionToken(<redacted>)")
    }
}

/// The caller's session, passed explicitly to whatever needs the token.
#[derive(Debug, Clone, Default)]
pub struct SessionContext {
    token: Option<SessionToken>,
}

impl SessionContext {
    pub fn anonymous() -> Self {
        Self::default()
    }

    pub fn with_token(token: SessionToken) -> Self {
        Self { token: Some(token) }
    }

    pub fn from_jar(jar: &CookieJar) -> Self {
        let token = jar
            .get(TOKEN_COOKIE)
            .and_then(|c| SessionToken::new(c.value()));
        Self { token }
    }

    pub fn token(&self) -> Option<&SessionToken> {
        self.token.as_ref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }

    /// Decode the token's identity claims. Never fails; see [`Claims`].
    pub fn claims(&self) -> Claims {
        match &self.token {
            Some(token) => ClaimsReader::read(token),
            None => Claims::Absent,
        }
    }

    /// Forget the token.
    pub fn sign_out(&mut self) {
        self.token = None;
    }
}

impl<S> FromRequestParts<S> for SessionContext
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(Self::from_jar(&CookieJar::from_headers(&parts.headers)))
    }
}

/// Routes known to the gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Login,
    /// Sign-out works with or without a session.
    Logout,
    /// The protected admin area, including everything below it.
    Dashboard,
    Other,
}

impl Route {
    pub fn from_path(path: &str) -> Self {
        let path = path.trim_end_matches('/');
        if path == LOGIN_PATH {
            Route::Login
        } else if path == LOGOUT_PATH {
            Route::Logout
        } else if path == DASHBOARD_PATH
            || path.starts_with(&format!("{DASHBOARD_PATH}/"))
        {
            Route::Dashboard
        } else {
            Route::Other
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteDecision {
    Permit,
    Redirect(&'static str),
}

/// Presence-only authorization for console routes.
pub struct SessionGate;

impl SessionGate {
    pub fn resolve(route: Route, session: &SessionContext) -> RouteDecision {
        match (route, session.is_authenticated()) {
            (Route::Login | Route::Logout, _) => RouteDecision::Permit,
            (Route::Dashboard, true) => RouteDecision::Permit,
            (Route::Dashboard, false) => RouteDecision::Redirect(LOGIN_PATH),
            (Route::Other, true) => RouteDecision::Redirect(DASHBOARD_PATH),
            (Route::Other, false) => RouteDecision::Redirect(LOGIN_PATH),
        }
    }
}

/// Why a login attempt did not produce a session.
#[derive(Debug, thiserror::Error)]
pub enum LoginError {
    #[error("Email and password are required")]
    MissingCredentials,

    #[error("Access restricted to administrators only")]
    NotAdmin,

    #[error("{0}")]
    Rejected(String),

    #[error("Login failed: {0}")]
    Backend(#[source] bookstore_api::Error),
}

impl LoginError {
    /// Text shown on the login page.
    pub fn user_message(&self) -> String {
        match self {
            LoginError::Backend(e) => e
                .server_message()
                .map(str::to_string)
                .unwrap_or_else(|| "An unexpected error occurred".to_string()),
            other => other.to_string(),
        }
    }
}

/// Exchange credentials for a session token.
///
/// Only accounts that come back with an administrator id get a session.
pub async fn login(
    backend: &dyn BookstoreBackend,
    email: &str,
    password: &str,
) -> Result<SessionToken, LoginError> {
    let email = email.trim();
    if email.is_empty() || password.is_empty() {
        return Err(LoginError::MissingCredentials);
    }

    let response = match backend.login(email, password).await {
        Ok(r) => r,
        Err(bookstore_api::Error::HttpError { message, .. }) => {
            warn!("Login rejected by backend");
            return Err(LoginError::Rejected(
                message.unwrap_or_else(|| "Login failed".to_string()),
            ));
        }
        Err(e) => return Err(LoginError::Backend(e)),
    };

    if response.adminid.is_none() {
        warn!("Login succeeded for a non-administrator account");
        return Err(LoginError::NotAdmin);
    }

    let token = SessionToken::new(response.token)
        .ok_or_else(|| LoginError::Rejected("Login failed".to_string()))?;
    info!(admin_id = ?response.adminid, "Administrator signed in");
    Ok(token)
}
