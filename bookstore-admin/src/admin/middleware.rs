//! Admin state and the session gate.

use axum::extract::Request;
use axum::middleware::Next;
use axum::response::{IntoResponse, Redirect, Response};
use std::sync::Arc;
use tracing::debug;

use crate::backend::BookstoreBackend;
use crate::console::Console;
use crate::session::{
    Route, RouteDecision, SessionContext, SessionGate, SessionToken, TOKEN_COOKIE,
};

/// State shared by admin routes
pub struct AdminState {
    /// Bookstore backend every console talks to
    pub backend: Arc<dyn BookstoreBackend>,
    /// Add `Secure` to the session cookie
    pub secure_cookies: bool,
}

impl AdminState {
    pub fn new(backend: Arc<dyn BookstoreBackend>, secure_cookies: bool) -> Self {
        Self {
            backend,
            secure_cookies,
        }
    }

    /// A fresh console for one request.
    pub fn console(&self, session: SessionContext) -> Console {
        Console::new(session, self.backend.clone())
    }

    /// `Set-Cookie` value storing the token.
    pub fn session_cookie(&self, token: &SessionToken) -> String {
        format!(
            "{TOKEN_COOKIE}={}; Path=/; HttpOnly; SameSite=Strict{}",
            token.as_str(),
            self.secure_suffix()
        )
    }

    /// `Set-Cookie` value that expires the token.
    pub fn cleared_cookie(&self) -> String {
        format!(
            "{TOKEN_COOKIE}=; Path=/; HttpOnly; SameSite=Strict; Max-Age=0{}",
            self.secure_suffix()
        )
    }

    fn secure_suffix(&self) -> &'static str {
        if self.secure_cookies { "; Secure" } else { "" }
    }
}

/// Apply [`SessionGate`] to every request before it reaches a handler.
pub async fn require_session(session: SessionContext, request: Request, next: Next) -> Response {
    let route = Route::from_path(request.uri().path());
    match SessionGate::resolve(route, &session) {
        RouteDecision::Permit => next.run(request).await,
        RouteDecision::Redirect(target) => {
            debug!(path = %request.uri().path(), target, "Session gate redirect");
            Redirect::to(target).into_response()
        }
    }
}
