//! Web administration UI module.
//!
//! Provides:
//! - Login and sign-out backed by the bookstore backend
//! - The session gate applied to every route
//! - Tabbed dashboard and its mutation routes

pub mod middleware;
pub mod routes;
pub mod templates;

pub use middleware::AdminState;
pub use routes::admin_router;
