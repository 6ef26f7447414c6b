//! Bookstore admin console library
//!
//! Session handling, tab loading and mutations for the admin console, plus
//! the web UI that serves them. The binary entry point is in main.rs.

pub mod admin;
pub mod backend;
pub mod claims;
pub mod config;
pub mod console;
pub mod forms;
pub mod mutation;
pub mod server;
pub mod session;
pub mod stats;
pub mod tabs;
pub mod view;

#[cfg(test)]
mod testutil;
