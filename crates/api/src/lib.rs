//! Launchpad API
//!
//! Axum routes and middleware for the omnichain launchpad.

pub mod handlers;
pub mod router;
pub mod security;
pub mod state;

pub use router::{create_router, DEFAULT_BODY_LIMIT};
pub use state::AppState;
