//! HTTP server for the persona routes.
//!
//! - [`api`]: Router, state and route handlers
//! - [`validate`]: Request body validation
//! - [`error`]: Error responses

pub mod api;
pub mod error;
pub mod validate;
