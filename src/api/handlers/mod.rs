//! Axum route handlers for the management API.
//!
//! - [`accounts`]: Account CRUD operations and listings

pub mod accounts;
