//! Orchestration layer between the HTTP handlers and the collaborators.

pub mod accounts;

pub use accounts::AccountService;
