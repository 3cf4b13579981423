pub mod auth;
pub mod config;
pub mod domain;
pub mod error;
pub mod handlers;
pub mod infra;
pub mod router;
pub mod serde_ext;
pub mod state;
pub mod usecase;
