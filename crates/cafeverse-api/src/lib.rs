//! Typed client for the café ordering backend.

pub mod accounts;
pub mod client;
pub mod error;
pub mod menu;
pub mod orders;
pub(crate) mod retry;
pub mod types;

pub use client::CafeApiClient;
pub use error::ApiError;
pub use types::{AdminAction, AuthSession, OrderCreated, SignupRequest};
