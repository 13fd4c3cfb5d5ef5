//! API-compatible types.

pub mod account;
pub mod auth;
