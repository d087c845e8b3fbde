//! # Oficina Shared Library
//!
//! Shared types and business logic for the oficina business-management
//! backend: customers, users, orders with line items, and pending services.
//!
//! ## Module Organization
//!
//! - `models`: database models and store operations
//! - `auth`: session tokens and the request gate
//! - `reports`: joined/grouped read-only projections
//! - `db`: connection pool helpers

pub mod auth;
pub mod db;
pub mod models;
pub mod reports;

/// Current version of the oficina shared library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
