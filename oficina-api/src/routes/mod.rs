/// API route handlers
///
/// - `health`: health check endpoint
/// - `auth`: login and token probe
/// - `reports`: orders-with-total and pending-services projections
/// - `finance`: market quotes proxy
pub mod auth;
pub mod finance;
pub mod health;
pub mod reports;
