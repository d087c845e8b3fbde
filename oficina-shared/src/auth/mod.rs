/// Authentication primitives
///
/// # Modules
///
/// - [`token`]: session token issuance and validation (HS256, 24h window)
/// - [`middleware`]: the session gate applied to protected routes
///
/// Password verification is deliberately absent: the store compares password
/// hashes itself (pgcrypto `crypt()`), see `models::user::User::find_by_credentials`.
pub mod middleware;
pub mod token;
