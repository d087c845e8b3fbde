/// Configuration management for the API server
///
/// Loads configuration from environment variables (a `.env` file is honored
/// in development via dotenvy).
///
/// # Environment Variables
///
/// - `DATABASE_URL`: PostgreSQL connection string (required)
/// - `DATABASE_MAX_CONNECTIONS`: pool size (default: 10)
/// - `API_HOST`: host to bind to (default: 0.0.0.0)
/// - `API_PORT`: port to bind to (default: 3000)
/// - `JWT_SECRET`: base64-encoded signing secret (required); decoded once at
///   startup, at least 32 bytes after decoding. Missing or malformed values
///   abort startup; the server never serves authenticated routes without a
///   usable secret.
/// - `FINANCE_API_URL`: upstream quotes API (default: api.hgbrasil.com)
/// - `FINANCE_API_KEY`: upstream API key; the finance route is disabled
///   when unset
/// - `RUST_LOG`: log filter (default: info)
use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use std::env;

/// Complete application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// API server configuration
    pub api: ApiConfig,

    /// Database configuration
    pub database: DatabaseConfig,

    /// Session token configuration
    pub auth: AuthConfig,

    /// Finance quote proxy configuration
    pub finance: FinanceConfig,
}

/// API server configuration
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Host to bind to
    pub host: String,

    /// Port to bind to
    pub port: u16,
}

/// Database configuration
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    /// PostgreSQL connection URL
    pub url: String,

    /// Maximum number of connections in the pool
    pub max_connections: u32,
}

/// Session token configuration
#[derive(Clone)]
pub struct AuthConfig {
    /// Decoded HS256 signing key
    pub signing_key: Vec<u8>,
}

// Manual Debug so the key bytes never end up in logs
impl std::fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthConfig")
            .field("signing_key", &format!("<{} bytes>", self.signing_key.len()))
            .finish()
    }
}

/// Finance quote proxy configuration
#[derive(Debug, Clone)]
pub struct FinanceConfig {
    /// Upstream quotes endpoint
    pub url: String,

    /// Upstream API key; None disables the proxy route
    pub key: Option<String>,
}

impl Config {
    /// Loads configuration from environment variables
    ///
    /// # Errors
    ///
    /// Returns an error if `DATABASE_URL` is missing, or if `JWT_SECRET` is
    /// missing, not valid base64, or decodes to fewer than 32 bytes.
    pub fn from_env() -> anyhow::Result<Self> {
        // Load .env file if present (for development)
        dotenvy::dotenv().ok();

        let api_host = env::var("API_HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
        let api_port = env::var("API_PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse::<u16>()?;

        let database_url = env::var("DATABASE_URL")
            .map_err(|_| anyhow::anyhow!("DATABASE_URL environment variable is required"))?;

        let max_connections = env::var("DATABASE_MAX_CONNECTIONS")
            .unwrap_or_else(|_| "10".to_string())
            .parse::<u32>()?;

        let jwt_secret = env::var("JWT_SECRET")
            .map_err(|_| anyhow::anyhow!("JWT_SECRET environment variable is required"))?;
        let signing_key = decode_signing_key(&jwt_secret)?;

        let finance_url = env::var("FINANCE_API_URL")
            .unwrap_or_else(|_| "https://api.hgbrasil.com/finance".to_string());
        let finance_key = env::var("FINANCE_API_KEY").ok();

        Ok(Self {
            api: ApiConfig {
                host: api_host,
                port: api_port,
            },
            database: DatabaseConfig {
                url: database_url,
                max_connections,
            },
            auth: AuthConfig { signing_key },
            finance: FinanceConfig {
                url: finance_url,
                key: finance_key,
            },
        })
    }

    /// Returns the server bind address
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.api.host, self.api.port)
    }
}

/// Decodes the base64-encoded signing secret
///
/// Fatal at startup on malformed input; never falls back to a default key.
pub fn decode_signing_key(encoded: &str) -> anyhow::Result<Vec<u8>> {
    let key = BASE64
        .decode(encoded.trim())
        .map_err(|e| anyhow::anyhow!("JWT_SECRET is not valid base64: {}", e))?;

    if key.len() < 32 {
        anyhow::bail!(
            "JWT_SECRET must decode to at least 32 bytes, got {}",
            key.len()
        );
    }

    Ok(key)
}
