/// Session token issuance and validation
///
/// Session tokens are stateless JWTs signed with HS256 (HMAC-SHA256). A token
/// proves a prior successful login and carries the user's id and display name.
/// Nothing is persisted: trust is purely cryptographic (signature + time
/// window), and tokens are never revoked server-side.
///
/// # Security
///
/// - **Algorithm**: HS256 only. The allow-list is hard-coded to exactly one
///   algorithm and is never derived from the token's own header, so an
///   algorithm-substitution attack is rejected as a bad signature.
/// - **Expiration**: 24 hours from issuance, second-granularity Unix epoch.
///   A token exactly at its expiry boundary is already expired.
/// - **Key**: the symmetric signing key is injected at construction time
///   (decoded from configuration at startup), never read from ambient state.
///
/// # Example
///
/// ```
/// use oficina_shared::auth::token::{TokenService, TokenOutcome};
/// use uuid::Uuid;
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let tokens = TokenService::new(b"a-signing-key-of-at-least-32-bytes!");
///
/// let token = tokens.issue(Uuid::new_v4(), "Maria")?;
/// assert!(matches!(tokens.validate(&token), TokenOutcome::Valid(_)));
/// # Ok(())
/// # }
/// ```
use chrono::{Duration, Utc};
use jsonwebtoken::{
    decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Error type for token issuance
#[derive(Debug, thiserror::Error)]
pub enum TokenError {
    /// Failed to sign the claims set
    #[error("failed to sign session token: {0}")]
    Sign(#[from] jsonwebtoken::errors::Error),
}

/// Claims carried by a session token
///
/// - `sub`: user id
/// - `name`: display name, echoed back to the client on validation
/// - `iat` / `exp`: issuance and absolute expiry (Unix seconds)
/// - `nbf`: optional not-before; enforced only when present
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionClaims {
    /// Subject - user id
    pub sub: Uuid,

    /// Display name of the user
    pub name: String,

    /// Issued at (Unix timestamp, seconds)
    pub iat: i64,

    /// Expiration time (Unix timestamp, seconds)
    pub exp: i64,

    /// Not before (Unix timestamp, seconds); optional
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nbf: Option<i64>,
}

impl SessionClaims {
    /// Creates claims for a fresh session, expiring 24 hours from now
    pub fn new(user_id: Uuid, name: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            sub: user_id,
            name: name.into(),
            iat: now.timestamp(),
            exp: (now + Duration::hours(24)).timestamp(),
            nbf: None,
        }
    }

    /// Checks if the claims are expired at the given instant
    ///
    /// The boundary itself counts as expired: `exp <= now` fails.
    pub fn is_expired_at(&self, now: i64) -> bool {
        self.exp <= now
    }
}

/// Outcome of validating a session token
///
/// Every non-`Valid` variant takes its own code path downstream; there is
/// deliberately no catch-all that falls back to treating a token as valid.
#[derive(Debug, Clone)]
pub enum TokenOutcome {
    /// Signature and time window check out; claims are trustworthy
    Valid(SessionClaims),

    /// Not a well-formed signed token at all
    Malformed,

    /// Well-formed but signed with the wrong key or wrong algorithm
    SignatureInvalid,

    /// The expiry timestamp is at or before the current time
    Expired,

    /// Carries a not-before timestamp that is still in the future
    NotYetValid,

    /// Parse failure that fits none of the above
    Unknown,
}

impl TokenOutcome {
    /// Human-readable rejection for non-valid outcomes
    ///
    /// The wording distinguishes the failure kinds for client UX without
    /// exposing any internals. `None` means the token was valid.
    pub fn rejection(&self) -> Option<&'static str> {
        match self {
            TokenOutcome::Valid(_) => None,
            TokenOutcome::Malformed => Some("malformed session token"),
            TokenOutcome::SignatureInvalid => Some("invalid token signature"),
            TokenOutcome::Expired => Some("session token has expired"),
            TokenOutcome::NotYetValid => Some("session token is not valid yet"),
            TokenOutcome::Unknown => Some("could not process session token"),
        }
    }
}

/// Issues and validates session tokens against a single symmetric key
///
/// The key is held for the lifetime of the process; there is no runtime
/// rotation. Construct one at startup and share it (e.g. behind an `Arc`)
/// with the login route and the auth gate.
pub struct TokenService {
    encoding: EncodingKey,
    decoding: DecodingKey,
}

impl TokenService {
    /// Creates a token service from raw key bytes
    ///
    /// The configured secret is base64-encoded; decoding it (and failing hard
    /// on malformed input) is the caller's job at startup.
    pub fn new(key: &[u8]) -> Self {
        Self {
            encoding: EncodingKey::from_secret(key),
            decoding: DecodingKey::from_secret(key),
        }
    }

    /// Issues a signed session token for a user
    ///
    /// Claims: `{sub: user_id, name, iat: now, exp: now + 24h}`. Pure
    /// computation, no persistence.
    pub fn issue(&self, user_id: Uuid, name: &str) -> Result<String, TokenError> {
        self.sign(&SessionClaims::new(user_id, name))
    }

    /// Signs an explicit claims set
    ///
    /// `issue` is the normal entry point; this exists so tests can craft
    /// tokens with arbitrary time windows.
    pub fn sign(&self, claims: &SessionClaims) -> Result<String, TokenError> {
        let header = Header::new(Algorithm::HS256);
        Ok(encode(&header, claims, &self.encoding)?)
    }

    /// Validates a token string and classifies the result
    ///
    /// Signature and shape are checked by the JWT library against an
    /// allow-list of exactly HS256. The time window is checked here with
    /// zero leeway so that `exp <= now` is `Expired` and a present `nbf`
    /// with `now < nbf` is `NotYetValid`. Identical inputs at the same
    /// instant always produce the same outcome.
    pub fn validate(&self, token: &str) -> TokenOutcome {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        // Time-window checks happen below with strict boundary semantics.
        validation.validate_exp = false;
        validation.validate_nbf = false;

        match decode::<SessionClaims>(token, &self.decoding, &validation) {
            Ok(data) => {
                let now = Utc::now().timestamp();
                let claims = data.claims;
                if claims.is_expired_at(now) {
                    TokenOutcome::Expired
                } else if claims.nbf.is_some_and(|nbf| now < nbf) {
                    TokenOutcome::NotYetValid
                } else {
                    TokenOutcome::Valid(claims)
                }
            }
            Err(err) => match err.kind() {
                ErrorKind::InvalidToken
                | ErrorKind::Base64(_)
                | ErrorKind::Json(_)
                | ErrorKind::Utf8(_)
                | ErrorKind::MissingRequiredClaim(_) => TokenOutcome::Malformed,
                ErrorKind::InvalidSignature | ErrorKind::InvalidAlgorithm => {
                    TokenOutcome::SignatureInvalid
                }
                ErrorKind::ExpiredSignature => TokenOutcome::Expired,
                ErrorKind::ImmatureSignature => TokenOutcome::NotYetValid,
                _ => TokenOutcome::Unknown,
            },
        }
    }
}
