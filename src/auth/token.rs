//! Session token issuance and validation.
//!
//! Tokens are compact HS256 JWTs signed with a single server-held secret.
//! Each token embeds the tenant identity and storage pointer, so protected
//! calls resolve their storage without touching the credential store. There
//! is no revocation: a token moves from Valid to Expired and nothing else.

use jsonwebtoken::{
    Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode,
    errors::ErrorKind, get_current_timestamp,
};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::AccountError;
use crate::types::{SessionToken, StoragePointer, TenantName};

/// Default validity window for issued tokens.
pub const DEFAULT_TTL_SECONDS: u64 = 3600;

/// Claims embedded in a session token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionClaims {
    /// Tenant identity: registered email or generated guest name.
    pub sub: String,
    /// Location of the tenant's isolated storage.
    pub store: String,
    /// Issuance time (Unix timestamp).
    pub iat: u64,
    /// Expiry time (Unix timestamp).
    pub exp: u64,
}

impl SessionClaims {
    pub fn tenant(&self) -> TenantName {
        TenantName::new(self.sub.clone())
    }

    pub fn storage_pointer(&self) -> StoragePointer {
        StoragePointer::new(self.store.clone())
    }
}

/// Issues and validates session tokens with a server-held secret.
///
/// Signing and validation are pure CPU-bound operations with no shared
/// mutable state; a signer can be shared freely across request tasks.
pub struct TokenSigner {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
    ttl_seconds: u64,
}

impl TokenSigner {
    /// Create a signer from the server secret and validity window.
    pub fn new(secret: &str, ttl_seconds: u64) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        // Expiry is exact; the default 60s clock-skew leeway would let an
        // expired token pass.
        validation.leeway = 0;

        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            validation,
            ttl_seconds,
        }
    }

    /// Issue a token binding a tenant identity to its storage pointer.
    pub fn issue(
        &self,
        tenant: &TenantName,
        pointer: &StoragePointer,
    ) -> Result<SessionToken, AccountError> {
        self.issue_at(tenant, pointer, get_current_timestamp())
    }

    fn issue_at(
        &self,
        tenant: &TenantName,
        pointer: &StoragePointer,
        issued_at: u64,
    ) -> Result<SessionToken, AccountError> {
        let claims = SessionClaims {
            sub: tenant.as_str().to_string(),
            store: pointer.as_str().to_string(),
            iat: issued_at,
            exp: issued_at + self.ttl_seconds,
        };

        let token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .map_err(|e| AccountError::Internal(e.to_string()))?;

        debug!("issued session token for tenant {}", tenant);
        Ok(SessionToken::new(token))
    }

    /// Validate a token and return its claims.
    ///
    /// The signature is checked before anything else; a tampered token is
    /// rejected without its claims ever being inspected. A correctly signed
    /// but stale token maps to `Expired` so the two cases stay distinguishable
    /// internally, even though the HTTP layer reports them identically.
    pub fn validate(&self, token: &SessionToken) -> Result<SessionClaims, AccountError> {
        match decode::<SessionClaims>(token.as_str(), &self.decoding, &self.validation) {
            Ok(data) => Ok(data.claims),
            Err(e) => match e.kind() {
                ErrorKind::ExpiredSignature => Err(AccountError::Expired),
                _ => Err(AccountError::InvalidToken(e.to_string())),
            },
        }
    }

    /// Validity window applied to issued tokens, in seconds.
    pub fn ttl_seconds(&self) -> u64 {
        self.ttl_seconds
    }
}
