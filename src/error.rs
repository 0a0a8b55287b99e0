//! Service-level error taxonomy.
//!
//! Every failure in the account core is one of these variants; nothing is
//! retried internally and nothing is silently swallowed. The HTTP layer maps
//! variants to status codes in `api`.

use std::fmt;

/// Errors produced by the account service core.
#[derive(Debug, Clone)]
pub enum AccountError {
    /// Structurally malformed input (bad email shape, weak password, empty
    /// required field). Recoverable by the caller correcting the input.
    Validation(String),
    /// A required login field was absent.
    MissingFields,
    /// An account with this email already exists.
    DuplicateEmail,
    /// No account matches the given email.
    UnknownIdentity,
    /// The password did not verify against the stored digest.
    BadCredentials,
    /// The central registry could not be reached or returned an error.
    StoreUnavailable(String),
    /// The tenant storage backend could not create or open the resource.
    ProvisioningFailed(String),
    /// The session token failed signature verification or is malformed.
    InvalidToken(String),
    /// The session token is well-formed and correctly signed but past its
    /// expiry. Kept distinct from `InvalidToken` internally; the HTTP layer
    /// surfaces both identically.
    Expired,
    /// Unexpected internal failure (e.g., the password hasher itself).
    Internal(String),
}

impl fmt::Display for AccountError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Validation(msg) => write!(f, "Invalid input: {}", msg),
            Self::MissingFields => write!(f, "Email and password are required"),
            Self::DuplicateEmail => write!(f, "An account with this email already exists"),
            Self::UnknownIdentity => write!(f, "No account found for this email"),
            Self::BadCredentials => write!(f, "Incorrect password"),
            Self::StoreUnavailable(msg) => write!(f, "Account store unavailable: {}", msg),
            Self::ProvisioningFailed(msg) => write!(f, "Tenant storage provisioning failed: {}", msg),
            Self::InvalidToken(msg) => write!(f, "Invalid token: {}", msg),
            Self::Expired => write!(f, "Token has expired"),
            Self::Internal(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl std::error::Error for AccountError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        assert_eq!(
            AccountError::DuplicateEmail.to_string(),
            "An account with this email already exists"
        );
        assert_eq!(
            AccountError::MissingFields.to_string(),
            "Email and password are required"
        );
        assert_eq!(AccountError::Expired.to_string(), "Token has expired");
        assert_eq!(
            AccountError::Validation("password too short".to_string()).to_string(),
            "Invalid input: password too short"
        );
    }
}
