//! NewType wrappers for strong typing throughout the account service.
//!
//! These types prevent accidental mixing of semantically different strings
//! (e.g., passing a raw password where a digest is expected).

use serde::{Deserialize, Serialize};
use std::fmt;

/// Macro to generate a NewType wrapper with standard trait implementations.
macro_rules! newtype_string {
    (
        $(#[$meta:meta])*
        $name:ident
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Create a new instance.
            pub fn new(value: impl Into<String>) -> Self {
                Self(value.into())
            }

            /// Get the inner value as a string slice.
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Consume and return the inner String.
            pub fn into_inner(self) -> String {
                self.0
            }
        }

        impl From<String> for $name {
            fn from(s: String) -> Self {
                Self(s)
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                Self(s.to_string())
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl std::borrow::Borrow<str> for $name {
            fn borrow(&self) -> &str {
                &self.0
            }
        }
    };
}

newtype_string!(
    /// Identity of a tenant: a registered user's email or a generated guest
    /// name (e.g., "guest_3f2a...").
    ///
    /// Every tenant owns exactly one isolated storage area. The tenant name
    /// is the key from which that storage's location is derived.
    TenantName
);

newtype_string!(
    /// Opaque reference locating a tenant's isolated storage resource.
    ///
    /// Currently a SurrealDB endpoint URL (e.g., "surrealkv://data/tenants/...").
    /// Callers must treat it as opaque: it is minted by the provisioner,
    /// embedded in session tokens, and handed back to the provisioner to open
    /// the store. Distinct tenants never share a pointer.
    StoragePointer
);

newtype_string!(
    /// Salted, one-way password digest in PHC string format.
    ///
    /// Produced by Argon2id; the plaintext password is never stored. The same
    /// plaintext hashes to a different digest on every call because the salt
    /// is embedded in the string.
    PasswordDigest
);

newtype_string!(
    /// A signed, time-bounded bearer credential (compact JWT).
    ///
    /// Embeds the tenant identity and storage pointer. Self-contained: the
    /// server keeps no session table, so a token is valid until its expiry
    /// and cannot be revoked early.
    SessionToken
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tenant_name_creation() {
        let name = TenantName::new("a@x.com");
        assert_eq!(name.as_str(), "a@x.com");
        assert_eq!(name.to_string(), "a@x.com");
    }

    #[test]
    fn test_tenant_name_from_string() {
        let name: TenantName = "guest_abc".into();
        assert_eq!(name.as_str(), "guest_abc");

        let name: TenantName = String::from("guest_xyz").into();
        assert_eq!(name.as_str(), "guest_xyz");
    }

    #[test]
    fn test_storage_pointer_into_inner() {
        let ptr = StoragePointer::new("surrealkv://data/tenants/a_x_com_0123456789");
        let inner: String = ptr.into_inner();
        assert_eq!(inner, "surrealkv://data/tenants/a_x_com_0123456789");
    }

    #[test]
    fn test_session_token_serde() {
        let token = SessionToken::new("aaa.bbb.ccc");
        let json = serde_json::to_string(&token).unwrap();
        assert_eq!(json, "\"aaa.bbb.ccc\"");

        let parsed: SessionToken = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, token);
    }

    #[test]
    fn test_type_equality() {
        let a = TenantName::new("a@x.com");
        let b = TenantName::new("a@x.com");
        let c = TenantName::new("b@x.com");

        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_type_hash() {
        use std::collections::HashSet;

        let mut set = HashSet::new();
        set.insert(StoragePointer::new("surrealkv://one"));
        set.insert(StoragePointer::new("surrealkv://two"));

        assert!(set.contains(&StoragePointer::new("surrealkv://one")));
        assert!(!set.contains(&StoragePointer::new("surrealkv://three")));
    }

    #[test]
    fn test_as_ref_and_borrow() {
        use std::borrow::Borrow;
        let digest = PasswordDigest::new("$argon2id$v=19$...");
        let s: &str = digest.as_ref();
        assert_eq!(s, "$argon2id$v=19$...");
        let s: &str = digest.borrow();
        assert_eq!(s, "$argon2id$v=19$...");
    }
}
