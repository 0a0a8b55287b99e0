//! One-way password hashing and verification.
//!
//! Argon2id with a per-digest random salt, serialized in PHC string format.
//! Verification goes through `Argon2::verify_password`, which compares in
//! constant time; there is no early-exit byte comparison anywhere in this
//! module. The plaintext is never logged and never leaves this module.

use anyhow::{Result, anyhow};
use argon2::{Argon2, PasswordHasher, PasswordVerifier};
use password_hash::{PasswordHash, SaltString};

use crate::types::PasswordDigest;

/// Hash a plaintext password into a salted PHC-format digest.
///
/// The salt is freshly random on every call, so hashing the same plaintext
/// twice yields different digests that both verify.
pub fn hash(plaintext: &str) -> Result<PasswordDigest> {
    let mut salt_bytes = [0u8; 16];
    getrandom::getrandom(&mut salt_bytes).map_err(|e| anyhow!(e.to_string()))?;
    let salt = SaltString::encode_b64(&salt_bytes).map_err(|e| anyhow!(e.to_string()))?;

    let argon2 = Argon2::default();
    let phc = argon2
        .hash_password(plaintext.as_bytes(), &salt)
        .map_err(|e| anyhow!(e.to_string()))?
        .to_string();

    Ok(PasswordDigest::new(phc))
}

/// True iff `digest` was produced from `plaintext`.
///
/// An unparseable digest verifies as false rather than erroring; a corrupted
/// stored digest must read as bad credentials, not a server fault.
pub fn verify(plaintext: &str, digest: &PasswordDigest) -> bool {
    if let Ok(parsed) = PasswordHash::new(digest.as_str()) {
        Argon2::default()
            .verify_password(plaintext.as_bytes(), &parsed)
            .is_ok()
    } else {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_then_verify() {
        let digest = hash("abcd1234").unwrap();
        assert!(verify("abcd1234", &digest));
    }

    #[test]
    fn test_wrong_password_fails() {
        let digest = hash("abcd1234").unwrap();
        assert!(!verify("zxy98765", &digest));
        assert!(!verify("", &digest));
    }

    #[test]
    fn test_hash_is_salted() {
        let d1 = hash("abcd1234").unwrap();
        let d2 = hash("abcd1234").unwrap();

        // Same plaintext, different digests; both verify.
        assert_ne!(d1, d2);
        assert!(verify("abcd1234", &d1));
        assert!(verify("abcd1234", &d2));
    }

    #[test]
    fn test_digest_is_phc_format() {
        let digest = hash("abcd1234").unwrap();
        assert!(digest.as_str().starts_with("$argon2"));
        assert!(!digest.as_str().contains("abcd1234"));
    }

    #[test]
    fn test_garbage_digest_verifies_false() {
        let garbage = PasswordDigest::new("not-a-phc-string");
        assert!(!verify("abcd1234", &garbage));
    }
}
