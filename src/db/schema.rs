use serde::{Deserialize, Serialize};
use surrealdb::{RecordId, sql::Datetime};

use crate::types::{PasswordDigest, StoragePointer};

/// Persisted representation of a registered account in the central registry.
///
/// One record per identity. Records are created at registration and read by
/// the login flow; this core never updates or deletes them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserRecord {
    /// Stable database identifier for this account (table: `user`).
    pub id: RecordId,
    /// Given name as submitted at registration.
    pub first_name: String,
    /// Family name as submitted at registration.
    pub last_name: String,
    /// Globally unique email, stored case-sensitively.
    pub email: String,
    /// Argon2 digest of the password; the plaintext is never persisted.
    pub password_digest: PasswordDigest,
    /// Location of this account's isolated tenant storage.
    pub storage_pointer: StoragePointer,
    /// When this record was created.
    pub created_at: Option<Datetime>,
}

/// Payload used when inserting a new account into the registry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserCreate {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password_digest: PasswordDigest,
    pub storage_pointer: StoragePointer,
}
