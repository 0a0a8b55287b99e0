//! The credential store: account records in the central registry.

use tracing::debug;

use crate::db::Db;
use crate::db::schema::{UserCreate, UserRecord};
use crate::error::AccountError;

/// Store for registered-account records.
///
/// This is the only shared mutable resource with a cross-tenant invariant
/// (email uniqueness). That invariant is enforced by the `user_email_unique`
/// index, so concurrent duplicate registrations resolve to exactly one
/// success without any lock in this layer.
pub struct UserStore {
    db: Db,
}

impl UserStore {
    /// Create a new user store on the central registry connection.
    pub fn new(db: Db) -> Self {
        Self { db }
    }

    /// Exact-match lookup by email (case-sensitive, as stored).
    pub async fn find_by_email(&self, email: &str) -> Result<Option<UserRecord>, AccountError> {
        let email = email.to_string();

        let query = r#"
            SELECT * FROM user
            WHERE email = $email
            LIMIT 1
        "#;

        let mut res = self
            .db
            .query(query)
            .bind(("email", email))
            .await
            .map_err(|e| AccountError::StoreUnavailable(e.to_string()))?;

        let users: Vec<UserRecord> = res
            .take(0)
            .map_err(|e| AccountError::StoreUnavailable(e.to_string()))?;
        Ok(users.into_iter().next())
    }

    /// Atomically check uniqueness and insert a new account.
    ///
    /// The CREATE runs against the unique email index; a constraint violation
    /// is reported as `DuplicateEmail` and leaves no partial record behind.
    pub async fn insert(&self, create: UserCreate) -> Result<UserRecord, AccountError> {
        let query = r#"
            CREATE user SET
                first_name = $first_name,
                last_name = $last_name,
                email = $email,
                password_digest = $password_digest,
                storage_pointer = $storage_pointer,
                created_at = time::now()
        "#;

        let email = create.email.clone();

        let created = match self
            .db
            .query(query)
            .bind(("first_name", create.first_name))
            .bind(("last_name", create.last_name))
            .bind(("email", create.email))
            .bind(("password_digest", create.password_digest))
            .bind(("storage_pointer", create.storage_pointer))
            .await
        {
            Ok(mut res) => res.take::<Option<UserRecord>>(0),
            Err(e) => Err(e),
        };

        match created {
            Ok(Some(user)) => {
                debug!("inserted account record for {}", user.email);
                Ok(user)
            }
            Ok(None) => Err(AccountError::StoreUnavailable(
                "insert returned no record".to_string(),
            )),
            Err(e) => {
                // The statement failed. If a record with this email exists, the
                // unique index rejected the insert; anything else is infrastructure.
                match self.find_by_email(&email).await {
                    Ok(Some(_)) => Err(AccountError::DuplicateEmail),
                    _ => Err(AccountError::StoreUnavailable(e.to_string())),
                }
            }
        }
    }

    /// Number of account records, for diagnostics and tests.
    pub async fn count(&self) -> Result<usize, AccountError> {
        let users: Vec<UserRecord> = self
            .db
            .select("user")
            .await
            .map_err(|e| AccountError::StoreUnavailable(e.to_string()))?;
        Ok(users.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{DatabaseConfig, create_connection, ensure_schema};
    use crate::types::{PasswordDigest, StoragePointer};

    async fn setup_test_db() -> Db {
        let config = DatabaseConfig {
            url: "memory".to_string(),
            ..Default::default()
        };
        let db = create_connection(config).await.unwrap();
        ensure_schema(&db).await.unwrap();
        db
    }

    fn sample_create(email: &str) -> UserCreate {
        UserCreate {
            first_name: "A".to_string(),
            last_name: "B".to_string(),
            email: email.to_string(),
            password_digest: PasswordDigest::new("$argon2id$fake"),
            storage_pointer: StoragePointer::new(format!("surrealkv://tenants/{email}")),
        }
    }

    #[tokio::test]
    async fn test_insert_and_find() {
        let store = UserStore::new(setup_test_db().await);

        let created = store.insert(sample_create("a@x.com")).await.unwrap();
        assert_eq!(created.email, "a@x.com");
        assert_eq!(created.first_name, "A");

        let found = store.find_by_email("a@x.com").await.unwrap().unwrap();
        assert_eq!(found.id, created.id);
        assert_eq!(found.storage_pointer, created.storage_pointer);
    }

    #[tokio::test]
    async fn test_find_absent() {
        let store = UserStore::new(setup_test_db().await);
        let found = store.find_by_email("nobody@x.com").await.unwrap();
        assert!(found.is_none());
    }

    #[tokio::test]
    async fn test_duplicate_email_rejected() {
        let store = UserStore::new(setup_test_db().await);

        store.insert(sample_create("a@x.com")).await.unwrap();
        let second = store.insert(sample_create("a@x.com")).await;

        assert!(matches!(second.unwrap_err(), AccountError::DuplicateEmail));

        // Exactly one record survives; the failed insert left nothing behind.
        assert_eq!(store.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_email_lookup_is_case_sensitive() {
        let store = UserStore::new(setup_test_db().await);

        store.insert(sample_create("a@x.com")).await.unwrap();
        let found = store.find_by_email("A@X.COM").await.unwrap();
        assert!(found.is_none());
    }
}
