//! Tenant storage provisioning.
//!
//! Every tenant (registered account or guest) owns exactly one isolated
//! store: a file-backed SurrealDB database under the configured root
//! directory. The store's location is derived deterministically from the
//! tenant name, so provisioning the same tenant twice resolves to the same
//! place and distinct tenants can never overlap.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use sha2::{Digest, Sha256};
use tokio::sync::Mutex;
use tracing::{debug, info};

use crate::db::Db;
use crate::error::AccountError;
use crate::types::{StoragePointer, TenantName};

/// Creates and opens per-tenant storage resources.
///
/// Open connections are cached per pointer; the cache mutex also serializes
/// concurrent provisioning of the same tenant, so a second caller observes
/// the already-created store instead of corrupting it.
pub struct TenantProvisioner {
    root: PathBuf,
    open: Mutex<HashMap<StoragePointer, Db>>,
}

impl TenantProvisioner {
    /// Create a provisioner rooted at the given directory.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            open: Mutex::new(HashMap::new()),
        }
    }

    /// Derive the storage pointer for a tenant. Pure; no creation.
    ///
    /// The store name is the sanitized tenant name plus a short SHA-256
    /// suffix of the raw name, so two names that sanitize identically
    /// (e.g. "a@x.com" and "a.x@com") still map to distinct stores.
    pub fn pointer_for(&self, tenant: &TenantName) -> StoragePointer {
        StoragePointer::new(format!(
            "surrealkv://{}",
            self.store_path(tenant).display()
        ))
    }

    fn store_path(&self, tenant: &TenantName) -> PathBuf {
        self.root.join(derive_store_name(tenant))
    }

    /// Create the tenant's store and its empty ledger schema if absent, and
    /// return its pointer.
    ///
    /// Idempotent: re-provisioning an existing tenant preserves its data and
    /// re-runs only IF NOT EXISTS schema statements. Backend failures surface
    /// as `ProvisioningFailed` and are not retried.
    pub async fn provision(&self, tenant: &TenantName) -> Result<StoragePointer, AccountError> {
        let pointer = self.pointer_for(tenant);

        let mut open = self.open.lock().await;
        if let Some(db) = open.get(&pointer) {
            // Already provisioned in this process; schema pass is a no-op.
            ensure_ledger_schema(db).await?;
            debug!("tenant {} already provisioned at {}", tenant, pointer);
            return Ok(pointer);
        }

        tokio::fs::create_dir_all(&self.root)
            .await
            .map_err(|e| AccountError::ProvisioningFailed(e.to_string()))?;

        let db = connect_store(&pointer).await?;
        ensure_ledger_schema(&db).await?;
        open.insert(pointer.clone(), db);

        info!("provisioned tenant storage for {} at {}", tenant, pointer);
        Ok(pointer)
    }

    /// Look up a tenant's storage pointer without creating anything.
    pub async fn locate(&self, tenant: &TenantName) -> Option<StoragePointer> {
        let pointer = self.pointer_for(tenant);

        if self.open.lock().await.contains_key(&pointer) {
            return Some(pointer);
        }
        if self.store_path(tenant).exists() {
            return Some(pointer);
        }
        None
    }

    /// Open a handle to an already-provisioned store.
    ///
    /// Reuses the cached connection when one exists; a store provisioned by
    /// an earlier process is reopened from disk and cached.
    pub async fn open(&self, pointer: &StoragePointer) -> Result<Db, AccountError> {
        let mut open = self.open.lock().await;
        if let Some(db) = open.get(pointer) {
            return Ok(db.clone());
        }

        let db = connect_store(pointer).await?;
        open.insert(pointer.clone(), db.clone());
        Ok(db)
    }
}

async fn connect_store(pointer: &StoragePointer) -> Result<Db, AccountError> {
    let db = surrealdb::engine::any::connect(pointer.as_str())
        .await
        .map_err(|e| AccountError::ProvisioningFailed(e.to_string()))?;

    db.use_ns("tenant")
        .use_db("ledger")
        .await
        .map_err(|e| AccountError::ProvisioningFailed(e.to_string()))?;

    Ok(db)
}

/// Define the per-tenant ledger schema.
///
/// The schema itself is application-defined and opaque to the account core;
/// all statements use IF NOT EXISTS so this is safe against existing data.
async fn ensure_ledger_schema(db: &Db) -> Result<(), AccountError> {
    let schema = "DEFINE TABLE IF NOT EXISTS ledger_entry SCHEMAFULL;
         DEFINE FIELD IF NOT EXISTS description ON TABLE ledger_entry TYPE string;
         DEFINE FIELD IF NOT EXISTS amount ON TABLE ledger_entry TYPE number;
         DEFINE FIELD IF NOT EXISTS category ON TABLE ledger_entry TYPE option<string>;
         DEFINE FIELD IF NOT EXISTS occurred_at ON TABLE ledger_entry TYPE datetime;
         DEFINE FIELD IF NOT EXISTS created_at ON TABLE ledger_entry VALUE time::now();";

    db.query(schema)
        .await
        .map_err(|e| AccountError::ProvisioningFailed(e.to_string()))?;

    Ok(())
}

/// Filesystem-safe store name for a tenant.
fn derive_store_name(tenant: &TenantName) -> String {
    let mut sanitized: String = tenant
        .as_str()
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() {
                c.to_ascii_lowercase()
            } else {
                '_'
            }
        })
        .collect();
    sanitized.truncate(32);

    let digest = Sha256::digest(tenant.as_str().as_bytes());
    let hex = format!("{:x}", digest);

    format!("{}_{}", sanitized, &hex[..10])
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_provisioner() -> (tempfile::TempDir, TenantProvisioner) {
        let dir = tempfile::tempdir().unwrap();
        let provisioner = TenantProvisioner::new(dir.path());
        (dir, provisioner)
    }

    #[test]
    fn test_store_name_is_deterministic() {
        let a1 = derive_store_name(&TenantName::new("a@x.com"));
        let a2 = derive_store_name(&TenantName::new("a@x.com"));
        assert_eq!(a1, a2);
    }

    #[test]
    fn test_store_name_is_filesystem_safe() {
        let name = derive_store_name(&TenantName::new("weird/../Name @X.COM"));
        assert!(name.chars().all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_'));
    }

    #[test]
    fn test_sanitization_collisions_still_get_distinct_stores() {
        // Both sanitize to "a_x_com"; the hash suffix keeps them apart.
        let a = derive_store_name(&TenantName::new("a@x.com"));
        let b = derive_store_name(&TenantName::new("a.x@com"));
        assert_ne!(a, b);
    }

    #[test]
    fn test_pointer_for_distinct_tenants_never_overlaps() {
        let (_dir, provisioner) = test_provisioner();
        let p1 = provisioner.pointer_for(&TenantName::new("a@x.com"));
        let p2 = provisioner.pointer_for(&TenantName::new("b@x.com"));
        assert_ne!(p1, p2);
    }

    #[tokio::test]
    async fn test_locate_absent_tenant() {
        let (_dir, provisioner) = test_provisioner();
        let located = provisioner.locate(&TenantName::new("nobody@x.com")).await;
        assert!(located.is_none());
    }

    #[tokio::test]
    async fn test_provision_then_locate() {
        let (_dir, provisioner) = test_provisioner();
        let tenant = TenantName::new("a@x.com");

        let pointer = provisioner.provision(&tenant).await.unwrap();
        let located = provisioner.locate(&tenant).await;
        assert_eq!(located, Some(pointer));
    }

    #[tokio::test]
    async fn test_provision_is_idempotent_and_preserves_data() {
        let (_dir, provisioner) = test_provisioner();
        let tenant = TenantName::new("a@x.com");

        let p1 = provisioner.provision(&tenant).await.unwrap();

        // Write a ledger entry into the freshly provisioned store.
        let db = provisioner.open(&p1).await.unwrap();
        db.query(
            "CREATE ledger_entry SET description = 'coffee', amount = 3.5, occurred_at = time::now()",
        )
        .await
        .unwrap();

        // Re-provision: same pointer, data still present.
        let p2 = provisioner.provision(&tenant).await.unwrap();
        assert_eq!(p1, p2);

        let db = provisioner.open(&p2).await.unwrap();
        let mut res = db.query("SELECT * FROM ledger_entry").await.unwrap();
        let rows: Vec<serde_json::Value> = res.take(0).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0]["description"], "coffee");
    }

    #[tokio::test]
    async fn test_tenant_stores_are_isolated() {
        let (_dir, provisioner) = test_provisioner();

        let p_a = provisioner.provision(&TenantName::new("a@x.com")).await.unwrap();
        let p_b = provisioner.provision(&TenantName::new("b@x.com")).await.unwrap();

        let db_a = provisioner.open(&p_a).await.unwrap();
        db_a.query(
            "CREATE ledger_entry SET description = 'rent', amount = 900, occurred_at = time::now()",
        )
        .await
        .unwrap();

        // Tenant B sees nothing of tenant A's data.
        let db_b = provisioner.open(&p_b).await.unwrap();
        let mut res = db_b.query("SELECT * FROM ledger_entry").await.unwrap();
        let rows: Vec<serde_json::Value> = res.take(0).unwrap();
        assert!(rows.is_empty());
    }
}
