// Core modules
mod config;
mod db;
mod error;
mod types;

pub mod accounts;
pub mod api;
pub mod auth;
pub mod tenancy;

// Re-export key types and functions
pub use accounts::{AccountService, LoginRequest, RegisterRequest, Session};
pub use auth::{DEFAULT_TTL_SECONDS, TokenSigner};
pub use config::ServiceConfig;
pub use db::{DatabaseConfig, UserRecord, create_connection, ensure_schema};
pub use error::AccountError;
pub use tenancy::TenantProvisioner;
pub use types::{PasswordDigest, SessionToken, StoragePointer, TenantName};

use anyhow::Result;
use std::sync::Arc;

/// Convenience function to create a fully configured account service.
///
/// Connects to the central registry, ensures its schema, and returns the
/// service ready to be shared across request tasks.
pub async fn create_service(config: ServiceConfig) -> Result<Arc<AccountService>> {
    let service = AccountService::new(config).await?;
    Ok(Arc::new(service))
}
