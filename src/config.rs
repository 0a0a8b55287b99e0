//! Service configuration.
//!
//! Everything the account service needs at startup is carried in one
//! explicitly constructed struct: no component reads from ambient globals.

use std::{env, path::PathBuf};

use crate::auth::DEFAULT_TTL_SECONDS;
use crate::db::DatabaseConfig;

/// Top-level configuration for the account service.
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    /// Central registry connection.
    pub database: DatabaseConfig,
    /// Root directory under which per-tenant stores are created.
    pub tenants_root: PathBuf,
    /// Server-held secret used to sign session tokens.
    pub token_secret: String,
    /// Validity window for issued tokens, in seconds.
    pub token_ttl_seconds: u64,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            database: DatabaseConfig::default(),
            tenants_root: env::var("LEDGERHOST_TENANTS_ROOT")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("data/tenants")),
            // Without a configured secret, fall back to an ephemeral one:
            // tokens then die with the process, which is fine for local runs.
            token_secret: env::var("LEDGERHOST_TOKEN_SECRET")
                .unwrap_or_else(|_| uuid::Uuid::new_v4().to_string()),
            token_ttl_seconds: DEFAULT_TTL_SECONDS,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_service_config_default() {
        let config = ServiceConfig::default();
        assert!(!config.token_secret.is_empty());
        assert_eq!(config.token_ttl_seconds, DEFAULT_TTL_SECONDS);
        assert!(!config.tenants_root.as_os_str().is_empty());
    }
}
