//! The identity orchestrator: register, login, guest login, and storage
//! resolution, composed over the credential store, password verifier, tenant
//! provisioner, and token signer.

mod validate;

use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::auth::{TokenSigner, password};
use crate::config::ServiceConfig;
use crate::db::{Db, UserCreate, UserStore, create_connection, ensure_schema};
use crate::error::AccountError;
use crate::tenancy::TenantProvisioner;
use crate::types::{SessionToken, StoragePointer, TenantName};

pub use validate::MIN_PASSWORD_LENGTH;

/// Registration input, already parsed by the HTTP layer.
#[derive(Debug, Clone, Deserialize)]
pub struct RegisterRequest {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: String,
}

/// Successful registration. No token is issued here: the caller logs in
/// separately, matching the original flow.
#[derive(Debug, Clone, Serialize)]
pub struct RegisterOutcome {
    pub email: String,
}

/// Login input.
#[derive(Debug, Clone, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// An authenticated session: the tenant identity plus its bearer token.
#[derive(Debug, Clone, Serialize)]
pub struct Session {
    pub tenant: TenantName,
    pub token: SessionToken,
    pub expires_in: u64,
}

/// The account service core.
///
/// One instance per process, shared across request tasks. All methods take
/// `&self`; the only internal lock is the provisioner's connection cache.
pub struct AccountService {
    users: UserStore,
    tenants: TenantProvisioner,
    tokens: TokenSigner,
}

impl AccountService {
    /// Connect to the central registry, ensure its schema, and assemble the
    /// service from the given configuration.
    pub async fn new(config: ServiceConfig) -> anyhow::Result<Self> {
        let db = create_connection(config.database).await?;
        ensure_schema(&db).await?;

        Ok(Self::from_parts(
            db,
            TenantProvisioner::new(config.tenants_root),
            TokenSigner::new(&config.token_secret, config.token_ttl_seconds),
        ))
    }

    /// Assemble the service from already-constructed components.
    pub fn from_parts(db: Db, tenants: TenantProvisioner, tokens: TokenSigner) -> Self {
        Self {
            users: UserStore::new(db),
            tenants,
            tokens,
        }
    }

    /// Access the tenant provisioner (for opening resolved stores).
    pub fn provisioner(&self) -> &TenantProvisioner {
        &self.tenants
    }

    /// Register a new account.
    ///
    /// Validation → duplicate guard → password hash → storage provisioning
    /// keyed by email → record insert. The pre-check gives a fast duplicate
    /// answer, but the unique index behind `UserStore::insert` is what holds
    /// under concurrent registration.
    pub async fn register(&self, req: RegisterRequest) -> Result<RegisterOutcome, AccountError> {
        validate::register(&req)?;

        if self.users.find_by_email(&req.email).await?.is_some() {
            return Err(AccountError::DuplicateEmail);
        }

        let digest =
            password::hash(&req.password).map_err(|e| AccountError::Internal(e.to_string()))?;

        let tenant = TenantName::new(req.email.clone());
        let pointer = self.tenants.provision(&tenant).await?;

        let user = self
            .users
            .insert(UserCreate {
                first_name: req.first_name,
                last_name: req.last_name,
                email: req.email,
                password_digest: digest,
                storage_pointer: pointer,
            })
            .await?;

        info!("registered account {}", user.email);
        Ok(RegisterOutcome { email: user.email })
    }

    /// Authenticate a registered account and issue a session token.
    pub async fn login(&self, req: LoginRequest) -> Result<Session, AccountError> {
        if req.email.trim().is_empty() || req.password.is_empty() {
            return Err(AccountError::MissingFields);
        }

        let user = self
            .users
            .find_by_email(&req.email)
            .await?
            .ok_or(AccountError::UnknownIdentity)?;

        if !password::verify(&req.password, &user.password_digest) {
            return Err(AccountError::BadCredentials);
        }

        let tenant = TenantName::new(user.email.clone());
        let token = self.tokens.issue(&tenant, &user.storage_pointer)?;

        info!("login for {}", user.email);
        Ok(Session {
            tenant,
            token,
            expires_in: self.tokens.ttl_seconds(),
        })
    }

    /// Create an ephemeral guest identity with its own isolated storage and
    /// issue a session token for it. No record enters the credential store.
    pub async fn guest_login(&self) -> Result<Session, AccountError> {
        let tenant = generate_guest_name();
        let pointer = self.tenants.provision(&tenant).await?;
        let token = self.tokens.issue(&tenant, &pointer)?;

        info!("issued guest session for {}", tenant);
        Ok(Session {
            tenant,
            token,
            expires_in: self.tokens.ttl_seconds(),
        })
    }

    /// Validate a token and return the storage pointer it carries.
    ///
    /// The token is self-contained; the credential store is not consulted.
    pub fn resolve_storage(&self, token: &SessionToken) -> Result<StoragePointer, AccountError> {
        let claims = self.tokens.validate(token)?;
        Ok(claims.storage_pointer())
    }
}

/// Generate a fresh guest identity.
///
/// The random component makes collisions negligible and prevents guests from
/// being enumerated; a counter would allow both.
fn generate_guest_name() -> TenantName {
    TenantName::new(format!("guest_{}", Uuid::new_v4().simple()))
}
