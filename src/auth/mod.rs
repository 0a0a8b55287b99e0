//! Credential hashing and session tokens.
//!
//! Two stateless building blocks of the identity layer:
//!
//! - **Passwords**: Argon2id one-way hashing with embedded salts. Digests go
//!   into the credential store; plaintexts never leave the request that
//!   carried them.
//! - **Session tokens**: signed, time-bounded JWTs binding a tenant identity
//!   to its storage pointer. Self-contained, so protected calls authenticate
//!   without a server-side session table.
//!
//! ## Security model
//!
//! - The signing secret is injected at startup; there is no ambient global.
//! - Signature verification happens before expiry or claim inspection.
//! - Tampered and expired tokens are distinct internally but identical to
//!   callers at the HTTP boundary.

pub mod password;
mod token;

pub use token::{DEFAULT_TTL_SECONDS, SessionClaims, TokenSigner};
