//! Shared-key verification and short-lived token issuance.
//!
//! A single administrator-chosen key is stored only as an Argon2id digest.
//! Callers that present the key receive a random token, recorded in a TTL
//! store; later requests present the token instead of the key.

pub mod credential;
pub mod digest_store;
pub mod ephemeral;
pub mod error;
pub mod guard;
pub mod hasher;
pub mod issuer;
pub mod service;
pub mod token;
pub mod types;
pub mod validator;

pub use credential::CredentialStore;
pub use digest_store::{DigestStore, FileDigestStore, MemoryDigestStore};
pub use ephemeral::{EphemeralStore, MemoryEphemeralStore};
pub use error::{AuthError, Result, StoreError};
pub use guard::{Rejection, RejectionKind, TokenGuard};
pub use hasher::SecretHasher;
pub use issuer::TokenIssuer;
pub use service::KeyLock;
pub use token::TokenGenerator;
pub use types::{SecretDigest, SecretMetadata, Token};
pub use validator::TokenValidator;
