//! Email verification-code contract.
//!
//! The account subsystem sends a short-lived code by mail and later
//! checks it. Only the expiring-secret contract lives here; mail
//! delivery belongs to the transport side.

use crate::error::Result;
use async_trait::async_trait;
use std::time::Duration;

/// How long a verification code stays valid.
pub const CODE_TTL: Duration = Duration::from_secs(300);

/// User-facing message for a wrong or expired code.
pub const CODE_ERROR_MESSAGE: &str = "Verification code error";

/// An expiring key/value cache for verification codes.
///
/// Keyed by email address; the implementation owns expiry. An expired
/// code reads back as absent.
#[async_trait]
pub trait CodeCache: Send + Sync {
    /// Stores `code` under `email` for `ttl`.
    async fn set(&self, email: &str, code: &str, ttl: Duration) -> Result<()>;

    /// Returns the stored code for `email`, if present and unexpired.
    async fn get(&self, email: &str) -> Result<Option<String>>;
}
