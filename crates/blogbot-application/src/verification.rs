//! Email verification-code use case.
//!
//! The account subsystem mails a short-lived code and later checks it
//! against the cache. Codes expire after five minutes; mail delivery
//! itself is a transport concern and stays outside this crate.

use blogbot_core::error::{BotError, Result};
use blogbot_core::verification::{CODE_ERROR_MESSAGE, CODE_TTL, CodeCache};
use std::sync::Arc;

/// Sets and verifies expiring verification codes.
pub struct VerificationService {
    cache: Arc<dyn CodeCache>,
}

impl VerificationService {
    pub fn new(cache: Arc<dyn CodeCache>) -> Self {
        Self { cache }
    }

    /// Stores `code` for `email` with the standard five-minute expiry.
    pub async fn set_code(&self, email: &str, code: &str) -> Result<()> {
        self.cache.set(email, code, CODE_TTL).await
    }

    /// Returns the stored code for `email`, if present and unexpired.
    pub async fn get_code(&self, email: &str) -> Result<Option<String>> {
        self.cache.get(email).await
    }

    /// Checks `code` against the stored one.
    ///
    /// Mismatch and expiry are indistinguishable to the caller: both
    /// yield the same security error, never which side was wrong.
    pub async fn verify(&self, email: &str, code: &str) -> Result<()> {
        match self.cache.get(email).await? {
            Some(stored) if stored == code => Ok(()),
            _ => Err(BotError::security(CODE_ERROR_MESSAGE)),
        }
    }
}
