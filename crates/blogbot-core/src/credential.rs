//! Admin credential gate.
//!
//! The admin password is never compared in plaintext: both the
//! configured secret and the submitted text are hashed twice with
//! SHA-256 and compared as uppercase hex digests. This mirrors how the
//! password is stored on the blog side, where only the double digest is
//! ever configured.

use sha2::{Digest, Sha256};

/// Returns the lowercase hex SHA-256 digest of `input`.
fn sha256_hex(input: &str) -> String {
    format!("{:x}", Sha256::digest(input.as_bytes()))
}

/// Double SHA-256 of `input`, uppercase hex.
pub fn double_sha256(input: &str) -> String {
    sha256_hex(&sha256_hex(input)).to_uppercase()
}

/// Verifies a submitted password against the configured secret.
///
/// Pure function, no side effects. Comparison is
/// `hash(hash(submitted))` against `hash(hash(configured))`, both
/// digests uppercase-normalized. The passwords themselves are compared
/// case-sensitively.
pub fn verify(submitted: &str, configured: &str) -> bool {
    double_sha256(submitted) == double_sha256(configured)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_matching_password_verifies() {
        assert!(verify("hunter2", "hunter2"));
    }

    #[test]
    fn test_mismatching_password_rejected() {
        assert!(!verify("hunter2", "hunter3"));
        assert!(!verify("", "hunter2"));
    }

    #[test]
    fn test_double_digest_is_uppercase_hex() {
        let digest = double_sha256("123");
        assert_eq!(digest.len(), 64);
        assert!(digest.chars().all(|c| c.is_ascii_hexdigit()));
        assert_eq!(digest, digest.to_uppercase());
    }

    #[test]
    fn test_case_sensitive_input() {
        // The digests are normalized, the passwords themselves are not.
        assert!(!verify("Secret", "secret"));
    }
}
