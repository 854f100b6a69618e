//! Argon2 password digests for admin credentials.
//!
//! Digests are stored as PHC strings (`$argon2id$v=19$...`) so the algorithm
//! parameters and salt travel with the hash. Verification is delegated to
//! `argon2`, which compares in constant time.

use std::fmt;

use argon2::Argon2;
use argon2::password_hash::{
    self, PasswordHash, PasswordHasher, PasswordVerifier, SaltString,
};
use rand::rngs::OsRng;
use thiserror::Error;

/// Failures while producing or reading a password digest.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PasswordDigestError {
    /// The stored value is not a PHC string.
    #[error("stored password hash is malformed: {message}")]
    Malformed { message: String },
    /// Hashing or verification failed for a reason other than a mismatch.
    #[error("password hashing failed: {message}")]
    Hashing { message: String },
}

/// Argon2 PHC-encoded password digest.
///
/// # Examples
/// ```
/// use promo_backend::domain::PasswordDigest;
///
/// let digest = PasswordDigest::hash("s3cret").expect("hash password");
/// assert!(digest.verify("s3cret").expect("verify"));
/// assert!(!digest.verify("guess").expect("verify"));
/// ```
#[derive(Clone, PartialEq, Eq)]
pub struct PasswordDigest(String);

impl PasswordDigest {
    /// Hash a plaintext password with a fresh random salt.
    pub fn hash(password: &str) -> Result<Self, PasswordDigestError> {
        let salt = SaltString::generate(&mut OsRng);
        let digest = Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map_err(|err| PasswordDigestError::Hashing {
                message: err.to_string(),
            })?;
        Ok(Self(digest.to_string()))
    }

    /// Wrap a stored PHC string after checking that it parses.
    pub fn from_phc(encoded: impl Into<String>) -> Result<Self, PasswordDigestError> {
        let encoded = encoded.into();
        PasswordHash::new(&encoded).map_err(|err| PasswordDigestError::Malformed {
            message: err.to_string(),
        })?;
        Ok(Self(encoded))
    }

    /// Check a candidate password against the digest.
    ///
    /// Returns `Ok(false)` on mismatch and an error only when the digest
    /// itself cannot be used.
    pub fn verify(&self, candidate: &str) -> Result<bool, PasswordDigestError> {
        let parsed = PasswordHash::new(&self.0).map_err(|err| PasswordDigestError::Malformed {
            message: err.to_string(),
        })?;
        match Argon2::default().verify_password(candidate.as_bytes(), &parsed) {
            Ok(()) => Ok(true),
            Err(password_hash::Error::Password) => Ok(false),
            Err(err) => Err(PasswordDigestError::Hashing {
                message: err.to_string(),
            }),
        }
    }

    /// The PHC string for persistence.
    pub fn as_phc(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Debug for PasswordDigest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("PasswordDigest(<redacted>)")
    }
}
