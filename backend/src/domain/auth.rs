//! Admin login credentials.
//!
//! Keep inbound payload parsing outside the domain by exposing constructors
//! that validate string inputs before a handler talks to a port or service.

use std::fmt;

use zeroize::Zeroizing;

use super::admin::AdminId;

/// Domain error returned when login payload values are invalid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoginValidationError {
    /// Admin id was missing or not a UUID.
    InvalidAdminId,
    /// Password was blank.
    EmptyPassword,
}

impl fmt::Display for LoginValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidAdminId => write!(f, "admin id must be a valid UUID"),
            Self::EmptyPassword => write!(f, "password must not be empty"),
        }
    }
}

impl std::error::Error for LoginValidationError {}

/// Validated admin login credentials.
///
/// ## Invariants
/// - `admin_id` is a parsed UUID; surrounding whitespace is ignored.
/// - `password` is required to be non-empty but retains caller-provided
///   whitespace to avoid surprising credential comparisons. It is wiped from
///   memory on drop.
///
/// # Examples
/// ```
/// use promo_backend::domain::AdminCredentials;
///
/// let creds = AdminCredentials::try_from_parts(
///     "3fa85f64-5717-4562-b3fc-2c963f66afa6",
///     "password",
/// )
/// .unwrap();
/// assert_eq!(creds.password(), "password");
/// ```
#[derive(Clone, PartialEq, Eq)]
pub struct AdminCredentials {
    admin_id: AdminId,
    password: Zeroizing<String>,
}

impl AdminCredentials {
    /// Construct credentials from raw admin id/password inputs.
    pub fn try_from_parts(admin_id: &str, password: &str) -> Result<Self, LoginValidationError> {
        let admin_id =
            AdminId::new(admin_id.trim()).map_err(|_| LoginValidationError::InvalidAdminId)?;

        if password.is_empty() {
            return Err(LoginValidationError::EmptyPassword);
        }

        Ok(Self {
            admin_id,
            password: Zeroizing::new(password.to_owned()),
        })
    }

    pub fn admin_id(&self) -> AdminId {
        self.admin_id
    }

    /// Password string provided by the caller.
    pub fn password(&self) -> &str {
        self.password.as_str()
    }
}

impl fmt::Debug for AdminCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AdminCredentials")
            .field("admin_id", &self.admin_id)
            .field("password", &"<redacted>")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use rstest::rstest;

    const ADMIN_ID: &str = "3fa85f64-5717-4562-b3fc-2c963f66afa6";

    #[rstest]
    #[case("", "pw", LoginValidationError::InvalidAdminId)]
    #[case("   ", "pw", LoginValidationError::InvalidAdminId)]
    #[case("admin", "pw", LoginValidationError::InvalidAdminId)]
    #[case(ADMIN_ID, "", LoginValidationError::EmptyPassword)]
    fn invalid_credentials(
        #[case] admin_id: &str,
        #[case] password: &str,
        #[case] expected: LoginValidationError,
    ) {
        let err = AdminCredentials::try_from_parts(admin_id, password)
            .expect_err("invalid inputs must fail");
        assert_eq!(err, expected);
    }

    #[rstest]
    #[case("  3fa85f64-5717-4562-b3fc-2c963f66afa6  ", "secret")]
    #[case(ADMIN_ID, " correct horse battery staple ")]
    fn valid_credentials_keep_password_verbatim(#[case] admin_id: &str, #[case] password: &str) {
        let creds = AdminCredentials::try_from_parts(admin_id, password)
            .expect("valid inputs should succeed");
        assert_eq!(creds.admin_id().to_string(), ADMIN_ID);
        assert_eq!(creds.password(), password);
    }

    #[rstest]
    fn debug_hides_password() {
        let creds = AdminCredentials::try_from_parts(ADMIN_ID, "hunter2").expect("valid");
        assert!(!format!("{creds:?}").contains("hunter2"));
    }
}
