//! Promotional guessing-game backend.
//!
//! Players identify by phone number, spend a fixed budget of attempts and
//! earn a discount tier from their best result; administrators sign in
//! behind a lockout guard.

pub mod doc;
pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;
pub mod settings;
#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

/// Public OpenAPI surface used by Swagger UI and tooling.
pub use doc::ApiDoc;
pub use domain::TraceId;
pub use middleware::Trace;
