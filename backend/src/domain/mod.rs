//! Domain primitives, policies and services.
//!
//! Purpose: define the strongly typed entities of the guessing game and the
//! use-case services behind the driving ports. Nothing here knows about HTTP
//! or SQL; adapters depend on this module, never the reverse.
//!
//! Public surface:
//! - `PhoneNumber`: normalised Israeli mobile number identifying a player.
//! - `User`: player identity with attempt budget, best result and discount.
//! - `DiscountRanges`: ordered tiers resolving a result to a discount.
//! - `Admin` and `LockoutPolicy`: admin accounts and the login lockout.
//! - `Error` and `ErrorCode`: transport-agnostic failure payload.

pub mod admin;
pub mod admin_auth;
pub mod attempt;
pub mod attempt_ledger;
pub mod auth;
pub mod error;
pub mod game_settings;
pub mod game_settings_service;
pub mod password;
pub mod phone;
pub mod player;
pub mod player_directory;
pub mod ports;
pub mod trace_id;

pub use self::admin::{
    Admin, AdminAction, AdminAuditEntry, AdminId, AdminValidationError,
    DEFAULT_LOCKOUT_MINUTES, DEFAULT_LOCKOUT_THRESHOLD, LockoutPolicy, LoginDecision,
};
pub use self::admin_auth::AdminAuthService;
pub use self::attempt::{Attempt, AttemptId, AttemptReceipt};
pub use self::attempt_ledger::{AttemptLedgerService, NO_MATCHING_RANGE_CODE};
pub use self::auth::{AdminCredentials, LoginValidationError};
pub use self::error::{Error, ErrorCode, ErrorValidationError, TRACE_ID_HEADER};
pub use self::game_settings::{
    DiscountPercent, DiscountRange, DiscountRangeError, DiscountRanges, GameSettings,
    NoMatchingRange,
};
pub use self::game_settings_service::GameSettingsService;
pub use self::password::{PasswordDigest, PasswordDigestError};
pub use self::phone::{PhoneNumber, PhoneValidationError};
pub use self::player::{
    AttemptRejection, Difference, PLAYER_NAME_MAX, PlayerName, PlayerValidationError, User,
    UserId, UserSnapshot,
};
pub use self::player_directory::PlayerDirectoryService;
pub use self::trace_id::TraceId;

/// Convenient API result alias.
///
/// # Examples
/// ```
/// use actix_web::HttpResponse;
/// use promo_backend::domain::{ApiResult, Error};
///
/// fn handler() -> ApiResult<HttpResponse> {
///     Err(Error::forbidden("nope"))
/// }
/// ```
pub type ApiResult<T> = Result<T, Error>;
