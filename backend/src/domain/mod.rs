//! Domain primitives, aggregates, and use-case services.
//!
//! Purpose: Define strongly typed domain entities used by the API and
//! persistence layers. Keep types immutable and document invariants and
//! serialisation contracts (serde) in each type's Rustdoc.
//!
//! Public surface:
//! - Error (alias to `error::Error`): API error response payload.
//! - ErrorCode (alias to `error::ErrorCode`): stable error identifier.
//! - User (alias to `user::User`): registered account and profile.
//! - UserService: registration, update, profile, and login use-cases.

pub mod auth;
pub mod error;
pub mod password;
pub mod ports;
pub mod trace_id;
pub mod user;
pub mod user_service;

pub use self::auth::{LoginCredentials, LoginValidationError};
pub use self::error::{Error, ErrorCode, ErrorValidationError};
pub use self::password::{PASSWORD_MIN, Password, PasswordHash, PasswordValidationError};
pub use self::trace_id::{TRACE_ID_HEADER, TraceId};
pub use self::user::{
    Birthday, Gender, LOGIN_MAX, LOGIN_MIN, Login, NAME_MAX, PersonName, User, UserCandidate,
    UserId, UserProfile, UserValidationError,
};
pub use self::user_service::{LOGIN_TAKEN_MESSAGE, UserService};

/// Convenient API result alias.
///
/// # Examples
/// ```
/// use actix_web::HttpResponse;
/// use backend::domain::{ApiResult, Error};
///
/// fn handler() -> ApiResult<HttpResponse> {
///     Err(Error::forbidden("nope"))
/// }
/// ```
pub type ApiResult<T> = Result<T, Error>;
