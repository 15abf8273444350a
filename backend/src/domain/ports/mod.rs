//! Domain ports and supporting types for the hexagonal boundary.
//!
//! Driving ports (`LoginService`, `UserCommand`, `UserProfileQuery`) are
//! called by inbound adapters; driven ports (`UserRepository`,
//! `PasswordHasher`) are implemented by outbound adapters.

mod macros;
pub(crate) use macros::define_port_error;

mod login_service;
mod password_hasher;
mod user_command;
mod user_profile_query;
mod user_repository;

pub use login_service::LoginService;
#[cfg(test)]
pub use password_hasher::MockPasswordHasher;
pub use password_hasher::{PasswordHashError, PasswordHasher};
pub use user_command::UserCommand;
pub use user_profile_query::UserProfileQuery;
#[cfg(test)]
pub use user_repository::MockUserRepository;
pub use user_repository::{UserPersistenceError, UserRepository};
