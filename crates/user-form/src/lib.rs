//! Registration and profile edit form logic for the training manager.
//!
//! The crate holds field state, runs per-field validators on every change,
//! and submits create-or-update requests through the [`UserGateway`] port.
//! Rendering and navigation belong to the host UI; the form only reports
//! which [`View`] to show next.
//!
//! # Example
//!
//! ```
//! use user_form::{FieldId, FormMode, UserForm};
//!
//! let mut form = UserForm::new(FormMode::Register);
//! form.set_field(FieldId::Login, "alice");
//! form.set_field(FieldId::Password, "short");
//!
//! assert_eq!(form.error(FieldId::Password), "Password must be at least 8 characters");
//! assert!(!form.is_valid());
//! ```

mod error;
mod field;
mod form;
mod gateway;
pub mod http;
mod model;
pub mod validation;

pub use error::GatewayError;
pub use field::{FieldValue, FormField, Rules, Validator};
pub use form::{
    CONFLICT_MESSAGE, FieldId, FormMode, GENERIC_FAILURE_MESSAGE, SubmitOutcome, UserForm, View,
};
pub use gateway::UserGateway;
pub use http::ApiUserGateway;
pub use model::{Gender, UnknownGender, UserPayload, UserProfile};
