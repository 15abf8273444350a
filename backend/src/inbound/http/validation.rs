//! Shared validation helpers for inbound HTTP adapters.
//!
//! Every rejection becomes an `invalid_request` error whose details name the
//! offending field and a stable code.

use serde_json::json;

use crate::domain::{
    Birthday, Error, Gender, Login, Password, PasswordValidationError, PersonName, UserId,
    UserValidationError,
};

/// Validation error codes for HTTP request failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ErrorCode {
    MissingField,
    InvalidUuid,
    InvalidLogin,
    InvalidName,
    InvalidGender,
    InvalidDate,
    FutureDate,
    WeakPassword,
}

impl ErrorCode {
    fn as_str(self) -> &'static str {
        match self {
            ErrorCode::MissingField => "missing_field",
            ErrorCode::InvalidUuid => "invalid_uuid",
            ErrorCode::InvalidLogin => "invalid_login",
            ErrorCode::InvalidName => "invalid_name",
            ErrorCode::InvalidGender => "invalid_gender",
            ErrorCode::InvalidDate => "invalid_date",
            ErrorCode::FutureDate => "future_date",
            ErrorCode::WeakPassword => "weak_password",
        }
    }
}

/// Newtype wrapper for HTTP field names to provide type safety.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct FieldName(&'static str);

impl FieldName {
    pub(crate) const fn new(name: &'static str) -> Self {
        Self(name)
    }

    fn as_str(self) -> &'static str {
        self.0
    }
}

pub(crate) const LOGIN: FieldName = FieldName::new("login");
pub(crate) const PASSWORD: FieldName = FieldName::new("password");
pub(crate) const FIRST_NAME: FieldName = FieldName::new("firstName");
pub(crate) const LAST_NAME: FieldName = FieldName::new("lastName");
pub(crate) const GENDER: FieldName = FieldName::new("gender");
pub(crate) const BIRTHDAY: FieldName = FieldName::new("birthday");
pub(crate) const USER_ID: FieldName = FieldName::new("id");

fn field_error(field: FieldName, code: ErrorCode, message: impl Into<String>) -> Error {
    Error::invalid_request(message).with_details(json!({
        "field": field.as_str(),
        "code": code.as_str(),
    }))
}

pub(crate) fn missing_field_error(field: FieldName) -> Error {
    let name = field.as_str();
    field_error(
        field,
        ErrorCode::MissingField,
        format!("missing required field: {name}"),
    )
}

fn user_field_error(field: FieldName, err: &UserValidationError) -> Error {
    let code = match err {
        UserValidationError::EmptyId | UserValidationError::InvalidId => ErrorCode::InvalidUuid,
        UserValidationError::EmptyLogin
        | UserValidationError::LoginTooShort { .. }
        | UserValidationError::LoginTooLong { .. }
        | UserValidationError::LoginInvalidCharacters => ErrorCode::InvalidLogin,
        UserValidationError::EmptyName | UserValidationError::NameTooLong { .. } => {
            ErrorCode::InvalidName
        }
        UserValidationError::InvalidGender => ErrorCode::InvalidGender,
        UserValidationError::InvalidBirthday => ErrorCode::InvalidDate,
        UserValidationError::BirthdayInFuture => ErrorCode::FutureDate,
    };
    field_error(field, code, err.to_string())
}

pub(crate) fn parse_user_id(raw: &str) -> Result<UserId, Error> {
    UserId::new(raw).map_err(|err| user_field_error(USER_ID, &err))
}

pub(crate) fn parse_login(raw: &str) -> Result<Login, Error> {
    Login::new(raw).map_err(|err| user_field_error(LOGIN, &err))
}

pub(crate) fn parse_name(raw: &str, field: FieldName) -> Result<PersonName, Error> {
    PersonName::new(raw).map_err(|err| user_field_error(field, &err))
}

pub(crate) fn parse_gender(raw: &str) -> Result<Gender, Error> {
    raw.parse().map_err(|err| user_field_error(GENDER, &err))
}

pub(crate) fn parse_birthday(raw: &str) -> Result<Birthday, Error> {
    Birthday::parse(raw).map_err(|err| user_field_error(BIRTHDAY, &err))
}

pub(crate) fn parse_password(raw: String) -> Result<Password, Error> {
    Password::new(raw).map_err(|err| match err {
        PasswordValidationError::Empty => missing_field_error(PASSWORD),
        PasswordValidationError::TooShort { .. } => {
            field_error(PASSWORD, ErrorCode::WeakPassword, err.to_string())
        }
    })
}
