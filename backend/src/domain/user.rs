//! User data model.
//!
//! Every field of a [`User`] is a validated newtype so services and adapters
//! never handle raw strings. Construction goes through `new`/`try_from`
//! functions that enforce the invariants documented on each type.

use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

use chrono::{NaiveDate, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::password::{Password, PasswordHash};

/// Validation errors returned by the user field constructors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserValidationError {
    EmptyId,
    InvalidId,
    EmptyLogin,
    LoginTooShort { min: usize },
    LoginTooLong { max: usize },
    LoginInvalidCharacters,
    EmptyName,
    NameTooLong { max: usize },
    InvalidGender,
    InvalidBirthday,
    BirthdayInFuture,
}

impl fmt::Display for UserValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyId => write!(f, "user id must not be empty"),
            Self::InvalidId => write!(f, "user id must be a valid UUID"),
            Self::EmptyLogin => write!(f, "login must not be empty"),
            Self::LoginTooShort { min } => write!(f, "login must be at least {min} characters"),
            Self::LoginTooLong { max } => write!(f, "login must be at most {max} characters"),
            Self::LoginInvalidCharacters => write!(
                f,
                "login may only contain letters, numbers, dots, dashes, or underscores",
            ),
            Self::EmptyName => write!(f, "name must not be empty"),
            Self::NameTooLong { max } => write!(f, "name must be at most {max} characters"),
            Self::InvalidGender => write!(f, "gender must be either male or female"),
            Self::InvalidBirthday => write!(f, "birthday must be a YYYY-MM-DD date"),
            Self::BirthdayInFuture => write!(f, "birthday must not be in the future"),
        }
    }
}

impl std::error::Error for UserValidationError {}

/// Stable server-assigned user identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct UserId(Uuid);

impl UserId {
    /// Validate and construct a [`UserId`] from its string form.
    pub fn new(id: impl AsRef<str>) -> Result<Self, UserValidationError> {
        let id = id.as_ref();
        if id.is_empty() {
            return Err(UserValidationError::EmptyId);
        }
        if id.trim() != id {
            return Err(UserValidationError::InvalidId);
        }
        Uuid::parse_str(id)
            .map(Self)
            .map_err(|_| UserValidationError::InvalidId)
    }

    /// Generate a new random [`UserId`].
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }

    /// Wrap a UUID that has already been validated, e.g. a primary key.
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Access the underlying UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<UserId> for String {
    fn from(value: UserId) -> Self {
        value.to_string()
    }
}

impl TryFrom<String> for UserId {
    type Error = UserValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Minimum allowed length for a login.
pub const LOGIN_MIN: usize = 3;
/// Maximum allowed length for a login.
pub const LOGIN_MAX: usize = 32;

static LOGIN_RE: OnceLock<Regex> = OnceLock::new();

fn login_regex() -> &'static Regex {
    LOGIN_RE.get_or_init(|| {
        // Length is enforced separately; this regex constrains allowed characters.
        Regex::new("^[A-Za-z0-9_.-]+$")
            .unwrap_or_else(|error| panic!("login regex failed to compile: {error}"))
    })
}

/// Unique sign-in name chosen at registration.
///
/// ## Invariants
/// - Surrounding whitespace is trimmed before validation.
/// - Between [`LOGIN_MIN`] and [`LOGIN_MAX`] characters.
/// - Only ASCII letters, digits, `_`, `.` and `-`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Login(String);

impl Login {
    /// Validate and construct a [`Login`].
    ///
    /// # Examples
    /// ```
    /// use backend::domain::Login;
    ///
    /// let login = Login::new("  alice ").expect("valid login");
    /// assert_eq!(login.as_ref(), "alice");
    /// assert!(Login::new("a b").is_err());
    /// ```
    pub fn new(login: impl AsRef<str>) -> Result<Self, UserValidationError> {
        let login = login.as_ref().trim();
        if login.is_empty() {
            return Err(UserValidationError::EmptyLogin);
        }

        let length = login.chars().count();
        if length < LOGIN_MIN {
            return Err(UserValidationError::LoginTooShort { min: LOGIN_MIN });
        }
        if length > LOGIN_MAX {
            return Err(UserValidationError::LoginTooLong { max: LOGIN_MAX });
        }
        if !login_regex().is_match(login) {
            return Err(UserValidationError::LoginInvalidCharacters);
        }

        Ok(Self(login.to_owned()))
    }
}

impl AsRef<str> for Login {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for Login {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

impl From<Login> for String {
    fn from(value: Login) -> Self {
        value.0
    }
}

impl TryFrom<String> for Login {
    type Error = UserValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Maximum allowed length for a first or last name.
pub const NAME_MAX: usize = 64;

/// First or last name of a person.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PersonName(String);

impl PersonName {
    /// Validate and construct a [`PersonName`], trimming surrounding whitespace.
    pub fn new(name: impl AsRef<str>) -> Result<Self, UserValidationError> {
        let name = name.as_ref().trim();
        if name.is_empty() {
            return Err(UserValidationError::EmptyName);
        }
        if name.chars().count() > NAME_MAX {
            return Err(UserValidationError::NameTooLong { max: NAME_MAX });
        }
        Ok(Self(name.to_owned()))
    }
}

impl AsRef<str> for PersonName {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl From<PersonName> for String {
    fn from(value: PersonName) -> Self {
        value.0
    }
}

impl TryFrom<String> for PersonName {
    type Error = UserValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Gender recorded on the profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
}

impl Gender {
    /// Lowercase wire and storage representation.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Male => "male",
            Self::Female => "female",
        }
    }
}

impl FromStr for Gender {
    type Err = UserValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "male" => Ok(Self::Male),
            "female" => Ok(Self::Female),
            _ => Err(UserValidationError::InvalidGender),
        }
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Date of birth; never later than the day it is validated on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "NaiveDate", into = "NaiveDate")]
pub struct Birthday(NaiveDate);

impl Birthday {
    /// Validate against today's UTC date.
    pub fn new(date: NaiveDate) -> Result<Self, UserValidationError> {
        Self::new_as_of(date, Utc::now().date_naive())
    }

    /// Validate against an explicit reference date.
    pub fn new_as_of(date: NaiveDate, today: NaiveDate) -> Result<Self, UserValidationError> {
        if date > today {
            return Err(UserValidationError::BirthdayInFuture);
        }
        Ok(Self(date))
    }

    /// Parse a `YYYY-MM-DD` string and validate it against today's UTC date.
    pub fn parse(raw: &str) -> Result<Self, UserValidationError> {
        let date = NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
            .map_err(|_| UserValidationError::InvalidBirthday)?;
        Self::new(date)
    }

    /// Wrap a stored date without re-validating it.
    pub(crate) fn from_stored(date: NaiveDate) -> Self {
        Self(date)
    }

    /// Calendar date.
    pub fn date(self) -> NaiveDate {
        self.0
    }
}

impl From<Birthday> for NaiveDate {
    fn from(value: Birthday) -> Self {
        value.0
    }
}

impl TryFrom<NaiveDate> for Birthday {
    type Error = UserValidationError;

    fn try_from(value: NaiveDate) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Profile fields shared by registration, update, and storage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserProfile {
    pub first_name: PersonName,
    pub last_name: PersonName,
    pub gender: Gender,
    pub birthday: Birthday,
}

/// User-submitted values prior to persistence.
///
/// `password` is required when registering and optional when updating; an
/// absent password on update keeps the stored hash.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserCandidate {
    pub login: Login,
    pub password: Option<Password>,
    pub profile: UserProfile,
}

/// Persisted application user.
///
/// ## Invariants
/// - `login` is unique across all users; storage adapters enforce it.
/// - `password_hash` is a salted one-way hash, never plaintext.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    id: UserId,
    login: Login,
    password_hash: PasswordHash,
    profile: UserProfile,
}

impl User {
    /// Build a [`User`] from validated components.
    pub fn new(
        id: UserId,
        login: Login,
        password_hash: PasswordHash,
        profile: UserProfile,
    ) -> Self {
        Self {
            id,
            login,
            password_hash,
            profile,
        }
    }

    /// Stable user identifier.
    pub fn id(&self) -> &UserId {
        &self.id
    }

    /// Unique sign-in name.
    pub fn login(&self) -> &Login {
        &self.login
    }

    /// Stored password hash.
    pub fn password_hash(&self) -> &PasswordHash {
        &self.password_hash
    }

    /// Profile fields.
    pub fn profile(&self) -> &UserProfile {
        &self.profile
    }

    /// Apply an update, keeping the id and, when `password_hash` is `None`,
    /// the stored hash.
    pub fn with_changes(
        &self,
        login: Login,
        password_hash: Option<PasswordHash>,
        profile: UserProfile,
    ) -> Self {
        Self {
            id: self.id,
            login,
            password_hash: password_hash.unwrap_or_else(|| self.password_hash.clone()),
            profile,
        }
    }
}

#[cfg(test)]
mod tests;
