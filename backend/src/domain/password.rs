//! Plaintext password and stored hash primitives.

use std::fmt;

use zeroize::Zeroizing;

/// Minimum accepted password length, counted in characters.
pub const PASSWORD_MIN: usize = 8;

/// Domain error returned when a new password is rejected.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PasswordValidationError {
    /// The password was empty.
    #[error("password must not be empty")]
    Empty,
    /// The password is shorter than [`PASSWORD_MIN`].
    #[error("password must be at least {min} characters")]
    TooShort { min: usize },
}

/// Plaintext password chosen at registration or profile edit.
///
/// The buffer is zeroed on drop and the value never appears in `Debug`
/// output. Whitespace is significant and preserved.
///
/// # Examples
/// ```
/// use backend::domain::Password;
///
/// let password = Password::new("secretpw").expect("long enough");
/// assert_eq!(password.expose(), "secretpw");
/// assert!(Password::new("short").is_err());
/// ```
#[derive(Clone, PartialEq, Eq)]
pub struct Password(Zeroizing<String>);

impl Password {
    /// Validate a new password.
    pub fn new(password: impl Into<String>) -> Result<Self, PasswordValidationError> {
        let password = Zeroizing::new(password.into());
        if password.is_empty() {
            return Err(PasswordValidationError::Empty);
        }
        if password.chars().count() < PASSWORD_MIN {
            return Err(PasswordValidationError::TooShort { min: PASSWORD_MIN });
        }
        Ok(Self(password))
    }

    /// Borrow the plaintext for hashing.
    pub fn expose(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Debug for Password {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Password(***)")
    }
}

/// Salted one-way password hash in PHC string format.
#[derive(Clone, PartialEq, Eq)]
pub struct PasswordHash(String);

impl PasswordHash {
    /// Wrap an encoded hash produced by a hasher or read from storage.
    pub fn new(encoded: impl Into<String>) -> Self {
        Self(encoded.into())
    }

    /// Encoded PHC string.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Debug for PasswordHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("PasswordHash(***)")
    }
}
