//! Field validators mirroring the user service's constraints.
//!
//! Each validator is a pure function from a value and its [`Rules`] to an
//! error string; the empty string means the value is valid. Nothing here
//! touches the network.
//!
//! # Rules
//!
//! - Login: 3 to 32 characters of letters, digits, `_`, `.` or `-`
//! - Password: at least 8 characters
//! - Names: at most 64 characters
//! - Birthday: `YYYY-MM-DD`, not in the future

use chrono::{NaiveDate, Utc};

use crate::field::Rules;
use crate::model::Gender;

/// Minimum login length accepted by the service.
pub const LOGIN_MIN: usize = 3;
/// Maximum login length accepted by the service.
pub const LOGIN_MAX: usize = 32;
/// Minimum password length accepted by the service.
pub const PASSWORD_MIN: usize = 8;
/// Maximum first or last name length accepted by the service.
pub const NAME_MAX: usize = 64;

/// Shown for an empty required field.
pub const REQUIRED: &str = "This field is required";
/// Shown when the login has the wrong length under the default bounds.
pub const LOGIN_LENGTH: &str = "Login must be 3 to 32 characters";
/// Shown when the login holds a disallowed character.
pub const LOGIN_CHARACTERS: &str = "Login may contain only letters, digits, '_', '.' and '-'";
/// Shown when the password is too short.
pub const PASSWORD_TOO_SHORT: &str = "Password must be at least 8 characters";
/// Shown when the confirmation differs from the password.
pub const PASSWORDS_DIFFER: &str = "Passwords do not match";
/// Shown when a name is too long.
pub const NAME_TOO_LONG: &str = "Must be at most 64 characters";
/// Shown when the birthday does not parse.
pub const DATE_FORMAT: &str = "Enter a date as YYYY-MM-DD";
/// Shown when the birthday lies in the future.
pub const DATE_IN_FUTURE: &str = "Birthday cannot be in the future";

const DATE_PATTERN: &str = "%Y-%m-%d";

fn ok() -> String {
    String::new()
}

fn fail(message: &str) -> String {
    message.to_owned()
}

/// Check the generic `required`, `min_length`, `max_length`, and `must_equal`
/// rules shared by every text field.
#[must_use]
pub fn validate_text(value: &str, rules: &Rules) -> String {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return if rules.required { fail(REQUIRED) } else { ok() };
    }
    let length = value.chars().count();
    if let Some(min) = rules.min_length.filter(|min| length < *min) {
        return format!("Must be at least {min} characters");
    }
    if let Some(max) = rules.max_length.filter(|max| length > *max) {
        return format!("Must be at most {max} characters");
    }
    if rules.must_equal.as_deref().is_some_and(|other| other != value) {
        return fail(PASSWORDS_DIFFER);
    }
    ok()
}

/// Validate a login against `rules.min_length` and `rules.max_length`,
/// defaulting to [`LOGIN_MIN`] and [`LOGIN_MAX`].
///
/// # Examples
///
/// ```
/// use user_form::Rules;
/// use user_form::validation::{LOGIN_CHARACTERS, validate_login};
///
/// let rules = Rules::required();
/// assert_eq!(validate_login("alice", &rules), "");
/// assert_eq!(validate_login("a b c", &rules), LOGIN_CHARACTERS);
/// ```
#[must_use]
pub fn validate_login(value: &str, rules: &Rules) -> String {
    let login = value.trim();
    if login.is_empty() {
        return validate_text(login, rules);
    }
    let min = rules.min_length.unwrap_or(LOGIN_MIN);
    let max = rules.max_length.unwrap_or(LOGIN_MAX);
    if !(min..=max).contains(&login.chars().count()) {
        return format!("Login must be {min} to {max} characters");
    }
    if !login.chars().all(is_login_char) {
        return fail(LOGIN_CHARACTERS);
    }
    ok()
}

const fn is_login_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '-')
}

/// Validate the primary password; whitespace counts towards the length.
#[must_use]
pub fn validate_password(value: &str, rules: &Rules) -> String {
    if value.is_empty() {
        return validate_text(value, rules);
    }
    if value.chars().count() < rules.min_length.unwrap_or(PASSWORD_MIN) {
        return fail(PASSWORD_TOO_SHORT);
    }
    ok()
}

/// Validate the password confirmation against `rules.must_equal`.
#[must_use]
pub fn validate_confirmation(value: &str, rules: &Rules) -> String {
    if value.is_empty() {
        return validate_text(value, rules);
    }
    if rules.must_equal.as_deref() != Some(value) {
        return fail(PASSWORDS_DIFFER);
    }
    ok()
}

/// Validate a first or last name.
#[must_use]
pub fn validate_name(value: &str, rules: &Rules) -> String {
    let name = value.trim();
    if name.chars().count() > rules.max_length.unwrap_or(NAME_MAX) {
        return fail(NAME_TOO_LONG);
    }
    validate_text(name, rules)
}

/// Validate the gender radio selection.
#[must_use]
pub fn validate_gender(value: &Option<Gender>, rules: &Rules) -> String {
    if value.is_none() && rules.required {
        fail(REQUIRED)
    } else {
        ok()
    }
}

/// Validate a birthday against today's UTC date.
#[must_use]
pub fn validate_birthday(value: &str, rules: &Rules) -> String {
    validate_birthday_as_of(value, rules, Utc::now().date_naive())
}

/// Validate a birthday against an explicit `today`.
#[must_use]
pub fn validate_birthday_as_of(value: &str, rules: &Rules, today: NaiveDate) -> String {
    let raw = value.trim();
    if raw.is_empty() {
        return validate_text(raw, rules);
    }
    match NaiveDate::parse_from_str(raw, DATE_PATTERN) {
        Ok(date) if date > today => fail(DATE_IN_FUTURE),
        Ok(_) => ok(),
        Err(_) => fail(DATE_FORMAT),
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 1).expect("date")
    }

    #[rstest]
    #[case("alice", "")]
    #[case("  alice  ", "")]
    #[case("a.b-c_1", "")]
    #[case("", REQUIRED)]
    #[case("   ", REQUIRED)]
    #[case("ab", LOGIN_LENGTH)]
    #[case("alice smith", LOGIN_CHARACTERS)]
    #[case("al!ce", LOGIN_CHARACTERS)]
    fn login_rules(#[case] value: &str, #[case] expected: &str) {
        assert_eq!(validate_login(value, &Rules::required()), expected);
    }

    #[rstest]
    fn login_over_max_is_rejected() {
        let long = "a".repeat(LOGIN_MAX + 1);
        assert_eq!(validate_login(&long, &Rules::required()), LOGIN_LENGTH);
    }

    #[rstest]
    #[case("bob", "Login must be 4 to 6 characters")]
    #[case("bobby", "")]
    #[case("bobbyjoe", "Login must be 4 to 6 characters")]
    fn login_length_follows_rules(#[case] value: &str, #[case] expected: &str) {
        let rules = Rules::required().with_min_length(4).with_max_length(6);
        assert_eq!(validate_login(value, &rules), expected);
    }

    #[rstest]
    #[case("secretpw", "")]
    #[case("short", PASSWORD_TOO_SHORT)]
    #[case("", REQUIRED)]
    fn password_rules(#[case] value: &str, #[case] expected: &str) {
        let rules = Rules::required().with_min_length(PASSWORD_MIN);
        assert_eq!(validate_password(value, &rules), expected);
    }

    #[rstest]
    fn optional_password_may_be_empty() {
        let rules = Rules::optional().with_min_length(PASSWORD_MIN);
        assert_eq!(validate_password("", &rules), "");
    }

    #[rstest]
    #[case("secretpw", "secretpw", "")]
    #[case("secretpw", "secretpx", PASSWORDS_DIFFER)]
    #[case("secretpw", "", REQUIRED)]
    fn confirmation_must_equal_password(
        #[case] password: &str,
        #[case] confirmation: &str,
        #[case] expected: &str,
    ) {
        let rules = Rules::required().with_must_equal(password);
        assert_eq!(validate_confirmation(confirmation, &rules), expected);
    }

    #[rstest]
    #[case("Alice", "")]
    #[case("", REQUIRED)]
    #[case(" ", REQUIRED)]
    fn name_rules(#[case] value: &str, #[case] expected: &str) {
        assert_eq!(validate_name(value, &Rules::required()), expected);
    }

    #[rstest]
    fn name_over_max_is_rejected() {
        let long = "A".repeat(NAME_MAX + 1);
        assert_eq!(validate_name(&long, &Rules::required()), NAME_TOO_LONG);
    }

    #[rstest]
    #[case(None, REQUIRED)]
    #[case(Some(Gender::Male), "")]
    fn gender_rules(#[case] value: Option<Gender>, #[case] expected: &str) {
        assert_eq!(validate_gender(&value, &Rules::required()), expected);
    }

    #[rstest]
    #[case("1990-05-04", "")]
    #[case("2024-06-01", "")]
    #[case("2024-06-02", DATE_IN_FUTURE)]
    #[case("04/05/1990", DATE_FORMAT)]
    #[case("", REQUIRED)]
    fn birthday_rules(#[case] value: &str, #[case] expected: &str) {
        assert_eq!(
            validate_birthday_as_of(value, &Rules::required(), today()),
            expected
        );
    }

    #[rstest]
    fn generic_text_checks_lengths() {
        let rules = Rules::required().with_min_length(2).with_max_length(3);
        assert_eq!(validate_text("a", &rules), "Must be at least 2 characters");
        assert_eq!(validate_text("abcd", &rules), "Must be at most 3 characters");
        assert_eq!(validate_text("abc", &rules), "");
    }
}
