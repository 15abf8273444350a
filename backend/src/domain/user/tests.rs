//! Tests for the domain user model.

use super::*;
use rstest::{fixture, rstest};
use serde_json::json;

const VALID_ID: &str = "3fa85f64-5717-4562-b3fc-2c963f66afa6";

fn date(raw: &str) -> NaiveDate {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").expect("fixture date")
}

#[fixture]
fn profile() -> UserProfile {
    UserProfile {
        first_name: PersonName::new("Alice").expect("first name"),
        last_name: PersonName::new("Liddell").expect("last name"),
        gender: Gender::Female,
        birthday: Birthday::new_as_of(date("1990-05-04"), date("2024-01-01")).expect("birthday"),
    }
}

#[fixture]
fn stored_user(profile: UserProfile) -> User {
    User::new(
        UserId::new(VALID_ID).expect("fixture id"),
        Login::new("alice").expect("fixture login"),
        PasswordHash::new("$argon2id$original"),
        profile,
    )
}

#[rstest]
#[case("", UserValidationError::EmptyId)]
#[case(" 3fa85f64-5717-4562-b3fc-2c963f66afa6", UserValidationError::InvalidId)]
#[case("not-a-uuid", UserValidationError::InvalidId)]
fn user_id_rejects_invalid_input(#[case] raw: &str, #[case] expected: UserValidationError) {
    assert_eq!(UserId::new(raw), Err(expected));
}

#[rstest]
fn user_id_serialises_as_string() {
    let id = UserId::new(VALID_ID).expect("fixture id");
    assert_eq!(serde_json::to_value(id).expect("serialise"), json!(VALID_ID));
}

#[rstest]
#[case("", UserValidationError::EmptyLogin)]
#[case("   ", UserValidationError::EmptyLogin)]
#[case("ab", UserValidationError::LoginTooShort { min: LOGIN_MIN })]
#[case("bad login", UserValidationError::LoginInvalidCharacters)]
#[case("bad$char", UserValidationError::LoginInvalidCharacters)]
fn login_rejects_invalid_input(#[case] raw: &str, #[case] expected: UserValidationError) {
    assert_eq!(Login::new(raw), Err(expected));
}

#[rstest]
#[case("alice", "alice")]
#[case("  bob.smith  ", "bob.smith")]
#[case("user_01-x", "user_01-x")]
fn login_accepts_and_trims(#[case] raw: &str, #[case] expected: &str) {
    assert_eq!(Login::new(raw).expect("valid login").as_ref(), expected);
}

#[rstest]
#[case("", UserValidationError::EmptyName)]
#[case("   ", UserValidationError::EmptyName)]
fn person_name_rejects_invalid_input(#[case] raw: &str, #[case] expected: UserValidationError) {
    assert_eq!(PersonName::new(raw), Err(expected));
}

#[rstest]
fn overlong_values_are_rejected() {
    let login = "a".repeat(LOGIN_MAX + 1);
    let name = "n".repeat(NAME_MAX + 1);
    assert_eq!(
        Login::new(login),
        Err(UserValidationError::LoginTooLong { max: LOGIN_MAX })
    );
    assert_eq!(
        PersonName::new(name),
        Err(UserValidationError::NameTooLong { max: NAME_MAX })
    );
}

#[rstest]
#[case("male", Gender::Male)]
#[case("female", Gender::Female)]
fn gender_parses_lowercase(#[case] raw: &str, #[case] expected: Gender) {
    assert_eq!(raw.parse::<Gender>(), Ok(expected));
}

#[rstest]
fn gender_rejects_unknown_values() {
    assert_eq!("Male".parse::<Gender>(), Err(UserValidationError::InvalidGender));
}

#[rstest]
fn birthday_rejects_future_dates() {
    let result = Birthday::new_as_of(date("2024-01-02"), date("2024-01-01"));
    assert_eq!(result, Err(UserValidationError::BirthdayInFuture));
}

#[rstest]
fn birthday_accepts_today() {
    let today = date("2024-01-01");
    let birthday = Birthday::new_as_of(today, today).expect("today is allowed");
    assert_eq!(birthday.date(), today);
}

#[rstest]
#[case("04/05/1990")]
#[case("1990-13-01")]
#[case("")]
fn birthday_parse_rejects_non_iso_dates(#[case] raw: &str) {
    assert_eq!(Birthday::parse(raw), Err(UserValidationError::InvalidBirthday));
}

#[rstest]
fn with_changes_keeps_hash_when_no_new_password(stored_user: User, profile: UserProfile) {
    let updated = stored_user.with_changes(
        Login::new("alice2").expect("login"),
        None,
        profile,
    );
    assert_eq!(updated.id(), stored_user.id());
    assert_eq!(updated.login().as_ref(), "alice2");
    assert_eq!(
        updated.password_hash().as_str(),
        stored_user.password_hash().as_str()
    );
}

#[rstest]
fn with_changes_replaces_hash_when_supplied(stored_user: User, profile: UserProfile) {
    let updated = stored_user.with_changes(
        stored_user.login().clone(),
        Some(PasswordHash::new("$argon2id$rotated")),
        profile,
    );
    assert_eq!(updated.password_hash().as_str(), "$argon2id$rotated");
}
