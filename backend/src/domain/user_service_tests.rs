//! Tests for the user service.

use std::sync::Arc;

use super::*;
use crate::domain::ports::{MockPasswordHasher, MockUserRepository};
use crate::domain::{Birthday, ErrorCode, Gender, PersonName, UserProfile};
use chrono::NaiveDate;
use rstest::{fixture, rstest};

const STORED_HASH: &str = "$argon2id$v=19$stored";
const FRESH_HASH: &str = "$argon2id$v=19$fresh";

fn profile(first_name: &str) -> UserProfile {
    let birthday = NaiveDate::from_ymd_opt(1990, 5, 4).expect("fixture date");
    UserProfile {
        first_name: PersonName::new(first_name).expect("first name"),
        last_name: PersonName::new("Liddell").expect("last name"),
        gender: Gender::Female,
        birthday: Birthday::new(birthday).expect("birthday"),
    }
}

fn candidate(login: &str, password: Option<&str>) -> UserCandidate {
    UserCandidate {
        login: Login::new(login).expect("login"),
        password: password.map(|raw| Password::new(raw).expect("password")),
        profile: profile("Alice"),
    }
}

#[fixture]
fn stored_user() -> User {
    User::new(
        UserId::random(),
        Login::new("alice").expect("login"),
        PasswordHash::new(STORED_HASH),
        profile("Alice"),
    )
}

fn hashing_hasher() -> MockPasswordHasher {
    let mut hasher = MockPasswordHasher::new();
    hasher
        .expect_hash()
        .returning(|_| Ok(PasswordHash::new(FRESH_HASH)));
    hasher
}

fn make_service(
    repo: MockUserRepository,
    hasher: MockPasswordHasher,
) -> UserService<MockUserRepository, MockPasswordHasher> {
    UserService::new(Arc::new(repo), Arc::new(hasher))
}

#[tokio::test]
async fn create_stores_hashed_password() {
    let mut repo = MockUserRepository::new();
    repo.expect_insert()
        .withf(|user: &User| {
            user.login().as_ref() == "alice" && user.password_hash().as_str() == FRESH_HASH
        })
        .times(1)
        .return_once(|_| Ok(()));

    let service = make_service(repo, hashing_hasher());
    service
        .create(candidate("alice", Some("secretpw")))
        .await
        .expect("create succeeds");
}

#[tokio::test]
async fn create_maps_duplicate_login_to_conflict() {
    let mut repo = MockUserRepository::new();
    repo.expect_insert()
        .times(1)
        .return_once(|_| Err(UserPersistenceError::duplicate_login("alice")));

    let service = make_service(repo, hashing_hasher());
    let error = service
        .create(candidate("alice", Some("secretpw")))
        .await
        .expect_err("conflict");

    assert_eq!(error.code(), ErrorCode::Conflict);
    assert_eq!(error.message(), LOGIN_TAKEN_MESSAGE);
}

#[tokio::test]
async fn create_requires_password() {
    let mut repo = MockUserRepository::new();
    repo.expect_insert().times(0);
    let mut hasher = MockPasswordHasher::new();
    hasher.expect_hash().times(0);

    let service = make_service(repo, hasher);
    let error = service
        .create(candidate("alice", None))
        .await
        .expect_err("password required");

    assert_eq!(error.code(), ErrorCode::InvalidRequest);
}

#[rstest]
#[case(UserPersistenceError::connection("refused"), ErrorCode::ServiceUnavailable)]
#[case(UserPersistenceError::query("syntax"), ErrorCode::InternalError)]
#[tokio::test]
async fn create_maps_persistence_failures(
    #[case] failure: UserPersistenceError,
    #[case] expected: ErrorCode,
) {
    let mut repo = MockUserRepository::new();
    repo.expect_insert().times(1).return_once(move |_| Err(failure));

    let service = make_service(repo, hashing_hasher());
    let error = service
        .create(candidate("alice", Some("secretpw")))
        .await
        .expect_err("persistence failure");

    assert_eq!(error.code(), expected);
}

#[tokio::test]
async fn create_reports_hashing_failure_as_internal() {
    let mut repo = MockUserRepository::new();
    repo.expect_insert().times(0);
    let mut hasher = MockPasswordHasher::new();
    hasher
        .expect_hash()
        .return_once(|_| Err(PasswordHashError::hash("out of memory")));

    let service = make_service(repo, hasher);
    let error = service
        .create(candidate("alice", Some("secretpw")))
        .await
        .expect_err("hash failure");

    assert_eq!(error.code(), ErrorCode::InternalError);
}

#[rstest]
#[tokio::test]
async fn update_without_password_keeps_stored_hash(stored_user: User) {
    let id = *stored_user.id();
    let mut repo = MockUserRepository::new();
    repo.expect_find_by_id()
        .times(1)
        .return_once(move |_| Ok(Some(stored_user)));
    repo.expect_update()
        .withf(move |user: &User| {
            *user.id() == id
                && user.login().as_ref() == "alice2"
                && user.password_hash().as_str() == STORED_HASH
        })
        .times(1)
        .return_once(|_| Ok(()));
    let mut hasher = MockPasswordHasher::new();
    hasher.expect_hash().times(0);

    let service = make_service(repo, hasher);
    service
        .update(&id, candidate("alice2", None))
        .await
        .expect("update succeeds");
}

#[rstest]
#[tokio::test]
async fn update_with_password_rehashes(stored_user: User) {
    let id = *stored_user.id();
    let mut repo = MockUserRepository::new();
    repo.expect_find_by_id()
        .times(1)
        .return_once(move |_| Ok(Some(stored_user)));
    repo.expect_update()
        .withf(|user: &User| user.password_hash().as_str() == FRESH_HASH)
        .times(1)
        .return_once(|_| Ok(()));

    let service = make_service(repo, hashing_hasher());
    service
        .update(&id, candidate("alice", Some("newsecret")))
        .await
        .expect("update succeeds");
}

#[tokio::test]
async fn update_unknown_user_is_not_found() {
    let mut repo = MockUserRepository::new();
    repo.expect_find_by_id().times(1).return_once(|_| Ok(None));
    repo.expect_update().times(0);

    let service = make_service(repo, MockPasswordHasher::new());
    let error = service
        .update(&UserId::random(), candidate("alice", None))
        .await
        .expect_err("not found");

    assert_eq!(error.code(), ErrorCode::NotFound);
}

#[rstest]
#[tokio::test]
async fn update_to_taken_login_is_conflict(stored_user: User) {
    let id = *stored_user.id();
    let mut repo = MockUserRepository::new();
    repo.expect_find_by_id()
        .times(1)
        .return_once(move |_| Ok(Some(stored_user)));
    repo.expect_update()
        .times(1)
        .return_once(|_| Err(UserPersistenceError::duplicate_login("bob")));

    let service = make_service(repo, MockPasswordHasher::new());
    let error = service
        .update(&id, candidate("bob", None))
        .await
        .expect_err("conflict");

    assert_eq!(error.code(), ErrorCode::Conflict);
}

#[rstest]
#[tokio::test]
async fn update_propagates_persistence_failure(stored_user: User) {
    let id = *stored_user.id();
    let mut repo = MockUserRepository::new();
    repo.expect_find_by_id()
        .times(1)
        .return_once(move |_| Ok(Some(stored_user)));
    repo.expect_update()
        .times(1)
        .return_once(|_| Err(UserPersistenceError::query("deadlock detected")));

    let service = make_service(repo, MockPasswordHasher::new());
    let error = service
        .update(&id, candidate("alice", None))
        .await
        .expect_err("failure surfaces");

    assert_eq!(error.code(), ErrorCode::InternalError);
}

#[rstest]
#[tokio::test]
async fn fetch_profile_returns_stored_user(stored_user: User) {
    let id = *stored_user.id();
    let expected = stored_user.clone();
    let mut repo = MockUserRepository::new();
    repo.expect_find_by_id()
        .times(1)
        .return_once(move |_| Ok(Some(stored_user)));

    let service = make_service(repo, MockPasswordHasher::new());
    let user = service.fetch_profile(&id).await.expect("profile");

    assert_eq!(user, expected);
}

#[rstest]
#[case(true, None)]
#[case(false, Some(ErrorCode::Unauthorized))]
#[tokio::test]
async fn authenticate_checks_password(
    stored_user: User,
    #[case] password_matches: bool,
    #[case] expected_error: Option<ErrorCode>,
) {
    let id = *stored_user.id();
    let mut repo = MockUserRepository::new();
    repo.expect_find_by_login()
        .times(1)
        .return_once(move |_| Ok(Some(stored_user)));
    let mut hasher = MockPasswordHasher::new();
    hasher
        .expect_verify()
        .withf(|candidate: &str, hash: &PasswordHash| {
            candidate == "secretpw" && hash.as_str() == STORED_HASH
        })
        .times(1)
        .return_once(move |_, _| Ok(password_matches));

    let service = make_service(repo, hasher);
    let credentials = LoginCredentials::try_from_parts("alice", "secretpw").expect("credentials");
    let result = service.authenticate(&credentials).await;

    match expected_error {
        None => assert_eq!(result.expect("authenticated"), id),
        Some(code) => assert_eq!(result.expect_err("rejected").code(), code),
    }
}

#[rstest]
#[case("ghost")]
#[case("not a login")]
#[tokio::test]
async fn authenticate_rejects_unknown_login(#[case] login: &str) {
    let mut repo = MockUserRepository::new();
    repo.expect_find_by_login().returning(|_| Ok(None));
    let mut hasher = MockPasswordHasher::new();
    hasher.expect_verify().times(0);

    let service = make_service(repo, hasher);
    let credentials = LoginCredentials::try_from_parts(login, "secretpw").expect("credentials");
    let error = service
        .authenticate(&credentials)
        .await
        .expect_err("rejected");

    assert_eq!(error.code(), ErrorCode::Unauthorized);
}

#[tokio::test]
async fn create_hashes_off_the_runtime_thread() {
    let runtime_thread = std::thread::current().id();
    let hashed_on = Arc::new(std::sync::Mutex::new(None));
    let recorder = Arc::clone(&hashed_on);
    let mut hasher = MockPasswordHasher::new();
    hasher.expect_hash().returning(move |_| {
        *recorder.lock().expect("recorder lock") = Some(std::thread::current().id());
        Ok(PasswordHash::new(FRESH_HASH))
    });
    let mut repo = MockUserRepository::new();
    repo.expect_insert().returning(|_| Ok(()));

    let service = make_service(repo, hasher);
    service
        .create(candidate("alice", Some("secretpw")))
        .await
        .expect("created");

    let hashed_on = hashed_on.lock().expect("recorder lock").take();
    assert!(matches!(hashed_on, Some(thread) if thread != runtime_thread));
}

#[rstest]
#[tokio::test]
async fn authenticate_verifies_off_the_runtime_thread(stored_user: User) {
    let runtime_thread = std::thread::current().id();
    let verified_on = Arc::new(std::sync::Mutex::new(None));
    let recorder = Arc::clone(&verified_on);
    let mut hasher = MockPasswordHasher::new();
    hasher.expect_verify().returning(move |_, _| {
        *recorder.lock().expect("recorder lock") = Some(std::thread::current().id());
        Ok(true)
    });
    let mut repo = MockUserRepository::new();
    let found = stored_user.clone();
    repo.expect_find_by_login()
        .returning(move |_| Ok(Some(found.clone())));

    let service = make_service(repo, hasher);
    let credentials = LoginCredentials::try_from_parts("alice", "secretpw").expect("credentials");
    service
        .authenticate(&credentials)
        .await
        .expect("authenticated");

    let verified_on = verified_on.lock().expect("recorder lock").take();
    assert!(matches!(verified_on, Some(thread) if thread != runtime_thread));
}
