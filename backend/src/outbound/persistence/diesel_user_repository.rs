//! PostgreSQL-backed `UserRepository` implementation using Diesel ORM.
//!
//! Login uniqueness relies on the `users_login_key` unique index; the adapter
//! never checks for an existing login before writing.

use async_trait::async_trait;
use chrono::Utc;
use diesel::prelude::*;
use diesel::result::{DatabaseErrorKind, Error as DieselError};
use diesel_async::RunQueryDsl;
use tracing::{debug, warn};

use crate::domain::ports::{UserPersistenceError, UserRepository};
use crate::domain::{
    Birthday, Gender, Login, PasswordHash, PersonName, User, UserId, UserProfile,
    UserValidationError,
};

use super::models::{NewUserRow, UserChangeset, UserRow};
use super::pool::{DbPool, PoolError};
use super::schema::users;

const LOGIN_UNIQUE_CONSTRAINT: &str = "users_login_key";

/// Diesel-backed implementation of the user repository port.
#[derive(Clone)]
pub struct DieselUserRepository {
    pool: DbPool,
}

impl DieselUserRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> UserPersistenceError {
    match error {
        PoolError::Checkout { message } | PoolError::Build { message } => {
            UserPersistenceError::connection(message)
        }
    }
}

/// Map Diesel errors, attributing unique violations to `login`.
fn map_diesel_error(error: DieselError, login: &Login) -> UserPersistenceError {
    match &error {
        DieselError::DatabaseError(kind, info) => {
            debug!(?kind, message = info.message(), "diesel operation failed");
        }
        _ => debug!(
            error_type = %std::any::type_name_of_val(&error),
            "diesel operation failed"
        ),
    }

    match error {
        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, info) => {
            if info.constraint_name() == Some(LOGIN_UNIQUE_CONSTRAINT) {
                return UserPersistenceError::duplicate_login(login.as_ref());
            }
            warn!(
                constraint = ?info.constraint_name(),
                "unexpected unique violation on users"
            );
            UserPersistenceError::query("unexpected unique violation")
        }
        DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, _) => {
            UserPersistenceError::connection("database connection error")
        }
        DieselError::QueryBuilderError(_) => UserPersistenceError::query("database query error"),
        _ => UserPersistenceError::query("database error"),
    }
}

fn map_read_error(error: DieselError) -> UserPersistenceError {
    match error {
        DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, _) => {
            UserPersistenceError::connection("database connection error")
        }
        other => {
            debug!(error = %other, "user lookup failed");
            UserPersistenceError::query("database error")
        }
    }
}

fn corrupt(field: &str, err: &UserValidationError) -> UserPersistenceError {
    UserPersistenceError::query(format!("invalid {field} in database: {err}"))
}

/// Convert a database row to a domain user.
///
/// Rows are validated on the way in, so a failure here means the table was
/// written by something else.
fn row_to_user(row: UserRow) -> Result<User, UserPersistenceError> {
    let login = Login::new(&row.login).map_err(|err| corrupt("login", &err))?;
    let first_name = PersonName::new(&row.first_name).map_err(|err| corrupt("first name", &err))?;
    let last_name = PersonName::new(&row.last_name).map_err(|err| corrupt("last name", &err))?;
    let gender: Gender = row.gender.parse().map_err(|err| corrupt("gender", &err))?;

    Ok(User::new(
        UserId::from_uuid(row.id),
        login,
        PasswordHash::new(row.password_hash),
        UserProfile {
            first_name,
            last_name,
            gender,
            birthday: Birthday::from_stored(row.birthday),
        },
    ))
}

fn new_row(user: &User) -> NewUserRow<'_> {
    let profile = user.profile();
    NewUserRow {
        id: *user.id().as_uuid(),
        login: user.login().as_ref(),
        password_hash: user.password_hash().as_str(),
        first_name: profile.first_name.as_ref(),
        last_name: profile.last_name.as_ref(),
        gender: profile.gender.as_str(),
        birthday: profile.birthday.date(),
    }
}

fn changeset(user: &User) -> UserChangeset<'_> {
    let profile = user.profile();
    UserChangeset {
        login: user.login().as_ref(),
        password_hash: user.password_hash().as_str(),
        first_name: profile.first_name.as_ref(),
        last_name: profile.last_name.as_ref(),
        gender: profile.gender.as_str(),
        birthday: profile.birthday.date(),
        updated_at: Utc::now(),
    }
}

#[async_trait]
impl UserRepository for DieselUserRepository {
    async fn insert(&self, user: &User) -> Result<(), UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        diesel::insert_into(users::table)
            .values(new_row(user))
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(|err| map_diesel_error(err, user.login()))
    }

    async fn update(&self, user: &User) -> Result<(), UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let updated = diesel::update(users::table.filter(users::id.eq(user.id().as_uuid())))
            .set(changeset(user))
            .execute(&mut conn)
            .await
            .map_err(|err| map_diesel_error(err, user.login()))?;
        if updated == 0 {
            return Err(UserPersistenceError::not_found(user.id().to_string()));
        }
        Ok(())
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: Option<UserRow> = users::table
            .filter(users::id.eq(id.as_uuid()))
            .select(UserRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_read_error)?;
        row.map(row_to_user).transpose()
    }

    async fn find_by_login(&self, login: &Login) -> Result<Option<User>, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: Option<UserRow> = users::table
            .filter(users::login.eq(login.as_ref()))
            .select(UserRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_read_error)?;
        row.map(row_to_user).transpose()
    }
}
