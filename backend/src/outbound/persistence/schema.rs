//! Diesel table definitions for the PostgreSQL schema.
//!
//! These definitions must match `backend/migrations` exactly. Regenerate with
//! `diesel print-schema` after changing a migration.

diesel::table! {
    /// Registered users.
    ///
    /// `login` carries a unique index; inserts and updates that collide with
    /// it fail with a unique violation.
    users (id) {
        id -> Uuid,
        login -> Varchar,
        password_hash -> Text,
        first_name -> Varchar,
        last_name -> Varchar,
        gender -> Varchar,
        birthday -> Date,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}
