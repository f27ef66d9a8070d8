//! Diesel table definitions for the PostgreSQL schema.
//!
//! These definitions must match `backend/migrations` exactly.

diesel::table! {
    /// Registered accounts.
    users (id) {
        id -> Uuid,
        /// Unique, trimmed login name.
        username -> Varchar,
        /// Argon2id PHC string.
        password_hash -> Text,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Follow relation between users and provider series identifiers.
    user_series (user_id, series_id) {
        user_id -> Uuid,
        series_id -> Varchar,
        created_at -> Timestamptz,
    }
}

diesel::joinable!(user_series -> users (user_id));
diesel::allow_tables_to_appear_in_same_query!(users, user_series);
