//! Diesel table definitions for the PostgreSQL schema.
//!
//! These definitions must match `backend/migrations` exactly. They are used
//! by Diesel for compile-time query validation and type-safe SQL generation.

diesel::table! {
    /// User accounts.
    ///
    /// `id` is a store-generated identity. `created_at` and `updated_at`
    /// default to the insertion time; no trigger maintains `updated_at`.
    users (id) {
        /// Primary key, generated on insert.
        id -> Int8,
        /// Login email, unique.
        email -> Varchar,
        /// Password hash; written on insert and never selected.
        password_hash -> Varchar,
        first_name -> Varchar,
        middle_name -> Varchar,
        last_name -> Varchar,
        /// Avatar location, empty when unset.
        profile_image_url -> Varchar,
        is_blocked -> Bool,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}
