//! Diesel table definitions for the PostgreSQL schema.
//!
//! These definitions must match the database migrations exactly. They are used
//! by Diesel for compile-time query validation and type-safe SQL generation.
//!
//! # Maintenance
//!
//! When migrations change the schema, update this file to match. The
//! `diesel print-schema` command can generate these definitions from a live
//! database.

diesel::table! {
    /// Named roles. `name` is unique and compared case-sensitively.
    roles (id) {
        id -> Int4,
        name -> Text,
    }
}

diesel::table! {
    /// Assignable permissions.
    ///
    /// `name` is constrained by a `CHECK` to the known permission names.
    permissions (id) {
        id -> Int4,
        name -> Text,
        description -> Nullable<Text>,
    }
}

diesel::table! {
    /// Role grants. Both foreign keys cascade on delete.
    role_permissions (role_id, permission_id) {
        role_id -> Int4,
        permission_id -> Int4,
    }
}

diesel::table! {
    /// User accounts.
    ///
    /// `slack_id` and `email` are each unique. `role_id` is `ON DELETE
    /// RESTRICT`, so a role in use cannot be removed.
    users (id) {
        id -> Int4,
        slack_id -> Text,
        name -> Nullable<Text>,
        email -> Text,
        password_hash -> Nullable<Text>,
        points -> Int4,
        created_at -> Timestamptz,
        role_id -> Int4,
    }
}

diesel::table! {
    /// Monthly rank snapshots, unique per `(user_id, year, month)`.
    rankings (id) {
        id -> Int4,
        user_id -> Int4,
        year -> Int4,
        month -> Int4,
        rank -> Int4,
        points -> Int4,
    }
}

diesel::table! {
    /// Monthly points snapshots, unique per `(user_id, year, month)`.
    monthly_points (id) {
        id -> Int4,
        user_id -> Int4,
        year -> Int4,
        month -> Int4,
        points -> Int4,
    }
}

diesel::joinable!(role_permissions -> roles (role_id));
diesel::joinable!(role_permissions -> permissions (permission_id));
diesel::joinable!(users -> roles (role_id));
diesel::joinable!(rankings -> users (user_id));
diesel::joinable!(monthly_points -> users (user_id));

diesel::allow_tables_to_appear_in_same_query!(
    roles,
    permissions,
    role_permissions,
    users,
    rankings,
    monthly_points,
);
