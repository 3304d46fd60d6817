//! Diesel table definitions for the PostgreSQL schema.
//!
//! These definitions must match the migrations exactly; `diesel
//! print-schema` can regenerate them from a live database.

diesel::table! {
    /// User accounts.
    ///
    /// `email` carries a unique constraint; `user_roles` and
    /// `user_permissions` reference `id` with `ON DELETE CASCADE`.
    users (id) {
        /// Primary key: UUID v4 identifier.
        id -> Uuid,
        /// Account holder's name (max 255 characters).
        name -> Varchar,
        /// Unique email address (max 255 characters).
        email -> Varchar,
        /// PHC-format one-way password hash.
        password_hash -> Varchar,
        /// Record creation timestamp.
        created_at -> Timestamptz,
        /// Last modification timestamp.
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Role catalogue, managed by the external access tooling.
    roles (id) {
        /// Primary key.
        id -> Int4,
        /// Unique role name.
        name -> Varchar,
    }
}

diesel::table! {
    /// Permission catalogue, managed by the external access tooling.
    permissions (id) {
        /// Primary key.
        id -> Int4,
        /// Unique permission name (e.g. `users.create`).
        name -> Varchar,
    }
}

diesel::table! {
    /// Permissions bundled into each role.
    role_permissions (role_id, permission_id) {
        /// Role owning the bundle entry.
        role_id -> Int4,
        /// Permission granted by the role.
        permission_id -> Int4,
    }
}

diesel::table! {
    /// Roles assigned to users.
    user_roles (user_id, role_id) {
        /// Assigned user.
        user_id -> Uuid,
        /// Assigned role.
        role_id -> Int4,
    }
}

diesel::table! {
    /// Permissions granted directly to users, independent of roles.
    user_permissions (user_id, permission_id) {
        /// Granted user.
        user_id -> Uuid,
        /// Granted permission.
        permission_id -> Int4,
    }
}

diesel::joinable!(role_permissions -> roles (role_id));
diesel::joinable!(role_permissions -> permissions (permission_id));
diesel::joinable!(user_roles -> users (user_id));
diesel::joinable!(user_roles -> roles (role_id));
diesel::joinable!(user_permissions -> users (user_id));
diesel::joinable!(user_permissions -> permissions (permission_id));

diesel::allow_tables_to_appear_in_same_query!(
    users,
    roles,
    permissions,
    role_permissions,
    user_roles,
    user_permissions,
);
