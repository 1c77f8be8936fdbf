//! Diesel table definitions for the PostgreSQL schema.
//!
//! These definitions must match the deployed database exactly. Migrations are
//! managed outside this crate; regenerate with `diesel print-schema` when the
//! tables change.

diesel::table! {
    /// Local mirror of identity-provider accounts.
    users (id) {
        /// Primary key: UUID v4 identifier.
        id -> Uuid,
        /// Identity-provider user id. Unique.
        identity_id -> Varchar,
        /// Primary email address. Unique.
        email -> Varchar,
        display_name -> Varchar,
        /// One of `guest`, `contributor`, `premier`, `admin`.
        role -> Varchar,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
        /// Set only by the soft-delete policy.
        deleted_at -> Nullable<Timestamptz>,
    }
}

diesel::table! {
    /// Seeded pattern catalogue. Read-only for this service.
    pattern_definitions (id) {
        /// Stable catalogue code such as `CP-001`.
        id -> Varchar,
        category -> Varchar,
        title -> Varchar,
        problem -> Text,
        usage -> Text,
    }
}

diesel::table! {
    /// Submitted code for a pattern.
    implementations (id) {
        id -> Uuid,
        pattern_id -> Varchar,
        author_id -> Nullable<Uuid>,
        /// Author display name captured at submission time.
        author_name -> Nullable<Varchar>,
        code -> Text,
        /// Array of `{language, code}` objects.
        alternative_code -> Jsonb,
        considerations -> Array<Text>,
        variations -> Array<Text>,
        status -> Varchar,
        premium -> Bool,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Review wrapper over exactly one implementation.
    contributions (id) {
        id -> Uuid,
        pattern_id -> Varchar,
        /// Unique; one contribution per implementation.
        implementation_id -> Uuid,
        submitted_by -> Uuid,
        /// Mirrors `implementations.status`.
        status -> Varchar,
        quality_score -> Nullable<Int2>,
        reviewer_id -> Nullable<Uuid>,
        reviewed_at -> Nullable<Timestamptz>,
        credits_awarded -> Int4,
        rejection_reason -> Nullable<Text>,
        submitted_at -> Timestamptz,
    }
}

diesel::table! {
    /// Append-only credit award ledger.
    credit_transactions (id) {
        id -> Uuid,
        user_id -> Uuid,
        amount -> Int4,
        reason -> Varchar,
        /// Provenance `{patternId, implementationId, contributionId}`.
        metadata -> Jsonb,
        created_at -> Timestamptz,
    }
}

diesel::joinable!(contributions -> implementations (implementation_id));
diesel::joinable!(credit_transactions -> users (user_id));
diesel::joinable!(implementations -> pattern_definitions (pattern_id));

diesel::allow_tables_to_appear_in_same_query!(
    contributions,
    credit_transactions,
    implementations,
    pattern_definitions,
    users,
);
