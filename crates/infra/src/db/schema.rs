//! Relational schema for tenants and users.
//!
//! Applied idempotently at startup by [`crate::PgDatabase::migrate`].

pub const CREATE_TENANTS: &str = r#"
    CREATE TABLE IF NOT EXISTS tenants (
        id          VARCHAR(30) PRIMARY KEY,
        name        TEXT        NOT NULL,
        state       TEXT        NOT NULL,
        created_at  TIMESTAMPTZ NOT NULL,
        modified_at TIMESTAMPTZ NULL
    )
"#;

pub const CREATE_USERS: &str = r#"
    CREATE TABLE IF NOT EXISTS users (
        id              UUID        PRIMARY KEY,
        tenant_id       VARCHAR(30) NOT NULL REFERENCES tenants (id),
        email           TEXT        NOT NULL,
        first_name      TEXT        NULL,
        last_name       TEXT        NULL,
        title           TEXT        NULL,
        role            TEXT        NOT NULL,
        email_confirmed BOOLEAN     NOT NULL DEFAULT FALSE,
        avatar          JSONB       NOT NULL DEFAULT '{"url":null,"version":0,"isGravatar":false}',
        created_at      TIMESTAMPTZ NOT NULL,
        modified_at     TIMESTAMPTZ NULL
    )
"#;

pub const CREATE_USERS_TENANT_INDEX: &str =
    "CREATE INDEX IF NOT EXISTS users_tenant_id_idx ON users (tenant_id)";

pub const CREATE_USERS_EMAIL_INDEX: &str =
    "CREATE UNIQUE INDEX IF NOT EXISTS users_email_idx ON users (lower(email))";

/// Statements in dependency order.
pub const STATEMENTS: &[&str] = &[
    CREATE_TENANTS,
    CREATE_USERS,
    CREATE_USERS_TENANT_INDEX,
    CREATE_USERS_EMAIL_INDEX,
];
