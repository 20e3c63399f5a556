//! Schema definitions and migration runner for SurrealDB.
//!
//! All table definitions use SCHEMAFULL mode for data integrity.
//! UUIDs are stored as strings. Enums are stored as strings with
//! ASSERT constraints for validation.

use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;
use tracing::info;

use crate::error::DbError;

// -----------------------------------------------------------------------
// Migration tracking
// -----------------------------------------------------------------------

const MIGRATION_TABLE_DDL: &str = "\
DEFINE TABLE IF NOT EXISTS _migration SCHEMAFULL;
DEFINE FIELD IF NOT EXISTS version ON TABLE _migration TYPE int;
DEFINE FIELD IF NOT EXISTS name ON TABLE _migration TYPE string;
DEFINE FIELD IF NOT EXISTS applied_at ON TABLE _migration TYPE datetime \
    DEFAULT time::now();
DEFINE INDEX IF NOT EXISTS idx_migration_version ON TABLE _migration \
    COLUMNS version UNIQUE;
";

#[derive(Debug, SurrealValue)]
struct MigrationRecord {
    version: u32,
    #[allow(dead_code)]
    name: String,
}

struct Migration {
    version: u32,
    name: &'static str,
    sql: &'static str,
}

static MIGRATIONS: &[Migration] = &[Migration {
    version: 1,
    name: "initial_schema",
    sql: SCHEMA_V1,
}];

// -----------------------------------------------------------------------
// Schema v1 — initial table definitions
// -----------------------------------------------------------------------

const SCHEMA_V1: &str = "\
-- =======================================================================
-- Users (global collection)
-- =======================================================================
DEFINE TABLE user SCHEMAFULL;
DEFINE FIELD role ON TABLE user TYPE string \
    ASSERT $value IN ['Administrator', 'CompanyOwner', \
    'Representative', 'Student'];
DEFINE FIELD name ON TABLE user TYPE string;
DEFINE FIELD email ON TABLE user TYPE string;
DEFINE FIELD company_id ON TABLE user TYPE option<string>;
DEFINE FIELD created_at ON TABLE user TYPE datetime \
    DEFAULT time::now();
DEFINE FIELD updated_at ON TABLE user TYPE datetime \
    DEFAULT time::now();
DEFINE INDEX idx_user_email ON TABLE user COLUMNS email UNIQUE;

-- =======================================================================
-- Companies (global collection, canonical employer records)
-- =======================================================================
DEFINE TABLE company SCHEMAFULL;
DEFINE FIELD company_name ON TABLE company TYPE string;
DEFINE FIELD owner_id ON TABLE company TYPE string;
DEFINE FIELD representative_ids ON TABLE company TYPE array DEFAULT [];
DEFINE FIELD representative_ids.* ON TABLE company TYPE string;
DEFINE FIELD booth_id ON TABLE company TYPE option<string>;
DEFINE FIELD invite_code ON TABLE company TYPE option<string>;
DEFINE FIELD created_at ON TABLE company TYPE datetime \
    DEFAULT time::now();
DEFINE FIELD updated_at ON TABLE company TYPE datetime \
    DEFAULT time::now();
DEFINE INDEX idx_company_owner ON TABLE company COLUMNS owner_id;

-- =======================================================================
-- Booths (global collection, one canonical profile per company)
-- =======================================================================
DEFINE TABLE booth SCHEMAFULL;
DEFINE FIELD company_id ON TABLE booth TYPE string;
DEFINE FIELD company_name ON TABLE booth TYPE option<string>;
DEFINE FIELD industry ON TABLE booth TYPE option<string>;
DEFINE FIELD company_size ON TABLE booth TYPE option<string>;
DEFINE FIELD location ON TABLE booth TYPE option<string>;
DEFINE FIELD description ON TABLE booth TYPE option<string>;
DEFINE FIELD logo_url ON TABLE booth TYPE option<string>;
DEFINE FIELD website ON TABLE booth TYPE option<string>;
DEFINE FIELD careers_page ON TABLE booth TYPE option<string>;
DEFINE FIELD contact_name ON TABLE booth TYPE option<string>;
DEFINE FIELD contact_email ON TABLE booth TYPE option<string>;
DEFINE FIELD hiring_for ON TABLE booth TYPE array DEFAULT [];
DEFINE FIELD hiring_for.* ON TABLE booth TYPE string;
DEFINE FIELD created_at ON TABLE booth TYPE datetime \
    DEFAULT time::now();
DEFINE FIELD updated_at ON TABLE booth TYPE datetime \
    DEFAULT time::now();
DEFINE INDEX idx_booth_company ON TABLE booth COLUMNS company_id UNIQUE;

-- =======================================================================
-- Jobs (global collection)
-- =======================================================================
DEFINE TABLE job SCHEMAFULL;
DEFINE FIELD company_id ON TABLE job TYPE string;
DEFINE FIELD title ON TABLE job TYPE string;
DEFINE FIELD description ON TABLE job TYPE option<string>;
DEFINE FIELD location ON TABLE job TYPE option<string>;
DEFINE FIELD employment_type ON TABLE job TYPE option<string>;
DEFINE FIELD apply_url ON TABLE job TYPE option<string>;
DEFINE FIELD created_at ON TABLE job TYPE datetime \
    DEFAULT time::now();
DEFINE FIELD updated_at ON TABLE job TYPE datetime \
    DEFAULT time::now();
DEFINE INDEX idx_job_company ON TABLE job COLUMNS company_id;

-- =======================================================================
-- Fairs (top-level scoping entity)
-- =======================================================================
DEFINE TABLE fair SCHEMAFULL;
DEFINE FIELD name ON TABLE fair TYPE string;
DEFINE FIELD description ON TABLE fair TYPE option<string>;
DEFINE FIELD is_live ON TABLE fair TYPE bool DEFAULT false;
DEFINE FIELD start_time ON TABLE fair TYPE option<datetime>;
DEFINE FIELD end_time ON TABLE fair TYPE option<datetime>;
DEFINE FIELD invite_code ON TABLE fair TYPE string;
DEFINE FIELD created_by ON TABLE fair TYPE string;
DEFINE FIELD updated_by ON TABLE fair TYPE string;
DEFINE FIELD created_at ON TABLE fair TYPE datetime \
    DEFAULT time::now();
DEFINE FIELD updated_at ON TABLE fair TYPE datetime \
    DEFAULT time::now();
DEFINE INDEX idx_fair_invite_code ON TABLE fair \
    COLUMNS invite_code UNIQUE;

-- =======================================================================
-- Enrollments (fair scope; one per fair/company pair)
-- =======================================================================
DEFINE TABLE enrollment SCHEMAFULL;
DEFINE FIELD fair_id ON TABLE enrollment TYPE string;
DEFINE FIELD company_id ON TABLE enrollment TYPE string;
DEFINE FIELD company_name ON TABLE enrollment TYPE string;
DEFINE FIELD method ON TABLE enrollment TYPE string \
    ASSERT $value IN ['Admin', 'InviteCode', 'Migration'];
DEFINE FIELD booth_id ON TABLE enrollment TYPE option<string>;
DEFINE FIELD enrolled_by ON TABLE enrollment TYPE string;
DEFINE FIELD enrolled_at ON TABLE enrollment TYPE datetime \
    DEFAULT time::now();
DEFINE INDEX idx_enrollment_fair_company ON TABLE enrollment \
    COLUMNS fair_id, company_id UNIQUE;
DEFINE INDEX idx_enrollment_company ON TABLE enrollment \
    COLUMNS company_id;

-- =======================================================================
-- Fair-scoped booths (fork-once snapshots)
-- =======================================================================
DEFINE TABLE fair_booth SCHEMAFULL;
DEFINE FIELD fair_id ON TABLE fair_booth TYPE string;
DEFINE FIELD company_id ON TABLE fair_booth TYPE string;
DEFINE FIELD company_name ON TABLE fair_booth TYPE string;
DEFINE FIELD industry ON TABLE fair_booth TYPE option<string>;
DEFINE FIELD company_size ON TABLE fair_booth TYPE option<string>;
DEFINE FIELD location ON TABLE fair_booth TYPE option<string>;
DEFINE FIELD description ON TABLE fair_booth TYPE option<string>;
DEFINE FIELD logo_url ON TABLE fair_booth TYPE option<string>;
DEFINE FIELD website ON TABLE fair_booth TYPE option<string>;
DEFINE FIELD careers_page ON TABLE fair_booth TYPE option<string>;
DEFINE FIELD contact_name ON TABLE fair_booth TYPE option<string>;
DEFINE FIELD contact_email ON TABLE fair_booth TYPE option<string>;
DEFINE FIELD hiring_for ON TABLE fair_booth TYPE array DEFAULT [];
DEFINE FIELD hiring_for.* ON TABLE fair_booth TYPE string;
DEFINE FIELD enrolled_by ON TABLE fair_booth TYPE string;
DEFINE FIELD enrolled_at ON TABLE fair_booth TYPE datetime \
    DEFAULT time::now();
DEFINE FIELD updated_at ON TABLE fair_booth TYPE option<datetime>;
DEFINE INDEX idx_fair_booth_fair ON TABLE fair_booth COLUMNS fair_id;
DEFINE INDEX idx_fair_booth_fair_company ON TABLE fair_booth \
    COLUMNS fair_id, company_id;

-- =======================================================================
-- Fair-scoped jobs (copies tagged with their source)
-- =======================================================================
DEFINE TABLE fair_job SCHEMAFULL;
DEFINE FIELD fair_id ON TABLE fair_job TYPE string;
DEFINE FIELD company_id ON TABLE fair_job TYPE string;
DEFINE FIELD source_job_id ON TABLE fair_job TYPE option<string>;
DEFINE FIELD title ON TABLE fair_job TYPE string;
DEFINE FIELD description ON TABLE fair_job TYPE option<string>;
DEFINE FIELD location ON TABLE fair_job TYPE option<string>;
DEFINE FIELD employment_type ON TABLE fair_job TYPE option<string>;
DEFINE FIELD apply_url ON TABLE fair_job TYPE option<string>;
DEFINE FIELD copied_at ON TABLE fair_job TYPE datetime \
    DEFAULT time::now();
DEFINE INDEX idx_fair_job_fair ON TABLE fair_job COLUMNS fair_id;
DEFINE INDEX idx_fair_job_fair_company ON TABLE fair_job \
    COLUMNS fair_id, company_id;
";

// -----------------------------------------------------------------------
// Public API
// -----------------------------------------------------------------------

/// Run all pending migrations against the given SurrealDB client.
///
/// Creates a `_migration` tracking table on first run, then applies
/// each migration whose version exceeds the current maximum.
/// All DEFINE statements are idempotent so re-running is safe.
pub async fn run_migrations<C: Connection>(db: &Surreal<C>) -> Result<(), DbError> {
    // Ensure migration tracking table exists (idempotent).
    db.query(MIGRATION_TABLE_DDL)
        .await?
        .check()
        .map_err(|e| DbError::Migration(e.to_string()))?;

    // Determine current schema version.
    let mut result = db
        .query("SELECT * FROM _migration ORDER BY version DESC LIMIT 1")
        .await?;
    let records: Vec<MigrationRecord> = result.take(0)?;
    let current_version = records.first().map(|m| m.version).unwrap_or(0);

    for migration in MIGRATIONS {
        if migration.version > current_version {
            info!(
                version = migration.version,
                name = migration.name,
                "Applying migration"
            );
            db.query(migration.sql).await?.check().map_err(|e| {
                DbError::Migration(format!(
                    "Migration v{} '{}' failed: {}",
                    migration.version, migration.name, e,
                ))
            })?;

            // Record the applied migration.
            db.query(
                "CREATE _migration SET version = $version, \
                 name = $name",
            )
            .bind(("version", migration.version))
            .bind(("name", migration.name))
            .await?
            .check()
            .map_err(|e| {
                DbError::Migration(format!(
                    "Failed to record migration v{}: {}",
                    migration.version, e,
                ))
            })?;

            info!(
                version = migration.version,
                "Migration applied successfully"
            );
        }
    }

    Ok(())
}

/// Returns the raw schema DDL for version 1.
///
/// Exposed for testing with in-memory SurrealDB instances that
/// bypass the migration runner.
pub fn schema_v1() -> &'static str {
    SCHEMA_V1
}
