//! Database configuration module.
//!
//! This module handles `SQLite` database connection and table creation using `SeaORM`.
//! Tables are generated from the entity definitions with `Schema::create_table_from_entity`,
//! so the schema always matches the Rust structs. Creation is idempotent and safe to run
//! on every start.

use crate::entities::{RecurringDefinition, Transaction, TransactionColumn};
use crate::errors::Result;
use sea_orm::{
    ConnectionTrait, Database, DatabaseConnection, EntityTrait, Schema, sea_query::Index,
};
use tracing::{debug, info};

/// Default location of the ledger database
pub const DEFAULT_DATABASE_URL: &str = "sqlite://data/recurring_ledger.sqlite?mode=rwc";

/// Gets the database URL from environment variable or returns default `SQLite` path.
///
/// This function looks for `DATABASE_URL` in the environment and falls back to
/// a default local `SQLite` file if not set.
///
/// # Errors
/// Returns [`crate::errors::Error::EnvVar`] if `DATABASE_URL` is set but not valid Unicode.
pub fn get_database_url() -> Result<String> {
    super::env_or_default(std::env::var("DATABASE_URL"), DEFAULT_DATABASE_URL)
}

/// Establishes a connection to the `SQLite` database named by [`get_database_url`].
pub async fn create_connection() -> Result<DatabaseConnection> {
    let database_url = get_database_url()?;
    debug!("Connecting to database at {}", database_url);
    Database::connect(&database_url).await.map_err(Into::into)
}

async fn create_table<E>(db: &DatabaseConnection, schema: &Schema, entity: E) -> Result<()>
where
    E: EntityTrait,
{
    let builder = db.get_database_backend();
    let mut table = schema.create_table_from_entity(entity);
    table.if_not_exists();
    db.execute(builder.build(&table)).await?;
    Ok(())
}

/// Creates the definition and transaction tables plus the index that allows at most one
/// occurrence per definition and date.
pub async fn create_tables(db: &DatabaseConnection) -> Result<()> {
    let builder = db.get_database_backend();
    let schema = Schema::new(builder);

    create_table(db, &schema, RecurringDefinition).await?;
    create_table(db, &schema, Transaction).await?;

    // NULL definition ids (hand-entered rows) never collide in SQLite unique indexes
    let occurrence_index = Index::create()
        .name("idx_transactions_definition_date")
        .table(Transaction)
        .col(TransactionColumn::DefinitionId)
        .col(TransactionColumn::TransactionDate)
        .unique()
        .if_not_exists()
        .to_owned();
    db.execute(builder.build(&occurrence_index)).await?;

    info!("Database tables ensured.");
    Ok(())
}
