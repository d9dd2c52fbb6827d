//! Shared test utilities.
//!
//! This module provides common helper functions for setting up test databases
//! and creating test definitions and transactions with sensible defaults.

use crate::{
    core::{
        ledger::{self, ManualTransaction},
        recurring::NewDefinition,
    },
    entities::{
        Direction, OccurrenceStatus, RecurringDefinitionModel, TransactionModel,
        recurring_definition,
    },
    errors::Result,
};
use chrono::{NaiveDate, NaiveDateTime};
use sea_orm::{ActiveModelTrait, DatabaseConnection, Set};

/// Creates an in-memory `SQLite` database with all tables initialized.
/// This is the standard setup for all integration tests.
pub async fn setup_test_db() -> Result<DatabaseConnection> {
    let db = sea_orm::Database::connect("sqlite::memory:").await?;
    crate::config::database::create_tables(&db).await?;
    Ok(db)
}

/// Shorthand for a calendar date that is known to be valid.
#[allow(clippy::unwrap_used)]
pub fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}

/// A monthly bill starting 2024-01-15 with no end date.
///
/// # Defaults
/// * `name`: `"Internet"`, category `"Utilities"` / `"Broadband"`
/// * `provider`: `"Telco"`
/// * `account_id`: 3, `property_id`: 7
pub fn monthly_bill(amount: f64) -> NewDefinition {
    NewDefinition {
        direction: Direction::Expense,
        name: "Internet".to_string(),
        category: Some("Utilities".to_string()),
        subcategory1: Some("Broadband".to_string()),
        subcategory2: None,
        subcategory3: None,
        provider: Some("Telco".to_string()),
        frequency: Some("Monthly".to_string()),
        amount,
        start_date: date(2024, 1, 15),
        end_date: None,
        account_id: Some(3),
        property_id: Some(7),
    }
}

/// A monthly income named `"Salary"` starting 2024-01-28 with no end date.
pub fn monthly_income(amount: f64) -> NewDefinition {
    NewDefinition {
        direction: Direction::Income,
        name: "Salary".to_string(),
        category: Some("Employment".to_string()),
        subcategory1: None,
        subcategory2: None,
        subcategory3: None,
        provider: Some("Employer".to_string()),
        frequency: Some("Monthly".to_string()),
        amount,
        start_date: date(2024, 1, 28),
        end_date: None,
        account_id: Some(1),
        property_id: None,
    }
}

/// An unsaved definition model for pure tests.
pub fn sample_definition_model(id: i64, name: &str) -> RecurringDefinitionModel {
    RecurringDefinitionModel {
        id,
        direction: Direction::Expense,
        name: name.to_string(),
        category: Some("Housing".to_string()),
        subcategory1: Some("Rent".to_string()),
        subcategory2: Some("Main".to_string()),
        subcategory3: None,
        provider: Some("Agent".to_string()),
        frequency: Some("Monthly".to_string()),
        amount: 1800.0,
        start_date: date(2024, 1, 1),
        end_date: None,
        account_id: Some(2),
        property_id: Some(5),
        created_at: NaiveDateTime::default(),
        updated_at: NaiveDateTime::default(),
    }
}

/// Inserts a definition row directly, without generating any occurrences.
///
/// # Defaults
/// * `amount`: 100.0
/// * no end date, category, provider, account or property
pub async fn insert_raw_definition(
    db: &DatabaseConnection,
    name: &str,
    frequency: &str,
    start_date: NaiveDate,
) -> Result<RecurringDefinitionModel> {
    recurring_definition::ActiveModel {
        direction: Set(Direction::Expense),
        name: Set(name.to_string()),
        category: Set(None),
        subcategory1: Set(None),
        subcategory2: Set(None),
        subcategory3: Set(None),
        provider: Set(None),
        frequency: Set(Some(frequency.to_string())),
        amount: Set(100.0),
        start_date: Set(start_date),
        end_date: Set(None),
        account_id: Set(None),
        property_id: Set(None),
        created_at: Set(NaiveDateTime::default()),
        updated_at: Set(NaiveDateTime::default()),
        ..Default::default()
    }
    .insert(db)
    .await
    .map_err(Into::into)
}

/// Field values for a hand-entered expense.
pub fn manual_transaction(transaction_date: NaiveDate, amount: f64) -> ManualTransaction {
    ManualTransaction {
        direction: Direction::Expense,
        status: OccurrenceStatus::Paid,
        name: "Internet".to_string(),
        category: Some("Utilities".to_string()),
        subcategory1: None,
        subcategory2: None,
        subcategory3: None,
        provider: Some("Telco".to_string()),
        amount,
        transaction_date,
        account_id: Some(3),
        property_id: None,
        purchase_id: None,
    }
}

/// Records a hand-entered expense.
pub async fn create_test_manual_transaction(
    db: &DatabaseConnection,
    transaction_date: NaiveDate,
    amount: f64,
) -> Result<TransactionModel> {
    ledger::create_manual_transaction(db, manual_transaction(transaction_date, amount)).await
}

/// All occurrences of a definition, oldest first.
pub async fn occurrences(
    db: &DatabaseConnection,
    definition_id: i64,
) -> Result<Vec<TransactionModel>> {
    ledger::get_occurrences_for_definition(db, definition_id).await
}
