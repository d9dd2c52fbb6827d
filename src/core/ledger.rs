//! Ledger queries - reading occurrences and recording hand-entered transactions.
//!
//! Hand-entered rows never carry a `definition_id`, which keeps them outside the reach
//! of the synchronizer.

use crate::{
    entities::{Direction, OccurrenceStatus, Transaction, TransactionModel, transaction},
    errors::{Error, Result},
};
use chrono::NaiveDate;
use sea_orm::{QueryOrder, Set, prelude::*};

/// Field values for a transaction entered by hand.
#[derive(Clone, Debug, PartialEq)]
pub struct ManualTransaction {
    /// Expense or income
    pub direction: Direction,
    /// Paid or scheduled
    pub status: OccurrenceStatus,
    /// Description
    pub name: String,
    /// Top-level category
    pub category: Option<String>,
    /// First subcategory level
    pub subcategory1: Option<String>,
    /// Second subcategory level
    pub subcategory2: Option<String>,
    /// Third subcategory level
    pub subcategory3: Option<String>,
    /// Counterparty
    pub provider: Option<String>,
    /// Amount
    pub amount: f64,
    /// Date the money moves
    pub transaction_date: NaiveDate,
    /// Account reference
    pub account_id: Option<i64>,
    /// Property reference
    pub property_id: Option<i64>,
    /// Purchase record this settles
    pub purchase_id: Option<i64>,
}

/// Records a transaction that no recurring definition owns.
///
/// # Errors
/// Returns an error if the name is empty, the amount is not finite, or the insert fails.
pub async fn create_manual_transaction(
    db: &DatabaseConnection,
    manual: ManualTransaction,
) -> Result<TransactionModel> {
    if manual.name.trim().is_empty() {
        return Err(Error::Validation {
            message: "Transaction name cannot be empty".to_string(),
        });
    }

    if !manual.amount.is_finite() {
        return Err(Error::InvalidAmount {
            amount: manual.amount,
        });
    }

    let row = transaction::ActiveModel {
        definition_id: Set(None),
        purchase_id: Set(manual.purchase_id),
        direction: Set(manual.direction),
        status: Set(manual.status),
        name: Set(manual.name.trim().to_string()),
        category: Set(manual.category),
        subcategory1: Set(manual.subcategory1),
        subcategory2: Set(manual.subcategory2),
        subcategory3: Set(manual.subcategory3),
        provider: Set(manual.provider),
        amount: Set(manual.amount),
        transaction_date: Set(manual.transaction_date),
        account_id: Set(manual.account_id),
        property_id: Set(manual.property_id),
        ..Default::default()
    };
    row.insert(db).await.map_err(Into::into)
}

/// All rows generated from a definition, oldest first. Includes rows left behind by a
/// deleted definition.
pub async fn get_occurrences_for_definition(
    db: &DatabaseConnection,
    definition_id: i64,
) -> Result<Vec<TransactionModel>> {
    Transaction::find()
        .filter(transaction::Column::DefinitionId.eq(definition_id))
        .order_by_asc(transaction::Column::TransactionDate)
        .order_by_asc(transaction::Column::Id)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Rows that no definition owns, oldest first.
pub async fn get_unlinked_transactions(db: &DatabaseConnection) -> Result<Vec<TransactionModel>> {
    Transaction::find()
        .filter(transaction::Column::DefinitionId.is_null())
        .order_by_asc(transaction::Column::TransactionDate)
        .order_by_asc(transaction::Column::Id)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Retrieves a specific transaction by its unique ID.
pub async fn get_transaction_by_id(
    db: &DatabaseConnection,
    transaction_id: i64,
) -> Result<Option<TransactionModel>> {
    Transaction::find_by_id(transaction_id)
        .one(db)
        .await
        .map_err(Into::into)
}
