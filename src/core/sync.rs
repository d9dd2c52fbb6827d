//! Ledger synchronization - reconciles a definition's stored occurrences with what
//! [`materialize`] says should exist.
//!
//! Every function here runs on the connection it is given, which is expected to be an
//! open database transaction owned by the caller. Nothing is committed from here.
//!
//! Only occurrences dated on or after the synchronization date are ever deleted or
//! inserted when resynchronizing. Older rows are history and stay exactly as stored.

use crate::{
    core::materialize::{PlannedOccurrence, RecurrenceWindow, materialize},
    entities::{
        Direction, RecurringDefinitionModel, Transaction, TransactionModel, transaction,
    },
    errors::Result,
};
use chrono::NaiveDate;
use sea_orm::{QueryOrder, Set, prelude::*};
use std::collections::{BTreeMap, BTreeSet};
use tracing::debug;

/// Fields copied from a definition onto each occurrence it generates.
#[derive(Clone, Debug, PartialEq)]
pub struct OccurrenceTemplate {
    /// Bill or income
    pub direction: Direction,
    /// Display name
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
    /// Amount per occurrence
    pub amount: f64,
    /// Account reference
    pub account_id: Option<i64>,
    /// Property reference
    pub property_id: Option<i64>,
}

impl OccurrenceTemplate {
    /// Snapshot of the copyable fields of `definition`
    #[must_use]
    pub fn from_definition(definition: &RecurringDefinitionModel) -> Self {
        Self {
            direction: definition.direction,
            name: definition.name.clone(),
            category: definition.category.clone(),
            subcategory1: definition.subcategory1.clone(),
            subcategory2: definition.subcategory2.clone(),
            subcategory3: definition.subcategory3.clone(),
            provider: definition.provider.clone(),
            amount: definition.amount,
            account_id: definition.account_id,
            property_id: definition.property_id,
        }
    }

    fn to_active_model(&self, definition_id: i64, planned: PlannedOccurrence) -> transaction::ActiveModel {
        transaction::ActiveModel {
            definition_id: Set(Some(definition_id)),
            purchase_id: Set(None),
            direction: Set(self.direction),
            status: Set(planned.status),
            name: Set(self.name.clone()),
            category: Set(self.category.clone()),
            subcategory1: Set(self.subcategory1.clone()),
            subcategory2: Set(self.subcategory2.clone()),
            subcategory3: Set(self.subcategory3.clone()),
            provider: Set(self.provider.clone()),
            amount: Set(self.amount),
            transaction_date: Set(planned.date),
            account_id: Set(self.account_id),
            property_id: Set(self.property_id),
            ..Default::default()
        }
    }

    /// True when `row` is exactly what this template would write for `planned`.
    #[must_use]
    pub fn matches(&self, row: &TransactionModel, planned: &PlannedOccurrence) -> bool {
        row.transaction_date == planned.date
            && row.status == planned.status
            && row.direction == self.direction
            && row.name == self.name
            && row.category == self.category
            && row.subcategory1 == self.subcategory1
            && row.subcategory2 == self.subcategory2
            && row.subcategory3 == self.subcategory3
            && row.provider == self.provider
            && row.amount.to_bits() == self.amount.to_bits()
            && row.account_id == self.account_id
            && row.property_id == self.property_id
    }
}

/// Net change to a definition's occurrences made by one resynchronization.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct OccurrenceDelta {
    /// Rows written
    pub inserted: Vec<TransactionModel>,
    /// Rows deleted, as they were before deletion
    pub retired: Vec<TransactionModel>,
    /// Rows on or after the synchronization date left untouched
    pub kept: usize,
}

impl OccurrenceDelta {
    /// True when nothing was inserted or retired
    #[must_use]
    pub fn is_unchanged(&self) -> bool {
        self.inserted.is_empty() && self.retired.is_empty()
    }
}

/// Inserts one occurrence per planned row, bound to `definition`.
pub async fn insert_occurrences<C>(
    db: &C,
    definition: &RecurringDefinitionModel,
    planned: &[PlannedOccurrence],
) -> Result<Vec<TransactionModel>>
where
    C: ConnectionTrait,
{
    let template = OccurrenceTemplate::from_definition(definition);
    let mut inserted = Vec::with_capacity(planned.len());
    for row in planned {
        inserted.push(template.to_active_model(definition.id, *row).insert(db).await?);
    }
    Ok(inserted)
}

/// Occurrences bound to `definition_id` dated on or after `cutoff`, in date order.
pub async fn occurrences_from<C>(
    db: &C,
    definition_id: i64,
    cutoff: NaiveDate,
) -> Result<Vec<TransactionModel>>
where
    C: ConnectionTrait,
{
    Transaction::find()
        .filter(transaction::Column::DefinitionId.eq(definition_id))
        .filter(transaction::Column::TransactionDate.gte(cutoff))
        .order_by_asc(transaction::Column::TransactionDate)
        .order_by_asc(transaction::Column::Id)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Writes the full materialized range of a freshly created definition.
pub async fn generate_occurrences<C>(
    db: &C,
    definition: &RecurringDefinitionModel,
    today: NaiveDate,
) -> Result<Vec<TransactionModel>>
where
    C: ConnectionTrait,
{
    let planned = materialize(&RecurrenceWindow::from_definition(definition), today);
    debug!(
        definition_id = definition.id,
        count = planned.len(),
        "generating occurrences"
    );
    insert_occurrences(db, definition, &planned).await
}

/// Brings the occurrences of `definition` dated on or after `today` in line with its
/// current fields.
///
/// A stored row survives when the definition would still produce exactly that row for
/// its date. Every other row from `today` on is deleted, and every date the definition
/// should cover but does not yet is inserted. Running this twice with the same inputs
/// changes nothing the second time.
pub async fn resync_occurrences<C>(
    db: &C,
    definition: &RecurringDefinitionModel,
    today: NaiveDate,
) -> Result<OccurrenceDelta>
where
    C: ConnectionTrait,
{
    let target: BTreeMap<NaiveDate, PlannedOccurrence> =
        materialize(&RecurrenceWindow::from_definition(definition), today)
            .into_iter()
            .filter(|planned| planned.date >= today)
            .map(|planned| (planned.date, planned))
            .collect();

    let template = OccurrenceTemplate::from_definition(definition);
    let mut covered = BTreeSet::new();
    let mut retired = Vec::new();

    for row in occurrences_from(db, definition.id, today).await? {
        let keep = !covered.contains(&row.transaction_date)
            && target
                .get(&row.transaction_date)
                .is_some_and(|planned| template.matches(&row, planned));
        if keep {
            covered.insert(row.transaction_date);
        } else {
            retired.push(row);
        }
    }

    if !retired.is_empty() {
        // Deletes go first so re-inserted dates never collide with the unique index
        Transaction::delete_many()
            .filter(transaction::Column::Id.is_in(retired.iter().map(|row| row.id)))
            .exec(db)
            .await?;
    }

    let missing: Vec<PlannedOccurrence> = target
        .into_values()
        .filter(|planned| !covered.contains(&planned.date))
        .collect();
    let inserted = insert_occurrences(db, definition, &missing).await?;

    debug!(
        definition_id = definition.id,
        kept = covered.len(),
        retired = retired.len(),
        inserted = inserted.len(),
        "resynchronized occurrences"
    );

    Ok(OccurrenceDelta {
        inserted,
        retired,
        kept: covered.len(),
    })
}

/// Deletes the occurrences bound to `definition_id` dated on or after `today`.
/// Returns how many rows were removed.
pub async fn retire_occurrences<C>(db: &C, definition_id: i64, today: NaiveDate) -> Result<u64>
where
    C: ConnectionTrait,
{
    let result = Transaction::delete_many()
        .filter(transaction::Column::DefinitionId.eq(definition_id))
        .filter(transaction::Column::TransactionDate.gte(today))
        .exec(db)
        .await?;
    Ok(result.rows_affected)
}
