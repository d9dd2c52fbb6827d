//! Recurring definition business logic - create, update and delete bills and incomes.
//!
//! Each write validates its input, then stores the definition and synchronizes its
//! occurrences inside a single database transaction while holding the definition's lock.
//! Either the definition and its ledger rows change together or nothing changes.
//!
//! "Today" is always passed in by the caller. It decides which occurrences are paid and
//! which ones an edit is still allowed to rewrite.

use crate::{
    core::{
        locks::DefinitionLocks,
        sync::{self, OccurrenceDelta},
    },
    entities::{
        Direction, RecurringDefinition, RecurringDefinitionModel, TransactionModel,
        recurring_definition,
    },
    errors::{Error, Result},
};
use chrono::NaiveDate;
use sea_orm::{IntoActiveModel, QueryOrder, Set, TransactionTrait, prelude::*};
use tracing::{info, instrument};

/// Field values for a new recurring definition.
#[derive(Clone, Debug, PartialEq)]
pub struct NewDefinition {
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
    /// Cadence tag
    pub frequency: Option<String>,
    /// Amount per occurrence
    pub amount: f64,
    /// First occurrence
    pub start_date: NaiveDate,
    /// Inclusive end
    pub end_date: Option<NaiveDate>,
    /// Account reference
    pub account_id: Option<i64>,
    /// Property reference
    pub property_id: Option<i64>,
}

/// Changes to apply to a stored definition. `None` leaves a field as it is; for nullable
/// fields `Some(None)` clears the value.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct DefinitionUpdate {
    /// New display name
    pub name: Option<String>,
    /// New top-level category
    pub category: Option<Option<String>>,
    /// New first subcategory
    pub subcategory1: Option<Option<String>>,
    /// New second subcategory
    pub subcategory2: Option<Option<String>>,
    /// New third subcategory
    pub subcategory3: Option<Option<String>>,
    /// New counterparty
    pub provider: Option<Option<String>>,
    /// New cadence tag
    pub frequency: Option<Option<String>>,
    /// New amount per occurrence
    pub amount: Option<f64>,
    /// New first occurrence date
    pub start_date: Option<NaiveDate>,
    /// New inclusive end date
    pub end_date: Option<Option<NaiveDate>>,
    /// New account reference
    pub account_id: Option<Option<i64>>,
    /// New property reference
    pub property_id: Option<Option<i64>>,
}

impl DefinitionUpdate {
    fn apply_to(self, model: &mut RecurringDefinitionModel) {
        fn replace<T>(slot: &mut T, value: Option<T>) {
            if let Some(value) = value {
                *slot = value;
            }
        }

        replace(&mut model.name, self.name.map(|name| name.trim().to_string()));
        replace(&mut model.category, self.category);
        replace(&mut model.subcategory1, self.subcategory1);
        replace(&mut model.subcategory2, self.subcategory2);
        replace(&mut model.subcategory3, self.subcategory3);
        replace(&mut model.provider, self.provider);
        replace(&mut model.frequency, self.frequency);
        replace(&mut model.amount, self.amount);
        replace(&mut model.start_date, self.start_date);
        replace(&mut model.end_date, self.end_date);
        replace(&mut model.account_id, self.account_id);
        replace(&mut model.property_id, self.property_id);
    }
}

fn validate(
    name: &str,
    amount: f64,
    start_date: NaiveDate,
    end_date: Option<NaiveDate>,
) -> Result<()> {
    if name.trim().is_empty() {
        return Err(Error::Validation {
            message: "Definition name cannot be empty".to_string(),
        });
    }

    if amount < 0.0 || !amount.is_finite() {
        return Err(Error::InvalidAmount { amount });
    }

    if let Some(end) = end_date.filter(|end| *end < start_date) {
        return Err(Error::InvalidDateRange {
            start: start_date,
            end,
        });
    }

    Ok(())
}

/// Finds a definition by its unique ID.
pub async fn get_definition_by_id(
    db: &DatabaseConnection,
    definition_id: i64,
) -> Result<Option<RecurringDefinitionModel>> {
    RecurringDefinition::find_by_id(definition_id)
        .one(db)
        .await
        .map_err(Into::into)
}

/// Lists definitions ordered by name, optionally only bills or only incomes.
pub async fn list_definitions(
    db: &DatabaseConnection,
    direction: Option<Direction>,
) -> Result<Vec<RecurringDefinitionModel>> {
    let mut query = RecurringDefinition::find();
    if let Some(direction) = direction {
        query = query.filter(recurring_definition::Column::Direction.eq(direction));
    }
    query
        .order_by_asc(recurring_definition::Column::Name)
        .order_by_asc(recurring_definition::Column::Id)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Finds the first definition with this exact name and direction.
pub async fn find_definition_by_name(
    db: &DatabaseConnection,
    name: &str,
    direction: Direction,
) -> Result<Option<RecurringDefinitionModel>> {
    RecurringDefinition::find()
        .filter(recurring_definition::Column::Name.eq(name.trim()))
        .filter(recurring_definition::Column::Direction.eq(direction))
        .order_by_asc(recurring_definition::Column::Id)
        .one(db)
        .await
        .map_err(Into::into)
}

/// Stores a new definition and generates every occurrence from its start date to its
/// horizon, paid before `today` and scheduled from `today` on.
///
/// # Errors
/// Returns an error if:
/// - The name is empty or whitespace-only
/// - The amount is negative or not finite
/// - The end date is before the start date
/// - Any database operation fails, in which case nothing is stored
#[instrument(skip(db, new), fields(name = %new.name, direction = ?new.direction))]
pub async fn create_definition(
    db: &DatabaseConnection,
    new: NewDefinition,
    today: NaiveDate,
) -> Result<(RecurringDefinitionModel, Vec<TransactionModel>)> {
    validate(&new.name, new.amount, new.start_date, new.end_date)?;

    let now = chrono::Utc::now().naive_utc();
    let definition = recurring_definition::ActiveModel {
        direction: Set(new.direction),
        name: Set(new.name.trim().to_string()),
        category: Set(new.category),
        subcategory1: Set(new.subcategory1),
        subcategory2: Set(new.subcategory2),
        subcategory3: Set(new.subcategory3),
        provider: Set(new.provider),
        frequency: Set(new.frequency),
        amount: Set(new.amount),
        start_date: Set(new.start_date),
        end_date: Set(new.end_date),
        account_id: Set(new.account_id),
        property_id: Set(new.property_id),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    };

    let txn = db.begin().await?;
    let definition = definition.insert(&txn).await?;
    let occurrences = sync::generate_occurrences(&txn, &definition, today).await?;
    txn.commit().await?;

    info!(
        definition_id = definition.id,
        occurrences = occurrences.len(),
        "Created recurring definition"
    );
    Ok((definition, occurrences))
}

/// Applies `update` to a stored definition and resynchronizes its occurrences dated
/// `today` or later. Earlier occurrences are left exactly as they are, whatever changed.
///
/// # Errors
/// Returns an error if:
/// - No definition has this id
/// - The updated fields fail validation (see [`create_definition`])
/// - Any database operation fails, in which case neither the definition nor its
///   occurrences change
#[instrument(skip(db, locks, update))]
pub async fn update_definition(
    db: &DatabaseConnection,
    locks: &DefinitionLocks,
    definition_id: i64,
    update: DefinitionUpdate,
    today: NaiveDate,
) -> Result<(RecurringDefinitionModel, OccurrenceDelta)> {
    let _guard = locks.acquire(definition_id).await;
    let txn = db.begin().await?;

    let mut definition = RecurringDefinition::find_by_id(definition_id)
        .one(&txn)
        .await?
        .ok_or(Error::DefinitionNotFound { id: definition_id })?;

    update.apply_to(&mut definition);
    validate(
        &definition.name,
        definition.amount,
        definition.start_date,
        definition.end_date,
    )?;
    definition.updated_at = chrono::Utc::now().naive_utc();

    let definition = definition.into_active_model().reset_all().update(&txn).await?;
    let delta = sync::resync_occurrences(&txn, &definition, today).await?;
    txn.commit().await?;

    info!(
        definition_id,
        inserted = delta.inserted.len(),
        retired = delta.retired.len(),
        kept = delta.kept,
        "Updated recurring definition"
    );
    Ok((definition, delta))
}

/// Deletes a definition together with its occurrences dated `today` or later. Earlier
/// occurrences stay in the ledger and keep pointing at the deleted id.
///
/// # Errors
/// Returns an error if no definition has this id or any database operation fails; in
/// both cases nothing is deleted.
#[instrument(skip(db, locks))]
pub async fn delete_definition(
    db: &DatabaseConnection,
    locks: &DefinitionLocks,
    definition_id: i64,
    today: NaiveDate,
) -> Result<()> {
    let _guard = locks.acquire(definition_id).await;
    let txn = db.begin().await?;

    let definition = RecurringDefinition::find_by_id(definition_id)
        .one(&txn)
        .await?
        .ok_or(Error::DefinitionNotFound { id: definition_id })?;

    let retired = sync::retire_occurrences(&txn, definition.id, today).await?;
    definition.delete(&txn).await?;
    txn.commit().await?;

    info!(definition_id, retired, "Deleted recurring definition");
    Ok(())
}
