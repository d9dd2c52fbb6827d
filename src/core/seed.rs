//! Startup seeding of recurring definitions from configuration.
//!
//! A configured definition is matched to a stored one by name and direction. Unmatched
//! entries are created; matched ones receive every configured field through the regular
//! update path, so an unchanged config.toml leaves the ledger untouched.

use crate::{
    config::definitions::{Config, DefinitionConfig},
    core::{
        locks::DefinitionLocks,
        recurring::{self, DefinitionUpdate, NewDefinition},
    },
    entities::Direction,
    errors::Result,
};
use chrono::NaiveDate;
use sea_orm::DatabaseConnection;
use tracing::{info, instrument};

/// What a seeding pass changed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SeedOutcome {
    /// Synchronization date used for the pass
    pub today: NaiveDate,
    /// Names of definitions created
    pub created: Vec<String>,
    /// Names of existing definitions whose future occurrences changed
    pub resynced: Vec<String>,
    /// Names of existing definitions that needed no change
    pub unchanged: Vec<String>,
    /// Occurrences written
    pub occurrences_inserted: usize,
    /// Occurrences deleted
    pub occurrences_retired: usize,
}

impl DefinitionConfig {
    /// Field values for creating this definition
    #[must_use]
    pub fn to_new_definition(&self, direction: Direction) -> NewDefinition {
        NewDefinition {
            direction,
            name: self.name.clone(),
            category: self.category.clone(),
            subcategory1: self.subcategory1.clone(),
            subcategory2: self.subcategory2.clone(),
            subcategory3: self.subcategory3.clone(),
            provider: self.provider.clone(),
            frequency: self.frequency.clone(),
            amount: self.amount,
            start_date: self.start_date,
            end_date: self.end_date,
            account_id: self.account_id,
            property_id: self.property_id,
        }
    }

    /// An update that sets every field to the configured value
    #[must_use]
    pub fn to_update(&self) -> DefinitionUpdate {
        DefinitionUpdate {
            name: Some(self.name.clone()),
            category: Some(self.category.clone()),
            subcategory1: Some(self.subcategory1.clone()),
            subcategory2: Some(self.subcategory2.clone()),
            subcategory3: Some(self.subcategory3.clone()),
            provider: Some(self.provider.clone()),
            frequency: Some(self.frequency.clone()),
            amount: Some(self.amount),
            start_date: Some(self.start_date),
            end_date: Some(self.end_date),
            account_id: Some(self.account_id),
            property_id: Some(self.property_id),
        }
    }
}

/// Creates or updates every definition in `config`, synchronizing against `today`.
/// Stops at the first failing definition; definitions applied before it stay applied.
#[instrument(skip(db, locks, config))]
pub async fn seed_definitions(
    db: &DatabaseConnection,
    locks: &DefinitionLocks,
    config: &Config,
    today: NaiveDate,
) -> Result<SeedOutcome> {
    let mut outcome = SeedOutcome {
        today,
        created: Vec::new(),
        resynced: Vec::new(),
        unchanged: Vec::new(),
        occurrences_inserted: 0,
        occurrences_retired: 0,
    };

    for (direction, entry) in config.definitions() {
        match recurring::find_definition_by_name(db, &entry.name, direction).await? {
            None => {
                let (definition, occurrences) =
                    recurring::create_definition(db, entry.to_new_definition(direction), today)
                        .await?;
                outcome.occurrences_inserted += occurrences.len();
                outcome.created.push(definition.name);
            }
            Some(existing) => {
                let (definition, delta) =
                    recurring::update_definition(db, locks, existing.id, entry.to_update(), today)
                        .await?;
                outcome.occurrences_inserted += delta.inserted.len();
                outcome.occurrences_retired += delta.retired.len();
                if delta.is_unchanged() {
                    outcome.unchanged.push(definition.name);
                } else {
                    outcome.resynced.push(definition.name);
                }
            }
        }
    }

    info!(
        created = outcome.created.len(),
        resynced = outcome.resynced.len(),
        unchanged = outcome.unchanged.len(),
        "Seeded recurring definitions"
    );
    Ok(outcome)
}

/// Formats a seeding outcome into a human-readable summary string.
#[must_use]
pub fn format_seed_summary(outcome: &SeedOutcome) -> String {
    use std::fmt::Write;

    let mut summary = format!(
        "Recurring definitions as of {}\n",
        outcome.today.format("%Y-%m-%d")
    );

    let sections = [
        ("Created", &outcome.created),
        ("Resynchronized", &outcome.resynced),
        ("Unchanged", &outcome.unchanged),
    ];
    for (label, names) in sections {
        if !names.is_empty() {
            // Writing to a String cannot fail
            let _ = writeln!(summary, "  {label}: {}", names.join(", "));
        }
    }

    let _ = write!(
        summary,
        "  Occurrences: +{} / -{}",
        outcome.occurrences_inserted, outcome.occurrences_retired
    );
    summary
}
