//! Transaction entity - One dated row of the ledger.
//!
//! Rows with a `definition_id` were generated from a recurring definition and are owned by
//! the synchronizer. Rows without one were entered by hand and are never touched by it.
//! Name, amount and categorization are copies taken at generation time, so a row stays
//! readable after its definition changes or disappears.

use super::recurring_definition::Direction;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Whether an occurrence was already due when it was generated
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "Text")]
#[serde(rename_all = "lowercase")]
pub enum OccurrenceStatus {
    /// Dated before the synchronization date
    #[sea_orm(string_value = "paid")]
    Paid,
    /// Dated on or after the synchronization date
    #[sea_orm(string_value = "scheduled")]
    Scheduled,
}

/// Transaction database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "transactions")]
pub struct Model {
    /// Unique identifier for the transaction
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Originating recurring definition, `None` for manually entered rows
    pub definition_id: Option<i64>,
    /// Purchase record this transaction settles, if any
    pub purchase_id: Option<i64>,
    /// Bill or income
    pub direction: Direction,
    /// Paid or scheduled, fixed when the row is written
    pub status: OccurrenceStatus,
    /// Display name copied from the definition
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
    /// Transaction amount
    pub amount: f64,
    /// Date the money moves
    pub transaction_date: Date,
    /// Account the money moves through
    pub account_id: Option<i64>,
    /// Property the transaction relates to
    pub property_id: Option<i64>,
}

/// `definition_id` is not a foreign key, see [`super::recurring_definition::Relation`]
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
