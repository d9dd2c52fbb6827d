//! Recurring definition entity - A bill or an income source that repeats on a cadence.
//!
//! Bills and incomes share one table and are told apart by `direction`. Each definition
//! owns the occurrences in the `transactions` table that carry its id in `definition_id`.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Which way the money moves for a definition and its occurrences
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "Text")]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// A bill
    #[sea_orm(string_value = "expense")]
    Expense,
    /// An income source
    #[sea_orm(string_value = "income")]
    Income,
}

/// Recurring definition database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "recurring_definitions")]
pub struct Model {
    /// Unique identifier for the definition
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Bill or income
    pub direction: Direction,
    /// Display name (e.g., "Electricity", "Salary")
    pub name: String,
    /// Top-level category
    pub category: Option<String>,
    /// First subcategory level
    pub subcategory1: Option<String>,
    /// Second subcategory level
    pub subcategory2: Option<String>,
    /// Third subcategory level
    pub subcategory3: Option<String>,
    /// Who is paid, or who pays
    pub provider: Option<String>,
    /// Raw cadence tag as entered (e.g., `"Monthly"`); unrecognized tags mean a one-off
    pub frequency: Option<String>,
    /// Amount of each occurrence
    pub amount: f64,
    /// First occurrence date
    pub start_date: Date,
    /// Last possible occurrence date, inclusive
    pub end_date: Option<Date>,
    /// Account the money moves through
    pub account_id: Option<i64>,
    /// Property the definition relates to
    pub property_id: Option<i64>,
    /// When the definition was created
    pub created_at: DateTime,
    /// When the definition was last modified
    pub updated_at: DateTime,
}

/// No declared relations: occurrences point back by id only, so that past
/// occurrences can outlive a deleted definition.
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
