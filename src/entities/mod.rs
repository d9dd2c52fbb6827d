//! Entity module - Contains all SeaORM entity definitions for the database.
//! These entities represent the database tables the engine reads and writes.
//! Each entity has a Model struct for data and an Entity struct for operations.

pub mod recurring_definition;
pub mod transaction;

// Re-export specific types to avoid conflicts
pub use recurring_definition::{
    Column as RecurringDefinitionColumn, Direction, Entity as RecurringDefinition,
    Model as RecurringDefinitionModel,
};
pub use transaction::{
    Column as TransactionColumn, Entity as Transaction, Model as TransactionModel,
    OccurrenceStatus,
};
