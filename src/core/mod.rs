//! Core business logic - framework-agnostic recurrence expansion and ledger synchronization.

/// Frequency tags and date stepping
pub mod cadence;
/// Ledger reads and hand-entered transactions
pub mod ledger;
/// Per-definition write serialization
pub mod locks;
/// Expected occurrences for a definition
pub mod materialize;
/// Create, update and delete of recurring definitions
pub mod recurring;
/// Applying configured definitions at startup
pub mod seed;
/// Reconciling stored occurrences with expected ones
pub mod sync;
