/// Database configuration and connection management
pub mod database;

/// Recurring definition seeds loaded from config.toml
pub mod definitions;

use crate::errors::Result;
use std::env::VarError;

/// Resolves an environment lookup, falling back to `default` when the variable is unset.
/// A value that is set but not valid Unicode is an error rather than silently ignored.
pub(crate) fn env_or_default(
    lookup: std::result::Result<String, VarError>,
    default: &str,
) -> Result<String> {
    match lookup {
        Ok(value) => Ok(value),
        Err(VarError::NotPresent) => Ok(default.to_string()),
        Err(e) => Err(e.into()),
    }
}
