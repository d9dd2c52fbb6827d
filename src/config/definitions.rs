//! Recurring definition configuration loading from config.toml
//!
//! Bills and incomes declared in config.toml are applied at startup: missing ones are
//! created, existing ones are brought up to date. Dates are quoted `YYYY-MM-DD` strings.

use crate::entities::Direction;
use crate::errors::{Error, Result};
use chrono::NaiveDate;
use serde::Deserialize;
use std::path::Path;
use tracing::debug;

/// Environment variable that overrides the config file location
pub const CONFIG_PATH_VAR: &str = "CONFIG_PATH";

/// Configuration structure representing the entire config.toml file
#[derive(Debug, Default, Deserialize)]
pub struct Config {
    /// Recurring expenses
    #[serde(default)]
    pub bills: Vec<DefinitionConfig>,
    /// Recurring income sources
    #[serde(default)]
    pub incomes: Vec<DefinitionConfig>,
}

impl Config {
    /// Every configured definition tagged with its direction, bills first
    pub fn definitions(&self) -> impl Iterator<Item = (Direction, &DefinitionConfig)> {
        self.bills
            .iter()
            .map(|bill| (Direction::Expense, bill))
            .chain(self.incomes.iter().map(|income| (Direction::Income, income)))
    }
}

/// Configuration for a single bill or income
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct DefinitionConfig {
    /// Display name, also used to match an existing definition
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
    /// Cadence tag (`Weekly`, `Fortnightly`, `Monthly`, `Quarterly`, `Yearly`)
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

/// Loads definition configuration from a TOML file
///
/// # Errors
/// Returns an error if:
/// - The file cannot be read ([`Error::Io`])
/// - The TOML syntax is invalid
/// - Required fields are missing
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<Config> {
    let path = path.as_ref();
    debug!("Loading definitions from {:?}", path);
    let contents = std::fs::read_to_string(path)?;

    toml::from_str(&contents).map_err(|e| Error::Config {
        message: format!("Failed to parse {}: {e}", path.display()),
    })
}

/// Loads definition configuration from `$CONFIG_PATH`, or ./config.toml when unset.
/// A missing file yields an empty configuration.
pub fn load_default_config() -> Result<Config> {
    let path = super::env_or_default(std::env::var(CONFIG_PATH_VAR), "config.toml")?;
    if Path::new(&path).exists() {
        load_config(path)
    } else {
        debug!("No config file at {}, nothing to seed", path);
        Ok(Config::default())
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::float_cmp)]
    use super::*;

    #[test]
    fn test_parse_definition_config() {
        let toml_str = r#"
            [[bills]]
            name = "Council rates"
            category = "Housing"
            subcategory1 = "Rates"
            provider = "City Council"
            frequency = "Quarterly"
            amount = 450.0
            start_date = "2024-01-15"
            end_date = "2026-12-31"
            property_id = 2

            [[incomes]]
            name = "Salary"
            frequency = "Fortnightly"
            amount = 3200.0
            start_date = "2024-01-05"
        "#;

        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.bills.len(), 1);
        assert_eq!(config.incomes.len(), 1);

        let rates = &config.bills[0];
        assert_eq!(rates.name, "Council rates");
        assert_eq!(rates.subcategory1.as_deref(), Some("Rates"));
        assert_eq!(rates.subcategory2, None);
        assert_eq!(rates.amount, 450.0);
        assert_eq!(rates.start_date, NaiveDate::from_ymd_opt(2024, 1, 15).unwrap());
        assert_eq!(rates.end_date, NaiveDate::from_ymd_opt(2026, 12, 31));
        assert_eq!(rates.property_id, Some(2));
        assert_eq!(rates.account_id, None);

        let directions: Vec<_> = config.definitions().map(|(d, c)| (d, c.name.as_str())).collect();
        assert_eq!(
            directions,
            vec![
                (Direction::Expense, "Council rates"),
                (Direction::Income, "Salary")
            ]
        );
    }

    #[test]
    fn test_empty_config_is_valid() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.definitions().count(), 0);
    }

    #[test]
    fn test_missing_start_date_is_rejected() {
        let toml_str = r#"
            [[bills]]
            name = "Phone"
            amount = 40.0
        "#;
        assert!(toml::from_str::<Config>(toml_str).is_err());
    }

    #[test]
    fn test_load_config_missing_file() {
        let result = load_config("definitely/not/here/config.toml");
        assert!(matches!(result.unwrap_err(), Error::Io(_)));
    }

    #[test]
    fn test_load_config_invalid_toml() {
        let path = std::env::temp_dir()
            .join(format!("ledger-bad-config-{}.toml", std::process::id()));
        std::fs::write(&path, "[[bills]\nname = ").unwrap();
        let result = load_config(&path);
        std::fs::remove_file(&path).unwrap();
        assert!(matches!(result.unwrap_err(), Error::Config { message: _ }));
    }
}
