//! Application configuration management.

use rust_decimal::Decimal;
use serde::Deserialize;

/// Application configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Database configuration.
    pub database: DatabaseConfig,
    /// Credit policy configuration.
    #[serde(default)]
    pub credit: CreditConfig,
}

/// Database configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// Database connection URL.
    pub url: String,
    /// Maximum number of connections in the pool.
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    /// Minimum number of connections in the pool.
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,
}

fn default_max_connections() -> u32 {
    10
}

fn default_min_connections() -> u32 {
    1
}

/// Credit and sale policy settings.
///
/// Defaults match the values the business has been operating with; every
/// field can be overridden via config file or `FIADO__CREDIT__*` env vars.
#[derive(Debug, Clone, Deserialize)]
pub struct CreditConfig {
    /// Credit limit assigned to new customers.
    #[serde(default = "default_credit_limit")]
    pub default_credit_limit: Decimal,
    /// Days until a sale is due, counted from the sale date.
    #[serde(default = "default_due_term_days")]
    pub due_term_days: i64,
    /// Days past due before a sale counts as delinquent.
    #[serde(default = "default_delinquency_days")]
    pub delinquency_days: i64,
    /// Minimum accepted sale total.
    #[serde(default = "default_min_sale_value")]
    pub min_sale_value: Decimal,
    /// Maximum quantity on a single line item.
    #[serde(default = "default_max_quantity")]
    pub max_quantity: Decimal,
    /// Maximum unit price on a single line item.
    #[serde(default = "default_max_unit_price")]
    pub max_unit_price: Decimal,
}

fn default_credit_limit() -> Decimal {
    Decimal::new(500_00, 2)
}

fn default_due_term_days() -> i64 {
    30
}

fn default_delinquency_days() -> i64 {
    30
}

fn default_min_sale_value() -> Decimal {
    Decimal::new(1, 2)
}

fn default_max_quantity() -> Decimal {
    Decimal::new(9_999_999, 3)
}

fn default_max_unit_price() -> Decimal {
    Decimal::new(99_999_99, 2)
}

impl Default for CreditConfig {
    fn default() -> Self {
        Self {
            default_credit_limit: default_credit_limit(),
            due_term_days: default_due_term_days(),
            delinquency_days: default_delinquency_days(),
            min_sale_value: default_min_sale_value(),
            max_quantity: default_max_quantity(),
            max_unit_price: default_max_unit_price(),
        }
    }
}

impl AppConfig {
    /// Loads configuration from environment and config files.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be loaded.
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{run_mode}")).required(false))
            .add_source(config::Environment::with_prefix("FIADO").separator("__"))
            .build()?;

        config.try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_credit_config_defaults() {
        let credit = CreditConfig::default();
        assert_eq!(credit.default_credit_limit, dec!(500.00));
        assert_eq!(credit.due_term_days, 30);
        assert_eq!(credit.delinquency_days, 30);
        assert_eq!(credit.min_sale_value, dec!(0.01));
        assert_eq!(credit.max_quantity, dec!(9999.999));
        assert_eq!(credit.max_unit_price, dec!(99999.99));
    }
}
