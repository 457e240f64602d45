use std::fmt::Display;
use std::str::FromStr;

use rust_decimal::Decimal;

use crate::error::CoreError;

/// Words that may not appear in a title, matched case-insensitively.
pub const DEFAULT_TITLE_DENYLIST: &[&str] = &["badword1", "badword2", "inappropriate"];

/// Maximum number of orders accepted per intake day.
pub const DEFAULT_DAILY_INTAKE_CAP: i64 = 500;

/// Maximum stock for an order above the high-value price threshold.
pub const DEFAULT_HIGH_VALUE_MAX_STOCK: i32 = 10;

/// Tunable business limits for the standard validation pipeline.
///
/// Field-level limits (lengths, price ceiling, date floor) are fixed; only
/// the denylist and the cross-field business rules are configurable.
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineConfig {
    /// Substrings rejected in titles (compared lowercase).
    pub title_denylist: Vec<String>,
    /// An order is rejected once this many orders already exist for today.
    pub daily_intake_cap: i64,
    /// Minimum price of a Technical order.
    pub technical_min_price: Decimal,
    /// Prices strictly above this are "high value".
    pub high_value_price: Decimal,
    /// Stock ceiling for high-value orders.
    pub high_value_max_stock: i32,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            title_denylist: DEFAULT_TITLE_DENYLIST
                .iter()
                .map(|w| w.to_string())
                .collect(),
            daily_intake_cap: DEFAULT_DAILY_INTAKE_CAP,
            technical_min_price: Decimal::new(2000, 2),
            high_value_price: Decimal::new(50000, 2),
            high_value_max_stock: DEFAULT_HIGH_VALUE_MAX_STOCK,
        }
    }
}

impl PipelineConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                      | Default                            |
    /// |------------------------------|------------------------------------|
    /// | `ORDER_TITLE_DENYLIST`       | `badword1,badword2,inappropriate`  |
    /// | `ORDER_DAILY_INTAKE_CAP`     | `500`                              |
    /// | `ORDER_TECHNICAL_MIN_PRICE`  | `20.00`                            |
    /// | `ORDER_HIGH_VALUE_PRICE`     | `500.00`                           |
    /// | `ORDER_HIGH_VALUE_MAX_STOCK` | `10`                               |
    pub fn from_env() -> Result<Self, CoreError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`PipelineConfig::from_env`] but reading from an arbitrary source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, CoreError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let title_denylist = match lookup("ORDER_TITLE_DENYLIST") {
            Some(raw) => raw
                .split(',')
                .map(|s| s.trim().to_lowercase())
                .filter(|s| !s.is_empty())
                .collect(),
            None => defaults.title_denylist,
        };

        let daily_intake_cap = parse_var(&lookup, "ORDER_DAILY_INTAKE_CAP", defaults.daily_intake_cap)?;
        let technical_min_price =
            parse_var(&lookup, "ORDER_TECHNICAL_MIN_PRICE", defaults.technical_min_price)?;
        let high_value_price =
            parse_var(&lookup, "ORDER_HIGH_VALUE_PRICE", defaults.high_value_price)?;
        let high_value_max_stock =
            parse_var(&lookup, "ORDER_HIGH_VALUE_MAX_STOCK", defaults.high_value_max_stock)?;

        if daily_intake_cap < 0 {
            return Err(CoreError::Config(format!(
                "ORDER_DAILY_INTAKE_CAP must not be negative, got {daily_intake_cap}"
            )));
        }

        Ok(Self {
            title_denylist,
            daily_intake_cap,
            technical_min_price,
            high_value_price,
            high_value_max_stock,
        })
    }
}

fn parse_var<T, F>(lookup: &F, key: &str, default: T) -> Result<T, CoreError>
where
    T: FromStr,
    T::Err: Display,
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|e| CoreError::Config(format!("{key} is invalid ('{raw}'): {e}"))),
        None => Ok(default),
    }
}
