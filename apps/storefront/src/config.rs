//! Storefront configuration module.
//!
//! Configuration is loaded from environment variables with fallback to defaults.
//!
//! | Variable | Default |
//! |---|---|
//! | `PLATTER_DATABASE_PATH` | `./platter.db` |
//! | `PLATTER_JWT_SECRET` | development secret |
//! | `PLATTER_JWT_LIFETIME_SECS` | `86400` (1 day) |
//! | `PLATTER_TAX_RATE_BPS` | `500` (5%) |
//! | `PLATTER_FREE_DELIVERY_ABOVE_CENTS` | `50000` (₹500) |
//! | `PLATTER_DELIVERY_FEE_CENTS` | `5000` (₹50) |
//! | `PLATTER_LOG` | `info` |

use std::env;
use std::path::PathBuf;
use std::str::FromStr;

use platter_core::{
    Money, PricingPolicy, TaxRate, DEFAULT_DELIVERY_FEE_CENTS, DEFAULT_FREE_DELIVERY_ABOVE_CENTS,
    DEFAULT_TAX_RATE_BPS,
};
use platter_db::DbConfig;

const DEV_JWT_SECRET: &str = "platter-dev-secret-change-in-production";

/// Storefront configuration.
#[derive(Debug, Clone)]
pub struct StorefrontConfig {
    /// SQLite database file
    pub database_path: PathBuf,

    /// Secret for signing and verifying HS256 tokens
    pub jwt_secret: String,

    /// Lifetime of issued tokens in seconds
    pub jwt_lifetime_secs: i64,

    /// Tax rate, free-delivery threshold and delivery fee
    pub pricing: PricingPolicy,

    /// Default tracing filter when `RUST_LOG` is unset
    pub log_filter: String,
}

impl Default for StorefrontConfig {
    fn default() -> Self {
        StorefrontConfig {
            database_path: PathBuf::from("./platter.db"),
            jwt_secret: DEV_JWT_SECRET.to_string(),
            jwt_lifetime_secs: 86_400,
            pricing: PricingPolicy::default(),
            log_filter: "info".to_string(),
        }
    }
}

impl StorefrontConfig {
    /// Load configuration from environment variables.
    pub fn load() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration through `lookup`, which maps a variable name to
    /// its value. `load()` passes the process environment.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = StorefrontConfig::default();

        let tax_bps: u32 = parse_or(&lookup, "PLATTER_TAX_RATE_BPS", DEFAULT_TAX_RATE_BPS)?;
        let free_above: i64 = parse_or(&lookup, "PLATTER_FREE_DELIVERY_ABOVE_CENTS", DEFAULT_FREE_DELIVERY_ABOVE_CENTS)?;
        let fee: i64 = parse_or(&lookup, "PLATTER_DELIVERY_FEE_CENTS", DEFAULT_DELIVERY_FEE_CENTS)?;

        let config = StorefrontConfig {
            database_path: lookup("PLATTER_DATABASE_PATH")
                .map(PathBuf::from)
                .unwrap_or(defaults.database_path),

            jwt_secret: lookup("PLATTER_JWT_SECRET").unwrap_or(defaults.jwt_secret),

            jwt_lifetime_secs: parse_or(&lookup, "PLATTER_JWT_LIFETIME_SECS", defaults.jwt_lifetime_secs)?,

            pricing: PricingPolicy {
                tax_rate: TaxRate::from_bps(tax_bps),
                free_delivery_above: Money::from_cents(free_above),
                delivery_fee: Money::from_cents(fee),
            },

            log_filter: lookup("PLATTER_LOG").unwrap_or(defaults.log_filter),
        };

        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.jwt_secret.trim().is_empty() {
            return Err(ConfigError::MissingRequired("PLATTER_JWT_SECRET".to_string()));
        }
        if self.jwt_lifetime_secs <= 0 {
            return Err(ConfigError::OutOfRange {
                key: "PLATTER_JWT_LIFETIME_SECS".to_string(),
                reason: "must be positive".to_string(),
            });
        }
        if self.pricing.tax_rate.bps() > 10_000 {
            return Err(ConfigError::OutOfRange {
                key: "PLATTER_TAX_RATE_BPS".to_string(),
                reason: "must be at most 10000 (100%)".to_string(),
            });
        }
        if self.pricing.free_delivery_above.is_negative() {
            return Err(ConfigError::OutOfRange {
                key: "PLATTER_FREE_DELIVERY_ABOVE_CENTS".to_string(),
                reason: "must not be negative".to_string(),
            });
        }
        if self.pricing.delivery_fee.is_negative() {
            return Err(ConfigError::OutOfRange {
                key: "PLATTER_DELIVERY_FEE_CENTS".to_string(),
                reason: "must not be negative".to_string(),
            });
        }
        Ok(())
    }

    /// Pool configuration for [`database_path`](Self::database_path).
    pub fn db_config(&self) -> DbConfig {
        DbConfig::new(&self.database_path)
    }

    /// True when the built-in development secret is still in use.
    pub fn uses_dev_secret(&self) -> bool {
        self.jwt_secret == DEV_JWT_SECRET
    }
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidValue(key.to_string())),
        None => Ok(default),
    }
}

/// Configuration error types.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {0}")]
    InvalidValue(String),

    #[error("{key} {reason}")]
    OutOfRange { key: String, reason: String },

    #[error("Missing required configuration: {0}")]
    MissingRequired(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = StorefrontConfig::from_lookup(|_| None).unwrap();
        assert_eq!(config.pricing, PricingPolicy::default());
        assert_eq!(config.database_path, PathBuf::from("./platter.db"));
        assert!(config.uses_dev_secret());
    }

    #[test]
    fn test_overrides() {
        let config = StorefrontConfig::from_lookup(lookup_from(&[
            ("PLATTER_DATABASE_PATH", "/var/lib/platter/platter.db"),
            ("PLATTER_JWT_SECRET", "s3cret"),
            ("PLATTER_TAX_RATE_BPS", "1800"),
            ("PLATTER_FREE_DELIVERY_ABOVE_CENTS", "100000"),
            ("PLATTER_DELIVERY_FEE_CENTS", "3000"),
        ]))
        .unwrap();

        assert_eq!(config.pricing.tax_rate.bps(), 1800);
        assert_eq!(config.pricing.free_delivery_above, Money::from_major(1000));
        assert_eq!(config.pricing.delivery_fee, Money::from_major(30));
        assert!(!config.uses_dev_secret());
        assert_eq!(config.db_config().database_path, PathBuf::from("/var/lib/platter/platter.db"));
    }

    #[test]
    fn test_invalid_number() {
        let err = StorefrontConfig::from_lookup(lookup_from(&[("PLATTER_TAX_RATE_BPS", "five")])).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue(key) if key == "PLATTER_TAX_RATE_BPS"));
    }

    #[test]
    fn test_out_of_range() {
        let err = StorefrontConfig::from_lookup(lookup_from(&[("PLATTER_DELIVERY_FEE_CENTS", "-1")])).unwrap_err();
        assert!(matches!(err, ConfigError::OutOfRange { .. }));

        let err = StorefrontConfig::from_lookup(lookup_from(&[("PLATTER_JWT_SECRET", "  ")])).unwrap_err();
        assert!(matches!(err, ConfigError::MissingRequired(_)));
    }
}
