//! Process-wide risk configuration.
//!
//! Three options control stake sizing. They are validated once at load
//! time and never mutated afterwards; a host that wants different limits
//! builds a new [`RiskConfig`] and swaps it in.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::error::ValidationError;

pub const DEFAULT_MAX_STAKE_PERCENT: f64 = 0.05;
pub const DEFAULT_KELLY_FRACTION: f64 = 0.25;
pub const DEFAULT_MIN_EDGE_THRESHOLD: f64 = 0.02;

const KEY_MAX_STAKE_PERCENT: &str = "max_stake_percent";
const KEY_KELLY_FRACTION: &str = "kelly_fraction";
const KEY_MIN_EDGE_THRESHOLD: &str = "min_edge_threshold";

/// Stake-sizing limits applied to every recommendation
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RiskConfig {
    /// Hard cap on any single stake, as a bankroll fraction. Zero is
    /// legal and disables betting entirely.
    pub max_stake_percent: f64,
    /// Fraction of full Kelly actually staked
    pub kelly_fraction: f64,
    /// Minimum edge required before a bet is eligible
    pub min_edge_threshold: f64,
}

impl Default for RiskConfig {
    fn default() -> Self {
        Self {
            max_stake_percent: DEFAULT_MAX_STAKE_PERCENT,
            kelly_fraction: DEFAULT_KELLY_FRACTION,
            min_edge_threshold: DEFAULT_MIN_EDGE_THRESHOLD,
        }
    }
}

impl RiskConfig {
    /// Build a validated config.
    pub fn new(
        max_stake_percent: f64,
        kelly_fraction: f64,
        min_edge_threshold: f64,
    ) -> Result<Self, ValidationError> {
        let config = Self {
            max_stake_percent,
            kelly_fraction,
            min_edge_threshold,
        };
        config.validate()?;
        Ok(config)
    }

    /// Check every option against its legal range. NaN fails all of them.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if !(0.0..=1.0).contains(&self.max_stake_percent) {
            return Err(ValidationError::ConfigValueOutOfRange {
                key: KEY_MAX_STAKE_PERCENT.to_string(),
                value: self.max_stake_percent,
            });
        }
        if !(self.kelly_fraction > 0.0 && self.kelly_fraction <= 1.0) {
            return Err(ValidationError::ConfigValueOutOfRange {
                key: KEY_KELLY_FRACTION.to_string(),
                value: self.kelly_fraction,
            });
        }
        if !(self.min_edge_threshold > 0.0 && self.min_edge_threshold <= 1.0) {
            return Err(ValidationError::ConfigValueOutOfRange {
                key: KEY_MIN_EDGE_THRESHOLD.to_string(),
                value: self.min_edge_threshold,
            });
        }
        Ok(())
    }

    /// Load from explicit key/value pairs, e.g. a settings file.
    ///
    /// Strict: every option must be present or the load fails naming the
    /// missing key. Unrecognized keys are ignored so the pairs may come
    /// from a larger settings document.
    pub fn from_pairs<I, K, V>(pairs: I) -> Result<Self, ValidationError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let map: HashMap<String, String> = pairs
            .into_iter()
            .map(|(k, v)| (k.as_ref().to_string(), v.as_ref().to_string()))
            .collect();

        let require = |key: &str| -> Result<f64, ValidationError> {
            let raw = map
                .get(key)
                .ok_or_else(|| ValidationError::MissingConfigKey(key.to_string()))?;
            parse_option(key, raw)
        };

        Self::new(
            require(KEY_MAX_STAKE_PERCENT)?,
            require(KEY_KELLY_FRACTION)?,
            require(KEY_MIN_EDGE_THRESHOLD)?,
        )
    }

    /// Load from a lookup function with environment semantics: an absent
    /// key falls back to its documented default, a present key must parse.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ValidationError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let fetch = |key: &str, default: f64| -> Result<f64, ValidationError> {
            match lookup(key) {
                Some(raw) => parse_option(key, &raw),
                None => Ok(default),
            }
        };

        Self::new(
            fetch("MAX_STAKE_PERCENT", DEFAULT_MAX_STAKE_PERCENT)?,
            fetch("KELLY_FRACTION", DEFAULT_KELLY_FRACTION)?,
            fetch("MIN_EDGE_THRESHOLD", DEFAULT_MIN_EDGE_THRESHOLD)?,
        )
    }

    /// Load from `MAX_STAKE_PERCENT`, `KELLY_FRACTION` and
    /// `MIN_EDGE_THRESHOLD` environment variables, defaulting each
    /// unset variable.
    pub fn from_env() -> Result<Self, ValidationError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }
}

fn parse_option(key: &str, raw: &str) -> Result<f64, ValidationError> {
    raw.trim()
        .parse::<f64>()
        .map_err(|_| ValidationError::MalformedConfigValue {
            key: key.to_string(),
            value: raw.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = RiskConfig::default();
        assert!(config.validate().is_ok());
        assert!((config.max_stake_percent - 0.05).abs() < 1e-12);
        assert!((config.kelly_fraction - 0.25).abs() < 1e-12);
        assert!((config.min_edge_threshold - 0.02).abs() < 1e-12);
    }

    #[test]
    fn test_zero_max_stake_is_legal() {
        assert!(RiskConfig::new(0.0, 0.25, 0.02).is_ok());
    }

    #[test]
    fn test_rejects_out_of_range_values() {
        assert!(RiskConfig::new(-0.01, 0.25, 0.02).is_err());
        assert!(RiskConfig::new(1.01, 0.25, 0.02).is_err());
        assert!(RiskConfig::new(0.05, 0.0, 0.02).is_err());
        assert!(RiskConfig::new(0.05, 1.5, 0.02).is_err());
        assert!(RiskConfig::new(0.05, 0.25, 0.0).is_err());
        assert!(RiskConfig::new(0.05, 0.25, -0.02).is_err());
    }

    #[test]
    fn test_rejects_nan() {
        assert!(RiskConfig::new(f64::NAN, 0.25, 0.02).is_err());
        assert!(RiskConfig::new(0.05, f64::NAN, 0.02).is_err());
        assert!(RiskConfig::new(0.05, 0.25, f64::NAN).is_err());
    }

    #[test]
    fn test_from_pairs() {
        let config = RiskConfig::from_pairs([
            ("max_stake_percent", "0.10"),
            ("kelly_fraction", "0.5"),
            ("min_edge_threshold", "0.03"),
            ("unrelated_key", "whatever"),
        ])
        .unwrap();

        assert!((config.max_stake_percent - 0.10).abs() < 1e-12);
        assert!((config.kelly_fraction - 0.5).abs() < 1e-12);
        assert!((config.min_edge_threshold - 0.03).abs() < 1e-12);
    }

    #[test]
    fn test_from_pairs_missing_key_names_it() {
        let err = RiskConfig::from_pairs([
            ("max_stake_percent", "0.10"),
            ("min_edge_threshold", "0.03"),
        ])
        .unwrap_err();

        assert_eq!(
            err,
            ValidationError::MissingConfigKey("kelly_fraction".to_string())
        );
    }

    #[test]
    fn test_from_pairs_malformed_value() {
        let err = RiskConfig::from_pairs([
            ("max_stake_percent", "ten percent"),
            ("kelly_fraction", "0.25"),
            ("min_edge_threshold", "0.02"),
        ])
        .unwrap_err();

        assert!(matches!(
            err,
            ValidationError::MalformedConfigValue { ref key, .. } if key == "max_stake_percent"
        ));
    }

    #[test]
    fn test_from_lookup_defaults_absent_keys() {
        let config = RiskConfig::from_lookup(|_| None).unwrap();
        assert_eq!(config, RiskConfig::default());
    }

    #[test]
    fn test_from_lookup_overrides() {
        let config = RiskConfig::from_lookup(|key| match key {
            "KELLY_FRACTION" => Some("0.5".to_string()),
            _ => None,
        })
        .unwrap();

        assert!((config.kelly_fraction - 0.5).abs() < 1e-12);
        assert!((config.max_stake_percent - DEFAULT_MAX_STAKE_PERCENT).abs() < 1e-12);
    }

    #[test]
    fn test_from_lookup_rejects_bad_override() {
        let err = RiskConfig::from_lookup(|key| match key {
            "MAX_STAKE_PERCENT" => Some("-0.5".to_string()),
            _ => None,
        })
        .unwrap_err();

        assert!(matches!(
            err,
            ValidationError::ConfigValueOutOfRange { ref key, .. } if key == "max_stake_percent"
        ));
    }
}
