//! Optional bas.toml configuration: ledger location and the cost-estimate
//! ratios used when generating financial records from sales.

use biz_analytics_core::sales::CostEstimates;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::Deserialize;
use std::path::{Path, PathBuf};

const DEFAULT_CONFIG_FILE: &str = "bas.toml";

// ---------------------------------------------------------------------------
// TOML shape
// ---------------------------------------------------------------------------

#[derive(Debug, Default, Deserialize)]
struct FileConfig {
    #[serde(default)]
    ledger: LedgerSection,
    #[serde(default)]
    estimates: EstimatesSection,
}

#[derive(Debug, Default, Deserialize)]
struct LedgerSection {
    path: Option<PathBuf>,
}

#[derive(Debug, Deserialize)]
struct EstimatesSection {
    #[serde(default = "default_variable_ratio")]
    variable_cost_ratio: Decimal,
    #[serde(default = "default_fixed_ratio")]
    fixed_cost_ratio: Decimal,
}

impl Default for EstimatesSection {
    fn default() -> Self {
        Self {
            variable_cost_ratio: default_variable_ratio(),
            fixed_cost_ratio: default_fixed_ratio(),
        }
    }
}

fn default_variable_ratio() -> Decimal {
    dec!(0.6)
}

fn default_fixed_ratio() -> Decimal {
    dec!(0.1)
}

// ---------------------------------------------------------------------------
// Public config
// ---------------------------------------------------------------------------

#[derive(Debug)]
pub struct CliConfig {
    pub ledger_path: Option<PathBuf>,
    pub estimates: CostEstimates,
}

/// Load configuration. An explicitly given path must exist; otherwise
/// bas.toml in the working directory is used when present, and built-in
/// defaults apply when it is not.
pub fn load(explicit: Option<&Path>) -> Result<CliConfig, Box<dyn std::error::Error>> {
    let path = match explicit {
        Some(p) => {
            if !p.exists() {
                return Err(format!("Config file not found: {}", p.display()).into());
            }
            Some(p.to_path_buf())
        }
        None => {
            let default = PathBuf::from(DEFAULT_CONFIG_FILE);
            default.exists().then_some(default)
        }
    };

    let file: FileConfig = match path {
        Some(ref p) => {
            let contents = std::fs::read_to_string(p)
                .map_err(|e| format!("Failed to read config '{}': {}", p.display(), e))?;
            tracing::debug!(path = %p.display(), "loaded config file");
            toml::from_str(&contents)
                .map_err(|e| format!("Failed to parse config '{}': {}", p.display(), e))?
        }
        None => FileConfig::default(),
    };

    Ok(CliConfig {
        ledger_path: file.ledger.path,
        estimates: CostEstimates {
            variable_cost_ratio: file.estimates.variable_cost_ratio,
            fixed_cost_ratio: file.estimates.fixed_cost_ratio,
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_config_uses_defaults() {
        let file: FileConfig = toml::from_str("").unwrap();
        assert!(file.ledger.path.is_none());
        assert_eq!(file.estimates.variable_cost_ratio, dec!(0.6));
        assert_eq!(file.estimates.fixed_cost_ratio, dec!(0.1));
    }

    #[test]
    fn test_full_config_parses() {
        let file: FileConfig = toml::from_str(
            r#"
            [ledger]
            path = "data/books.json"

            [estimates]
            variable_cost_ratio = 0.55
            fixed_cost_ratio = 0.15
            "#,
        )
        .unwrap();
        assert_eq!(file.ledger.path, Some(PathBuf::from("data/books.json")));
        assert_eq!(file.estimates.variable_cost_ratio, dec!(0.55));
        assert_eq!(file.estimates.fixed_cost_ratio, dec!(0.15));
    }

    #[test]
    fn test_partial_estimates_fill_defaults() {
        let file: FileConfig = toml::from_str(
            r#"
            [estimates]
            fixed_cost_ratio = 0.2
            "#,
        )
        .unwrap();
        assert_eq!(file.estimates.variable_cost_ratio, dec!(0.6));
        assert_eq!(file.estimates.fixed_cost_ratio, dec!(0.2));
    }
}
