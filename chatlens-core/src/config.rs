// Copyright 2025 Chatlens Contributors (https://github.com/chatlens/chatlens)
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the
// GNU Affero General Public License for more details.
//
// You should have received a copy of the GNU Affero General Public License
// along with this program. If not, see <https://www.gnu.org/licenses/>.

//! Configuration for Chatlens analytics
//!
//! Every section has a `Default` matching the stock dashboard, so a missing
//! config file or a partially filled one is always usable.

use crate::error::{ChatlensError, Result};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Words never counted in term frequencies
pub const DEFAULT_STOPWORDS: &[&str] = &[
    "the", "and", "to", "of", "a", "in", "for", "is", "on", "that", "by", "this", "with", "i",
    "you", "it", "not", "or", "be", "are", "from", "at", "as", "your", "have", "topic", "lorem",
    "ipsum",
];

/// Configuration for the derivation layer
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalyticsConfig {
    pub terms: TermConfig,
    pub pivot: PivotConfig,
    pub kpi: KpiTargets,
}

/// Tokenization settings for term frequencies
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TermConfig {
    pub stopwords: Vec<String>,
    /// Tokens shorter than this many characters are dropped
    pub min_token_chars: usize,
    /// Number of terms kept when a ranked list is requested
    pub top_terms: usize,
}

impl Default for TermConfig {
    fn default() -> Self {
        Self {
            stopwords: DEFAULT_STOPWORDS.iter().map(|s| s.to_string()).collect(),
            min_token_chars: 3,
            top_terms: 100,
        }
    }
}

/// Activity pivot settings
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PivotConfig {
    /// Fixed offset from UTC, in minutes, applied before bucketing
    pub utc_offset_minutes: i32,
}

/// Thresholds the headline cards are judged against
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct KpiTargets {
    /// Seconds
    pub max_mean_response_time: f64,
    pub min_positive_ratio: f64,
    pub max_drop_off_rate: f64,
}

impl Default for KpiTargets {
    fn default() -> Self {
        Self {
            max_mean_response_time: 1.0,
            min_positive_ratio: 0.6,
            max_drop_off_rate: 0.1,
        }
    }
}

impl AnalyticsConfig {
    pub fn validate(&self) -> Result<()> {
        if self.terms.min_token_chars == 0 {
            return Err(ChatlensError::config("terms.min_token_chars must be at least 1"));
        }
        // chrono::FixedOffset accepts strictly less than one day
        if self.pivot.utc_offset_minutes.abs() >= 24 * 60 {
            return Err(ChatlensError::config(format!(
                "pivot.utc_offset_minutes {} is not a valid offset",
                self.pivot.utc_offset_minutes
            )));
        }
        for (name, value) in [
            ("kpi.min_positive_ratio", self.kpi.min_positive_ratio),
            ("kpi.max_drop_off_rate", self.kpi.max_drop_off_rate),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(ChatlensError::config(format!("{name} must be within [0, 1]")));
            }
        }
        let max_response = self.kpi.max_mean_response_time;
        if !(max_response.is_finite() && max_response > 0.0) {
            return Err(ChatlensError::config(format!(
                "kpi.max_mean_response_time {max_response} must be a positive number of seconds"
            )));
        }
        Ok(())
    }
}

/// Load a TOML config section, falling back to defaults when the file is absent
pub fn load_toml<T>(path: &Path) -> Result<T>
where
    T: DeserializeOwned + Default,
{
    if !path.exists() {
        tracing::debug!(path = %path.display(), "config file not found, using defaults");
        return Ok(T::default());
    }
    let raw = std::fs::read_to_string(path)?;
    Ok(toml::from_str(&raw)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = AnalyticsConfig::default();
        assert_eq!(config.terms.min_token_chars, 3);
        assert!(config.terms.stopwords.iter().any(|w| w == "lorem"));
        assert_eq!(config.pivot.utc_offset_minutes, 0);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_toml_fills_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[terms]\nstopwords = [\"the\"]").unwrap();

        let config: AnalyticsConfig = load_toml(file.path()).unwrap();
        assert_eq!(config.terms.stopwords, vec!["the".to_string()]);
        assert_eq!(config.terms.top_terms, 100);
    }

    #[test]
    fn test_missing_file_yields_defaults() {
        let config: AnalyticsConfig = load_toml(Path::new("/nonexistent/chatlens.toml")).unwrap();
        assert_eq!(config, AnalyticsConfig::default());
    }

    #[test]
    fn test_invalid_offset_rejected() {
        let mut config = AnalyticsConfig::default();
        config.pivot.utc_offset_minutes = 24 * 60;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_invalid_response_time_target_rejected() {
        for bad in [0.0, -1.0, f64::NAN, f64::INFINITY] {
            let mut config = AnalyticsConfig::default();
            config.kpi.max_mean_response_time = bad;
            assert!(config.validate().is_err(), "{bad} should be rejected");
        }

        let mut config = AnalyticsConfig::default();
        config.kpi.max_mean_response_time = 0.25;
        assert!(config.validate().is_ok());
    }
}
