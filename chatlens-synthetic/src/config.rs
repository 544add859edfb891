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

//! Tunable heuristics for synthetic traffic
//!
//! None of these constants is load-bearing for correctness; they only shape
//! how plausible the generated dashboard looks.

use chatlens_core::{ChatlensError, Result};
use serde::{Deserialize, Serialize};

/// Relative activity per hour of day, peaking over business hours
pub const DEFAULT_HOUR_WEIGHTS: [f64; 24] = [
    1.0, 1.0, 1.0, 1.0, 1.0, 2.0, 5.0, 10.0, 15.0, 20.0, 18.0, 15.0, 20.0, 18.0, 15.0, 12.0, 10.0,
    8.0, 5.0, 3.0, 2.0, 2.0, 1.0, 1.0,
];

/// Generator configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SyntheticConfig {
    /// 24 non-negative weights, one per hour of day
    pub hour_weights: Vec<f64>,
    /// Events are spread over `0..=max_days_ago` days before the anchor
    pub max_days_ago: u32,
    pub drop_off: DropOffModel,
    /// Probability that an event carries a satisfaction rating
    pub satisfaction_rate: f64,
    /// Probability that the actor is flagged as a first-time user
    pub first_time_user_rate: f64,
    /// Lower bound on the size of the conversation id pool
    pub min_conversations: usize,
    /// Pool size otherwise scales as `count / events_per_conversation`
    pub events_per_conversation: usize,
}

impl Default for SyntheticConfig {
    fn default() -> Self {
        Self {
            hour_weights: DEFAULT_HOUR_WEIGHTS.to_vec(),
            max_days_ago: 14,
            drop_off: DropOffModel::default(),
            satisfaction_rate: 0.7,
            first_time_user_rate: 0.3,
            min_conversations: 5,
            events_per_conversation: 15,
        }
    }
}

impl SyntheticConfig {
    pub fn validate(&self) -> Result<()> {
        if self.hour_weights.len() != 24 {
            return Err(ChatlensError::config(format!(
                "hour_weights needs 24 entries, got {}",
                self.hour_weights.len()
            )));
        }
        if self.hour_weights.iter().any(|w| !w.is_finite() || *w < 0.0) {
            return Err(ChatlensError::config("hour_weights must be finite and non-negative"));
        }
        if self.hour_weights.iter().sum::<f64>() <= 0.0 {
            return Err(ChatlensError::config("hour_weights must not all be zero"));
        }
        for (name, p) in [
            ("satisfaction_rate", self.satisfaction_rate),
            ("first_time_user_rate", self.first_time_user_rate),
            ("drop_off.base", self.drop_off.base),
        ] {
            if !(0.0..=1.0).contains(&p) {
                return Err(ChatlensError::config(format!("{name} must lie in [0, 1], got {p}")));
            }
        }
        if self.events_per_conversation == 0 {
            return Err(ChatlensError::config("events_per_conversation must be at least 1"));
        }
        Ok(())
    }

    /// Number of distinct conversation ids for `count` events
    pub fn conversation_pool_size(&self, count: usize) -> usize {
        (count / self.events_per_conversation)
            .max(self.min_conversations)
            .max(1)
    }
}

/// Probability model for conversation abandonment
///
/// `p = base + negative_penalty * [score < negative_threshold]
///        + slow_penalty * [response_time > slow_threshold]`, capped at 1.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DropOffModel {
    pub base: f64,
    pub negative_penalty: f64,
    pub negative_threshold: f64,
    pub slow_penalty: f64,
    /// Seconds
    pub slow_threshold: f64,
}

impl Default for DropOffModel {
    fn default() -> Self {
        Self {
            base: 0.1,
            negative_penalty: 0.3,
            negative_threshold: -0.5,
            slow_penalty: 0.3,
            slow_threshold: 1.5,
        }
    }
}

impl DropOffModel {
    pub fn probability(&self, sentiment_score: f64, response_time: f64) -> f64 {
        let mut p = self.base;
        if sentiment_score < self.negative_threshold {
            p += self.negative_penalty;
        }
        if response_time > self.slow_threshold {
            p += self.slow_penalty;
        }
        p.clamp(0.0, 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = SyntheticConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.hour_weights.len(), 24);
    }

    #[test]
    fn test_drop_off_probability() {
        let model = DropOffModel::default();
        assert!((model.probability(0.0, 1.0) - 0.1).abs() < 1e-9);
        assert!((model.probability(-0.6, 1.0) - 0.4).abs() < 1e-9);
        assert!((model.probability(-0.6, 2.0) - 0.7).abs() < 1e-9);
        assert!((model.probability(-0.5, 1.5) - 0.1).abs() < 1e-9);
    }

    #[test]
    fn test_invalid_weights_rejected() {
        let mut config = SyntheticConfig::default();
        config.hour_weights = vec![1.0; 23];
        assert!(config.validate().is_err());

        config.hour_weights = vec![0.0; 24];
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_conversation_pool_size() {
        let config = SyntheticConfig::default();
        assert_eq!(config.conversation_pool_size(1), 5);
        assert_eq!(config.conversation_pool_size(100), 6);
        assert_eq!(config.conversation_pool_size(300), 20);
    }
}
