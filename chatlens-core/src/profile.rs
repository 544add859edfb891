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

//! Actor profiles used to shape synthetic traffic

use crate::error::{ChatlensError, Result};
use serde::{Deserialize, Serialize};
use std::ops::RangeInclusive;

/// How much an actor tends to write per message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Verbosity {
    Low,
    Medium,
    High,
}

impl Verbosity {
    /// Message length units drawn for this tier
    pub fn length_range(self) -> RangeInclusive<usize> {
        match self {
            Verbosity::Low => 5..=30,
            Verbosity::Medium => 20..=80,
            Verbosity::High => 50..=200,
        }
    }
}

/// A named actor with behavioural tendencies
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActorProfile {
    pub name: String,
    pub verbosity: Verbosity,
    /// Added to the base sentiment draw, in [-1, 1]
    pub sentiment_bias: f64,
    /// Multiplier applied to the base response time, > 0
    pub response_time_factor: f64,
}

impl ActorProfile {
    pub fn new(
        name: impl Into<String>,
        verbosity: Verbosity,
        sentiment_bias: f64,
        response_time_factor: f64,
    ) -> Self {
        Self {
            name: name.into(),
            verbosity,
            sentiment_bias,
            response_time_factor,
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.name.is_empty() {
            return Err(ChatlensError::invalid_argument("actor profile name is empty"));
        }
        if !(-1.0..=1.0).contains(&self.sentiment_bias) {
            return Err(ChatlensError::invalid_argument(format!(
                "sentiment bias {} of actor '{}' is outside [-1, 1]",
                self.sentiment_bias, self.name
            )));
        }
        if !(self.response_time_factor.is_finite() && self.response_time_factor > 0.0) {
            return Err(ChatlensError::invalid_argument(format!(
                "response time factor {} of actor '{}' must be positive",
                self.response_time_factor, self.name
            )));
        }
        Ok(())
    }
}

/// The five demo actors of the stock dashboard
pub fn default_profiles() -> Vec<ActorProfile> {
    vec![
        ActorProfile::new("user1", Verbosity::High, 0.3, 0.8),
        ActorProfile::new("user2", Verbosity::Medium, -0.2, 1.2),
        ActorProfile::new("user3", Verbosity::Low, 0.1, 1.0),
        ActorProfile::new("user4", Verbosity::High, -0.4, 0.7),
        ActorProfile::new("user5", Verbosity::Medium, 0.5, 1.1),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_profiles_are_valid() {
        let profiles = default_profiles();
        assert_eq!(profiles.len(), 5);
        assert!(profiles.iter().all(|p| p.validate().is_ok()));
    }

    #[test]
    fn test_invalid_profiles_rejected() {
        assert!(ActorProfile::new("", Verbosity::Low, 0.0, 1.0).validate().is_err());
        assert!(ActorProfile::new("a", Verbosity::Low, 1.5, 1.0).validate().is_err());
        assert!(ActorProfile::new("a", Verbosity::Low, 0.0, 0.0).validate().is_err());
    }

    #[test]
    fn test_verbosity_ranges() {
        assert_eq!(Verbosity::Low.length_range(), 5..=30);
        assert_eq!(Verbosity::High.length_range(), 50..=200);
    }
}
