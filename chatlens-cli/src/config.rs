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

//! `chatlens.toml`: every section optional, defaults otherwise

use anyhow::{Context, Result};
use chatlens_core::{default_profiles, load_toml, ActorProfile, AnalyticsConfig};
use chatlens_synthetic::SyntheticConfig;
use chatlens_telemetry::LoggingConfig;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChatlensConfig {
    pub analytics: AnalyticsConfig,
    pub synthetic: SyntheticConfig,
    /// Actors the synthetic generator draws from
    pub profiles: Vec<ActorProfile>,
    pub logging: LoggingConfig,
}

impl Default for ChatlensConfig {
    fn default() -> Self {
        Self {
            analytics: AnalyticsConfig::default(),
            synthetic: SyntheticConfig::default(),
            profiles: default_profiles(),
            logging: LoggingConfig::default(),
        }
    }
}

impl ChatlensConfig {
    /// Load from `path` when given; a missing file yields defaults
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let config: ChatlensConfig = match path {
            Some(path) => load_toml(path)
                .with_context(|| format!("Failed to load config from {}", path.display()))?,
            None => ChatlensConfig::default(),
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        self.analytics.validate().context("Invalid [analytics] section")?;
        self.synthetic.validate().context("Invalid [synthetic] section")?;
        for profile in &self.profiles {
            profile
                .validate()
                .with_context(|| format!("Invalid profile '{}'", profile.name))?;
        }
        Ok(())
    }
}
