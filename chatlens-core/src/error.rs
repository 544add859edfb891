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

//! Chatlens error types

use thiserror::Error;

/// Result type for Chatlens operations
pub type Result<T> = std::result::Result<T, ChatlensError>;

/// Errors that can occur across the Chatlens crates
///
/// Aggregations never produce these: empty or skewed input always yields an
/// empty result. Errors come from invalid generator arguments, configuration
/// and the storage/export edges.
#[derive(Debug, Error)]
pub enum ChatlensError {
    /// Caller passed an argument outside the accepted domain
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Configuration could not be loaded or failed validation
    #[error("Configuration error: {0}")]
    Config(String),

    /// Event store failed to produce a snapshot
    #[error("Event store error: {0}")]
    Store(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Export error
    #[error("Export error: {0}")]
    Export(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl ChatlensError {
    pub fn invalid_argument(msg: impl Into<String>) -> Self {
        Self::InvalidArgument(msg.into())
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }
}

impl From<serde_json::Error> for ChatlensError {
    fn from(e: serde_json::Error) -> Self {
        ChatlensError::Serialization(e.to_string())
    }
}

impl From<toml::de::Error> for ChatlensError {
    fn from(e: toml::de::Error) -> Self {
        ChatlensError::Config(e.to_string())
    }
}

impl From<csv::Error> for ChatlensError {
    fn from(e: csv::Error) -> Self {
        ChatlensError::Export(e.to_string())
    }
}
