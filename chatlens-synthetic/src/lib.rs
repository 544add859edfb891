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

//! Chatlens Synthetic
//!
//! Reproducible synthetic chat traffic. Used by the dashboard when the event
//! store is empty or unreachable, and by tests that need realistic volume.

pub mod config;
pub mod generator;

pub use config::{DropOffModel, SyntheticConfig, DEFAULT_HOUR_WEIGHTS};
pub use generator::SyntheticEventGenerator;
