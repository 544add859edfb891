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

//! Chatlens Core
//!
//! The conversation event model shared by every Chatlens crate:
//!
//! - [`ChatEvent`]: one exchange between an actor and the chatbot
//! - open categorical vocabularies (sentiment, intent, topic, region, status)
//! - [`ActorProfile`]: behavioural tendencies used by the synthetic generator
//! - [`EventField`] / [`FieldPresentation`]: field order and display contract
//! - configuration and the crate-wide error type

pub mod config;
pub mod error;
pub mod event;
pub mod presentation;
pub mod profile;
pub mod vocab;

pub use config::{
    load_toml, AnalyticsConfig, KpiTargets, PivotConfig, TermConfig, DEFAULT_STOPWORDS,
};
pub use error::{ChatlensError, Result};
pub use event::{parse_timestamp, ChatEvent, EventField};
pub use presentation::FieldPresentation;
pub use profile::{default_profiles, ActorProfile, Verbosity};
pub use vocab::{
    Intent, Region, ResolutionStatus, SentimentLabel, Topic, NEGATIVE_THRESHOLD,
    POSITIVE_THRESHOLD, TAG_VOCABULARY,
};
