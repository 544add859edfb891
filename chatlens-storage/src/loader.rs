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

//! Store loading with a synthetic fallback

use crate::store::EventStore;
use chatlens_core::{ChatEvent, Result};
use chatlens_synthetic::SyntheticEventGenerator;
use chrono::{DateTime, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{info, warn};

/// Where a loaded batch of events came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventSource {
    Store,
    Synthetic,
}

impl fmt::Display for EventSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EventSource::Store => f.write_str("store"),
            EventSource::Synthetic => f.write_str("synthetic"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct LoadedEvents {
    pub events: Vec<ChatEvent>,
    pub source: EventSource,
}

/// Fetch from `store`, generating `count` events anchored at `now` when the
/// store fails or holds nothing.
///
/// Only the generator can make this fail (for example `count == 0` on the
/// fallback path); store errors are logged and absorbed.
pub fn load_or_synthesize<S, R>(
    store: &S,
    generator: &SyntheticEventGenerator,
    count: usize,
    rng: &mut R,
    now: DateTime<Utc>,
) -> Result<LoadedEvents>
where
    S: EventStore + ?Sized,
    R: Rng + ?Sized,
{
    match store.fetch_all() {
        Ok(events) if !events.is_empty() => {
            info!(store = %store.describe(), events = events.len(), "loaded events from store");
            return Ok(LoadedEvents {
                events,
                source: EventSource::Store,
            });
        }
        Ok(_) => {
            info!(store = %store.describe(), count, "store is empty, generating synthetic events");
        }
        Err(e) => {
            warn!(store = %store.describe(), error = %e, count, "store unavailable, generating synthetic events");
        }
    }

    let events = generator.generate_at(count, now, rng)?;
    Ok(LoadedEvents {
        events,
        source: EventSource::Synthetic,
    })
}
