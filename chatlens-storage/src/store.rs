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

//! Read-only event stores
//!
//! A store hands out a point-in-time snapshot of every event it holds. The
//! file store accepts either a JSON array or JSON Lines; records that do not
//! parse as a [`ChatEvent`] are logged and skipped rather than failing the
//! whole load.

use chatlens_core::{ChatEvent, ChatlensError, Result};
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Source of chat events
pub trait EventStore: Send + Sync {
    /// Snapshot of all stored events
    fn fetch_all(&self) -> Result<Vec<ChatEvent>>;

    /// Short label for logs
    fn describe(&self) -> String {
        "event store".to_string()
    }
}

/// Store over an owned vector, mostly for tests and embedding
#[derive(Debug, Clone, Default)]
pub struct InMemoryEventStore {
    events: Vec<ChatEvent>,
}

impl InMemoryEventStore {
    pub fn new(events: Vec<ChatEvent>) -> Self {
        Self { events }
    }

    pub fn push(&mut self, event: ChatEvent) {
        self.events.push(event);
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

impl EventStore for InMemoryEventStore {
    fn fetch_all(&self) -> Result<Vec<ChatEvent>> {
        Ok(self.events.clone())
    }

    fn describe(&self) -> String {
        format!("in-memory store ({} events)", self.events.len())
    }
}

/// Store backed by a JSON or JSON Lines file
#[derive(Debug, Clone)]
pub struct JsonFileEventStore {
    path: PathBuf,
}

impl JsonFileEventStore {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Serialize `events` as a pretty JSON array at `path`
    pub fn write(path: impl AsRef<Path>, events: &[ChatEvent]) -> Result<()> {
        let json = serde_json::to_string_pretty(events)?;
        fs::write(path, json)?;
        Ok(())
    }

    fn parse_array(&self, text: &str) -> Result<Vec<ChatEvent>> {
        let records: Vec<Value> = serde_json::from_str(text).map_err(|e| {
            ChatlensError::Store(format!("{} is not a JSON array: {e}", self.path.display()))
        })?;
        let total = records.len();
        let events: Vec<ChatEvent> = records
            .into_iter()
            .enumerate()
            .filter_map(|(i, record)| match serde_json::from_value(record) {
                Ok(event) => Some(event),
                Err(e) => {
                    warn!(path = %self.path.display(), record = i, error = %e, "skipping malformed event");
                    None
                }
            })
            .collect();
        debug!(total, kept = events.len(), "parsed JSON array");
        Ok(events)
    }

    fn parse_lines(&self, text: &str) -> Vec<ChatEvent> {
        let mut events = Vec::new();
        for (i, line) in text.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            match serde_json::from_str::<ChatEvent>(line) {
                Ok(event) => events.push(event),
                Err(e) => {
                    warn!(path = %self.path.display(), line = i + 1, error = %e, "skipping malformed event");
                }
            }
        }
        events
    }
}

impl EventStore for JsonFileEventStore {
    fn fetch_all(&self) -> Result<Vec<ChatEvent>> {
        let text = fs::read_to_string(&self.path).map_err(|e| {
            ChatlensError::Store(format!("cannot read {}: {e}", self.path.display()))
        })?;
        if text.trim_start().starts_with('[') {
            self.parse_array(&text)
        } else {
            Ok(self.parse_lines(&text))
        }
    }

    fn describe(&self) -> String {
        format!("file store {}", self.path.display())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_in_memory_snapshot() {
        let mut store = InMemoryEventStore::default();
        store.push(ChatEvent::new("c1", "u1"));
        let snapshot = store.fetch_all().unwrap();
        store.push(ChatEvent::new("c2", "u2"));

        assert_eq!(snapshot.len(), 1);
        assert_eq!(store.fetch_all().unwrap().len(), 2);
    }

    #[test]
    fn test_json_lines_skip_malformed() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, r#"{{"conversation_id":"c1","user_id":"u1","timestamp":"2025-01-06 09:00:00"}}"#).unwrap();
        writeln!(file, "not json at all").unwrap();
        writeln!(file).unwrap();
        writeln!(file, r#"{{"conversation_id":"c2","actor_id":"u2","intent":""}}"#).unwrap();

        let events = JsonFileEventStore::new(file.path()).fetch_all().unwrap();
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].actor_id, "u1");
        assert!(events[0].timestamp.is_some());
        assert_eq!(events[1].intent, None);
    }

    #[test]
    fn test_json_array_round_trip() {
        let file = NamedTempFile::new().unwrap();
        let events = vec![
            ChatEvent::new("c1", "u1").message("hello there").sentiment(0.5),
            ChatEvent::new("c2", "u2").topic("warranty claims"),
        ];
        JsonFileEventStore::write(file.path(), &events).unwrap();

        let loaded = JsonFileEventStore::new(file.path()).fetch_all().unwrap();
        assert_eq!(loaded, events);
    }

    #[test]
    fn test_missing_file_is_store_error() {
        let store = JsonFileEventStore::new("/nonexistent/events.json");
        assert!(matches!(store.fetch_all(), Err(ChatlensError::Store(_))));
    }
}
