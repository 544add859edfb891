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

//! Chatlens Storage
//!
//! The I/O edge of Chatlens: read-only event stores, the store-or-synthetic
//! loader, a TTL cache for computed dashboard snapshots and CSV export.

pub mod cache;
pub mod export;
pub mod loader;
pub mod store;

pub use cache::{CacheConfig, CacheStats, SnapshotCache, SnapshotKey};
pub use export::{write_csv, write_csv_file};
pub use loader::{load_or_synthesize, EventSource, LoadedEvents};
pub use store::{EventStore, InMemoryEventStore, JsonFileEventStore};
