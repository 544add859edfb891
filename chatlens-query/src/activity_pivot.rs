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

//! Weekday x hour activity pivot
//!
//! Always emits the full 7 x 24 grid (Monday hour 0 through Sunday hour 23)
//! with explicit zeros. Events without a usable timestamp are left out of
//! the grid and only counted in [`ActivityPivot::skipped`].

use chatlens_core::{ChatEvent, ChatlensError, PivotConfig, Result};
use chrono::{Datelike, FixedOffset, Offset, Timelike, Utc, Weekday};
use serde::Serialize;
use tracing::debug;

pub const HOURS_PER_DAY: usize = 24;

/// Weekdays in grid order
pub const WEEKDAYS: [Weekday; 7] = [
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
    Weekday::Sat,
    Weekday::Sun,
];

pub const CELL_COUNT: usize = WEEKDAYS.len() * HOURS_PER_DAY;

pub fn weekday_name(day: Weekday) -> &'static str {
    match day {
        Weekday::Mon => "Monday",
        Weekday::Tue => "Tuesday",
        Weekday::Wed => "Wednesday",
        Weekday::Thu => "Thursday",
        Weekday::Fri => "Friday",
        Weekday::Sat => "Saturday",
        Weekday::Sun => "Sunday",
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PivotCell {
    pub weekday: &'static str,
    pub hour: u32,
    pub count: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ActivityPivot {
    pub cells: Vec<PivotCell>,
    /// Events excluded for lack of a timestamp
    pub skipped: usize,
}

impl ActivityPivot {
    fn zeroed() -> Self {
        let cells = WEEKDAYS
            .iter()
            .flat_map(|day| {
                (0..HOURS_PER_DAY as u32).map(move |hour| PivotCell {
                    weekday: weekday_name(*day),
                    hour,
                    count: 0,
                })
            })
            .collect();
        Self { cells, skipped: 0 }
    }

    fn slot(day: Weekday, hour: u32) -> usize {
        day.num_days_from_monday() as usize * HOURS_PER_DAY + hour as usize
    }

    /// Count for one bucket; 0 for an hour outside 0-23
    pub fn get(&self, day: Weekday, hour: u32) -> u64 {
        if hour as usize >= HOURS_PER_DAY {
            return 0;
        }
        self.cells[Self::slot(day, hour)].count
    }

    /// Sum of all bucket counts
    pub fn total(&self) -> u64 {
        self.cells.iter().map(|cell| cell.count).sum()
    }

    /// The busiest bucket, earliest in grid order on ties; `None` when empty
    pub fn peak(&self) -> Option<PivotCell> {
        self.cells
            .iter()
            .filter(|cell| cell.count > 0)
            .fold(None, |best: Option<&PivotCell>, cell| match best {
                Some(b) if b.count >= cell.count => Some(b),
                _ => Some(cell),
            })
            .copied()
    }
}

/// Buckets events by weekday and hour in a fixed UTC offset
#[derive(Debug, Clone)]
pub struct ActivityPivotBuilder {
    offset: FixedOffset,
}

impl Default for ActivityPivotBuilder {
    fn default() -> Self {
        Self {
            offset: Utc.fix(),
        }
    }
}

impl ActivityPivotBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_offset(offset: FixedOffset) -> Self {
        Self { offset }
    }

    pub fn from_config(config: &PivotConfig) -> Result<Self> {
        let offset = FixedOffset::east_opt(config.utc_offset_minutes * 60).ok_or_else(|| {
            ChatlensError::config(format!(
                "pivot offset of {} minutes is out of range",
                config.utc_offset_minutes
            ))
        })?;
        Ok(Self::with_offset(offset))
    }

    pub fn offset(&self) -> FixedOffset {
        self.offset
    }

    pub fn build(&self, events: &[ChatEvent]) -> ActivityPivot {
        let mut pivot = ActivityPivot::zeroed();
        for event in events {
            match event.timestamp {
                Some(ts) => {
                    let local = ts.with_timezone(&self.offset);
                    let slot = ActivityPivot::slot(local.weekday(), local.hour());
                    pivot.cells[slot].count += 1;
                }
                None => pivot.skipped += 1,
            }
        }
        debug!(
            bucketed = events.len() - pivot.skipped,
            skipped = pivot.skipped,
            "built activity pivot"
        );
        pivot
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(y: i32, m: u32, d: u32, h: u32) -> ChatEvent {
        ChatEvent::new("c", "u").timestamp(Utc.with_ymd_and_hms(y, m, d, h, 5, 0).unwrap())
    }

    #[test]
    fn test_empty_input_gives_full_zero_grid() {
        let pivot = ActivityPivotBuilder::new().build(&[]);
        assert_eq!(pivot.cells.len(), CELL_COUNT);
        assert!(pivot.cells.iter().all(|c| c.count == 0));
        assert_eq!(pivot.cells[0].weekday, "Monday");
        assert_eq!(pivot.cells[0].hour, 0);
        assert_eq!(pivot.cells[167].weekday, "Sunday");
        assert_eq!(pivot.cells[167].hour, 23);
        assert_eq!(pivot.peak(), None);
    }

    #[test]
    fn test_buckets_by_weekday_and_hour() {
        // 2025-01-06 is a Monday
        let events = vec![at(2025, 1, 6, 9), at(2025, 1, 13, 9), at(2025, 1, 12, 23)];
        let pivot = ActivityPivotBuilder::new().build(&events);

        assert_eq!(pivot.get(Weekday::Mon, 9), 2);
        assert_eq!(pivot.get(Weekday::Sun, 23), 1);
        assert_eq!(pivot.total(), 3);
        assert_eq!(pivot.peak().map(|c| (c.weekday, c.hour)), Some(("Monday", 9)));
    }

    #[test]
    fn test_missing_timestamps_are_skipped() {
        let events = vec![at(2025, 1, 6, 9), ChatEvent::new("c", "u")];
        let pivot = ActivityPivotBuilder::new().build(&events);
        assert_eq!(pivot.total(), 1);
        assert_eq!(pivot.skipped, 1);
        assert_eq!(pivot.cells.len(), CELL_COUNT);
    }

    #[test]
    fn test_offset_shifts_buckets() {
        // Monday 23:05 UTC is Tuesday 01:05 at UTC+2
        let events = vec![at(2025, 1, 6, 23)];
        let offset = FixedOffset::east_opt(2 * 3600).unwrap();
        let pivot = ActivityPivotBuilder::with_offset(offset).build(&events);
        assert_eq!(pivot.get(Weekday::Tue, 1), 1);
        assert_eq!(pivot.get(Weekday::Mon, 23), 0);
    }

    #[test]
    fn test_config_offset() {
        let builder = ActivityPivotBuilder::from_config(&PivotConfig {
            utc_offset_minutes: -300,
        })
        .unwrap();
        let pivot = builder.build(&[at(2025, 1, 6, 3)]);
        assert_eq!(pivot.get(Weekday::Sun, 22), 1);

        assert!(ActivityPivotBuilder::from_config(&PivotConfig {
            utc_offset_minutes: 24 * 60
        })
        .is_err());
    }
}
