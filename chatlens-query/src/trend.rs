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

//! Per-day volume and mean sentiment

use chatlens_core::ChatEvent;
use chrono::{FixedOffset, NaiveDate, Offset, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DayPoint {
    pub date: NaiveDate,
    pub events: u64,
    pub mean_sentiment: f64,
}

/// Calendar days in ascending order; only days with events appear
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DailyTrend {
    pub days: Vec<DayPoint>,
    pub skipped: usize,
}

impl DailyTrend {
    pub fn from_events(events: &[ChatEvent]) -> Self {
        Self::from_events_in(events, Utc.fix())
    }

    /// Group by the calendar date as seen from `offset`
    pub fn from_events_in(events: &[ChatEvent], offset: FixedOffset) -> Self {
        let mut by_day: BTreeMap<NaiveDate, (u64, f64)> = BTreeMap::new();
        let mut skipped = 0;
        for event in events {
            match event.timestamp {
                Some(ts) => {
                    let day = by_day
                        .entry(ts.with_timezone(&offset).date_naive())
                        .or_insert((0, 0.0));
                    day.0 += 1;
                    day.1 += event.sentiment_score;
                }
                None => skipped += 1,
            }
        }

        let days = by_day
            .into_iter()
            .map(|(date, (events, sentiment))| DayPoint {
                date,
                events,
                mean_sentiment: sentiment / events as f64,
            })
            .collect();
        Self { days, skipped }
    }

    pub fn total(&self) -> u64 {
        self.days.iter().map(|d| d.events).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(day: u32, hour: u32, score: f64) -> ChatEvent {
        ChatEvent::new("c", "u")
            .timestamp(Utc.with_ymd_and_hms(2025, 3, day, hour, 0, 0).unwrap())
            .sentiment(score)
    }

    #[test]
    fn test_days_ascending_with_means() {
        let events = vec![at(5, 10, 0.5), at(3, 9, -0.2), at(5, 22, 0.1), ChatEvent::new("c", "u")];
        let trend = DailyTrend::from_events(&events);

        assert_eq!(trend.days.len(), 2);
        assert_eq!(trend.days[0].date, NaiveDate::from_ymd_opt(2025, 3, 3).unwrap());
        assert_eq!(trend.days[1].events, 2);
        assert!((trend.days[1].mean_sentiment - 0.3).abs() < 1e-9);
        assert_eq!(trend.skipped, 1);
        assert_eq!(trend.total(), 3);
    }

    #[test]
    fn test_offset_moves_day_boundary() {
        let offset = FixedOffset::east_opt(3 * 3600).unwrap();
        let trend = DailyTrend::from_events_in(&[at(5, 22, 0.0)], offset);
        assert_eq!(trend.days[0].date, NaiveDate::from_ymd_opt(2025, 3, 6).unwrap());
    }

    #[test]
    fn test_empty() {
        assert_eq!(DailyTrend::from_events(&[]), DailyTrend::default());
    }
}
