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

//! Pre-aggregation event filter
//!
//! Every allow-list is optional: an empty list places no restriction. When a
//! list is set, events lacking that attribute are excluded.

use chatlens_core::{ChatEvent, ChatlensError, Intent, Region, SentimentLabel, Topic};
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimeWindow {
    #[serde(rename = "last_24_hours")]
    Last24Hours,
    #[serde(rename = "last_7_days")]
    Last7Days,
    #[serde(rename = "last_30_days")]
    Last30Days,
    #[default]
    AllTime,
}

impl TimeWindow {
    pub fn span(self) -> Option<Duration> {
        match self {
            TimeWindow::Last24Hours => Some(Duration::days(1)),
            TimeWindow::Last7Days => Some(Duration::days(7)),
            TimeWindow::Last30Days => Some(Duration::days(30)),
            TimeWindow::AllTime => None,
        }
    }

    /// Earliest admitted instant relative to `now`
    pub fn cutoff(self, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
        self.span().map(|span| now - span)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            TimeWindow::Last24Hours => "last_24_hours",
            TimeWindow::Last7Days => "last_7_days",
            TimeWindow::Last30Days => "last_30_days",
            TimeWindow::AllTime => "all_time",
        }
    }
}

impl fmt::Display for TimeWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TimeWindow {
    type Err = ChatlensError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "last_24_hours" | "24h" => Ok(TimeWindow::Last24Hours),
            "last_7_days" | "7d" => Ok(TimeWindow::Last7Days),
            "last_30_days" | "30d" => Ok(TimeWindow::Last30Days),
            "all_time" | "all" => Ok(TimeWindow::AllTime),
            other => Err(ChatlensError::invalid_argument(format!(
                "unknown time window '{other}'"
            ))),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EventFilter {
    pub actors: Vec<String>,
    pub sentiments: Vec<SentimentLabel>,
    pub topics: Vec<Topic>,
    pub intents: Vec<Intent>,
    pub regions: Vec<Region>,
    pub window: TimeWindow,
    /// Case-insensitive substring of the user message or bot reply
    pub search: Option<String>,
}

fn allowed<T: PartialEq>(list: &[T], value: Option<&T>) -> bool {
    list.is_empty() || value.map_or(false, |v| list.contains(v))
}

impl EventFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn actors<I, S>(mut self, actors: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.actors = actors.into_iter().map(Into::into).collect();
        self
    }

    pub fn sentiments(mut self, sentiments: impl IntoIterator<Item = SentimentLabel>) -> Self {
        self.sentiments = sentiments.into_iter().collect();
        self
    }

    pub fn topics(mut self, topics: impl IntoIterator<Item = Topic>) -> Self {
        self.topics = topics.into_iter().collect();
        self
    }

    pub fn intents(mut self, intents: impl IntoIterator<Item = Intent>) -> Self {
        self.intents = intents.into_iter().collect();
        self
    }

    pub fn regions(mut self, regions: impl IntoIterator<Item = Region>) -> Self {
        self.regions = regions.into_iter().collect();
        self
    }

    pub fn window(mut self, window: TimeWindow) -> Self {
        self.window = window;
        self
    }

    pub fn search(mut self, term: impl Into<String>) -> Self {
        self.search = Some(term.into());
        self
    }

    /// True when nothing would be filtered out
    pub fn is_unrestricted(&self) -> bool {
        self.actors.is_empty()
            && self.sentiments.is_empty()
            && self.topics.is_empty()
            && self.intents.is_empty()
            && self.regions.is_empty()
            && self.window == TimeWindow::AllTime
            && self.search.as_deref().map_or(true, str::is_empty)
    }

    pub fn matches(&self, event: &ChatEvent, now: DateTime<Utc>) -> bool {
        if !self.actors.is_empty() && !self.actors.iter().any(|a| *a == event.actor_id) {
            return false;
        }
        if !allowed(&self.sentiments, event.sentiment_label.as_ref())
            || !allowed(&self.topics, event.topic.as_ref())
            || !allowed(&self.intents, event.intent.as_ref())
            || !allowed(&self.regions, event.region.as_ref())
        {
            return false;
        }
        if let Some(cutoff) = self.window.cutoff(now) {
            match event.timestamp {
                Some(ts) if ts >= cutoff => {}
                _ => return false,
            }
        }
        match self.search.as_deref() {
            Some(term) if !term.is_empty() => {
                let needle = term.to_lowercase();
                event.user_message.to_lowercase().contains(&needle)
                    || event.bot_reply.to_lowercase().contains(&needle)
            }
            _ => true,
        }
    }

    /// Matching events, cloned, in input order
    pub fn apply(&self, events: &[ChatEvent], now: DateTime<Utc>) -> Vec<ChatEvent> {
        events
            .iter()
            .filter(|event| self.matches(event, now))
            .cloned()
            .collect()
    }
}
