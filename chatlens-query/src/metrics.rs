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

//! Dashboard metrics: headline KPIs, per-actor comparison, sentiment mix

use crate::relation_graph::intern;
use crate::stats::{mean, percentile, ratio};
use chatlens_core::{ChatEvent, KpiTargets, SentimentLabel};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

pub const P90: f64 = 0.9;

/// Headline numbers for an event slice
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SummaryMetrics {
    pub total_events: usize,
    pub unique_actors: usize,
    pub mean_response_time: Option<f64>,
    pub p90_response_time: Option<f64>,
    /// Fraction of events labelled positive, 0 when empty
    pub positive_ratio: f64,
    /// Fraction of events that dropped off, 0 when empty
    pub drop_off_rate: f64,
    /// Over events that carry a rating only
    pub mean_satisfaction: Option<f64>,
}

impl SummaryMetrics {
    pub fn from_events(events: &[ChatEvent]) -> Self {
        let total = events.len();
        let response_times: Vec<f64> = events.iter().map(|e| e.response_time).collect();
        let ratings: Vec<f64> = events
            .iter()
            .filter_map(|e| e.satisfaction.map(f64::from))
            .collect();
        let positive = events
            .iter()
            .filter(|e| e.sentiment_label == Some(SentimentLabel::Positive))
            .count();
        let dropped = events.iter().filter(|e| e.drop_off).count();
        let actors: HashSet<&str> = events.iter().map(|e| e.actor_id.as_str()).collect();

        Self {
            total_events: total,
            unique_actors: actors.len(),
            mean_response_time: mean(&response_times),
            p90_response_time: percentile(&response_times, P90),
            positive_ratio: ratio(positive as f64, total as f64),
            drop_off_rate: ratio(dropped as f64, total as f64),
            mean_satisfaction: mean(&ratings),
        }
    }

    pub fn check(&self, targets: &KpiTargets) -> KpiStatus {
        KpiStatus {
            response_time_ok: self
                .mean_response_time
                .map(|rt| rt < targets.max_mean_response_time),
            positive_ok: (self.total_events > 0)
                .then(|| self.positive_ratio > targets.min_positive_ratio),
            drop_off_ok: (self.total_events > 0)
                .then(|| self.drop_off_rate < targets.max_drop_off_rate),
        }
    }
}

/// `None` means there was nothing to judge
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct KpiStatus {
    pub response_time_ok: Option<bool>,
    pub positive_ok: Option<bool>,
    pub drop_off_ok: Option<bool>,
}

/// Per-actor comparison row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActorMetrics {
    pub actor: String,
    pub events: usize,
    pub mean_response_time: f64,
    pub mean_sentiment: f64,
    pub mean_message_length: f64,
    /// 0-100
    pub drop_off_pct: f64,
}

/// Radar-chart scores, each in [0, 1] with 1 the better end
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RadarScores {
    pub actor: String,
    pub response_speed: f64,
    pub sentiment: f64,
    pub length: f64,
    pub retention: f64,
    pub volume: f64,
}

#[derive(Default)]
struct ActorAccumulator {
    events: usize,
    response_time: f64,
    sentiment: f64,
    length: f64,
    dropped: usize,
}

impl ActorMetrics {
    /// One row per actor, in first-seen order
    pub fn from_events(events: &[ChatEvent]) -> Vec<ActorMetrics> {
        let mut order = Vec::new();
        let mut index = HashMap::new();
        let mut acc: Vec<ActorAccumulator> = Vec::new();

        for event in events {
            let position = intern(&mut order, &mut index, &event.actor_id);
            if position == acc.len() {
                acc.push(ActorAccumulator::default());
            }
            let slot = &mut acc[position];
            slot.events += 1;
            slot.response_time += event.response_time;
            slot.sentiment += event.sentiment_score;
            slot.length += event.message_length as f64;
            if event.drop_off {
                slot.dropped += 1;
            }
        }

        order
            .into_iter()
            .zip(acc)
            .map(|(actor, a)| {
                let n = a.events as f64;
                ActorMetrics {
                    actor,
                    events: a.events,
                    mean_response_time: a.response_time / n,
                    mean_sentiment: a.sentiment / n,
                    mean_message_length: a.length / n,
                    drop_off_pct: a.dropped as f64 / n * 100.0,
                }
            })
            .collect()
    }

    /// Normalize rows against the slice maxima
    pub fn radar(rows: &[ActorMetrics]) -> Vec<RadarScores> {
        let max_rt = rows.iter().map(|r| r.mean_response_time).fold(0.0, f64::max);
        let max_len = rows.iter().map(|r| r.mean_message_length).fold(0.0, f64::max);
        let max_events = rows.iter().map(|r| r.events).max().unwrap_or(0) as f64;

        rows.iter()
            .map(|row| RadarScores {
                actor: row.actor.clone(),
                response_speed: (1.0 - ratio(row.mean_response_time, max_rt)).clamp(0.0, 1.0),
                sentiment: ((row.mean_sentiment + 1.0) / 2.0).clamp(0.0, 1.0),
                length: ratio(row.mean_message_length, max_len).clamp(0.0, 1.0),
                retention: (1.0 - row.drop_off_pct / 100.0).clamp(0.0, 1.0),
                volume: ratio(row.events as f64, max_events).clamp(0.0, 1.0),
            })
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabelCount {
    pub label: String,
    pub count: u64,
}

/// Events per sentiment label, first-seen order; unlabelled events are skipped
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SentimentDistribution {
    pub counts: Vec<LabelCount>,
}

impl SentimentDistribution {
    pub fn from_events(events: &[ChatEvent]) -> Self {
        let mut counts: Vec<LabelCount> = Vec::new();
        let mut index: HashMap<&str, usize> = HashMap::new();
        for label in events
            .iter()
            .filter_map(|e| e.sentiment_label.as_ref())
            .filter(|l| !l.is_blank())
        {
            match index.get(label.as_str()) {
                Some(&i) => counts[i].count += 1,
                None => {
                    index.insert(label.as_str(), counts.len());
                    counts.push(LabelCount {
                        label: label.as_str().to_string(),
                        count: 1,
                    });
                }
            }
        }
        Self { counts }
    }

    pub fn get(&self, label: &str) -> u64 {
        self.counts
            .iter()
            .find(|c| c.label == label)
            .map_or(0, |c| c.count)
    }

    pub fn total(&self) -> u64 {
        self.counts.iter().map(|c| c.count).sum()
    }
}
