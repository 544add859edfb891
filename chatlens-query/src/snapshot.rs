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

//! Every derived dashboard structure, computed from one event slice

use crate::activity_pivot::{ActivityPivot, ActivityPivotBuilder};
use crate::correlation::CorrelationMatrix;
use crate::flow::FlowTable;
use crate::metrics::{ActorMetrics, KpiStatus, RadarScores, SentimentDistribution, SummaryMetrics};
use crate::relation_graph::RelationGraph;
use crate::term_frequency::{TermFrequency, TermFrequencyExtractor};
use crate::trend::DailyTrend;
use chatlens_core::{AnalyticsConfig, ChatEvent, Result};
use serde::Serialize;
use std::time::Instant;
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardSnapshot {
    pub summary: SummaryMetrics,
    pub kpi: KpiStatus,
    pub terms: TermFrequency,
    pub top_terms: Vec<(String, u64)>,
    pub relation_graph: RelationGraph,
    pub activity: ActivityPivot,
    pub flow: FlowTable,
    pub actors: Vec<ActorMetrics>,
    pub radar: Vec<RadarScores>,
    pub sentiment: SentimentDistribution,
    pub daily: DailyTrend,
    pub correlation: CorrelationMatrix,
}

impl DashboardSnapshot {
    pub fn compute(events: &[ChatEvent], config: &AnalyticsConfig) -> Result<Self> {
        config.validate()?;
        let started = Instant::now();

        let pivot_builder = ActivityPivotBuilder::from_config(&config.pivot)?;
        let offset = pivot_builder.offset();

        let terms = TermFrequencyExtractor::new(&config.terms).extract_user_messages(events);
        let top_terms = terms.top(config.terms.top_terms);
        let summary = SummaryMetrics::from_events(events);
        let kpi = summary.check(&config.kpi);
        let actors = ActorMetrics::from_events(events);
        let radar = ActorMetrics::radar(&actors);

        let snapshot = Self {
            summary,
            kpi,
            terms,
            top_terms,
            relation_graph: RelationGraph::from_events(events),
            activity: pivot_builder.build(events),
            flow: FlowTable::from_events(events),
            actors,
            radar,
            sentiment: SentimentDistribution::from_events(events),
            daily: DailyTrend::from_events_in(events, offset),
            correlation: CorrelationMatrix::from_events(events),
        };

        debug!(
            events = events.len(),
            elapsed_us = started.elapsed().as_micros() as u64,
            "computed dashboard snapshot"
        );
        Ok(snapshot)
    }

    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    #[test]
    fn test_empty_snapshot() {
        let snapshot = DashboardSnapshot::compute(&[], &AnalyticsConfig::default()).unwrap();
        assert_eq!(snapshot.summary.total_events, 0);
        assert!(snapshot.terms.is_empty());
        assert!(snapshot.relation_graph.is_empty());
        assert_eq!(snapshot.activity.cells.len(), 168);
        assert!(snapshot.flow.is_empty());
        assert!(snapshot.actors.is_empty());
        assert!(snapshot.daily.days.is_empty());
    }

    #[test]
    fn test_snapshot_serializes() {
        let events = vec![ChatEvent::new("c1", "u1")
            .message("Topic: billing questions. refund please")
            .topic("billing questions")
            .intent("request")
            .sentiment(0.4)
            .response_time(0.8)
            .timestamp(Utc.with_ymd_and_hms(2025, 1, 6, 9, 0, 0).unwrap())];
        let snapshot = DashboardSnapshot::compute(&events, &AnalyticsConfig::default()).unwrap();
        assert_eq!(snapshot.top_terms[0].1, 1);
        assert_eq!(snapshot.flow.stage2_total(), 1);

        let json: serde_json::Value = serde_json::from_str(&snapshot.to_json_pretty().unwrap()).unwrap();
        assert_eq!(json["summary"]["total_events"], 1);
        assert_eq!(json["activity"]["cells"].as_array().unwrap().len(), 168);
        assert_eq!(json["relation_graph"]["nodes"][1]["type"], "topic");
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let mut config = AnalyticsConfig::default();
        config.terms.min_token_chars = 0;
        assert!(DashboardSnapshot::compute(&[], &config).is_err());
    }
}
