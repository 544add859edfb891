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

//! Chatlens Query
//!
//! Pure derivations over a slice of [`ChatEvent`](chatlens_core::ChatEvent)s:
//! term frequencies, the actor-topic relation graph, the weekday x hour
//! activity pivot, the actor -> intent -> sentiment flow table and the
//! dashboard metrics. Nothing here performs I/O or holds state between calls.

pub mod activity_pivot;
pub mod correlation;
pub mod filter;
pub mod flow;
pub mod metrics;
pub mod relation_graph;
pub mod snapshot;
pub mod stats;
pub mod term_frequency;
pub mod trend;

pub use activity_pivot::{ActivityPivot, ActivityPivotBuilder, PivotCell, CELL_COUNT, WEEKDAYS};
pub use correlation::{CorrelationMatrix, CorrelationStrength, Measure};
pub use filter::{EventFilter, TimeWindow};
pub use flow::{FlowAggregator, FlowEdge, FlowTable};
pub use metrics::{
    ActorMetrics, KpiStatus, LabelCount, RadarScores, SentimentDistribution, SummaryMetrics,
};
pub use relation_graph::{GraphEdge, GraphNode, NodeKind, RelationGraph, RelationGraphBuilder};
pub use snapshot::DashboardSnapshot;
pub use term_frequency::{TermFrequency, TermFrequencyExtractor};
pub use trend::{DailyTrend, DayPoint};
