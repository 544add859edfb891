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

//! Conservation and associativity properties of the aggregators

use chatlens_core::ChatEvent;
use chatlens_query::{ActivityPivotBuilder, FlowTable, RelationGraph, TermFrequencyExtractor, CELL_COUNT};
use chatlens_synthetic::SyntheticEventGenerator;
use chrono::{TimeZone, Utc};
use proptest::prelude::*;
use rand::rngs::StdRng;
use rand::SeedableRng;

fn arb_text() -> impl Strategy<Value = String> {
    prop::collection::vec("[a-zA-Z]{1,8}[,.!?]?", 0..12).prop_map(|words| words.join(" "))
}

fn arb_corpus() -> impl Strategy<Value = Vec<String>> {
    prop::collection::vec(arb_text(), 0..8)
}

fn synthetic(seed: u64, count: usize) -> Vec<ChatEvent> {
    let anchor = Utc.with_ymd_and_hms(2025, 4, 1, 8, 30, 0).unwrap();
    SyntheticEventGenerator::with_defaults()
        .unwrap()
        .generate_at(count, anchor, &mut StdRng::seed_from_u64(seed))
        .unwrap()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn term_counting_is_associative(a in arb_corpus(), b in arb_corpus()) {
        let extractor = TermFrequencyExtractor::default();
        let union: Vec<&String> = a.iter().chain(b.iter()).collect();

        let merged = extractor.extract(&a).merged(&extractor.extract(&b));
        prop_assert_eq!(merged, extractor.extract(union));
    }

    #[test]
    fn pivot_keeps_every_timed_event(seed in any::<u64>(), count in 1usize..300, drop_every in 2usize..10) {
        let mut events = synthetic(seed, count);
        for event in events.iter_mut().step_by(drop_every) {
            event.timestamp = None;
        }
        let timed = events.iter().filter(|e| e.timestamp.is_some()).count() as u64;

        let pivot = ActivityPivotBuilder::new().build(&events);
        prop_assert_eq!(pivot.cells.len(), CELL_COUNT);
        prop_assert_eq!(pivot.total(), timed);
        prop_assert_eq!(pivot.skipped as u64, count as u64 - timed);
    }

    #[test]
    fn flow_stages_conserve_counts(seed in any::<u64>(), count in 1usize..300) {
        let mut events = synthetic(seed, count);
        // knock out some categories so the missing-value paths are exercised
        for event in events.iter_mut().step_by(5) {
            event.intent = None;
        }
        for event in events.iter_mut().step_by(7) {
            event.sentiment_label = None;
        }

        let with_intent = events.iter().filter(|e| e.intent.is_some()).count() as u64;
        let with_both = events
            .iter()
            .filter(|e| e.intent.is_some() && e.sentiment_label.is_some())
            .count() as u64;

        let table = FlowTable::from_events(&events);
        prop_assert_eq!(table.stage1_total(), with_intent);
        prop_assert_eq!(table.stage2_total(), with_both);

        for pair in table.stage1.windows(2) {
            prop_assert!((pair[0].source, pair[0].target) < (pair[1].source, pair[1].target));
        }
    }

    #[test]
    fn relation_graph_conserves_per_actor(seed in any::<u64>(), count in 1usize..300) {
        let mut events = synthetic(seed, count);
        for event in events.iter_mut().step_by(4) {
            event.topic = None;
        }
        let graph = RelationGraph::from_events(&events);

        for profile in ["user1", "user2", "user3", "user4", "user5"] {
            let expected = events
                .iter()
                .filter(|e| e.actor_id == profile && e.topic.is_some())
                .count() as u64;
            prop_assert_eq!(graph.outgoing_weight(profile), expected);
        }
        for edge in &graph.edges {
            prop_assert!(edge.weight >= 1);
        }
    }
}
