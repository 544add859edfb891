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

//! Two-stage flow aggregation: actor -> intent -> sentiment
//!
//! Labels are laid out in three disjoint blocks (actors, intents, sentiment
//! labels), so a position identifies both the category and the value.

use crate::relation_graph::intern;
use chatlens_core::ChatEvent;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlowEdge {
    pub source: usize,
    pub target: usize,
    pub value: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlowTable {
    pub labels: Vec<String>,
    /// actor -> intent
    pub stage1: Vec<FlowEdge>,
    /// intent -> sentiment
    pub stage2: Vec<FlowEdge>,
}

impl FlowTable {
    pub fn from_events(events: &[ChatEvent]) -> Self {
        let mut aggregator = FlowAggregator::new();
        aggregator.add_events(events);
        aggregator.build()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    pub fn stage1_total(&self) -> u64 {
        self.stage1.iter().map(|edge| edge.value).sum()
    }

    pub fn stage2_total(&self) -> u64 {
        self.stage2.iter().map(|edge| edge.value).sum()
    }

    /// Label at `index`, if in range
    pub fn label(&self, index: usize) -> Option<&str> {
        self.labels.get(index).map(String::as_str)
    }
}

#[derive(Debug, Default)]
struct Block {
    order: Vec<String>,
    index: HashMap<String, usize>,
}

impl Block {
    fn intern(&mut self, name: &str) -> usize {
        intern(&mut self.order, &mut self.index, name)
    }
}

/// Incremental builder for [`FlowTable`]
#[derive(Debug, Default)]
pub struct FlowAggregator {
    actors: Block,
    intents: Block,
    sentiments: Block,
    actor_intent: BTreeMap<(usize, usize), u64>,
    intent_sentiment: BTreeMap<(usize, usize), u64>,
}

impl FlowAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_event(&mut self, event: &ChatEvent) {
        let actor = self.actors.intern(&event.actor_id);
        let intent = event
            .intent
            .as_ref()
            .filter(|i| !i.is_blank())
            .map(|i| self.intents.intern(i.as_str()));
        let sentiment = event
            .sentiment_label
            .as_ref()
            .filter(|s| !s.is_blank())
            .map(|s| self.sentiments.intern(s.as_str()));

        if let Some(intent) = intent {
            *self.actor_intent.entry((actor, intent)).or_insert(0) += 1;
            if let Some(sentiment) = sentiment {
                *self.intent_sentiment.entry((intent, sentiment)).or_insert(0) += 1;
            }
        }
    }

    pub fn add_events(&mut self, events: &[ChatEvent]) {
        for event in events {
            self.add_event(event);
        }
    }

    pub fn build(self) -> FlowTable {
        let intent_offset = self.actors.order.len();
        let sentiment_offset = intent_offset + self.intents.order.len();

        let stage1 = self
            .actor_intent
            .into_iter()
            .map(|((actor, intent), value)| FlowEdge {
                source: actor,
                target: intent_offset + intent,
                value,
            })
            .collect::<Vec<_>>();
        let stage2 = self
            .intent_sentiment
            .into_iter()
            .map(|((intent, sentiment), value)| FlowEdge {
                source: intent_offset + intent,
                target: sentiment_offset + sentiment,
                value,
            })
            .collect::<Vec<_>>();

        let mut labels = self.actors.order;
        labels.extend(self.intents.order);
        labels.extend(self.sentiments.order);

        debug!(
            labels = labels.len(),
            stage1 = stage1.len(),
            stage2 = stage2.len(),
            "built flow table"
        );
        FlowTable {
            labels,
            stage1,
            stage2,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chatlens_core::SentimentLabel;

    fn event(actor: &str, intent: Option<&str>, sentiment: Option<SentimentLabel>) -> ChatEvent {
        let mut event = ChatEvent::new("c", actor);
        event.intent = intent.map(Into::into);
        event.sentiment_label = sentiment;
        event
    }

    #[test]
    fn test_labels_and_stages() {
        let events = vec![
            event("u1", Some("question"), Some(SentimentLabel::Positive)),
            event("u1", Some("question"), Some(SentimentLabel::Negative)),
            event("u2", Some("complaint"), Some(SentimentLabel::Negative)),
        ];
        let table = FlowTable::from_events(&events);

        assert_eq!(
            table.labels,
            vec!["u1", "u2", "question", "complaint", "positive", "negative"]
        );
        assert_eq!(
            table.stage1,
            vec![
                FlowEdge { source: 0, target: 2, value: 2 },
                FlowEdge { source: 1, target: 3, value: 1 },
            ]
        );
        assert_eq!(
            table.stage2,
            vec![
                FlowEdge { source: 2, target: 4, value: 1 },
                FlowEdge { source: 2, target: 5, value: 1 },
                FlowEdge { source: 3, target: 5, value: 1 },
            ]
        );
    }

    #[test]
    fn test_same_string_in_two_categories_gets_two_labels() {
        let events = vec![event("question", Some("question"), None)];
        let table = FlowTable::from_events(&events);
        assert_eq!(table.labels, vec!["question", "question"]);
        assert_eq!(table.stage1, vec![FlowEdge { source: 0, target: 1, value: 1 }]);
    }

    #[test]
    fn test_conservation_with_missing_categories() {
        let events = vec![
            event("u1", Some("request"), Some(SentimentLabel::Neutral)),
            event("u1", Some("request"), None),
            event("u2", None, Some(SentimentLabel::Positive)),
        ];
        let table = FlowTable::from_events(&events);
        assert_eq!(table.stage1_total(), 2);
        assert_eq!(table.stage2_total(), 1);
        // sentiment of an intent-less event still gets a label
        assert_eq!(table.label(table.labels.len() - 1), Some("positive"));
    }

    #[test]
    fn test_blank_categories_count_as_missing() {
        let events = vec![
            event("u1", Some("question"), Some(SentimentLabel::Positive)),
            event("u1", Some(""), Some(SentimentLabel::Positive)),
            event("u1", Some("question"), Some(SentimentLabel::from(""))),
        ];
        let table = FlowTable::from_events(&events);

        assert_eq!(table.labels, vec!["u1", "question", "positive"]);
        assert_eq!(table.stage1_total(), 2);
        assert_eq!(table.stage2_total(), 1);
    }

    #[test]
    fn test_empty_input() {
        let table = FlowTable::from_events(&[]);
        assert!(table.is_empty());
        assert!(table.stage1.is_empty());
        assert!(table.stage2.is_empty());
    }
}
