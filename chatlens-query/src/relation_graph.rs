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

//! Bipartite actor-topic relation graph
//!
//! Nodes are laid out in two blocks: every distinct actor in first-seen
//! order, then every distinct topic in first-seen order. Actor and topic
//! names therefore never collide by position, even when the strings match.
//! Each edge carries the number of events sharing its (actor, topic) pair.

use chatlens_core::ChatEvent;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use tracing::debug;

/// Which side of the bipartite graph a node is on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    Actor,
    Topic,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphNode {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: NodeKind,
}

/// Directed actor -> topic edge, indices into [`RelationGraph::nodes`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphEdge {
    pub source: usize,
    pub target: usize,
    pub weight: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelationGraph {
    pub nodes: Vec<GraphNode>,
    pub edges: Vec<GraphEdge>,
}

impl RelationGraph {
    pub fn from_events(events: &[ChatEvent]) -> Self {
        let mut builder = RelationGraphBuilder::new();
        builder.add_events(events);
        builder.build()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn node_index(&self, name: &str, kind: NodeKind) -> Option<usize> {
        self.nodes
            .iter()
            .position(|node| node.kind == kind && node.name == name)
    }

    /// Sum of edge weights leaving an actor; 0 for unknown actors
    pub fn outgoing_weight(&self, actor: &str) -> u64 {
        match self.node_index(actor, NodeKind::Actor) {
            Some(index) => self
                .edges
                .iter()
                .filter(|edge| edge.source == index)
                .map(|edge| edge.weight)
                .sum(),
            None => 0,
        }
    }

    pub fn count(&self, kind: NodeKind) -> usize {
        self.nodes.iter().filter(|node| node.kind == kind).count()
    }
}

/// Incremental builder for [`RelationGraph`]
#[derive(Debug, Default)]
pub struct RelationGraphBuilder {
    actors: Vec<String>,
    actor_index: HashMap<String, usize>,
    topics: Vec<String>,
    topic_index: HashMap<String, usize>,
    /// (actor position, topic position) -> co-occurrence count
    pairs: BTreeMap<(usize, usize), u64>,
}

impl RelationGraphBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_event(&mut self, event: &ChatEvent) {
        let actor = intern(&mut self.actors, &mut self.actor_index, &event.actor_id);
        if let Some(topic) = event.topic.as_ref().filter(|t| !t.is_blank()) {
            let topic = intern(&mut self.topics, &mut self.topic_index, topic.as_str());
            *self.pairs.entry((actor, topic)).or_insert(0) += 1;
        }
    }

    pub fn add_events(&mut self, events: &[ChatEvent]) {
        for event in events {
            self.add_event(event);
        }
    }

    pub fn build(self) -> RelationGraph {
        let topic_offset = self.actors.len();

        let nodes: Vec<GraphNode> = self
            .actors
            .into_iter()
            .map(|name| GraphNode {
                name,
                kind: NodeKind::Actor,
            })
            .chain(self.topics.into_iter().map(|name| GraphNode {
                name,
                kind: NodeKind::Topic,
            }))
            .collect();

        let edges: Vec<GraphEdge> = self
            .pairs
            .into_iter()
            .map(|((actor, topic), weight)| GraphEdge {
                source: actor,
                target: topic_offset + topic,
                weight,
            })
            .collect();

        debug!(nodes = nodes.len(), edges = edges.len(), "built relation graph");
        RelationGraph { nodes, edges }
    }
}

/// Position of `name` in `order`, appending it on first sight
pub(crate) fn intern(order: &mut Vec<String>, index: &mut HashMap<String, usize>, name: &str) -> usize {
    if let Some(&position) = index.get(name) {
        return position;
    }
    let position = order.len();
    order.push(name.to_string());
    index.insert(name.to_string(), position);
    position
}
