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

//! Term frequencies over free text
//!
//! Text is lowercased, stripped of non-word characters and split on
//! whitespace; short tokens and stopwords are dropped before counting.
//! Counting is associative: extracting two disjoint corpora and merging the
//! results equals extracting their union.

use chatlens_core::{ChatEvent, TermConfig};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use tracing::debug;

static NON_WORD: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^\w\s]").expect("non-word pattern is valid"));

/// Token -> occurrence count
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TermFrequency {
    counts: BTreeMap<String, u64>,
}

impl TermFrequency {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, token: &str) -> u64 {
        self.counts.get(token).copied().unwrap_or(0)
    }

    /// Number of distinct tokens
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Sum of all counts
    pub fn total(&self) -> u64 {
        self.counts.values().sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, u64)> {
        self.counts.iter().map(|(token, count)| (token.as_str(), *count))
    }

    pub fn add(&mut self, token: impl Into<String>, count: u64) {
        if count > 0 {
            *self.counts.entry(token.into()).or_insert(0) += count;
        }
    }

    /// Token-wise sum with another table
    pub fn merge(&mut self, other: &TermFrequency) {
        for (token, count) in other.iter() {
            self.add(token, count);
        }
    }

    pub fn merged(mut self, other: &TermFrequency) -> Self {
        self.merge(other);
        self
    }

    /// The `n` most frequent tokens, ties broken alphabetically
    pub fn top(&self, n: usize) -> Vec<(String, u64)> {
        let mut ranked: Vec<(String, u64)> = self
            .counts
            .iter()
            .map(|(token, count)| (token.clone(), *count))
            .collect();
        ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        ranked.truncate(n);
        ranked
    }

    pub fn into_map(self) -> BTreeMap<String, u64> {
        self.counts
    }
}

impl<S: Into<String>> FromIterator<(S, u64)> for TermFrequency {
    fn from_iter<I: IntoIterator<Item = (S, u64)>>(iter: I) -> Self {
        let mut table = TermFrequency::new();
        for (token, count) in iter {
            table.add(token, count);
        }
        table
    }
}

/// Tokenizer and counter
#[derive(Debug, Clone)]
pub struct TermFrequencyExtractor {
    stopwords: HashSet<String>,
    min_token_chars: usize,
}

impl Default for TermFrequencyExtractor {
    fn default() -> Self {
        Self::new(&TermConfig::default())
    }
}

impl TermFrequencyExtractor {
    pub fn new(config: &TermConfig) -> Self {
        Self {
            stopwords: config.stopwords.iter().map(|w| w.to_lowercase()).collect(),
            min_token_chars: config.min_token_chars,
        }
    }

    /// Extractor with a custom stopword set and the default length cut-off
    pub fn with_stopwords<I, S>(stopwords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            stopwords: stopwords
                .into_iter()
                .map(|w| w.as_ref().to_lowercase())
                .collect(),
            min_token_chars: TermConfig::default().min_token_chars,
        }
    }

    /// Normalized tokens of one text that survive filtering
    pub fn tokenize(&self, text: &str) -> Vec<String> {
        let lowered = text.to_lowercase();
        let cleaned = NON_WORD.replace_all(&lowered, "");
        cleaned
            .split_whitespace()
            .filter(|token| self.keeps(token))
            .map(str::to_string)
            .collect()
    }

    fn keeps(&self, token: &str) -> bool {
        token.chars().count() >= self.min_token_chars && !self.stopwords.contains(token)
    }

    /// Count surviving tokens across all texts
    pub fn extract<I, S>(&self, texts: I) -> TermFrequency
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut table = TermFrequency::new();
        let mut documents = 0usize;
        for text in texts {
            documents += 1;
            for token in self.tokenize(text.as_ref()) {
                table.add(token, 1);
            }
        }
        debug!(documents, distinct = table.len(), "extracted term frequencies");
        table
    }

    /// Term frequencies over the user messages of `events`
    pub fn extract_user_messages(&self, events: &[ChatEvent]) -> TermFrequency {
        self.extract(events.iter().map(|e| e.user_message.as_str()))
    }
}
