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

//! Pairwise Pearson correlation between the numeric event measures

use crate::stats::pearson;
use chatlens_core::ChatEvent;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Measure {
    SentimentScore,
    ResponseTime,
    MessageLength,
}

impl Measure {
    pub const ALL: [Measure; 3] = [
        Measure::SentimentScore,
        Measure::ResponseTime,
        Measure::MessageLength,
    ];

    pub fn value(self, event: &ChatEvent) -> f64 {
        match self {
            Measure::SentimentScore => event.sentiment_score,
            Measure::ResponseTime => event.response_time,
            Measure::MessageLength => event.message_length as f64,
        }
    }

    fn position(self) -> usize {
        match self {
            Measure::SentimentScore => 0,
            Measure::ResponseTime => 1,
            Measure::MessageLength => 2,
        }
    }
}

/// Qualitative reading of a coefficient
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CorrelationStrength {
    StrongPositive,
    ModeratePositive,
    WeakPositive,
    WeakNegative,
    ModerateNegative,
    StrongNegative,
}

impl CorrelationStrength {
    pub fn from_coefficient(r: f64) -> Self {
        if r > 0.7 {
            Self::StrongPositive
        } else if r > 0.3 {
            Self::ModeratePositive
        } else if r > 0.0 {
            Self::WeakPositive
        } else if r < -0.7 {
            Self::StrongNegative
        } else if r < -0.3 {
            Self::ModerateNegative
        } else {
            Self::WeakNegative
        }
    }
}

/// 3 x 3 matrix indexed in [`Measure::ALL`] order
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CorrelationMatrix {
    pub measures: Vec<Measure>,
    /// `None` where a side has zero variance or there are too few events
    pub values: [[Option<f64>; 3]; 3],
}

impl CorrelationMatrix {
    pub fn from_events(events: &[ChatEvent]) -> Self {
        let columns: Vec<Vec<f64>> = Measure::ALL
            .iter()
            .map(|m| events.iter().map(|e| m.value(e)).collect())
            .collect();

        let mut values = [[None; 3]; 3];
        for (i, row) in values.iter_mut().enumerate() {
            for (j, cell) in row.iter_mut().enumerate() {
                *cell = if i == j {
                    Some(1.0)
                } else {
                    pearson(&columns[i], &columns[j])
                };
            }
        }
        Self {
            measures: Measure::ALL.to_vec(),
            values,
        }
    }

    pub fn get(&self, a: Measure, b: Measure) -> Option<f64> {
        self.values[a.position()][b.position()]
    }

    pub fn strength(&self, a: Measure, b: Measure) -> Option<CorrelationStrength> {
        self.get(a, b).map(CorrelationStrength::from_coefficient)
    }
}
