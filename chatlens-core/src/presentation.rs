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

//! How each event field should be presented
//!
//! The presentation layer itself lives outside Chatlens; this closed variant
//! is the contract it renders against. Adding a field to [`EventField`]
//! forces a decision here because the match is exhaustive.

use crate::event::EventField;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;

/// Maximum characters shown for free-text cells before truncation
pub const DEFAULT_TRUNCATE_CHARS: usize = 100;

/// Presentation kind for a field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FieldPresentation {
    /// Horizontal bar; `signed` bars grow left or right from the centre
    PercentageBar { signed: bool },
    /// One coloured badge per value
    BadgeList,
    /// Filled stars out of `max`
    StarRating { max: u8 },
    /// Actor avatar next to the id
    Avatar,
    /// Text clipped to `max_chars` with an ellipsis
    TruncatedText { max_chars: usize },
    /// Value rendered as-is
    Plain,
}

impl FieldPresentation {
    pub fn for_field(field: EventField) -> Self {
        match field {
            EventField::SentimentScore => FieldPresentation::PercentageBar { signed: true },
            EventField::ResponseQuality => FieldPresentation::PercentageBar { signed: false },
            EventField::Tags | EventField::SentimentLabel | EventField::ResolutionStatus => {
                FieldPresentation::BadgeList
            }
            EventField::Satisfaction => FieldPresentation::StarRating { max: 5 },
            EventField::ActorId => FieldPresentation::Avatar,
            EventField::UserMessage | EventField::BotReply => FieldPresentation::TruncatedText {
                max_chars: DEFAULT_TRUNCATE_CHARS,
            },
            EventField::ConversationId
            | EventField::ResponseTime
            | EventField::Timestamp
            | EventField::DropOff
            | EventField::MessageLength
            | EventField::Intent
            | EventField::Region
            | EventField::Topic
            | EventField::FirstTimeUser => FieldPresentation::Plain,
        }
    }

    /// Apply the textual part of this presentation to a cell value
    pub fn apply<'a>(&self, value: &'a str) -> Cow<'a, str> {
        match *self {
            FieldPresentation::TruncatedText { max_chars } => truncate(value, max_chars),
            _ => Cow::Borrowed(value),
        }
    }
}

fn truncate(value: &str, max_chars: usize) -> Cow<'_, str> {
    match value.char_indices().nth(max_chars) {
        Some((cut, _)) => Cow::Owned(format!("{}...", &value[..cut])),
        None => Cow::Borrowed(value),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_field_has_a_presentation() {
        for field in EventField::ALL {
            let _ = FieldPresentation::for_field(field);
        }
        assert_eq!(
            FieldPresentation::for_field(EventField::Satisfaction),
            FieldPresentation::StarRating { max: 5 }
        );
    }

    #[test]
    fn test_truncation_is_char_aware() {
        let presentation = FieldPresentation::TruncatedText { max_chars: 3 };
        assert_eq!(presentation.apply("ééééé"), "ééé...");
        assert_eq!(presentation.apply("abc"), "abc");
        assert_eq!(FieldPresentation::Plain.apply("abcdef"), "abcdef");
    }
}
