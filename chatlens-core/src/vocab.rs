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

//! Categorical vocabularies carried by chat events
//!
//! Every vocabulary is open: a value outside the known set is kept verbatim
//! as `Other(..)` and treated as its own category downstream. Known values
//! round-trip through their canonical wire string.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Score above which a sentiment is labelled positive
pub const POSITIVE_THRESHOLD: f64 = 0.3;

/// Score below which a sentiment is labelled negative
pub const NEGATIVE_THRESHOLD: f64 = -0.3;

macro_rules! open_vocabulary {
    (
        $(#[$meta:meta])*
        $name:ident {
            $( $(#[$vmeta:meta])* $variant:ident => $text:literal ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(from = "String", into = "String")]
        pub enum $name {
            $( $(#[$vmeta])* $variant, )+
            /// Value outside the known vocabulary
            Other(String),
        }

        impl $name {
            /// Canonical strings of the known vocabulary, in declaration order
            pub const VALUES: &'static [&'static str] = &[$($text),+];

            /// Wire string for this value
            pub fn as_str(&self) -> &str {
                match self {
                    $( Self::$variant => $text, )+
                    Self::Other(raw) => raw.as_str(),
                }
            }

            /// An `Other` holding only whitespace, which aggregations treat as absent
            pub fn is_blank(&self) -> bool {
                self.as_str().trim().is_empty()
            }

            /// Whether this value belongs to the known vocabulary
            pub fn is_known(&self) -> bool {
                !matches!(self, Self::Other(_))
            }

            /// Iterate over the known vocabulary
            pub fn known() -> impl Iterator<Item = Self> {
                Self::VALUES.iter().map(|text| Self::from(*text))
            }
        }

        impl From<&str> for $name {
            fn from(raw: &str) -> Self {
                match raw {
                    $( $text => Self::$variant, )+
                    other => Self::Other(other.to_string()),
                }
            }
        }

        impl From<String> for $name {
            fn from(raw: String) -> Self {
                match Self::from(raw.as_str()) {
                    Self::Other(_) => Self::Other(raw),
                    known => known,
                }
            }
        }

        impl From<$name> for String {
            fn from(value: $name) -> Self {
                match value {
                    $name::Other(raw) => raw,
                    known => known.as_str().to_string(),
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

open_vocabulary! {
    /// Banded sentiment polarity
    SentimentLabel {
        Positive => "positive",
        Neutral => "neutral",
        Negative => "negative",
    }
}

impl SentimentLabel {
    /// Band a sentiment score: > 0.3 positive, < -0.3 negative, else neutral
    pub fn from_score(score: f64) -> Self {
        if score > POSITIVE_THRESHOLD {
            Self::Positive
        } else if score < NEGATIVE_THRESHOLD {
            Self::Negative
        } else {
            Self::Neutral
        }
    }
}

open_vocabulary! {
    /// Purpose of the user's message
    Intent {
        Question => "question",
        Complaint => "complaint",
        Feedback => "feedback",
        Request => "request",
        Information => "information",
    }
}

open_vocabulary! {
    /// Subject of the conversation
    Topic {
        AccountIssues => "account issues",
        ProductInquiry => "product inquiry",
        TechnicalSupport => "technical support",
        BillingQuestions => "billing questions",
        FeatureRequests => "feature requests",
    }
}

open_vocabulary! {
    /// Geographic region of the actor
    Region {
        NorthAmerica => "North America",
        Europe => "Europe",
        Asia => "Asia",
        SouthAmerica => "South America",
        Africa => "Africa",
        Oceania => "Oceania",
    }
}

open_vocabulary! {
    /// Lifecycle state of the conversation
    ResolutionStatus {
        Resolved => "resolved",
        Pending => "pending",
        Escalated => "escalated",
        Closed => "closed",
        Reopened => "reopened",
    }
}

/// Tag vocabulary attached to events (0-2 per event)
pub const TAG_VOCABULARY: [&str; 5] = ["urgent", "resolved", "escalated", "follow-up", "new-user"];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sentiment_banding() {
        assert_eq!(SentimentLabel::from_score(0.31), SentimentLabel::Positive);
        assert_eq!(SentimentLabel::from_score(0.3), SentimentLabel::Neutral);
        assert_eq!(SentimentLabel::from_score(-0.3), SentimentLabel::Neutral);
        assert_eq!(SentimentLabel::from_score(-0.31), SentimentLabel::Negative);
        assert_eq!(SentimentLabel::from_score(1.0), SentimentLabel::Positive);
    }

    #[test]
    fn test_unknown_value_is_kept() {
        let intent = Intent::from("escalation");
        assert_eq!(intent, Intent::Other("escalation".to_string()));
        assert!(!intent.is_known());
        assert_eq!(intent.as_str(), "escalation");
    }

    #[test]
    fn test_known_values_round_trip_through_serde() {
        let json = serde_json::to_string(&Region::NorthAmerica).unwrap();
        assert_eq!(json, "\"North America\"");

        let region: Region = serde_json::from_str("\"North America\"").unwrap();
        assert_eq!(region, Region::NorthAmerica);

        let other: Topic = serde_json::from_str("\"shipping\"").unwrap();
        assert_eq!(other, Topic::Other("shipping".to_string()));
    }

    #[test]
    fn test_known_iterates_vocabulary_in_order() {
        let statuses: Vec<_> = ResolutionStatus::known().collect();
        assert_eq!(statuses.len(), 5);
        assert_eq!(statuses[0], ResolutionStatus::Resolved);
        assert_eq!(statuses[4], ResolutionStatus::Reopened);
        assert!(statuses.iter().all(|s| s.is_known()));
    }

    #[test]
    fn test_matching_is_case_sensitive() {
        assert_eq!(
            SentimentLabel::from("Positive"),
            SentimentLabel::Other("Positive".to_string())
        );
    }
}
