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

//! Property tests for the event model

use chatlens_core::{ChatEvent, SentimentLabel, NEGATIVE_THRESHOLD, POSITIVE_THRESHOLD};
use proptest::prelude::*;

proptest! {
    #[test]
    fn sentiment_label_follows_bands(score in -1.0f64..=1.0) {
        let label = SentimentLabel::from_score(score);
        let expected = if score > POSITIVE_THRESHOLD {
            SentimentLabel::Positive
        } else if score < NEGATIVE_THRESHOLD {
            SentimentLabel::Negative
        } else {
            SentimentLabel::Neutral
        };
        prop_assert_eq!(label, expected);
    }

    #[test]
    fn builder_events_are_consistent(
        text in ".{0,120}",
        score in -1.0f64..=1.0,
        response_time in 0.01f64..10.0,
    ) {
        let event = ChatEvent::new("c", "a")
            .message(text.clone())
            .sentiment(score)
            .response_time(response_time);
        prop_assert_eq!(event.message_length, text.chars().count());
        prop_assert!(event.is_consistent());
    }

    #[test]
    fn json_round_trip_keeps_categories(intent in "[a-z]{1,12}") {
        let event = ChatEvent::new("c", "a").intent(intent.as_str()).topic(intent.as_str());
        let json = serde_json::to_string(&event).unwrap();
        let back: ChatEvent = serde_json::from_str(&json).unwrap();
        prop_assert_eq!(back.intent.map(|i| i.to_string()), Some(intent.clone()));
        prop_assert_eq!(back.topic.map(|t| t.to_string()), Some(intent));
    }
}
