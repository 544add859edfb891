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

//! Chat events
//!
//! A [`ChatEvent`] is one recorded exchange between an actor and the chatbot.
//! Deserialization is deliberately forgiving so that snapshots from external
//! stores survive partial or oddly typed records: a malformed timestamp
//! becomes `None`, empty categorical strings become `None`, and tags may
//! arrive either as a list or as a comma-joined string.

use crate::vocab::{Intent, Region, ResolutionStatus, SentimentLabel, Topic};
use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// One recorded exchange between an actor and the chatbot
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChatEvent {
    #[serde(default)]
    pub conversation_id: String,
    /// Human participant
    #[serde(default, alias = "user_id")]
    pub actor_id: String,
    #[serde(default)]
    pub user_message: String,
    #[serde(default, alias = "chatbot_reply")]
    pub bot_reply: String,
    /// Seconds until the bot replied
    #[serde(default)]
    pub response_time: f64,
    #[serde(default, deserialize_with = "lenient_timestamp")]
    pub timestamp: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub sentiment_label: Option<SentimentLabel>,
    /// Polarity in [-1, 1]
    #[serde(default)]
    pub sentiment_score: f64,
    #[serde(default)]
    pub drop_off: bool,
    /// Character length of `user_message`
    #[serde(default)]
    pub message_length: usize,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub intent: Option<Intent>,
    #[serde(default, deserialize_with = "flexible_tags")]
    pub tags: Vec<String>,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub region: Option<Region>,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub topic: Option<Topic>,
    /// Rating 1-5, when the actor left one
    #[serde(default, deserialize_with = "lenient_rating")]
    pub satisfaction: Option<u8>,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub resolution_status: Option<ResolutionStatus>,
    #[serde(default)]
    pub first_time_user: bool,
    /// Evaluated reply quality in [0, 1]
    #[serde(default)]
    pub response_quality: f64,
}

impl ChatEvent {
    /// Create an event builder for a conversation and actor
    pub fn new(conversation_id: impl Into<String>, actor_id: impl Into<String>) -> Self {
        Self {
            conversation_id: conversation_id.into(),
            actor_id: actor_id.into(),
            ..Default::default()
        }
    }

    /// Set the user message and keep `message_length` in step with it
    pub fn message(mut self, text: impl Into<String>) -> Self {
        self.user_message = text.into();
        self.message_length = self.user_message.chars().count();
        self
    }

    pub fn reply(mut self, text: impl Into<String>) -> Self {
        self.bot_reply = text.into();
        self
    }

    pub fn response_time(mut self, seconds: f64) -> Self {
        self.response_time = seconds;
        self
    }

    pub fn timestamp(mut self, at: DateTime<Utc>) -> Self {
        self.timestamp = Some(at);
        self
    }

    /// Set the sentiment score and derive its label
    pub fn sentiment(mut self, score: f64) -> Self {
        self.sentiment_score = score;
        self.sentiment_label = Some(SentimentLabel::from_score(score));
        self
    }

    pub fn intent(mut self, intent: impl Into<Intent>) -> Self {
        self.intent = Some(intent.into());
        self
    }

    pub fn topic(mut self, topic: impl Into<Topic>) -> Self {
        self.topic = Some(topic.into());
        self
    }

    pub fn region(mut self, region: impl Into<Region>) -> Self {
        self.region = Some(region.into());
        self
    }

    pub fn tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = tags.into_iter().map(Into::into).collect();
        self
    }

    /// Check the invariants the synthetic generator guarantees
    ///
    /// Externally sourced events are not re-validated by the aggregators;
    /// this is for tests and for callers that want to audit a snapshot.
    pub fn is_consistent(&self) -> bool {
        let label_matches = self.sentiment_label.as_ref()
            == Some(&SentimentLabel::from_score(self.sentiment_score));
        label_matches
            && self.message_length == self.user_message.chars().count()
            && self.response_time > 0.0
    }

    /// Render one field as a flat text cell (tabular export)
    pub fn cell(&self, field: EventField) -> String {
        fn opt<T: fmt::Display>(value: &Option<T>) -> String {
            value.as_ref().map(ToString::to_string).unwrap_or_default()
        }

        match field {
            EventField::ConversationId => self.conversation_id.clone(),
            EventField::ActorId => self.actor_id.clone(),
            EventField::UserMessage => self.user_message.clone(),
            EventField::BotReply => self.bot_reply.clone(),
            EventField::ResponseTime => self.response_time.to_string(),
            EventField::Timestamp => self
                .timestamp
                .map(|ts| ts.to_rfc3339())
                .unwrap_or_default(),
            EventField::SentimentLabel => opt(&self.sentiment_label),
            EventField::SentimentScore => self.sentiment_score.to_string(),
            EventField::DropOff => self.drop_off.to_string(),
            EventField::MessageLength => self.message_length.to_string(),
            EventField::Intent => opt(&self.intent),
            EventField::Tags => self.tags.join(","),
            EventField::Region => opt(&self.region),
            EventField::Topic => opt(&self.topic),
            EventField::Satisfaction => opt(&self.satisfaction),
            EventField::ResolutionStatus => opt(&self.resolution_status),
            EventField::FirstTimeUser => self.first_time_user.to_string(),
            EventField::ResponseQuality => self.response_quality.to_string(),
        }
    }
}

/// Fields of a [`ChatEvent`], in record order
///
/// The order of [`EventField::ALL`] is the column order of tabular exports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventField {
    ConversationId,
    ActorId,
    UserMessage,
    BotReply,
    ResponseTime,
    Timestamp,
    SentimentLabel,
    SentimentScore,
    DropOff,
    MessageLength,
    Intent,
    Tags,
    Region,
    Topic,
    Satisfaction,
    ResolutionStatus,
    FirstTimeUser,
    ResponseQuality,
}

impl EventField {
    pub const ALL: [EventField; 18] = [
        EventField::ConversationId,
        EventField::ActorId,
        EventField::UserMessage,
        EventField::BotReply,
        EventField::ResponseTime,
        EventField::Timestamp,
        EventField::SentimentLabel,
        EventField::SentimentScore,
        EventField::DropOff,
        EventField::MessageLength,
        EventField::Intent,
        EventField::Tags,
        EventField::Region,
        EventField::Topic,
        EventField::Satisfaction,
        EventField::ResolutionStatus,
        EventField::FirstTimeUser,
        EventField::ResponseQuality,
    ];

    /// Column name used in tabular exports
    pub fn column_name(self) -> &'static str {
        match self {
            EventField::ConversationId => "conversation_id",
            EventField::ActorId => "actor_id",
            EventField::UserMessage => "user_message",
            EventField::BotReply => "bot_reply",
            EventField::ResponseTime => "response_time",
            EventField::Timestamp => "timestamp",
            EventField::SentimentLabel => "sentiment_label",
            EventField::SentimentScore => "sentiment_score",
            EventField::DropOff => "drop_off",
            EventField::MessageLength => "message_length",
            EventField::Intent => "intent",
            EventField::Tags => "tags",
            EventField::Region => "region",
            EventField::Topic => "topic",
            EventField::Satisfaction => "satisfaction",
            EventField::ResolutionStatus => "resolution_status",
            EventField::FirstTimeUser => "first_time_user",
            EventField::ResponseQuality => "response_quality",
        }
    }
}

impl fmt::Display for EventField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.column_name())
    }
}

fn empty_as_none<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: From<String>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    Ok(raw.filter(|s| !s.trim().is_empty()).map(T::from))
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawTimestamp {
    Text(String),
    EpochSeconds(i64),
    Unsupported(serde::de::IgnoredAny),
}

/// Parse a timestamp, yielding `None` for anything unparseable
fn lenient_timestamp<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<RawTimestamp> = Option::deserialize(deserializer)?;
    Ok(match raw {
        Some(RawTimestamp::Text(text)) => parse_timestamp(&text),
        Some(RawTimestamp::EpochSeconds(secs)) => DateTime::from_timestamp(secs, 0),
        Some(RawTimestamp::Unsupported(_)) | None => None,
    })
}

/// Parse RFC 3339 or a naive `YYYY-MM-DD[ T]HH:MM:SS[.f]` string (taken as UTC)
pub fn parse_timestamp(text: &str) -> Option<DateTime<Utc>> {
    let text = text.trim();
    if let Ok(ts) = DateTime::parse_from_rfc3339(text) {
        return Some(ts.with_timezone(&Utc));
    }
    ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(text, fmt).ok())
        .map(|naive| naive.and_utc())
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawTags {
    List(Vec<String>),
    Joined(String),
}

fn flexible_tags<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<RawTags> = Option::deserialize(deserializer)?;
    let tags = match raw {
        Some(RawTags::List(list)) => list,
        Some(RawTags::Joined(joined)) => joined.split(',').map(str::to_string).collect(),
        None => Vec::new(),
    };
    Ok(tags
        .into_iter()
        .map(|tag| tag.trim().to_string())
        .filter(|tag| !tag.is_empty())
        .collect())
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawRating {
    Whole(u64),
    Fractional(f64),
    Unsupported(serde::de::IgnoredAny),
}

fn lenient_rating<'de, D>(deserializer: D) -> Result<Option<u8>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<RawRating> = Option::deserialize(deserializer)?;
    Ok(match raw {
        Some(RawRating::Whole(value)) => u8::try_from(value).ok(),
        Some(RawRating::Fractional(value)) if value.is_finite() && value >= 0.0 => {
            u8::try_from(value.round() as u64).ok()
        }
        _ => None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_builder_keeps_length_and_label_in_step() {
        let event = ChatEvent::new("c1", "u1")
            .message("héllo wörld")
            .sentiment(-0.6)
            .response_time(1.2);

        assert_eq!(event.message_length, 11);
        assert_eq!(event.sentiment_label, Some(SentimentLabel::Negative));
        assert!(event.is_consistent());
    }

    #[test]
    fn test_inconsistent_label_detected() {
        let mut event = ChatEvent::new("c1", "u1").message("hi").sentiment(0.9).response_time(1.0);
        event.sentiment_label = Some(SentimentLabel::Negative);
        assert!(!event.is_consistent());
    }

    #[test]
    fn test_deserialize_legacy_column_names() {
        let json = r#"{
            "conversation_id": "c-1",
            "user_id": "user3",
            "user_message": "Topic: billing questions. ",
            "chatbot_reply": "Response about billing questions. ",
            "response_time": 0.75,
            "timestamp": "2025-03-04 10:15:00",
            "sentiment_label": "neutral",
            "sentiment_score": 0.1,
            "drop_off": false,
            "message_length": 26,
            "intent": "",
            "tags": "urgent,follow-up",
            "region": "Europe",
            "topic": "billing questions",
            "topic_image": "https://example.invalid/img.jpg",
            "satisfaction": 4.0,
            "resolution_status": "pending",
            "first_time_user": true,
            "response_quality": 0.91
        }"#;

        let event: ChatEvent = serde_json::from_str(json).unwrap();
        assert_eq!(event.actor_id, "user3");
        assert_eq!(event.bot_reply, "Response about billing questions. ");
        assert_eq!(
            event.timestamp,
            Some(Utc.with_ymd_and_hms(2025, 3, 4, 10, 15, 0).unwrap())
        );
        assert_eq!(event.intent, None);
        assert_eq!(event.tags, vec!["urgent", "follow-up"]);
        assert_eq!(event.topic, Some(Topic::BillingQuestions));
        assert_eq!(event.satisfaction, Some(4));
    }

    #[test]
    fn test_malformed_timestamp_becomes_none() {
        let event: ChatEvent =
            serde_json::from_str(r#"{"actor_id": "u1", "timestamp": "yesterday-ish"}"#).unwrap();
        assert_eq!(event.timestamp, None);

        let event: ChatEvent =
            serde_json::from_str(r#"{"actor_id": "u1", "timestamp": {"nested": true}}"#).unwrap();
        assert_eq!(event.timestamp, None);

        let event: ChatEvent =
            serde_json::from_str(r#"{"actor_id": "u1", "timestamp": 0}"#).unwrap();
        assert_eq!(event.timestamp, DateTime::from_timestamp(0, 0));
    }

    #[test]
    fn test_serialize_then_deserialize_preserves_event() {
        let event = ChatEvent::new("c1", "u1")
            .message("Where is my invoice")
            .sentiment(0.5)
            .intent(Intent::Question)
            .topic("custom topic")
            .tags(["urgent"])
            .timestamp(Utc.with_ymd_and_hms(2025, 1, 6, 9, 0, 0).unwrap());

        let json = serde_json::to_string(&event).unwrap();
        let back: ChatEvent = serde_json::from_str(&json).unwrap();
        assert_eq!(back, event);
    }

    #[test]
    fn test_cells_follow_field_order() {
        let event = ChatEvent::new("c1", "u1").tags(["urgent", "new-user"]);
        assert_eq!(event.cell(EventField::Tags), "urgent,new-user");
        assert_eq!(event.cell(EventField::Satisfaction), "");
        assert_eq!(EventField::ALL[0].column_name(), "conversation_id");
        assert_eq!(EventField::ALL[17].column_name(), "response_quality");
    }
}
