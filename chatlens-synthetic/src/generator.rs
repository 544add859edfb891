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

//! Synthetic chat event generation
//!
//! Produces plausible, internally consistent traffic when no live event
//! store is available. The random source and the anchor time are both
//! passed in explicitly, so a seeded source reproduces the exact same
//! events:
//!
//! ```rust,ignore
//! use rand::{rngs::StdRng, SeedableRng};
//!
//! let generator = SyntheticEventGenerator::with_defaults()?;
//! let mut rng = StdRng::seed_from_u64(42);
//! let events = generator.generate_at(100, anchor, &mut rng)?;
//! ```

use crate::config::SyntheticConfig;
use chatlens_core::{
    default_profiles, ActorProfile, ChatEvent, ChatlensError, Intent, Region, ResolutionStatus,
    Result, SentimentLabel, Topic, TAG_VOCABULARY,
};
use chrono::{DateTime, Duration, Timelike, Utc};
use rand::distributions::{Distribution, WeightedIndex};
use rand::seq::SliceRandom;
use rand::Rng;
use tracing::debug;

const FILLER: &str = "Lorem ipsum ";

/// Smallest response time emitted, keeps `response_time > 0` after rounding
const MIN_RESPONSE_TIME: f64 = 0.01;

/// Generator of synthetic chat events
#[derive(Debug, Clone)]
pub struct SyntheticEventGenerator {
    profiles: Vec<ActorProfile>,
    config: SyntheticConfig,
    hour_distribution: WeightedIndex<f64>,
}

impl SyntheticEventGenerator {
    /// Create a generator over a fixed set of actor profiles
    pub fn new(profiles: Vec<ActorProfile>, config: SyntheticConfig) -> Result<Self> {
        if profiles.is_empty() {
            return Err(ChatlensError::invalid_argument(
                "synthetic generator needs at least one actor profile",
            ));
        }
        for profile in &profiles {
            profile.validate()?;
        }
        config.validate()?;

        let hour_distribution = WeightedIndex::new(&config.hour_weights)
            .map_err(|e| ChatlensError::config(format!("hour_weights: {e}")))?;

        Ok(Self {
            profiles,
            config,
            hour_distribution,
        })
    }

    /// Generator over the stock demo actors with default heuristics
    pub fn with_defaults() -> Result<Self> {
        Self::new(default_profiles(), SyntheticConfig::default())
    }

    pub fn profiles(&self) -> &[ActorProfile] {
        &self.profiles
    }

    pub fn config(&self) -> &SyntheticConfig {
        &self.config
    }

    /// Generate `count` events anchored at the current wall-clock time
    pub fn generate<R: Rng + ?Sized>(&self, count: usize, rng: &mut R) -> Result<Vec<ChatEvent>> {
        self.generate_at(count, Utc::now(), rng)
    }

    /// Generate exactly `count` events with timestamps relative to `anchor`
    ///
    /// Fails with `InvalidArgument` when `count` is zero; nothing is drawn
    /// from `rng` in that case.
    pub fn generate_at<R: Rng + ?Sized>(
        &self,
        count: usize,
        anchor: DateTime<Utc>,
        rng: &mut R,
    ) -> Result<Vec<ChatEvent>> {
        if count < 1 {
            return Err(ChatlensError::invalid_argument(
                "synthetic event count must be at least 1",
            ));
        }

        let pool_size = self.config.conversation_pool_size(count);
        let conversations: Vec<String> = (0..pool_size)
            .map(|_| {
                uuid::Builder::from_random_bytes(rng.gen())
                    .into_uuid()
                    .to_string()
            })
            .collect();

        let events: Vec<ChatEvent> = (0..count)
            .map(|_| self.generate_one(&conversations, anchor, rng))
            .collect();

        debug!(
            count = events.len(),
            conversations = pool_size,
            actors = self.profiles.len(),
            "generated synthetic events"
        );
        Ok(events)
    }

    fn generate_one<R: Rng + ?Sized>(
        &self,
        conversations: &[String],
        anchor: DateTime<Utc>,
        rng: &mut R,
    ) -> ChatEvent {
        let conversation_id = pick(conversations, rng).clone();
        let profile = pick(&self.profiles, rng);

        let topic = Topic::from(*pick(Topic::VALUES, rng));
        let length_units = rng.gen_range(profile.verbosity.length_range());
        let user_message = format!("Topic: {topic}. {}", FILLER.repeat(length_units / 10));
        let bot_reply = format!("Response about {topic}. {}", FILLER.repeat(length_units / 12));

        let base_response_time = 0.5 + length_units as f64 / 100.0;
        let jitter = rng.gen_range(0.8..=1.2);
        let response_time =
            round2(base_response_time * profile.response_time_factor * jitter).max(MIN_RESPONSE_TIME);

        let sentiment_base = rng.gen_range(-0.7..=0.7);
        let sentiment_score = round2((sentiment_base + profile.sentiment_bias).clamp(-1.0, 1.0));
        let sentiment_label = SentimentLabel::from_score(sentiment_score);

        let days_ago = rng.gen_range(0..=self.config.max_days_ago);
        let hour = self.hour_distribution.sample(rng) as i64;
        let timestamp = anchor - Duration::days(i64::from(days_ago))
            + Duration::hours(hour - i64::from(anchor.hour()));

        let drop_off_probability = self
            .config
            .drop_off
            .probability(sentiment_score, response_time);
        let drop_off = rng.gen::<f64>() < drop_off_probability;

        let intent = Intent::from(*pick(Intent::VALUES, rng));

        let tag_count = rng.gen_range(0..=2);
        let tags: Vec<String> = TAG_VOCABULARY
            .choose_multiple(rng, tag_count)
            .map(|tag| tag.to_string())
            .collect();

        let region = Region::from(*pick(Region::VALUES, rng));

        let satisfaction = if rng.gen::<f64>() < self.config.satisfaction_rate {
            Some(rng.gen_range(1..=5u8))
        } else {
            None
        };

        let resolution_status = ResolutionStatus::from(*pick(ResolutionStatus::VALUES, rng));
        let first_time_user = rng.gen::<f64>() < self.config.first_time_user_rate;
        let response_quality = round2(rng.gen_range(0.5..=1.0));

        ChatEvent {
            conversation_id,
            actor_id: profile.name.clone(),
            message_length: user_message.chars().count(),
            user_message,
            bot_reply,
            response_time,
            timestamp: Some(timestamp),
            sentiment_label: Some(sentiment_label),
            sentiment_score,
            drop_off,
            intent: Some(intent),
            tags,
            region: Some(region),
            topic: Some(topic),
            satisfaction,
            resolution_status: Some(resolution_status),
            first_time_user,
            response_quality,
        }
    }
}

/// Uniform choice from a slice the generator has already checked is non-empty
fn pick<'a, T, R: Rng + ?Sized>(items: &'a [T], rng: &mut R) -> &'a T {
    &items[rng.gen_range(0..items.len())]
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
