//! Upstream event payloads and batch validation.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use tracing::{debug, warn};

use super::Event;
use crate::error::EventError;
use crate::mechanics::{Aspect, Body, Phase};

/// An event exactly as the transit layer sends it. Every field is optional
/// until validation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawEvent {
    pub date: Option<String>,
    #[serde(alias = "transit")]
    pub transit_body: Option<String>,
    #[serde(alias = "natal")]
    pub natal_body: Option<String>,
    pub aspect: Option<String>,
    pub orb: Option<f64>,
    pub orb_limit: Option<f64>,
    pub natal_house: Option<i64>,
    pub transit_sign: Option<String>,
    pub natal_sign: Option<String>,
    pub phase: Option<String>,
    pub is_benefic: Option<bool>,
    pub is_malefic: Option<bool>,
    #[serde(default)]
    pub focus: Vec<String>,
    pub note: Option<String>,
}

impl RawEvent {
    /// Validate and convert into an unscored [`Event`].
    pub fn validate(&self) -> Result<Event, EventError> {
        let date = parse_date(non_empty(&self.date).ok_or(EventError::MissingField("date"))?)?;
        let transit =
            non_empty(&self.transit_body).ok_or(EventError::MissingField("transit_body"))?;
        let natal = non_empty(&self.natal_body).ok_or(EventError::MissingField("natal_body"))?;
        let aspect_name = non_empty(&self.aspect).ok_or(EventError::MissingField("aspect"))?;
        let aspect = Aspect::parse(aspect_name)
            .ok_or_else(|| EventError::UnknownAspect(aspect_name.to_string()))?;

        let orb = self.orb.ok_or(EventError::MissingField("orb"))?;
        if !orb.is_finite() || orb < 0.0 {
            return Err(EventError::InvalidOrb(orb));
        }

        let orb_limit = self.orb_limit.unwrap_or_else(|| aspect.default_orb_limit());
        if !orb_limit.is_finite() || orb_limit <= 0.0 {
            return Err(EventError::InvalidOrbLimit(orb_limit));
        }

        let natal_house = match self.natal_house {
            Some(house) if (1..=12).contains(&house) => Some(house as u8),
            Some(house) => return Err(EventError::InvalidHouse(house)),
            None => None,
        };

        let mut event = Event::new(date, Body::parse(transit), Body::parse(natal), aspect, orb)
            .with_orb_limit(orb_limit)
            .with_dignity_flags(self.is_benefic, self.is_malefic);

        event.natal_house = natal_house;
        event.transit_sign = non_empty(&self.transit_sign).map(str::to_string);
        event.natal_sign = non_empty(&self.natal_sign).map(str::to_string);
        event.phase = non_empty(&self.phase)
            .and_then(Phase::parse)
            .unwrap_or_default();
        event.note = self.note.clone().unwrap_or_default();
        event.focus = self
            .focus
            .iter()
            .map(|label| label.trim().to_ascii_lowercase())
            .filter(|label| !label.is_empty())
            .collect();

        Ok(event)
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

/// Accepts `YYYY-MM-DD`, or a timestamp whose first ten characters are one.
fn parse_date(value: &str) -> Result<NaiveDate, EventError> {
    let head = value.get(..10).unwrap_or(value);
    NaiveDate::parse_from_str(head, "%Y-%m-%d").map_err(|_| EventError::InvalidDate(value.to_string()))
}

/// An upstream event that could not be used, with its position in the batch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RejectedEvent {
    pub index: usize,
    pub reason: String,
}

/// The validated events of one request.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EventBatch {
    pub events: Vec<Event>,
    pub rejected: Vec<RejectedEvent>,

    /// Number of raw events received.
    pub received: usize,
}

impl EventBatch {
    /// Validate every raw event. Bad events are skipped and recorded, exact
    /// duplicates (same id and orb) are dropped.
    pub fn from_raw(raw: &[RawEvent]) -> Self {
        let mut batch = EventBatch {
            received: raw.len(),
            ..Default::default()
        };
        let mut seen = HashSet::new();

        for (index, item) in raw.iter().enumerate() {
            match item.validate() {
                Ok(event) => {
                    if seen.insert((event.id, event.orb.to_bits())) {
                        batch.events.push(event);
                    } else {
                        debug!(index, id = %event.id, "dropping duplicate event");
                    }
                }
                Err(reason) => {
                    warn!(index, %reason, "skipping invalid event");
                    batch.rejected.push(RejectedEvent {
                        index,
                        reason: reason.to_string(),
                    });
                }
            }
        }

        batch
    }

    /// Parse a JSON array of raw events and validate them.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let raw: Vec<RawEvent> = serde_json::from_str(json)?;
        Ok(Self::from_raw(&raw))
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// True when events were received but none survived validation.
    pub fn all_rejected(&self) -> bool {
        self.received > 0 && self.events.is_empty() && !self.rejected.is_empty()
    }
}
