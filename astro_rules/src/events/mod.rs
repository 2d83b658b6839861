//! The transit event data model.

mod raw;

pub use raw::*;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::mechanics::{Aspect, Body, Dignity, HouseFamily, Phase, Polarity};

/// Namespace for name-based event identifiers.
const EVENT_NAMESPACE: Uuid = Uuid::from_u128(0x6b1f_4c2e_93a7_4d0b_a8e5_2f71_c0de_5a11);

/// Stable identifier for a transit event.
///
/// Derived from date, bodies and aspect so the same event always gets the same
/// id across requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EventId(pub Uuid);

impl EventId {
    pub fn derive(date: NaiveDate, transit: &Body, natal: &Body, aspect: Aspect) -> Self {
        let name = format!("{}|{}|{}|{}", date, transit.name(), aspect, natal.name());
        Self(Uuid::new_v5(&EVENT_NAMESPACE, name.as_bytes()))
    }
}

impl std::fmt::Display for EventId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A single transiting-body-to-natal-point relationship on a given date.
///
/// Astronomical fields are fixed once the event is validated; later stages
/// wrap the event instead of changing it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    pub id: EventId,
    pub date: NaiveDate,
    pub transit_body: Body,
    pub natal_body: Body,
    pub aspect: Aspect,

    /// Degrees away from exactness.
    pub orb: f64,

    /// Widest orb at which this aspect still counts.
    pub orb_limit: f64,

    /// Signed severity: negative is supportive, positive is challenging.
    pub score: f64,

    /// Free text from the transit layer.
    pub note: String,

    pub natal_house: Option<u8>,
    pub transit_sign: Option<String>,
    pub natal_sign: Option<String>,
    pub phase: Phase,

    /// Explicit benefic/malefic flags override the default body table.
    pub is_benefic: Option<bool>,
    pub is_malefic: Option<bool>,

    /// Focus labels supplied upstream (e.g. "career", "relationships").
    pub focus: Vec<String>,
}

impl Event {
    /// Create an unscored event with the aspect's default orb limit.
    pub fn new(
        date: NaiveDate,
        transit_body: Body,
        natal_body: Body,
        aspect: Aspect,
        orb: f64,
    ) -> Self {
        Self {
            id: EventId::derive(date, &transit_body, &natal_body, aspect),
            date,
            transit_body,
            natal_body,
            aspect,
            orb,
            orb_limit: aspect.default_orb_limit(),
            score: 0.0,
            note: String::new(),
            natal_house: None,
            transit_sign: None,
            natal_sign: None,
            phase: Phase::Applying,
            is_benefic: None,
            is_malefic: None,
            focus: Vec::new(),
        }
    }

    pub fn with_orb_limit(mut self, orb_limit: f64) -> Self {
        self.orb_limit = orb_limit;
        self
    }

    pub fn with_house(mut self, house: u8) -> Self {
        self.natal_house = Some(house);
        self
    }

    pub fn with_phase(mut self, phase: Phase) -> Self {
        self.phase = phase;
        self
    }

    pub fn with_focus(mut self, label: impl Into<String>) -> Self {
        self.focus.push(label.into());
        self
    }

    pub fn with_dignity_flags(mut self, benefic: Option<bool>, malefic: Option<bool>) -> Self {
        self.is_benefic = benefic;
        self.is_malefic = malefic;
        self
    }

    /// Attach a computed score.
    pub fn with_score(mut self, score: f64) -> Self {
        self.score = score;
        self
    }

    pub fn polarity(&self, neutral_band: f64) -> Polarity {
        Polarity::from_score(self.score, neutral_band)
    }

    /// 1.0 at exactness, 0.0 at the orb limit.
    pub fn closeness(&self) -> f64 {
        if self.orb_limit <= 0.0 || !self.orb_limit.is_finite() {
            return 0.0;
        }
        (1.0 - self.orb / self.orb_limit).clamp(0.0, 1.0)
    }

    /// Benefic unless explicitly flagged otherwise; falls back to the transiting body.
    pub fn is_benefic(&self) -> bool {
        self.is_benefic
            .unwrap_or_else(|| self.transit_body.dignity() == Dignity::Benefic)
    }

    pub fn is_malefic(&self) -> bool {
        self.is_malefic
            .unwrap_or_else(|| self.transit_body.dignity() == Dignity::Malefic)
    }

    pub fn house_family(&self) -> Option<HouseFamily> {
        self.natal_house.and_then(HouseFamily::of)
    }

    /// "Mars-Chiron", used for deterministic tie-breaks.
    pub fn pair_key(&self) -> String {
        format!("{}-{}", self.transit_body.name(), self.natal_body.name())
    }

    /// Short human label, e.g. "Mars trine Chiron".
    pub fn label(&self) -> String {
        format!(
            "{} {} {}",
            self.transit_body.name(),
            self.aspect,
            self.natal_body.name()
        )
    }
}
