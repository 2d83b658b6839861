//! Caution digests - per-date severity roll-ups of scored events.
//!
//! Each event contributes its score, normalized by the scoring scale and
//! damped when separating. Contributions are summed per date, capped, and
//! read as a severity label. A handful of adjustments follow: supportive-only
//! days never read as caution, tight hard aspects to a chart angle escalate,
//! wide lunar days and well-supported days soften.
//!
//! [`CautionDigester::resolve_windows`] goes one step further and nets the
//! friction of a date against its support, returning one caution window and
//! one lucky window for the whole request.

use astro_rules::{Aspect, Body, Event, EventId, Phase, PipelineConfig};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::debug;

/// Combined scores are clamped to `[-MAX_SCORE, MAX_SCORE]`.
pub const MAX_SCORE: f64 = 3.5;

const SUPPORT_THRESHOLD: f64 = -0.6;
const NO_FLAG_THRESHOLD: f64 = 0.4;
const GENTLE_THRESHOLD: f64 = 1.2;
const CAUTION_THRESHOLD: f64 = 2.4;

/// Support-to-friction ratio that adds the softener note.
const SOFT_SUPPORT_RATIO: f64 = 0.35;
/// Support-to-friction ratio that lowers severity.
const STRONG_SUPPORT_RATIO: f64 = 0.70;
/// Netted scores within this band of zero read as mixed.
const NETTING_THRESHOLD: f64 = 0.5;
/// Windows considered when picking the caution and lucky pair.
const WINDOW_CANDIDATES: usize = 2;
const ANGLE_TRIGGER_ORB: f64 = 1.0;
const WIDE_MOON_ORB: f64 = 3.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CautionLevel {
    Support,
    Insight,
    Mixed,
    NoFlag,
    GentleNote,
    Caution,
    HighCaution,
}

impl CautionLevel {
    pub fn label(&self) -> &'static str {
        match self {
            CautionLevel::Support => "Support",
            CautionLevel::Insight => "Insight",
            CautionLevel::Mixed => "Mixed",
            CautionLevel::NoFlag => "No flag",
            CautionLevel::GentleNote => "Gentle Note",
            CautionLevel::Caution => "Caution",
            CautionLevel::HighCaution => "High Caution",
        }
    }

    pub fn is_support(&self) -> bool {
        matches!(self, CautionLevel::Support | CautionLevel::Insight)
    }

    pub fn is_caution(&self) -> bool {
        matches!(
            self,
            CautionLevel::GentleNote | CautionLevel::Caution | CautionLevel::HighCaution
        )
    }

    /// Read a capped combined score. Chiron on a supportive day reads as insight.
    pub fn from_score(score: f64, chiron_support: bool) -> Self {
        if score <= SUPPORT_THRESHOLD {
            if chiron_support {
                CautionLevel::Insight
            } else {
                CautionLevel::Support
            }
        } else if score <= NO_FLAG_THRESHOLD {
            CautionLevel::NoFlag
        } else if score <= GENTLE_THRESHOLD {
            CautionLevel::GentleNote
        } else if score <= CAUTION_THRESHOLD {
            CautionLevel::Caution
        } else {
            CautionLevel::HighCaution
        }
    }

    /// One step down the caution ladder. Support levels are unchanged.
    pub fn downgrade(self) -> Self {
        match self {
            CautionLevel::HighCaution => CautionLevel::Caution,
            CautionLevel::Caution => CautionLevel::GentleNote,
            CautionLevel::GentleNote => CautionLevel::NoFlag,
            other => other,
        }
    }

    fn note(&self) -> &'static str {
        match self {
            CautionLevel::Support => "Supportive day: simple steps flow, so share a kind word.",
            CautionLevel::Insight => "Good time for inner work; small honest adjustments help.",
            CautionLevel::Mixed => "Support within tension, so clarify and proceed in small steps.",
            CautionLevel::NoFlag => "",
            CautionLevel::GentleNote => "Mild friction: go slow on decisions and keep messages short.",
            CautionLevel::Caution => "Expect bumps today. Clarify, pause, then decide.",
            CautionLevel::HighCaution => "Tension is high, so avoid big calls if you can.",
        }
    }
}

impl std::fmt::Display for CautionLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

const SOFTENER: &str = "Tension comes with support, so clarify and proceed in small steps.";

/// One event's share of a day's score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CautionDriver {
    pub event: EventId,
    pub label: String,
    pub orb: f64,
    pub phase: Phase,
    pub weight: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CautionDigest {
    pub date: NaiveDate,
    pub severity: CautionLevel,
    /// Capped combined score, rounded to two places.
    pub score: f64,
    /// Highest positive-score event of the day; never a supportive one.
    pub representative: Option<EventId>,
    pub representative_label: Option<String>,
    /// The two largest contributors.
    pub drivers: Vec<CautionDriver>,
    pub note: String,
    /// Compact driver notes for practitioners, e.g. "Saturn square Venus (1.00°, applying) dominates".
    pub pro_notes: String,
}

/// A date's netted friction and support.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CautionWindow {
    pub date: NaiveDate,
    pub label: CautionLevel,
    /// Friction plus support; positive leans caution.
    pub net_score: f64,
    pub friction_score: f64,
    /// Zero or negative.
    pub support_score: f64,
    /// Set only when the date had both friction and support.
    pub support_ratio: Option<f64>,
    pub note: String,
    pub drivers: Vec<CautionDriver>,
}

/// The request's caution window and lucky window. Either may be missing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WindowResolution {
    pub caution: Option<CautionWindow>,
    pub lucky: Option<CautionWindow>,
}

struct Contribution<'a> {
    event: &'a Event,
    weight: f64,
}

#[derive(Debug, Clone)]
pub struct CautionDigester {
    scale: f64,
    limit: usize,
}

impl CautionDigester {
    pub fn new(config: &PipelineConfig) -> Self {
        Self {
            scale: config.scoring.scale,
            limit: 3,
        }
    }

    pub fn with_defaults() -> Self {
        Self::new(&PipelineConfig::default())
    }

    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }

    /// Normalized, phase-damped contribution of one scored event.
    pub fn contribution(&self, event: &Event) -> f64 {
        if self.scale <= 0.0 {
            return 0.0;
        }
        event.score / self.scale * event.phase.multiplier()
    }

    /// Digest one date's events. `None` when there is nothing to flag.
    pub fn digest_day(&self, date: NaiveDate, events: &[&Event]) -> Option<CautionDigest> {
        let contributions = self.contributions(events);
        if contributions.is_empty() {
            return None;
        }

        let raw: f64 = contributions.iter().map(|c| c.weight).sum();
        let score = raw.clamp(-MAX_SCORE, MAX_SCORE);

        let chiron_support = contributions
            .iter()
            .any(|c| c.weight < 0.0 && involves(c.event, &Body::Chiron));
        let mut severity = CautionLevel::from_score(score, chiron_support);

        if severity.is_caution() && contributions.iter().all(|c| c.weight <= 0.0) {
            severity = if score <= SUPPORT_THRESHOLD {
                CautionLevel::Support
            } else {
                CautionLevel::NoFlag
            };
        }

        if !matches!(severity, CautionLevel::Caution | CautionLevel::HighCaution)
            && contributions.iter().any(is_angle_trigger)
        {
            debug!(%date, "angle trigger raised severity to caution");
            severity = CautionLevel::Caution;
        }

        if is_wide_moon(&contributions) {
            severity = severity.downgrade();
        }

        let ratio = support_ratio(&contributions);
        if severity.is_caution() && ratio >= STRONG_SUPPORT_RATIO {
            severity = severity.downgrade();
        }

        if severity == CautionLevel::NoFlag {
            return None;
        }

        let mut note = severity.note().to_string();
        if severity.is_caution() && ratio >= SOFT_SUPPORT_RATIO {
            note.push(' ');
            note.push_str(SOFTENER);
        }

        let representative = contributions
            .iter()
            .filter(|c| c.event.score > 0.0)
            .max_by(|a, b| {
                a.event
                    .score
                    .total_cmp(&b.event.score)
                    .then_with(|| b.event.pair_key().cmp(&a.event.pair_key()))
            })
            .map(|c| c.event);

        Some(CautionDigest {
            date,
            severity,
            score: round2(score),
            representative: representative.map(|e| e.id),
            representative_label: representative.map(Event::label),
            drivers: drivers(&contributions, 2),
            note,
            pro_notes: pro_notes(&contributions),
        })
    }

    /// Flagged days, strongest first, at most `limit` of them.
    pub fn digest(&self, events: &[Event]) -> Vec<CautionDigest> {
        let mut digests: Vec<CautionDigest> = by_date(events)
            .iter()
            .filter_map(|(date, day)| self.digest_day(*date, day))
            .collect();
        digests.sort_by(|a, b| {
            b.score
                .abs()
                .total_cmp(&a.score.abs())
                .then_with(|| a.date.cmp(&b.date))
        });
        digests.truncate(self.limit);
        digests
    }

    /// Net each date's friction against its support and pick one caution
    /// window and one lucky window.
    ///
    /// Only the two strongest windows by `|net_score|` are considered, and the
    /// two slots never hold the same window.
    pub fn resolve_windows(&self, events: &[Event]) -> WindowResolution {
        let mut windows: Vec<CautionWindow> = by_date(events)
            .iter()
            .filter_map(|(date, day)| self.window(*date, day))
            .collect();
        windows.sort_by(|a, b| {
            b.net_score
                .abs()
                .total_cmp(&a.net_score.abs())
                .then_with(|| a.date.cmp(&b.date))
        });
        windows.truncate(WINDOW_CANDIDATES);

        let mut caution: Option<usize> = None;
        let mut lucky: Option<usize> = None;
        for (i, window) in windows.iter().enumerate() {
            if caution.is_none() && window.label.is_caution() {
                caution = Some(i);
            } else if lucky.is_none() && window.label.is_support() {
                lucky = Some(i);
            }
        }
        for (i, window) in windows.iter().enumerate() {
            if caution == Some(i) || lucky == Some(i) {
                continue;
            }
            if caution.is_none() && window.net_score >= 0.0 {
                caution = Some(i);
            } else if lucky.is_none() && window.net_score < 0.0 {
                lucky = Some(i);
            }
        }

        let resolution = WindowResolution {
            caution: caution.map(|i| windows[i].clone()),
            lucky: lucky.map(|i| windows[i].clone()),
        };
        debug!(
            windows = windows.len(),
            caution = resolution.caution.as_ref().map(|w| w.label.label()).unwrap_or("none"),
            lucky = resolution.lucky.as_ref().map(|w| w.label.label()).unwrap_or("none"),
            "caution windows resolved"
        );
        resolution
    }

    /// One date's window: friction and support netted when both are present.
    pub fn window(&self, date: NaiveDate, events: &[&Event]) -> Option<CautionWindow> {
        let contributions = self.contributions(events);
        if contributions.is_empty() {
            return None;
        }

        let friction: f64 = contributions
            .iter()
            .filter(|c| c.weight > 0.0)
            .map(|c| c.weight)
            .sum::<f64>()
            .min(MAX_SCORE);
        let support: f64 = contributions
            .iter()
            .filter(|c| c.weight < 0.0)
            .map(|c| c.weight)
            .sum::<f64>()
            .max(-MAX_SCORE);
        let net = friction + support;
        let chiron_support = contributions
            .iter()
            .any(|c| c.weight < 0.0 && involves(c.event, &Body::Chiron));

        let (label, ratio) = if friction > 0.0 && support < 0.0 {
            let ratio = support.abs() / friction;
            let label = if net.abs() <= NETTING_THRESHOLD {
                CautionLevel::Mixed
            } else if net < 0.0 {
                CautionLevel::Support
            } else if ratio >= STRONG_SUPPORT_RATIO {
                CautionLevel::GentleNote
            } else if ratio >= SOFT_SUPPORT_RATIO {
                CautionLevel::Caution
            } else if contributions.iter().any(is_angle_trigger) {
                CautionLevel::Caution
            } else if is_wide_moon(&contributions) {
                CautionLevel::GentleNote
            } else {
                CautionLevel::Caution
            };
            (label, Some(round2(ratio)))
        } else if friction > 0.0 {
            let mut label = CautionLevel::from_score(friction, false);
            if contributions.iter().any(is_angle_trigger) {
                label = label.max(CautionLevel::Caution);
            }
            if is_wide_moon(&contributions) {
                label = label.downgrade();
            }
            if label == CautionLevel::NoFlag {
                return None;
            }
            (label, None)
        } else if chiron_support {
            (CautionLevel::Insight, None)
        } else {
            (CautionLevel::Support, None)
        };

        let mut note = label.note().to_string();
        if label.is_caution() && ratio.is_some_and(|r| r >= SOFT_SUPPORT_RATIO) {
            note.push(' ');
            note.push_str(SOFTENER);
        }

        Some(CautionWindow {
            date,
            label,
            net_score: round2(net),
            friction_score: round2(friction),
            support_score: round2(support),
            support_ratio: ratio,
            note,
            drivers: drivers(&contributions, 3),
        })
    }

    /// Non-zero contributions, largest magnitude first.
    fn contributions<'a>(&self, events: &[&'a Event]) -> Vec<Contribution<'a>> {
        let mut contributions: Vec<Contribution<'a>> = events
            .iter()
            .map(|&event| Contribution {
                event,
                weight: self.contribution(event),
            })
            .filter(|c| c.weight != 0.0)
            .collect();
        contributions.sort_by(|a, b| {
            b.weight
                .abs()
                .total_cmp(&a.weight.abs())
                .then_with(|| a.event.pair_key().cmp(&b.event.pair_key()))
        });
        contributions
    }
}

impl Default for CautionDigester {
    fn default() -> Self {
        Self::with_defaults()
    }
}

fn by_date(events: &[Event]) -> BTreeMap<NaiveDate, Vec<&Event>> {
    let mut days: BTreeMap<NaiveDate, Vec<&Event>> = BTreeMap::new();
    for event in events {
        days.entry(event.date).or_default().push(event);
    }
    days
}

fn drivers(contributions: &[Contribution<'_>], limit: usize) -> Vec<CautionDriver> {
    contributions
        .iter()
        .take(limit)
        .map(|c| CautionDriver {
            event: c.event.id,
            label: c.event.label(),
            orb: round2(c.event.orb),
            phase: c.event.phase,
            weight: round2(c.weight),
        })
        .collect()
}

fn is_wide_moon(contributions: &[Contribution<'_>]) -> bool {
    contributions
        .first()
        .is_some_and(|top| top.event.transit_body == Body::Moon && top.event.orb > WIDE_MOON_ORB)
}

fn involves(event: &Event, body: &Body) -> bool {
    event.transit_body == *body || event.natal_body == *body
}

fn is_angle_trigger(c: &Contribution<'_>) -> bool {
    c.weight > 0.0
        && matches!(c.event.aspect, Aspect::Square | Aspect::Opposition)
        && c.event.phase == Phase::Applying
        && c.event.orb <= ANGLE_TRIGGER_ORB
        && c.event.natal_body.is_angle()
}

/// Supportive magnitude relative to friction. A day without friction is fully supported.
fn support_ratio(contributions: &[Contribution<'_>]) -> f64 {
    let friction: f64 = contributions
        .iter()
        .filter(|c| c.weight > 0.0)
        .map(|c| c.weight)
        .sum();
    if friction == 0.0 {
        return 1.0;
    }
    let support: f64 = contributions
        .iter()
        .filter(|c| c.weight < 0.0)
        .map(|c| c.weight.abs())
        .sum();
    support / friction
}

fn pro_notes(contributions: &[Contribution<'_>]) -> String {
    contributions
        .iter()
        .take(2)
        .enumerate()
        .map(|(i, c)| {
            let role = match (c.weight >= 0.0, i) {
                (true, 0) => "dominates",
                (true, _) => "adds friction",
                (false, _) => "provides support",
            };
            format!(
                "{} ({:.2}°, {}) {}",
                c.event.label(),
                c.event.orb,
                c.event.phase.as_str(),
                role
            )
        })
        .collect::<Vec<_>>()
        .join("; ")
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
