//! Area Selector - ranks classified events for each life area.
//!
//! For each (event, area) pair the selector sums weighted relevance sources,
//! adds an aspect-strength factor and a coherence bonus, and keeps the top-K
//! candidates. Areas with nothing relevant enough borrow from a donor area.

mod relevance;

pub use relevance::*;

use astro_rules::{Area, EventId, PipelineConfig, SelectorConfig};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::BTreeMap;
use tracing::debug;

use crate::archetype::ClassifiedEvent;

/// One event ranked for one area.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candidate {
    pub area: Area,
    pub event: ClassifiedEvent,
    /// Aspect strength from `|score|`, aspect type, closeness and intensity.
    pub strength: f64,
    /// Weighted sum of relevance sources.
    pub relevance: f64,
    pub coherence: f64,
    /// Blended ranking score.
    pub score: f64,
    pub sources: Vec<Source>,
    /// Set when the candidate was taken from another area's ranking.
    pub borrowed_from: Option<Area>,
}

impl Candidate {
    /// Id of the underlying event.
    pub fn event_id(&self) -> EventId {
        self.event.event.id
    }

    /// True when the candidate came from a donor area.
    pub fn is_borrowed(&self) -> bool {
        self.borrowed_from.is_some()
    }

    /// Deterministic ranking: blended score, strength, planet pair, date.
    fn rank_cmp(&self, other: &Candidate) -> Ordering {
        other
            .score
            .total_cmp(&self.score)
            .then_with(|| other.strength.total_cmp(&self.strength))
            .then_with(|| self.event.event.pair_key().cmp(&other.event.event.pair_key()))
            .then_with(|| self.event.event.date.cmp(&other.event.event.date))
            .then_with(|| self.event.event.id.cmp(&other.event.event.id))
    }
}

/// Plain view of a candidate for the rendering layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandidateSummary {
    pub event: String,
    pub date: String,
    pub archetype: String,
    pub strength: f64,
    pub relevance: f64,
    pub score: f64,
    pub sources: Vec<String>,
    pub borrowed_from: Option<Area>,
}

impl From<&Candidate> for CandidateSummary {
    fn from(c: &Candidate) -> Self {
        Self {
            event: c.event.event.label(),
            date: c.event.event.date.to_string(),
            archetype: c.event.classification.archetype.clone(),
            strength: round4(c.strength),
            relevance: round4(c.relevance),
            score: round4(c.score),
            sources: c.sources.iter().map(|s| s.as_str().to_string()).collect(),
            borrowed_from: c.borrowed_from,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AreaSummary {
    pub selected: Option<CandidateSummary>,
    pub supporting: Option<CandidateSummary>,
    pub ranking: Vec<CandidateSummary>,
}

/// Ranked candidates per area plus which areas each event landed in.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AreaAssignment {
    pub rankings: BTreeMap<Area, Vec<Candidate>>,
    pub membership: BTreeMap<EventId, Vec<Area>>,
}

impl AreaAssignment {
    /// Kept candidates for `area`, best first. Empty when nothing was kept.
    pub fn candidates(&self, area: Area) -> &[Candidate] {
        self.rankings.get(&area).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Top candidate; drives the paragraph.
    pub fn primary(&self, area: Area) -> Option<&Candidate> {
        self.candidates(area).first()
    }

    /// Runner-up, used for the supporting evidence clause.
    pub fn supporting(&self, area: Area) -> Option<&Candidate> {
        self.candidates(area).get(1)
    }

    /// Every area the event was ranked in (before top-K truncation).
    pub fn areas_of(&self, id: EventId) -> &[Area] {
        self.membership.get(&id).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Plain per-area view with every area present.
    pub fn summary(&self) -> BTreeMap<Area, AreaSummary> {
        Area::ALL
            .iter()
            .map(|area| {
                let ranking: Vec<CandidateSummary> =
                    self.candidates(*area).iter().map(CandidateSummary::from).collect();
                let summary = AreaSummary {
                    selected: ranking.first().cloned(),
                    supporting: ranking.get(1).cloned(),
                    ranking,
                };
                (*area, summary)
            })
            .collect()
    }
}

#[derive(Debug, Clone, Default)]
pub struct AreaSelector {
    config: SelectorConfig,
}

impl AreaSelector {
    /// Selector using the `selector` section of `config`.
    pub fn new(config: &PipelineConfig) -> Self {
        Self {
            config: config.selector.clone(),
        }
    }

    pub fn with_defaults() -> Self {
        Self::new(&PipelineConfig::default())
    }

    /// Relevance sources linking an event to an area, one entry per contribution.
    pub fn sources_for(&self, item: &ClassifiedEvent, area: Area) -> Vec<Source> {
        if area == Area::General {
            return vec![Source::General];
        }

        let event = &item.event;
        let mut sources = Vec::new();

        if let Some(house) = event.natal_house {
            if house_areas(house).contains(&area) {
                sources.push(Source::House);
            } else if fallback_houses(area).contains(&house) {
                sources.push(Source::FallbackHouse);
            }
        }

        if event.focus.iter().any(|label| focus_area(label) == Some(area)) {
            sources.push(Source::Focus);
        }

        for body in [&event.transit_body, &event.natal_body] {
            if body_areas(body).contains(&area) {
                sources.push(Source::Body);
            }
        }

        if item
            .classification
            .themes()
            .any(|theme| theme_area(theme) == Some(area))
        {
            sources.push(Source::Classification);
        }

        sources
    }

    /// Raw strength of an event, independent of area.
    pub fn strength(&self, item: &ClassifiedEvent) -> f64 {
        let event = &item.event;
        event.score.abs()
            * aspect_strength_weight(event.aspect)
            * intensity_multiplier(item.classification.intensity)
            * (0.75 + 0.25 * event.closeness())
    }

    fn coherence(&self, item: &ClassifiedEvent, area: Area) -> f64 {
        if area == Area::General {
            return 0.0;
        }
        let matches = item
            .classification
            .themes()
            .filter(|theme| theme_area(theme) == Some(area))
            .count();
        matches as f64 * self.config.coherence_bonus
    }

    /// Score an event for an area. `None` when nothing links them.
    pub fn candidate(&self, item: &ClassifiedEvent, area: Area) -> Option<Candidate> {
        let sources = self.sources_for(item, area);
        if sources.is_empty() {
            return None;
        }
        Some(self.build_candidate(item, area, sources, None))
    }

    fn build_candidate(
        &self,
        item: &ClassifiedEvent,
        area: Area,
        sources: Vec<Source>,
        borrowed_from: Option<Area>,
    ) -> Candidate {
        let relevance: f64 = sources.iter().map(|s| source_weight(area, *s)).sum();
        let strength = self.strength(item);
        let coherence = self.coherence(item, area);
        let score = strength
            + relevance * self.config.relevance_weight
            + coherence * self.config.coherence_weight;

        Candidate {
            area,
            event: item.clone(),
            strength,
            relevance,
            coherence,
            score,
            sources,
            borrowed_from,
        }
    }

    /// Rank every event for every area, keep the top-K and borrow for empty areas.
    pub fn assign_areas(&self, events: &[ClassifiedEvent]) -> AreaAssignment {
        let mut full: BTreeMap<Area, Vec<Candidate>> = BTreeMap::new();

        for area in Area::ALL {
            let mut ranked: Vec<Candidate> = events
                .iter()
                .filter_map(|item| self.candidate(item, area))
                .collect();
            ranked.sort_by(Candidate::rank_cmp);
            full.insert(area, ranked);
        }

        let mut membership: BTreeMap<EventId, Vec<Area>> = BTreeMap::new();
        for (area, ranked) in &full {
            for candidate in ranked {
                let areas = membership.entry(candidate.event_id()).or_default();
                if !areas.contains(area) {
                    areas.push(*area);
                }
            }
        }

        let mut rankings = BTreeMap::new();
        for area in Area::ALL {
            let ranked = full.get(&area).cloned().unwrap_or_default();
            let strong_enough = ranked
                .iter()
                .any(|c| c.relevance >= self.config.min_relevance);

            let mut kept: Vec<Candidate> = Vec::with_capacity(self.config.top_k);
            if !strong_enough {
                if let Some(borrowed) = self.borrow(area, &full) {
                    debug!(
                        area = area.as_str(),
                        from = ?borrowed.borrowed_from,
                        event = %borrowed.event.event.label(),
                        "borrowing candidate from donor area"
                    );
                    let areas = membership.entry(borrowed.event_id()).or_default();
                    if !areas.contains(&area) {
                        areas.push(area);
                    }
                    kept.push(borrowed);
                }
            }

            for candidate in ranked {
                if kept.len() >= self.config.top_k {
                    break;
                }
                if kept.iter().all(|k| k.event_id() != candidate.event_id()) {
                    kept.push(candidate);
                }
            }
            rankings.insert(area, kept);
        }

        AreaAssignment {
            rankings,
            membership,
        }
    }

    /// Take the top candidate of the first donor area that has one.
    fn borrow(&self, area: Area, full: &BTreeMap<Area, Vec<Candidate>>) -> Option<Candidate> {
        donors(area).iter().find_map(|donor| {
            let top = full.get(donor)?.first()?;
            let sources = self.sources_for(&top.event, area);
            Some(self.build_candidate(&top.event, area, sources, Some(*donor)))
        })
    }
}

fn round4(value: f64) -> f64 {
    (value * 10_000.0).round() / 10_000.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::archetype::ArchetypeRouter;
    use astro_rules::{Aspect, Body, Event, Scorer};
    use chrono::NaiveDate;

    fn classify(events: Vec<Event>) -> Vec<ClassifiedEvent> {
        let scorer = Scorer::default();
        let scored: Vec<Event> = events.into_iter().map(|e| scorer.apply(e)).collect();
        ArchetypeRouter::with_defaults().classify_all(&scored)
    }

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, d).unwrap()
    }

    #[test]
    fn test_house_drives_area() {
        let events = classify(vec![
            Event::new(day(1), Body::Saturn, Body::Sun, Aspect::Square, 1.0).with_house(10),
        ]);
        let assignment = AreaSelector::with_defaults().assign_areas(&events);

        let career = assignment.primary(Area::Career).unwrap();
        assert!(career.sources.contains(&Source::House));
        assert!(!career.is_borrowed());
    }

    #[test]
    fn test_focus_label_counts() {
        let selector = AreaSelector::with_defaults();
        let events = classify(vec![
            Event::new(day(1), Body::Mercury, Body::Mercury, Aspect::Sextile, 1.0)
                .with_focus("money"),
        ]);
        let sources = selector.sources_for(&events[0], Area::Finance);
        assert!(sources.contains(&Source::Focus));
    }

    #[test]
    fn test_ranking_is_by_blended_score() {
        let events = classify(vec![
            Event::new(day(1), Body::Moon, Body::Sun, Aspect::Sextile, 3.0).with_house(10),
            Event::new(day(1), Body::Saturn, Body::Sun, Aspect::Square, 0.5).with_house(10),
        ]);
        let assignment = AreaSelector::with_defaults().assign_areas(&events);
        let career = assignment.candidates(Area::Career);
        assert_eq!(career[0].event.event.transit_body, Body::Saturn);
        assert!(career[0].score >= career[1].score);
    }

    #[test]
    fn test_top_k_is_respected() {
        let events = classify(
            (1..=6)
                .map(|d| Event::new(day(d), Body::Mars, Body::Sun, Aspect::Square, 1.0).with_house(10))
                .collect(),
        );
        let assignment = AreaSelector::with_defaults().assign_areas(&events);
        assert_eq!(assignment.candidates(Area::Career).len(), 3);
        for item in &events {
            assert!(assignment.areas_of(item.event.id).contains(&Area::Career));
        }
    }

    #[test]
    fn test_ties_break_by_pair_then_date() {
        let events = classify(vec![
            Event::new(day(2), Body::Mars, Body::Sun, Aspect::Square, 1.0).with_house(10),
            Event::new(day(1), Body::Mars, Body::Sun, Aspect::Square, 1.0).with_house(10),
        ]);
        let assignment = AreaSelector::with_defaults().assign_areas(&events);
        let career = assignment.candidates(Area::Career);
        assert_eq!(career[0].event.event.date, day(1));
        assert_eq!(career[1].event.event.date, day(2));
    }

    #[test]
    fn test_empty_area_borrows_from_donor() {
        // Pluto square natal Pluto in the 11th links to career/finance/love, never health.
        let events = classify(vec![
            Event::new(day(1), Body::Pluto, Body::Pluto, Aspect::Square, 1.0).with_house(11),
        ]);
        let assignment = AreaSelector::with_defaults().assign_areas(&events);
        let health = assignment.primary(Area::Health).unwrap();

        assert_eq!(health.borrowed_from, Some(Area::Love));
        assert!(assignment.areas_of(events[0].event.id).contains(&Area::Health));
    }

    #[test]
    fn test_every_event_lands_somewhere() {
        let events = classify(vec![
            Event::new(day(1), Body::parse("Eris"), Body::parse("Sedna"), Aspect::Quincunx, 0.5),
            Event::new(day(2), Body::Moon, Body::Sun, Aspect::Trine, 5.0),
        ]);
        let assignment = AreaSelector::with_defaults().assign_areas(&events);
        for item in &events {
            assert!(!assignment.areas_of(item.event.id).is_empty());
        }
    }

    #[test]
    fn test_no_events_no_candidates() {
        let assignment = AreaSelector::with_defaults().assign_areas(&[]);
        for area in Area::ALL {
            assert!(assignment.primary(area).is_none());
        }
    }

    #[test]
    fn test_summary_shape() {
        let events = classify(vec![
            Event::new(day(1), Body::Venus, Body::Moon, Aspect::Trine, 0.5).with_house(7),
            Event::new(day(1), Body::Saturn, Body::Venus, Aspect::Square, 1.0).with_house(7),
        ]);
        let summary = AreaSelector::with_defaults().assign_areas(&events).summary();
        let love = &summary[&Area::Love];
        assert!(love.selected.is_some());
        assert!(love.supporting.is_some());
        assert_eq!(love.ranking.len(), 2);
    }
}
