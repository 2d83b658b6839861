//! Pipeline facade - raw events in, narrative out.
//!
//! Stages run strictly in order: validation, scoring, archetype routing, area
//! selection, then per-area assembly with one shared variation state. The
//! tables behind each stage are read-only, so one pipeline can serve any
//! number of requests.

use astro_rules::{
    Area, Event, EventBatch, EventId, PipelineConfig, Polarity, RawEvent, RejectedEvent, Scorer,
    Tone,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::info;

use crate::archetype::{ArchetypeRouter, ClassifiedEvent, RuleTable, VoteTally};
use crate::areas::{AreaAssignment, AreaSelector, CandidateSummary};
use crate::assembler::{Bullets, NarrativeAssembler, NarrativeGenerator, NarrativePrompt};
use crate::caution::{CautionDigest, CautionDigester, WindowResolution};
use crate::error::{NarrationError, NarrationResult};
use crate::phrasebank::TemplateLibrary;
use crate::variation::VariationState;

/// Tags reported in the summary.
const TOP_TAGS: usize = 3;

/// Sentences requested from an external generator.
const GENERATED_SENTENCES: usize = 4;

/// Rendered output for one life area.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AreaNarrative {
    pub title: String,
    pub paragraph: String,
    pub do_bullets: Vec<String>,
    pub avoid_bullets: Vec<String>,
    pub primary: Option<CandidateSummary>,
    pub supporting: Option<CandidateSummary>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NarrativeSummary {
    /// Label of the strongest event, e.g. "Saturn square Venus".
    pub dominant_event: Option<String>,
    pub dominant_event_id: Option<EventId>,
    /// Read from the net score of every event.
    pub tone: Tone,
    pub top_tags: Vec<String>,
}

impl Default for NarrativeSummary {
    fn default() -> Self {
        Self {
            dominant_event: None,
            dominant_event_id: None,
            tone: Tone::Neutral,
            top_tags: Vec::new(),
        }
    }
}

/// Everything the rendering layer needs for one request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastNarrative {
    pub areas: BTreeMap<Area, AreaNarrative>,
    pub summary: NarrativeSummary,
    pub cautions: Vec<CautionDigest>,
    /// Netted caution and lucky windows across all dates.
    pub windows: WindowResolution,
    pub rejected: Vec<RejectedEvent>,
}

impl ForecastNarrative {
    pub fn area(&self, area: Area) -> Option<&AreaNarrative> {
        self.areas.get(&area)
    }
}

#[derive(Debug, Clone)]
pub struct NarrativePipeline {
    config: PipelineConfig,
    scorer: Scorer,
    router: ArchetypeRouter,
    selector: AreaSelector,
    assembler: NarrativeAssembler,
    digester: CautionDigester,
}

impl NarrativePipeline {
    /// Validate `config` and build every stage.
    pub fn new(config: PipelineConfig, library: Arc<TemplateLibrary>) -> NarrationResult<Self> {
        config.validate()?;
        Ok(Self::build(config, library))
    }

    /// Default configuration and the built-in template set.
    ///
    /// The default configuration always passes validation.
    pub fn with_defaults() -> Self {
        let config = PipelineConfig::default();
        debug_assert!(config.validate().is_ok());
        Self::build(config, Arc::new(TemplateLibrary::standard()))
    }

    fn build(config: PipelineConfig, library: Arc<TemplateLibrary>) -> Self {
        Self {
            scorer: Scorer::new(config.scoring.clone()),
            router: ArchetypeRouter::new(RuleTable::standard(), &config),
            selector: AreaSelector::new(&config),
            assembler: NarrativeAssembler::new(&config, library),
            digester: CautionDigester::new(&config),
            config,
        }
    }

    /// Parse a TOML configuration and build the pipeline with the built-in templates.
    pub fn from_toml_str(source: &str) -> NarrationResult<Self> {
        let config = PipelineConfig::from_toml_str(source)?;
        Self::new(config, Arc::new(TemplateLibrary::standard()))
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    pub fn assembler(&self) -> &NarrativeAssembler {
        &self.assembler
    }

    /// Fresh recency memory sized by `variation.recency_window`; one per narration.
    pub fn variation_state(&self) -> VariationState {
        VariationState::new(self.config.variation.recency_window)
    }

    /// Validate raw upstream events and narrate the survivors.
    pub fn narrate(&self, raw: &[RawEvent]) -> NarrationResult<ForecastNarrative> {
        self.narrate_batch(EventBatch::from_raw(raw))
    }

    /// Narrate an already validated batch.
    ///
    /// Fails only when the batch had events and every one was rejected.
    pub fn narrate_batch(&self, batch: EventBatch) -> NarrationResult<ForecastNarrative> {
        if batch.all_rejected() {
            return Err(NarrationError::NoEventsToNarrate {
                rejected: batch.rejected.len(),
            });
        }
        let mut narrative = self.narrate_events(batch.events);
        narrative.rejected = batch.rejected;
        Ok(narrative)
    }

    /// Score and narrate validated events. An empty list gives generic prose everywhere.
    pub fn narrate_events(&self, events: Vec<Event>) -> ForecastNarrative {
        let (classified, assignment) = self.route(events);
        let mut state = self.variation_state();

        let mut areas = BTreeMap::new();
        for area in Area::ALL {
            areas.insert(area, self.narrate_area(&mut state, area, &assignment));
        }

        self.finish(areas, &classified, &assignment)
    }

    /// Like [`narrate_batch`](Self::narrate_batch), but paragraphs come from
    /// `generator` and fall back to templates when it fails.
    pub fn narrate_with<G: NarrativeGenerator>(
        &self,
        batch: EventBatch,
        generator: &G,
    ) -> NarrationResult<ForecastNarrative> {
        if batch.all_rejected() {
            return Err(NarrationError::NoEventsToNarrate {
                rejected: batch.rejected.len(),
            });
        }
        let (classified, assignment) = self.route(batch.events);
        let mut state = self.variation_state();

        let mut areas = BTreeMap::new();
        for area in Area::ALL {
            let narrative = match assignment.primary(area) {
                Some(primary) => {
                    let supporting = assignment.supporting(area).map(|c| &c.event);
                    let prompt = NarrativePrompt::for_events(area, &primary.event, supporting)
                        .with_limits(GENERATED_SENTENCES, self.config.guardrails.max_sentence_words);
                    let generated = generator.generate(&prompt);
                    let paragraph = self.assembler.accept_generated(
                        &mut state,
                        area,
                        &primary.event,
                        supporting,
                        generated,
                    );
                    self.area_narrative(&mut state, area, &assignment, paragraph)
                }
                None => self.generic_area(area),
            };
            areas.insert(area, narrative);
        }

        let mut narrative = self.finish(areas, &classified, &assignment);
        narrative.rejected = batch.rejected;
        Ok(narrative)
    }

    fn route(&self, events: Vec<Event>) -> (Vec<ClassifiedEvent>, AreaAssignment) {
        let scored: Vec<Event> = events.into_iter().map(|e| self.scorer.apply(e)).collect();
        let classified = self.router.classify_all(&scored);
        let assignment = self.selector.assign_areas(&classified);
        (classified, assignment)
    }

    fn narrate_area(&self, state: &mut VariationState, area: Area, assignment: &AreaAssignment) -> AreaNarrative {
        match assignment.primary(area) {
            Some(primary) => {
                let supporting = assignment.supporting(area).map(|c| &c.event);
                let paragraph = self.assembler.compose(state, area, &primary.event, supporting);
                self.area_narrative(state, area, assignment, paragraph)
            }
            None => self.generic_area(area),
        }
    }

    fn area_narrative(
        &self,
        state: &mut VariationState,
        area: Area,
        assignment: &AreaAssignment,
        paragraph: String,
    ) -> AreaNarrative {
        let primary = assignment.primary(area);
        let bullets = match primary {
            Some(candidate) => self.assembler.bullets(state, area, &candidate.event),
            None => Bullets::default(),
        };
        AreaNarrative {
            title: area.title().to_string(),
            paragraph,
            do_bullets: bullets.do_bullets,
            avoid_bullets: bullets.avoid_bullets,
            primary: primary.map(CandidateSummary::from),
            supporting: assignment.supporting(area).map(CandidateSummary::from),
        }
    }

    fn generic_area(&self, area: Area) -> AreaNarrative {
        let bullets = self.assembler.generic_bullets(area, Tone::Neutral);
        AreaNarrative {
            title: area.title().to_string(),
            paragraph: self.assembler.compose_generic(area, Tone::Neutral),
            do_bullets: bullets.do_bullets,
            avoid_bullets: bullets.avoid_bullets,
            primary: None,
            supporting: None,
        }
    }

    fn finish(
        &self,
        areas: BTreeMap<Area, AreaNarrative>,
        classified: &[ClassifiedEvent],
        assignment: &AreaAssignment,
    ) -> ForecastNarrative {
        let events: Vec<Event> = classified.iter().map(|c| c.event.clone()).collect();
        let cautions = self.digester.digest(&events);
        let windows = self.digester.resolve_windows(&events);
        let summary = self.summarize(classified);

        let narrated = assignment.rankings.values().filter(|r| !r.is_empty()).count();
        info!(
            events = classified.len(),
            areas_with_events = narrated,
            cautions = cautions.len(),
            dominant = summary.dominant_event.as_deref().unwrap_or("none"),
            tone = %summary.tone,
            "narrative assembled"
        );

        ForecastNarrative {
            areas,
            summary,
            cautions,
            windows,
            rejected: Vec::new(),
        }
    }

    /// Dominant event, overall tone and the most weighted theme tags.
    pub fn summarize(&self, classified: &[ClassifiedEvent]) -> NarrativeSummary {
        let dominant = classified.iter().max_by(|a, b| {
            a.event
                .score
                .abs()
                .total_cmp(&b.event.score.abs())
                .then_with(|| b.event.pair_key().cmp(&a.event.pair_key()))
                .then_with(|| b.event.date.cmp(&a.event.date))
        });

        let net: f64 = classified.iter().map(|c| c.event.score).sum();
        let tone = Polarity::from_score(net, self.config.router.neutral_band).tone();

        let mut tally: VoteTally<String> = VoteTally::new();
        for item in classified {
            let weight = item.event.score.abs().max(0.01) as f32;
            for theme in item.classification.themes() {
                tally.add_vote(theme.to_string(), weight);
            }
        }
        let top_tags = tally
            .ranked()
            .into_iter()
            .take(TOP_TAGS)
            .map(|(tag, _)| tag.clone())
            .collect();

        NarrativeSummary {
            dominant_event: dominant.map(|c| c.event.label()),
            dominant_event_id: dominant.map(|c| c.event.id),
            tone,
            top_tags,
        }
    }
}

impl Default for NarrativePipeline {
    fn default() -> Self {
        Self::with_defaults()
    }
}
