//! Archetype Router - classifies scored events by weighted voting.
//!
//! 1. **Context**: derive polarity, benefic/malefic and base themes for the event
//! 2. **Voting**: every matching rule adds to the archetype and tone tallies
//! 3. **Decision**: highest archetype total wins, tone is decided independently
//! 4. **Intensity**: `|score|` thresholds shifted by the summed rule biases

mod rules;
mod tag;
mod tally;

pub use rules::*;
pub use tag::*;
pub use tally::*;

use astro_rules::{Event, Intensity, IntensityThresholds, PipelineConfig, Polarity, Tone};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use tracing::debug;

/// Archetype used when no rule votes for one.
pub const DEFAULT_ARCHETYPE: &str = "General Flow";

/// Result of routing one event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArchetypeClassification {
    pub archetype: String,
    pub tone: Tone,
    pub intensity: Intensity,
    pub polarity: Polarity,

    /// Ordered, de-duplicated.
    pub tags: Vec<Tag>,

    /// Names of the rules that matched, in declaration order.
    pub matched_rules: Vec<String>,
}

impl ArchetypeClassification {
    /// Theme tag names, in order.
    pub fn themes(&self) -> impl Iterator<Item = &str> {
        self.tags.iter().filter_map(Tag::theme_name)
    }

    pub fn has_theme(&self, theme: &str) -> bool {
        self.themes().any(|t| t == theme)
    }
}

/// An event together with its classification.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassifiedEvent {
    pub event: Event,
    pub classification: ArchetypeClassification,
}

/// Routes scored events to archetypes, tones and intensities.
#[derive(Debug, Clone)]
pub struct ArchetypeRouter {
    rules: RuleTable,
    thresholds: IntensityThresholds,
    neutral_band: f64,
}

impl ArchetypeRouter {
    pub fn new(rules: RuleTable, config: &PipelineConfig) -> Self {
        Self {
            rules,
            thresholds: config.intensity.clone(),
            neutral_band: config.router.neutral_band,
        }
    }

    /// Standard rule table with default thresholds.
    pub fn with_defaults() -> Self {
        Self::new(RuleTable::standard(), &PipelineConfig::default())
    }

    pub fn rules(&self) -> &RuleTable {
        &self.rules
    }

    /// Themes from the natal point, its house and upstream focus labels.
    pub fn base_themes(event: &Event) -> Vec<String> {
        let mut themes: Vec<String> = Vec::new();
        let house_tags = event
            .natal_house
            .map(astro_rules::house_theme_tags)
            .unwrap_or(&[]);

        for theme in event
            .natal_body
            .theme_tags()
            .iter()
            .chain(house_tags.iter())
            .map(|t| t.to_string())
            .chain(event.focus.iter().cloned())
        {
            if !themes.contains(&theme) {
                themes.push(theme);
            }
        }
        themes
    }

    pub fn classify(&self, event: &Event) -> ArchetypeClassification {
        let polarity = event.polarity(self.neutral_band);
        let base = Self::base_themes(event);
        let theme_set: BTreeSet<String> = base.iter().cloned().collect();
        let ctx = RuleContext {
            event,
            polarity,
            benefic: event.is_benefic(),
            malefic: event.is_malefic(),
            themes: &theme_set,
        };

        let mut archetypes: VoteTally<String> = VoteTally::new();
        let mut tones: VoteTally<Tone> = VoteTally::new();
        let mut bias = 0;
        let mut rule_tags = Vec::new();
        let mut matched_rules = Vec::new();

        for rule in self.rules.matching(&ctx) {
            if let Some(vote) = &rule.archetype_vote {
                archetypes.add_vote(vote.archetype.clone(), vote.weight);
            }
            if let Some(vote) = rule.tone_vote {
                tones.add_vote(vote.tone, vote.weight);
            }
            bias += rule.intensity_bias;
            rule_tags.extend(rule.tags.iter().cloned());
            matched_rules.push(rule.name.clone());
        }

        let archetype = archetypes
            .winner()
            .map(|(name, _)| name.clone())
            .unwrap_or_else(|| DEFAULT_ARCHETYPE.to_string());
        let tone = tones
            .winner()
            .map(|(tone, _)| *tone)
            .unwrap_or(Tone::Neutral);
        let intensity = self.thresholds.level(event.score).shift(bias);

        let mut tags = vec![Tag::Tone(tone), Tag::Polarity(polarity)];
        for theme in base.into_iter().chain(rule_tags) {
            push_unique(&mut tags, Tag::Theme(theme));
        }

        debug!(
            event = %event.label(),
            score = event.score,
            archetype = %archetype,
            %tone,
            intensity = intensity.as_str(),
            rules = matched_rules.len(),
            "classified event"
        );

        ArchetypeClassification {
            archetype,
            tone,
            intensity,
            polarity,
            tags,
            matched_rules,
        }
    }

    pub fn classify_all(&self, events: &[Event]) -> Vec<ClassifiedEvent> {
        events
            .iter()
            .map(|event| ClassifiedEvent {
                event: event.clone(),
                classification: self.classify(event),
            })
            .collect()
    }
}

impl Default for ArchetypeRouter {
    fn default() -> Self {
        Self::with_defaults()
    }
}
