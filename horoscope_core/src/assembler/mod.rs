//! Narrative Assembler - builds area paragraphs and bullets from selected events.
//!
//! A paragraph is opener, evidence, optional coaching beat and closer, joined
//! and then run through the same finishing pass as generated text: QA polish,
//! at most one driver hint, guardrails. Anything that comes out near-empty is
//! replaced by generic prose for the area and tone.

mod prompt;

pub use prompt::*;

use astro_rules::{Area, PipelineConfig, Slot, Tone};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, warn};

use crate::archetype::ClassifiedEvent;
use crate::error::GeneratorError;
use crate::evidence::evidence_clause;
use crate::guardrails::Guardrails;
use crate::microcopy;
use crate::phrasebank::{
    action_phrases, area_focus, generic_sentence, intensity_descriptors, render, tone_descriptors,
    RenderValues, TemplateLibrary,
};
use crate::polish::{capitalize_first, ensure_terminal, polish, polish_bullet};
use crate::variation::{fragment_seed, Fragment, VariationEngine, VariationState};

/// Paragraphs with fewer words than this are replaced by generic prose.
pub const MIN_PARAGRAPH_WORDS: usize = 8;

/// Bullets rendered per area.
pub const BULLET_COUNT: usize = 3;

/// Do/avoid bullet lists for one area. Exactly one of them is filled.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bullets {
    pub do_bullets: Vec<String>,
    pub avoid_bullets: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct NarrativeAssembler {
    engine: VariationEngine,
    guardrails: Guardrails,
    rich_templates: bool,
    driver_microcopy: bool,
}

impl NarrativeAssembler {
    pub fn new(config: &PipelineConfig, library: Arc<TemplateLibrary>) -> Self {
        Self {
            engine: VariationEngine::new(library),
            guardrails: Guardrails::standard(config.guardrails.clone()),
            rich_templates: config.rich_templates,
            driver_microcopy: config.driver_microcopy,
        }
    }

    pub fn with_defaults() -> Self {
        Self::new(&PipelineConfig::default(), Arc::new(TemplateLibrary::standard()))
    }

    pub fn with_guardrails(mut self, guardrails: Guardrails) -> Self {
        self.guardrails = guardrails;
        self
    }

    pub fn engine(&self) -> &VariationEngine {
        &self.engine
    }

    pub fn guardrails(&self) -> &Guardrails {
        &self.guardrails
    }

    /// Paragraph for `area` driven by `primary`, optionally citing `supporting`.
    pub fn compose(
        &self,
        state: &mut VariationState,
        area: Area,
        primary: &ClassifiedEvent,
        supporting: Option<&ClassifiedEvent>,
    ) -> String {
        let tone = primary.classification.tone;
        let event = &primary.event;
        let seed = |slot: Slot, salt: &str| fragment_seed(area, slot, Some(event), salt);

        let mut parts: Vec<String> = Vec::with_capacity(4);

        let opener = self.engine.select_fragment(state, area, tone, Slot::Opener, seed(Slot::Opener, ""));
        parts.push(self.render_fragment(state, area, primary, &opener, seed(Slot::Opener, "values")));

        let supporting_event = supporting
            .filter(|_| self.rich_templates)
            .map(|s| &s.event);
        let evidence = evidence_clause(area, event, supporting_event, seed(Slot::Opener, "evidence"));
        if !evidence.is_empty() {
            parts.push(ensure_terminal(&capitalize_first(&evidence)));
        }

        if self.rich_templates {
            let coaching = self.engine.select_fragment(state, area, tone, Slot::Coaching, seed(Slot::Coaching, ""));
            parts.push(self.render_fragment(state, area, primary, &coaching, seed(Slot::Coaching, "values")));
        }

        let closer = self.engine.select_fragment(state, area, tone, Slot::Closer, seed(Slot::Closer, ""));
        parts.push(self.render_fragment(state, area, primary, &closer, seed(Slot::Closer, "values")));

        let hint = self
            .driver_microcopy
            .then(|| microcopy::hint_for(event))
            .flatten();
        let paragraph = self.finish(area, &parts.join(" "), hint);

        if is_near_empty(&paragraph) {
            debug!(area = area.as_str(), event = %event.label(), "paragraph near-empty, using generic prose");
            return self.compose_generic(area, tone);
        }
        paragraph
    }

    /// Always-available prose for an area with nothing to say about it.
    pub fn compose_generic(&self, area: Area, tone: Tone) -> String {
        let text = [Slot::Opener, Slot::Coaching, Slot::Closer]
            .iter()
            .map(|slot| generic_sentence(area, tone, *slot))
            .collect::<Vec<_>>()
            .join(" ");
        self.finish(area, &text, None)
    }

    /// Treat generator output as untrusted: polish and guard it, or fall back to templates.
    pub fn accept_generated(
        &self,
        state: &mut VariationState,
        area: Area,
        primary: &ClassifiedEvent,
        supporting: Option<&ClassifiedEvent>,
        generated: Result<String, GeneratorError>,
    ) -> String {
        match generated {
            Ok(text) => {
                let hint = self
                    .driver_microcopy
                    .then(|| microcopy::hint_for(&primary.event))
                    .flatten();
                let paragraph = self.finish(area, &text, hint);
                if is_near_empty(&paragraph) {
                    warn!(area = area.as_str(), "generated text unusable after polish, using templates");
                    return self.compose(state, area, primary, supporting);
                }
                paragraph
            }
            Err(err) => {
                warn!(area = area.as_str(), error = %err, "generator failed, using templates");
                self.compose(state, area, primary, supporting)
            }
        }
    }

    /// Do bullets for supportive and neutral events, avoid bullets for challenging ones.
    pub fn bullets(&self, state: &mut VariationState, area: Area, primary: &ClassifiedEvent) -> Bullets {
        let tone = primary.classification.tone;
        let mut bullets = Bullets::default();

        for i in 0..BULLET_COUNT {
            let salt = format!("bullet-{i}");
            let seed = fragment_seed(area, Slot::Bullet, Some(&primary.event), &salt);
            let fragment = self.engine.select_fragment(state, area, tone, Slot::Bullet, seed);
            let text = self.render_fragment(state, area, primary, &fragment, seed.wrapping_add(1));
            let Some(scrubbed) = self.guardrails.scrub_sentence(&polish_bullet(&text), area) else {
                continue;
            };
            let bullet = polish_bullet(&scrubbed);
            let target = if fragment.tone == Tone::Challenge {
                &mut bullets.avoid_bullets
            } else {
                &mut bullets.do_bullets
            };
            if !bullet.is_empty() && !target.contains(&bullet) {
                target.push(bullet);
            }
        }
        bullets
    }

    /// Bullets for an area with no events.
    pub fn generic_bullets(&self, area: Area, tone: Tone) -> Bullets {
        let bullet = polish_bullet(&generic_sentence(area, tone, Slot::Bullet));
        if tone == Tone::Challenge {
            Bullets {
                do_bullets: Vec::new(),
                avoid_bullets: vec![bullet],
            }
        } else {
            Bullets {
                do_bullets: vec![bullet],
                avoid_bullets: Vec::new(),
            }
        }
    }

    /// Polish, add the driver hint, then apply guardrails.
    pub fn finish(&self, area: Area, text: &str, hint: Option<&str>) -> String {
        let polished = polish(text);
        let with_hint = match hint {
            Some(hint) if !polished.is_empty() => microcopy::inject(&polished, hint),
            _ => polished,
        };
        self.guardrails.apply(&with_hint, area)
    }

    /// Fill a fragment's placeholders with values chosen for this event.
    ///
    /// Word pools follow the fragment's resolved tone so a fallback template
    /// never receives phrases framed for another tone.
    fn render_fragment(
        &self,
        state: &mut VariationState,
        area: Area,
        primary: &ClassifiedEvent,
        fragment: &Fragment,
        seed: u64,
    ) -> String {
        let tone = fragment.tone;
        let descriptors = intensity_descriptors(tone, primary.classification.intensity)
            .unwrap_or_else(|| tone_descriptors(tone));

        let descriptor = self
            .engine
            .pick(state, &format!("descriptor/{area}/{tone}"), descriptors, seed)
            .unwrap_or_default();
        let focus = self
            .engine
            .pick(state, &format!("focus/{area}"), area_focus(area), seed.rotate_left(16))
            .unwrap_or_default();

        let mut values = RenderValues::new(descriptor, focus);
        if fragment.text.contains("{phrase}") {
            if let Some(phrase) = self.engine.pick(
                state,
                &format!("phrase/{area}/{tone}"),
                action_phrases(area, tone),
                seed.rotate_left(32),
            ) {
                values = values.with_phrase(phrase);
            }
        }

        render(&fragment.text, &values, &fragment.requirements)
    }
}

impl Default for NarrativeAssembler {
    fn default() -> Self {
        Self::with_defaults()
    }
}

fn is_near_empty(paragraph: &str) -> bool {
    paragraph
        .split_whitespace()
        .filter(|w| w.chars().any(char::is_alphabetic))
        .count()
        < MIN_PARAGRAPH_WORDS
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::archetype::ArchetypeRouter;
    use astro_rules::{Aspect, Body, Event, GuardrailConfig, Scorer};
    use chrono::NaiveDate;

    fn classify(transit: Body, aspect: Aspect, natal: Body, orb: f64) -> ClassifiedEvent {
        let date = NaiveDate::from_ymd_opt(2025, 3, 14).unwrap();
        let event = Scorer::default().apply(Event::new(date, transit, natal, aspect, orb));
        ArchetypeRouter::with_defaults().classify_all(&[event]).remove(0)
    }

    #[test]
    fn test_compose_is_deterministic() {
        let assembler = NarrativeAssembler::with_defaults();
        let item = classify(Body::Mars, Aspect::Trine, Body::Chiron, 0.03);
        let a = assembler.compose(&mut VariationState::new(4), Area::Health, &item, None);
        let b = assembler.compose(&mut VariationState::new(4), Area::Health, &item, None);
        assert_eq!(a, b);
        assert!(a.contains("Mars flows with your Chiron"));
        assert!(a.ends_with("not medical advice."));
    }

    #[test]
    fn test_compose_has_no_leftover_placeholders() {
        let assembler = NarrativeAssembler::with_defaults();
        let mut state = VariationState::new(4);
        for area in Area::ALL {
            let item = classify(Body::Saturn, Aspect::Square, Body::Venus, 1.0);
            let text = assembler.compose(&mut state, area, &item, None);
            assert!(!text.contains('{') && !text.contains('}'), "{text}");
            assert!(text.split_whitespace().count() >= MIN_PARAGRAPH_WORDS);
        }
    }

    #[test]
    fn test_supporting_event_cited() {
        let assembler = NarrativeAssembler::with_defaults();
        let primary = classify(Body::Saturn, Aspect::Square, Body::Venus, 1.0);
        let supporting = classify(Body::Jupiter, Aspect::Sextile, Body::Moon, 2.0);
        let text = assembler.compose(&mut VariationState::new(4), Area::Love, &primary, Some(&supporting));
        assert!(text.contains("Jupiter supports your Moon"), "{text}");
    }

    #[test]
    fn test_challenging_event_gets_avoid_bullets() {
        let assembler = NarrativeAssembler::with_defaults();
        let item = classify(Body::Saturn, Aspect::Square, Body::Venus, 1.0);
        let bullets = assembler.bullets(&mut VariationState::new(4), Area::Career, &item);
        assert!(bullets.do_bullets.is_empty());
        assert!(!bullets.avoid_bullets.is_empty());
        for bullet in &bullets.avoid_bullets {
            assert!(!bullet.ends_with('.'));
            assert!(bullet.chars().count() <= crate::polish::MAX_BULLET_CHARS);
        }
    }

    #[test]
    fn test_supportive_event_gets_do_bullets() {
        let assembler = NarrativeAssembler::with_defaults();
        let item = classify(Body::Jupiter, Aspect::Trine, Body::Sun, 0.5);
        let bullets = assembler.bullets(&mut VariationState::new(4), Area::Finance, &item);
        assert!(!bullets.do_bullets.is_empty());
        assert!(bullets.avoid_bullets.is_empty());
    }

    #[test]
    fn test_generated_text_is_polished_and_guarded() {
        let assembler = NarrativeAssembler::with_defaults();
        let item = classify(Body::Venus, Aspect::Trine, Body::Moon, 1.0);
        let text = assembler.accept_generated(
            &mut VariationState::new(4),
            Area::Finance,
            &item,
            None,
            Ok("As an AI, I think so. Money flows well today!! A guaranteed windfall awaits. Review your budget with care this week.".to_string()),
        );
        assert!(!text.contains("As an AI"));
        assert!(!text.contains("guaranteed"));
        assert!(text.contains("Money flows well today!"));
        assert!(text.ends_with("not financial advice."));
    }

    #[test]
    fn test_generator_failure_falls_back_to_templates() {
        let assembler = NarrativeAssembler::with_defaults();
        let item = classify(Body::Venus, Aspect::Trine, Body::Moon, 1.0);
        let mut state = VariationState::new(4);
        let fallback = assembler.accept_generated(
            &mut state,
            Area::Love,
            &item,
            None,
            Err(GeneratorError::Unavailable("timeout".to_string())),
        );
        let templated = assembler.compose(&mut VariationState::new(4), Area::Love, &item, None);
        assert_eq!(fallback, templated);
    }

    #[test]
    fn test_generic_prose_respects_guardrails() {
        let assembler = NarrativeAssembler::with_defaults().with_guardrails(Guardrails::standard(GuardrailConfig {
            disclaimers: false,
            ..Default::default()
        }));
        let text = assembler.compose_generic(Area::Health, Tone::Neutral);
        assert!(text.starts_with("Your wellbeing moves at an even pace"));
        assert!(!text.contains("medical advice"));
    }
}
