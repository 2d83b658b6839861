//! Prompt contract for external text generators.
//!
//! The core never talks to a model itself. It hands a [`NarrativePrompt`] to
//! whatever implements [`NarrativeGenerator`] and treats the answer as
//! untrusted text.

use astro_rules::{Area, Tone};
use serde::{Deserialize, Serialize};

use crate::archetype::ClassifiedEvent;
use crate::error::GeneratorError;
use crate::evidence::EventTokens;

/// Plain description of one event for the prompt.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventBrief {
    pub label: String,
    pub date: String,
    pub archetype: String,
    pub tone: Tone,
    pub evidence: Option<String>,
    pub themes: Vec<String>,
}

impl From<&ClassifiedEvent> for EventBrief {
    fn from(item: &ClassifiedEvent) -> Self {
        Self {
            label: item.event.label(),
            date: item.event.date.to_string(),
            archetype: item.classification.archetype.clone(),
            tone: item.classification.tone,
            evidence: EventTokens::from_event(&item.event).phrase(),
            themes: item.classification.themes().map(str::to_string).collect(),
        }
    }
}

/// Everything a generator needs to write one area paragraph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NarrativePrompt {
    pub area: Area,
    pub tone: Tone,
    /// Archetype of the primary event.
    pub theme: String,
    pub events: Vec<EventBrief>,
    pub max_sentences: usize,
    pub max_sentence_words: usize,
}

impl NarrativePrompt {
    pub fn new(area: Area, tone: Tone, theme: impl Into<String>) -> Self {
        Self {
            area,
            tone,
            theme: theme.into(),
            events: Vec::new(),
            max_sentences: 4,
            max_sentence_words: 28,
        }
    }

    pub fn for_events(area: Area, primary: &ClassifiedEvent, supporting: Option<&ClassifiedEvent>) -> Self {
        let mut prompt = Self::new(
            area,
            primary.classification.tone,
            primary.classification.archetype.clone(),
        )
        .with_event(EventBrief::from(primary));
        if let Some(supporting) = supporting {
            prompt = prompt.with_event(EventBrief::from(supporting));
        }
        prompt
    }

    pub fn with_event(mut self, brief: EventBrief) -> Self {
        self.events.push(brief);
        self
    }

    pub fn with_limits(mut self, max_sentences: usize, max_sentence_words: usize) -> Self {
        self.max_sentences = max_sentences;
        self.max_sentence_words = max_sentence_words;
        self
    }

    /// Format for a text model.
    pub fn to_prompt_string(&self) -> String {
        let mut prompt = String::new();

        prompt.push_str("## Area\n");
        prompt.push_str(&format!("{} ({})\n\n", self.area.title(), self.area.as_str()));

        prompt.push_str("## Tone\n");
        prompt.push_str(&format!("{}, theme: {}\n\n", self.tone, self.theme));

        if !self.events.is_empty() {
            prompt.push_str("## Transits\n");
            for (i, event) in self.events.iter().enumerate() {
                let role = if i == 0 { "primary" } else { "supporting" };
                prompt.push_str(&format!(
                    "- {} on {} ({}, {}, {})",
                    event.label, event.date, role, event.archetype, event.tone
                ));
                if let Some(evidence) = &event.evidence {
                    prompt.push_str(&format!(": {evidence}"));
                }
                if !event.themes.is_empty() {
                    prompt.push_str(&format!(" [themes: {}]", event.themes.join(", ")));
                }
                prompt.push('\n');
            }
            prompt.push('\n');
        }

        prompt.push_str("## Instructions\n");
        prompt.push_str(&format!(
            "Write at most {} sentences of plain prose, each under {} words. \
             Name the primary transit once. No lists, headings or disclaimers.\n",
            self.max_sentences, self.max_sentence_words
        ));

        prompt
    }
}

/// Anything that can turn a prompt into free text.
pub trait NarrativeGenerator {
    fn generate(&self, prompt: &NarrativePrompt) -> Result<String, GeneratorError>;
}

impl<F> NarrativeGenerator for F
where
    F: Fn(&NarrativePrompt) -> Result<String, GeneratorError>,
{
    fn generate(&self, prompt: &NarrativePrompt) -> Result<String, GeneratorError> {
        self(prompt)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::archetype::ArchetypeRouter;
    use astro_rules::{Aspect, Body, Event, Scorer};
    use chrono::NaiveDate;

    fn classified() -> ClassifiedEvent {
        let date = NaiveDate::from_ymd_opt(2025, 3, 14).unwrap();
        let event = Scorer::default().apply(
            Event::new(date, Body::Saturn, Body::Venus, Aspect::Square, 1.0).with_house(7),
        );
        ArchetypeRouter::with_defaults()
            .classify_all(&[event])
            .remove(0)
    }

    #[test]
    fn test_prompt_string_sections() {
        let item = classified();
        let prompt = NarrativePrompt::for_events(Area::Love, &item, None).to_prompt_string();
        assert!(prompt.contains("## Area\nLove & Relationships (love)"));
        assert!(prompt.contains("Saturn square Venus on 2025-03-14 (primary"));
        assert!(prompt.contains("in the 7th house"));
        assert!(prompt.contains("## Instructions"));
    }

    #[test]
    fn test_closure_generator() {
        let generator = |p: &NarrativePrompt| -> Result<String, GeneratorError> { Ok(format!("{} text", p.area)) };
        let prompt = NarrativePrompt::new(Area::Career, Tone::Neutral, "steady");
        assert_eq!(generator.generate(&prompt).unwrap(), "career text");
    }
}
