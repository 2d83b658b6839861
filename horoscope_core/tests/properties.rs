//! Property tests for selection and narration invariants.

use proptest::prelude::*;

use astro_rules::{Area, EventBatch, RawEvent, Scorer, Slot, Tone};
use horoscope_core::{
    ArchetypeRouter, AreaSelector, NarrativePipeline, VariationEngine, VariationState,
};

const BODIES: &[&str] = &[
    "Sun", "Moon", "Mercury", "Venus", "Mars", "Jupiter", "Saturn", "Uranus", "Neptune", "Pluto",
    "North Node", "Chiron", "Ascendant", "Midheaven", "Eris",
];

const ASPECTS: &[&str] = &["conjunction", "opposition", "square", "trine", "sextile", "quincunx"];

fn any_raw_event() -> impl Strategy<Value = RawEvent> {
    (
        prop::sample::select(BODIES),
        prop::sample::select(ASPECTS),
        prop::sample::select(BODIES),
        0.0f64..6.0,
        1u32..=28,
        prop::option::of(1i64..=12),
    )
        .prop_map(|(transit, aspect, natal, orb, day, house)| RawEvent {
            date: Some(format!("2025-02-{day:02}")),
            transit_body: Some(transit.to_string()),
            natal_body: Some(natal.to_string()),
            aspect: Some(aspect.to_string()),
            orb: Some(orb),
            natal_house: house,
            ..Default::default()
        })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    #[test]
    fn prop_no_repeat_within_window(seeds in prop::collection::vec(any::<u64>(), 2..24)) {
        // Career/support openers hold five variants, one more than the window.
        let engine = VariationEngine::with_defaults();
        let mut state = VariationState::new(4);
        let picks: Vec<String> = seeds
            .iter()
            .map(|seed| engine.select_fragment(&mut state, Area::Career, Tone::Support, Slot::Opener, *seed).text)
            .collect();

        for (i, pick) in picks.iter().enumerate() {
            let start = i.saturating_sub(4);
            prop_assert!(!picks[start..i].contains(pick));
        }
    }

    #[test]
    fn prop_narration_is_deterministic(events in prop::collection::vec(any_raw_event(), 0..8)) {
        let pipeline = NarrativePipeline::with_defaults();
        let first = pipeline.narrate(&events).unwrap();
        let second = pipeline.narrate(&events).unwrap();
        prop_assert_eq!(first, second);
    }

    #[test]
    fn prop_every_event_and_area_is_covered(events in prop::collection::vec(any_raw_event(), 1..8)) {
        let batch = EventBatch::from_raw(&events);
        let scorer = Scorer::default();
        let scored: Vec<_> = batch.events.iter().cloned().map(|e| scorer.apply(e)).collect();
        let classified = ArchetypeRouter::with_defaults().classify_all(&scored);
        let assignment = AreaSelector::with_defaults().assign_areas(&classified);
        for item in &classified {
            prop_assert!(!assignment.areas_of(item.event.id).is_empty());
        }

        let narrative = NarrativePipeline::with_defaults().narrate_batch(batch).unwrap();
        for area in Area::ALL {
            let text = narrative.area(area).unwrap();
            prop_assert!(!text.paragraph.trim().is_empty());
            prop_assert!(!text.paragraph.contains('{'), "paragraph contains unrendered placeholder brace");
            if assignment.primary(area).is_some() {
                prop_assert!(text.primary.is_some());
            }
        }
    }
}
