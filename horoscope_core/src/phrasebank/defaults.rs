//! Built-in template set.

use astro_rules::{Area, Slot, Tone};

use super::TemplateAsset;

type Pool = (Area, Tone, &'static [&'static str]);

const OPENERS: &[Pool] = &[
    (Area::Career, Tone::Support, &[
        "Work feels {descriptor} right now, especially around {focus}.",
        "This is {a:descriptor} stretch for {focus}.",
        "Professional momentum looks {descriptor}, with room to move {focus} forward.",
        "Doors around {focus} open a little wider than usual.",
        "Effort you put into {focus} tends to land well now.",
    ]),
    (Area::Career, Tone::Challenge, &[
        "Work feels {descriptor} right now, and {focus} needs careful handling.",
        "Expect {a:descriptor} stretch around {focus}.",
        "Professional demands run high, so pace {focus} with care.",
        "Pressure around {focus} asks for patience rather than speed.",
        "Progress on {focus} may feel slower than you would like.",
    ]),
    (Area::Career, Tone::Neutral, &[
        "Work moves at {a:descriptor} pace, giving you space to sort {focus}.",
        "A {descriptor} period for {focus} lets you plan without rushing.",
        "Nothing dramatic stands out at work, so tend to {focus} steadily.",
    ]),
    (Area::Love, Tone::Support, &[
        "Connection feels {descriptor}, especially with {focus}.",
        "Warmth flows more easily through {focus} now.",
        "This is {a:descriptor} time for {focus}.",
        "Small gestures carry extra meaning across {focus}.",
    ]),
    (Area::Love, Tone::Challenge, &[
        "Feelings run {descriptor}, and {focus} may need extra patience.",
        "Expect {a:descriptor} moment around {focus}.",
        "Old sensitivities can surface through {focus}.",
        "Mixed signals around {focus} call for a gentle approach.",
    ]),
    (Area::Love, Tone::Neutral, &[
        "Relationships sit in {a:descriptor} place, leaving room to tend {focus}.",
        "The emotional weather is {descriptor}, a good backdrop for {focus}.",
        "Love life moves quietly, so give {focus} steady attention.",
    ]),
    (Area::Health, Tone::Support, &[
        "Your energy feels {descriptor}, which helps {focus}.",
        "This is {a:descriptor} window for {focus}.",
        "Vitality picks up, and {focus} benefit from the lift.",
        "Your body responds well to care around {focus} now.",
    ]),
    (Area::Health, Tone::Challenge, &[
        "Energy may feel {descriptor}, so protect {focus}.",
        "Expect {a:descriptor} stretch for {focus}.",
        "Stress can pile up quietly, making {focus} more important.",
        "Your reserves need attention, starting with {focus}.",
    ]),
    (Area::Health, Tone::Neutral, &[
        "Energy runs at {a:descriptor} level, a fair moment to review {focus}.",
        "A {descriptor} phase for wellbeing keeps {focus} in view.",
        "Nothing urgent stands out, so keep {focus} consistent.",
    ]),
    (Area::Finance, Tone::Support, &[
        "Money matters look {descriptor}, especially {focus}.",
        "This is {a:descriptor} period for {focus}.",
        "Practical choices around {focus} pay off more easily now.",
        "Clarity about {focus} comes more easily than usual.",
    ]),
    (Area::Finance, Tone::Challenge, &[
        "Money matters feel {descriptor}, so handle {focus} carefully.",
        "Expect {a:descriptor} stretch for {focus}.",
        "Financial pressure can nudge you toward hasty moves with {focus}.",
        "Take a slower, steadier approach to {focus} for now.",
    ]),
    (Area::Finance, Tone::Neutral, &[
        "Finances move at {a:descriptor} pace, a good moment to check {focus}.",
        "A {descriptor} phase for money leaves room to organize {focus}.",
        "Nothing pressing shows up, so keep {focus} tidy.",
    ]),
    (Area::General, Tone::Support, &[
        "The overall mood is {descriptor}, lifting {focus}.",
        "This is {a:descriptor} period for {focus}.",
        "Things line up more easily than usual around {focus}.",
        "A helpful current runs through {focus}.",
    ]),
    (Area::General, Tone::Challenge, &[
        "The overall mood is {descriptor}, and {focus} may need patience.",
        "Expect {a:descriptor} stretch around {focus}.",
        "Friction in the background asks you to simplify {focus}.",
        "Some resistance around {focus} is likely, so pace yourself.",
    ]),
    (Area::General, Tone::Neutral, &[
        "The overall mood is {descriptor}, a fair moment to review {focus}.",
        "Things move at {a:descriptor} pace around {focus}.",
        "A quieter period leaves space to reflect on {focus}.",
    ]),
];

const COACHING: &[Pool] = &[
    (Area::Career, Tone::Support, &[
        "Make time to {phrase}.",
        "It is a good moment to {phrase}.",
        "Focus on {phrase} while the window is open.",
    ]),
    (Area::Career, Tone::Challenge, &[
        "Hold back from {phrase} until things settle.",
        "Avoid {phrase} while tension is high.",
        "Try not to {phrase} this week.",
    ]),
    (Area::Career, Tone::Neutral, &["Use the calm to {phrase}.", "Set aside an hour to {phrase}."]),
    (Area::Love, Tone::Support, &[
        "Make room to {phrase}.",
        "It is a good moment to {phrase}.",
        "Focus on {phrase} and let warmth do the rest.",
    ]),
    (Area::Love, Tone::Challenge, &[
        "Hold back from {phrase} until feelings cool.",
        "Avoid {phrase} while emotions run high.",
        "Try not to {phrase} right now.",
    ]),
    (Area::Love, Tone::Neutral, &["Use the quiet to {phrase}.", "Set aside time to {phrase}."]),
    (Area::Health, Tone::Support, &[
        "Make time to {phrase}.",
        "It is a good moment to {phrase}.",
        "Focus on {phrase} to build on the lift.",
    ]),
    (Area::Health, Tone::Challenge, &[
        "Avoid {phrase} while energy is low.",
        "Hold back from {phrase} until you feel restored.",
        "Try not to {phrase} this week.",
    ]),
    (Area::Health, Tone::Neutral, &["Use the steady stretch to {phrase}.", "Plan ahead to {phrase}."]),
    (Area::Finance, Tone::Support, &[
        "Make time to {phrase}.",
        "It is a good moment to {phrase}.",
        "Focus on {phrase} while clarity is high.",
    ]),
    (Area::Finance, Tone::Challenge, &[
        "Avoid {phrase} while pressure is high.",
        "Hold back from {phrase} until the numbers are clear.",
        "Try not to {phrase} this week.",
    ]),
    (Area::Finance, Tone::Neutral, &["Use the calm to {phrase}.", "Set aside an hour to {phrase}."]),
    (Area::General, Tone::Support, &["Make time to {phrase}.", "It is a good moment to {phrase}."]),
    (Area::General, Tone::Challenge, &[
        "Avoid {phrase} while tension is high.",
        "Hold back from {phrase} until things settle.",
    ]),
    (Area::General, Tone::Neutral, &["Use the calm to {phrase}.", "Plan ahead to {phrase}."]),
];

const CLOSERS: &[Pool] = &[
    (Area::Career, Tone::Support, &[
        "Let steady effort turn this into lasting progress.",
        "Small wins now build a stronger position later.",
        "Trust the groundwork you have already laid.",
    ]),
    (Area::Career, Tone::Challenge, &[
        "Slow, deliberate moves serve you best.",
        "Patience now protects your reputation later.",
        "Clarity first, action second.",
    ]),
    (Area::Career, Tone::Neutral, &[
        "Steady attention keeps things on track.",
        "Use the quiet to set up your next step.",
    ]),
    (Area::Love, Tone::Support, &[
        "Let openness lead the way.",
        "Kindness shared now comes back to you.",
        "Enjoy the ease while it lasts.",
    ]),
    (Area::Love, Tone::Challenge, &[
        "Gentle honesty works better than pressure.",
        "Give feelings time before drawing conclusions.",
        "Patience keeps bonds intact.",
    ]),
    (Area::Love, Tone::Neutral, &[
        "Consistency speaks louder than grand gestures.",
        "Small check-ins keep connection alive.",
    ]),
    (Area::Health, Tone::Support, &[
        "Build on the momentum with simple habits.",
        "Let good routines carry you forward.",
        "Notice what helps and repeat it.",
    ]),
    (Area::Health, Tone::Challenge, &[
        "Rest counts as progress right now.",
        "Protect your energy before spending it.",
        "Go gently and listen to your body.",
    ]),
    (Area::Health, Tone::Neutral, &[
        "Consistency matters more than intensity.",
        "Small adjustments add up over time.",
    ]),
    (Area::Finance, Tone::Support, &[
        "Let careful choices compound.",
        "Steady habits turn this into lasting security.",
        "Keep decisions grounded and practical.",
    ]),
    (Area::Finance, Tone::Challenge, &[
        "Sleep on big decisions before you commit.",
        "Caution now saves stress later.",
        "Clarity first, spending second.",
    ]),
    (Area::Finance, Tone::Neutral, &[
        "Routine reviews keep surprises small.",
        "Keep things simple and organized.",
    ]),
    (Area::General, Tone::Support, &[
        "Let good momentum carry you forward.",
        "Say yes to what feels aligned.",
    ]),
    (Area::General, Tone::Challenge, &[
        "Steady effort will see you through.",
        "Take things one step at a time.",
    ]),
    (Area::General, Tone::Neutral, &[
        "Keep things simple and steady.",
        "Trust your own pace.",
    ]),
];

const BULLETS: &[Pool] = &[
    (Area::General, Tone::Support, &[
        "Make room to {phrase}",
        "Focus on {phrase}",
        "Set aside time to {phrase}",
    ]),
    (Area::General, Tone::Challenge, &[
        "Avoid {phrase} while tension is high",
        "Hold back from {phrase} until things settle",
        "Try not to {phrase}",
    ]),
    (Area::General, Tone::Neutral, &[
        "Set aside time to {phrase}",
        "Plan ahead to {phrase}",
        "Focus on {phrase}",
    ]),
];

fn assets_for(slot: Slot, pools: &[Pool]) -> impl Iterator<Item = TemplateAsset> + '_ {
    pools.iter().map(move |(area, tone, variants)| {
        let name = format!("{}-{}-{}", area, tone, slot.as_str());
        TemplateAsset::new(name, *area, *tone, slot).with_variants(variants.iter().copied())
    })
}

/// Every built-in asset.
pub fn standard_assets() -> Vec<TemplateAsset> {
    assets_for(Slot::Opener, OPENERS)
        .chain(assets_for(Slot::Coaching, COACHING))
        .chain(assets_for(Slot::Closer, CLOSERS))
        .chain(assets_for(Slot::Bullet, BULLETS))
        .collect()
}

fn area_subject(area: Area) -> &'static str {
    match area {
        Area::Career => "Work",
        Area::Love => "Your love life",
        Area::Health => "Your wellbeing",
        Area::Finance => "Money",
        Area::General => "The day",
    }
}

/// Last-resort sentence when no asset resolves.
pub fn generic_sentence(area: Area, tone: Tone, slot: Slot) -> String {
    let subject = area_subject(area);
    match (slot, tone) {
        (Slot::Opener, Tone::Support) => format!("{subject} has quiet support right now."),
        (Slot::Opener, Tone::Challenge) => format!("{subject} asks for patience right now."),
        (Slot::Opener, Tone::Neutral) => format!("{subject} moves at an even pace right now."),
        (Slot::Coaching, _) => "Take one small, practical step.".to_string(),
        (Slot::Closer, Tone::Support) => "Let good momentum carry you.".to_string(),
        (Slot::Closer, Tone::Challenge) => "Steady effort will see you through.".to_string(),
        (Slot::Closer, Tone::Neutral) => "Keep things simple and steady.".to_string(),
        (Slot::Bullet, Tone::Challenge) => "Pause before reacting".to_string(),
        (Slot::Bullet, _) => "Take one small, practical step".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_area_and_tone_has_paragraph_slots() {
        let assets = standard_assets();
        for area in Area::ALL {
            for tone in Tone::ALL {
                for slot in [Slot::Opener, Slot::Coaching, Slot::Closer] {
                    assert!(
                        assets
                            .iter()
                            .any(|a| a.area == area && a.tone == tone && a.slot == slot),
                        "{area}/{tone}/{}",
                        slot.as_str()
                    );
                }
            }
        }
    }

    #[test]
    fn test_all_assets_validate() {
        for asset in standard_assets() {
            assert!(asset.validate().is_ok(), "{}", asset.name);
        }
    }

    #[test]
    fn test_generic_sentences_are_non_empty() {
        for area in Area::ALL {
            for tone in Tone::ALL {
                for slot in Slot::ALL {
                    assert!(!generic_sentence(area, tone, slot).trim().is_empty());
                }
            }
        }
    }
}
