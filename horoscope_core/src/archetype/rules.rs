//! Declarative routing rules.
//!
//! Each rule is a list of predicates plus a payload. Every rule whose
//! predicates all hold contributes its payload; nothing short-circuits.

use std::collections::BTreeSet;

use astro_rules::{Aspect, AspectFamily, Body, Event, HouseFamily, Phase, Polarity, Tone};

/// Facts about an event that predicates are evaluated against.
#[derive(Debug, Clone)]
pub struct RuleContext<'a> {
    pub event: &'a Event,
    pub polarity: Polarity,
    pub benefic: bool,
    pub malefic: bool,
    /// Themes from the natal point, the house and upstream focus labels.
    pub themes: &'a BTreeSet<String>,
}

/// One condition over an event.
#[derive(Debug, Clone, PartialEq)]
pub enum Predicate {
    TransitBody(Vec<Body>),
    NatalBody(Vec<Body>),
    /// Either side of the contact is one of these bodies.
    Involves(Vec<Body>),
    Aspect(Vec<Aspect>),
    AspectFamily(Vec<AspectFamily>),
    HouseFamily(HouseFamily),
    Benefic,
    Malefic,
    Polarity(Polarity),
    /// `min <= |score| < max`.
    Magnitude { min: f64, max: f64 },
    AnyTheme(Vec<String>),
    Phase(Phase),
    NatalAngle,
    Not(Box<Predicate>),
}

impl Predicate {
    pub fn any_theme(themes: &[&str]) -> Self {
        Predicate::AnyTheme(themes.iter().map(|t| t.to_string()).collect())
    }

    pub fn at_least(min: f64) -> Self {
        Predicate::Magnitude { min, max: f64::INFINITY }
    }

    pub fn not(predicate: Predicate) -> Self {
        Predicate::Not(Box::new(predicate))
    }

    pub fn matches(&self, ctx: &RuleContext<'_>) -> bool {
        let event = ctx.event;
        match self {
            Predicate::TransitBody(bodies) => bodies.contains(&event.transit_body),
            Predicate::NatalBody(bodies) => bodies.contains(&event.natal_body),
            Predicate::Involves(bodies) => {
                bodies.contains(&event.transit_body) || bodies.contains(&event.natal_body)
            }
            Predicate::Aspect(aspects) => aspects.contains(&event.aspect),
            Predicate::AspectFamily(families) => families.contains(&event.aspect.family()),
            Predicate::HouseFamily(family) => event.house_family() == Some(*family),
            Predicate::Benefic => ctx.benefic,
            Predicate::Malefic => ctx.malefic,
            Predicate::Polarity(polarity) => ctx.polarity == *polarity,
            Predicate::Magnitude { min, max } => {
                let magnitude = event.score.abs();
                magnitude >= *min && magnitude < *max
            }
            Predicate::AnyTheme(themes) => themes.iter().any(|t| ctx.themes.contains(t)),
            Predicate::Phase(phase) => event.phase == *phase,
            Predicate::NatalAngle => event.natal_body.is_angle(),
            Predicate::Not(inner) => !inner.matches(ctx),
        }
    }
}

/// A weighted vote for an archetype.
#[derive(Debug, Clone, PartialEq)]
pub struct ArchetypeVote {
    pub archetype: String,
    pub weight: f32,
}

/// A weighted vote for a tone.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ToneVote {
    pub tone: Tone,
    pub weight: f32,
}

/// A routing rule: predicates plus the payload it contributes when they all hold.
#[derive(Debug, Clone, PartialEq)]
pub struct Rule {
    pub name: String,
    pub conditions: Vec<Predicate>,
    pub archetype_vote: Option<ArchetypeVote>,
    pub tone_vote: Option<ToneVote>,
    pub intensity_bias: i32,
    pub tags: Vec<String>,
}

impl Rule {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            conditions: Vec::new(),
            archetype_vote: None,
            tone_vote: None,
            intensity_bias: 0,
            tags: Vec::new(),
        }
    }

    /// Add a predicate that must hold.
    pub fn when(mut self, predicate: Predicate) -> Self {
        self.conditions.push(predicate);
        self
    }

    /// Vote for the rule's own name as archetype.
    pub fn votes(mut self, weight: f32) -> Self {
        self.archetype_vote = Some(ArchetypeVote {
            archetype: self.name.clone(),
            weight,
        });
        self
    }

    pub fn tone(mut self, tone: Tone, weight: f32) -> Self {
        self.tone_vote = Some(ToneVote { tone, weight });
        self
    }

    pub fn bias(mut self, steps: i32) -> Self {
        self.intensity_bias = steps;
        self
    }

    pub fn tags(mut self, tags: &[&str]) -> Self {
        self.tags.extend(tags.iter().map(|t| t.to_string()));
        self
    }

    pub fn matches(&self, ctx: &RuleContext<'_>) -> bool {
        self.conditions.iter().all(|p| p.matches(ctx))
    }
}

/// Ordered rule table. Declaration order breaks ties.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RuleTable {
    rules: Vec<Rule>,
}

impl RuleTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_rule(mut self, rule: Rule) -> Self {
        self.rules.push(rule);
        self
    }

    pub fn iter(&self) -> impl Iterator<Item = &Rule> {
        self.rules.iter()
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Rules that hold for `ctx`, in declaration order.
    pub fn matching(&self, ctx: &RuleContext<'_>) -> Vec<&Rule> {
        self.rules.iter().filter(|rule| rule.matches(ctx)).collect()
    }

    /// The built-in table.
    ///
    /// Polarity baselines come first and carry the heaviest tone votes, so a
    /// supportive event can never be narrated as a challenge.
    pub fn standard() -> Self {
        use Predicate as P;

        let outer = vec![Body::Saturn, Body::Uranus, Body::Neptune, Body::Pluto];

        Self::new()
            .with_rule(
                Rule::new("supportive baseline")
                    .when(P::Polarity(Polarity::Supportive))
                    .tone(Tone::Support, 3.0)
                    .tags(&["opening"]),
            )
            .with_rule(
                Rule::new("challenging baseline")
                    .when(P::Polarity(Polarity::Challenging))
                    .tone(Tone::Challenge, 3.0)
                    .tags(&["pressure"]),
            )
            .with_rule(
                Rule::new("neutral baseline")
                    .when(P::Polarity(Polarity::Neutral))
                    .tone(Tone::Neutral, 1.0),
            )
            .with_rule(
                Rule::new("Radiant Expansion")
                    .when(P::Benefic)
                    .when(P::Polarity(Polarity::Supportive))
                    .votes(1.2)
                    .tone(Tone::Support, 1.0)
                    .tags(&["growth", "momentum"]),
            )
            .with_rule(
                Rule::new("Prosperity Build")
                    .when(P::any_theme(&["money", "resources", "career"]))
                    .when(P::not(P::Polarity(Polarity::Challenging)))
                    .votes(1.0)
                    .tone(Tone::Support, 0.5)
                    .tags(&["strategy", "stability"]),
            )
            .with_rule(
                Rule::new("Heart-Centered Calibration")
                    .when(P::any_theme(&["love", "relationships", "family", "emotions", "intimacy"]))
                    .votes(1.0)
                    .tone(Tone::Neutral, 0.5)
                    .tags(&["connection", "boundaries"]),
            )
            .with_rule(
                Rule::new("Disciplined Crossroads")
                    .when(P::Malefic)
                    .when(P::Polarity(Polarity::Challenging))
                    .votes(1.3)
                    .tone(Tone::Challenge, 1.0)
                    .bias(1)
                    .tags(&["restructure", "courage"]),
            )
            .with_rule(
                Rule::new("Visionary Alignment")
                    .when(P::any_theme(&["innovation", "spiritual", "education", "travel", "destiny"]))
                    .when(P::Polarity(Polarity::Supportive))
                    .votes(0.9)
                    .tone(Tone::Support, 0.5)
                    .tags(&["insight", "expansion"]),
            )
            .with_rule(
                Rule::new("Phoenix Reframe")
                    .when(P::any_theme(&["transform", "healing", "spiritual"]))
                    .when(P::Polarity(Polarity::Challenging))
                    .votes(1.1)
                    .tone(Tone::Challenge, 0.5)
                    .tags(&["release", "inner_work"]),
            )
            .with_rule(
                Rule::new("Healing Integration")
                    .when(P::any_theme(&["healing", "growth"]))
                    .when(P::Polarity(Polarity::Supportive))
                    .votes(1.0)
                    .tone(Tone::Support, 0.5)
                    .tags(&["integration", "recovery"]),
            )
            .with_rule(
                Rule::new("slow planet emphasis")
                    .when(P::TransitBody(outer))
                    .when(P::at_least(20.0))
                    .bias(1)
                    .tags(&["long_arc"]),
            )
            .with_rule(
                Rule::new("lunar backdrop")
                    .when(P::TransitBody(vec![Body::Moon]))
                    .bias(-1)
                    .tags(&["mood"]),
            )
            .with_rule(
                Rule::new("angle contact")
                    .when(P::NatalAngle)
                    .bias(1)
                    .tags(&["visibility"]),
            )
            .with_rule(
                Rule::new("fading transit")
                    .when(P::Phase(Phase::Separating))
                    .bias(-1),
            )
    }
}
