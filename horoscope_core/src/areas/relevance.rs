//! Relevance tables: which houses, bodies, focus labels and themes point at which area.

use astro_rules::{Area, Aspect, Body, Intensity};
use serde::{Deserialize, Serialize};

/// Where a piece of area relevance came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Source {
    /// Natal house is one of the area's primary houses.
    House,
    /// Natal house is on the area's fallback list.
    FallbackHouse,
    /// Upstream focus label names the area.
    Focus,
    /// Transit or natal body is associated with the area.
    Body,
    /// A classification theme maps to the area.
    Classification,
    /// Every event is relevant to the general outlook.
    General,
}

impl Source {
    /// Label used in candidate summaries.
    pub fn as_str(&self) -> &'static str {
        match self {
            Source::House => "house",
            Source::FallbackHouse => "house:fallback",
            Source::Focus => "focus",
            Source::Body => "body",
            Source::Classification => "classification",
            Source::General => "general",
        }
    }
}

/// Weight of one contribution from `source` toward `area`.
///
/// Fallback houses count half of a primary house match.
pub fn source_weight(area: Area, source: Source) -> f64 {
    let (house, focus, body, classification) = match area {
        Area::Career => (1.35, 1.9, 0.95, 1.05),
        Area::Love => (1.25, 1.75, 0.9, 1.1),
        Area::Health => (1.4, 1.6, 1.0, 0.95),
        Area::Finance => (1.3, 1.7, 0.95, 1.05),
        Area::General => (1.0, 1.0, 0.5, 0.5),
    };
    match source {
        Source::House => house,
        Source::FallbackHouse => house * 0.5,
        Source::Focus => focus,
        Source::Body => body,
        Source::Classification => classification,
        Source::General => 1.0,
    }
}

/// Areas a natal house speaks to directly.
pub fn house_areas(house: u8) -> &'static [Area] {
    match house {
        1 => &[Area::Health, Area::Career],
        2 => &[Area::Finance, Area::Career],
        3 => &[Area::Career, Area::Health],
        4 => &[Area::Love, Area::Health],
        5 => &[Area::Love, Area::Career],
        6 => &[Area::Health, Area::Career],
        7 => &[Area::Love, Area::Finance],
        8 => &[Area::Finance, Area::Love],
        9 => &[Area::Career, Area::Love],
        10 => &[Area::Career, Area::Finance],
        11 => &[Area::Career, Area::Finance],
        12 => &[Area::Health],
        _ => &[],
    }
}

/// Houses an area accepts as a weaker match, strongest first.
pub fn fallback_houses(area: Area) -> &'static [u8] {
    match area {
        Area::Career => &[10, 6, 11, 2, 9, 1],
        Area::Love => &[7, 5, 11, 4, 8],
        Area::Health => &[6, 1, 12, 3, 2],
        Area::Finance => &[2, 8, 10, 11, 5],
        Area::General => &[],
    }
}

/// Areas a planet or point is traditionally tied to. Unknown bodies have none.
pub fn body_areas(body: &Body) -> &'static [Area] {
    match body {
        Body::Sun => &[Area::Career],
        Body::Moon => &[Area::Love, Area::Health],
        Body::Mercury => &[Area::Career, Area::Finance],
        Body::Venus => &[Area::Love, Area::Finance],
        Body::Mars => &[Area::Career, Area::Health],
        Body::Jupiter => &[Area::Career, Area::Finance],
        Body::Saturn => &[Area::Career, Area::Finance],
        Body::Uranus => &[Area::Career, Area::Love],
        Body::Neptune => &[Area::Love],
        Body::Pluto => &[Area::Career, Area::Finance, Area::Love],
        Body::Chiron => &[Area::Health, Area::Love],
        Body::TrueNode => &[Area::Career],
        Body::Midheaven => &[Area::Career],
        Body::Ascendant => &[Area::Health, Area::Career],
        Body::Descendant => &[Area::Love],
        Body::ImumCoeli => &[Area::Love],
        Body::Other(_) => &[],
    }
}

/// Area named by a free-text focus label, matched by keyword.
pub fn focus_area(label: &str) -> Option<Area> {
    const KEYWORDS: &[(&str, Area)] = &[
        ("career", Area::Career),
        ("work", Area::Career),
        ("ambition", Area::Career),
        ("purpose", Area::Career),
        ("calling", Area::Career),
        ("mission", Area::Career),
        ("relationship", Area::Love),
        ("partner", Area::Love),
        ("love", Area::Love),
        ("heart", Area::Love),
        ("family", Area::Love),
        ("romance", Area::Love),
        ("health", Area::Health),
        ("wellness", Area::Health),
        ("body", Area::Health),
        ("vitality", Area::Health),
        ("routine", Area::Health),
        ("ritual", Area::Health),
        ("financ", Area::Finance),
        ("money", Area::Finance),
        ("resources", Area::Finance),
        ("abundance", Area::Finance),
        ("wealth", Area::Finance),
        ("budget", Area::Finance),
    ];
    let lowered = label.trim().to_ascii_lowercase();
    KEYWORDS
        .iter()
        .find(|(keyword, _)| lowered.contains(keyword))
        .map(|(_, area)| *area)
}

/// Area a classification theme belongs to.
pub fn theme_area(theme: &str) -> Option<Area> {
    match theme {
        "career" | "ambition" | "work" | "discipline" | "strategy" | "planning" | "leadership"
        | "visibility" | "public" | "restructure" => Some(Area::Career),
        "love" | "relationships" | "family" | "connection" | "intimacy" | "empathy"
        | "boundaries" => Some(Area::Love),
        "healing" | "health" | "routine" | "vitality" | "body" | "momentum" | "recovery" => {
            Some(Area::Health)
        }
        "money" | "resources" | "stability" | "structure" => Some(Area::Finance),
        _ => None,
    }
}

/// Areas an empty area may borrow from, in preference order.
pub fn donors(area: Area) -> &'static [Area] {
    match area {
        Area::Career => &[Area::Finance, Area::General],
        Area::Love => &[Area::Health, Area::General],
        Area::Health => &[Area::Love, Area::General],
        Area::Finance => &[Area::Career, Area::General],
        Area::General => &[],
    }
}

/// How much an aspect counts toward raw strength.
pub fn aspect_strength_weight(aspect: Aspect) -> f64 {
    match aspect {
        Aspect::Conjunction => 1.2,
        Aspect::Square | Aspect::Opposition => 1.0,
        Aspect::Trine => 0.85,
        Aspect::Sextile => 0.75,
        Aspect::Quincunx => 0.65,
    }
}

pub fn intensity_multiplier(intensity: Intensity) -> f64 {
    match intensity {
        Intensity::Background => 0.6,
        Intensity::Gentle => 0.85,
        Intensity::Momentum => 1.0,
        Intensity::Major => 1.25,
        Intensity::Strong => 1.5,
    }
}
