//! Reading mechanics: aspects, polarity, tone, intensity, life areas and template slots.

mod bodies;
mod motion;

pub use bodies::*;
pub use motion::*;

use serde::{Deserialize, Serialize};

/// Geometric relationship between a transiting body and a natal point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Aspect {
    Conjunction,
    Opposition,
    Square,
    Trine,
    Sextile,
    Quincunx,
}

impl Aspect {
    pub const ALL: [Aspect; 6] = [
        Aspect::Conjunction,
        Aspect::Opposition,
        Aspect::Square,
        Aspect::Trine,
        Aspect::Sextile,
        Aspect::Quincunx,
    ];

    /// Parse an aspect name as the transit layer spells it (case-insensitive).
    pub fn parse(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "conjunction" | "conj" => Some(Aspect::Conjunction),
            "opposition" | "opp" => Some(Aspect::Opposition),
            "square" | "sq" => Some(Aspect::Square),
            "trine" => Some(Aspect::Trine),
            "sextile" => Some(Aspect::Sextile),
            "quincunx" | "inconjunct" => Some(Aspect::Quincunx),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Aspect::Conjunction => "conjunction",
            Aspect::Opposition => "opposition",
            Aspect::Square => "square",
            Aspect::Trine => "trine",
            Aspect::Sextile => "sextile",
            Aspect::Quincunx => "quincunx",
        }
    }

    /// Exact angle of the aspect in degrees.
    pub fn angle(&self) -> f64 {
        match self {
            Aspect::Conjunction => 0.0,
            Aspect::Opposition => 180.0,
            Aspect::Square => 90.0,
            Aspect::Trine => 120.0,
            Aspect::Sextile => 60.0,
            Aspect::Quincunx => 150.0,
        }
    }

    /// Signed base weight used by the scorer.
    ///
    /// Negative means supportive, positive means challenging.
    pub fn default_weight(&self) -> f64 {
        match self {
            Aspect::Conjunction => 0.6,
            Aspect::Opposition => 1.6,
            Aspect::Square => 1.4,
            Aspect::Trine => -1.0,
            Aspect::Sextile => -0.8,
            Aspect::Quincunx => 0.8,
        }
    }

    /// Widest orb (degrees) at which the aspect still counts.
    pub fn default_orb_limit(&self) -> f64 {
        match self {
            Aspect::Conjunction => 8.0,
            Aspect::Opposition => 8.0,
            Aspect::Square => 6.0,
            Aspect::Trine => 6.0,
            Aspect::Sextile => 4.0,
            Aspect::Quincunx => 3.0,
        }
    }

    pub fn family(&self) -> AspectFamily {
        match self {
            Aspect::Trine | Aspect::Sextile => AspectFamily::Harmonious,
            Aspect::Square | Aspect::Opposition => AspectFamily::Hard,
            Aspect::Conjunction => AspectFamily::Blending,
            Aspect::Quincunx => AspectFamily::Adjusting,
        }
    }

    /// Polarity implied by the aspect alone.
    pub fn polarity(&self) -> Polarity {
        if self.default_weight() < 0.0 {
            Polarity::Supportive
        } else {
            Polarity::Challenging
        }
    }
}

impl std::fmt::Display for Aspect {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Coarse grouping of aspects used by routing predicates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AspectFamily {
    /// Trine, sextile.
    Harmonious,
    /// Square, opposition.
    Hard,
    /// Conjunction.
    Blending,
    /// Quincunx.
    Adjusting,
}

/// Direction of an event's influence, read from the sign of its score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Polarity {
    Supportive,
    Challenging,
    Neutral,
}

impl Polarity {
    /// Classify a signed score. Scores inside `neutral_band` read as neutral.
    pub fn from_score(score: f64, neutral_band: f64) -> Self {
        if score.abs() < neutral_band {
            Polarity::Neutral
        } else if score < 0.0 {
            Polarity::Supportive
        } else {
            Polarity::Challenging
        }
    }

    /// The tone a reading of this polarity naturally takes.
    pub fn tone(&self) -> Tone {
        match self {
            Polarity::Supportive => Tone::Support,
            Polarity::Challenging => Tone::Challenge,
            Polarity::Neutral => Tone::Neutral,
        }
    }
}

/// Narrative tone of a fragment or classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Tone {
    Support,
    Challenge,
    Neutral,
}

impl Tone {
    pub const ALL: [Tone; 3] = [Tone::Support, Tone::Challenge, Tone::Neutral];

    pub fn as_str(&self) -> &'static str {
        match self {
            Tone::Support => "support",
            Tone::Challenge => "challenge",
            Tone::Neutral => "neutral",
        }
    }

    pub fn parse(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "support" | "supportive" => Some(Tone::Support),
            "challenge" | "challenging" => Some(Tone::Challenge),
            "neutral" => Some(Tone::Neutral),
            _ => None,
        }
    }
}

impl std::fmt::Display for Tone {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How loudly an event should be narrated, from quietest to loudest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Intensity {
    Background,
    Gentle,
    Momentum,
    Major,
    Strong,
}

impl Intensity {
    pub const ALL: [Intensity; 5] = [
        Intensity::Background,
        Intensity::Gentle,
        Intensity::Momentum,
        Intensity::Major,
        Intensity::Strong,
    ];

    pub fn index(&self) -> i32 {
        match self {
            Intensity::Background => 0,
            Intensity::Gentle => 1,
            Intensity::Momentum => 2,
            Intensity::Major => 3,
            Intensity::Strong => 4,
        }
    }

    /// Move up or down the scale, clamped to the defined levels.
    pub fn shift(self, steps: i32) -> Self {
        let target = (self.index() + steps).clamp(0, Self::ALL.len() as i32 - 1);
        Self::ALL[target as usize]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Intensity::Background => "background",
            Intensity::Gentle => "gentle",
            Intensity::Momentum => "momentum",
            Intensity::Major => "major",
            Intensity::Strong => "strong",
        }
    }
}

/// Life area a paragraph is written for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Area {
    Career,
    Love,
    Health,
    Finance,
    General,
}

impl Area {
    pub const ALL: [Area; 5] = [
        Area::Career,
        Area::Love,
        Area::Health,
        Area::Finance,
        Area::General,
    ];

    /// The areas that get their own relevance scoring (everything except general).
    pub const FOCUSED: [Area; 4] = [Area::Career, Area::Love, Area::Health, Area::Finance];

    pub fn as_str(&self) -> &'static str {
        match self {
            Area::Career => "career",
            Area::Love => "love",
            Area::Health => "health",
            Area::Finance => "finance",
            Area::General => "general",
        }
    }

    pub fn parse(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "career" | "work" => Some(Area::Career),
            "love" | "relationships" => Some(Area::Love),
            "health" | "wellness" => Some(Area::Health),
            "finance" | "money" | "finances" => Some(Area::Finance),
            "general" => Some(Area::General),
            _ => None,
        }
    }

    /// Heading shown by the rendering layer.
    pub fn title(&self) -> &'static str {
        match self {
            Area::Career => "Career & Growth",
            Area::Love => "Love & Relationships",
            Area::Health => "Health & Energy",
            Area::Finance => "Money & Resources",
            Area::General => "Overall Outlook",
        }
    }
}

impl std::fmt::Display for Area {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Position a template fragment fills in a paragraph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Slot {
    Opener,
    Coaching,
    Closer,
    Bullet,
}

impl Slot {
    pub const ALL: [Slot; 4] = [Slot::Opener, Slot::Coaching, Slot::Closer, Slot::Bullet];

    /// Accepts singular and plural section names ("openers", "closing").
    pub fn parse(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "opener" | "openers" | "opening" => Some(Slot::Opener),
            "coaching" | "coach" => Some(Slot::Coaching),
            "closer" | "closers" | "closing" => Some(Slot::Closer),
            "bullet" | "bullets" => Some(Slot::Bullet),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Slot::Opener => "opener",
            Slot::Coaching => "coaching",
            Slot::Closer => "closer",
            Slot::Bullet => "bullet",
        }
    }
}

/// Angular, succedent or cadent grouping of the twelve houses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HouseFamily {
    Angular,
    Succedent,
    Cadent,
}

impl HouseFamily {
    /// Family of a house number. Returns `None` outside 1..=12.
    pub fn of(house: u8) -> Option<Self> {
        match house {
            1 | 4 | 7 | 10 => Some(HouseFamily::Angular),
            2 | 5 | 8 | 11 => Some(HouseFamily::Succedent),
            3 | 6 | 9 | 12 => Some(HouseFamily::Cadent),
            _ => None,
        }
    }
}

/// Thematic tags associated with a natal house.
pub fn house_theme_tags(house: u8) -> &'static [&'static str] {
    match house {
        1 => &["identity", "health"],
        2 => &["money", "resources"],
        3 => &["education", "communication"],
        4 => &["family", "home"],
        5 => &["joy", "creativity"],
        6 => &["health", "routine"],
        7 => &["love", "relationships"],
        8 => &["intimacy", "money"],
        9 => &["travel", "education", "spiritual"],
        10 => &["career", "public"],
        11 => &["community", "ambition"],
        12 => &["spiritual", "healing"],
        _ => &[],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_aspect_parse() {
        assert_eq!(Aspect::parse("Trine"), Some(Aspect::Trine));
        assert_eq!(Aspect::parse(" inconjunct "), Some(Aspect::Quincunx));
        assert_eq!(Aspect::parse("semi-square"), None);
    }

    #[test]
    fn test_slot_parse_accepts_section_names() {
        assert_eq!(Slot::parse("openers"), Some(Slot::Opener));
        assert_eq!(Slot::parse("Closing"), Some(Slot::Closer));
        assert_eq!(Slot::parse("coaching"), Some(Slot::Coaching));
        assert_eq!(Slot::parse("bullets"), Some(Slot::Bullet));
        assert_eq!(Slot::parse("intro"), None);
    }

    #[test]
    fn test_aspect_polarity_follows_weight_sign() {
        assert_eq!(Aspect::Trine.polarity(), Polarity::Supportive);
        assert_eq!(Aspect::Sextile.polarity(), Polarity::Supportive);
        assert_eq!(Aspect::Square.polarity(), Polarity::Challenging);
        assert_eq!(Aspect::Opposition.polarity(), Polarity::Challenging);
    }

    #[test]
    fn test_polarity_from_score() {
        assert_eq!(Polarity::from_score(-4.2, 0.5), Polarity::Supportive);
        assert_eq!(Polarity::from_score(3.1, 0.5), Polarity::Challenging);
        assert_eq!(Polarity::from_score(0.2, 0.5), Polarity::Neutral);
    }

    #[test]
    fn test_intensity_shift_clamps() {
        assert_eq!(Intensity::Background.shift(-2), Intensity::Background);
        assert_eq!(Intensity::Gentle.shift(2), Intensity::Major);
        assert_eq!(Intensity::Major.shift(5), Intensity::Strong);
        assert!(Intensity::Momentum < Intensity::Major);
    }

    #[test]
    fn test_house_family() {
        assert_eq!(HouseFamily::of(10), Some(HouseFamily::Angular));
        assert_eq!(HouseFamily::of(8), Some(HouseFamily::Succedent));
        assert_eq!(HouseFamily::of(12), Some(HouseFamily::Cadent));
        assert_eq!(HouseFamily::of(13), None);
    }
}
