//! Celestial bodies and chart points.

use serde::{Deserialize, Serialize};

/// A transiting body or natal point.
///
/// Names the transit layer sends that we do not recognize are kept verbatim in
/// [`Body::Other`] and get default weights everywhere.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Body {
    Sun,
    Moon,
    Mercury,
    Venus,
    Mars,
    Jupiter,
    Saturn,
    Uranus,
    Neptune,
    Pluto,
    TrueNode,
    Chiron,
    Ascendant,
    Midheaven,
    Descendant,
    ImumCoeli,
    Other(String),
}

/// Traditional benefic/malefic standing of a body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Dignity {
    Benefic,
    Malefic,
    Neutral,
}

impl Body {
    /// Parse a body name. Never fails: unknown names become [`Body::Other`].
    pub fn parse(name: &str) -> Self {
        let trimmed = name.trim();
        let key: String = trimmed
            .chars()
            .filter(|c| !c.is_whitespace() && *c != '_' && *c != '-')
            .collect::<String>()
            .to_ascii_lowercase();
        match key.as_str() {
            "sun" => Body::Sun,
            "moon" => Body::Moon,
            "mercury" => Body::Mercury,
            "venus" => Body::Venus,
            "mars" => Body::Mars,
            "jupiter" => Body::Jupiter,
            "saturn" => Body::Saturn,
            "uranus" => Body::Uranus,
            "neptune" => Body::Neptune,
            "pluto" => Body::Pluto,
            "truenode" | "northnode" | "node" => Body::TrueNode,
            "chiron" => Body::Chiron,
            "ascendant" | "asc" => Body::Ascendant,
            "midheaven" | "mc" => Body::Midheaven,
            "descendant" | "dsc" => Body::Descendant,
            "ic" | "imumcoeli" => Body::ImumCoeli,
            _ => Body::Other(trimmed.to_string()),
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Body::Sun => "Sun",
            Body::Moon => "Moon",
            Body::Mercury => "Mercury",
            Body::Venus => "Venus",
            Body::Mars => "Mars",
            Body::Jupiter => "Jupiter",
            Body::Saturn => "Saturn",
            Body::Uranus => "Uranus",
            Body::Neptune => "Neptune",
            Body::Pluto => "Pluto",
            Body::TrueNode => "North Node",
            Body::Chiron => "Chiron",
            Body::Ascendant => "Ascendant",
            Body::Midheaven => "Midheaven",
            Body::Descendant => "Descendant",
            Body::ImumCoeli => "IC",
            Body::Other(name) => name,
        }
    }

    pub fn is_known(&self) -> bool {
        !matches!(self, Body::Other(_))
    }

    /// Chart angles rather than bodies.
    pub fn is_angle(&self) -> bool {
        matches!(
            self,
            Body::Ascendant | Body::Midheaven | Body::Descendant | Body::ImumCoeli
        )
    }

    pub fn dignity(&self) -> Dignity {
        match self {
            Body::Jupiter | Body::Venus | Body::Sun | Body::Moon => Dignity::Benefic,
            Body::Mars | Body::Saturn | Body::Pluto => Dignity::Malefic,
            _ => Dignity::Neutral,
        }
    }

    /// Positive weight used by the scorer when the config has no override.
    pub fn default_weight(&self) -> f64 {
        match self {
            Body::Saturn | Body::Uranus | Body::Neptune | Body::Pluto => 3.0,
            Body::Jupiter | Body::Mars => 2.0,
            Body::Moon => 0.5,
            _ => 1.0,
        }
    }

    /// Thematic tags associated with this body as a natal point.
    pub fn theme_tags(&self) -> &'static [&'static str] {
        match self {
            Body::Sun => &["career", "vitality"],
            Body::Moon => &["emotions", "family"],
            Body::Mercury => &["education", "career"],
            Body::Venus => &["love", "money"],
            Body::Mars => &["career", "health"],
            Body::Jupiter => &["education", "spiritual", "growth"],
            Body::Saturn => &["discipline", "career"],
            Body::Uranus => &["innovation", "travel"],
            Body::Neptune => &["spiritual"],
            Body::Pluto => &["transform"],
            Body::Chiron => &["healing", "growth"],
            Body::TrueNode => &["spiritual", "destiny"],
            Body::Midheaven => &["career"],
            Body::Ascendant => &["identity", "health"],
            Body::Descendant => &["relationships"],
            Body::ImumCoeli => &["family", "home"],
            Body::Other(_) => &[],
        }
    }
}

impl From<String> for Body {
    fn from(name: String) -> Self {
        Body::parse(&name)
    }
}

impl From<Body> for String {
    fn from(body: Body) -> Self {
        match body {
            Body::TrueNode => "TrueNode".to_string(),
            other => other.name().to_string(),
        }
    }
}

impl std::fmt::Display for Body {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_known_and_unknown() {
        assert_eq!(Body::parse("saturn"), Body::Saturn);
        assert_eq!(Body::parse("True Node"), Body::TrueNode);
        assert_eq!(Body::parse("MC"), Body::Midheaven);
        assert_eq!(Body::parse(" Eris "), Body::Other("Eris".to_string()));
    }

    #[test]
    fn test_unknown_body_defaults() {
        let eris = Body::parse("Eris");
        assert!(!eris.is_known());
        assert_eq!(eris.dignity(), Dignity::Neutral);
        assert!((eris.default_weight() - 1.0).abs() < 0.001);
        assert!(eris.theme_tags().is_empty());
    }

    #[test]
    fn test_dignity_table() {
        assert_eq!(Body::Jupiter.dignity(), Dignity::Benefic);
        assert_eq!(Body::Mars.dignity(), Dignity::Malefic);
        assert_eq!(Body::Chiron.dignity(), Dignity::Neutral);
    }

    #[test]
    fn test_serde_as_string() {
        let json = serde_json::to_string(&Body::TrueNode).unwrap();
        assert_eq!(json, "\"TrueNode\"");
        let back: Body = serde_json::from_str("\"Chiron\"").unwrap();
        assert_eq!(back, Body::Chiron);
    }
}
