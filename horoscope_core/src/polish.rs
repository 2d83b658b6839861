//! QA polish for generated and template prose.
//!
//! Runs on every paragraph before guardrails: strips template and model
//! artifacts, swaps stock clichés for plain wording, normalizes punctuation
//! and whitespace, and makes every sentence start upper-case and end with
//! terminal punctuation.

use regex::Regex;
use std::sync::LazyLock;

/// Longest bullet, in characters.
pub const MAX_BULLET_CHARS: usize = 100;

fn compile(pattern: &str) -> Option<Regex> {
    Regex::new(pattern).ok()
}

static ARTIFACTS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r"\[[^\]]*\]",
        r"(?i)\(\s*AI[- ]generated\s*\)",
        r"(?i)\bAs an AI\b[^.!?]*[.!?]?",
        r"(?i)\bPlease note\b[^.!?]*[.!?]?",
        r"\{[^}]*\}",
        r"\b\d+(?:\.\d+)?°",
        r"(?m)^\s*#+\s*",
        r"\*\*|__",
    ]
    .iter()
    .filter_map(|p| compile(p))
    .collect()
});

static CLICHES: LazyLock<Vec<(Regex, &'static str)>> = LazyLock::new(|| {
    [
        (r"(?i)\bthe stars (?:are aligning|align)\b", "conditions line up"),
        (r"(?i)\bwritten in the stars\b", "likely"),
        (r"(?i)\bthe universe has your back\b", "support is available"),
        (r"(?i)\beverything happens for a reason\b", "there is something to learn here"),
        (r"(?i)\bcosmic energy\b", "the current mood"),
        (r"(?i)\bmanifest your dreams\b", "work toward your goals"),
        (r"(?i)\bgood vibes\b", "a positive mood"),
        (r"(?i)\bgame[- ]changer\b", "real shift"),
    ]
    .iter()
    .filter_map(|(p, r)| compile(p).map(|re| (re, *r)))
    .collect()
});

static REPEATED_BANG: LazyLock<Option<Regex>> = LazyLock::new(|| compile(r"!{2,}"));
static REPEATED_DOTS: LazyLock<Option<Regex>> = LazyLock::new(|| compile(r"(?:\.{2,}|…)"));
static REPEATED_COMMA: LazyLock<Option<Regex>> = LazyLock::new(|| compile(r",\s*,+"));
static DASH: LazyLock<Option<Regex>> = LazyLock::new(|| compile(r"\s*[—–]\s*"));
static SPACE_BEFORE_PUNCT: LazyLock<Option<Regex>> = LazyLock::new(|| compile(r"\s+([.,!?;:])"));
static PUNCT_RUN: LazyLock<Option<Regex>> = LazyLock::new(|| compile(r"([.!?])[.,;:]+"));
static LEADING_PUNCT: LazyLock<Option<Regex>> = LazyLock::new(|| compile(r"^[\s.,;:!?]+"));
static WHITESPACE: LazyLock<Option<Regex>> = LazyLock::new(|| compile(r"\s+"));
static BULLET_MARKER: LazyLock<Option<Regex>> = LazyLock::new(|| compile(r"^\s*(?:[•\-*]|\d+[.)])\s*"));

fn replace(re: &LazyLock<Option<Regex>>, text: &str, with: &str) -> String {
    match re.as_ref() {
        Some(re) => re.replace_all(text, with).into_owned(),
        None => text.to_string(),
    }
}

/// Remove bracketed notes, model disclaimers, leftover placeholders and markup.
pub fn strip_artifacts(text: &str) -> String {
    ARTIFACTS
        .iter()
        .fold(text.to_string(), |acc, re| re.replace_all(&acc, " ").into_owned())
}

pub fn replace_cliches(text: &str) -> String {
    CLICHES
        .iter()
        .fold(text.to_string(), |acc, (re, plain)| re.replace_all(&acc, *plain).into_owned())
}

/// Collapse repeated punctuation and whitespace.
pub fn collapse(text: &str) -> String {
    let text = replace(&REPEATED_BANG, text, "!");
    let text = replace(&REPEATED_DOTS, &text, ".");
    let text = replace(&REPEATED_COMMA, &text, ",");
    let text = replace(&DASH, &text, ", ");
    let text = replace(&WHITESPACE, &text, " ");
    let text = replace(&SPACE_BEFORE_PUNCT, &text, "$1");
    let text = replace(&PUNCT_RUN, &text, "$1");
    let text = replace(&LEADING_PUNCT, &text, "");
    text.trim().to_string()
}

/// Split on terminal punctuation followed by whitespace.
pub fn split_sentences(text: &str) -> Vec<String> {
    let mut sentences = Vec::new();
    let mut current = String::new();
    let mut chars = text.chars().peekable();

    while let Some(c) = chars.next() {
        current.push(c);
        let boundary = matches!(c, '.' | '!' | '?')
            && chars.peek().map_or(true, |next| next.is_whitespace());
        if boundary {
            let sentence = current.trim();
            if !sentence.is_empty() {
                sentences.push(sentence.to_string());
            }
            current.clear();
        }
    }
    let rest = current.trim();
    if !rest.is_empty() {
        sentences.push(rest.to_string());
    }
    sentences
}

pub fn capitalize_first(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Ensure a sentence ends with `.`, `!` or `?`.
pub fn ensure_terminal(sentence: &str) -> String {
    let trimmed = sentence.trim().trim_end_matches([',', ';', ':']).trim_end();
    if trimmed.is_empty() {
        return String::new();
    }
    if trimmed.ends_with(['.', '!', '?']) {
        trimmed.to_string()
    } else {
        format!("{trimmed}.")
    }
}

/// Whether a sentence carries real content (at least two words with letters).
pub fn is_substantive(sentence: &str) -> bool {
    sentence
        .split_whitespace()
        .filter(|w| w.chars().any(char::is_alphabetic))
        .count()
        >= 2
}

/// Full polish pass for paragraph prose.
pub fn polish(text: &str) -> String {
    let text = strip_artifacts(text);
    let text = replace_cliches(&text);
    let text = collapse(&text);

    split_sentences(&text)
        .iter()
        .map(|s| ensure_terminal(&capitalize_first(s)))
        .filter(|s| is_substantive(s))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Polish one bullet: no marker, no trailing period, at most
/// [`MAX_BULLET_CHARS`] characters cut at a word boundary.
pub fn polish_bullet(text: &str) -> String {
    let text = replace(&BULLET_MARKER, text, "");
    let text = collapse(&replace_cliches(&strip_artifacts(&text)));
    let mut text = text.trim_end_matches(['.', ',', ';', ':']).trim().to_string();

    if text.chars().count() > MAX_BULLET_CHARS {
        let mut cut = String::new();
        for word in text.split_whitespace() {
            let extra = if cut.is_empty() { 0 } else { 1 };
            if cut.chars().count() + extra + word.chars().count() > MAX_BULLET_CHARS {
                break;
            }
            if !cut.is_empty() {
                cut.push(' ');
            }
            cut.push_str(word);
        }
        text = cut.trim_end_matches([',', ';', ':', '.']).to_string();
    }

    capitalize_first(&text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_artifacts() {
        let text = "Work looks steady. [Note: expand later] As an AI, I cannot predict this. Rest well (AI generated).";
        let cleaned = polish(text);
        assert_eq!(cleaned, "Work looks steady. Rest well.");
    }

    #[test]
    fn test_collapse_punctuation_and_space() {
        assert_eq!(collapse("Go  slow!!  Then ,, rest ..."), "Go slow! Then, rest.");
        assert_eq!(collapse("Pause — then act"), "Pause, then act");
    }

    #[test]
    fn test_leftover_placeholders_and_degrees_removed() {
        assert_eq!(polish("Mars meets {natal} at 0.5° today"), "Mars meets at today.");
    }

    #[test]
    fn test_cliches_replaced() {
        let text = polish("the stars align for you. Good vibes only");
        assert_eq!(text, "Conditions line up for you. A positive mood only.");
    }

    #[test]
    fn test_split_sentences_keeps_decimals() {
        let parts = split_sentences("Score 3.5 today. Next! Really? done");
        assert_eq!(parts, vec!["Score 3.5 today.", "Next!", "Really?", "done"]);
    }

    #[test]
    fn test_fragments_dropped() {
        assert_eq!(polish("Okay. Take a short walk."), "Take a short walk.");
    }

    #[test]
    fn test_polish_bullet() {
        assert_eq!(polish_bullet("- review priorities."), "Review priorities");
        let long = "word ".repeat(40);
        let bullet = polish_bullet(&long);
        assert!(bullet.chars().count() <= MAX_BULLET_CHARS);
        assert!(!bullet.ends_with('.'));
    }
}
