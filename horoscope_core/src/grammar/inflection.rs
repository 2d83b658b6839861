//! Word-level inflection: gerunds and indefinite articles.

/// Verbs the phrase classifier recognizes, with irregular gerunds where the
/// regular rules would get them wrong.
const VERBS: &[(&str, Option<&str>)] = &[
    ("admit", Some("admitting")),
    ("align", None),
    ("anchor", None),
    ("ask", None),
    ("assume", None),
    ("balance", None),
    ("be", Some("being")),
    ("begin", Some("beginning")),
    ("book", None),
    ("build", None),
    ("check", None),
    ("clarify", None),
    ("commit", Some("committing")),
    ("compare", None),
    ("create", None),
    ("cultivate", None),
    ("deepen", Some("deepening")),
    ("develop", Some("developing")),
    ("drink", None),
    ("expand", None),
    ("explore", None),
    ("finish", None),
    ("focus", Some("focusing")),
    ("follow", None),
    ("force", None),
    ("forget", Some("forgetting")),
    ("give", None),
    ("hold", None),
    ("honor", Some("honoring")),
    ("ignore", None),
    ("integrate", None),
    ("keep", None),
    ("lend", None),
    ("let", Some("letting")),
    ("lie", Some("lying")),
    ("listen", Some("listening")),
    ("maintain", None),
    ("make", None),
    ("nurture", None),
    ("open", Some("opening")),
    ("organize", None),
    ("overcommit", Some("overcommitting")),
    ("overschedule", None),
    ("pause", None),
    ("pay", None),
    ("plan", None),
    ("prioritize", None),
    ("push", None),
    ("put", Some("putting")),
    ("react", None),
    ("refine", None),
    ("release", None),
    ("reopen", Some("reopening")),
    ("rest", None),
    ("review", None),
    ("revisit", Some("revisiting")),
    ("rush", None),
    ("save", None),
    ("schedule", None),
    ("see", Some("seeing")),
    ("send", None),
    ("set", Some("setting")),
    ("share", None),
    ("sign", None),
    ("skip", None),
    ("spend", None),
    ("stabilize", None),
    ("stop", None),
    ("strengthen", Some("strengthening")),
    ("stretch", None),
    ("take", None),
    ("talk", None),
    ("track", None),
    ("transform", None),
    ("trust", None),
    ("walk", None),
    ("write", None),
];

/// Words that are both a verb and a usable noun ("a review", "your focus").
const NOUN_VERBS: &[&str] = &[
    "balance", "check", "focus", "plan", "release", "rest", "review", "stretch", "talk", "trust",
    "walk",
];

/// Adjectives the classifier uses to spot adjective+noun phrases.
const ADJECTIVES: &[&str] = &[
    "balanced", "bold", "calm", "careful", "clear", "creative", "daily", "deep", "emotional",
    "focused", "gentle", "generous", "honest", "long", "new", "open", "patient", "practical",
    "quiet", "radiant", "simple", "small", "steady", "strategic", "warm",
];

const SOFT_H_PREFIXES: &[&str] = &["honor", "honest", "hour", "heir"];
const HARD_VOWEL_PREFIXES: &[&str] = &[
    "unif", "unio", "unique", "unit", "univ", "eu", "one", "use", "usu", "uti",
];

pub fn is_known_verb(word: &str) -> bool {
    let lower = word.to_ascii_lowercase();
    VERBS.iter().any(|(verb, _)| *verb == lower)
}

pub fn is_noun_verb(word: &str) -> bool {
    let lower = word.to_ascii_lowercase();
    NOUN_VERBS.contains(&lower.as_str())
}

pub fn is_known_adjective(word: &str) -> bool {
    let lower = word.to_ascii_lowercase();
    ADJECTIVES.contains(&lower.as_str())
}

fn is_vowel(c: char) -> bool {
    matches!(c, 'a' | 'e' | 'i' | 'o' | 'u')
}

/// Number of vowel groups, a rough syllable count.
fn vowel_groups(word: &str) -> usize {
    let mut groups = 0;
    let mut in_group = false;
    for c in word.chars() {
        if is_vowel(c) {
            if !in_group {
                groups += 1;
            }
            in_group = true;
        } else {
            in_group = false;
        }
    }
    groups
}

/// Gerund of a single verb.
///
/// Irregular table first, then: `-ie` to `-ying`, drop a silent `e`, double the
/// final consonant of one-syllable consonant-vowel-consonant words.
pub fn gerund(verb: &str) -> String {
    let lower = verb.to_ascii_lowercase();
    if let Some(irregular) = VERBS
        .iter()
        .find(|(v, _)| *v == lower)
        .and_then(|(_, g)| *g)
    {
        return irregular.to_string();
    }
    if lower.ends_with("ing") && lower.len() > 4 {
        return lower;
    }

    let chars: Vec<char> = lower.chars().collect();
    let n = chars.len();

    if lower.ends_with("ie") {
        return format!("{}ying", &lower[..lower.len() - 2]);
    }
    if n > 2 && lower.ends_with('e') && !lower.ends_with("ee") && !lower.ends_with("ye") {
        return format!("{}ing", &lower[..lower.len() - 1]);
    }
    if n >= 3
        && vowel_groups(&lower) == 1
        && !is_vowel(chars[n - 1])
        && !matches!(chars[n - 1], 'w' | 'x' | 'y')
        && is_vowel(chars[n - 2])
        && !is_vowel(chars[n - 3])
    {
        return format!("{}{}ing", lower, chars[n - 1]);
    }
    format!("{}ing", lower)
}

/// `"a"` or `"an"` for the word that follows.
pub fn indefinite_article(word: &str) -> &'static str {
    let lower = word.trim().to_ascii_lowercase();
    if SOFT_H_PREFIXES.iter().any(|p| lower.starts_with(p)) {
        return "an";
    }
    if HARD_VOWEL_PREFIXES.iter().any(|p| lower.starts_with(p)) {
        return "a";
    }
    match lower.chars().next() {
        Some(c) if is_vowel(c) => "an",
        _ => "a",
    }
}

/// Prefix a phrase with its indefinite article.
pub fn with_article(phrase: &str) -> String {
    let trimmed = phrase.trim();
    let first = trimmed.split_whitespace().next().unwrap_or("");
    format!("{} {}", indefinite_article(first), trimmed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_regular_gerunds() {
        assert_eq!(gerund("review"), "reviewing");
        assert_eq!(gerund("make"), "making");
        assert_eq!(gerund("plan"), "planning");
        assert_eq!(gerund("skip"), "skipping");
        assert_eq!(gerund("react"), "reacting");
        assert_eq!(gerund("see"), "seeing");
        assert_eq!(gerund("tie"), "tying");
    }

    #[test]
    fn test_irregular_gerunds() {
        assert_eq!(gerund("focus"), "focusing");
        assert_eq!(gerund("overcommit"), "overcommitting");
        assert_eq!(gerund("reopen"), "reopening");
        assert_eq!(gerund("listen"), "listening");
    }

    #[test]
    fn test_multisyllable_words_do_not_double() {
        assert_eq!(gerund("visit"), "visiting");
        assert_eq!(gerund("offer"), "offering");
    }

    #[test]
    fn test_articles() {
        assert_eq!(indefinite_article("honest"), "an");
        assert_eq!(indefinite_article("hour-long"), "an");
        assert_eq!(indefinite_article("unique"), "a");
        assert_eq!(indefinite_article("universal"), "a");
        assert_eq!(indefinite_article("union"), "a");
        assert_eq!(indefinite_article("unimportant"), "an");
        assert_eq!(indefinite_article("uninformed"), "an");
        assert_eq!(indefinite_article("European"), "a");
        assert_eq!(indefinite_article("open"), "an");
        assert_eq!(indefinite_article("steady"), "a");
        assert_eq!(with_article("exacting stretch"), "an exacting stretch");
    }
}
