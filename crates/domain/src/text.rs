//! Text utilities: normalization, keyword paraphrase and the no-verbatim sanitizer

use regex::RegexBuilder;
use std::collections::HashSet;

use crate::model::char_len;

/// Single-character ellipsis appended on truncation
pub const ELLIPSIS: char = '…';

/// Word-run length that counts as echoing the idea
pub const ECHO_RUN: usize = 3;

/// Paraphrase retries before the sanitizer starts cutting text
pub const MAX_SANITIZE_ATTEMPTS: u32 = 5;

const MAX_KEYWORDS: usize = 5;

const STOPWORDS: &[&str] = &[
    "about", "after", "again", "also", "been", "before", "being", "both", "could", "does",
    "doing", "down", "each", "even", "ever", "every", "from", "have", "having", "here", "into",
    "just", "like", "make", "makes", "more", "most", "much", "need", "only", "other", "ours",
    "over", "really", "same", "should", "some", "such", "than", "that", "their", "them", "then",
    "there", "these", "they", "this", "those", "through", "very", "want", "were", "what", "when",
    "where", "which", "while", "will", "with", "within", "without", "would", "your", "yours",
];

/// Generic sentences the idea keywords are dropped into. The two slots are
/// never adjacent, so keyword order from the idea cannot survive intact.
const PARAPHRASE_TEMPLATES: &[&str] = &[
    "effortless {a} that finally clicks with {b}",
    "a fresh take on {a}, built around {b}",
    "smarter {a} with {b} handled for you",
    "the simpler path from {a} to better {b}",
    "{a} done right, and {b} that keeps up",
    "less friction around {a}, more room for {b}",
];

const FALLBACK_KEYWORDS: [&str; 2] = ["results", "momentum"];

/// Lowercase, keep alphanumerics and in-word apostrophes, collapse the rest to single spaces
pub fn normalize(text: &str) -> String {
    let chars: Vec<char> = text.chars().collect();
    let mut out = String::with_capacity(text.len());

    for (i, c) in chars.iter().enumerate() {
        if c.is_alphanumeric() {
            out.extend(c.to_lowercase());
        } else if matches!(c, '\'' | '’')
            && i > 0
            && chars[i - 1].is_alphanumeric()
            && chars.get(i + 1).is_some_and(|n| n.is_alphanumeric())
        {
            out.push('\'');
        } else {
            out.push(' ');
        }
    }

    out.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Normalized words of a text
pub fn words(text: &str) -> Vec<String> {
    normalize(text)
        .split(' ')
        .filter(|w| !w.is_empty())
        .map(str::to_string)
        .collect()
}

/// Up to five non-trivial keywords of an idea, in order of appearance
pub fn keywords(idea: &str) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    for word in words(idea) {
        if char_len(&word) <= 3 || STOPWORDS.contains(&word.as_str()) || out.contains(&word) {
            continue;
        }
        out.push(word);
        if out.len() == MAX_KEYWORDS {
            break;
        }
    }
    out
}

/// FNV-1a 32-bit hash, stable across runs and platforms
pub fn stable_hash(text: &str) -> u32 {
    let mut hash: u32 = 0x811c_9dc5;
    for byte in text.as_bytes() {
        hash ^= u32::from(*byte);
        hash = hash.wrapping_mul(0x0100_0193);
    }
    hash
}

/// Restate the idea through a generic template; a different salt gives a different paraphrase
pub fn paraphrase(idea: &str, salt: u32) -> String {
    // A one-word idea is its own keyword and would always echo
    let kws = if words(idea).len() < 2 {
        Vec::new()
    } else {
        keywords(idea)
    };
    let pick = stable_hash(&format!("{}#{}", idea, salt)) as usize % PARAPHRASE_TEMPLATES.len();
    let template = PARAPHRASE_TEMPLATES[pick];

    let salt = salt as usize;
    let (a, b) = match kws.len() {
        0 => (FALLBACK_KEYWORDS[0], FALLBACK_KEYWORDS[1]),
        1 => {
            let a = kws[0].as_str();
            let b = FALLBACK_KEYWORDS
                .iter()
                .copied()
                .find(|f| *f != a)
                .unwrap_or(FALLBACK_KEYWORDS[1]);
            (a, b)
        }
        n => {
            let i = salt % n;
            let j = (i + 1 + (salt / n) % (n - 1)) % n;
            (kws[i].as_str(), kws[j].as_str())
        }
    };

    template.replace("{a}", a).replace("{b}", b)
}

fn idea_trigrams(idea: &str) -> HashSet<String> {
    words(idea)
        .windows(ECHO_RUN)
        .map(|w| w.join(" "))
        .collect()
}

/// Whether `text` repeats a run of three or more consecutive idea words, or
/// contains the whole normalized idea on word boundaries.
///
/// The second check only matters for ideas shorter than three words.
pub fn echoes_idea(text: &str, idea: &str) -> bool {
    let grams = idea_trigrams(idea);
    let text_words = words(text);
    if text_words.windows(ECHO_RUN).any(|w| grams.contains(&w.join(" "))) {
        return true;
    }

    let idea_words = words(idea);
    !idea_words.is_empty() && text_words.windows(idea_words.len()).any(|w| w == idea_words)
}

/// Remove literal (case-insensitive, whitespace-tolerant) occurrences of the idea
pub fn strip_literal(text: &str, idea: &str) -> String {
    let parts: Vec<String> = idea.split_whitespace().map(regex::escape).collect();
    if parts.is_empty() {
        return text.to_string();
    }

    match RegexBuilder::new(&parts.join(r"\s+"))
        .case_insensitive(true)
        .build()
    {
        Ok(re) => re.replace_all(text, " ").into_owned(),
        Err(e) => {
            tracing::warn!(error = %e, "Could not build idea pattern");
            text.to_string()
        }
    }
}

/// Drop tokens that complete an idea trigram, or that sit inside a whole
/// short idea, until none remain
pub fn break_idea_runs(text: &str, idea: &str) -> String {
    let grams = idea_trigrams(idea);
    let idea_words = words(idea);
    let mut tokens: Vec<&str> = text.split_whitespace().collect();
    if idea_words.is_empty() {
        return tokens.join(" ");
    }

    loop {
        let flat: Vec<(String, usize)> = tokens
            .iter()
            .enumerate()
            .flat_map(|(i, tok)| words(tok).into_iter().map(move |w| (w, i)))
            .collect();

        let run = flat.windows(ECHO_RUN).find(|w| {
            let key = w.iter().map(|(word, _)| word.as_str()).collect::<Vec<_>>().join(" ");
            grams.contains(&key)
        });
        let whole = || {
            flat.windows(idea_words.len()).find(|w| {
                w.iter().zip(&idea_words).all(|((word, _), expected)| word == expected)
            })
        };

        match run.or_else(whole) {
            Some(window) => {
                let owner = window[window.len() / 2].1;
                tokens.remove(owner);
            }
            None => break,
        }
    }

    tokens.join(" ")
}

/// Guarantee that `text` does not echo the idea.
///
/// Tries `rebuild` with increasing salt first, then strips literal idea text,
/// and finally cuts tokens out of any remaining idea run.
pub fn ensure_no_echo<F>(text: String, idea: &str, salt: u32, mut rebuild: F) -> String
where
    F: FnMut(u32) -> String,
{
    if !echoes_idea(&text, idea) {
        return text;
    }

    for attempt in 1..=MAX_SANITIZE_ATTEMPTS {
        let candidate = rebuild(salt.wrapping_add(attempt));
        if !echoes_idea(&candidate, idea) {
            return candidate;
        }
    }

    tracing::debug!(salt, "Paraphrase retries exhausted, stripping idea text");

    let stripped = tidy(&strip_literal(&text, idea));
    if !echoes_idea(&stripped, idea) {
        return stripped;
    }
    break_idea_runs(&stripped, idea)
}

/// First two normalized words, used as a cheap diversity key
pub fn opening_bigram(text: &str) -> String {
    words(text).into_iter().take(2).collect::<Vec<_>>().join(" ")
}

/// Collapse duplicate whitespace and punctuation
pub fn tidy(text: &str) -> String {
    let collapsed = text.split_whitespace().collect::<Vec<_>>().join(" ");
    let mut out = String::with_capacity(collapsed.len());

    for c in collapsed.chars() {
        if matches!(c, ',' | ';' | ':' | '.' | '!' | '?') {
            if out.ends_with(' ') {
                out.pop();
            }
            if out.ends_with(c) {
                continue;
            }
            if c == ',' && out.ends_with(['.', '!', '?', ':', ';']) {
                continue;
            }
        }
        out.push(c);
    }

    out.trim_start_matches(|c: char| c.is_whitespace() || matches!(c, ',' | ';' | ':' | '.'))
        .trim_end()
        .to_string()
}

/// Cut to `limit - 1` characters and append an ellipsis
pub fn hard_truncate(text: &str, limit: usize) -> String {
    if char_len(text) <= limit {
        return text.to_string();
    }
    if limit == 0 {
        return String::new();
    }
    let mut out: String = text.chars().take(limit - 1).collect();
    out.push(ELLIPSIS);
    out
}

/// Truncate to at most `limit` characters, preferring a word boundary
pub fn truncate_with_ellipsis(text: &str, limit: usize) -> String {
    if char_len(text) <= limit {
        return text.to_string();
    }
    if limit == 0 {
        return String::new();
    }

    let keep = limit - 1;
    let head: String = text.chars().take(keep).collect();
    let ends_on_word = text.chars().nth(keep).is_some_and(char::is_whitespace);
    let cut = match head.rfind(char::is_whitespace) {
        _ if ends_on_word => head.as_str(),
        Some(pos) if char_len(&head[..pos]) * 2 >= keep => &head[..pos],
        _ => head.as_str(),
    };
    let cut = cut.trim_end_matches(|c: char| {
        c.is_whitespace() || c == ELLIPSIS || matches!(c, ',' | ';' | ':' | '-' | '.' | '!' | '?')
    });

    format!("{}{}", cut, ELLIPSIS)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_strips_punctuation_keeps_contractions() {
        assert_eq!(normalize("Let's   GO, team!"), "let's go team");
        assert_eq!(normalize("  'quoted' "), "quoted");
    }

    #[test]
    fn test_keywords_filters_and_dedupes() {
        let kws = keywords("Cut your onboarding time in half, onboarding matters");
        assert_eq!(kws, vec!["onboarding", "time", "half", "matters"]);
    }

    #[test]
    fn test_keywords_caps_at_five() {
        let kws = keywords("alpha bravo charlie delta echoes foxtrot golfing");
        assert_eq!(kws.len(), 5);
    }

    #[test]
    fn test_paraphrase_is_deterministic_and_salt_sensitive() {
        let idea = "Premium leather wallets for busy commuters";
        assert_eq!(paraphrase(idea, 3), paraphrase(idea, 3));
        let distinct: HashSet<String> = (0..10).map(|s| paraphrase(idea, s)).collect();
        assert!(distinct.len() > 1);
    }

    #[test]
    fn test_paraphrase_never_keeps_keyword_runs() {
        let idea = "premium leather wallets";
        for salt in 0..50 {
            assert!(!echoes_idea(&paraphrase(idea, salt), idea), "salt {}", salt);
        }
    }

    #[test]
    fn test_paraphrase_without_keywords() {
        let text = paraphrase("it is a go", 0);
        assert!(text.contains("results") || text.contains("momentum"));
    }

    #[test]
    fn test_echoes_idea_detects_three_word_runs() {
        let idea = "Cut your onboarding time in half";
        assert!(echoes_idea("We help you cut your onboarding fast", idea));
        assert!(echoes_idea("ONBOARDING TIME, in half!", idea));
        assert!(!echoes_idea("Onboarding takes less time now", idea));
        assert!(!echoes_idea("anything", "two words"));
    }

    #[test]
    fn test_echoes_idea_detects_short_ideas() {
        assert!(echoes_idea("Love onboarding time? Shop now", "onboarding time"));
        assert!(echoes_idea("New SNEAKERS, just in", "Sneakers"));
        assert!(!echoes_idea("Onboarding takes less time", "onboarding time"));
        assert!(!echoes_idea("sneakerheads welcome", "sneakers"));
        assert!(!echoes_idea("anything", "  "));
    }

    #[test]
    fn test_break_idea_runs_handles_two_word_idea() {
        let idea = "onboarding time";
        let out = break_idea_runs("Love onboarding time? Shop now", idea);
        assert!(!echoes_idea(&out, idea), "{}", out);
        assert!(out.ends_with("Shop now"));
    }

    #[test]
    fn test_paraphrase_of_one_word_idea_avoids_it() {
        for salt in 0..20 {
            assert!(!echoes_idea(&paraphrase("Sneakers", salt), "Sneakers"));
        }
    }

    #[test]
    fn test_strip_literal_is_case_insensitive() {
        let out = strip_literal("Wow: CUT your  onboarding time in half today", "cut your onboarding time in half");
        assert_eq!(tidy(&out), "Wow: today");
    }

    #[test]
    fn test_break_idea_runs_removes_overlap() {
        let idea = "a fresh take on";
        let out = break_idea_runs("Here is a fresh take on shoes", idea);
        assert!(!echoes_idea(&out, idea));
        assert!(out.contains("shoes"));
    }

    #[test]
    fn test_ensure_no_echo_uses_rebuild_first() {
        let idea = "fast cheap reliable hosting";
        let out = ensure_no_echo(
            "fast cheap reliable hosting".to_string(),
            idea,
            0,
            |salt| format!("rebuilt {}", salt),
        );
        assert_eq!(out, "rebuilt 1");
    }

    #[test]
    fn test_ensure_no_echo_terminates_on_stubborn_rebuild() {
        let idea = "fast cheap reliable hosting";
        let out = ensure_no_echo(
            "Try fast cheap reliable hosting now".to_string(),
            idea,
            0,
            |_| "fast cheap reliable".to_string(),
        );
        assert!(!echoes_idea(&out, idea));
        assert!(out.contains("Try"));
    }

    #[test]
    fn test_tidy_collapses_duplicates() {
        assert_eq!(tidy("Hello ,, world  ..  ok"), "Hello, world. ok");
        assert_eq!(tidy(", leading"), "leading");
    }

    #[test]
    fn test_truncation_helpers_respect_limit() {
        let text = "The quick brown fox jumps over the lazy dog";
        let hard = hard_truncate(text, 10);
        assert_eq!(char_len(&hard), 10);
        assert!(hard.ends_with(ELLIPSIS));

        let soft = truncate_with_ellipsis(text, 20);
        assert!(char_len(&soft) <= 20);
        assert_eq!(soft, "The quick brown fox…");
    }

    #[test]
    fn test_truncate_with_ellipsis_drops_terminal_punctuation() {
        assert_eq!(
            truncate_with_ellipsis("No more excuses. Get the right tools", 18),
            "No more excuses…"
        );
        assert_eq!(truncate_with_ellipsis("Get the… rest of it here", 10), "Get the…");
    }

    #[test]
    fn test_opening_bigram() {
        assert_eq!(opening_bigram("Let's be honest: it works"), "let's be");
        assert_eq!(opening_bigram("Hi"), "hi");
    }
}
