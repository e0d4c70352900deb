//! Diversification pass for length plans
//!
//! Variants are scanned in order; any variant whose opening bigram was
//! already used, or that still overlaps the idea, is rewritten with synonym
//! swaps on its lead-in and a fresh rhetorical opener, then pushed through the
//! slot pipeline again. The CTA is carried over untouched.

use std::collections::HashSet;

use crate::model::Variant;
use crate::policy::ConstraintPolicy;
use crate::text::{ELLIPSIS, echoes_idea, opening_bigram};
use crate::usecases::fit::split_cta;
use crate::usecases::generate::{Slot, complete_slot};

const OPENERS: [&str; 5] = [
    "Let's be honest:",
    "Here's the shift:",
    "Real talk:",
    "Quick truth:",
    "Picture this:",
];

const OPENER_HEADS: &[&str] = &[
    "Honestly", "Frankly", "Simply", "Plainly", "Bluntly", "Briefly", "Truly", "Seriously",
];

const OPENER_TAILS: &[&str] = &["put:", "said:", "speaking:", "stated:", "noted:"];

// No CTA words here: the swap must never reword a call to action
const SYNONYMS: &[(&str, &str)] = &[
    ("easy", "simple"),
    ("fast", "quick"),
    ("better", "sharper"),
    ("results", "wins"),
    ("fresh", "new"),
    ("smarter", "wiser"),
    ("simpler", "cleaner"),
];

/// Rewrite variants until no two share an opening bigram
pub(crate) fn diversify(
    variants: &mut [Variant],
    slots: &[Slot],
    idea: &str,
    policy: &ConstraintPolicy,
) {
    let mut seen: HashSet<String> = HashSet::new();

    for (variant, slot) in variants.iter_mut().zip(slots) {
        let opening = opening_bigram(&variant.text);
        if seen.contains(&opening) || echoes_idea(&variant.text, idea) {
            let (lead_in, cta_unit) = split_cta(&variant.text, slot.cta.as_str())
                .unwrap_or((variant.text.as_str(), ""));
            let body = swap_synonyms(lead_in.trim_end_matches(ELLIPSIS), slot.salt);

            let mut rewritten = None;
            for opener in usable_openers(slot.salt, &seen, idea) {
                let candidate = complete_slot(
                    slot,
                    compose(&opener, &body, cta_unit),
                    idea,
                    policy,
                    |salt| format!("{} {}", opener, slot.draft(idea, salt)),
                );
                // Echo breaking can still eat into the opener; try the next one
                let fresh = !seen.contains(&opening_bigram(&candidate.text));
                rewritten = Some(candidate);
                if fresh {
                    tracing::debug!(
                        variant_id = %slot.id,
                        opening = %opening,
                        opener = %opener,
                        "Rewrote variant for diversity"
                    );
                    break;
                }
            }

            if let Some(candidate) = rewritten {
                *variant = candidate;
            }
        }
        seen.insert(opening_bigram(&variant.text));
    }
}

fn compose(opener: &str, body: &str, cta_unit: &str) -> String {
    [opener, body.trim(), cta_unit]
        .into_iter()
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Openers in rotation order starting at `salt % 5`, ending with `Take {salt}:`
fn opener_candidates(salt: u32) -> impl Iterator<Item = String> {
    let start = salt as usize;
    let primary = (0..OPENERS.len()).map(move |i| OPENERS[(start + i) % OPENERS.len()].to_string());

    let combos = OPENER_HEADS.len() * OPENER_TAILS.len();
    let extended = (0..combos).map(move |i| {
        let k = (start + i) % combos;
        format!(
            "{} {}",
            OPENER_HEADS[k / OPENER_TAILS.len()],
            OPENER_TAILS[k % OPENER_TAILS.len()]
        )
    });

    primary
        .chain(extended)
        .chain(std::iter::once(format!("Take {}:", salt)))
}

/// Openers whose bigram is unused and that do not themselves echo the idea
fn usable_openers<'a>(
    salt: u32,
    seen: &'a HashSet<String>,
    idea: &'a str,
) -> impl Iterator<Item = String> + 'a {
    opener_candidates(salt)
        .filter(move |opener| !seen.contains(&opening_bigram(opener)) && !echoes_idea(opener, idea))
}

/// Swap synonym pairs, alternating which pairs apply by salt
fn swap_synonyms(text: &str, salt: u32) -> String {
    text.split(' ')
        .map(|token| {
            let start = token.find(char::is_alphanumeric).unwrap_or(token.len());
            let end = token
                .rfind(char::is_alphanumeric)
                .map(|i| i + token[i..].chars().next().map_or(1, char::len_utf8))
                .unwrap_or(start);
            if start >= end {
                return token.to_string();
            }

            let core = &token[start..end];
            let lower = core.to_lowercase();
            let replacement = SYNONYMS.iter().enumerate().find_map(|(i, (a, b))| {
                if (salt as usize + i) % 2 != 0 {
                    return None;
                }
                if lower == *a {
                    Some(*b)
                } else if lower == *b {
                    Some(*a)
                } else {
                    None
                }
            });

            match replacement {
                Some(word) => format!(
                    "{}{}{}",
                    &token[..start],
                    match_case(core, word),
                    &token[end..]
                ),
                None => token.to_string(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

fn match_case(original: &str, word: &str) -> String {
    if original.chars().next().is_some_and(char::is_uppercase) {
        let mut chars = word.chars();
        match chars.next() {
            Some(first) => first.to_uppercase().chain(chars).collect(),
            None => String::new(),
        }
    } else {
        word.to_string()
    }
}
