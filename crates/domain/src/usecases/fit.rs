//! Cohesion-preserving length fit
//!
//! The call to action at the end of a draft is treated as a protected unit:
//! shortening only cuts the lead-in, lengthening only grows the lead-in.

use crate::model::char_len;
use crate::text::{normalize, tidy, truncate_with_ellipsis};

/// Clauses appended to short drafts, each carrying its own joining punctuation
const ENRICHMENTS: &[&str] = &[
    ", without the busywork",
    " and it shows from day one",
    ", built for real schedules",
    " so your team moves faster",
    ", minus the guesswork",
    " for people who hate waiting",
    " that pays off quickly",
    " and zero fluff",
];

const MAX_CLAUSES: usize = 2;

/// Gap to the target at which enrichment stops
const CLOSE_ENOUGH: usize = 5;

/// Shortest lead-in worth keeping in front of a protected CTA
const MIN_LEAD_IN: usize = 4;

const ARROWS: &[&str] = &["→", "->", "➜"];

const DANGLING: &[&str] = &["and", "to", "for", "so", "that"];

const BAD_COLLOCATIONS: &[(&str, &str)] = &[
    ("that", "so"),
    ("so", "that"),
    ("for", "to"),
    ("and", "but"),
];

/// Fit `text` to `target` characters without severing or duplicating the CTA
pub fn fit_to_length(text: &str, target: usize, cta: &str, salt: u32) -> String {
    let len = char_len(text);
    if len == target {
        return text.to_string();
    }
    if len > target {
        shorten(text, target, cta)
    } else {
        lengthen(text, target, cta, salt)
    }
}

/// Split off a trailing CTA (with optional `.`/`!` and arrow) as `(lead_in, cta_unit)`
pub fn split_cta<'a>(text: &'a str, cta: &str) -> Option<(&'a str, &'a str)> {
    if cta.is_empty() {
        return None;
    }

    let trimmed = text.trim_end();
    let mut body = trimmed;
    for arrow in ARROWS {
        if let Some(rest) = body.strip_suffix(arrow) {
            body = rest.trim_end();
            break;
        }
    }
    let body = body.trim_end_matches(['.', '!']);

    if !body.ends_with(cta) {
        return None;
    }
    let start = body.len() - cta.len();
    let lead_in = &trimmed[..start];
    // CTA must start on a word boundary
    if lead_in.chars().next_back().is_some_and(char::is_alphanumeric) {
        return None;
    }
    Some((lead_in.trim_end(), &trimmed[start..]))
}

fn shorten(text: &str, target: usize, cta: &str) -> String {
    if let Some((lead_in, unit)) = split_cta(text, cta) {
        let unit_len = char_len(unit) + 1;
        if unit_len + MIN_LEAD_IN < target {
            let head = truncate_with_ellipsis(lead_in, target - unit_len);
            return format!("{} {}", head, unit);
        }
    }
    truncate_with_ellipsis(text, target)
}

fn lengthen(text: &str, target: usize, cta: &str, salt: u32) -> String {
    let (lead_in, unit) = split_cta(text, cta).unwrap_or((text.trim_end(), ""));
    let unit_len = if unit.is_empty() { 0 } else { char_len(unit) + 1 };

    let body_end = lead_in.trim_end_matches(['.', '!', '?']);
    let terminal = &lead_in[body_end.len()..];
    let mut body = body_end.to_string();

    let mut added = 0;
    for step in 0..ENRICHMENTS.len() {
        if added == MAX_CLAUSES {
            break;
        }
        let current = char_len(&body) + char_len(terminal) + unit_len;
        if target.saturating_sub(current) <= CLOSE_ENOUGH {
            break;
        }

        let clause = ENRICHMENTS[(salt as usize + step * 3) % ENRICHMENTS.len()];
        if current + char_len(clause) > target || awkward_junction(&body, clause) {
            continue;
        }
        body.push_str(clause);
        added += 1;
    }

    let lead_in = strip_dangling_conjunction(&tidy(&format!("{}{}", body, terminal)));
    let joined = if unit.is_empty() {
        lead_in
    } else if lead_in.is_empty() {
        unit.to_string()
    } else {
        format!("{} {}", lead_in, unit)
    };

    strip_dangling_conjunction(&tidy(&joined))
}

fn awkward_junction(body: &str, clause: &str) -> bool {
    let last = normalize(body).rsplit(' ').next().unwrap_or_default().to_string();
    let first = normalize(clause).split(' ').next().unwrap_or_default().to_string();
    if last.is_empty() || first.is_empty() {
        return false;
    }
    last == first
        || BAD_COLLOCATIONS
            .iter()
            .any(|(a, b)| *a == last && *b == first)
}

/// Remove conjunctions left hanging at the very end of the text
pub fn strip_dangling_conjunction(text: &str) -> String {
    let mut out = text.trim_end().to_string();
    loop {
        let trimmed = out.trim_end_matches(|c: char| c.is_whitespace() || matches!(c, ',' | ';'));
        let Some((head, last)) = trimmed.rsplit_once(' ') else {
            break;
        };
        if DANGLING.contains(&last.to_lowercase().as_str()) {
            out = head.to_string();
        } else {
            break;
        }
    }
    out.trim_end_matches(|c: char| c.is_whitespace() || matches!(c, ',' | ';'))
        .to_string()
}
