//! Constraint enforcement for generated copy

use regex::{Regex, RegexBuilder};

use crate::model::{Brand, PlatformSpec, Warning, char_len};
use crate::text::hard_truncate;

/// Headroom at or below which a variant is flagged as near its limit
pub const NEAR_LIMIT_HEADROOM: usize = 3;

/// Text after enforcement plus the warnings it produced
#[derive(Debug, Clone, PartialEq)]
pub struct Enforced {
    pub text: String,
    pub warnings: Vec<Warning>,
}

/// Budget and brand constraints applied as the last step for every variant
#[derive(Debug, Clone, Default)]
pub struct ConstraintPolicy {
    forbidden: Vec<(String, Regex)>,
}

impl ConstraintPolicy {
    pub fn new(brand: Option<&Brand>) -> Self {
        let forbidden = brand
            .map(|b| b.forbidden.as_slice())
            .unwrap_or_default()
            .iter()
            .filter(|phrase| !phrase.trim().is_empty())
            .filter_map(|phrase| {
                let pattern = format!(r"(?:^|\W){}(?:\W|$)", regex::escape(phrase.trim()));
                match RegexBuilder::new(&pattern).case_insensitive(true).build() {
                    Ok(re) => Some((phrase.trim().to_string(), re)),
                    Err(e) => {
                        tracing::warn!(phrase = %phrase, error = %e, "Skipping forbidden phrase");
                        None
                    }
                }
            })
            .collect();

        Self { forbidden }
    }

    /// Enforce the hard budget and collect advisory warnings
    pub fn enforce(
        &self,
        text: &str,
        max_chars: usize,
        platform: Option<&PlatformSpec>,
        cta: &str,
    ) -> Enforced {
        let mut warnings = Vec::new();

        let text = if char_len(text) > max_chars {
            warnings.push(Warning::Truncated);
            hard_truncate(text, max_chars)
        } else {
            text.to_string()
        };

        // Advisory only: the text is left as is
        for (phrase, re) in &self.forbidden {
            if re.is_match(&text) {
                warnings.push(Warning::ForbiddenPhrase {
                    phrase: phrase.clone(),
                });
            }
        }

        let remaining = max_chars.saturating_sub(char_len(&text));
        if remaining <= NEAR_LIMIT_HEADROOM {
            warnings.push(Warning::NearLimit { remaining });
        }

        if let Some(platform) = platform {
            if let Some(max) = platform.max_hashtags {
                let found = count_hashtags(&text);
                if found > max {
                    warnings.push(Warning::TooManyHashtags { found, max });
                }
            }

            if let Some(focus) = platform.focus_chars {
                if char_len(&text) > focus && !cta_within(&text, cta, focus) {
                    warnings.push(Warning::FocusWindowMissesCta { focus });
                }
            }
        }

        Enforced { text, warnings }
    }

    /// Render the hard rules for a model prompt
    pub fn prompt_rules(brand: Option<&Brand>) -> String {
        let mut lines = vec![
            "Rules:".to_string(),
            "- Each text MUST be at most its maxChars characters, counting every character".to_string(),
            "- Match the requested tone, structure and cta of each variant".to_string(),
            "- End each text with its cta".to_string(),
            "- Never repeat the idea verbatim; rephrase it in fresh words".to_string(),
            "- Output compact JSON only: [{\"id\":\"...\",\"text\":\"...\"}]".to_string(),
        ];

        if let Some(brand) = brand {
            if let Some(voice) = &brand.voice {
                lines.push(format!("- Write in this brand voice: {}", voice));
            }
            if !brand.forbidden.is_empty() {
                lines.push(format!(
                    "- Never use these phrases: {}",
                    brand.forbidden.join(", ")
                ));
            }
            for note in &brand.notes {
                lines.push(format!("- Brand note: {}", note));
            }
        }

        lines.join("\n")
    }
}

fn count_hashtags(text: &str) -> usize {
    text.split_whitespace()
        .filter(|tok| {
            tok.strip_prefix('#')
                .and_then(|rest| rest.chars().next())
                .is_some_and(char::is_alphanumeric)
        })
        .count()
}

fn cta_within(text: &str, cta: &str, focus: usize) -> bool {
    let head: String = text.chars().take(focus).collect();
    head.to_lowercase().contains(&cta.to_lowercase())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::PlatformKey;

    fn brand(forbidden: &[&str]) -> Brand {
        Brand {
            voice: Some("friendly".to_string()),
            forbidden: forbidden.iter().map(|s| s.to_string()).collect(),
            notes: vec![],
        }
    }

    #[test]
    fn test_truncates_over_budget() {
        let policy = ConstraintPolicy::default();
        let result = policy.enforce(&"a".repeat(50), 20, None, "Shop now");
        assert_eq!(char_len(&result.text), 20);
        assert!(result.text.ends_with('…'));
        assert!(result.warnings.contains(&Warning::Truncated));
    }

    #[test]
    fn test_forbidden_phrase_warns_without_editing() {
        let b = brand(&["cheap"]);
        let policy = ConstraintPolicy::new(Some(&b));
        let text = "Great shoes, never Cheap. Shop now";
        let result = policy.enforce(text, 200, None, "Shop now");
        assert_eq!(result.text, text);
        assert!(result.warnings.contains(&Warning::ForbiddenPhrase {
            phrase: "cheap".to_string()
        }));
    }

    #[test]
    fn test_forbidden_phrase_matches_whole_words_only() {
        let b = brand(&["cheap"]);
        let policy = ConstraintPolicy::new(Some(&b));
        let result = policy.enforce("Cheapskates welcome", 200, None, "Shop now");
        assert!(result.warnings.is_empty());
    }

    #[test]
    fn test_near_limit_warning() {
        let policy = ConstraintPolicy::default();
        let result = policy.enforce("abcdefg", 10, None, "Shop now");
        assert_eq!(result.warnings, vec![Warning::NearLimit { remaining: 3 }]);

        let result = policy.enforce("abc", 10, None, "Shop now");
        assert!(result.warnings.is_empty());
    }

    #[test]
    fn test_hashtag_limit_for_platform() {
        let policy = ConstraintPolicy::default();
        let spec = PlatformKey::XPost.spec();
        let result = policy.enforce("Go #a #b #c #d now", 280, Some(&spec), "now");
        assert!(result
            .warnings
            .contains(&Warning::TooManyHashtags { found: 4, max: 3 }));
    }

    #[test]
    fn test_focus_window_checks_cta() {
        let policy = ConstraintPolicy::default();
        let spec = PlatformKey::InstagramCaption.spec();
        let late = format!("{} Shop now", "x".repeat(200));
        let result = policy.enforce(&late, 2200, Some(&spec), "Shop now");
        assert!(result
            .warnings
            .contains(&Warning::FocusWindowMissesCta { focus: 125 }));

        let early = format!("Shop now {}", "x".repeat(200));
        let result = policy.enforce(&early, 2200, Some(&spec), "Shop now");
        assert!(result.warnings.is_empty());
    }

    #[test]
    fn test_prompt_rules_include_brand() {
        let b = brand(&["cheap", "guaranteed"]);
        let rules = ConstraintPolicy::prompt_rules(Some(&b));
        assert!(rules.contains("friendly"));
        assert!(rules.contains("cheap, guaranteed"));
        assert!(rules.contains("maxChars"));
    }
}
