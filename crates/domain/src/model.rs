//! Domain models and value objects

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Error returned when parsing an enumerated value from text
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unknown {kind} '{value}'")]
pub struct ParseValueError {
    pub kind: &'static str,
    pub value: String,
}

/// Rhetorical tone of a variant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Tone {
    Witty,
    Bold,
    Warm,
    Authoritative,
    Playful,
}

impl Tone {
    pub const ALL: [Tone; 5] = [
        Tone::Witty,
        Tone::Bold,
        Tone::Warm,
        Tone::Authoritative,
        Tone::Playful,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Tone::Witty => "witty",
            Tone::Bold => "bold",
            Tone::Warm => "warm",
            Tone::Authoritative => "authoritative",
            Tone::Playful => "playful",
        }
    }
}

/// Rhetorical structure of a variant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Structure {
    QuestionLed,
    Contrast,
    ProblemSolution,
    BenefitFirst,
    SocialProof,
}

impl Structure {
    pub const ALL: [Structure; 5] = [
        Structure::QuestionLed,
        Structure::Contrast,
        Structure::ProblemSolution,
        Structure::BenefitFirst,
        Structure::SocialProof,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Structure::QuestionLed => "question-led",
            Structure::Contrast => "contrast",
            Structure::ProblemSolution => "problem-solution",
            Structure::BenefitFirst => "benefit-first",
            Structure::SocialProof => "social-proof",
        }
    }
}

/// Call to action closing a variant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Cta {
    #[serde(rename = "Shop now")]
    ShopNow,
    #[serde(rename = "Learn more")]
    LearnMore,
    #[serde(rename = "Get started")]
    GetStarted,
    #[serde(rename = "Sign up today")]
    SignUpToday,
    #[serde(rename = "Try it free")]
    TryItFree,
}

impl Cta {
    pub const ALL: [Cta; 5] = [
        Cta::ShopNow,
        Cta::LearnMore,
        Cta::GetStarted,
        Cta::SignUpToday,
        Cta::TryItFree,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Cta::ShopNow => "Shop now",
            Cta::LearnMore => "Learn more",
            Cta::GetStarted => "Get started",
            Cta::SignUpToday => "Sign up today",
            Cta::TryItFree => "Try it free",
        }
    }
}

macro_rules! display_and_parse {
    ($ty:ty, $kind:literal) => {
        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $ty {
            type Err = ParseValueError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let wanted = s.trim();
                Self::ALL
                    .iter()
                    .copied()
                    .find(|v| v.as_str().eq_ignore_ascii_case(wanted))
                    .ok_or_else(|| ParseValueError {
                        kind: $kind,
                        value: s.to_string(),
                    })
            }
        }
    };
}

display_and_parse!(Tone, "tone");
display_and_parse!(Structure, "structure");
display_and_parse!(Cta, "cta");
display_and_parse!(PlatformKey, "platform");

/// Publishing surface a variant targets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlatformKey {
    /// Long-form caption, truncated in feed previews
    InstagramCaption,
    /// Short-form social post
    XPost,
    /// Short video description
    TiktokCaption,
    /// Article intro / standfirst
    ArticleIntro,
}

impl PlatformKey {
    pub const ALL: [PlatformKey; 4] = [
        PlatformKey::InstagramCaption,
        PlatformKey::XPost,
        PlatformKey::TiktokCaption,
        PlatformKey::ArticleIntro,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PlatformKey::InstagramCaption => "instagram_caption",
            PlatformKey::XPost => "x_post",
            PlatformKey::TiktokCaption => "tiktok_caption",
            PlatformKey::ArticleIntro => "article_intro",
        }
    }
}

/// Static description of a publishing surface
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PlatformSpec {
    pub key: PlatformKey,
    /// Hard character ceiling
    pub max_chars: usize,
    /// Leading characters that must carry the impact
    pub focus_chars: Option<usize>,
    pub max_hashtags: Option<usize>,
    pub notes: &'static str,
}

/// Optional brand constraints supplied with an idea
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Brand {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub voice: Option<String>,
    /// Phrases that must not appear (advisory, reported as warnings)
    #[serde(default)]
    pub forbidden: Vec<String>,
    #[serde(default)]
    pub notes: Vec<String>,
}

/// One generation slot in a platform plan
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VariantSpec {
    pub id: String,
    pub platform: PlatformKey,
    pub tone: Tone,
    pub structure: Structure,
    pub cta: Cta,
    pub max_chars: usize,
}

/// Plan of variants bound to named platforms
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Plan {
    pub id: String,
    pub idea: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub brand: Option<Brand>,
    pub platforms: Vec<PlatformKey>,
    pub variants: Vec<VariantSpec>,
}

/// One generation slot in a length plan
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LengthVariantSpec {
    pub id: String,
    pub tone: Tone,
    pub structure: Structure,
    pub cta: Cta,
    pub max_chars: usize,
    /// Length the copy should be fitted to, slightly under `max_chars`
    pub target_length: usize,
}

/// Plan of variants sharing a single character ceiling
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LengthPlan {
    pub id: String,
    pub idea: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub brand: Option<Brand>,
    pub max_chars: usize,
    pub variants: Vec<LengthVariantSpec>,
}

/// Diagnostic attached to a variant explaining a compromise
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Warning {
    /// Text exceeded the budget and was cut
    Truncated,
    /// A brand-forbidden phrase is present (text left unchanged)
    ForbiddenPhrase { phrase: String },
    /// Only a few characters of headroom remain
    NearLimit { remaining: usize },
    TooManyHashtags { found: usize, max: usize },
    /// The CTA falls outside the platform focus window
    FocusWindowMissesCta { focus: usize },
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Warning::Truncated => write!(f, "truncated"),
            Warning::ForbiddenPhrase { phrase } => {
                write!(f, "contains forbidden phrase \"{}\"", phrase)
            }
            Warning::NearLimit { remaining } => write!(f, "within {} chars of limit", remaining),
            Warning::TooManyHashtags { found, max } => {
                write!(f, "{} hashtags exceeds platform maximum of {}", found, max)
            }
            Warning::FocusWindowMissesCta { focus } => {
                write!(f, "call to action falls outside first {} chars", focus)
            }
        }
    }
}

/// Generated copy for one variant slot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Variant {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub platform: Option<PlatformKey>,
    pub text: String,
    pub tone: Tone,
    pub structure: Structure,
    pub cta: Cta,
    /// Character count of `text`
    pub char_count: usize,
    pub max_chars: usize,
    pub warnings: Vec<Warning>,
}

/// Output of generating a whole plan
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationResult {
    pub plan_id: String,
    pub variants: Vec<Variant>,
}

/// Parse the 1-based slot index encoded at the end of a variant id
pub fn variant_index(id: &str) -> Option<usize> {
    id.rsplit_once('-')
        .and_then(|(_, n)| n.parse::<usize>().ok())
}

/// Number of characters as counted against budgets
pub fn char_len(text: &str) -> usize {
    text.chars().count()
}
