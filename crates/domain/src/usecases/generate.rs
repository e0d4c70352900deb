//! Heuristic copy generation
//!
//! Fully offline: every variant is composed from a tone lead, a structure
//! template around a paraphrase of the idea, and the CTA. The same slot
//! pipeline (sanitize, fit, enforce) also finishes model-written text.

use crate::model::{
    Cta, GenerationResult, LengthPlan, LengthVariantSpec, Plan, PlatformKey, Structure, Tone,
    Variant, VariantSpec, Warning, char_len, variant_index,
};
use crate::policy::{ConstraintPolicy, Enforced};
use crate::text::{break_idea_runs, echoes_idea, ensure_no_echo, paraphrase};
use crate::usecases::diversify::diversify;
use crate::usecases::fit::fit_to_length;

/// Opening words for each tone
pub fn tone_lead(tone: Tone) -> &'static str {
    match tone {
        Tone::Witty => "Plot twist:",
        Tone::Bold => "No more excuses.",
        Tone::Warm => "We hear you.",
        Tone::Authoritative => "The evidence is in:",
        Tone::Playful => "Fun idea:",
    }
}

/// Wrap a paraphrase in the sentence pattern of a structure
pub fn structure_sentence(structure: Structure, paraphrase: &str) -> String {
    match structure {
        Structure::QuestionLed => format!("What if {}?", paraphrase),
        Structure::Contrast => format!("Forget the old way; try {}.", paraphrase),
        Structure::ProblemSolution => format!("Stuck in the grind? Meet {}.", paraphrase),
        Structure::BenefitFirst => format!("Get {} starting today.", paraphrase),
        Structure::SocialProof => format!("Teams everywhere are switching to {}.", paraphrase),
    }
}

/// Compose `{tone lead} {structure(paraphrase)} {cta}`
pub fn heuristic_draft(idea: &str, tone: Tone, structure: Structure, cta: Cta, salt: u32) -> String {
    format!(
        "{} {} {}",
        tone_lead(tone),
        structure_sentence(structure, &paraphrase(idea, salt)),
        cta
    )
}

/// Generation parameters shared by both plan kinds
#[derive(Debug, Clone)]
pub(crate) struct Slot {
    pub id: String,
    pub platform: Option<PlatformKey>,
    pub tone: Tone,
    pub structure: Structure,
    pub cta: Cta,
    pub max_chars: usize,
    pub target_length: Option<usize>,
    /// Per-variant jitter, the slot index encoded in the id
    pub salt: u32,
}

impl Slot {
    pub(crate) fn from_platform(spec: &VariantSpec, position: usize) -> Self {
        Self {
            id: spec.id.clone(),
            platform: Some(spec.platform),
            tone: spec.tone,
            structure: spec.structure,
            cta: spec.cta,
            max_chars: spec.max_chars,
            target_length: None,
            salt: salt_for(&spec.id, position),
        }
    }

    pub(crate) fn from_length(spec: &LengthVariantSpec, position: usize) -> Self {
        Self {
            id: spec.id.clone(),
            platform: None,
            tone: spec.tone,
            structure: spec.structure,
            cta: spec.cta,
            max_chars: spec.max_chars,
            target_length: Some(spec.target_length),
            salt: salt_for(&spec.id, position),
        }
    }

    pub(crate) fn draft(&self, idea: &str, salt: u32) -> String {
        heuristic_draft(idea, self.tone, self.structure, self.cta, salt)
    }
}

fn salt_for(id: &str, position: usize) -> u32 {
    variant_index(id).unwrap_or(position + 1) as u32
}

pub(crate) fn platform_slots(plan: &Plan) -> Vec<Slot> {
    plan.variants
        .iter()
        .enumerate()
        .map(|(i, spec)| Slot::from_platform(spec, i))
        .collect()
}

pub(crate) fn length_slots(plan: &LengthPlan) -> Vec<Slot> {
    plan.variants
        .iter()
        .enumerate()
        .map(|(i, spec)| Slot::from_length(spec, i))
        .collect()
}

/// Sanitize, fit and enforce a raw text for a slot
pub(crate) fn complete_slot(
    slot: &Slot,
    raw: String,
    idea: &str,
    policy: &ConstraintPolicy,
    rebuild: impl FnMut(u32) -> String,
) -> Variant {
    let clean = ensure_no_echo(raw, idea, slot.salt, rebuild);
    let fitted = match slot.target_length {
        Some(target) => fit_to_length(&clean, target, slot.cta.as_str(), slot.salt),
        None => clean,
    };
    let enforced = finalize(&fitted, idea, slot, policy);

    Variant {
        id: slot.id.clone(),
        platform: slot.platform,
        char_count: char_len(&enforced.text),
        text: enforced.text,
        tone: slot.tone,
        structure: slot.structure,
        cta: slot.cta,
        max_chars: slot.max_chars,
        warnings: enforced.warnings,
    }
}

/// Constraint enforcement, run last. Truncation can cut a word into an idea
/// word, so the echo check runs once more on the emitted text.
fn finalize(text: &str, idea: &str, slot: &Slot, policy: &ConstraintPolicy) -> Enforced {
    let spec = slot.platform.map(|p| p.spec());
    let enforced = policy.enforce(text, slot.max_chars, spec.as_ref(), slot.cta.as_str());
    if !echoes_idea(&enforced.text, idea) {
        return enforced;
    }

    let truncated = enforced.warnings.contains(&Warning::Truncated);
    let cleaned = break_idea_runs(&enforced.text, idea);
    let mut again = policy.enforce(&cleaned, slot.max_chars, spec.as_ref(), slot.cta.as_str());
    if truncated && !again.warnings.contains(&Warning::Truncated) {
        again.warnings.insert(0, Warning::Truncated);
    }
    again
}

pub(crate) fn heuristic_variant(slot: &Slot, idea: &str, policy: &ConstraintPolicy) -> Variant {
    complete_slot(slot, slot.draft(idea, slot.salt), idea, policy, |salt| {
        slot.draft(idea, salt)
    })
}

/// Generate a platform plan heuristically
pub fn generate_copy_from_plan(plan: &Plan) -> GenerationResult {
    let policy = ConstraintPolicy::new(plan.brand.as_ref());
    let variants = platform_slots(plan)
        .iter()
        .map(|slot| heuristic_variant(slot, &plan.idea, &policy))
        .collect();

    GenerationResult {
        plan_id: plan.id.clone(),
        variants,
    }
}

/// Generate a length plan heuristically, including the diversification pass
pub fn generate_from_length_plan(plan: &LengthPlan) -> GenerationResult {
    let policy = ConstraintPolicy::new(plan.brand.as_ref());
    let slots = length_slots(plan);
    let mut variants: Vec<Variant> = slots
        .iter()
        .map(|slot| heuristic_variant(slot, &plan.idea, &policy))
        .collect();

    diversify(&mut variants, &slots, &plan.idea, &policy);

    GenerationResult {
        plan_id: plan.id.clone(),
        variants,
    }
}
