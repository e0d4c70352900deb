//! Model-backed generation with total heuristic fallback

use std::collections::HashMap;

use crate::{
    model::{Brand, GenerationResult, LengthPlan, Plan, Variant},
    policy::ConstraintPolicy,
    ports::{CopyBrief, CopyRequest, CopyWriter, CopyWriterError, DraftText, WriterOptions},
    usecases::{
        diversify::diversify,
        generate::{
            Slot, complete_slot, generate_copy_from_plan, generate_from_length_plan,
            length_slots, platform_slots,
        },
    },
};

/// Generator that asks a [`CopyWriter`] for every plan and falls back to
/// heuristics for the whole plan when the writer fails
pub struct LlmCopyGenerator<W> {
    writer: W,
}

impl<W: CopyWriter> LlmCopyGenerator<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    /// Generate a platform plan with one model call
    pub async fn generate_copy_from_plan_llm(
        &self,
        plan: &Plan,
        options: WriterOptions,
    ) -> GenerationResult {
        let slots = platform_slots(plan);
        let policy = ConstraintPolicy::new(plan.brand.as_ref());

        match self.write_slots(&plan.idea, plan.brand.as_ref(), &slots, options).await {
            Ok(texts) => GenerationResult {
                plan_id: plan.id.clone(),
                variants: finish(&slots, texts, &plan.idea, &policy),
            },
            Err(e) => {
                log_fallback(&plan.id, &e);
                generate_copy_from_plan(plan)
            }
        }
    }

    /// Generate a length plan with one model call, then diversify
    pub async fn generate_from_length_plan_llm(
        &self,
        plan: &LengthPlan,
        options: WriterOptions,
    ) -> GenerationResult {
        let slots = length_slots(plan);
        let policy = ConstraintPolicy::new(plan.brand.as_ref());

        match self.write_slots(&plan.idea, plan.brand.as_ref(), &slots, options).await {
            Ok(texts) => {
                let mut variants = finish(&slots, texts, &plan.idea, &policy);
                diversify(&mut variants, &slots, &plan.idea, &policy);
                GenerationResult {
                    plan_id: plan.id.clone(),
                    variants,
                }
            }
            Err(e) => {
                log_fallback(&plan.id, &e);
                generate_from_length_plan(plan)
            }
        }
    }

    /// One writer call; texts are returned in slot order or not at all
    async fn write_slots(
        &self,
        idea: &str,
        brand: Option<&Brand>,
        slots: &[Slot],
        options: WriterOptions,
    ) -> Result<Vec<String>, CopyWriterError> {
        let request = CopyRequest {
            idea: idea.to_string(),
            brand: brand.cloned(),
            variants: slots.iter().map(brief).collect(),
            options,
        };

        tracing::info!(variants = slots.len(), "Requesting copy from model");

        let drafts = self.writer.write(request).await?;
        map_by_id(slots, drafts)
    }
}

fn brief(slot: &Slot) -> CopyBrief {
    CopyBrief {
        id: slot.id.clone(),
        platform: slot.platform,
        tone: slot.tone,
        structure: slot.structure,
        cta: slot.cta,
        max_chars: slot.max_chars,
        target_length: slot.target_length,
    }
}

/// Map model texts back onto slot order; any missing id rejects the whole response
fn map_by_id(slots: &[Slot], drafts: Vec<DraftText>) -> Result<Vec<String>, CopyWriterError> {
    let mut by_id: HashMap<String, String> = HashMap::with_capacity(drafts.len());
    for draft in drafts {
        by_id.entry(draft.id).or_insert(draft.text);
    }

    slots
        .iter()
        .map(|slot| {
            by_id
                .remove(&slot.id)
                .filter(|text| !text.trim().is_empty())
                .ok_or_else(|| {
                    CopyWriterError::InvalidFormat(format!("No text for variant {}", slot.id))
                })
        })
        .collect()
}

fn finish(
    slots: &[Slot],
    texts: Vec<String>,
    idea: &str,
    policy: &ConstraintPolicy,
) -> Vec<Variant> {
    slots
        .iter()
        .zip(texts)
        .map(|(slot, text)| {
            complete_slot(slot, text.trim().to_string(), idea, policy, |salt| {
                slot.draft(idea, salt)
            })
        })
        .collect()
}

fn log_fallback(plan_id: &str, error: &CopyWriterError) {
    match error {
        CopyWriterError::NotConfigured => {
            tracing::debug!(plan_id = %plan_id, "No copy writer configured, using heuristics");
        }
        other => {
            tracing::warn!(plan_id = %plan_id, error = %other, "Copy writer failed, falling back to heuristics");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::char_len;
    use crate::text::{echoes_idea, opening_bigram};
    use crate::usecases::plan::{
        LengthPlanRequest, PlanRequest, plan_copy_variants, plan_copy_variants_by_length,
    };
    use async_trait::async_trait;
    use std::collections::HashSet;
    use std::sync::Mutex;

    const IDEA: &str = "Cut your onboarding time in half";

    enum Behavior {
        Fail,
        Unconfigured,
        Echo,
        Fixed(String),
        MatchCta(String),
        DropFirst,
    }

    struct FakeWriter {
        behavior: Behavior,
        calls: Mutex<usize>,
    }

    impl FakeWriter {
        fn new(behavior: Behavior) -> Self {
            Self {
                behavior,
                calls: Mutex::new(0),
            }
        }

        fn calls(&self) -> usize {
            *self.calls.lock().unwrap()
        }
    }

    #[async_trait]
    impl CopyWriter for FakeWriter {
        async fn write(&self, request: CopyRequest) -> Result<Vec<DraftText>, CopyWriterError> {
            *self.calls.lock().unwrap() += 1;
            let text_for = |text: String| {
                request
                    .variants
                    .iter()
                    .map(|v| DraftText {
                        id: v.id.clone(),
                        text: text.clone(),
                    })
                    .collect::<Vec<_>>()
            };
            match &self.behavior {
                Behavior::Fail => Err(CopyWriterError::Api("boom".to_string())),
                Behavior::Unconfigured => Err(CopyWriterError::NotConfigured),
                Behavior::Echo => Ok(text_for(format!("{} today. Shop now", request.idea))),
                Behavior::Fixed(text) => Ok(text_for(text.clone())),
                Behavior::MatchCta(lead_in) => Ok(request
                    .variants
                    .iter()
                    .map(|v| DraftText {
                        id: v.id.clone(),
                        text: format!("{} {}", lead_in, v.cta),
                    })
                    .collect()),
                Behavior::DropFirst => {
                    let mut drafts = text_for("Fine copy here. Learn more".to_string());
                    drafts.remove(0);
                    Ok(drafts)
                }
            }
        }
    }

    fn platform_plan() -> Plan {
        plan_copy_variants(PlanRequest {
            idea: IDEA.to_string(),
            seed: Some(1),
            total_variants: Some(8),
            ..Default::default()
        })
    }

    fn length_plan(max_chars: usize) -> LengthPlan {
        plan_copy_variants_by_length(LengthPlanRequest {
            idea: IDEA.to_string(),
            max_chars,
            seed: Some(2),
            total_variants: Some(12),
            ..Default::default()
        })
    }

    #[tokio::test]
    async fn test_failure_falls_back_to_heuristics() {
        let plan = platform_plan();
        let writer = FakeWriter::new(Behavior::Fail);
        let generator = LlmCopyGenerator::new(&writer);

        let result = generator
            .generate_copy_from_plan_llm(&plan, WriterOptions::default())
            .await;

        assert_eq!(result, generate_copy_from_plan(&plan));
        assert_eq!(writer.calls(), 1);
    }

    #[tokio::test]
    async fn test_unconfigured_falls_back_for_length_plans() {
        let plan = length_plan(100);
        let generator = LlmCopyGenerator::new(FakeWriter::new(Behavior::Unconfigured));

        let result = generator
            .generate_from_length_plan_llm(&plan, WriterOptions::default())
            .await;

        assert_eq!(result.plan_id, plan.id);
        assert_eq!(result.variants.len(), plan.variants.len());
        assert_eq!(result, generate_from_length_plan(&plan));
    }

    #[tokio::test]
    async fn test_missing_id_rejects_whole_response() {
        let plan = platform_plan();
        let generator = LlmCopyGenerator::new(FakeWriter::new(Behavior::DropFirst));

        let result = generator
            .generate_copy_from_plan_llm(&plan, WriterOptions::default())
            .await;

        assert_eq!(result, generate_copy_from_plan(&plan));
    }

    #[tokio::test]
    async fn test_model_text_is_sanitized() {
        let plan = platform_plan();
        let generator = LlmCopyGenerator::new(FakeWriter::new(Behavior::Echo));

        let result = generator
            .generate_copy_from_plan_llm(&plan, WriterOptions::default())
            .await;

        assert_eq!(result.variants.len(), plan.variants.len());
        for variant in &result.variants {
            assert!(!echoes_idea(&variant.text, IDEA), "{}", variant.text);
        }
    }

    #[tokio::test]
    async fn test_model_quoting_a_short_idea_is_sanitized() {
        let idea = "onboarding time";
        let plan = plan_copy_variants(PlanRequest {
            idea: idea.to_string(),
            seed: Some(1),
            total_variants: Some(6),
            ..Default::default()
        });
        let generator = LlmCopyGenerator::new(FakeWriter::new(Behavior::Fixed(
            "Love onboarding time? Shop now".to_string(),
        )));

        let result = generator
            .generate_copy_from_plan_llm(&plan, WriterOptions::default())
            .await;

        assert_eq!(result.variants.len(), 6);
        for variant in &result.variants {
            assert!(!echoes_idea(&variant.text, idea), "{}", variant.text);
        }
    }

    #[tokio::test]
    async fn test_diversified_model_text_keeps_its_cta() {
        let plan = plan_copy_variants_by_length(LengthPlanRequest {
            idea: IDEA.to_string(),
            max_chars: 80,
            seed: Some(5),
            total_variants: Some(20),
            ..Default::default()
        });
        let generator = LlmCopyGenerator::new(FakeWriter::new(Behavior::MatchCta(
            "Fast, easy results today with better tooling.".to_string(),
        )));

        let result = generator
            .generate_from_length_plan_llm(&plan, WriterOptions::default())
            .await;

        let mut openings = HashSet::new();
        for variant in &result.variants {
            assert!(char_len(&variant.text) <= 80, "{}", variant.text);
            assert!(openings.insert(opening_bigram(&variant.text)), "{}", variant.text);
            assert!(variant.text.ends_with(variant.cta.as_str()), "{}", variant.text);
            assert_eq!(variant.text.matches(variant.cta.as_str()).count(), 1);
        }
    }

    #[tokio::test]
    async fn test_model_text_is_enforced_and_diversified() {
        let plan = length_plan(60);
        let long = format!("{} Shop now", "Wonderful words about a product ".repeat(5));
        let generator = LlmCopyGenerator::new(FakeWriter::new(Behavior::Fixed(long)));

        let result = generator
            .generate_from_length_plan_llm(&plan, WriterOptions::default())
            .await;

        let mut openings = HashSet::new();
        for variant in &result.variants {
            assert!(char_len(&variant.text) <= 60, "{}", variant.text);
            assert!(openings.insert(opening_bigram(&variant.text)));
        }
    }
}
