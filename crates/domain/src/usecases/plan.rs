//! Variant planning use case
//!
//! Planning is pure: it draws (tone, structure, cta) combinations from a seeded
//! generator and binds them to character budgets. No text is produced here.

use sha2::{Digest, Sha256};

use crate::model::{
    Brand, Cta, LengthPlan, LengthVariantSpec, Plan, PlatformKey, Structure, Tone, VariantSpec,
};
use crate::platforms::all_platforms;
use crate::rng::{DEFAULT_SEED, SeededRng};

/// Default slot count for platform plans
pub const DEFAULT_PLATFORM_VARIANTS: usize = 10;

/// Default slot count for length plans
pub const DEFAULT_LENGTH_VARIANTS: usize = 40;

/// Input for platform-based planning
#[derive(Debug, Clone, Default)]
pub struct PlanRequest {
    pub idea: String,
    pub brand: Option<Brand>,
    /// Platforms in scope; `None` or empty means the whole catalog
    pub platforms: Option<Vec<PlatformKey>>,
    pub seed: Option<u32>,
    pub total_variants: Option<usize>,
}

/// Input for length-based planning
#[derive(Debug, Clone, Default)]
pub struct LengthPlanRequest {
    pub idea: String,
    pub brand: Option<Brand>,
    pub max_chars: usize,
    pub seed: Option<u32>,
    pub total_variants: Option<usize>,
}

struct Combination {
    tone: Tone,
    structure: Structure,
    cta: Cta,
}

fn draw_combination(rng: &mut SeededRng) -> Combination {
    Combination {
        tone: *rng.pick(&Tone::ALL),
        structure: *rng.pick(&Structure::ALL),
        cta: *rng.pick(&Cta::ALL),
    }
}

/// Stable plan id derived from every planning input
fn plan_id(kind: &str, seed: u32, total: usize, budget: &str, idea: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(kind.as_bytes());
    hasher.update(seed.to_le_bytes());
    hasher.update((total as u64).to_le_bytes());
    hasher.update(budget.as_bytes());
    hasher.update(idea.as_bytes());
    let digest = format!("{:x}", hasher.finalize());
    format!("plan-{}", &digest[..12])
}

/// Plan `total_variants` slots round-robin across platforms
pub fn plan_copy_variants(request: PlanRequest) -> Plan {
    let seed = request.seed.unwrap_or(DEFAULT_SEED);
    let total = request.total_variants.unwrap_or(DEFAULT_PLATFORM_VARIANTS);
    let platforms = match request.platforms {
        Some(list) if !list.is_empty() => list,
        _ => all_platforms(),
    };

    let mut rng = SeededRng::new(seed);
    let variants: Vec<VariantSpec> = (0..total)
        .map(|slot| {
            let platform = platforms[slot % platforms.len()];
            let combo = draw_combination(&mut rng);
            VariantSpec {
                id: format!("{}-{}", platform, slot + 1),
                platform,
                tone: combo.tone,
                structure: combo.structure,
                cta: combo.cta,
                max_chars: platform.spec().max_chars,
            }
        })
        .collect();

    let budget = platforms
        .iter()
        .map(PlatformKey::as_str)
        .collect::<Vec<_>>()
        .join(",");
    let id = plan_id("platform", seed, total, &budget, &request.idea);

    tracing::debug!(plan_id = %id, seed, variants = variants.len(), "Planned platform variants");

    Plan {
        id,
        idea: request.idea,
        brand: request.brand,
        platforms,
        variants,
    }
}

/// Plan `total_variants` slots sharing one ceiling, each with a target just under it
pub fn plan_copy_variants_by_length(request: LengthPlanRequest) -> LengthPlan {
    let seed = request.seed.unwrap_or(DEFAULT_SEED);
    let total = request.total_variants.unwrap_or(DEFAULT_LENGTH_VARIANTS);
    let max_chars = request.max_chars;

    let mut rng = SeededRng::new(seed);
    let variants: Vec<LengthVariantSpec> = (0..total)
        .map(|slot| {
            let combo = draw_combination(&mut rng);
            let offset = rng.length_offset();
            LengthVariantSpec {
                id: format!("len-{}", slot + 1),
                tone: combo.tone,
                structure: combo.structure,
                cta: combo.cta,
                max_chars,
                target_length: max_chars.saturating_sub(offset).max(1),
            }
        })
        .collect();

    let id = plan_id("length", seed, total, &max_chars.to_string(), &request.idea);

    tracing::debug!(plan_id = %id, seed, max_chars, variants = variants.len(), "Planned length variants");

    LengthPlan {
        id,
        idea: request.idea,
        brand: request.brand,
        max_chars,
        variants,
    }
}
