//! Application use cases / business logic

pub mod diversify;
pub mod fit;
pub mod generate;
pub mod llm_generate;
pub mod plan;

pub use fit::fit_to_length;
pub use generate::{generate_copy_from_plan, generate_from_length_plan, heuristic_draft};
pub use llm_generate::LlmCopyGenerator;
pub use plan::{
    DEFAULT_LENGTH_VARIANTS, DEFAULT_PLATFORM_VARIANTS, LengthPlanRequest, PlanRequest,
    plan_copy_variants, plan_copy_variants_by_length,
};
