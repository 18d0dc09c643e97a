//! Producer strategies for each pipeline stage.
//!
//! Every stage has a rule-based producer and a capability-backed producer behind the same
//! trait. Capability-backed producers validate what the model returns and fall back to
//! the rule-based producer on any error, so callers never see a failure.
//!
//! Carried in the orchestrator as `Arc<dyn ...>` and chosen once at startup by
//! `Producers::select`.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{info, warn};

use crate::llm_client::prompts::{GRADE_INSTRUCTION, GROUNDING_INSTRUCTION, JSON_ONLY_SYSTEM};
use crate::llm_client::{generate_json, LlmError, TextCapability};
use crate::models::{Critique, Explanation, FourYearPlan, Grade, StudentProfile, YearlyPlan};
use crate::planning::critic::critique_plan;
use crate::planning::explainer::explain;
use crate::planning::generator::generate_plan;
use crate::planning::prompts::{
    CRITIQUE_PROMPT_TEMPLATE, CRITIQUE_SYSTEM, EXPLAIN_PROMPT_TEMPLATE, EXPLAIN_SYSTEM,
    PLAN_PROMPT_TEMPLATE, PLAN_SYSTEM,
};
use crate::profile::extract::{
    CapabilityProfileExtractor, KeywordProfileExtractor, ProfileExtractor,
};
use crate::retrieval::Retrieval;

// ────────────────────────────────────────────────────────────────────────────
// Traits
// ────────────────────────────────────────────────────────────────────────────

#[async_trait]
pub trait PlanProducer: Send + Sync {
    fn backend(&self) -> &'static str;

    /// `previous` is the critique of the last iteration, if any.
    async fn produce(
        &self,
        profile: &StudentProfile,
        retrieval: &Retrieval,
        previous: Option<&Critique>,
    ) -> FourYearPlan;
}

#[async_trait]
pub trait PlanCritic: Send + Sync {
    fn backend(&self) -> &'static str;

    async fn critique(&self, profile: &StudentProfile, plan: &FourYearPlan) -> Critique;
}

#[async_trait]
pub trait PlanExplainer: Send + Sync {
    fn backend(&self) -> &'static str;

    async fn explain(
        &self,
        profile: &StudentProfile,
        plan: &FourYearPlan,
        critique: &Critique,
    ) -> Explanation;
}

// ────────────────────────────────────────────────────────────────────────────
// Rule-based producers
// ────────────────────────────────────────────────────────────────────────────

pub struct RuleBasedPlanner;

#[async_trait]
impl PlanProducer for RuleBasedPlanner {
    fn backend(&self) -> &'static str {
        "rule_based"
    }

    async fn produce(
        &self,
        profile: &StudentProfile,
        retrieval: &Retrieval,
        _previous: Option<&Critique>,
    ) -> FourYearPlan {
        generate_plan(profile, retrieval)
    }
}

pub struct RuleBasedCritic;

#[async_trait]
impl PlanCritic for RuleBasedCritic {
    fn backend(&self) -> &'static str {
        "rule_based"
    }

    async fn critique(&self, profile: &StudentProfile, plan: &FourYearPlan) -> Critique {
        critique_plan(profile, plan)
    }
}

pub struct RuleBasedExplainer;

#[async_trait]
impl PlanExplainer for RuleBasedExplainer {
    fn backend(&self) -> &'static str {
        "rule_based"
    }

    async fn explain(
        &self,
        profile: &StudentProfile,
        plan: &FourYearPlan,
        critique: &Critique,
    ) -> Explanation {
        explain(profile, plan, critique)
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Capability-backed producers
// ────────────────────────────────────────────────────────────────────────────

fn system_prompt(role: &str) -> String {
    format!("{role} {JSON_ONLY_SYSTEM}")
}

pub struct CapabilityPlanner {
    capability: Arc<dyn TextCapability>,
}

impl CapabilityPlanner {
    pub fn new(capability: Arc<dyn TextCapability>) -> Self {
        Self { capability }
    }

    async fn try_produce(
        &self,
        profile: &StudentProfile,
        retrieval: &Retrieval,
        previous: Option<&Critique>,
    ) -> Result<FourYearPlan, LlmError> {
        let revision_notes = match previous {
            Some(critique) if !critique.weaknesses.is_empty() => format!(
                "ADDRESS THESE WEAKNESSES FROM THE PREVIOUS DRAFT:\n- {}",
                critique.weaknesses.join("\n- ")
            ),
            _ => String::new(),
        };
        let prompt = PLAN_PROMPT_TEMPLATE
            .replace("{grounding_instruction}", GROUNDING_INSTRUCTION)
            .replace("{grade_instruction}", GRADE_INSTRUCTION)
            .replace("{profile_json}", &serde_json::to_string_pretty(profile)?)
            .replace(
                "{similar_json}",
                &serde_json::to_string_pretty(&retrieval.similar_profiles)?,
            )
            .replace(
                "{opportunities_json}",
                &serde_json::to_string_pretty(&retrieval.opportunities)?,
            )
            .replace("{revision_notes}", &revision_notes);

        let mut plan: FourYearPlan =
            generate_json(self.capability.as_ref(), &prompt, &system_prompt(PLAN_SYSTEM)).await?;
        if !plan.grades_consistent() {
            return Err(LlmError::Invalid(
                "yearly plans are not in grade order 9-12".to_string(),
            ));
        }
        clear_completed_years(&mut plan, profile.current_grade);
        Ok(plan)
    }
}

/// Forces every grade before `current` to the empty completed plan.
fn clear_completed_years(plan: &mut FourYearPlan, current: Grade) {
    for grade in Grade::ALL.into_iter().filter(|g| *g < current) {
        *plan.year_mut(grade) = YearlyPlan::completed(grade);
    }
}

#[async_trait]
impl PlanProducer for CapabilityPlanner {
    fn backend(&self) -> &'static str {
        "llm"
    }

    async fn produce(
        &self,
        profile: &StudentProfile,
        retrieval: &Retrieval,
        previous: Option<&Critique>,
    ) -> FourYearPlan {
        match self.try_produce(profile, retrieval, previous).await {
            Ok(plan) => plan,
            Err(e) => {
                warn!("Plan capability failed, using rule-based generator: {e}");
                generate_plan(profile, retrieval)
            }
        }
    }
}

pub struct CapabilityCritic {
    capability: Arc<dyn TextCapability>,
}

impl CapabilityCritic {
    pub fn new(capability: Arc<dyn TextCapability>) -> Self {
        Self { capability }
    }

    async fn try_critique(
        &self,
        profile: &StudentProfile,
        plan: &FourYearPlan,
    ) -> Result<Critique, LlmError> {
        let prompt = CRITIQUE_PROMPT_TEMPLATE
            .replace("{profile_json}", &serde_json::to_string_pretty(profile)?)
            .replace("{plan_json}", &serde_json::to_string_pretty(plan)?);

        let critique: Critique =
            generate_json(self.capability.as_ref(), &prompt, &system_prompt(CRITIQUE_SYSTEM))
                .await?;
        if !(0.0..=1.0).contains(&critique.score) {
            return Err(LlmError::Invalid(format!(
                "critique score {} outside [0, 1]",
                critique.score
            )));
        }
        Ok(critique)
    }
}

#[async_trait]
impl PlanCritic for CapabilityCritic {
    fn backend(&self) -> &'static str {
        "llm"
    }

    async fn critique(&self, profile: &StudentProfile, plan: &FourYearPlan) -> Critique {
        match self.try_critique(profile, plan).await {
            Ok(critique) => critique,
            Err(e) => {
                warn!("Critique capability failed, using rule-based critic: {e}");
                critique_plan(profile, plan)
            }
        }
    }
}

pub struct CapabilityExplainer {
    capability: Arc<dyn TextCapability>,
}

impl CapabilityExplainer {
    pub fn new(capability: Arc<dyn TextCapability>) -> Self {
        Self { capability }
    }

    async fn try_explain(
        &self,
        profile: &StudentProfile,
        plan: &FourYearPlan,
        critique: &Critique,
    ) -> Result<Explanation, LlmError> {
        let prompt = EXPLAIN_PROMPT_TEMPLATE
            .replace("{profile_json}", &serde_json::to_string_pretty(profile)?)
            .replace("{plan_json}", &serde_json::to_string_pretty(plan)?)
            .replace("{critique_json}", &serde_json::to_string_pretty(critique)?);

        let explanation: Explanation =
            generate_json(self.capability.as_ref(), &prompt, &system_prompt(EXPLAIN_SYSTEM))
                .await?;
        if explanation.summary.trim().is_empty() {
            return Err(LlmError::Invalid("explanation summary is empty".to_string()));
        }
        Ok(explanation)
    }
}

#[async_trait]
impl PlanExplainer for CapabilityExplainer {
    fn backend(&self) -> &'static str {
        "llm"
    }

    async fn explain(
        &self,
        profile: &StudentProfile,
        plan: &FourYearPlan,
        critique: &Critique,
    ) -> Explanation {
        match self.try_explain(profile, plan, critique).await {
            Ok(explanation) => explanation,
            Err(e) => {
                warn!("Explanation capability failed, using templates: {e}");
                explain(profile, plan, critique)
            }
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Selection
// ────────────────────────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct Producers {
    pub planner: Arc<dyn PlanProducer>,
    pub critic: Arc<dyn PlanCritic>,
    pub explainer: Arc<dyn PlanExplainer>,
    pub extractor: Arc<dyn ProfileExtractor>,
}

impl Producers {
    pub fn rule_based() -> Self {
        Self {
            planner: Arc::new(RuleBasedPlanner),
            critic: Arc::new(RuleBasedCritic),
            explainer: Arc::new(RuleBasedExplainer),
            extractor: Arc::new(KeywordProfileExtractor),
        }
    }

    /// Capability-backed producers when a capability is available, rule-based otherwise.
    pub fn select(capability: Option<Arc<dyn TextCapability>>) -> Self {
        match capability {
            Some(capability) => {
                info!("Generation capability available: using capability-backed producers");
                Self {
                    planner: Arc::new(CapabilityPlanner::new(capability.clone())),
                    critic: Arc::new(CapabilityCritic::new(capability.clone())),
                    explainer: Arc::new(CapabilityExplainer::new(capability.clone())),
                    extractor: Arc::new(CapabilityProfileExtractor::new(capability)),
                }
            }
            None => {
                info!("No generation capability configured: using rule-based producers");
                Self::rule_based()
            }
        }
    }
}
