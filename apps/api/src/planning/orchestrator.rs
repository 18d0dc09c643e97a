//! Pipeline driver: normalize → retrieve → (generate → critique)* → explain.
//!
//! Normalize and retrieve run once. The generate/critique pair runs until a critique
//! clears the quality gate or the iteration budget is spent; the last plan is explained
//! either way.

use std::sync::Arc;

use serde::Serialize;
use serde_json::Value;
use tracing::{debug, info};

use crate::models::{Critique, Explanation, FourYearPlan, StudentProfile};
use crate::planning::refine::apply_critique_patches;
use crate::planning::strategy::Producers;
use crate::profile::normalize::normalize;
use crate::retrieval::catalog::OpportunityCatalog;
use crate::retrieval::corpus::ProfileStore;
use crate::retrieval::run_retrieval;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PipelineOptions {
    /// Values below 1 are treated as 1.
    pub max_iterations: usize,
    pub min_score_threshold: f64,
    pub top_k: usize,
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self {
            max_iterations: 3,
            min_score_threshold: 0.7,
            top_k: 5,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IterationRecord {
    /// 1-based.
    pub iteration: usize,
    pub score: f64,
    pub needs_revision: bool,
    pub weaknesses: Vec<String>,
}

impl IterationRecord {
    fn new(iteration: usize, critique: &Critique) -> Self {
        Self {
            iteration,
            score: critique.score,
            needs_revision: critique.needs_revision,
            weaknesses: critique.weaknesses.clone(),
        }
    }
}

/// Which producer variant handled each stage.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Backends {
    pub planner: &'static str,
    pub critic: &'static str,
    pub explainer: &'static str,
}

#[derive(Debug, Clone, Serialize)]
pub struct PipelineResult {
    pub profile: StudentProfile,
    pub plan: FourYearPlan,
    pub critique: Critique,
    pub explanation: Explanation,
    pub iterations: usize,
    pub iteration_history: Vec<IterationRecord>,
    pub final_score: f64,
    pub backends: Backends,
}

pub struct Orchestrator {
    store: Arc<ProfileStore>,
    catalog: Arc<OpportunityCatalog>,
    producers: Producers,
    defaults: PipelineOptions,
}

impl Orchestrator {
    pub fn new(
        store: Arc<ProfileStore>,
        catalog: Arc<OpportunityCatalog>,
        producers: Producers,
        defaults: PipelineOptions,
    ) -> Self {
        Self {
            store,
            catalog,
            producers,
            defaults,
        }
    }

    pub fn defaults(&self) -> PipelineOptions {
        self.defaults
    }

    pub fn producers(&self) -> &Producers {
        &self.producers
    }

    /// Runs the full pipeline on loosely-typed input. Never fails.
    pub async fn run_pipeline(&self, raw: &Value, options: PipelineOptions) -> PipelineResult {
        self.run_for_profile(normalize(raw), options).await
    }

    pub async fn run_for_profile(
        &self,
        profile: StudentProfile,
        options: PipelineOptions,
    ) -> PipelineResult {
        let max_iterations = options.max_iterations.max(1);
        info!(
            grade = profile.current_grade.value(),
            max_iterations,
            threshold = options.min_score_threshold,
            "Starting planning pipeline"
        );

        let retrieval = run_retrieval(&profile, &self.store, &self.catalog, options.top_k);
        let Producers {
            planner,
            critic,
            explainer,
            ..
        } = &self.producers;

        let mut plan = planner.produce(&profile, &retrieval, None).await;
        let mut critique = critic.critique(&profile, &plan).await;
        let mut history = vec![IterationRecord::new(1, &critique)];
        log_iteration(1, &critique);

        while !is_accepted(&critique, options.min_score_threshold) && history.len() < max_iterations
        {
            let regenerated = planner.produce(&profile, &retrieval, Some(&critique)).await;
            plan = apply_critique_patches(&profile, regenerated, &critique);
            critique = critic.critique(&profile, &plan).await;

            let iteration = history.len() + 1;
            log_iteration(iteration, &critique);
            history.push(IterationRecord::new(iteration, &critique));
        }

        let accepted = is_accepted(&critique, options.min_score_threshold);
        info!(
            iterations = history.len(),
            score = critique.score,
            accepted,
            "Planning loop finished"
        );

        let explanation = explainer.explain(&profile, &plan, &critique).await;

        PipelineResult {
            iterations: history.len(),
            final_score: critique.score,
            backends: Backends {
                planner: planner.backend(),
                critic: critic.backend(),
                explainer: explainer.backend(),
            },
            profile,
            plan,
            critique,
            explanation,
            iteration_history: history,
        }
    }
}

fn is_accepted(critique: &Critique, threshold: f64) -> bool {
    critique.score >= threshold && !critique.needs_revision
}

fn log_iteration(iteration: usize, critique: &Critique) {
    debug!(
        iteration,
        score = critique.score,
        needs_revision = critique.needs_revision,
        weaknesses = critique.weaknesses.len(),
        "Critique complete"
    );
}
