// Plan generation, critique and the refinement loop that ties them together.
// Capability calls go through llm_client and always have a rule-based fallback.

pub mod critic;
pub mod explainer;
pub mod generator;
pub mod handlers;
pub mod orchestrator;
pub mod prompts;
pub mod refine;
pub mod strategy;
