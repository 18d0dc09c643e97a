pub mod opportunity;
pub mod plan;
pub mod profile;

pub use opportunity::{Opportunity, OpportunityKind};
pub use plan::{Critique, Explanation, FourYearPlan, YearBreakdown, YearlyPlan, COMPLETED_RATIONALE};
pub use profile::{Grade, ReferenceProfile, SimilarProfile, StudentProfile};
