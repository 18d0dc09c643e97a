// Retrieval stage: similarity ranking over the reference corpus plus opportunity filtering.

pub mod catalog;
pub mod corpus;
pub mod handlers;
pub mod opportunities;
pub mod similarity;

use serde::Serialize;
use tracing::info;

use crate::models::{Opportunity, SimilarProfile, StudentProfile};
use crate::retrieval::catalog::OpportunityCatalog;
use crate::retrieval::corpus::ProfileStore;
use crate::retrieval::opportunities::filter_relevant;
use crate::retrieval::similarity::find_similar;

/// Context handed to plan generation.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Retrieval {
    pub similar_profiles: Vec<SimilarProfile>,
    pub opportunities: Vec<Opportunity>,
}

pub fn run_retrieval(
    profile: &StudentProfile,
    store: &ProfileStore,
    catalog: &OpportunityCatalog,
    top_k: usize,
) -> Retrieval {
    let corpus = store.get_all_references();
    let similar_profiles = find_similar(profile, &corpus, top_k);
    let opportunities = filter_relevant(profile, &catalog.load_all());

    info!(
        corpus = corpus.len(),
        similar = similar_profiles.len(),
        opportunities = opportunities.len(),
        "Retrieval complete"
    );

    Retrieval {
        similar_profiles,
        opportunities,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Grade;

    #[test]
    fn test_run_retrieval_against_seed_data() {
        let dir = tempfile::tempdir().unwrap();
        let store = ProfileStore::open(dir.path().join("profiles.json")).unwrap();
        let catalog = OpportunityCatalog::open(dir.path().join("opportunities.json"));
        let profile = StudentProfile {
            current_grade: Grade::Junior,
            interests: vec!["Computer Science".to_string()],
            target_majors: vec!["Computer Science".to_string()],
            ..Default::default()
        };

        let retrieval = run_retrieval(&profile, &store, &catalog, 1);
        assert_eq!(retrieval.similar_profiles.len(), 1);
        assert_eq!(retrieval.similar_profiles[0].profile.name, "Sample Student 1");
        assert_eq!(retrieval.similar_profiles[0].colleges_admitted[0], "MIT");
        assert!(retrieval
            .opportunities
            .iter()
            .all(|o| o.is_open_to(Grade::Junior)));
        assert!(retrieval
            .opportunities
            .iter()
            .any(|o| o.name == "Science Research Program"));
    }
}
