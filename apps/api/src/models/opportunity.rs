use serde::{Deserialize, Serialize};

use crate::models::profile::Grade;

/// Opportunity category. General-purpose kinds bypass the interest filter.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OpportunityKind {
    Academic,
    #[default]
    Extracurricular,
    Competition,
    Internship,
}

impl OpportunityKind {
    pub fn is_general(self) -> bool {
        matches!(self, OpportunityKind::Academic | OpportunityKind::Extracurricular)
    }
}

/// Read-only catalog entry: a competition, internship, program or club.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Opportunity {
    pub name: String,
    #[serde(rename = "type", default)]
    pub kind: OpportunityKind,
    #[serde(default)]
    pub grade_levels: Vec<Grade>,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub requirements: Vec<String>,
    #[serde(default)]
    pub benefits: Vec<String>,
    #[serde(default)]
    pub deadline: Option<String>,
}

impl Opportunity {
    pub fn is_open_to(&self, grade: Grade) -> bool {
        self.grade_levels.contains(&grade)
    }

    /// True if any interest appears (case-insensitively) in the name or description.
    pub fn matches_any_interest(&self, interests: &[String]) -> bool {
        let name = self.name.to_lowercase();
        let description = self.description.to_lowercase();
        interests.iter().any(|interest| {
            let needle = interest.to_lowercase();
            name.contains(&needle) || description.contains(&needle)
        })
    }
}
