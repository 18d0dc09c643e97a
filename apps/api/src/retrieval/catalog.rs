//! Opportunity catalog: read-only reference data loaded once from a JSON file.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::{info, warn};

use crate::models::{Grade, Opportunity, OpportunityKind};

const LOOKUP_LIMIT: usize = 10;

pub struct OpportunityCatalog {
    opportunities: Vec<Opportunity>,
}

impl OpportunityCatalog {
    /// Loads the catalog. An absent or unreadable file yields the built-in seed list.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let opportunities = match read_catalog(&path) {
            Ok(opportunities) => opportunities,
            Err(e) => {
                warn!("Opportunity catalog unavailable, using seed list: {e:#}");
                seed_opportunities()
            }
        };
        info!(
            "Opportunity catalog loaded from {}: {} entries",
            path.display(),
            opportunities.len()
        );
        Self { opportunities }
    }

    pub fn load_all(&self) -> Vec<Opportunity> {
        self.opportunities.clone()
    }

    /// Opportunities open to `grade`, optionally narrowed to those whose name or
    /// description contains one of `interests`. At most 10, catalog order.
    pub fn for_grade(&self, grade: Grade, interests: &[String]) -> Vec<Opportunity> {
        let needles: Vec<String> = interests
            .iter()
            .map(|i| i.trim().to_lowercase())
            .filter(|i| !i.is_empty())
            .collect();

        self.opportunities
            .iter()
            .filter(|opp| opp.is_open_to(grade))
            .filter(|opp| {
                if needles.is_empty() {
                    return true;
                }
                let text = format!("{} {}", opp.name, opp.description).to_lowercase();
                needles.iter().any(|needle| text.contains(needle))
            })
            .take(LOOKUP_LIMIT)
            .cloned()
            .collect()
    }
}

fn read_catalog(path: &Path) -> Result<Vec<Opportunity>> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("Failed to read opportunities from {}", path.display()))?;
    serde_json::from_str(&contents).context("Failed to parse opportunities JSON")
}

fn opportunity(
    name: &str,
    kind: OpportunityKind,
    grade_levels: &[Grade],
    description: &str,
    requirements: &[&str],
    benefits: &[&str],
) -> Opportunity {
    Opportunity {
        name: name.to_string(),
        kind,
        grade_levels: grade_levels.to_vec(),
        description: description.to_string(),
        requirements: requirements.iter().map(|s| s.to_string()).collect(),
        benefits: benefits.iter().map(|s| s.to_string()).collect(),
        deadline: None,
    }
}

fn seed_opportunities() -> Vec<Opportunity> {
    use Grade::*;
    vec![
        opportunity(
            "USAMO (USA Mathematical Olympiad)",
            OpportunityKind::Competition,
            &[Junior, Senior],
            "Prestigious math competition",
            &["Strong math background", "Qualification through AMC"],
            &["National recognition", "College admissions boost"],
        ),
        opportunity(
            "Science Research Program",
            OpportunityKind::Academic,
            &[Sophomore, Junior, Senior],
            "Independent research opportunity",
            &["GPA 3.5+", "Teacher recommendation"],
            &["Research experience", "Publication opportunity"],
        ),
        opportunity(
            "Summer Internship - Tech Company",
            OpportunityKind::Internship,
            &[Junior, Senior],
            "Real-world work experience",
            &["Programming skills", "Application"],
            &["Industry experience", "Networking"],
        ),
        opportunity(
            "American Computer Science League (ACSL)",
            OpportunityKind::Competition,
            &[Freshman, Sophomore, Junior, Senior],
            "Computer science and programming contest held in school rounds",
            &["School registration"],
            &["Programming practice", "National finals invitation"],
        ),
        opportunity(
            "Science Olympiad",
            OpportunityKind::Competition,
            &[Freshman, Sophomore, Junior, Senior],
            "Team competition across biology, chemistry, physics and engineering events",
            &["School team membership"],
            &["Teamwork", "State and national recognition"],
        ),
    ]
}
