use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// High school grade level. Serialized as its ordinal (9–12).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "u8")]
pub enum Grade {
    #[default]
    Freshman,
    Sophomore,
    Junior,
    Senior,
}

impl Grade {
    pub const ALL: [Grade; 4] = [Grade::Freshman, Grade::Sophomore, Grade::Junior, Grade::Senior];

    pub fn value(self) -> u8 {
        match self {
            Grade::Freshman => 9,
            Grade::Sophomore => 10,
            Grade::Junior => 11,
            Grade::Senior => 12,
        }
    }

    pub fn from_value(value: i64) -> Option<Self> {
        match value {
            9 => Some(Grade::Freshman),
            10 => Some(Grade::Sophomore),
            11 => Some(Grade::Junior),
            12 => Some(Grade::Senior),
            _ => None,
        }
    }

    /// Lowercase class name, e.g. "junior".
    pub fn name(self) -> &'static str {
        match self {
            Grade::Freshman => "freshman",
            Grade::Sophomore => "sophomore",
            Grade::Junior => "junior",
            Grade::Senior => "senior",
        }
    }

    /// Display label used in explanations, e.g. "Junior Year (11th Grade)".
    pub fn year_label(self) -> &'static str {
        match self {
            Grade::Freshman => "Freshman Year (9th Grade)",
            Grade::Sophomore => "Sophomore Year (10th Grade)",
            Grade::Junior => "Junior Year (11th Grade)",
            Grade::Senior => "Senior Year (12th Grade)",
        }
    }
}

impl From<Grade> for u8 {
    fn from(grade: Grade) -> Self {
        grade.value()
    }
}

impl TryFrom<u8> for Grade {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Grade::from_value(value as i64).ok_or_else(|| format!("invalid grade {value}: expected 9-12"))
    }
}

/// Canonical student profile produced by the normalizer.
///
/// List fields behave as sets for matching but keep insertion order for display.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StudentProfile {
    pub name: String,
    pub current_grade: Grade,
    pub interests: Vec<String>,
    pub academic_strengths: Vec<String>,
    pub courses_taken: Vec<String>,
    pub courses_planned: Vec<String>,
    pub extracurriculars: Vec<String>,
    pub achievements: Vec<String>,
    pub target_colleges: Vec<String>,
    pub target_majors: Vec<String>,
    pub gpa: Option<f64>,
    pub test_scores: HashMap<String, f64>,
    pub additional_info: Map<String, Value>,
}

impl StudentProfile {
    /// Case-insensitive exact membership in interests.
    pub fn has_interest(&self, name: &str) -> bool {
        self.interests.iter().any(|i| i.eq_ignore_ascii_case(name))
    }

    /// Case-insensitive exact membership in target majors.
    pub fn has_major(&self, name: &str) -> bool {
        self.target_majors.iter().any(|m| m.eq_ignore_ascii_case(name))
    }

    /// True if any interest or target major contains `needle` (lowercase).
    pub fn mentions(&self, needle: &str) -> bool {
        self.interests
            .iter()
            .chain(self.target_majors.iter())
            .any(|s| s.to_lowercase().contains(needle))
    }
}

/// A corpus record: a profile plus the admission outcome it led to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReferenceProfile {
    #[serde(flatten)]
    pub profile: StudentProfile,
    #[serde(default)]
    pub colleges_admitted: Vec<String>,
    #[serde(default)]
    pub final_major: Option<String>,
}

/// A reference profile ranked against one query profile. Not persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimilarProfile {
    pub profile: StudentProfile,
    pub similarity_score: f64,
    pub colleges_admitted: Vec<String>,
    pub final_major: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grade_serializes_as_ordinal() {
        assert_eq!(serde_json::to_string(&Grade::Junior).unwrap(), "11");
        let grade: Grade = serde_json::from_str("10").unwrap();
        assert_eq!(grade, Grade::Sophomore);
    }

    #[test]
    fn test_grade_out_of_range_fails_deserialization() {
        assert!(serde_json::from_str::<Grade>("13").is_err());
    }

    #[test]
    fn test_grades_order_by_value() {
        assert!(Grade::Freshman < Grade::Senior);
        assert_eq!(Grade::ALL.map(Grade::value), [9, 10, 11, 12]);
    }

    #[test]
    fn test_reference_profile_flattens_profile_fields() {
        let json = serde_json::json!({
            "name": "Ref",
            "current_grade": 12,
            "interests": ["Biology"],
            "academic_strengths": [],
            "courses_taken": [],
            "courses_planned": [],
            "extracurriculars": [],
            "achievements": [],
            "target_colleges": ["Yale"],
            "target_majors": ["Biology"],
            "gpa": null,
            "test_scores": {},
            "additional_info": {},
            "colleges_admitted": ["Yale"]
        });
        let reference: ReferenceProfile = serde_json::from_value(json).unwrap();
        assert_eq!(reference.profile.current_grade, Grade::Senior);
        assert_eq!(reference.colleges_admitted, vec!["Yale".to_string()]);
        assert!(reference.final_major.is_none());
    }

    #[test]
    fn test_mentions_checks_interests_and_majors() {
        let profile = StudentProfile {
            interests: vec!["Marine Biology".to_string()],
            target_majors: vec!["Chemistry".to_string()],
            ..Default::default()
        };
        assert!(profile.mentions("biology"));
        assert!(profile.mentions("chemistry"));
        assert!(!profile.mentions("physics"));
    }
}
