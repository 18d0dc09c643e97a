use serde::{Deserialize, Serialize};

use crate::models::profile::Grade;

pub const COMPLETED_RATIONALE: &str = "Grade already completed";

/// One grade-level slice of the roadmap.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct YearlyPlan {
    pub grade: Grade,
    #[serde(default)]
    pub courses: Vec<String>,
    #[serde(default)]
    pub extracurriculars: Vec<String>,
    #[serde(default)]
    pub competitions: Vec<String>,
    #[serde(default)]
    pub internships: Vec<String>,
    #[serde(default)]
    pub test_prep: Vec<String>,
    #[serde(default)]
    pub goals: Vec<String>,
    #[serde(default)]
    pub rationale: String,
}

impl YearlyPlan {
    /// Empty plan for a grade the student has already finished.
    pub fn completed(grade: Grade) -> Self {
        Self {
            grade,
            courses: Vec::new(),
            extracurriculars: Vec::new(),
            competitions: Vec::new(),
            internships: Vec::new(),
            test_prep: Vec::new(),
            goals: Vec::new(),
            rationale: COMPLETED_RATIONALE.to_string(),
        }
    }

    pub fn is_completed(&self) -> bool {
        self.rationale == COMPLETED_RATIONALE
    }

    pub fn ap_course_count(&self) -> usize {
        self.courses.iter().filter(|c| c.contains("AP")).count()
    }
}

/// The full 4-year roadmap. Each pipeline iteration owns its own value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FourYearPlan {
    pub freshman_plan: YearlyPlan,
    pub sophomore_plan: YearlyPlan,
    pub junior_plan: YearlyPlan,
    pub senior_plan: YearlyPlan,
    #[serde(default)]
    pub overall_strategy: String,
    #[serde(default)]
    pub key_milestones: Vec<String>,
}

impl FourYearPlan {
    /// Yearly plans in grade order.
    pub fn years(&self) -> [&YearlyPlan; 4] {
        [
            &self.freshman_plan,
            &self.sophomore_plan,
            &self.junior_plan,
            &self.senior_plan,
        ]
    }

    pub fn year_mut(&mut self, grade: Grade) -> &mut YearlyPlan {
        match grade {
            Grade::Freshman => &mut self.freshman_plan,
            Grade::Sophomore => &mut self.sophomore_plan,
            Grade::Junior => &mut self.junior_plan,
            Grade::Senior => &mut self.senior_plan,
        }
    }

    pub fn all_courses(&self) -> impl Iterator<Item = &String> {
        self.years().into_iter().flat_map(|y| y.courses.iter())
    }

    pub fn all_extracurriculars(&self) -> impl Iterator<Item = &String> {
        self.years().into_iter().flat_map(|y| y.extracurriculars.iter())
    }

    /// True if every slot carries the grade it is stored under.
    pub fn grades_consistent(&self) -> bool {
        self.years()
            .iter()
            .zip(Grade::ALL)
            .all(|(year, grade)| year.grade == grade)
    }
}

/// Scored evaluation of a plan. Derived fresh each iteration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Critique {
    pub strengths: Vec<String>,
    pub weaknesses: Vec<String>,
    pub suggestions: Vec<String>,
    /// 0.0 – 1.0
    pub score: f64,
    pub needs_revision: bool,
}

/// Formatted breakdown for one year of the plan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct YearBreakdown {
    pub label: String,
    pub breakdown: String,
}

/// Final user-facing rendering of a plan and its critique.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Explanation {
    pub summary: String,
    pub plan_overview: String,
    /// Ordered freshman → senior.
    pub year_by_year: Vec<YearBreakdown>,
    pub key_recommendations: Vec<String>,
    pub next_steps: Vec<String>,
}
