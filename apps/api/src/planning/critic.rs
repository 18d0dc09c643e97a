//! Rule-based plan critique: a weighted rubric plus heuristic strengths, weaknesses and
//! suggestions.
//!
//! Rubric weights: interest/course alignment 0.25, every year has courses 0.20,
//! extracurricular diversity 0.20, junior SAT/ACT prep 0.15, major alignment 0.20.
//! Major alignment only counts toward the denominator when the student has a target major.

use std::collections::HashSet;

use crate::models::{Critique, FourYearPlan, StudentProfile};

const INTEREST_WEIGHT: f64 = 0.25;
const COMPLETENESS_WEIGHT: f64 = 0.2;
const DIVERSITY_WEIGHT: f64 = 0.2;
const TEST_PREP_WEIGHT: f64 = 0.15;
const MAJOR_WEIGHT: f64 = 0.2;
const MAJOR_PARTIAL_CREDIT: f64 = 0.1;

const DIVERSITY_TARGET: f64 = 5.0;
const REVISION_SCORE_FLOOR: f64 = 0.6;
const REVISION_KEYWORDS: &[&str] = &["missing", "need", "too heavy", "consider"];
const SELECTIVE_COLLEGE_KEYWORDS: &[&str] =
    &["ivy", "stanford", "mit", "caltech", "harvard", "yale", "princeton"];
const LEADERSHIP_KEYWORDS: &[&str] = &["leadership", "president", "officer"];
const MIN_AP_FOR_SELECTIVE: usize = 3;
const MAX_SENIOR_COURSES: usize = 6;

pub fn critique_plan(profile: &StudentProfile, plan: &FourYearPlan) -> Critique {
    let weaknesses = identify_weaknesses(profile, plan);
    let score = calculate_score(profile, plan);
    Critique {
        strengths: identify_strengths(profile, plan),
        suggestions: generate_suggestions(profile, plan, &weaknesses),
        needs_revision: needs_revision(score, &weaknesses),
        weaknesses,
        score,
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Score
// ────────────────────────────────────────────────────────────────────────────

pub fn calculate_score(profile: &StudentProfile, plan: &FourYearPlan) -> f64 {
    let courses = lowercase_courses(plan);
    let mut score = 0.0;
    let mut max_score = 0.0;

    let aligned = profile
        .interests
        .iter()
        .filter(|interest| {
            let needle = interest.to_lowercase();
            courses.iter().any(|c| c.contains(&needle))
        })
        .count();
    let alignment = (aligned as f64 / profile.interests.len().max(1) as f64).min(1.0);
    score += alignment * INTEREST_WEIGHT;
    max_score += INTEREST_WEIGHT;

    if plan.years().iter().all(|y| !y.courses.is_empty()) {
        score += COMPLETENESS_WEIGHT;
    }
    max_score += COMPLETENESS_WEIGHT;

    let diversity = (unique_extracurriculars(plan) as f64 / DIVERSITY_TARGET).min(1.0);
    score += diversity * DIVERSITY_WEIGHT;
    max_score += DIVERSITY_WEIGHT;

    if has_junior_test_prep(plan) {
        score += TEST_PREP_WEIGHT;
    }
    max_score += TEST_PREP_WEIGHT;

    if let Some(major) = profile.target_majors.first() {
        score += major_alignment(&major.to_lowercase(), &courses.join(" "));
        max_score += MAJOR_WEIGHT;
    }

    (score / max_score).clamp(0.0, 1.0)
}

fn major_alignment(major: &str, course_text: &str) -> f64 {
    let satisfied = (major.contains("computer science") && course_text.contains("computer"))
        || (major.contains("engineering") && course_text.contains("calculus"))
        || (major.contains("biology") && course_text.contains("biology"));
    if satisfied {
        MAJOR_WEIGHT
    } else {
        MAJOR_PARTIAL_CREDIT
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Findings
// ────────────────────────────────────────────────────────────────────────────

fn identify_strengths(profile: &StudentProfile, plan: &FourYearPlan) -> Vec<String> {
    let courses = lowercase_courses(plan);
    let mut strengths = Vec::new();

    let interest_aligned = profile.interests.iter().any(|interest| {
        let needle = interest.to_lowercase();
        courses.iter().any(|c| c.contains(&needle))
    });
    if interest_aligned {
        strengths.push("Course selection aligns well with student interests");
    }
    if !plan.freshman_plan.courses.is_empty() && !plan.senior_plan.courses.is_empty() {
        strengths.push("Shows clear academic progression across 4 years");
    }
    if unique_extracurriculars(plan) >= 3 {
        strengths.push("Includes diverse extracurricular activities");
    }
    if has_junior_test_prep(plan) {
        strengths.push("Includes appropriate test preparation timeline");
    }
    let leadership = plan.all_extracurriculars().any(|ec| {
        let ec = ec.to_lowercase();
        LEADERSHIP_KEYWORDS.iter().any(|k| ec.contains(k))
    });
    if leadership {
        strengths.push("Includes leadership development opportunities");
    }

    strengths.into_iter().map(str::to_string).collect()
}

fn identify_weaknesses(profile: &StudentProfile, plan: &FourYearPlan) -> Vec<String> {
    let mut weaknesses: Vec<String> = Vec::new();

    if !profile.target_colleges.is_empty() && plan.overall_strategy.is_empty() {
        weaknesses.push("Plan doesn't clearly address target college requirements".to_string());
    }

    let ap_total: usize = plan.years().iter().map(|y| y.ap_course_count()).sum();
    let selective = profile.target_colleges.iter().any(|college| {
        let college = college.to_lowercase();
        SELECTIVE_COLLEGE_KEYWORDS.iter().any(|k| college.contains(k))
    });
    if ap_total < MIN_AP_FOR_SELECTIVE && selective {
        weaknesses.push("May need more AP courses for competitive college admissions".to_string());
    }

    if let Some(major) = profile.target_majors.first() {
        let major = major.to_lowercase();
        let course_text = lowercase_courses(plan).join(" ");
        if major.contains("computer science") && !course_text.contains("computer") {
            weaknesses.push("Missing computer science courses for CS major".to_string());
        } else if major.contains("engineering") && !course_text.contains("calculus") {
            weaknesses.push("Missing calculus for engineering major".to_string());
        } else if major.contains("biology") && !course_text.contains("biology") {
            weaknesses.push("Missing biology courses for biology major".to_string());
        }
    }

    if plan.senior_plan.courses.len() > MAX_SENIOR_COURSES {
        weaknesses
            .push("Senior year course load may be too heavy with college applications".to_string());
    }

    let has_summer = [&plan.sophomore_plan, &plan.junior_plan]
        .iter()
        .flat_map(|y| y.internships.iter())
        .any(|i| {
            let i = i.to_lowercase();
            i.contains("summer") || i.contains("internship")
        });
    if !has_summer {
        weaknesses.push("Consider adding summer programs or internships".to_string());
    }

    weaknesses
}

fn generate_suggestions(
    profile: &StudentProfile,
    plan: &FourYearPlan,
    weaknesses: &[String],
) -> Vec<String> {
    let mut suggestions: Vec<String> = weaknesses
        .iter()
        .filter_map(|w| remediation_for(w))
        .map(str::to_string)
        .collect();

    if let Some(college) = profile.target_colleges.first() {
        suggestions.push(format!("Research specific requirements for {college}"));
    }
    if plan.junior_plan.competitions.is_empty() {
        suggestions.push("Consider participating in competitions related to your interests".to_string());
    }
    if plan.senior_plan.extracurriculars.len() < 2 {
        suggestions
            .push("Maintain consistent extracurricular involvement through senior year".to_string());
    }

    suggestions
}

/// First matching canned remediation for a weakness.
fn remediation_for(weakness: &str) -> Option<&'static str> {
    if weakness.contains("AP courses") {
        return Some("Consider adding 2-3 more AP courses in areas of interest");
    }
    let lower = weakness.to_lowercase();
    let table: [(&str, &str); 5] = [
        ("computer science", "Add computer science courses starting in sophomore or junior year"),
        ("calculus", "Ensure calculus is taken by junior year for engineering"),
        ("biology", "Include AP Biology or advanced biology courses"),
        ("summer", "Explore summer programs, research opportunities, or internships"),
        ("course load", "Consider reducing senior year course load to focus on applications"),
    ];
    table
        .iter()
        .find(|(keyword, _)| lower.contains(keyword))
        .map(|(_, suggestion)| *suggestion)
}

/// Coarse gate: a low score, or at least two weaknesses when any of them carries a
/// revision keyword.
fn needs_revision(score: f64, weaknesses: &[String]) -> bool {
    if score < REVISION_SCORE_FLOOR {
        return true;
    }
    let flagged = weaknesses.iter().any(|w| {
        let w = w.to_lowercase();
        REVISION_KEYWORDS.iter().any(|k| w.contains(k))
    });
    flagged && weaknesses.len() >= 2
}

// ────────────────────────────────────────────────────────────────────────────
// Helpers
// ────────────────────────────────────────────────────────────────────────────

fn lowercase_courses(plan: &FourYearPlan) -> Vec<String> {
    plan.all_courses().map(|c| c.to_lowercase()).collect()
}

fn unique_extracurriculars(plan: &FourYearPlan) -> usize {
    plan.all_extracurriculars().collect::<HashSet<_>>().len()
}

fn has_junior_test_prep(plan: &FourYearPlan) -> bool {
    plan.junior_plan
        .test_prep
        .iter()
        .any(|p| p.contains("SAT") || p.contains("ACT"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Grade, YearlyPlan};

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    fn year(grade: Grade, courses: &[&str], ecs: &[&str]) -> YearlyPlan {
        YearlyPlan {
            grade,
            courses: strings(courses),
            extracurriculars: strings(ecs),
            competitions: Vec::new(),
            internships: Vec::new(),
            test_prep: Vec::new(),
            goals: Vec::new(),
            rationale: String::new(),
        }
    }

    fn empty_plan() -> FourYearPlan {
        FourYearPlan {
            freshman_plan: YearlyPlan::completed(Grade::Freshman),
            sophomore_plan: YearlyPlan::completed(Grade::Sophomore),
            junior_plan: YearlyPlan::completed(Grade::Junior),
            senior_plan: YearlyPlan::completed(Grade::Senior),
            overall_strategy: String::new(),
            key_milestones: Vec::new(),
        }
    }

    fn strong_plan() -> FourYearPlan {
        let mut junior = year(
            Grade::Junior,
            &["AP Computer Science A", "AP Calculus AB", "Physics"],
            &["Coding Club", "Club President"],
        );
        junior.test_prep = strings(&["SAT/ACT prep course"]);
        junior.internships = strings(&["Summer Internship"]);
        junior.competitions = strings(&["USACO"]);
        FourYearPlan {
            freshman_plan: year(Grade::Freshman, &["Algebra I/II", "Biology"], &["Robotics"]),
            sophomore_plan: year(Grade::Sophomore, &["Geometry", "Computer Science Principles"], &["Math Team"]),
            junior_plan: junior,
            senior_plan: year(Grade::Senior, &["AP Statistics", "English 12"], &["Hackathons", "Debate"]),
            overall_strategy: "Focus on computing.".to_string(),
            key_milestones: Vec::new(),
        }
    }

    fn cs_profile() -> StudentProfile {
        StudentProfile {
            interests: strings(&["Computer Science"]),
            target_majors: strings(&["Computer Science"]),
            target_colleges: strings(&["Carnegie Mellon"]),
            ..Default::default()
        }
    }

    #[test]
    fn test_strong_plan_scores_full_marks() {
        let critique = critique_plan(&cs_profile(), &strong_plan());
        assert!((critique.score - 1.0).abs() < 1e-9);
        assert!(!critique.needs_revision);
        assert!(critique.weaknesses.is_empty());
        assert_eq!(critique.strengths.len(), 5);
    }

    #[test]
    fn test_empty_plan_and_profile_stay_in_range() {
        let critique = critique_plan(&StudentProfile::default(), &empty_plan());
        assert!((0.0..=1.0).contains(&critique.score));
        assert_eq!(critique.score, 0.0);
        assert!(critique.needs_revision);
        assert!(critique.strengths.is_empty());
    }

    #[test]
    fn test_missing_major_excluded_from_denominator() {
        let mut profile = cs_profile();
        profile.target_majors.clear();
        // Everything else is satisfied, so the remaining 0.8 of weight is all earned.
        assert!((calculate_score(&profile, &strong_plan()) - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_unmatched_major_gets_partial_credit() {
        let mut profile = cs_profile();
        profile.target_majors = strings(&["History"]);
        // 0.8 earned + 0.1 partial over 1.0
        assert!((calculate_score(&profile, &strong_plan()) - 0.9).abs() < 1e-9);
    }

    #[test]
    fn test_completeness_is_all_or_nothing() {
        let mut plan = strong_plan();
        plan.freshman_plan.courses.clear();
        let score = calculate_score(&cs_profile(), &plan);
        assert!((score - 0.8).abs() < 1e-9);
    }

    #[test]
    fn test_selective_college_with_few_aps_is_flagged() {
        let mut profile = cs_profile();
        profile.target_colleges = strings(&["MIT"]);
        let mut plan = strong_plan();
        plan.senior_plan.courses = strings(&["English 12"]);
        plan.junior_plan.courses = strings(&["AP Computer Science A", "Physics"]);

        let critique = critique_plan(&profile, &plan);
        assert!(critique
            .weaknesses
            .contains(&"May need more AP courses for competitive college admissions".to_string()));
        assert_eq!(
            critique.suggestions[0],
            "Consider adding 2-3 more AP courses in areas of interest"
        );
        assert!(critique.suggestions.contains(&"Research specific requirements for MIT".to_string()));
    }

    #[test]
    fn test_major_specific_gaps() {
        let plan = empty_plan();
        let for_major = |major: &str| {
            let profile = StudentProfile {
                target_majors: strings(&[major]),
                ..Default::default()
            };
            critique_plan(&profile, &plan).weaknesses
        };
        assert!(for_major("Computer Science").contains(&"Missing computer science courses for CS major".to_string()));
        assert!(for_major("Mechanical Engineering").contains(&"Missing calculus for engineering major".to_string()));
        assert!(for_major("Biology").contains(&"Missing biology courses for biology major".to_string()));
        assert_eq!(for_major("History").len(), 1);
    }

    #[test]
    fn test_cs_and_engineering_major_with_cs_courses_checks_calculus() {
        let mut plan = empty_plan();
        plan.sophomore_plan = year(Grade::Sophomore, &["AP Computer Science A"], &[]);
        let profile = StudentProfile {
            target_majors: strings(&["Computer Science and Engineering"]),
            ..Default::default()
        };
        let weaknesses = critique_plan(&profile, &plan).weaknesses;
        assert!(weaknesses.contains(&"Missing calculus for engineering major".to_string()));
        assert!(!weaknesses.contains(&"Missing computer science courses for CS major".to_string()));
    }

    #[test]
    fn test_heavy_senior_year_and_missing_summer() {
        let mut plan = strong_plan();
        plan.senior_plan.courses = strings(&["A", "B", "C", "D", "E", "F", "G"]);
        plan.junior_plan.internships.clear();

        let critique = critique_plan(&cs_profile(), &plan);
        assert_eq!(
            critique.weaknesses,
            vec![
                "Senior year course load may be too heavy with college applications",
                "Consider adding summer programs or internships",
            ]
        );
        assert_eq!(
            &critique.suggestions[..2],
            &[
                "Consider reducing senior year course load to focus on applications".to_string(),
                "Explore summer programs, research opportunities, or internships".to_string(),
            ]
        );
        assert!(critique.needs_revision);
    }

    #[test]
    fn test_single_keyword_weakness_does_not_force_revision() {
        assert!(!needs_revision(0.8, &strings(&["Consider adding summer programs or internships"])));
        assert!(needs_revision(0.59, &[]));
        assert!(needs_revision(
            0.9,
            &strings(&["Missing calculus for engineering major", "Other concern"])
        ));
    }

    #[test]
    fn test_general_suggestions() {
        let mut plan = strong_plan();
        plan.junior_plan.competitions.clear();
        plan.senior_plan.extracurriculars = strings(&["Debate"]);
        let critique = critique_plan(&cs_profile(), &plan);
        assert!(critique
            .suggestions
            .contains(&"Consider participating in competitions related to your interests".to_string()));
        assert!(critique
            .suggestions
            .contains(&"Maintain consistent extracurricular involvement through senior year".to_string()));
    }
}
