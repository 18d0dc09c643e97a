//! Critique-guided patches applied to a freshly regenerated plan.

use crate::models::{Critique, FourYearPlan, Grade, StudentProfile};

const MIN_JUNIOR_AP: usize = 2;

/// Applies the narrow corrections the critique asks for. Already-completed years are
/// never patched; additions are skipped when already present.
pub fn apply_critique_patches(
    profile: &StudentProfile,
    mut plan: FourYearPlan,
    critique: &Critique,
) -> FourYearPlan {
    let wants_more_ap = critique.weaknesses.iter().any(|w| w.contains("AP courses"));
    if wants_more_ap && plan.junior_plan.ap_course_count() < MIN_JUNIOR_AP {
        if profile.has_interest("Computer Science") {
            add_course(&mut plan, Grade::Junior, "AP Computer Science A");
        }
        if profile.has_interest("Mathematics") {
            add_course(&mut plan, Grade::Junior, "AP Statistics");
        }
    }

    let wants_summer = critique
        .weaknesses
        .iter()
        .any(|w| w.to_lowercase().contains("summer"));
    if wants_summer {
        add_internship(&mut plan, Grade::Sophomore, "Summer Research Program");
        add_internship(&mut plan, Grade::Junior, "Summer Internship");
    }

    plan
}

fn add_course(plan: &mut FourYearPlan, grade: Grade, course: &str) {
    let year = plan.year_mut(grade);
    if !year.is_completed() && !year.courses.iter().any(|c| c == course) {
        year.courses.push(course.to_string());
    }
}

fn add_internship(plan: &mut FourYearPlan, grade: Grade, internship: &str) {
    let year = plan.year_mut(grade);
    if !year.is_completed() && !year.internships.iter().any(|i| i == internship) {
        year.internships.push(internship.to_string());
    }
}
