//! Template rendering of the final plan, profile and critique into user-facing text.

use crate::models::{Critique, Explanation, FourYearPlan, Grade, StudentProfile, YearBreakdown, YearlyPlan};

pub fn explain(profile: &StudentProfile, plan: &FourYearPlan, critique: &Critique) -> Explanation {
    Explanation {
        summary: summary(profile, critique),
        plan_overview: overview(plan),
        year_by_year: plan
            .years()
            .iter()
            .map(|year| YearBreakdown {
                label: year.grade.year_label().to_string(),
                breakdown: year_breakdown(year),
            })
            .collect(),
        key_recommendations: recommendations(profile, critique),
        next_steps: next_steps(profile.current_grade),
    }
}

fn summary(profile: &StudentProfile, critique: &Critique) -> String {
    let colleges = if profile.target_colleges.is_empty() {
        "top colleges".to_string()
    } else {
        join_first(&profile.target_colleges, 2)
    };
    let majors = if profile.target_majors.is_empty() {
        "To be determined".to_string()
    } else {
        profile.target_majors.join(", ")
    };
    let verdict = if critique.score >= 0.8 {
        "Your plan is well-structured and aligned with your goals. "
    } else if critique.score >= 0.6 {
        "Your plan is solid but could benefit from some refinements. "
    } else {
        "Your plan needs some adjustments to better align with your goals. "
    };

    format!(
        "## 4-Year College Preparation Plan for {name}\n\n\
         Based on your interests in {interests} and your goal of attending {colleges}, \
         this personalized roadmap will help you build a strong college application.\n\n\
         **Plan Quality Score: {percent:.0}%**\n\n\
         {verdict}See the recommendations below for specific improvements.\n\n\
         **Target Majors**: {majors}\n\
         **Current Grade**: {grade} ({label})\n",
        name = profile.name,
        interests = join_first(&profile.interests, 3),
        percent = critique.score * 100.0,
        grade = profile.current_grade.value(),
        label = profile.current_grade.name(),
    )
}

fn overview(plan: &FourYearPlan) -> String {
    let mut overview = format!(
        "## Plan Overview\n\n{}\n\n### Key Milestones:\n",
        plan.overall_strategy
    );
    for (i, milestone) in plan.key_milestones.iter().enumerate() {
        overview.push_str(&format!("{}. {milestone}\n", i + 1));
    }
    overview
}

fn year_breakdown(year: &YearlyPlan) -> String {
    let mut text = format!("### {}\n\n", year.grade.year_label());
    let sections: [(&str, &[String]); 6] = [
        ("Courses", &year.courses),
        ("Extracurriculars", &year.extracurriculars),
        ("Competitions", &year.competitions),
        ("Internships/Programs", &year.internships),
        ("Test Preparation", &year.test_prep),
        ("Goals", &year.goals),
    ];
    for (heading, items) in sections {
        if items.is_empty() {
            continue;
        }
        text.push_str(&format!("**{heading}:**\n"));
        for item in items {
            text.push_str(&format!("- {item}\n"));
        }
        text.push('\n');
    }
    text.push_str(&format!("**Rationale:** {}\n", year.rationale));
    text
}

fn recommendations(profile: &StudentProfile, critique: &Critique) -> Vec<String> {
    let mut recommendations: Vec<String> = critique.suggestions.iter().take(5).cloned().collect();

    if !critique.strengths.is_empty() {
        recommendations.push(format!("Strengths: {}", join_first(&critique.strengths, 2)));
    }
    if let Some(college) = profile.target_colleges.first() {
        recommendations.push(format!("Research specific admission requirements for {college}"));
    }
    if profile.gpa.is_none() {
        recommendations.push(
            "Track your GPA throughout high school to ensure you meet target college requirements"
                .to_string(),
        );
    }
    recommendations
}

fn next_steps(grade: Grade) -> Vec<String> {
    let specific: &[&str] = match grade {
        Grade::Freshman => &[
            "Review freshman year plan and start building relationships with teachers",
            "Join clubs and activities that align with your interests",
            "Focus on maintaining strong grades in all courses",
        ],
        Grade::Sophomore => &[
            "Review sophomore year plan and consider taking more challenging courses",
            "Take on leadership roles in existing extracurriculars",
            "Start exploring potential majors and career paths",
        ],
        Grade::Junior => &[
            "Begin SAT/ACT preparation and take practice tests",
            "Take on significant leadership roles",
            "Start researching colleges and building your college list",
            "Consider taking AP courses in your areas of interest",
        ],
        Grade::Senior => &[
            "Finalize college list and application strategy",
            "Complete all standardized tests",
            "Request recommendation letters from teachers",
            "Begin working on college essays",
        ],
    };

    specific
        .iter()
        .chain(&[
            "Review this plan with your school counselor or college advisor",
            "Update your plan as your interests and goals evolve",
        ])
        .map(|s| s.to_string())
        .collect()
}

fn join_first(items: &[String], n: usize) -> String {
    items.iter().take(n).cloned().collect::<Vec<_>>().join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::planning::critic::critique_plan;
    use crate::planning::generator::generate_plan;
    use crate::retrieval::Retrieval;

    fn critique(score: f64, suggestions: &[&str], strengths: &[&str]) -> Critique {
        Critique {
            strengths: strengths.iter().map(|s| s.to_string()).collect(),
            weaknesses: Vec::new(),
            suggestions: suggestions.iter().map(|s| s.to_string()).collect(),
            score,
            needs_revision: false,
        }
    }

    fn year<'a>(explanation: &'a Explanation, label: &str) -> &'a str {
        explanation
            .year_by_year
            .iter()
            .find(|y| y.label == label)
            .map(|y| y.breakdown.as_str())
            .unwrap()
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

    #[test]
    fn test_explain_handles_all_empty_inputs() {
        let explanation = explain(&StudentProfile::default(), &empty_plan(), &critique(0.0, &[], &[]));
        assert_eq!(explanation.year_by_year.len(), 4);
        assert!(explanation.summary.contains("top colleges"));
        assert!(explanation.summary.contains("To be determined"));
        assert_eq!(explanation.key_recommendations.len(), 1);
        assert_eq!(explanation.next_steps.len(), 5);
    }

    #[test]
    fn test_year_labels_are_ordered() {
        let explanation = explain(&StudentProfile::default(), &empty_plan(), &critique(0.5, &[], &[]));
        let labels: Vec<&str> = explanation.year_by_year.iter().map(|y| y.label.as_str()).collect();
        assert_eq!(
            labels,
            vec![
                "Freshman Year (9th Grade)",
                "Sophomore Year (10th Grade)",
                "Junior Year (11th Grade)",
                "Senior Year (12th Grade)",
            ]
        );
    }

    #[test]
    fn test_summary_quality_bands() {
        let profile = StudentProfile::default();
        let plan = empty_plan();
        let text = |score| explain(&profile, &plan, &critique(score, &[], &[])).summary;

        assert!(text(0.85).contains("**Plan Quality Score: 85%**"));
        assert!(text(0.85).contains("well-structured"));
        assert!(text(0.65).contains("could benefit from some refinements"));
        assert!(text(0.3).contains("needs some adjustments"));
    }

    #[test]
    fn test_breakdown_sections_only_when_present() {
        let profile = StudentProfile {
            interests: vec!["Computer Science".to_string()],
            target_majors: vec!["Computer Science".to_string()],
            ..Default::default()
        };
        let plan = generate_plan(&profile, &Retrieval::default());
        let explanation = explain(&profile, &plan, &critique_plan(&profile, &plan));

        let freshman = year(&explanation, "Freshman Year (9th Grade)");
        assert!(freshman.contains("**Courses:**\n- Algebra I/II\n"));
        assert!(!freshman.contains("**Test Preparation:**"));
        let junior = year(&explanation, "Junior Year (11th Grade)");
        assert!(junior.contains("**Test Preparation:**\n- PSAT preparation\n"));
        assert!(junior.ends_with(&format!("**Rationale:** {}\n", plan.junior_plan.rationale)));
    }

    #[test]
    fn test_recommendations_and_overview() {
        let profile = StudentProfile {
            target_colleges: vec!["Duke".to_string()],
            gpa: Some(3.9),
            ..Default::default()
        };
        let mut plan = empty_plan();
        plan.overall_strategy = "Stay curious.".to_string();
        plan.key_milestones = vec!["First".to_string(), "Second".to_string()];
        let suggestions = ["s1", "s2", "s3", "s4", "s5", "s6"];
        let explanation = explain(&profile, &plan, &critique(0.7, &suggestions, &["a", "b", "c"]));

        assert_eq!(
            explanation.key_recommendations,
            vec![
                "s1",
                "s2",
                "s3",
                "s4",
                "s5",
                "Strengths: a, b",
                "Research specific admission requirements for Duke",
            ]
        );
        assert!(explanation.plan_overview.contains("Stay curious."));
        assert!(explanation.plan_overview.contains("1. First\n2. Second\n"));
    }

    #[test]
    fn test_next_steps_follow_current_grade() {
        let profile = StudentProfile {
            current_grade: Grade::Senior,
            ..Default::default()
        };
        let explanation = explain(&profile, &empty_plan(), &critique(0.5, &[], &[]));
        assert_eq!(explanation.next_steps[0], "Finalize college list and application strategy");
        assert_eq!(explanation.next_steps.len(), 6);
        assert_eq!(
            explanation.next_steps.last().unwrap(),
            "Update your plan as your interests and goals evolve"
        );
    }
}
