//! Rule-based plan generation.
//!
//! Deterministic given the same profile and retrieval context. Lists are deduplicated
//! keeping first-insertion order.

use std::collections::HashSet;

use crate::models::{
    FourYearPlan, Grade, Opportunity, OpportunityKind, SimilarProfile, StudentProfile, YearlyPlan,
};
use crate::retrieval::Retrieval;

const LEADERSHIP_ACTIVITY: &str = "Student Government or Club Leadership";
const SIMILAR_COURSE_SOURCES: usize = 2;

pub fn generate_plan(profile: &StudentProfile, retrieval: &Retrieval) -> FourYearPlan {
    let year = |grade| {
        yearly_plan(
            grade,
            profile,
            &retrieval.similar_profiles,
            &retrieval.opportunities,
        )
    };

    FourYearPlan {
        freshman_plan: year(Grade::Freshman),
        sophomore_plan: year(Grade::Sophomore),
        junior_plan: year(Grade::Junior),
        senior_plan: year(Grade::Senior),
        overall_strategy: overall_strategy(profile, &retrieval.similar_profiles),
        key_milestones: milestones(profile),
    }
}

fn yearly_plan(
    grade: Grade,
    profile: &StudentProfile,
    similar: &[SimilarProfile],
    opportunities: &[Opportunity],
) -> YearlyPlan {
    if grade < profile.current_grade {
        return YearlyPlan::completed(grade);
    }

    YearlyPlan {
        grade,
        courses: recommend_courses(grade, profile, similar),
        extracurriculars: recommend_extracurriculars(grade, profile, opportunities),
        competitions: recommend_competitions(grade, profile, opportunities),
        internships: recommend_internships(grade, opportunities),
        test_prep: test_prep(grade),
        goals: goals(grade, profile),
        rationale: rationale(grade, profile),
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Courses
// ────────────────────────────────────────────────────────────────────────────

fn base_courses(grade: Grade) -> &'static [&'static str] {
    match grade {
        Grade::Freshman => &["Algebra I/II", "Biology", "English 9", "World History"],
        Grade::Sophomore => &["Geometry", "Chemistry", "English 10", "US History"],
        Grade::Junior => &["Pre-Calculus", "Physics", "English 11", "AP US History"],
        Grade::Senior => &["Calculus", "Advanced Science", "English 12", "AP Government"],
    }
}

fn recommend_courses(grade: Grade, profile: &StudentProfile, similar: &[SimilarProfile]) -> Vec<String> {
    let mut courses: Vec<&str> = base_courses(grade).to_vec();

    if profile.has_interest("Computer Science") || profile.has_major("Computer Science") {
        if grade >= Grade::Sophomore {
            courses.push("AP Computer Science A");
        }
        if grade >= Grade::Junior {
            courses.push("AP Computer Science Principles");
        }
    }

    if profile.has_interest("Mathematics") || profile.has_major("Engineering") {
        if grade >= Grade::Junior {
            courses.push("AP Calculus AB");
        }
        if grade >= Grade::Senior {
            courses.push("AP Calculus BC");
        }
    }

    // One science AP at most: biology track beats chemistry beats generic science.
    if grade >= Grade::Junior {
        let biology = ["biology", "medicine", "pre-med"]
            .iter()
            .any(|k| profile.mentions(k));
        if biology {
            courses.push("AP Biology");
        } else if profile.mentions("chemistry") {
            courses.push("AP Chemistry");
        } else if profile.mentions("science") {
            courses.push("AP Biology");
        }
    }

    let similar_reached_junior = similar
        .iter()
        .take(SIMILAR_COURSE_SOURCES)
        .any(|s| s.profile.current_grade >= grade);
    if grade == Grade::Junior && similar_reached_junior {
        courses.push("AP Statistics");
    }

    dedup_ordered(courses)
}

// ────────────────────────────────────────────────────────────────────────────
// Activities
// ────────────────────────────────────────────────────────────────────────────

fn recommend_extracurriculars(
    grade: Grade,
    profile: &StudentProfile,
    opportunities: &[Opportunity],
) -> Vec<String> {
    let mut activities: Vec<String> = profile
        .extracurriculars
        .iter()
        .map(|ec| format!("Continue: {ec}"))
        .collect();

    let clubs: [(&str, [&str; 2]); 3] = [
        ("Computer Science", ["Coding Club", "Hackathons"]),
        ("Mathematics", ["Math Team", "Math Olympiad"]),
        ("Science", ["Science Club", "Science Fair"]),
    ];
    for (interest, suggested) in clubs {
        if profile.has_interest(interest) {
            activities.extend(suggested.iter().map(|s| s.to_string()));
        }
    }

    if grade >= Grade::Junior {
        activities.push(LEADERSHIP_ACTIVITY.to_string());
    }

    activities.extend(
        opportunities
            .iter()
            .filter(|o| o.kind == OpportunityKind::Extracurricular && o.is_open_to(grade))
            .map(|o| o.name.clone()),
    );

    dedup_ordered(activities)
}

fn recommend_competitions(
    grade: Grade,
    profile: &StudentProfile,
    opportunities: &[Opportunity],
) -> Vec<String> {
    opportunities
        .iter()
        .filter(|o| o.kind == OpportunityKind::Competition && o.is_open_to(grade))
        .filter(|o| o.matches_any_interest(&profile.interests))
        .map(|o| o.name.clone())
        .collect()
}

fn recommend_internships(grade: Grade, opportunities: &[Opportunity]) -> Vec<String> {
    if grade < Grade::Junior {
        return Vec::new();
    }
    opportunities
        .iter()
        .filter(|o| o.kind == OpportunityKind::Internship && o.is_open_to(grade))
        .map(|o| o.name.clone())
        .collect()
}

fn test_prep(grade: Grade) -> Vec<String> {
    let items: &[&str] = match grade {
        Grade::Junior => &["PSAT preparation", "SAT/ACT prep course", "Take practice tests"],
        Grade::Senior => &["Final SAT/ACT preparation", "Subject Test preparation (if needed)"],
        Grade::Freshman | Grade::Sophomore => &[],
    };
    items.iter().map(|s| s.to_string()).collect()
}

fn goals(grade: Grade, profile: &StudentProfile) -> Vec<String> {
    let templates: &[&str] = match grade {
        Grade::Freshman => &[
            "Maintain strong GPA (3.7+)",
            "Explore interests and join clubs",
            "Build foundation in core subjects",
        ],
        Grade::Sophomore => &[
            "Maintain or improve GPA",
            "Take on leadership roles in clubs",
            "Start building academic profile",
        ],
        Grade::Junior => &[
            "Achieve high GPA (3.8+)",
            "Take challenging AP courses",
            "Score well on PSAT/SAT/ACT",
            "Pursue leadership positions",
        ],
        Grade::Senior => &[
            "Maintain excellent GPA",
            "Complete college applications",
            "Finalize test scores",
            "Secure strong recommendations",
        ],
    };

    let mut goals: Vec<String> = templates.iter().map(|s| s.to_string()).collect();
    if let Some(major) = profile.target_majors.first() {
        goals.push(format!("Demonstrate commitment to {major}"));
    }
    goals
}

// ────────────────────────────────────────────────────────────────────────────
// Narrative
// ────────────────────────────────────────────────────────────────────────────

fn rationale(grade: Grade, profile: &StudentProfile) -> String {
    let theme = match grade {
        Grade::Freshman => "building a strong academic foundation and exploring interests.",
        Grade::Sophomore => {
            "deepening engagement in areas of interest and taking on more responsibility."
        }
        Grade::Junior => "academic excellence, test preparation, and demonstrating leadership.",
        Grade::Senior => "maintaining excellence while completing college applications.",
    };
    format!(
        "This {} year plan focuses on {theme} The course selection aligns with your interests in {} \
         and your target majors: {}.",
        grade.name(),
        join_first(&profile.interests, 2),
        join_first(&profile.target_majors, 2),
    )
}

fn overall_strategy(profile: &StudentProfile, similar: &[SimilarProfile]) -> String {
    let field = profile
        .target_majors
        .first()
        .map(String::as_str)
        .unwrap_or("your chosen field");

    let mut strategy = format!(
        "Based on your profile and similar successful students, your 4-year strategy should focus on:\n\n\
         1. **Academic Excellence**: Maintain a strong GPA while taking challenging courses \
         aligned with your interests in {}.\n\n\
         2. **Depth in Interests**: Develop deep expertise in {field} \
         through advanced courses, competitions, and projects.\n\n\
         3. **Leadership & Impact**: Take on leadership roles in extracurriculars and demonstrate \
         initiative through independent projects or research.\n\n\
         4. **Test Preparation**: Prepare strategically for standardized tests, focusing on \
         junior year for optimal timing.\n\n",
        join_first(&profile.interests, 3),
    );

    if let Some(top) = similar.first() {
        let college = top
            .colleges_admitted
            .first()
            .map(String::as_str)
            .unwrap_or("top colleges");
        strategy.push_str(&format!(
            "5. **Learn from Success**: Similar students who got into {college} \
             followed similar paths, emphasizing both academic rigor and meaningful \
             extracurricular engagement."
        ));
    }

    strategy
}

fn milestones(profile: &StudentProfile) -> Vec<String> {
    let mut milestones: Vec<String> = [
        "Freshman: Establish strong academic foundation",
        "Sophomore: Begin taking advanced courses",
        "Junior: Take PSAT, begin SAT/ACT prep, pursue leadership",
        "Senior: Complete college applications, finalize test scores",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect();

    if let Some(major) = profile.target_majors.first() {
        milestones.push(format!("Throughout: Build portfolio in {major}"));
    }
    milestones
}

// ────────────────────────────────────────────────────────────────────────────
// Helpers
// ────────────────────────────────────────────────────────────────────────────

/// Removes duplicates, keeping the first occurrence of each item in place.
pub fn dedup_ordered<S: Into<String>>(items: Vec<S>) -> Vec<String> {
    let mut seen = HashSet::new();
    items
        .into_iter()
        .map(Into::into)
        .filter(|item: &String| seen.insert(item.clone()))
        .collect()
}

fn join_first(items: &[String], n: usize) -> String {
    items.iter().take(n).cloned().collect::<Vec<_>>().join(", ")
}
