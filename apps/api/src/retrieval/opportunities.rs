use crate::models::{Opportunity, StudentProfile};

/// Grade-eligible opportunities that either match an interest or are general-purpose
/// (academic / extracurricular). Catalog order is preserved.
pub fn filter_relevant(profile: &StudentProfile, catalog: &[Opportunity]) -> Vec<Opportunity> {
    catalog
        .iter()
        .filter(|opp| opp.is_open_to(profile.current_grade))
        .filter(|opp| opp.kind.is_general() || opp.matches_any_interest(&profile.interests))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Grade, OpportunityKind};

    fn make_opportunity(name: &str, kind: OpportunityKind, grades: &[Grade], description: &str) -> Opportunity {
        Opportunity {
            name: name.to_string(),
            kind,
            grade_levels: grades.to_vec(),
            description: description.to_string(),
            requirements: Vec::new(),
            benefits: Vec::new(),
            deadline: None,
        }
    }

    fn catalog() -> Vec<Opportunity> {
        vec![
            make_opportunity(
                "USAMO",
                OpportunityKind::Competition,
                &[Grade::Junior, Grade::Senior],
                "Prestigious mathematics competition",
            ),
            make_opportunity(
                "Science Research Program",
                OpportunityKind::Academic,
                &[Grade::Sophomore, Grade::Junior, Grade::Senior],
                "Independent research opportunity",
            ),
            make_opportunity(
                "Regional Art Show",
                OpportunityKind::Competition,
                &[Grade::Junior],
                "Juried exhibition",
            ),
            make_opportunity(
                "Coding Bootcamp",
                OpportunityKind::Extracurricular,
                &[Grade::Freshman],
                "Intro programming",
            ),
        ]
    }

    fn profile(grade: Grade, interests: &[&str]) -> StudentProfile {
        StudentProfile {
            current_grade: grade,
            interests: interests.iter().map(|s| s.to_string()).collect(),
            ..Default::default()
        }
    }

    #[test]
    fn test_interest_match_is_case_insensitive_on_description() {
        let names: Vec<String> = filter_relevant(&profile(Grade::Junior, &["Mathematics"]), &catalog())
            .into_iter()
            .map(|o| o.name)
            .collect();
        assert_eq!(names, vec!["USAMO", "Science Research Program"]);
    }

    #[test]
    fn test_general_categories_bypass_interest_filter() {
        let result = filter_relevant(&profile(Grade::Freshman, &[]), &catalog());
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].name, "Coding Bootcamp");
    }

    #[test]
    fn test_never_returns_ineligible_grades() {
        for grade in Grade::ALL {
            let result = filter_relevant(&profile(grade, &["art", "math", "research"]), &catalog());
            assert!(result.iter().all(|o| o.is_open_to(grade)));
        }
    }
}
