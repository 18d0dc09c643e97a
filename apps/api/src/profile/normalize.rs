//! Profile normalization: turns loosely-typed input into a canonical `StudentProfile`.
//!
//! Never fails: missing or malformed fields degrade to safe defaults. Range checks
//! (GPA, grade) belong to callers that care about data quality, not to this layer.

use std::collections::HashMap;

use serde_json::{Map, Value};

use crate::models::{Grade, StudentProfile};

const DEFAULT_NAME: &str = "Student";

/// Grade keywords scanned in priority order.
const GRADE_KEYWORDS: &[(&str, &str, Grade)] = &[
    ("freshman", "9", Grade::Freshman),
    ("sophomore", "10", Grade::Sophomore),
    ("junior", "11", Grade::Junior),
    ("senior", "12", Grade::Senior),
];

/// Normalizes a raw profile mapping. Non-object input is treated as an empty mapping.
pub fn normalize(raw: &Value) -> StudentProfile {
    let empty = Map::new();
    let fields = raw.as_object().unwrap_or(&empty);

    let grade_input = fields
        .get("current_grade")
        .or_else(|| fields.get("grade"));

    StudentProfile {
        name: fields
            .get("name")
            .and_then(Value::as_str)
            .map(str::to_string)
            .unwrap_or_else(|| DEFAULT_NAME.to_string()),
        current_grade: resolve_grade(grade_input),
        interests: coerce_list(fields.get("interests")),
        academic_strengths: coerce_list(fields.get("academic_strengths")),
        courses_taken: coerce_list(fields.get("courses_taken")),
        courses_planned: coerce_list(fields.get("courses_planned")),
        extracurriculars: coerce_list(fields.get("extracurriculars")),
        achievements: coerce_list(fields.get("achievements")),
        target_colleges: coerce_list(fields.get("target_colleges")),
        target_majors: coerce_list(fields.get("target_majors")),
        gpa: fields.get("gpa").and_then(Value::as_f64),
        test_scores: coerce_scores(fields.get("test_scores")),
        additional_info: fields
            .get("additional_info")
            .and_then(Value::as_object)
            .cloned()
            .unwrap_or_default(),
    }
}

/// Resolves an integer, numeric string, or class name to a grade. Defaults to freshman.
pub fn resolve_grade(input: Option<&Value>) -> Grade {
    match input {
        Some(Value::Number(n)) => n
            .as_i64()
            .or_else(|| n.as_f64().filter(|f| f.fract() == 0.0).map(|f| f as i64))
            .and_then(Grade::from_value)
            .unwrap_or_default(),
        Some(Value::String(s)) => grade_from_text(s).unwrap_or_default(),
        _ => Grade::default(),
    }
}

/// Scans text for a class name or ordinal, in freshman → senior priority.
pub fn grade_from_text(text: &str) -> Option<Grade> {
    let lower = text.to_lowercase();
    GRADE_KEYWORDS
        .iter()
        .find(|(word, ordinal, _)| lower.contains(word) || lower.contains(ordinal))
        .map(|(_, _, grade)| *grade)
}

/// Coerces a value into a list of strings.
///
/// null → empty; string → comma-split and trimmed; list → passthrough;
/// any other scalar → singleton.
pub fn coerce_list(value: Option<&Value>) -> Vec<String> {
    match value {
        None | Some(Value::Null) => Vec::new(),
        Some(Value::String(s)) => s
            .split(',')
            .map(str::trim)
            .filter(|item| !item.is_empty())
            .map(str::to_string)
            .collect(),
        Some(Value::Array(items)) => items.iter().filter_map(scalar_to_string).collect(),
        Some(other) => scalar_to_string(other).into_iter().collect(),
    }
}

fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

fn coerce_scores(value: Option<&Value>) -> HashMap<String, f64> {
    value
        .and_then(Value::as_object)
        .map(|scores| {
            scores
                .iter()
                .filter_map(|(test, score)| score.as_f64().map(|s| (test.clone(), s)))
                .collect()
        })
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_empty_mapping_yields_defaults() {
        let profile = normalize(&json!({}));
        assert_eq!(profile.name, "Student");
        assert_eq!(profile.current_grade, Grade::Freshman);
        assert!(profile.interests.is_empty());
        assert!(profile.target_majors.is_empty());
        assert!(profile.gpa.is_none());
        assert!(profile.test_scores.is_empty());
        assert!(profile.additional_info.is_empty());
    }

    #[test]
    fn test_non_object_input_is_treated_as_empty() {
        for raw in [json!(null), json!([1, 2]), json!("junior"), json!(42)] {
            let profile = normalize(&raw);
            assert_eq!(profile.current_grade, Grade::Freshman);
            assert_eq!(profile.name, "Student");
        }
    }

    #[test]
    fn test_integer_grade_used_directly() {
        assert_eq!(normalize(&json!({"current_grade": 11})).current_grade, Grade::Junior);
        assert_eq!(normalize(&json!({"current_grade": 12.0})).current_grade, Grade::Senior);
    }

    #[test]
    fn test_out_of_range_integer_grade_defaults_to_freshman() {
        assert_eq!(normalize(&json!({"current_grade": 7})).current_grade, Grade::Freshman);
        assert_eq!(normalize(&json!({"current_grade": 10.5})).current_grade, Grade::Freshman);
    }

    #[test]
    fn test_string_grade_scanned_case_insensitively() {
        assert_eq!(resolve_grade(Some(&json!("SOPHOMORE"))), Grade::Sophomore);
        assert_eq!(resolve_grade(Some(&json!("I'm a Junior"))), Grade::Junior);
        assert_eq!(resolve_grade(Some(&json!("12th grade"))), Grade::Senior);
        assert_eq!(resolve_grade(Some(&json!("grade 10"))), Grade::Sophomore);
    }

    #[test]
    fn test_string_grade_priority_favors_freshman() {
        // "9" is checked before "junior"
        assert_eq!(resolve_grade(Some(&json!("junior, class of 2029"))), Grade::Freshman);
    }

    #[test]
    fn test_unresolvable_grade_defaults_to_freshman() {
        assert_eq!(resolve_grade(Some(&json!("unknown"))), Grade::Freshman);
        assert_eq!(resolve_grade(Some(&json!(true))), Grade::Freshman);
        assert_eq!(resolve_grade(None), Grade::Freshman);
    }

    #[test]
    fn test_grade_alias_key_accepted() {
        assert_eq!(normalize(&json!({"grade": "senior"})).current_grade, Grade::Senior);
    }

    #[test]
    fn test_comma_string_is_split_and_trimmed() {
        let list = coerce_list(Some(&json!(" Math ,, Physics,  ")));
        assert_eq!(list, vec!["Math".to_string(), "Physics".to_string()]);
    }

    #[test]
    fn test_scalar_becomes_singleton() {
        assert_eq!(coerce_list(Some(&json!(5))), vec!["5".to_string()]);
        assert_eq!(coerce_list(Some(&json!(true))), vec!["true".to_string()]);
    }

    #[test]
    fn test_list_passes_through_in_order() {
        let list = coerce_list(Some(&json!(["Robotics", "Debate", "Robotics"])));
        assert_eq!(list, vec!["Robotics", "Debate", "Robotics"]);
    }

    #[test]
    fn test_null_list_is_empty() {
        let profile = normalize(&json!({"interests": null, "target_majors": null}));
        assert!(profile.interests.is_empty());
        assert!(profile.target_majors.is_empty());
    }

    #[test]
    fn test_gpa_and_scores_pass_through_unvalidated() {
        let profile = normalize(&json!({
            "gpa": 7.5,
            "test_scores": {"SAT": 1500, "ACT": "n/a"},
            "additional_info": {"school": "Lincoln High"}
        }));
        assert_eq!(profile.gpa, Some(7.5));
        assert_eq!(profile.test_scores.get("SAT"), Some(&1500.0));
        assert!(!profile.test_scores.contains_key("ACT"));
        assert_eq!(profile.additional_info["school"], "Lincoln High");
    }

    #[test]
    fn test_serialized_profile_normalizes_back_unchanged() {
        let profile = normalize(&json!({
            "name": "Ada",
            "current_grade": 10,
            "interests": ["Computer Science"],
            "gpa": 3.9
        }));
        let raw = serde_json::to_value(&profile).unwrap();
        assert_eq!(normalize(&raw), profile);
    }
}
