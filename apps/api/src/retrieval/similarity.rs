//! Similarity ranking: weighted overlap across four attribute families.
//!
//! Per-family score is `|A ∩ B| / max(|A|, |B|, 1)`. A family only counts when both
//! profiles have data for it, and the total is rescaled by the weight actually used.

use std::collections::HashSet;

use crate::models::{ReferenceProfile, SimilarProfile, StudentProfile};

const INTEREST_WEIGHT: f64 = 0.3;
const MAJOR_WEIGHT: f64 = 0.4;
const STRENGTH_WEIGHT: f64 = 0.2;
const EXTRACURRICULAR_WEIGHT: f64 = 0.1;

const UNKNOWN_COLLEGE: &str = "Top University";

/// Similarity in [0.0, 1.0]. 0.0 when no family is comparable.
pub fn compute_similarity(a: &StudentProfile, b: &StudentProfile) -> f64 {
    let families = [
        (&a.interests, &b.interests, INTEREST_WEIGHT),
        (&a.target_majors, &b.target_majors, MAJOR_WEIGHT),
        (&a.academic_strengths, &b.academic_strengths, STRENGTH_WEIGHT),
        (&a.extracurriculars, &b.extracurriculars, EXTRACURRICULAR_WEIGHT),
    ];

    let (score, total_weight) = families
        .iter()
        .filter_map(|(left, right, weight)| overlap(left, right).map(|s| (s * weight, *weight)))
        .fold((0.0, 0.0), |(score, total), (s, w)| (score + s, total + w));

    if total_weight > 0.0 {
        score / total_weight
    } else {
        0.0
    }
}

/// `None` when either side is empty: the family is skipped, not scored as zero.
fn overlap(left: &[String], right: &[String]) -> Option<f64> {
    if left.is_empty() || right.is_empty() {
        return None;
    }
    let left_set: HashSet<&str> = left.iter().map(String::as_str).collect();
    let right_set: HashSet<&str> = right.iter().map(String::as_str).collect();
    let common = left_set.intersection(&right_set).count();
    Some(common as f64 / left_set.len().max(right_set.len()).max(1) as f64)
}

/// Ranks the corpus against `query`, highest score first, truncated to `top_k`.
/// Equal scores keep corpus order.
pub fn find_similar(
    query: &StudentProfile,
    corpus: &[ReferenceProfile],
    top_k: usize,
) -> Vec<SimilarProfile> {
    let mut ranked: Vec<SimilarProfile> = corpus
        .iter()
        .map(|reference| to_similar(reference, compute_similarity(query, &reference.profile)))
        .collect();

    ranked.sort_by(|a, b| b.similarity_score.total_cmp(&a.similarity_score));
    ranked.truncate(top_k);
    ranked
}

fn to_similar(reference: &ReferenceProfile, similarity_score: f64) -> SimilarProfile {
    let profile = &reference.profile;
    let colleges_admitted = if !reference.colleges_admitted.is_empty() {
        reference.colleges_admitted.clone()
    } else if !profile.target_colleges.is_empty() {
        profile.target_colleges.clone()
    } else {
        vec![UNKNOWN_COLLEGE.to_string()]
    };
    let final_major = reference
        .final_major
        .clone()
        .or_else(|| profile.target_majors.first().cloned());

    SimilarProfile {
        profile: profile.clone(),
        similarity_score,
        colleges_admitted,
        final_major,
    }
}
