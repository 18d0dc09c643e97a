//! Free-text profile extraction.
//!
//! Two interchangeable strategies: `KeywordProfileExtractor` (deterministic vocabulary
//! matching) and `CapabilityProfileExtractor` (model-backed, falls back to keywords).
//! Both build a raw mapping and hand it to `normalize`, so the canonical shape has a
//! single source of truth.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{json, Map, Value};
use tracing::{debug, warn};

use crate::llm_client::{generate_json, LlmError, TextCapability};
use crate::models::StudentProfile;
use crate::profile::normalize::normalize;
use crate::profile::prompts::{PROFILE_PARSE_PROMPT_TEMPLATE, PROFILE_PARSE_SYSTEM};

#[async_trait]
pub trait ProfileExtractor: Send + Sync {
    /// "keyword" | "llm"
    fn backend(&self) -> &'static str;

    async fn extract(&self, text: &str) -> StudentProfile;
}

// ────────────────────────────────────────────────────────────────────────────
// Vocabulary
// ────────────────────────────────────────────────────────────────────────────

const GRADE_WORDS: &[(&[&str], i64)] = &[
    (&["freshman", "9th grade", "9th grader", "ninth grade"], 9),
    (&["sophomore", "10th grade", "10th grader", "tenth grade"], 10),
    (&["junior", "11th grade", "11th grader", "eleventh grade"], 11),
    (&["senior", "12th grade", "12th grader", "twelfth grade"], 12),
];

const SUBJECT_KEYWORDS: &[(&str, &str)] = &[
    ("computer science", "Computer Science"),
    ("coding", "Computer Science"),
    ("programming", "Computer Science"),
    ("cs", "Computer Science"),
    ("mechanical engineering", "Engineering"),
    ("engineering", "Engineering"),
    ("robotics", "Robotics"),
    ("mathematics", "Mathematics"),
    ("math", "Mathematics"),
    ("physics", "Physics"),
    ("biology", "Biology"),
    ("chemistry", "Chemistry"),
    ("medicine", "Medicine"),
    ("pre-med", "Pre-Med"),
    ("neuroscience", "Neuroscience"),
    ("economics", "Economics"),
    ("history", "History"),
    ("english", "English"),
    ("writing", "Writing"),
];

const COLLEGE_KEYWORDS: &[(&str, &str)] = &[
    ("mit", "MIT"),
    ("stanford", "Stanford"),
    ("harvard", "Harvard"),
    ("yale", "Yale"),
    ("princeton", "Princeton"),
    ("columbia", "Columbia"),
    ("upenn", "University of Pennsylvania"),
    ("caltech", "Caltech"),
    ("uc berkeley", "UC Berkeley"),
    ("berkeley", "UC Berkeley"),
    ("ucla", "UCLA"),
    ("usc", "USC"),
    ("nyu", "NYU"),
    ("cornell", "Cornell"),
    ("duke", "Duke"),
    ("johns hopkins", "Johns Hopkins"),
    ("jhu", "Johns Hopkins"),
];

const ACTIVITY_KEYWORDS: &[(&str, &str)] = &[
    ("robotics club", "Robotics Club"),
    ("robotics team", "Robotics Club"),
    ("coding club", "Coding Club"),
    ("debate", "Debate"),
    ("model un", "Model UN"),
    ("science olympiad", "Science Olympiad"),
    ("math team", "Math Team"),
    ("math olympiad", "Math Olympiad"),
    ("science fair", "Science Fair"),
    ("orchestra", "Orchestra"),
    ("band", "Band"),
    ("student government", "Student Government"),
    ("volunteer", "Volunteering"),
    ("research", "Research"),
    ("varsity", "Athletics"),
];

const STRENGTH_TRIGGERS: &[&str] = &["good at", "strong in", "excel at", "excel in", "best at"];

const MAJOR_TRIGGERS: &[&str] = &[
    "major in",
    "majoring in",
    "major:",
    "study",
    "studying",
    "degree in",
    "pursue",
    "pursuing",
];

// ────────────────────────────────────────────────────────────────────────────
// KeywordProfileExtractor
// ────────────────────────────────────────────────────────────────────────────

/// Deterministic vocabulary matcher. Always available.
pub struct KeywordProfileExtractor;

#[async_trait]
impl ProfileExtractor for KeywordProfileExtractor {
    fn backend(&self) -> &'static str {
        "keyword"
    }

    async fn extract(&self, text: &str) -> StudentProfile {
        normalize(&extract_raw_fields(text))
    }
}

/// Builds the raw mapping handed to `normalize` from free text.
pub fn extract_raw_fields(text: &str) -> Value {
    let lower = text.to_lowercase();
    let mut raw = Map::new();

    if let Some(name) = extract_name(text) {
        raw.insert("name".to_string(), json!(name));
    }

    if let Some((_, grade)) = GRADE_WORDS
        .iter()
        .find(|(words, _)| words.iter().any(|w| contains_word(&lower, w)))
    {
        raw.insert("current_grade".to_string(), json!(grade));
    }

    raw.insert(
        "interests".to_string(),
        json!(match_vocabulary(&lower, SUBJECT_KEYWORDS)),
    );
    raw.insert(
        "academic_strengths".to_string(),
        json!(match_after_triggers(&lower, STRENGTH_TRIGGERS)),
    );

    let mut majors = match_after_triggers(&lower, MAJOR_TRIGGERS);
    if contains_word(&lower, "pre-med") {
        push_unique(&mut majors, "Pre-Med");
    }
    raw.insert("target_majors".to_string(), json!(majors));

    raw.insert(
        "target_colleges".to_string(),
        json!(match_vocabulary(&lower, COLLEGE_KEYWORDS)),
    );
    raw.insert(
        "extracurriculars".to_string(),
        json!(match_vocabulary(&lower, ACTIVITY_KEYWORDS)),
    );

    if let Some(gpa) = extract_gpa(&lower) {
        raw.insert("gpa".to_string(), json!(gpa));
    }

    Value::Object(raw)
}

/// Canonical names for every vocabulary keyword present as a whole word, deduplicated.
fn match_vocabulary(lower: &str, vocabulary: &[(&str, &str)]) -> Vec<String> {
    let mut found = Vec::new();
    for (keyword, canonical) in vocabulary {
        if contains_word(lower, keyword) {
            push_unique(&mut found, canonical);
        }
    }
    found
}

/// Subject keywords appearing in the same sentence after any trigger phrase.
fn match_after_triggers(lower: &str, triggers: &[&str]) -> Vec<String> {
    let mut found = Vec::new();
    for trigger in triggers {
        for (idx, _) in lower.match_indices(trigger) {
            if !is_boundary(lower, idx, trigger.len()) {
                continue;
            }
            let rest = &lower[idx + trigger.len()..];
            let sentence = rest
                .split(|c| matches!(c, '.' | '!' | '?' | '\n'))
                .next()
                .unwrap_or("");
            for subject in match_vocabulary(sentence, SUBJECT_KEYWORDS) {
                push_unique(&mut found, &subject);
            }
        }
    }
    found
}

const NAME_TRIGGER: &str = "my name is ";

fn extract_name(text: &str) -> Option<String> {
    // Searched in `text` itself: lowercasing can change byte offsets.
    let start = text.char_indices().map(|(i, _)| i).find(|&i| {
        text.get(i..i + NAME_TRIGGER.len())
            .is_some_and(|window| window.eq_ignore_ascii_case(NAME_TRIGGER))
    })?;
    text[start + NAME_TRIGGER.len()..]
        .split_whitespace()
        .next()
        .map(|w| w.trim_matches(|c: char| !c.is_alphanumeric()).to_string())
        .filter(|w| !w.is_empty())
}

/// A number in (0, 5] within three tokens of "gpa".
fn extract_gpa(lower: &str) -> Option<f64> {
    let tokens: Vec<&str> = lower
        .split_whitespace()
        .map(|t| t.trim_matches(|c: char| !c.is_alphanumeric() && c != '.'))
        .map(|t| t.trim_end_matches('.'))
        .collect();
    let anchor = tokens.iter().position(|t| *t == "gpa")?;
    let start = anchor.saturating_sub(3);
    let end = (anchor + 4).min(tokens.len());
    tokens[start..end]
        .iter()
        .filter_map(|t| t.parse::<f64>().ok())
        .find(|g| *g > 0.0 && *g <= 5.0)
}

/// Whole-word (or whole-phrase) containment; hyphens count as word characters.
fn contains_word(haystack: &str, needle: &str) -> bool {
    haystack
        .match_indices(needle)
        .any(|(idx, _)| is_boundary(haystack, idx, needle.len()))
}

fn is_boundary(haystack: &str, idx: usize, len: usize) -> bool {
    let is_word = |c: char| c.is_alphanumeric() || c == '-';
    let before = haystack[..idx].chars().next_back();
    let after = haystack[idx + len..].chars().next();
    !before.is_some_and(is_word) && !after.is_some_and(is_word)
}

fn push_unique(list: &mut Vec<String>, item: &str) {
    if !list.iter().any(|existing| existing == item) {
        list.push(item.to_string());
    }
}

// ────────────────────────────────────────────────────────────────────────────
// CapabilityProfileExtractor
// ────────────────────────────────────────────────────────────────────────────

/// Model-backed extractor. Any capability or parse failure falls back to keywords.
pub struct CapabilityProfileExtractor {
    capability: Arc<dyn TextCapability>,
}

impl CapabilityProfileExtractor {
    pub fn new(capability: Arc<dyn TextCapability>) -> Self {
        Self { capability }
    }

    async fn try_extract(&self, text: &str) -> Result<StudentProfile, LlmError> {
        let prompt = PROFILE_PARSE_PROMPT_TEMPLATE.replace("{raw_text}", text);
        let raw: Value =
            generate_json(self.capability.as_ref(), &prompt, PROFILE_PARSE_SYSTEM).await?;
        if !raw.is_object() {
            return Err(LlmError::Invalid("profile must be a JSON object".to_string()));
        }
        Ok(normalize(&raw))
    }
}

#[async_trait]
impl ProfileExtractor for CapabilityProfileExtractor {
    fn backend(&self) -> &'static str {
        "llm"
    }

    async fn extract(&self, text: &str) -> StudentProfile {
        match self.try_extract(text).await {
            Ok(profile) => {
                debug!("Profile extracted by capability: grade={}", profile.current_grade.value());
                profile
            }
            Err(e) => {
                warn!("Profile extraction capability failed, using keyword fallback: {e}");
                KeywordProfileExtractor.extract(text).await
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Grade;

    struct CannedCapability(Result<String, ()>);

    #[async_trait]
    impl TextCapability for CannedCapability {
        async fn generate_text(&self, _prompt: &str, _system: &str) -> Result<String, LlmError> {
            self.0
                .clone()
                .map_err(|_| LlmError::Unavailable("no key".to_string()))
        }
    }

    const ENGINEERING_TEXT: &str = "I'm a freshman in high school. I'm really interested in \
        engineering and robotics. I love math and physics. I want to go to MIT or Stanford \
        to study mechanical engineering. I'm currently in the robotics club at my school.";

    #[tokio::test]
    async fn test_keyword_extraction_engineering_student() {
        let profile = KeywordProfileExtractor.extract(ENGINEERING_TEXT).await;
        assert_eq!(profile.current_grade, Grade::Freshman);
        assert!(profile.has_interest("Engineering"));
        assert!(profile.has_interest("Robotics"));
        assert!(profile.has_interest("Mathematics"));
        assert!(profile.has_interest("Physics"));
        assert_eq!(profile.target_colleges, vec!["MIT", "Stanford"]);
        assert_eq!(profile.target_majors, vec!["Engineering"]);
        assert_eq!(profile.extracurriculars, vec!["Robotics Club"]);
    }

    #[tokio::test]
    async fn test_keyword_extraction_premed_student() {
        let text = "Hi, I'm a 9th grader. I'm passionate about medicine and biology. \
            I volunteer at the local hospital. I want to go to Johns Hopkins or Harvard for \
            pre-med. I'm really good at chemistry and biology.";
        let profile = KeywordProfileExtractor.extract(text).await;
        assert_eq!(profile.current_grade, Grade::Freshman);
        assert!(profile.has_interest("Medicine"));
        assert!(profile.has_interest("Pre-Med"));
        assert_eq!(profile.academic_strengths, vec!["Biology", "Chemistry"]);
        assert_eq!(profile.target_majors, vec!["Pre-Med"]);
        assert_eq!(profile.target_colleges, vec!["Harvard", "Johns Hopkins"]);
        assert!(profile.extracurriculars.contains(&"Volunteering".to_string()));
    }

    #[tokio::test]
    async fn test_keyword_extraction_reads_gpa_and_grade() {
        let text = "I'm a sophomore. I love coding and want to major in computer science \
            at UC Berkeley. My GPA is 3.9.";
        let profile = KeywordProfileExtractor.extract(text).await;
        assert_eq!(profile.current_grade, Grade::Sophomore);
        assert_eq!(profile.gpa, Some(3.9));
        assert_eq!(profile.target_majors, vec!["Computer Science"]);
        assert_eq!(profile.target_colleges, vec!["UC Berkeley"]);
    }

    #[test]
    fn test_short_keywords_need_word_boundaries() {
        // "cs" inside "physics", "mit" inside "submit"
        let raw = extract_raw_fields("I will submit my physics project");
        assert_eq!(raw["interests"], json!(["Physics"]));
        assert_eq!(raw["target_colleges"], json!([]));
    }

    #[test]
    fn test_name_extracted_when_introduced() {
        let raw = extract_raw_fields("Hello, my name is Priya. I'm a junior.");
        assert_eq!(raw["name"], "Priya");
        assert_eq!(raw["current_grade"], 11);
    }

    #[test]
    fn test_name_extraction_with_non_ascii_text() {
        let raw = extract_raw_fields("İ my name is Émile and I'm a junior");
        assert_eq!(raw["name"], "Émile");
        assert_eq!(raw["current_grade"], 11);

        let raw = extract_raw_fields("MY NAME IS Zoë.");
        assert_eq!(raw["name"], "Zoë");
    }

    #[tokio::test]
    async fn test_empty_text_yields_default_profile() {
        let profile = KeywordProfileExtractor.extract("").await;
        assert_eq!(profile.name, "Student");
        assert_eq!(profile.current_grade, Grade::Freshman);
        assert!(profile.interests.is_empty());
    }

    #[tokio::test]
    async fn test_capability_output_funnels_through_normalize() {
        let reply = r#"{"name": "Sam", "current_grade": "junior", "interests": "Art, History"}"#;
        let extractor =
            CapabilityProfileExtractor::new(Arc::new(CannedCapability(Ok(reply.to_string()))));
        let profile = extractor.extract("anything").await;
        assert_eq!(profile.name, "Sam");
        assert_eq!(profile.current_grade, Grade::Junior);
        assert_eq!(profile.interests, vec!["Art", "History"]);
    }

    #[tokio::test]
    async fn test_unavailable_capability_falls_back_to_keywords() {
        let extractor = CapabilityProfileExtractor::new(Arc::new(CannedCapability(Err(()))));
        let profile = extractor.extract(ENGINEERING_TEXT).await;
        assert!(profile.has_interest("Engineering"));
        assert_eq!(extractor.backend(), "llm");
    }

    #[tokio::test]
    async fn test_unparseable_capability_output_falls_back_to_keywords() {
        let extractor = CapabilityProfileExtractor::new(Arc::new(CannedCapability(Ok(
            "[1, 2, 3]".to_string(),
        ))));
        let profile = extractor.extract("I'm a senior who loves chemistry").await;
        assert_eq!(profile.current_grade, Grade::Senior);
        assert!(profile.has_interest("Chemistry"));
    }
}
