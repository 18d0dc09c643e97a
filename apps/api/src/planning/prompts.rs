// Planning prompt templates. Cross-cutting fragments come from llm_client::prompts.

pub const PLAN_SYSTEM: &str = "You are an experienced high-school college counselor \
    who writes concrete, realistic four-year academic plans.";

/// Replace `{grounding_instruction}`, `{grade_instruction}`, `{profile_json}`,
/// `{similar_json}`, `{opportunities_json}` and `{revision_notes}` before sending.
pub const PLAN_PROMPT_TEMPLATE: &str = r#"Create a 4-year high-school plan for the student below.

{grounding_instruction}

{grade_instruction}

STUDENT PROFILE:
{profile_json}

SIMILAR STUDENTS (ranked, with admission outcomes):
{similar_json}

OPPORTUNITIES OPEN TO THIS STUDENT:
{opportunities_json}

{revision_notes}

Return a JSON object with this EXACT schema:
{
  "freshman_plan":  {"grade": 9,  "courses": [], "extracurriculars": [], "competitions": [], "internships": [], "test_prep": [], "goals": [], "rationale": ""},
  "sophomore_plan": {"grade": 10, "courses": [], "extracurriculars": [], "competitions": [], "internships": [], "test_prep": [], "goals": [], "rationale": ""},
  "junior_plan":    {"grade": 11, "courses": [], "extracurriculars": [], "competitions": [], "internships": [], "test_prep": [], "goals": [], "rationale": ""},
  "senior_plan":    {"grade": 12, "courses": [], "extracurriculars": [], "competitions": [], "internships": [], "test_prep": [], "goals": [], "rationale": ""},
  "overall_strategy": "string",
  "key_milestones": ["string"]
}"#;

pub const CRITIQUE_SYSTEM: &str = "You are a strict college admissions reviewer \
    who evaluates high-school plans against a student's goals.";

/// Replace `{profile_json}` and `{plan_json}` before sending.
pub const CRITIQUE_PROMPT_TEMPLATE: &str = r#"Evaluate the following 4-year plan for the student.

STUDENT PROFILE:
{profile_json}

PLAN:
{plan_json}

Judge interest alignment, course progression, extracurricular diversity, test preparation
timing and alignment with the target major.

Return a JSON object with this EXACT schema:
{
  "strengths": ["string"],
  "weaknesses": ["string"],
  "suggestions": ["string"],
  "score": 0.0,
  "needs_revision": false
}

RULES:
1. score is a number between 0.0 and 1.0
2. needs_revision is true when the plan has significant gaps
3. Every suggestion must address a listed weakness or the student's stated goals"#;

pub const EXPLAIN_SYSTEM: &str = "You are a friendly college counselor explaining a plan \
    directly to the student in clear, encouraging language.";

/// Replace `{profile_json}`, `{plan_json}` and `{critique_json}` before sending.
pub const EXPLAIN_PROMPT_TEMPLATE: &str = r#"Explain this 4-year plan to the student.

STUDENT PROFILE:
{profile_json}

PLAN:
{plan_json}

EVALUATION:
{critique_json}

Return a JSON object with this EXACT schema:
{
  "summary": "markdown string",
  "plan_overview": "markdown string",
  "year_by_year": [
    {"label": "Freshman Year (9th Grade)", "breakdown": "markdown string"},
    {"label": "Sophomore Year (10th Grade)", "breakdown": "markdown string"},
    {"label": "Junior Year (11th Grade)", "breakdown": "markdown string"},
    {"label": "Senior Year (12th Grade)", "breakdown": "markdown string"}
  ],
  "key_recommendations": ["string"],
  "next_steps": ["string"]
}"#;
