// Prompts for the optional AI enhancement of competency insights.

pub const INSIGHTS_PROMPT_TEMPLATE: &str = r#"
Review the competency scores (0-100) of a candidate and describe them for a recruiter.

Scores:
- Technical: {technical}
- Cognitive: {cognitive}
- Behavioral: {behavioral}
- Communication: {communication}
- Overall (weighted): {overall}

Rules:
- A score of 80 or above is a strength; below 60 is a weakness that needs a focus area.
- Name the competency and its value in every strength and weakness.
- Keep each entry to one sentence.
"#;

pub const INSIGHTS_SCHEMA_HINT: &str =
    r#"{"strengths": string[], "weaknesses": string[], "focus_areas": string[]}"#;
