//! Fixed lookup tables shared by skill-gap analysis and resume parsing.
//!
//! Process-wide constants, read-only. Role names and skill keys are stored normalized
//! (trimmed, lowercase); lookups normalize their input the same way.

/// Skills every target set includes, regardless of role.
pub const DEFAULT_TARGET_SKILLS: &[&str] = &["communication", "teamwork", "continuous learning"];

pub const ROLE_SKILL_LIBRARY: &[(&str, &[&str])] = &[
    (
        "frontend developer",
        &[
            "react",
            "typescript",
            "javascript",
            "css",
            "html",
            "testing",
            "accessibility",
            "vite",
            "ux collaboration",
        ],
    ),
    (
        "backend developer",
        &[
            "node",
            "express",
            "mongodb",
            "sql",
            "api design",
            "security",
            "testing",
            "docker",
        ],
    ),
    (
        "fullstack engineer",
        &["react", "node", "typescript", "rest", "graphql", "ci/cd", "cloud"],
    ),
    (
        "data engineer",
        &["python", "sql", "spark", "etl", "data modeling", "airflow", "aws"],
    ),
];

pub const ACTION_LIBRARY: &[(&str, &str)] = &[
    ("react", "Build a mini design system in React with accessibility baked in."),
    ("javascript", "Complete advanced JS patterns course focusing on performance."),
    ("typescript", "Adopt TypeScript strict mode across a side project."),
    ("css", "Recreate a complex UI from Dribbble using modern CSS features."),
    ("html", "Practice semantic HTML by auditing an existing page for a11y issues."),
    ("testing", "Add component tests using Vitest + Testing Library."),
    ("accessibility", "Run axe audits on a project and fix reported issues."),
    ("mongodb", "Model multi-tenant schemas and practice aggregation pipelines."),
    ("sql", "Write window-function heavy reports for realistic datasets."),
    ("api design", "Document an API with OpenAPI and add contract tests."),
    ("security", "Run OWASP ZAP against an app and address the findings."),
    ("docker", "Containerize the scoring API with multi-stage builds."),
    ("node", "Implement streaming APIs with Node and measure throughput."),
    ("express", "Refactor middleware with proper validation + error handling."),
    ("ci/cd", "Configure GitHub Actions with automated quality gates."),
    ("cloud", "Deploy on AWS/GCP and instrument with logs + metrics."),
];

/// Vocabulary scanned for in resume text (substring containment, lowercase).
pub const KNOWN_SKILLS: &[&str] = &[
    "javascript",
    "typescript",
    "react",
    "node.js",
    "node",
    "express",
    "mongodb",
    "sql",
    "python",
    "aws",
    "docker",
    "kubernetes",
    "css",
    "html",
    "graphql",
    "azure",
    "java",
    "c#",
    "ci/cd",
];

pub fn normalize(value: &str) -> String {
    value.trim().to_lowercase()
}

/// Skills required by a role. Unknown roles require nothing role-specific.
pub fn role_skills(role: &str) -> &'static [&'static str] {
    let key = normalize(role);
    ROLE_SKILL_LIBRARY
        .iter()
        .find(|(name, _)| *name == key)
        .map(|(_, skills)| *skills)
        .unwrap_or(&[])
}

/// Remediation action for a skill, if one is catalogued.
pub fn remediation_action(skill: &str) -> Option<&'static str> {
    let key = normalize(skill);
    ACTION_LIBRARY
        .iter()
        .find(|(name, _)| *name == key)
        .map(|(_, action)| *action)
}
