//! Resume Field Extractor — heuristic section splitting and record parsing over plain text.
//!
//! Best-effort by construction: a missing section or pattern yields an empty list or
//! `None`, never an error. The rules are plain regex/split heuristics:
//!
//! - A section starts at a line beginning with its label (case-insensitive, optional
//!   colon) and runs until the next heading line or the end of the text. A heading is
//!   a known section label standing alone (optional colon) or a capitalized line of
//!   words ending in a colon (`Letters / & :`). Plain entry lines never end a section.
//! - Lists split on newlines, `•` bullets and `- ` sequences; fragments of two
//!   characters or fewer are dropped.
//! - Skills: a vocabulary scan of the whole text wins outright at ≥5 hits; otherwise
//!   the Skills section tokens are merged in.

use regex::Regex;
use serde::Serialize;

use crate::intelligence::catalog::KNOWN_SKILLS;
use crate::models::profile::{Education, Experience, Project};

const EDUCATION_LIMIT: usize = 4;
const PROJECT_LIMIT: usize = 5;
const EXPERIENCE_LIMIT: usize = 5;
const SKILL_LIMIT: usize = 20;
const VOCABULARY_SHORT_CIRCUIT: usize = 5;
const MIN_FRAGMENT_CHARS: usize = 3;

/// Lines that close the section before them.
const SECTION_HEADINGS: &[&str] = &[
    "Education",
    "Skills",
    "Technical Skills",
    "Projects",
    "Experience",
    "Professional Experience",
    "Work Experience",
    "Employment",
    "Summary",
    "Profile",
    "Objective",
    "Certifications",
    "Awards",
    "Achievements",
    "Publications",
    "Languages",
    "Interests",
    "Hobbies",
    "Volunteering",
    "References",
    "Contact",
];

const NOT_AVAILABLE: &str = "N/A";
const DEFAULT_ORGANIZATION: &str = "Experience";
const DEFAULT_ROLE: &str = "Contributor";

/// Structured fields inferred from resume text. Also serves as the autofill payload.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ResumeFields {
    pub education: Vec<Education>,
    pub projects: Vec<Project>,
    pub experience: Vec<Experience>,
    pub skills: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}

pub struct ResumeFieldExtractor {
    education_section: Regex,
    skills_section: Regex,
    projects_section: Regex,
    experience_section: Regex,
    professional_experience_section: Regex,
    list_separator: Regex,
    skill_separator: Regex,
    year: Regex,
    education_split: Regex,
    project_split: Regex,
    url: Regex,
    duration: Regex,
    experience_split: Regex,
    phone: Regex,
}

impl Default for ResumeFieldExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl ResumeFieldExtractor {
    pub fn new() -> Self {
        Self {
            education_section: section_regex("Education"),
            skills_section: section_regex("Skills"),
            projects_section: section_regex("Projects"),
            experience_section: section_regex("Experience"),
            professional_experience_section: section_regex("Professional Experience"),
            list_separator: Regex::new(r"\n|•|-\s+").expect("Invalid list separator regex"),
            skill_separator: Regex::new(r",|\n|•").expect("Invalid skill separator regex"),
            year: Regex::new(r"(?:19|20)\d{2}").expect("Invalid year regex"),
            education_split: Regex::new(r"(?i) at | - |, ").expect("Invalid education split regex"),
            project_split: Regex::new(r"\s+[-–]\s+").expect("Invalid project split regex"),
            url: Regex::new(r"(?i)https?://[^\s)]+").expect("Invalid URL regex"),
            duration: Regex::new(r"(?i)(?:19|20)\d{2}.{0,3}(?:present|(?:19|20)\d{2})")
                .expect("Invalid duration regex"),
            experience_split: Regex::new(r"(?i) - | at ").expect("Invalid experience split regex"),
            phone: Regex::new(r"\+?\d[\d \t().-]{7,}\d").expect("Invalid phone regex"),
        }
    }

    /// Extracts every field from raw resume text.
    pub fn extract_fields(&self, raw_text: &str) -> ResumeFields {
        ResumeFields {
            education: self.parse_education(raw_text),
            projects: self.parse_projects(raw_text),
            experience: self.parse_experience(raw_text),
            skills: self.parse_skills(raw_text),
            phone: self.parse_phone(raw_text),
        }
    }

    fn parse_education(&self, text: &str) -> Vec<Education> {
        let Some(section) = find_section(&self.education_section, text) else {
            return vec![];
        };

        self.split_list(section)
            .into_iter()
            .take(EDUCATION_LIMIT)
            .map(|entry| {
                let year = self.year.find(&entry);
                let graduation_year = year
                    .map(|m| m.as_str().to_string())
                    .unwrap_or_else(|| NOT_AVAILABLE.to_string());
                let remainder = match year {
                    Some(m) => remove_span(&entry, m.start(), m.end()),
                    None => entry.clone(),
                };
                let base = non_empty(trim_separators(&remainder)).unwrap_or(&entry);

                let mut parts = self.education_split.split(base).map(str::trim);
                let degree = parts.next().and_then(non_empty).unwrap_or(base).to_string();
                let institution = parts
                    .next()
                    .and_then(non_empty)
                    .unwrap_or(NOT_AVAILABLE)
                    .to_string();

                Education {
                    degree,
                    institution,
                    graduation_year,
                }
            })
            .collect()
    }

    fn parse_projects(&self, text: &str) -> Vec<Project> {
        let Some(section) = find_section(&self.projects_section, text) else {
            return vec![];
        };

        self.split_list(section)
            .into_iter()
            .take(PROJECT_LIMIT)
            .map(|entry| {
                let mut parts = self.project_split.splitn(&entry, 2).map(str::trim);
                let name = parts.next().and_then(non_empty).unwrap_or(&entry).to_string();
                let description = parts.next().and_then(non_empty).map(str::to_string);
                let link = self.url.find(&entry).map(|m| m.as_str().to_string());

                Project {
                    name,
                    description,
                    link,
                }
            })
            .collect()
    }

    fn parse_experience(&self, text: &str) -> Vec<Experience> {
        let section = find_section(&self.experience_section, text)
            .or_else(|| find_section(&self.professional_experience_section, text));
        let Some(section) = section else {
            return vec![];
        };

        self.split_list(section)
            .into_iter()
            .take(EXPERIENCE_LIMIT)
            .map(|entry| {
                let duration = self.duration.find(&entry);
                let remainder = match duration {
                    Some(m) => remove_span(&entry, m.start(), m.end()),
                    None => entry.clone(),
                };
                let remainder = trim_separators(&remainder);

                let mut parts = self.experience_split.split(remainder).map(str::trim);
                let organization = parts
                    .next()
                    .and_then(non_empty)
                    .unwrap_or(DEFAULT_ORGANIZATION)
                    .to_string();
                let role = parts
                    .next()
                    .and_then(non_empty)
                    .unwrap_or(DEFAULT_ROLE)
                    .to_string();

                Experience {
                    organization,
                    role,
                    duration: duration.map(|m| m.as_str().to_string()),
                    summary: Some(entry.clone()),
                }
            })
            .collect()
    }

    fn parse_skills(&self, text: &str) -> Vec<String> {
        let lowered = text.to_lowercase();
        let detected: Vec<String> = KNOWN_SKILLS
            .iter()
            .filter(|skill| lowered.contains(*skill))
            .map(|skill| skill.to_string())
            .collect();

        if detected.len() >= VOCABULARY_SHORT_CIRCUIT {
            return dedup_capped(detected);
        }

        let Some(section) = find_section(&self.skills_section, text) else {
            return dedup_capped(detected);
        };

        let tokens = self
            .skill_separator
            .split(section)
            .map(str::trim)
            .filter(|token| !token.is_empty())
            .map(str::to_lowercase);

        dedup_capped(detected.into_iter().chain(tokens).collect())
    }

    fn parse_phone(&self, text: &str) -> Option<String> {
        self.phone
            .find(text)
            .map(|m| m.as_str().trim().to_string())
    }

    /// Splits a section into list fragments, stripping bullets and dropping short noise.
    fn split_list(&self, section: &str) -> Vec<String> {
        self.list_separator
            .split(section)
            .map(|fragment| {
                fragment
                    .trim_start_matches(|c: char| c == '•' || c == '-' || c.is_whitespace())
                    .trim()
            })
            .filter(|fragment| fragment.chars().count() >= MIN_FRAGMENT_CHARS)
            .map(str::to_string)
            .collect()
    }
}

/// Label at the start of a line, optional colon, body up to the next section heading.
/// A heading is a line holding only a known label (optional colon), or a capitalized
/// line of words ending in a colon.
fn section_regex(label: &str) -> Regex {
    let headings = SECTION_HEADINGS
        .iter()
        .map(|heading| regex::escape(heading))
        .collect::<Vec<_>>()
        .join("|");
    let pattern = format!(
        r"(?s)(?:\A|\n)[ \t]*(?i:{label})\b[ \t]*:?(.*?)(?:\n[ \t]*(?:(?i:{headings})[ \t]*:?|[A-Z][A-Za-z /&]*:)[ \t]*(?:\r?\n|\z)|\z)",
        label = regex::escape(label),
        headings = headings,
    );
    Regex::new(&pattern).expect("Invalid section regex")
}

fn find_section<'t>(pattern: &Regex, text: &'t str) -> Option<&'t str> {
    pattern
        .captures(text)
        .and_then(|caps| caps.get(1))
        .map(|body| body.as_str().trim())
        .and_then(non_empty)
}

fn non_empty(value: &str) -> Option<&str> {
    if value.is_empty() {
        None
    } else {
        Some(value)
    }
}

fn remove_span(text: &str, start: usize, end: usize) -> String {
    format!("{}{}", &text[..start], &text[end..])
}

fn trim_separators(text: &str) -> &str {
    text.trim_matches(|c: char| {
        c.is_whitespace() || matches!(c, ',' | ';' | '|' | '(' | ')' | '-' | '–')
    })
}

/// Case-insensitive dedup keeping first occurrences, capped.
fn dedup_capped(skills: Vec<String>) -> Vec<String> {
    let mut seen = std::collections::HashSet::new();
    skills
        .into_iter()
        .filter(|skill| seen.insert(skill.to_lowercase()))
        .take(SKILL_LIMIT)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE_RESUME: &str = "Jane Doe
jane@example.com | +1 (555) 123-4567

Education
BSc Computer Science at State University 2019
MSc Data Science, Tech Institute, 2021

Skills:
Rust, Elixir, Terraform

Projects
Portfolio Site – Personal site built with React https://jane.dev
Tracker v2 (CLI)

Experience
Acme Corp at Senior Engineer 2019-Present
Globex at Intern 2017-2018
";

    fn extractor() -> ResumeFieldExtractor {
        ResumeFieldExtractor::new()
    }

    #[test]
    fn test_education_year_degree_institution() {
        let fields = extractor().extract_fields(SAMPLE_RESUME);
        assert_eq!(
            fields.education,
            vec![
                Education {
                    degree: "BSc Computer Science".to_string(),
                    institution: "State University".to_string(),
                    graduation_year: "2019".to_string(),
                },
                Education {
                    degree: "MSc Data Science".to_string(),
                    institution: "Tech Institute".to_string(),
                    graduation_year: "2021".to_string(),
                },
            ]
        );
    }

    #[test]
    fn test_education_without_year_or_separator() {
        let fields = extractor().extract_fields("Education\nSelf-taught programmer\n");
        assert_eq!(fields.education.len(), 1);
        assert_eq!(fields.education[0].degree, "Self-taught programmer");
        assert_eq!(fields.education[0].institution, "N/A");
        assert_eq!(fields.education[0].graduation_year, "N/A");
    }

    #[test]
    fn test_education_capped_at_four() {
        let text = "Education:\nBA One 2001\nBA Two 2002\nBA Three 2003\nBA Four 2004\nBA Five 2005";
        let fields = extractor().extract_fields(text);
        assert_eq!(fields.education.len(), 4);
        assert_eq!(fields.education[3].graduation_year, "2004");
    }

    #[test]
    fn test_short_fragments_and_bullets_are_dropped() {
        let fields = extractor().extract_fields("Education\n- BA\n• BSc Physics, MIT 2010");
        assert_eq!(fields.education.len(), 1);
        assert_eq!(fields.education[0].degree, "BSc Physics");
        assert_eq!(fields.education[0].institution, "MIT");
    }

    #[test]
    fn test_projects_name_description_link() {
        let fields = extractor().extract_fields(SAMPLE_RESUME);
        assert_eq!(fields.projects.len(), 2);

        let portfolio = &fields.projects[0];
        assert_eq!(portfolio.name, "Portfolio Site");
        assert_eq!(
            portfolio.description.as_deref(),
            Some("Personal site built with React https://jane.dev")
        );
        assert_eq!(portfolio.link.as_deref(), Some("https://jane.dev"));

        let tracker = &fields.projects[1];
        assert_eq!(tracker.name, "Tracker v2 (CLI)");
        assert!(tracker.description.is_none());
        assert!(tracker.link.is_none());
    }

    #[test]
    fn test_experience_duration_and_split() {
        let fields = extractor().extract_fields(SAMPLE_RESUME);
        assert_eq!(fields.experience.len(), 2);

        let acme = &fields.experience[0];
        assert_eq!(acme.organization, "Acme Corp");
        assert_eq!(acme.role, "Senior Engineer");
        assert_eq!(acme.duration.as_deref(), Some("2019-Present"));
        assert_eq!(
            acme.summary.as_deref(),
            Some("Acme Corp at Senior Engineer 2019-Present")
        );

        assert_eq!(fields.experience[1].organization, "Globex");
        assert_eq!(fields.experience[1].role, "Intern");
        assert_eq!(fields.experience[1].duration.as_deref(), Some("2017-2018"));
    }

    #[test]
    fn test_experience_defaults_when_unsplit() {
        let fields = extractor().extract_fields("Experience\nFreelance consulting 2015-2016");
        assert_eq!(fields.experience[0].organization, "Freelance consulting");
        assert_eq!(fields.experience[0].role, "Contributor");
        assert_eq!(fields.experience[0].duration.as_deref(), Some("2015-2016"));
    }

    #[test]
    fn test_professional_experience_fallback_and_dash_splitting() {
        // "- " is a list separator, so "Initech - Developer" becomes two fragments.
        let text = "Professional Experience\nInitech - Developer 2010-2012";
        let fields = extractor().extract_fields(text);

        assert_eq!(fields.experience.len(), 2);
        assert_eq!(fields.experience[0].organization, "Initech");
        assert_eq!(fields.experience[0].role, "Contributor");
        assert!(fields.experience[0].duration.is_none());
        assert_eq!(fields.experience[1].organization, "Developer");
        assert_eq!(fields.experience[1].duration.as_deref(), Some("2010-2012"));
    }

    #[test]
    fn test_skills_merge_vocabulary_hits_with_section_tokens() {
        let fields = extractor().extract_fields(SAMPLE_RESUME);
        assert_eq!(fields.skills, vec!["react", "rust", "elixir", "terraform"]);
    }

    #[test]
    fn test_skills_dedup_is_case_insensitive() {
        let text = "Skills: React, Docker, Rust\nInterests\nChess";
        let fields = extractor().extract_fields(text);
        assert_eq!(fields.skills, vec!["react", "docker", "rust"]);
    }

    #[test]
    fn test_skills_vocabulary_short_circuits_section_parsing() {
        let text = "Stack: javascript typescript react node docker\nSkills\nRust, Haskell";
        let fields = extractor().extract_fields(text);
        // "java" is a substring of "javascript"
        assert_eq!(
            fields.skills,
            vec!["javascript", "typescript", "react", "node", "docker", "java"]
        );
    }

    #[test]
    fn test_skills_capped_at_twenty() {
        let tokens: Vec<String> = (1..=25).map(|i| format!("tool{i}")).collect();
        let text = format!("Skills: {}", tokens.join(", "));
        let fields = extractor().extract_fields(&text);
        assert_eq!(fields.skills.len(), 20);
        assert_eq!(fields.skills[0], "tool1");
        assert_eq!(fields.skills[19], "tool20");
    }

    #[test]
    fn test_phone_detection() {
        let fields = extractor().extract_fields(SAMPLE_RESUME);
        assert_eq!(fields.phone.as_deref(), Some("+1 (555) 123-4567"));

        let fields = extractor().extract_fields("Call 020 7946 0958 today");
        assert_eq!(fields.phone.as_deref(), Some("020 7946 0958"));
    }

    #[test]
    fn test_short_digit_runs_are_not_phones() {
        let fields = extractor().extract_fields("Room 12-34 on floor 5");
        assert!(fields.phone.is_none());
    }

    #[test]
    fn test_text_without_sections_yields_empty_fields() {
        let fields = extractor().extract_fields("just a paragraph about hobbies");
        assert_eq!(fields, ResumeFields::default());
        let value = serde_json::to_value(&fields).unwrap();
        assert!(value.get("phone").is_none());
    }

    #[test]
    fn test_section_stops_at_next_header() {
        let text = "Skills\nGo, Zig\nInterests\nChess, climbing";
        let fields = extractor().extract_fields(text);
        assert_eq!(fields.skills, vec!["go", "zig"]);
    }

    #[test]
    fn test_skills_one_per_line() {
        let fields = extractor().extract_fields("Skills\nRust\nHaskell\nElixir\n");
        assert_eq!(fields.skills, vec!["rust", "haskell", "elixir"]);
    }

    #[test]
    fn test_plain_word_lines_do_not_end_a_section() {
        let text = "Experience\nGoogle at Software Engineer\nMeta at Staff Engineer 2020-2022\n";
        let fields = extractor().extract_fields(text);

        assert_eq!(fields.experience.len(), 2);
        assert_eq!(fields.experience[0].organization, "Google");
        assert_eq!(fields.experience[0].role, "Software Engineer");
        assert!(fields.experience[0].duration.is_none());
        assert_eq!(fields.experience[1].organization, "Meta");
        assert_eq!(fields.experience[1].role, "Staff Engineer");
        assert_eq!(fields.experience[1].duration.as_deref(), Some("2020-2022"));

        let fields = extractor().extract_fields("Education\nBachelor of Science at MIT\n");
        assert_eq!(
            fields.education,
            vec![Education {
                degree: "Bachelor of Science".to_string(),
                institution: "MIT".to_string(),
                graduation_year: "N/A".to_string(),
            }]
        );
    }

    #[test]
    fn test_colon_heading_ends_a_section() {
        let text = "Skills\nRust\nOpen Source Work:\nMaintainer of a crate";
        let fields = extractor().extract_fields(text);
        assert_eq!(fields.skills, vec!["rust"]);
    }

    #[test]
    fn test_empty_text() {
        assert_eq!(extractor().extract_fields(""), ResumeFields::default());
    }
}
