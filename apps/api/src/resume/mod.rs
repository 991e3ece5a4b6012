// Resume intake: decode an uploaded document, infer profile fields, build the snapshot.

pub mod extractor;
pub mod handlers;
pub mod text;

use bytes::Bytes;
use chrono::Utc;
use serde::Serialize;

use crate::models::profile::ResumeSnapshot;
use crate::resume::extractor::{ResumeFieldExtractor, ResumeFields};
use crate::resume::text::{DocumentHint, ExtractError, TextExtractor};

#[derive(Debug, Clone, Serialize)]
pub struct ParsedResume {
    pub snapshot: ResumeSnapshot,
    pub autofill: ResumeFields,
}

pub async fn parse_resume(
    text_extractor: &dyn TextExtractor,
    field_extractor: &ResumeFieldExtractor,
    content: Bytes,
    hint: &DocumentHint,
) -> Result<ParsedResume, ExtractError> {
    let raw_text = text_extractor.extract_text(content, hint).await?;
    Ok(build_parsed_resume(field_extractor, raw_text, hint.file_name.clone()))
}

/// The snapshot and the autofill block carry the same inferred fields.
pub fn build_parsed_resume(
    field_extractor: &ResumeFieldExtractor,
    raw_text: String,
    source_name: Option<String>,
) -> ParsedResume {
    let autofill = field_extractor.extract_fields(&raw_text);
    let snapshot = ResumeSnapshot {
        raw_text,
        skills: autofill.skills.clone(),
        education: autofill.education.clone(),
        experience: autofill.experience.clone(),
        projects: autofill.projects.clone(),
        parsed_at: Utc::now(),
        source_name,
    };
    ParsedResume { snapshot, autofill }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resume::text::DocumentTextExtractor;

    #[tokio::test]
    async fn test_parse_plain_text_resume() {
        let hint = DocumentHint {
            file_name: Some("cv.txt".to_string()),
            content_type: Some("text/plain".to_string()),
        };
        let content = Bytes::from_static(b"Skills: Rust, Go\nPhone 555 010 9999");
        let parsed = parse_resume(
            &DocumentTextExtractor::new(),
            &ResumeFieldExtractor::new(),
            content,
            &hint,
        )
        .await
        .unwrap();

        assert_eq!(parsed.snapshot.skills, parsed.autofill.skills);
        assert_eq!(parsed.snapshot.source_name.as_deref(), Some("cv.txt"));
        assert_eq!(parsed.autofill.phone.as_deref(), Some("555 010 9999"));
        assert!(parsed.snapshot.raw_text.starts_with("Skills: Rust"));
    }

    #[test]
    fn test_snapshot_mirrors_autofill() {
        let parsed = build_parsed_resume(
            &ResumeFieldExtractor::new(),
            "Education\nBSc Maths, Oxford 2012".to_string(),
            None,
        );
        assert_eq!(parsed.snapshot.education, parsed.autofill.education);
        assert_eq!(parsed.snapshot.education[0].institution, "Oxford");
        assert!(parsed.snapshot.source_name.is_none());
    }
}
