// Competency scoring: weighted overall score, score history and narrative insights.
// engine.rs and insights.rs are pure; the AI layer only ever rewords insights.

pub mod engine;
pub mod handlers;
pub mod insights;
pub mod prompts;

use crate::llm_client::{produce_or_fallback, AiProvider, StructuredRequest};
use crate::scoring::engine::ScoreBreakdown;
use crate::scoring::insights::{generate_insights, InsightSummary};
use crate::scoring::prompts::{INSIGHTS_PROMPT_TEMPLATE, INSIGHTS_SCHEMA_HINT};

/// Insights for a read request. The provider may reword the heuristic buckets; an
/// unusable reply (error, wrong shape, an empty bucket) yields the heuristic result.
pub async fn enhanced_insights(
    ai: &dyn AiProvider,
    scores: Option<&ScoreBreakdown>,
) -> InsightSummary {
    let Some(scores) = scores else {
        return generate_insights(None);
    };

    let instructions = render_insights_prompt(scores);
    let request = StructuredRequest {
        instructions: &instructions,
        schema_hint: Some(INSIGHTS_SCHEMA_HINT),
    };

    let summary: InsightSummary =
        produce_or_fallback(ai, &request, || generate_insights(Some(scores))).await;

    if summary.strengths.is_empty()
        || summary.weaknesses.is_empty()
        || summary.focus_areas.is_empty()
    {
        return generate_insights(Some(scores));
    }
    summary
}

fn render_insights_prompt(scores: &ScoreBreakdown) -> String {
    INSIGHTS_PROMPT_TEMPLATE
        .replace("{technical}", &scores.technical().to_string())
        .replace("{cognitive}", &scores.cognitive().to_string())
        .replace("{behavioral}", &scores.behavioral().to_string())
        .replace("{communication}", &scores.communication().to_string())
        .replace("{overall}", &scores.overall().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm_client::{AiError, HeuristicOnly};
    use crate::scoring::engine::{calculate_score, RawScores};
    use async_trait::async_trait;
    use serde_json::json;

    struct FixedReply(serde_json::Value);

    #[async_trait]
    impl AiProvider for FixedReply {
        fn name(&self) -> &'static str {
            "fixed"
        }

        async fn produce(
            &self,
            _request: &StructuredRequest<'_>,
        ) -> Result<serde_json::Value, AiError> {
            Ok(self.0.clone())
        }
    }

    fn make_scores() -> ScoreBreakdown {
        calculate_score(&RawScores {
            technical: 90.0,
            cognitive: 50.0,
            behavioral: 70.0,
            communication: 85.0,
        })
    }

    #[test]
    fn test_prompt_contains_every_score() {
        let prompt = render_insights_prompt(&make_scores());
        assert!(prompt.contains("Technical: 90"));
        assert!(prompt.contains("Cognitive: 50"));
        assert!(prompt.contains("Communication: 85"));
        assert!(!prompt.contains('{'));
    }

    #[tokio::test]
    async fn test_without_scores_skips_provider() {
        let provider = FixedReply(json!({"strengths": ["x"], "weaknesses": ["y"], "focus_areas": ["z"]}));
        let summary = enhanced_insights(&provider, None).await;
        assert_eq!(summary, generate_insights(None));
    }

    #[tokio::test]
    async fn test_heuristic_provider_matches_generator() {
        let scores = make_scores();
        let summary = enhanced_insights(&HeuristicOnly, Some(&scores)).await;
        assert_eq!(summary, generate_insights(Some(&scores)));
    }

    #[tokio::test]
    async fn test_ai_reply_is_used_when_complete() {
        let provider = FixedReply(json!({
            "strengths": ["Technical depth (90) stands out"],
            "weaknesses": ["Cognitive (50) lags"],
            "focus_areas": ["Practice structured problem solving"]
        }));
        let summary = enhanced_insights(&provider, Some(&make_scores())).await;
        assert_eq!(summary.strengths, vec!["Technical depth (90) stands out"]);
    }

    #[tokio::test]
    async fn test_ai_reply_with_empty_bucket_falls_back() {
        let scores = make_scores();
        let provider = FixedReply(json!({"strengths": [], "weaknesses": ["a"], "focus_areas": ["b"]}));
        let summary = enhanced_insights(&provider, Some(&scores)).await;
        assert_eq!(summary, generate_insights(Some(&scores)));
    }
}
