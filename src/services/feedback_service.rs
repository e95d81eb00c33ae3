use crate::error::{Error, Result};
use crate::models::feedback::{FeedbackResult, DEGRADED_SCORE};
use crate::services::llm_client::TextGeneration;
use crate::services::prompt_builder::build_feedback_prompt;
use crate::utils::json_extract::parse_json_output;
use serde_json::Value as JsonValue;
use std::sync::Arc;
use tracing::instrument;

#[derive(Clone)]
pub struct FeedbackService {
    llm: Arc<dyn TextGeneration>,
}

impl FeedbackService {
    pub fn new(llm: Arc<dyn TextGeneration>) -> Self {
        Self { llm }
    }

    /// Score a candidate answer. Unparsable model output degrades to a generic
    /// evaluation; backend failures are still returned as errors.
    #[instrument(level = "info", skip_all, fields(%role, answer_len = answer.len()))]
    pub async fn evaluate(
        &self,
        role: &str,
        subject: &str,
        question: &str,
        answer: &str,
    ) -> Result<FeedbackResult> {
        let prompt = build_feedback_prompt(role, subject, question, answer);
        let raw = self.llm.generate(&prompt).await?;

        match parse_json_output(&raw).and_then(|v| coerce_feedback(&v)) {
            Ok(feedback) => Ok(feedback),
            Err(e) => {
                tracing::warn!(
                    error = %e,
                    raw_len = raw.len(),
                    "Feedback output unparsable, returning degraded evaluation"
                );
                Ok(FeedbackResult::degraded(&raw))
            }
        }
    }
}

/// Leading numeric part of a free-text score: `"7/10"`, `"8 out of 10"`.
fn leading_number(s: &str) -> Option<f64> {
    let s = s.trim();
    let end = s
        .char_indices()
        .find(|&(i, c)| !(c.is_ascii_digit() || c == '.' || (i == 0 && c == '-')))
        .map_or(s.len(), |(i, _)| i);
    s[..end].trim_end_matches('.').parse::<f64>().ok()
}

fn coerce_score(v: &JsonValue) -> Option<i64> {
    match v {
        JsonValue::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f.round() as i64)),
        JsonValue::String(s) => leading_number(s).map(|f| f.round() as i64),
        _ => None,
    }
}

fn coerce_text(obj: &serde_json::Map<String, JsonValue>, keys: &[&str]) -> String {
    keys.iter()
        .find_map(|k| obj.get(*k))
        .map(|v| match v {
            JsonValue::String(s) => s.trim().to_string(),
            JsonValue::Null => String::new(),
            other => other.to_string(),
        })
        .unwrap_or_default()
}

/// Any JSON object counts as a parsed evaluation. A score that cannot be read
/// falls back to the neutral score; the text fields are kept either way.
fn coerce_feedback(v: &JsonValue) -> Result<FeedbackResult> {
    let obj = v.as_object().ok_or(Error::UnparsableOutput)?;
    let score = obj
        .get("score")
        .and_then(coerce_score)
        .unwrap_or(DEGRADED_SCORE);

    Ok(FeedbackResult {
        score,
        strengths: coerce_text(obj, &["strengths"]),
        improvements: coerce_text(obj, &["improvements"]),
        model_answer: coerce_text(obj, &["model_answer", "modelAnswer"]),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::llm_client::MockTextGeneration;
    use serde_json::json;

    fn service_replying(reply: &'static str) -> FeedbackService {
        let mut backend = MockTextGeneration::new();
        backend
            .expect_generate()
            .times(1)
            .returning(move |_| Ok(reply.trim().to_string()));
        FeedbackService::new(Arc::new(backend))
    }

    #[tokio::test]
    async fn parses_fenced_feedback() {
        let raw = "```json\n{\"score\": 8, \"strengths\": \"Clear steps.\", \
                   \"improvements\": \"Mention risk.\", \
                   \"model_answer\": \"Start with a smoke suite.\"}\n```";
        let mut backend = MockTextGeneration::new();
        backend
            .expect_generate()
            .withf(|prompt| prompt.contains("Candidate Answer: Run tests."))
            .times(1)
            .returning(move |_| Ok(raw.to_string()));
        let svc = FeedbackService::new(Arc::new(backend));

        let fb = svc
            .evaluate("QA", "Release testing", "How do you gate a release?", "Run tests.")
            .await
            .unwrap();
        assert_eq!(fb.score, 8);
        assert_eq!(fb.strengths, "Clear steps.");
        assert_eq!(fb.model_answer, "Start with a smoke suite.");
    }

    #[tokio::test]
    async fn prose_degrades_to_generic_result() {
        let prose = "The candidate shows some understanding. ".repeat(40);
        let reply = prose.clone();
        let mut backend = MockTextGeneration::new();
        backend
            .expect_generate()
            .times(1)
            .returning(move |_| Ok(reply.trim().to_string()));
        let svc = FeedbackService::new(Arc::new(backend));

        let fb = svc.evaluate("QA", "Basics", "Q", "A").await.unwrap();
        assert_eq!(fb.score, 6);
        assert_eq!(fb.strengths, "Answer shows partial understanding of the topic.");
        assert_eq!(fb.improvements, "Improve structure, depth, and include examples.");
        let expected: String = prose.trim().chars().take(800).collect();
        assert_eq!(fb.model_answer, expected);
    }

    #[tokio::test]
    async fn fractional_score_text_keeps_model_fields() {
        let svc = service_replying(
            r#"{"score": "7/10", "strengths": "Clear.", "improvements": "More depth.",
                "model_answer": "A full answer."}"#,
        );

        let fb = svc.evaluate("QA", "Basics", "Q", "A").await.unwrap();
        assert_eq!(
            fb,
            FeedbackResult {
                score: 7,
                strengths: "Clear.".into(),
                improvements: "More depth.".into(),
                model_answer: "A full answer.".into(),
            }
        );
    }

    #[tokio::test]
    async fn out_of_range_score_passes_through() {
        let svc = service_replying(
            r#"{"score": 42, "strengths": "s", "improvements": "i", "modelAnswer": "m"}"#,
        );
        let fb = svc.evaluate("QA", "Basics", "Q", "A").await.unwrap();
        assert_eq!(fb.score, 42);
        assert_eq!(fb.model_answer, "m");
    }

    #[tokio::test]
    async fn backend_outage_is_not_masked() {
        let mut backend = MockTextGeneration::new();
        backend.expect_generate().times(1).returning(|_| {
            Err(Error::BackendError {
                status: 500,
                message: "internal".into(),
            })
        });
        let svc = FeedbackService::new(Arc::new(backend));

        let err = svc.evaluate("QA", "Basics", "Q", "A").await.unwrap_err();
        assert!(matches!(err, Error::BackendError { status: 500, .. }));
    }

    #[test]
    fn coerces_loose_scores() {
        let fb = coerce_feedback(&json!({"score": "7"})).unwrap();
        assert_eq!(fb.score, 7);
        assert_eq!(fb.strengths, "");
        assert_eq!(coerce_feedback(&json!({"score": 6.6})).unwrap().score, 7);
        assert_eq!(coerce_feedback(&json!({"score": "8 out of 10"})).unwrap().score, 8);
        assert_eq!(coerce_feedback(&json!({"score": " 7.5/10"})).unwrap().score, 8);
        assert!(coerce_feedback(&json!([1, 2])).is_err());
    }

    #[test]
    fn unreadable_score_uses_neutral_value() {
        let fb = coerce_feedback(&json!({"score": "good", "strengths": "Kept."})).unwrap();
        assert_eq!(fb.score, DEGRADED_SCORE);
        assert_eq!(fb.strengths, "Kept.");

        let fb = coerce_feedback(&json!({"strengths": "no score"})).unwrap();
        assert_eq!(fb.score, DEGRADED_SCORE);
        assert_eq!(fb.strengths, "no score");
    }
}
