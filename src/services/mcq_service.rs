//! Multiple-choice question generation.
//!
//! One call runs a bounded loop of backend attempts. Each reply goes through
//! parse -> question check -> ban list -> history dedup -> shape check, and
//! the first reply to survive is returned. When the budget runs out (or the
//! backend is unreachable several times in a row) a fixed question is
//! returned instead, so callers always get a usable MCQ.

use crate::error::Error;
use crate::models::question::{GenerationRequest, McqCandidate, McqOptions, OptionLabel};
use crate::services::llm_client::TextGeneration;
use crate::services::prompt_builder::build_mcq_prompt;
use crate::utils::json_extract::parse_json_output;
use crate::utils::similarity::{is_similar, DEFAULT_SIMILARITY_THRESHOLD};
use serde_json::Value as JsonValue;
use std::fmt;
use std::sync::Arc;
use tracing::instrument;

/// Textbook questions the model keeps producing despite the prompt rules.
/// Matched as lowercase substrings of the question text.
const BANNED_PHRASES: [&str; 4] = [
    "what is the primary goal of software testing",
    "what is the main goal of software testing",
    "purpose of software testing",
    "main aim of software testing",
];

#[derive(Debug, Clone, Copy)]
pub struct McqPolicy {
    pub max_attempts: usize,
    /// Stop early after this many `BackendUnavailable` errors in a row.
    /// Zero disables the short-circuit.
    pub max_consecutive_unavailable: usize,
    pub similarity_threshold: f64,
}

impl Default for McqPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 6,
            max_consecutive_unavailable: 3,
            similarity_threshold: DEFAULT_SIMILARITY_THRESHOLD,
        }
    }
}

/// Why an attempt was abandoned. Only ever logged.
#[derive(Debug)]
pub enum Rejection {
    Backend(Error),
    Unparsable,
    BlankQuestion,
    Banned,
    Duplicate,
    Malformed(&'static str),
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rejection::Backend(e) => write!(f, "backend call failed: {}", e),
            Rejection::Unparsable => f.write_str("no JSON object in output"),
            Rejection::BlankQuestion => f.write_str("missing or blank question"),
            Rejection::Banned => f.write_str("question matches ban list"),
            Rejection::Duplicate => f.write_str("near-duplicate of a previous question"),
            Rejection::Malformed(field) => write!(f, "malformed field `{}`", field),
        }
    }
}

pub fn is_banned(question: &str) -> bool {
    let lowered = question.to_lowercase();
    BANNED_PHRASES.iter().any(|b| lowered.contains(b))
}

fn text_field<'a>(v: &'a JsonValue, key: &str) -> Option<&'a str> {
    v.get(key).and_then(|x| x.as_str()).map(str::trim)
}

fn coerce_options(v: &JsonValue) -> Option<McqOptions> {
    let options: McqOptions = serde_json::from_value(v.get("options")?.clone()).ok()?;
    let options = McqOptions {
        a: options.a.trim().to_string(),
        b: options.b.trim().to_string(),
        c: options.c.trim().to_string(),
        d: options.d.trim().to_string(),
    };
    if options.iter().any(|(_, text)| text.is_empty()) {
        return None;
    }
    Some(options)
}

/// Per-attempt validation of one raw backend reply.
pub fn validate_candidate(
    raw: &str,
    previous_questions: &[String],
    threshold: f64,
) -> Result<McqCandidate, Rejection> {
    let value = parse_json_output(raw).map_err(|_| Rejection::Unparsable)?;

    let question = text_field(&value, "question")
        .filter(|q| !q.is_empty())
        .ok_or(Rejection::BlankQuestion)?;

    if is_banned(question) {
        return Err(Rejection::Banned);
    }

    if previous_questions
        .iter()
        .any(|prev| is_similar(question, prev, threshold))
    {
        return Err(Rejection::Duplicate);
    }

    let options = coerce_options(&value).ok_or(Rejection::Malformed("options"))?;
    let correct_answer = text_field(&value, "correct_answer")
        .and_then(OptionLabel::parse_loose)
        .ok_or(Rejection::Malformed("correct_answer"))?;

    Ok(McqCandidate {
        question: question.to_string(),
        options,
        correct_answer,
        explanation: text_field(&value, "explanation")
            .unwrap_or_default()
            .to_string(),
    })
}

#[derive(Clone)]
pub struct McqService {
    llm: Arc<dyn TextGeneration>,
    policy: McqPolicy,
}

impl McqService {
    pub fn with_policy(llm: Arc<dyn TextGeneration>, policy: McqPolicy) -> Self {
        Self { llm, policy }
    }

    /// Never fails: returns the first acceptable candidate or the fallback MCQ.
    #[instrument(
        level = "info",
        skip(self, req),
        fields(
            role = %req.role,
            difficulty = %req.difficulty,
            history = req.previous_questions.len()
        )
    )]
    pub async fn generate(&self, req: &GenerationRequest) -> McqCandidate {
        let prompt = build_mcq_prompt(req);
        let threshold = self.policy.similarity_threshold;
        let mut consecutive_unavailable = 0usize;
        let mut attempts_made = 0usize;

        for attempt in 1..=self.policy.max_attempts {
            attempts_made = attempt;
            let outcome = match self.llm.generate(&prompt).await {
                Ok(raw) => {
                    consecutive_unavailable = 0;
                    validate_candidate(&raw, &req.previous_questions, threshold)
                }
                Err(e) => {
                    if e.is_backend_unavailable() {
                        consecutive_unavailable += 1;
                    } else {
                        consecutive_unavailable = 0;
                    }
                    Err(Rejection::Backend(e))
                }
            };

            match outcome {
                Ok(candidate) => {
                    tracing::info!(attempt, "MCQ candidate accepted");
                    return candidate;
                }
                Err(reason) => {
                    tracing::debug!(attempt, %reason, "MCQ attempt abandoned");
                }
            }

            if self.policy.max_consecutive_unavailable > 0
                && consecutive_unavailable >= self.policy.max_consecutive_unavailable
            {
                tracing::warn!(
                    attempt,
                    consecutive_unavailable,
                    "Generation backend unreachable, giving up early"
                );
                break;
            }
        }

        tracing::warn!(
            attempts = attempts_made,
            max_attempts = self.policy.max_attempts,
            "No acceptable MCQ generated, using fallback"
        );
        McqCandidate::fallback()
    }
}
