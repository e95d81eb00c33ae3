use serde::{Deserialize, Serialize};

pub const DEGRADED_SCORE: i64 = 6;
pub const DEGRADED_STRENGTHS: &str = "Answer shows partial understanding of the topic.";
pub const DEGRADED_IMPROVEMENTS: &str = "Improve structure, depth, and include examples.";
pub const MODEL_ANSWER_MAX_CHARS: usize = 800;

/// Scored evaluation of a candidate's answer. `score` is nominally 1-10 but is
/// passed through unchecked from the model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedbackResult {
    pub score: i64,
    pub strengths: String,
    pub improvements: String,
    #[serde(alias = "modelAnswer")]
    pub model_answer: String,
}

impl FeedbackResult {
    /// Generic evaluation used when the model output could not be parsed.
    /// The raw output is kept as the model answer, cut to 800 characters.
    pub fn degraded(raw: &str) -> Self {
        Self {
            score: DEGRADED_SCORE,
            strengths: DEGRADED_STRENGTHS.to_string(),
            improvements: DEGRADED_IMPROVEMENTS.to_string(),
            model_answer: raw.chars().take(MODEL_ANSWER_MAX_CHARS).collect(),
        }
    }
}
