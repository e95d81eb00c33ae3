use crate::models::question::{Difficulty, GenerationRequest};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Deserialize)]
pub struct GenerateQuestionPayload {
    pub role: String,
    pub difficulty: Difficulty,
    pub subject: String,
    #[serde(default)]
    pub previous_questions: Vec<String>,
}

impl From<GenerateQuestionPayload> for GenerationRequest {
    fn from(p: GenerateQuestionPayload) -> Self {
        GenerationRequest {
            role: p.role,
            difficulty: p.difficulty,
            subject: p.subject,
            previous_questions: p.previous_questions,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuestionResponse {
    pub question: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FeedbackPayload {
    pub role: String,
    pub subject: String,
    pub question: String,
    pub answer: String,
}
