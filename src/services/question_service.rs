use crate::error::Result;
use crate::models::question::GenerationRequest;
use crate::services::llm_client::TextGeneration;
use crate::services::prompt_builder::build_descriptive_prompt;
use std::sync::Arc;
use tracing::instrument;

/// Open-ended question generation. Single shot: whatever the backend returns
/// is the question, and backend failures reach the caller.
#[derive(Clone)]
pub struct QuestionService {
    llm: Arc<dyn TextGeneration>,
}

impl QuestionService {
    pub fn new(llm: Arc<dyn TextGeneration>) -> Self {
        Self { llm }
    }

    #[instrument(
        level = "info",
        skip(self, req),
        fields(
            role = %req.role,
            difficulty = %req.difficulty,
            history = req.previous_questions.len()
        )
    )]
    pub async fn generate(&self, req: &GenerationRequest) -> Result<String> {
        let prompt = build_descriptive_prompt(req);
        let question = self.llm.generate(&prompt).await?;
        Ok(question.trim().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::models::question::Difficulty;
    use crate::services::llm_client::MockTextGeneration;

    fn request() -> GenerationRequest {
        GenerationRequest {
            role: "Software Quality Analyst".into(),
            difficulty: Difficulty::Easy,
            subject: "Exploratory Testing".into(),
            previous_questions: vec!["How do you plan an exploratory session?".into()],
        }
    }

    #[tokio::test]
    async fn returns_backend_text_trimmed() {
        let mut backend = MockTextGeneration::new();
        backend
            .expect_generate()
            .withf(|prompt| prompt.contains("- How do you plan an exploratory session?"))
            .times(1)
            .returning(|_| {
                Ok("  How would you document findings from a time-boxed charter?\n".to_string())
            });
        let service = QuestionService::new(Arc::new(backend));

        let q = service.generate(&request()).await.unwrap();
        assert_eq!(q, "How would you document findings from a time-boxed charter?");
    }

    #[tokio::test]
    async fn propagates_backend_failure() {
        let mut backend = MockTextGeneration::new();
        backend
            .expect_generate()
            .times(1)
            .returning(|_| Err(Error::BackendUnavailable("connection refused".into())));
        let service = QuestionService::new(Arc::new(backend));

        let err = service.generate(&request()).await.unwrap_err();
        assert!(err.is_backend_unavailable());
    }
}
