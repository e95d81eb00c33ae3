use crate::dto::interview_dto::{FeedbackPayload, GenerateQuestionPayload, QuestionResponse};
use crate::error::Result;
use crate::models::feedback::FeedbackResult;
use crate::models::question::{GenerationRequest, McqCandidate};
use crate::AppState;
use axum::{extract::State, Json};

pub async fn generate_question(
    State(state): State<AppState>,
    Json(payload): Json<GenerateQuestionPayload>,
) -> Result<Json<QuestionResponse>> {
    let req = GenerationRequest::from(payload);
    let question = state.question_service.generate(&req).await?;
    Ok(Json(QuestionResponse { question }))
}

pub async fn feedback(
    State(state): State<AppState>,
    Json(payload): Json<FeedbackPayload>,
) -> Result<Json<FeedbackResult>> {
    let result = state
        .feedback_service
        .evaluate(
            &payload.role,
            &payload.subject,
            &payload.question,
            &payload.answer,
        )
        .await?;
    Ok(Json(result))
}

pub async fn generate_mcq(
    State(state): State<AppState>,
    Json(payload): Json<GenerateQuestionPayload>,
) -> Json<McqCandidate> {
    let req = GenerationRequest::from(payload);
    Json(state.mcq_service.generate(&req).await)
}
