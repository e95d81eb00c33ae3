pub mod config;
pub mod dto;
pub mod error;
pub mod models;
pub mod routes;
pub mod services;
pub mod telemetry;
pub mod utils;

use crate::config::Config;
use crate::error::Result;
use crate::services::{
    feedback_service::FeedbackService,
    llm_client::{OllamaClient, TextGeneration},
    mcq_service::{McqPolicy, McqService},
    question_service::QuestionService,
};
use std::sync::Arc;
use std::time::Duration;

#[derive(Clone)]
pub struct AppState {
    pub model_name: String,
    pub question_service: QuestionService,
    pub feedback_service: FeedbackService,
    pub mcq_service: McqService,
}

impl AppState {
    /// Wire every service to one shared backend. No session state lives here;
    /// question history arrives with each request.
    pub fn new(
        llm: Arc<dyn TextGeneration>,
        model_name: impl Into<String>,
        policy: McqPolicy,
    ) -> Self {
        Self {
            model_name: model_name.into(),
            question_service: QuestionService::new(llm.clone()),
            feedback_service: FeedbackService::new(llm.clone()),
            mcq_service: McqService::with_policy(llm, policy),
        }
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        let client = OllamaClient::with_timeout(
            config.ollama_base_url.clone(),
            config.ollama_model.clone(),
            config.llm_timeout_secs.map(Duration::from_secs),
        )?;
        let policy = McqPolicy {
            max_attempts: config.mcq_max_attempts,
            max_consecutive_unavailable: config.mcq_max_consecutive_unavailable,
            ..McqPolicy::default()
        };
        let model_name = client.model().to_string();
        Ok(Self::new(Arc::new(client), model_name, policy))
    }
}
