pub mod feedback_service;
pub mod llm_client;
pub mod mcq_service;
pub mod prompt_builder;
pub mod question_service;
