//! Prompt text for the generation backend.
//!
//! The JSON shapes spelled out in the MCQ and feedback prompts are the wire
//! contract with the model: `mcq_service` and `feedback_service` read exactly
//! these field names back.

use crate::models::question::GenerationRequest;

/// Renders the "do not repeat" block, or nothing for a fresh session.
fn previous_questions_block(heading: &str, previous: &[String]) -> Option<String> {
    if previous.is_empty() {
        return None;
    }
    let joined = previous
        .iter()
        .map(|q| format!("- {}", q))
        .collect::<Vec<_>>()
        .join("\n");
    Some(format!(
        "{} in this session (do NOT repeat or trivially rephrase):\n\n{}",
        heading, joined
    ))
}

fn join_sections(sections: &[Option<String>]) -> String {
    sections
        .iter()
        .flatten()
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join("\n\n")
}

pub fn build_descriptive_prompt(req: &GenerationRequest) -> String {
    let header = format!(
        "You are an interviewer hiring for a {role} position.\n\n\
         Generate ONE {difficulty} level descriptive interview question\n\
         focused strictly on the subject: \"{subject}\".",
        role = req.role,
        difficulty = req.difficulty,
        subject = req.subject,
    );

    let rules = "Rules:\n\
         - One clear, unique question.\n\
         - It must NOT be the same as or a trivial rephrasing of any previous \
         question listed above.\n\
         - No numbering, bullets, or explanations.\n\
         - Suitable for spoken or written answers.\n\
         Return ONLY the question text.";

    join_sections(&[
        Some(header),
        previous_questions_block("Previously asked questions", &req.previous_questions),
        Some(rules.to_string()),
    ])
}

const MCQ_RULES: &str = "IMPORTANT MCQ DESIGN RULES:
- The question must be NEW and clearly different from the previous ones above.
- Do NOT ask simple definition-only questions.
- Do NOT ask about the \"primary goal\" / \"purpose\" / \"main aim\" of software testing.
- Prefer scenario-based or application-based questions.
- Use real-world situations, decisions, mistakes, or edge cases.
- Exactly 4 options: A, B, C, D.
- Only ONE option must be correct.
- Add a short explanation for why the correct option is right \
(and optionally why others are wrong).";

const MCQ_SCHEMA: &str = r#"Return STRICT JSON only:

{
  "question": "question text",
  "options": {
    "A": "option A",
    "B": "option B",
    "C": "option C",
    "D": "option D"
  },
  "correct_answer": "A",
  "explanation": "short explanation"
}"#;

pub fn build_mcq_prompt(req: &GenerationRequest) -> String {
    let header = format!(
        "You are preparing INTERVIEW-LEVEL MCQ questions for a {role} role.\n\n\
         Subject: \"{subject}\"\n\
         Difficulty: {difficulty}",
        role = req.role,
        subject = req.subject,
        difficulty = req.difficulty,
    );

    join_sections(&[
        Some(header),
        previous_questions_block("Previously asked MCQ questions", &req.previous_questions),
        Some(MCQ_RULES.to_string()),
        Some(MCQ_SCHEMA.to_string()),
    ])
}

pub fn build_feedback_prompt(role: &str, subject: &str, question: &str, answer: &str) -> String {
    format!(
        "You are an expert interviewer for a {role} role.\n\n\
         Interview Subject: {subject}\n\n\
         Evaluate the following answer.\n\n\
         Question: {question}\n\
         Candidate Answer: {answer}\n\n\
         Respond in STRICT JSON with exactly these fields:\n\
         - score (1 to 10 integer)\n\
         - strengths (1–3 sentences)\n\
         - improvements (1–3 sentences)\n\
         - model_answer (3–8 sentences)\n\n\
         Return ONLY JSON. No extra words."
    )
}
