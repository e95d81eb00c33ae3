use serde::{Deserialize, Serialize};
use std::fmt;

/// Requested difficulty. Known levels are normalised; anything else is kept
/// as trimmed free text and rendered into the prompt as-is.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
    Other(String),
}

impl From<String> for Difficulty {
    fn from(raw: String) -> Self {
        match raw.trim().to_lowercase().as_str() {
            "easy" => Difficulty::Easy,
            "medium" => Difficulty::Medium,
            "hard" => Difficulty::Hard,
            _ => Difficulty::Other(raw.trim().to_string()),
        }
    }
}

impl From<&str> for Difficulty {
    fn from(raw: &str) -> Self {
        Difficulty::from(raw.to_string())
    }
}

impl From<Difficulty> for String {
    fn from(d: Difficulty) -> Self {
        d.to_string()
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Difficulty::Easy => f.write_str("easy"),
            Difficulty::Medium => f.write_str("medium"),
            Difficulty::Hard => f.write_str("hard"),
            Difficulty::Other(s) => f.write_str(s),
        }
    }
}

/// Everything a generator needs for one call. The session history is owned by
/// the caller and re-sent every time.
#[derive(Debug, Clone)]
pub struct GenerationRequest {
    pub role: String,
    pub difficulty: Difficulty,
    pub subject: String,
    pub previous_questions: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OptionLabel {
    A,
    B,
    C,
    D,
}

impl OptionLabel {
    pub const ALL: [OptionLabel; 4] = [
        OptionLabel::A,
        OptionLabel::B,
        OptionLabel::C,
        OptionLabel::D,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            OptionLabel::A => "A",
            OptionLabel::B => "B",
            OptionLabel::C => "C",
            OptionLabel::D => "D",
        }
    }

    /// Lenient label parsing for model output: `"c"`, `" C "`, `"C)"` and
    /// `"C."` all resolve to `C`.
    pub fn parse_loose(raw: &str) -> Option<Self> {
        let cleaned = raw.trim().trim_end_matches([')', '.']).trim();
        match cleaned.to_ascii_uppercase().as_str() {
            "A" => Some(OptionLabel::A),
            "B" => Some(OptionLabel::B),
            "C" => Some(OptionLabel::C),
            "D" => Some(OptionLabel::D),
            _ => None,
        }
    }
}

impl fmt::Display for OptionLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The four answer options. A struct rather than a map so that "exactly four,
/// labelled A-D" holds by construction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct McqOptions {
    #[serde(rename = "A")]
    pub a: String,
    #[serde(rename = "B")]
    pub b: String,
    #[serde(rename = "C")]
    pub c: String,
    #[serde(rename = "D")]
    pub d: String,
}

impl McqOptions {
    pub fn get(&self, label: OptionLabel) -> &str {
        match label {
            OptionLabel::A => &self.a,
            OptionLabel::B => &self.b,
            OptionLabel::C => &self.c,
            OptionLabel::D => &self.d,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (OptionLabel, &str)> {
        OptionLabel::ALL.into_iter().map(move |l| (l, self.get(l)))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct McqCandidate {
    pub question: String,
    pub options: McqOptions,
    pub correct_answer: OptionLabel,
    pub explanation: String,
}

impl McqCandidate {
    /// Safe question returned when every generation attempt was rejected.
    pub fn fallback() -> Self {
        Self {
            question: "Which of the following is an example of non-functional testing?"
                .to_string(),
            options: McqOptions {
                a: "Unit testing".to_string(),
                b: "Integration testing".to_string(),
                c: "Performance testing".to_string(),
                d: "Smoke testing".to_string(),
            },
            correct_answer: OptionLabel::C,
            explanation: "Performance testing checks how the system behaves under load, \
                          which is non-functional behaviour."
                .to_string(),
        }
    }
}
