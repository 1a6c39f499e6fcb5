use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Wire shape the model is asked to produce for a quiz.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct RawQuizPayload {
    pub questions: Vec<RawQuizQuestion>,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct RawQuizQuestion {
    /// The question text.
    pub question: String,
    /// Exactly four options, prefixed "A)" to "D)".
    pub options: Vec<String>,
    /// A single letter: A, B, C or D.
    pub correct_answer: String,
    /// Why the correct answer is correct.
    #[serde(default)]
    pub explanation: String,
}

impl RawQuizPayload {
    pub fn example() -> Self {
        RawQuizPayload {
            questions: vec![RawQuizQuestion {
                question: "Question text here?".to_string(),
                options: vec![
                    "A) Option 1".to_string(),
                    "B) Option 2".to_string(),
                    "C) Option 3".to_string(),
                    "D) Option 4".to_string(),
                ],
                correct_answer: "A".to_string(),
                explanation: "Brief explanation of why this is correct".to_string(),
            }],
        }
    }
}
