use thiserror::Error;

use crate::questions::QuestionId;

/// Raised while turning a validated quiz payload into typed preferences.
/// Reaching the engine with one of these means the upstream form validation
/// let a malformed answer through; it is a defect report, not a user-facing
/// failure.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum PreferenceError {
    #[error("answer for `{question}` has the wrong shape, expected {expected}")]
    WrongShape { question: QuestionId, expected: &'static str },
    #[error("answer for `{question}` is out of range: {value}")]
    OutOfRange { question: QuestionId, value: String },
    #[error("unknown option `{value}` for `{question}`")]
    UnknownOption { question: QuestionId, value: String },
}

impl PreferenceError {
    pub fn question(&self) -> QuestionId {
        match self {
            Self::WrongShape { question, .. }
            | Self::OutOfRange { question, .. }
            | Self::UnknownOption { question, .. } => *question,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn errors_name_the_offending_question() {
        let error = PreferenceError::UnknownOption {
            question: QuestionId::Bitterness,
            value: "extreme".to_owned(),
        };
        assert_eq!(error.question(), QuestionId::Bitterness);
        assert_eq!(error.to_string(), "unknown option `extreme` for `bitterness`");
    }
}
