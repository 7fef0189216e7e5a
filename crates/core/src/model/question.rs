use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use thiserror::Error;

use crate::model::difficulty::Difficulty;

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum QuestionError {
    #[error("question text cannot be empty")]
    EmptyText,

    #[error("a question needs 2 to 4 choices, got {0}")]
    ChoiceCount(usize),

    #[error("choice cannot be empty")]
    EmptyChoice,

    #[error("duplicate choice: {0}")]
    DuplicateChoice(String),

    #[error("correct answer {0:?} is not one of the choices")]
    AnswerNotInChoices(String),
}

//
// ─── DRAFT ─────────────────────────────────────────────────────────────────────
//

/// Unvalidated question as read from a bank file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionDraft {
    pub text: String,
    pub choices: Vec<String>,
    pub answer: String,
    pub difficulty: Difficulty,
}

impl QuestionDraft {
    /// Validate the draft into an immutable question.
    ///
    /// # Errors
    ///
    /// Returns `QuestionError` if the text, choices or answer are invalid.
    pub fn validate(self) -> Result<QuestionRecord, QuestionError> {
        QuestionRecord::new(self.text, self.choices, self.answer, self.difficulty)
    }
}

//
// ─── RECORD ────────────────────────────────────────────────────────────────────
//

/// A multiple-choice question. Never mutated after construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestionRecord {
    text: String,
    choices: Vec<String>,
    correct_answer: String,
    difficulty: Difficulty,
}

impl QuestionRecord {
    pub const MIN_CHOICES: usize = 2;
    pub const MAX_CHOICES: usize = 4;

    /// Creates a validated question.
    ///
    /// # Errors
    ///
    /// Returns `QuestionError::EmptyText` for blank text,
    /// `QuestionError::ChoiceCount` outside 2..=4 choices,
    /// `QuestionError::DuplicateChoice` for repeated choices and
    /// `QuestionError::AnswerNotInChoices` when the answer is not offered.
    pub fn new(
        text: impl Into<String>,
        choices: Vec<String>,
        correct_answer: impl Into<String>,
        difficulty: Difficulty,
    ) -> Result<Self, QuestionError> {
        let text = text.into();
        let correct_answer = correct_answer.into();

        if text.trim().is_empty() {
            return Err(QuestionError::EmptyText);
        }
        if !(Self::MIN_CHOICES..=Self::MAX_CHOICES).contains(&choices.len()) {
            return Err(QuestionError::ChoiceCount(choices.len()));
        }

        let mut seen = HashSet::with_capacity(choices.len());
        for choice in &choices {
            if choice.trim().is_empty() {
                return Err(QuestionError::EmptyChoice);
            }
            if !seen.insert(choice.as_str()) {
                return Err(QuestionError::DuplicateChoice(choice.clone()));
            }
        }
        if !seen.contains(correct_answer.as_str()) {
            return Err(QuestionError::AnswerNotInChoices(correct_answer));
        }

        Ok(Self {
            text,
            choices,
            correct_answer,
            difficulty,
        })
    }

    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    #[must_use]
    pub fn choices(&self) -> &[String] {
        &self.choices
    }

    #[must_use]
    pub fn correct_answer(&self) -> &str {
        &self.correct_answer
    }

    #[must_use]
    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    /// Returns true if `choice` is one of the offered choices.
    #[must_use]
    pub fn has_choice(&self, choice: &str) -> bool {
        self.choices.iter().any(|c| c == choice)
    }

    #[must_use]
    pub fn is_correct(&self, choice: &str) -> bool {
        self.correct_answer == choice
    }
}
