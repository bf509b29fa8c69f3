use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::ids::QuestionId;

/// Every question offers exactly this many choices.
pub const OPTION_COUNT: usize = 4;

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum QuestionError {
    #[error("question {id} has empty text")]
    EmptyText { id: QuestionId },

    #[error("question {id} must have exactly 4 options, found {found}")]
    OptionCount { id: QuestionId, found: usize },

    #[error("question {id} has correct option {index} out of range")]
    CorrectOptionOutOfRange { id: QuestionId, index: usize },

    #[error("option order is not a permutation of the 4 option slots")]
    InvalidPermutation,
}

//
// ─── QUESTION ──────────────────────────────────────────────────────────────────
//

/// Serialized shape of a question as it appears in a question bank file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionDraft {
    pub id: u32,
    pub question: String,
    pub options: Vec<String>,
    pub correct_answer: usize,
    #[serde(default)]
    pub explanation: String,
}

/// A validated multiple-choice question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "QuestionDraft", into = "QuestionDraft")]
pub struct Question {
    id: QuestionId,
    text: String,
    options: [String; OPTION_COUNT],
    correct_option_index: usize,
    explanation: String,
}

impl Question {
    /// Build a question, validating option count and the correct index.
    ///
    /// # Errors
    ///
    /// Returns `QuestionError` if the text is blank, there are not exactly
    /// four options, or the correct index does not point at an option.
    pub fn new(
        id: QuestionId,
        text: impl Into<String>,
        options: Vec<String>,
        correct_option_index: usize,
        explanation: impl Into<String>,
    ) -> Result<Self, QuestionError> {
        let text = text.into();
        if text.trim().is_empty() {
            return Err(QuestionError::EmptyText { id });
        }
        let found = options.len();
        let options: [String; OPTION_COUNT] = options
            .try_into()
            .map_err(|_| QuestionError::OptionCount { id, found })?;
        if correct_option_index >= OPTION_COUNT {
            return Err(QuestionError::CorrectOptionOutOfRange {
                id,
                index: correct_option_index,
            });
        }

        Ok(Self {
            id,
            text,
            options,
            correct_option_index,
            explanation: explanation.into(),
        })
    }

    #[must_use]
    pub fn id(&self) -> QuestionId {
        self.id
    }

    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    #[must_use]
    pub fn options(&self) -> &[String] {
        &self.options
    }

    #[must_use]
    pub fn option(&self, index: usize) -> Option<&str> {
        self.options.get(index).map(String::as_str)
    }

    #[must_use]
    pub fn correct_option_index(&self) -> usize {
        self.correct_option_index
    }

    #[must_use]
    pub fn explanation(&self) -> &str {
        &self.explanation
    }

    #[must_use]
    pub fn is_correct(&self, selected: usize) -> bool {
        selected == self.correct_option_index
    }

    /// Returns a copy with options rearranged so that new slot `i` holds the
    /// old option `order[i]`. The correct index follows its option.
    ///
    /// # Errors
    ///
    /// Returns `QuestionError::InvalidPermutation` if `order` repeats or skips a slot.
    pub fn reorder_options(&self, order: [usize; OPTION_COUNT]) -> Result<Self, QuestionError> {
        let mut seen = [false; OPTION_COUNT];
        for &slot in &order {
            if slot >= OPTION_COUNT || seen[slot] {
                return Err(QuestionError::InvalidPermutation);
            }
            seen[slot] = true;
        }

        let options = order.map(|slot| self.options[slot].clone());
        let correct_option_index = order
            .iter()
            .position(|&slot| slot == self.correct_option_index)
            .ok_or(QuestionError::InvalidPermutation)?;

        Ok(Self {
            options,
            correct_option_index,
            ..self.clone()
        })
    }

    /// Letter label shown next to an option (`A`..`D`).
    #[must_use]
    pub fn option_label(index: usize) -> char {
        u8::try_from(index)
            .ok()
            .filter(|i| usize::from(*i) < OPTION_COUNT)
            .map_or('?', |i| char::from(b'A' + i))
    }
}

impl TryFrom<QuestionDraft> for Question {
    type Error = QuestionError;

    fn try_from(draft: QuestionDraft) -> Result<Self, Self::Error> {
        Self::new(
            QuestionId::new(draft.id),
            draft.question,
            draft.options,
            draft.correct_answer,
            draft.explanation,
        )
    }
}

impl From<Question> for QuestionDraft {
    fn from(question: Question) -> Self {
        Self {
            id: question.id.value(),
            question: question.text,
            options: question.options.into(),
            correct_answer: question.correct_option_index,
            explanation: question.explanation,
        }
    }
}
