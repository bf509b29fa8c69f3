use rand::Rng;
use rand::seq::SliceRandom;
use serde::Deserialize;
use std::collections::HashSet;

use quiz_core::model::{OPTION_COUNT, Question};

use crate::error::QuestionBankError;

/// Default session length: 30 minutes.
pub const SESSION_TIME_LIMIT_SECS: u32 = 1800;

const BUNDLED_BANK: &str = include_str!("../data/math_questions.json");

#[derive(Debug, Deserialize)]
struct BankFile {
    quiz: QuizFile,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct QuizFile {
    title: String,
    #[serde(default)]
    description: String,
    total_questions: usize,
    #[serde(default = "default_time_limit")]
    time_limit_seconds: u32,
    questions: Vec<Question>,
}

fn default_time_limit() -> u32 {
    SESSION_TIME_LIMIT_SECS
}

/// A read-only set of questions plus session metadata.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestionBank {
    title: String,
    description: String,
    time_limit_seconds: u32,
    questions: Vec<Question>,
}

impl QuestionBank {
    /// # Errors
    ///
    /// Returns `QuestionBankError` if the bank is empty, has duplicate ids,
    /// or a zero time limit.
    pub fn new(
        title: impl Into<String>,
        description: impl Into<String>,
        time_limit_seconds: u32,
        questions: Vec<Question>,
    ) -> Result<Self, QuestionBankError> {
        if questions.is_empty() {
            return Err(QuestionBankError::Empty);
        }
        if time_limit_seconds == 0 {
            return Err(QuestionBankError::InvalidTimeLimit);
        }
        let mut seen = HashSet::new();
        for question in &questions {
            if !seen.insert(question.id()) {
                return Err(QuestionBankError::DuplicateId(question.id().value()));
            }
        }

        Ok(Self {
            title: title.into(),
            description: description.into(),
            time_limit_seconds,
            questions,
        })
    }

    /// Parse a bank from its JSON file format.
    ///
    /// # Errors
    ///
    /// Returns `QuestionBankError::Parse` for malformed JSON or invalid
    /// questions, and `CountMismatch` if `totalQuestions` disagrees with the list.
    pub fn from_json(json: &str) -> Result<Self, QuestionBankError> {
        let file: BankFile = serde_json::from_str(json)?;
        let quiz = file.quiz;
        if quiz.total_questions != quiz.questions.len() {
            return Err(QuestionBankError::CountMismatch {
                declared: quiz.total_questions,
                actual: quiz.questions.len(),
            });
        }
        Self::new(
            quiz.title,
            quiz.description,
            quiz.time_limit_seconds,
            quiz.questions,
        )
    }

    /// The math bank compiled into the binary.
    ///
    /// # Errors
    ///
    /// Returns `QuestionBankError` if the bundled file is invalid.
    pub fn bundled() -> Result<Self, QuestionBankError> {
        Self::from_json(BUNDLED_BANK)
    }

    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    #[must_use]
    pub fn time_limit_seconds(&self) -> u32 {
        self.time_limit_seconds
    }

    #[must_use]
    pub fn total_questions(&self) -> usize {
        self.questions.len()
    }

    #[must_use]
    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    /// Questions for one session, shuffled according to `settings`.
    ///
    /// # Errors
    ///
    /// Returns `QuestionBankError::Question` if an option reorder fails.
    pub fn prepare(&self, settings: &QuizSettings) -> Result<Vec<Question>, QuestionBankError> {
        self.prepare_with_rng(settings, &mut rand::rng())
    }

    /// Same as [`prepare`](Self::prepare) with a caller-supplied random source.
    ///
    /// # Errors
    ///
    /// Returns `QuestionBankError::Question` if an option reorder fails.
    pub fn prepare_with_rng<R: Rng + ?Sized>(
        &self,
        settings: &QuizSettings,
        rng: &mut R,
    ) -> Result<Vec<Question>, QuestionBankError> {
        let mut questions = self.questions.clone();
        if settings.shuffle_questions {
            questions.shuffle(rng);
        }
        if settings.shuffle_options {
            questions = questions
                .iter()
                .map(|question| {
                    let mut order: [usize; OPTION_COUNT] = std::array::from_fn(|i| i);
                    order.shuffle(rng);
                    question.reorder_options(order)
                })
                .collect::<Result<_, _>>()?;
        }
        Ok(questions)
    }
}

/// Per-session presentation options.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[allow(clippy::struct_excessive_bools)]
pub struct QuizSettings {
    pub show_timer: bool,
    pub shuffle_questions: bool,
    pub shuffle_options: bool,
    pub show_explanation: bool,
}

impl Default for QuizSettings {
    fn default() -> Self {
        Self {
            show_timer: true,
            shuffle_questions: false,
            shuffle_options: false,
            show_explanation: true,
        }
    }
}

impl QuizSettings {
    #[must_use]
    pub fn with_shuffle_questions(mut self, shuffle: bool) -> Self {
        self.shuffle_questions = shuffle;
        self
    }

    #[must_use]
    pub fn with_shuffle_options(mut self, shuffle: bool) -> Self {
        self.shuffle_options = shuffle;
        self
    }
}
