use std::sync::Arc;

use quiz_core::model::{DEFAULT_PLAYER_NAME, PlayerId, ScoreId, ScoreRecord};
use storage::score_store::ScoreStore;

use super::session::{Advance, CompletionReason, PlayerIdentity, QuizSession, Tick};
use super::timer::CountdownTimer;
use crate::Clock;
use crate::error::SessionError;
use crate::question_bank::{QuestionBank, QuizSettings};

/// Result of a step that changed the quiz.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QuizStep {
    Next {
        question_index: usize,
    },
    Ticked {
        remaining_seconds: u32,
    },
    Finished {
        record: ScoreRecord,
        reason: CompletionReason,
    },
}

/// A quiz being played, together with its countdown.
///
/// The timer exists only while the session is in progress: every transition
/// out of `InProgress` drops it.
#[derive(Debug)]
pub struct ActiveQuiz {
    session: QuizSession,
    timer: Option<CountdownTimer>,
    persisted: Option<ScoreId>,
}

impl ActiveQuiz {
    #[must_use]
    pub fn session(&self) -> &QuizSession {
        &self.session
    }

    #[must_use]
    pub fn is_timer_running(&self) -> bool {
        self.timer.is_some()
    }

    /// Id of the stored score once the result has been persisted.
    #[must_use]
    pub fn persisted_id(&self) -> Option<&ScoreId> {
        self.persisted.as_ref()
    }

    /// Wait for the countdown's next second without applying it.
    ///
    /// Returns `false` once the countdown has stopped. Cancel-safe, so it can
    /// be raced against player input; apply the second afterwards with
    /// [`QuizSessionService::tick`].
    pub async fn next_tick(&mut self) -> bool {
        match self.timer.as_mut() {
            Some(timer) => timer.next_tick().await.is_some(),
            None => false,
        }
    }

    fn stop_timer(&mut self) {
        if let Some(timer) = self.timer.take() {
            timer.cancel();
        }
    }
}

/// Orchestrates starting, playing and persisting quiz sessions.
#[derive(Clone)]
pub struct QuizSessionService {
    clock: Clock,
    scores: ScoreStore,
    bank: Arc<QuestionBank>,
    settings: QuizSettings,
}

impl QuizSessionService {
    #[must_use]
    pub fn new(clock: Clock, scores: ScoreStore, bank: Arc<QuestionBank>) -> Self {
        Self {
            clock,
            scores,
            bank,
            settings: QuizSettings::default(),
        }
    }

    #[must_use]
    pub fn with_settings(mut self, settings: QuizSettings) -> Self {
        self.settings = settings;
        self
    }

    #[must_use]
    pub fn settings(&self) -> QuizSettings {
        self.settings
    }

    #[must_use]
    pub fn bank(&self) -> &QuestionBank {
        &self.bank
    }

    /// Start a new attempt and its countdown.
    ///
    /// A stored player name is used when available; if it cannot be read the
    /// attempt is recorded under the default name.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::QuestionBank` if the questions cannot be prepared.
    pub async fn start(&self) -> Result<ActiveQuiz, SessionError> {
        let player_name = match self.scores.player_name().await {
            Ok(Some(name)) => name,
            Ok(None) => DEFAULT_PLAYER_NAME.to_owned(),
            Err(err) => {
                tracing::warn!(error = %err, "could not read player name; using default");
                DEFAULT_PLAYER_NAME.to_owned()
            }
        };
        let questions = self.bank.prepare(&self.settings)?;
        let player = PlayerIdentity::new(PlayerId::generate(), player_name);
        let session = QuizSession::start(
            player,
            questions,
            self.bank.time_limit_seconds(),
            self.clock.now(),
        )?;

        tracing::info!(
            questions = session.total_questions(),
            time_limit = self.bank.time_limit_seconds(),
            "quiz started"
        );

        Ok(ActiveQuiz {
            session,
            timer: Some(CountdownTimer::start()),
            persisted: None,
        })
    }

    /// Choose an option on the current question.
    ///
    /// # Errors
    ///
    /// See [`QuizSession::select_option`].
    pub fn select_option(&self, quiz: &mut ActiveQuiz, index: usize) -> Result<(), SessionError> {
        quiz.session.select_option(index)
    }

    /// Record the selected answer; persists the result after the last question.
    ///
    /// If persisting fails the quiz is still completed and the error is
    /// returned; call [`persist_result`](Self::persist_result) to retry.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::NoSelection` when nothing is selected, or
    /// `SessionError::Storage` if the final score cannot be saved.
    pub async fn advance(&self, quiz: &mut ActiveQuiz) -> Result<QuizStep, SessionError> {
        match quiz.session.advance(self.clock.now())? {
            Advance::Next { question_index } => Ok(QuizStep::Next { question_index }),
            Advance::Completed(record) => {
                self.finish(quiz, record, CompletionReason::AllAnswered)
                    .await
            }
        }
    }

    /// Apply one countdown second; persists the result on timeout.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::NotInProgress` once the quiz has ended, or
    /// `SessionError::Storage` if the timed-out score cannot be saved.
    pub async fn tick(&self, quiz: &mut ActiveQuiz) -> Result<QuizStep, SessionError> {
        match quiz.session.tick(self.clock.now())? {
            Tick::Running { remaining_seconds } => Ok(QuizStep::Ticked { remaining_seconds }),
            Tick::TimedOut(record) => {
                tracing::info!("quiz time is up");
                self.finish(quiz, record, CompletionReason::TimedOut).await
            }
        }
    }

    /// Wait for the countdown's next second, then apply it.
    ///
    /// Not cancel-safe: on timeout the result is saved inside this future, and
    /// dropping it mid-save leaves the quiz completed but unsaved. When racing
    /// against input, use [`ActiveQuiz::next_tick`] and call
    /// [`tick`](Self::tick) outside the race, or retry with
    /// [`persist_result`](Self::persist_result).
    ///
    /// # Errors
    ///
    /// Returns `SessionError::NotInProgress` if the countdown is no longer
    /// running, plus anything [`tick`](Self::tick) returns.
    pub async fn wait_for_tick(&self, quiz: &mut ActiveQuiz) -> Result<QuizStep, SessionError> {
        if !quiz.next_tick().await {
            return Err(SessionError::NotInProgress);
        }
        self.tick(quiz).await
    }

    /// Abandon the quiz without recording a score. The caller confirms intent first.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::NotInProgress` if the quiz already ended.
    pub fn quit(&self, quiz: &mut ActiveQuiz) -> Result<(), SessionError> {
        quiz.session.quit()?;
        quiz.stop_timer();
        tracing::info!(answered = quiz.session.answers().len(), "quiz abandoned");
        Ok(())
    }

    /// Persist the completed result if it has not been stored yet.
    ///
    /// Useful when the save at completion failed; retrying is left to the caller.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::NotCompleted` if the quiz has no result, or
    /// `SessionError::Storage` if persistence fails.
    pub async fn persist_result(&self, quiz: &mut ActiveQuiz) -> Result<ScoreId, SessionError> {
        if let Some(id) = &quiz.persisted {
            return Ok(id.clone());
        }
        let record = quiz.session.result().ok_or(SessionError::NotCompleted)?;
        self.scores.save_score(record).await?;
        let id = record.id().clone();
        quiz.persisted = Some(id.clone());
        Ok(id)
    }

    async fn finish(
        &self,
        quiz: &mut ActiveQuiz,
        record: ScoreRecord,
        reason: CompletionReason,
    ) -> Result<QuizStep, SessionError> {
        quiz.stop_timer();
        tracing::info!(
            score = record.score_percent(),
            correct = record.correct_count(),
            total = record.total_questions(),
            time_used = record.time_used_seconds(),
            ?reason,
            "quiz completed"
        );
        self.persist_result(quiz).await?;
        Ok(QuizStep::Finished { record, reason })
    }
}
