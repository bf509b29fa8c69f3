use std::sync::Arc;

use storage::repository::Storage;

use crate::Clock;
use crate::error::AppServicesError;
use crate::player_service::PlayerService;
use crate::question_bank::{QuestionBank, QuizSettings};
use crate::sessions::QuizSessionService;
use crate::stats_service::StatsService;

/// Assembles app-facing services over one storage backend.
#[derive(Clone)]
pub struct AppServices {
    quiz: Arc<QuizSessionService>,
    stats: Arc<StatsService>,
    player: Arc<PlayerService>,
}

impl AppServices {
    /// Build services backed by `SQLite` storage and the bundled question bank.
    ///
    /// # Errors
    ///
    /// Returns `AppServicesError` if storage initialization fails or the
    /// bundled question bank is invalid.
    pub async fn new_sqlite(
        db_url: &str,
        clock: Clock,
        settings: QuizSettings,
    ) -> Result<Self, AppServicesError> {
        let storage = Storage::sqlite(db_url).await?;
        let bank = QuestionBank::bundled()?;
        Ok(Self::from_parts(&storage, clock, bank, settings))
    }

    /// Build services over an in-memory store.
    ///
    /// # Errors
    ///
    /// Returns `AppServicesError::QuestionBank` if the bundled question bank is invalid.
    pub fn in_memory(clock: Clock, settings: QuizSettings) -> Result<Self, AppServicesError> {
        let bank = QuestionBank::bundled()?;
        Ok(Self::from_parts(&Storage::in_memory(), clock, bank, settings))
    }

    #[must_use]
    pub fn from_parts(
        storage: &Storage,
        clock: Clock,
        bank: QuestionBank,
        settings: QuizSettings,
    ) -> Self {
        let scores = storage.scores();
        let quiz = Arc::new(
            QuizSessionService::new(clock, scores.clone(), Arc::new(bank)).with_settings(settings),
        );
        let stats = Arc::new(StatsService::new(scores.clone()));
        let player = Arc::new(PlayerService::new(scores));

        Self {
            quiz,
            stats,
            player,
        }
    }

    #[must_use]
    pub fn quiz(&self) -> Arc<QuizSessionService> {
        Arc::clone(&self.quiz)
    }

    #[must_use]
    pub fn stats(&self) -> Arc<StatsService> {
        Arc::clone(&self.stats)
    }

    #[must_use]
    pub fn player(&self) -> Arc<PlayerService> {
        Arc::clone(&self.player)
    }
}
