#![forbid(unsafe_code)]

pub mod app_services;
pub mod error;
pub mod player_service;
pub mod question_bank;
pub mod sessions;
pub mod stats_service;

pub use quiz_core::Clock;

pub use app_services::AppServices;
pub use error::{AppServicesError, PlayerError, QuestionBankError, SessionError};
pub use player_service::PlayerService;
pub use question_bank::{QuestionBank, QuizSettings};
pub use sessions::{
    ActiveQuiz, CompletionReason, QuizPhase, QuizReport, QuizSession, QuizSessionService,
    QuizStep,
};
pub use stats_service::StatsService;
