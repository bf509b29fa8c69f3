mod progress;
mod report;
mod session;
mod timer;
mod workflow;

// Public API of the session subsystem.
pub use crate::error::SessionError;
pub use progress::{SessionProgress, progress_percent};
pub use report::{AnswerReview, QuizReport};
pub use session::{Advance, CompletionReason, PlayerIdentity, QuizPhase, QuizSession, Tick};
pub use timer::CountdownTimer;
pub use workflow::{ActiveQuiz, QuizSessionService, QuizStep};
