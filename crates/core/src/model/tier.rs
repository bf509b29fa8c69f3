use std::fmt;

/// Result band for a finished quiz, used for the headline on the result screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ScoreTier {
    KeepPracticing,
    Pass,
    Bronze,
    Silver,
    Gold,
    Trophy,
}

impl ScoreTier {
    #[must_use]
    pub fn for_percent(percent: u8) -> Self {
        match percent {
            95.. => Self::Trophy,
            85..=94 => Self::Gold,
            75..=84 => Self::Silver,
            65..=74 => Self::Bronze,
            50..=64 => Self::Pass,
            _ => Self::KeepPracticing,
        }
    }

    #[must_use]
    pub fn emoji(self) -> &'static str {
        match self {
            Self::Trophy => "🏆",
            Self::Gold => "🥇",
            Self::Silver => "🥈",
            Self::Bronze => "🥉",
            Self::Pass => "👍",
            Self::KeepPracticing => "💪",
        }
    }

    #[must_use]
    pub fn message(self) -> &'static str {
        match self {
            Self::Trophy => "Outstanding! You're a natural!",
            Self::Gold => "Great job! You did really well!",
            Self::Silver => "Good work! A solid result!",
            Self::Bronze => "Fair. Keep practicing!",
            Self::Pass => "Passed, but worth another review!",
            Self::KeepPracticing => "No worries, give it another try!",
        }
    }
}

impl fmt::Display for ScoreTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.emoji(), self.message())
    }
}
