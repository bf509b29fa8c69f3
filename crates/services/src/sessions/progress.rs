/// Aggregated view of session progress, useful for UI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionProgress {
    /// 1-based position of the question on screen; equals `total` once finished.
    pub position: usize,
    pub total: usize,
    pub answered: usize,
    /// `round(question_index / total * 100)`: 0 on the first question.
    pub percent: u8,
    pub remaining_seconds: u32,
    pub is_complete: bool,
}

/// Share of questions already passed, rounded half up.
#[must_use]
pub fn progress_percent(question_index: usize, total: usize) -> u8 {
    if total == 0 {
        return 0;
    }
    let index = question_index.min(total);
    u8::try_from((index * 200 + total) / (total * 2)).unwrap_or(100)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_at_zero_not_one_over_n() {
        assert_eq!(progress_percent(0, 10), 0);
        assert_eq!(progress_percent(1, 10), 10);
        assert_eq!(progress_percent(1, 3), 33);
        assert_eq!(progress_percent(2, 3), 67);
        assert_eq!(progress_percent(3, 3), 100);
    }
}
