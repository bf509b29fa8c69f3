use quiz_core::model::{Question, QuestionId, ScoreRecord, ScoreTier};
use quiz_core::time::format_time;

/// One answered question joined with the question it refers to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnswerReview {
    pub number: usize,
    pub question_id: QuestionId,
    pub question: String,
    pub selected: String,
    pub correct: String,
    pub is_correct: bool,
    pub explanation: String,
}

/// Everything the result screen shows for a finished quiz.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuizReport {
    record: ScoreRecord,
    tier: ScoreTier,
    reviews: Vec<AnswerReview>,
}

impl QuizReport {
    /// Build the report from the completed record and the questions that were asked.
    ///
    /// Answers whose question is not in `questions` are left out of the review.
    #[must_use]
    pub fn new(record: ScoreRecord, questions: &[Question]) -> Self {
        let reviews = record
            .answers()
            .iter()
            .enumerate()
            .filter_map(|(idx, answer)| {
                let question = questions.iter().find(|q| q.id() == answer.question_id)?;
                let option_text = |i: usize| {
                    question
                        .option(i)
                        .map(|text| format!("{}. {text}", Question::option_label(i)))
                        .unwrap_or_default()
                };
                Some(AnswerReview {
                    number: idx + 1,
                    question_id: answer.question_id,
                    question: question.text().to_owned(),
                    selected: option_text(answer.selected_option_index),
                    correct: option_text(question.correct_option_index()),
                    is_correct: answer.is_correct,
                    explanation: question.explanation().to_owned(),
                })
            })
            .collect();
        let tier = ScoreTier::for_percent(record.score_percent());

        Self {
            record,
            tier,
            reviews,
        }
    }

    #[must_use]
    pub fn record(&self) -> &ScoreRecord {
        &self.record
    }

    #[must_use]
    pub fn tier(&self) -> ScoreTier {
        self.tier
    }

    #[must_use]
    pub fn reviews(&self) -> &[AnswerReview] {
        &self.reviews
    }

    /// Questions that were never answered because time ran out.
    #[must_use]
    pub fn unanswered(&self) -> u32 {
        let answered = u32::try_from(self.record.answers().len()).unwrap_or(u32::MAX);
        self.record.total_questions().saturating_sub(answered)
    }

    /// Plain-text summary suitable for sharing.
    #[must_use]
    pub fn share_message(&self) -> String {
        format!(
            "🧮 Math Quiz Results 🧮\n\n\
             Score: {}% ({}/{} correct)\n\
             Time used: {}\n\
             Player: {}\n\n\
             {}\n\n\
             Come play with me! 🎯",
            self.record.score_percent(),
            self.record.correct_count(),
            self.record.total_questions(),
            format_time(self.record.time_used_seconds()),
            self.record.player_name(),
            self.tier.message(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use quiz_core::model::{PlayerAnswer, PlayerId, ScoreId};
    use quiz_core::time::fixed_now;

    fn question(id: u32, correct: usize) -> Question {
        Question::new(
            QuestionId::new(id),
            format!("Question {id}?"),
            vec!["1".into(), "2".into(), "3".into(), "4".into()],
            correct,
            format!("Because {id}."),
        )
        .unwrap()
    }

    fn record(answers: Vec<PlayerAnswer>, total: u32) -> ScoreRecord {
        let started = fixed_now();
        ScoreRecord::from_answers(
            ScoreId::new("quiz_test"),
            PlayerId::new("player_test"),
            "Ada",
            total,
            answers,
            started,
            started + Duration::seconds(65),
        )
        .unwrap()
    }

    fn answer(id: u32, selected: usize, is_correct: bool) -> PlayerAnswer {
        PlayerAnswer {
            question_id: QuestionId::new(id),
            selected_option_index: selected,
            is_correct,
            elapsed_seconds: 10,
        }
    }

    #[test]
    fn reviews_join_answers_with_questions() {
        let questions = vec![question(1, 0), question(2, 3)];
        let report = QuizReport::new(
            record(vec![answer(1, 0, true), answer(2, 1, false)], 2),
            &questions,
        );

        assert_eq!(report.tier(), ScoreTier::Pass);
        let reviews = report.reviews();
        assert_eq!(reviews.len(), 2);
        assert!(reviews[0].is_correct);
        assert_eq!(reviews[0].selected, "A. 1");
        assert_eq!(reviews[1].number, 2);
        assert_eq!(reviews[1].selected, "B. 2");
        assert_eq!(reviews[1].correct, "D. 4");
        assert_eq!(reviews[1].explanation, "Because 2.");
    }

    #[test]
    fn timed_out_report_counts_unanswered() {
        let questions = vec![question(1, 0), question(2, 0), question(3, 0)];
        let report = QuizReport::new(record(vec![answer(1, 0, true)], 3), &questions);

        assert_eq!(report.unanswered(), 2);
        assert_eq!(report.record().score_percent(), 33);
        assert_eq!(report.tier(), ScoreTier::KeepPracticing);
    }

    #[test]
    fn share_message_includes_score_and_time() {
        let questions = vec![question(1, 0)];
        let report = QuizReport::new(record(vec![answer(1, 0, true)], 1), &questions);
        let message = report.share_message();

        assert!(message.contains("Score: 100% (1/1 correct)"));
        assert!(message.contains("Time used: 1:05"));
        assert!(message.contains("Player: Ada"));
        assert!(message.contains(ScoreTier::Trophy.message()));
    }
}
