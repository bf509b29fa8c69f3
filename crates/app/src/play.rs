use quiz_core::model::Question;
use quiz_core::time::{format_countdown, format_time};
use services::sessions::{ActiveQuiz, QuizReport};
use services::{CompletionReason, QuizSessionService, QuizStep, SessionError};
use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};

type Input = Lines<BufReader<Stdin>>;

/// What the player typed at the question prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Action {
    Select(usize),
    Submit,
    Quit,
    Unknown,
}

/// Whichever arrived first: a line of input or a countdown second.
enum Event {
    Line(Option<String>),
    Tick(bool),
}

fn parse_action(line: &str) -> Action {
    let line = line.trim();
    if line.is_empty() {
        return Action::Submit;
    }
    match line.to_ascii_lowercase().as_str() {
        "a" | "1" => Action::Select(0),
        "b" | "2" => Action::Select(1),
        "c" | "3" => Action::Select(2),
        "d" | "4" => Action::Select(3),
        "n" | "next" | "s" | "submit" => Action::Submit,
        "q" | "quit" => Action::Quit,
        _ => Action::Unknown,
    }
}

/// Announce the countdown each minute and for the last ten seconds.
fn should_announce(remaining_seconds: u32) -> bool {
    remaining_seconds <= 10 || remaining_seconds % 60 == 0
}

fn print_question(quiz: &ActiveQuiz, show_timer: bool) {
    let session = quiz.session();
    let Some(question) = session.current_question() else {
        return;
    };
    let progress = session.progress();
    println!();
    if show_timer {
        println!(
            "Question {}/{}  ({}% done)  ⏱ {}",
            progress.position,
            progress.total,
            progress.percent,
            format_countdown(progress.remaining_seconds)
        );
    } else {
        println!(
            "Question {}/{}  ({}% done)",
            progress.position, progress.total, progress.percent
        );
    }
    println!("{}", question.text());
    for (idx, option) in question.options().iter().enumerate() {
        let marker = if session.selected() == Some(idx) { '>' } else { ' ' };
        println!(" {marker} {}. {option}", Question::option_label(idx));
    }
    let submit = if session.is_last_question() {
        "finish"
    } else {
        "next"
    };
    println!("Choose A-D, Enter to {submit}, q to quit.");
}

async fn confirm_quit(input: &mut Input) -> std::io::Result<bool> {
    println!("Quit this quiz? Progress will be lost. [y/N]");
    let answer = input.next_line().await?.unwrap_or_default();
    Ok(matches!(answer.trim(), "y" | "Y" | "yes"))
}

/// Play one quiz interactively. Returns the report when the quiz completed.
pub async fn run(
    service: &QuizSessionService,
) -> Result<Option<QuizReport>, Box<dyn std::error::Error>> {
    let settings = service.settings();
    let mut input = BufReader::new(tokio::io::stdin()).lines();
    let mut quiz = service.start().await?;

    println!("{}", service.bank().title());
    println!("{}", service.bank().description());
    print_question(&quiz, settings.show_timer);

    let mut outcome = None;
    while quiz.session().is_in_progress() {
        // Only waiting happens inside the race; state changes and saves run
        // after it so input can never cut a save short.
        let event = tokio::select! {
            line = input.next_line() => Event::Line(line?),
            ticked = quiz.next_tick() => Event::Tick(ticked),
        };

        let step = match event {
            Event::Tick(true) => service.tick(&mut quiz).await,
            Event::Tick(false) => break,
            Event::Line(None) => {
                // stdin closed
                service.quit(&mut quiz)?;
                break;
            }
            Event::Line(Some(line)) => match parse_action(&line) {
                Action::Select(idx) => match service.select_option(&mut quiz, idx) {
                    Ok(()) => {
                        print_question(&quiz, settings.show_timer);
                        continue;
                    }
                    Err(err) => Err(err),
                },
                Action::Submit => service.advance(&mut quiz).await,
                Action::Quit => {
                    if confirm_quit(&mut input).await? && service.quit(&mut quiz).is_ok() {
                        println!("Quiz abandoned. No score was recorded.");
                        break;
                    }
                    print_question(&quiz, settings.show_timer);
                    continue;
                }
                Action::Unknown => {
                    println!("Type A, B, C or D to choose, Enter to submit.");
                    continue;
                }
            },
        };

        match step {
            Ok(QuizStep::Next { .. }) => print_question(&quiz, settings.show_timer),
            Ok(QuizStep::Ticked { remaining_seconds }) => {
                if settings.show_timer && should_announce(remaining_seconds) {
                    println!("⏱ {} left", format_countdown(remaining_seconds));
                }
            }
            Ok(QuizStep::Finished { record, reason }) => {
                if reason == CompletionReason::TimedOut {
                    println!("\n⏰ Time is up!");
                }
                outcome = Some(record);
            }
            Err(err) if err.is_user_input() => println!("{err}"),
            Err(SessionError::Storage(err)) => {
                eprintln!("could not save your result: {err}");
                outcome = quiz.session().result().cloned();
            }
            // Ended by the countdown while input was pending.
            Err(SessionError::NotInProgress) => break,
            Err(err) => return Err(err.into()),
        }
    }

    // A failed save at completion is retried once before reporting.
    if outcome.is_none() {
        outcome = quiz.session().result().cloned();
    }
    if quiz.session().is_complete() && quiz.persisted_id().is_none() {
        if let Err(err) = service.persist_result(&mut quiz).await {
            eprintln!("retrying save failed: {err}");
        }
    }

    Ok(outcome.map(|record| QuizReport::new(record, quiz.session().questions())))
}

pub fn print_report(report: &QuizReport, show_explanation: bool) {
    let record = report.record();
    println!();
    println!("{}", report.tier());
    println!("Score:     {}%", record.score_percent());
    println!(
        "Correct:   {}/{}",
        record.correct_count(),
        record.total_questions()
    );
    if report.unanswered() > 0 {
        println!("Unanswered: {}", report.unanswered());
    }
    println!("Time used: {}", format_time(record.time_used_seconds()));
    println!("Player:    {}", record.player_name());

    println!("\n📝 Answer review");
    for review in report.reviews() {
        let mark = if review.is_correct { "✅" } else { "❌" };
        println!("\n{mark} Q{}: {}", review.number, review.question);
        println!("   Your answer:    {}", review.selected);
        if !review.is_correct {
            println!("   Correct answer: {}", review.correct);
        }
        if show_explanation && !review.explanation.is_empty() {
            println!("   💡 {}", review.explanation);
        }
    }

    println!("\n--- share ---\n{}", report.share_message());
}
