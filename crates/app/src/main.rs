mod config;
mod play;

use quiz_core::model::LeaderboardEntry;
use quiz_core::time::format_time;
use services::{AppServices, Clock, PlayerError};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use config::{Command, Config, DB_URL_ENV, prepare_sqlite_file, print_usage};

fn init_tracing() {
    // Quiet by default so log lines do not interleave with the quiz prompts.
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn print_leaderboard_row(entry: &LeaderboardEntry, own_name: Option<&str>) {
    let you = if own_name == Some(entry.player_name.as_str()) {
        "  (you)"
    } else {
        ""
    };
    println!(
        "{:>4}  {:<20} {:>3}%  {:>6}  {}{you}",
        entry.badge().to_string(),
        entry.player_name,
        entry.score_percent,
        format_time(entry.time_used_seconds),
        entry.completed_at.format("%Y-%m-%d"),
    );
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::parse(std::env::args().skip(1), std::env::var(DB_URL_ENV).ok())
        .map_err(|e| {
            eprintln!("{e}");
            print_usage();
            e
        })?;
    if config.command == Command::Help {
        print_usage();
        return Ok(());
    }

    tracing::debug!(?config, "parsed arguments");

    // Open + migrate SQLite at startup.
    prepare_sqlite_file(&config.db_url)?;
    let app =
        AppServices::new_sqlite(&config.db_url, Clock::default_clock(), config.settings).await?;

    match config.command {
        Command::Play => {
            let player = app.player();
            if player.player_name().await.ok().flatten().is_none() {
                println!("Tip: set your name with `quiz name <NAME>` to appear on the leaderboard.");
            }
            if let Some(report) = play::run(&app.quiz()).await? {
                play::print_report(&report, config.settings.show_explanation);
            }
        }
        Command::Stats => {
            let stats = app.stats().player_stats().await;
            println!("📊 Your stats");
            println!("Games played:  {}", stats.total_games);
            println!("Best score:    {}%", stats.best_score);
            println!("Average score: {}%", stats.average_score);
            println!("Average time:  {}", format_time(stats.average_time));
            if let Some(best) = app.stats().best_score().await? {
                println!(
                    "Best run:      {}% in {} on {}",
                    best.score_percent(),
                    format_time(best.time_used_seconds()),
                    best.completed_at().format("%Y-%m-%d"),
                );
            }
        }
        Command::Leaderboard => {
            let own_name = app.player().player_name().await.ok().flatten();
            println!("🏆 Leaderboard");
            for entry in app.stats().leaderboard().await {
                print_leaderboard_row(&entry, own_name.as_deref());
            }
        }
        Command::Name(raw) => match app.player().save_player_name(&raw).await {
            Ok(name) => println!("Hello, {}!", name.as_str()),
            Err(PlayerError::InvalidName(err)) => {
                eprintln!("{err}");
                std::process::exit(1);
            }
            Err(err) => return Err(err.into()),
        },
        Command::Reset { confirmed: false } => {
            eprintln!("This deletes your name and every recorded score. Re-run with --yes.");
            std::process::exit(1);
        }
        Command::Reset { confirmed: true } => {
            app.player().clear_all_data().await?;
            println!("All player data cleared.");
        }
        Command::Help => print_usage(),
    }

    Ok(())
}

#[tokio::main]
async fn main() {
    init_tracing();
    if let Err(err) = run().await {
        // At this layer (binary glue), printing once is fine.
        eprintln!("{err}");
        std::process::exit(2);
    }
}
