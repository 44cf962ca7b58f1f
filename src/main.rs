use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use studyquest::MatchOutcome;

mod cli;

#[derive(Parser)]
#[command(name = "studyquest")]
#[command(about = "StudyQuest - XP, levels, streaks and achievements for learners")]
#[command(version)]
struct Cli {
    /// Profile to act on (defaults to profile.default_user from the config)
    #[arg(short, long, global = true)]
    user: Option<String>,

    /// Path to the config file (defaults to ~/.studyquest/config.toml)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize a new ~/.studyquest/config.toml configuration file
    Init {
        /// Overwrite existing config file
        #[arg(long)]
        force: bool,
    },

    /// Mark a lesson as completed
    Lesson {
        /// Lesson identifier
        id: String,
    },

    /// Record a quiz score (percent, 0-100)
    Quiz { score: u32 },

    /// Mark a virtual lab as completed
    Lab {
        /// Lab identifier
        id: String,

        /// Lab score (percent, 0-100)
        #[arg(long)]
        score: u32,

        /// Time spent in the lab, in seconds
        #[arg(long, default_value_t = 0)]
        time: u64,
    },

    /// Show the progress summary
    Summary,

    /// Show the level reached with a given XP total
    Level { xp: u64 },

    /// Record the result of a competitive match
    Match {
        /// win, loss or draw
        #[arg(long)]
        result: MatchOutcome,

        /// Points scored in the match
        #[arg(long)]
        score: u32,

        /// Final placement (1 = first)
        #[arg(long)]
        rank: u32,

        /// Number of participants
        #[arg(long)]
        players: u32,

        /// Correct answers in percent
        #[arg(long, default_value_t = 0)]
        accuracy: u32,

        /// Mean rating of the opponents
        #[arg(long)]
        opponent_rating: Option<u32>,
    },

    /// Show the competitive player record
    Player,

    /// List achievements and which ones are unlocked
    Achievements,

    /// Show the top players by rating
    Leaderboard {
        /// Number of players to show
        #[arg(long, default_value_t = 10)]
        limit: usize,
    },

    /// Delete stored progress for the profile
    Reset {
        /// Reset the player record instead of learning progress
        #[arg(long)]
        player: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level)),
        )
        .init();

    // Init must work before a config exists; everything else loads it
    let load = || cli::Context::load(cli.config.clone(), cli.user.clone());

    match cli.command {
        Some(Commands::Init { force }) => {
            cli::init::init_command(cli.config.clone(), force)?;
        }
        Some(Commands::Lesson { id }) => cli::learn::lesson_command(&load()?, &id)?,
        Some(Commands::Quiz { score }) => cli::learn::quiz_command(&load()?, score)?,
        Some(Commands::Lab { id, score, time }) => {
            cli::learn::lab_command(&load()?, &id, score, time)?;
        }
        Some(Commands::Level { xp }) => cli::level::level_command(xp),
        Some(Commands::Match {
            result,
            score,
            rank,
            players,
            accuracy,
            opponent_rating,
        }) => {
            let result = studyquest::MatchResult {
                outcome: result,
                score,
                rank,
                total_players: players,
                accuracy,
                opponent_rating,
            };
            cli::play::match_command(&load()?, &result)?;
        }
        Some(Commands::Player) => cli::play::player_command(&load()?),
        Some(Commands::Achievements) => cli::achievements::achievements_command(&load()?),
        Some(Commands::Leaderboard { limit }) => {
            cli::play::leaderboard_command(&load()?, limit)?;
        }
        Some(Commands::Reset { player }) => cli::reset::reset_command(&load()?, player)?,
        Some(Commands::Summary) | None => {
            // Default: show the summary
            cli::learn::summary_command(&load()?);
        }
    }

    Ok(())
}
