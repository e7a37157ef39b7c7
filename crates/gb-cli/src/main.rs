//! CLI frontend for the gamebook engine.

mod commands;

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand, ValueEnum};
use gb_story::Language;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(
    name = "gamebook",
    about = "Gamebook runner: plays a branching story with dice-driven decisions",
    version,
    propagate_version = true
)]
struct Cli {
    /// Show debug logs on stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Who makes the decisions during `play`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Player {
    /// Seeded random pick among the valid choices
    Demo,
    /// Read picks from stdin
    Human,
    /// Let the rule-based resolver decide
    Auto,
    /// Replay the picks given with --script
    Scripted,
}

#[derive(Subcommand)]
enum Commands {
    /// Play the story until it ends
    Play {
        /// Decision source
        #[arg(short, long, value_enum, default_value_t = Player::Demo)]
        player: Player,

        /// Bundled story language (en, pt)
        #[arg(short, long, default_value = "en")]
        lang: Language,

        /// Load pages from a JSON file instead of the bundled story
        #[arg(long)]
        pages: Option<PathBuf>,

        /// Dice seed (random when omitted)
        #[arg(short, long)]
        seed: Option<u64>,

        /// Character name
        #[arg(short, long, default_value = "Investigator")]
        name: String,

        /// Starting occupation, or "none" to pick one in the story
        #[arg(short, long, default_value = "Police Officer")]
        occupation: String,

        /// Comma-separated 1-based picks for the scripted player
        #[arg(long)]
        script: Option<String>,

        /// Stop after this many turns
        #[arg(long, default_value_t = 200)]
        max_turns: u32,

        /// Write the session journal here (.md for Markdown)
        #[arg(short, long)]
        journal: Option<PathBuf>,
    },

    /// Load a page file and report statistics and content problems
    Check {
        /// Bundled story language (en, pt)
        #[arg(short, long, default_value = "en")]
        lang: Language,

        /// Check this JSON file instead of the bundled story
        #[arg(long)]
        pages: Option<PathBuf>,
    },
}

fn main() {
    let cli = Cli::parse();

    let default_filter = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let result = match cli.command {
        Commands::Play {
            player,
            lang,
            pages,
            seed,
            name,
            occupation,
            script,
            max_turns,
            journal,
        } => commands::play::run(&commands::play::PlayOptions {
            player,
            lang,
            pages: pages.as_deref(),
            seed,
            name: &name,
            occupation: &occupation,
            script: script.as_deref(),
            max_turns,
            journal: journal.as_deref(),
        }),
        Commands::Check { lang, pages } => commands::check::run(lang, pages.as_deref()),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        process::exit(1);
    }
}
