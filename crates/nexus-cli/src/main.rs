//! nexus: personal knowledge base with AI answers grounded in your notes.
//!
//! Notes and image references live in SQLite; questions are answered by an
//! OpenAI-compatible completion API using only the notes that match.

mod commands;
mod config;
mod logging;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Args, Parser, Subcommand};
use tracing::info;

use config::AppConfig;

#[derive(Parser)]
#[command(name = "nexus")]
#[command(author, version, about = "Personal knowledge base with grounded AI answers")]
#[command(propagate_version = true)]
struct Cli {
    /// Print results as JSON
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Ask a question answered from the matching notes
    Ask {
        /// The question; its text is also the search term
        question: String,
    },

    /// List notes, newest first, optionally filtered by a term
    List {
        /// Substring to look for in titles and bodies
        term: Option<String>,
    },

    /// Show one note with its images
    Show {
        /// Note id
        id: i64,
    },

    /// Create a note
    Add {
        #[arg(short, long)]
        title: String,

        #[arg(short, long)]
        body: String,

        /// Image file to attach (can specify multiple)
        #[arg(short, long)]
        image: Vec<PathBuf>,

        /// Description for the image at the same position
        #[arg(short, long)]
        description: Vec<String>,
    },

    /// Change a note's title or body
    Edit {
        /// Note id
        id: i64,

        #[arg(short, long)]
        title: Option<String>,

        #[arg(short, long)]
        body: Option<String>,
    },

    /// Delete a note and its image references
    Delete {
        /// Note id
        id: i64,
    },

    /// Manage images attached to notes
    #[command(subcommand)]
    Image(ImageCommands),
}

#[derive(Subcommand)]
enum ImageCommands {
    /// Copy an image file into the store and attach it to a note
    Add(ImageAddArgs),

    /// List a note's images
    List {
        /// Note id
        note_id: i64,
    },

    /// Remove an image reference and its stored file
    Rm {
        /// Image id
        image_id: i64,
    },
}

#[derive(Args)]
struct ImageAddArgs {
    /// Note id
    note_id: i64,

    /// Image file to copy
    path: PathBuf,

    #[arg(short, long)]
    description: Option<String>,
}

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    let config = AppConfig::from_env();
    let _log_guard = logging::init(&config.log);

    info!(
        subsystem = "cli",
        database_url = %config.database_url,
        model = %config.completion.model,
        "nexus starting"
    );

    match commands::run(cli, config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            if let Some(hint) = commands::hint_for(&e) {
                eprintln!("Hint: {}", hint);
            }
            ExitCode::FAILURE
        }
    }
}
