//! Roster - classroom rosters and fair random calling from the terminal

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod commands;
mod state;

#[derive(Parser)]
#[command(name = "roster", version, about = "Classroom rosters and random calling")]
pub struct Cli {
    /// Config file (defaults to the platform config dir)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Database file, overriding the config
    #[arg(long, global = true)]
    db: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Manage classes
    #[command(subcommand)]
    Class(ClassCommand),

    /// Manage students in a class
    #[command(subcommand)]
    Student(StudentCommand),

    /// Call a random student
    Call {
        /// Class id or name (defaults to the current class)
        #[arg(long)]
        class: Option<String>,
    },

    /// Mark every student in a class as not called
    Reset {
        #[arg(long)]
        class: Option<String>,
    },

    /// Show the current class
    Status,
}

#[derive(Subcommand)]
pub enum ClassCommand {
    /// Create a class
    Add { name: String },
    /// List classes
    List,
    /// Rename a class
    Rename { class: String, name: String },
    /// Delete a class and its students
    Delete { class: String },
    /// Select the current class
    Use { class: String },
    /// Change random call settings
    Settings {
        #[arg(long)]
        class: Option<String>,
        /// Let students be called more than once per round
        #[arg(long)]
        allow_duplicates: Option<bool>,
        /// Prefer students who have not been called
        #[arg(long)]
        prioritize_new: Option<bool>,
    },
}

#[derive(Subcommand)]
pub enum StudentCommand {
    /// Add students, one per argument
    Add {
        #[arg(long)]
        class: Option<String>,
        #[arg(required = true)]
        names: Vec<String>,
    },
    /// Add students, skipping names already on the roster
    Bulk {
        #[arg(long)]
        class: Option<String>,
        #[arg(required = true)]
        names: Vec<String>,
    },
    /// Remove a student
    Remove {
        #[arg(long)]
        class: Option<String>,
        student: String,
    },
    /// Mark students absent by partial name
    Absent {
        #[arg(long)]
        class: Option<String>,
        #[arg(required = true)]
        names: Vec<String>,
    },
    /// Mark a student present
    Present {
        #[arg(long)]
        class: Option<String>,
        student: String,
    },
    /// Mark every student present
    AllPresent {
        #[arg(long)]
        class: Option<String>,
    },
    /// List students
    List {
        #[arg(long)]
        class: Option<String>,
    },
}

fn main() {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    if let Err(e) = commands::run(cli) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
