use clap::{Parser, Subcommand};
use std::path::PathBuf;
use uuid::Uuid;

#[derive(Parser, Debug)]
#[command(name = "tinythoughts")]
#[command(about = "Collections, threads and thoughts from the command line", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Store file; overrides config and environment
    #[arg(long, global = true)]
    pub db: Option<PathBuf>,

    /// JSON config file
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// trace|debug|info|warn|error
    #[arg(long, global = true)]
    pub log_level: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Manage collections
    #[command(subcommand, alias = "c")]
    Collections(CollectionCommand),

    /// Manage threads
    #[command(subcommand, alias = "t")]
    Threads(ThreadCommand),

    /// Manage thoughts
    #[command(subcommand, alias = "th")]
    Thoughts(ThoughtCommand),

    /// Populate the store with sample data
    Seed {
        #[arg(long, default_value_t = 42)]
        seed: u64,
    },
}

#[derive(Subcommand, Debug)]
pub enum CollectionCommand {
    /// List collections, most recently modified first
    #[command(alias = "ls")]
    List,
    Add {
        name: String,
        #[arg(short, long)]
        summary: Option<String>,
    },
    Edit {
        id: Uuid,
        name: String,
        #[arg(short, long)]
        summary: Option<String>,
    },
    /// Delete collections with everything in them
    #[command(alias = "rm")]
    Delete {
        #[arg(required = true)]
        ids: Vec<Uuid>,
    },
}

#[derive(Subcommand, Debug)]
pub enum ThreadCommand {
    #[command(alias = "ls")]
    List {
        #[arg(short, long)]
        collection: Option<Uuid>,
    },
    Add {
        title: String,
        #[arg(short, long)]
        collection: Uuid,
        #[arg(short, long)]
        summary: Option<String>,
    },
    Edit {
        id: Uuid,
        title: String,
        #[arg(short, long)]
        summary: Option<String>,
    },
    #[command(alias = "rm")]
    Delete {
        #[arg(required = true)]
        ids: Vec<Uuid>,
    },
    /// Move a thread to another collection
    #[command(alias = "mv")]
    Move {
        id: Uuid,
        #[arg(long)]
        to: Uuid,
    },
}

#[derive(Subcommand, Debug)]
pub enum ThoughtCommand {
    #[command(alias = "ls")]
    List {
        #[arg(short, long)]
        thread: Option<Uuid>,
    },
    Add {
        content: String,
        #[arg(short, long)]
        thread: Uuid,
    },
    Edit {
        id: Uuid,
        content: String,
    },
    #[command(alias = "rm")]
    Delete {
        #[arg(required = true)]
        ids: Vec<Uuid>,
    },
    /// Move a thought to the end of another thread
    #[command(alias = "mv")]
    Move {
        id: Uuid,
        #[arg(long)]
        to: Uuid,
    },
    /// Renumber positions in the given order
    Reorder {
        #[arg(required = true)]
        ids: Vec<Uuid>,
    },
}
