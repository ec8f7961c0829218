use std::io;
use std::path::PathBuf;
use clap::{Parser, Subcommand};
use anyhow::{Context, Result};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use tasklist::{NewTask, Shell, TaskId, TaskStore};

#[derive(Parser)]
#[command(name = "tasklist")]
#[command(about = "Task manager backed by a flat text file", long_about = None)]
struct Cli {
    /// Directory holding tasks.txt
    #[arg(short, long, default_value = ".")]
    workdir: PathBuf,

    /// Omit to start the interactive menu
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the interactive menu
    Shell,

    /// Add a task
    Add {
        #[command(subcommand)]
        kind: AddKind,
    },

    /// List all tasks
    List {
        /// Print tasks as JSON
        #[arg(long)]
        json: bool,
    },

    /// Mark a task as completed
    Done {
        id: TaskId,
    },

    /// Remove a task
    Remove {
        id: TaskId,
    },

    /// Change fields of an existing task
    Edit {
        id: TaskId,

        #[arg(short, long)]
        description: Option<String>,

        /// Deadline tasks only
        #[arg(long)]
        due: Option<String>,

        /// Prioritized tasks only; values outside 1-5 are ignored
        #[arg(short, long, allow_negative_numbers = true)]
        priority: Option<i64>,
    },
}

#[derive(Subcommand)]
enum AddKind {
    /// Task with no extra fields
    Simple {
        description: String,
    },

    /// Task with a free-form deadline (e.g. 15/04/2025)
    Deadline {
        description: String,
        due: String,
    },

    /// Task with a priority level from 1 to 5
    Prioritized {
        description: String,

        /// Out-of-range values become 1
        #[arg(allow_negative_numbers = true)]
        priority: i64,
    },
}

fn main() -> Result<()> {
    // Logs go to stderr so they don't interleave with menu output
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "tasklist=warn".into())
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    let cli = Cli::parse();

    let mut store = TaskStore::in_dir(&cli.workdir);
    store.load().with_context(|| format!("Failed to load tasks from {:?}", store.path()))?;

    match cli.command.unwrap_or(Commands::Shell) {
        Commands::Shell => {
            let stdin = io::stdin();
            Shell::new(&mut store, stdin.lock(), io::stdout()).run()?;
        }

        Commands::Add { kind } => {
            let new_task = match kind {
                AddKind::Simple { description } => NewTask::plain(description),
                AddKind::Deadline { description, due } => NewTask::deadline(description, due),
                AddKind::Prioritized { description, priority } => {
                    NewTask::prioritized(description, priority)
                }
            };
            let id = store.add(new_task)?;
            save(&store)?;
            println!("Added task {}", id);
        }

        Commands::List { json } => {
            if json {
                println!("{}", serde_json::to_string_pretty(store.list())?);
            } else if store.is_empty() {
                println!("No tasks registered.");
            } else {
                for task in store.list() {
                    println!("{}", task);
                }
            }
        }

        Commands::Done { id } => {
            if store.complete(id) {
                save(&store)?;
                println!("Task {} marked as completed", id);
            } else {
                println!("Task {} not found", id);
            }
        }

        Commands::Remove { id } => {
            if let Some(task) = store.remove(id) {
                save(&store)?;
                println!("Removed: {}", task);
            } else {
                println!("Task {} not found", id);
            }
        }

        Commands::Edit { id, description, due, priority } => {
            let Some(task) = store.find_mut(id) else {
                println!("Task {} not found", id);
                return Ok(());
            };

            if let Some(description) = description {
                task.set_description(description);
            }
            if let Some(due) = due {
                if !task.set_due(due) {
                    println!("Task {} has no deadline; --due ignored", id);
                }
            }
            if let Some(priority) = priority {
                if !task.set_priority(priority) {
                    println!("Priority {} not applied to task {}", priority, id);
                }
            }
            println!("{}", task);
            save(&store)?;
        }
    }

    Ok(())
}

fn save(store: &TaskStore) -> Result<()> {
    store.save().with_context(|| format!("Failed to save tasks to {:?}", store.path()))
}
