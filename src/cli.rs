use clap::{Parser, Subcommand};
use std::io::Write;
use thiserror::Error;

use crate::database::Database;
use crate::database::DatabaseError;
use crate::models::{Task, TimeTag};

#[derive(Parser)]
#[command(name = "todo")]
#[command(about = "A terminal todo list with today / week / month buckets")]
#[command(version)]
pub struct Cli {
    /// Use development mode (separate data directory)
    #[arg(long)]
    pub dev: bool,

    /// Database file to use instead of the per-user default
    /// (for trying things out against a scratch file)
    #[arg(long, value_name = "PATH")]
    pub db: Option<String>,

    /// Write debug-level entries to the log file
    #[arg(short, long)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Launch the interactive list (default if no subcommand)
    Tui,
    /// Quickly add a new task
    Add {
        /// Task title
        title: String,
        /// Time bucket: today, week, month or none
        #[arg(long, default_value = "today")]
        tag: TimeTag,
    },
    /// Print tasks in list order
    List {
        /// Only show tasks in this bucket (all tasks when omitted)
        #[arg(long)]
        tag: Option<TimeTag>,
        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },
}

#[derive(Debug, Error)]
pub enum CliError {
    #[error("Database error: {0}")]
    DatabaseError(#[from] DatabaseError),
    #[error("Task title cannot be empty")]
    EmptyTitle,
    #[error("Failed to write output: {0}")]
    OutputError(#[from] std::io::Error),
    #[error("Failed to encode JSON: {0}")]
    JsonError(#[from] serde_json::Error),
}

/// Handle the add command
pub fn handle_add(
    title: &str,
    tag: TimeTag,
    db: &Database,
    out: &mut impl Write,
) -> Result<Task, CliError> {
    let title = title.trim();
    if title.is_empty() {
        return Err(CliError::EmptyTitle);
    }

    let task = db.create_task(title, tag)?;
    writeln!(out, "Task created successfully (ID: {})", task.id)?;
    Ok(task)
}

/// Handle the list command
pub fn handle_list(
    tag: Option<TimeTag>,
    json: bool,
    db: &Database,
    out: &mut impl Write,
) -> Result<(), CliError> {
    let tasks = db.list_filtered(tag.unwrap_or(TimeTag::None))?;

    if json {
        serde_json::to_writer_pretty(&mut *out, &tasks)?;
        writeln!(out)?;
        return Ok(());
    }

    for task in &tasks {
        writeln!(out, "{}", format_task_line(task))?;
    }
    Ok(())
}

fn format_task_line(task: &Task) -> String {
    if task.time_tag == TimeTag::None {
        format!("{} {:>4}  {}", task.status.icon(), task.id, task.title)
    } else {
        format!(
            "{} {:>4}  {} ({})",
            task.status.icon(),
            task.id,
            task.title,
            task.time_tag.label()
        )
    }
}
