use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(name = "tk", about = concat!("tickoff v", env!("CARGO_PKG_VERSION"), " - tasks with deadlines"), version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Run against a different directory
    #[arg(short = 'C', long = "dir", global = true)]
    pub project_dir: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Create a task list in the current directory
    Init(InitArgs),
    /// Add a task
    Add(AddArgs),
    /// List tasks through the active filter and period
    List(ListArgs),
    /// Show one task
    Show(IdArgs),
    /// Mark a task completed
    Done(IdArgs),
    /// Mark a task not completed
    Undo(IdArgs),
    /// Flip a task's completion
    Toggle(IdArgs),
    /// Delete a task
    Rm(IdArgs),
    /// Change a task's text
    Edit(EditArgs),
    /// Set or clear a task's deadline
    Due(DueArgs),
    /// Reorder tasks by deadline
    Sort(SortArgs),
    /// Set the active status filter
    Filter(FilterArgs),
    /// Set or reset the active deadline period
    Period(PeriodArgs),
    /// Show task counts
    Stats,
    /// Keep the list on screen, re-checking overdue tasks periodically
    Watch(WatchArgs),
    /// View or manage the recovery log
    Recovery(RecoveryCmd),
}

#[derive(Args)]
pub struct InitArgs {
    /// Reinitialize config.toml if .tickoff/ already exists (tasks are kept)
    #[arg(long)]
    pub force: bool,
}

#[derive(Args)]
pub struct AddArgs {
    /// Task text
    pub text: String,
    /// Deadline (YYYY-MM-DD)
    #[arg(long)]
    pub due: Option<String>,
}

#[derive(Args)]
pub struct ListArgs {
    /// Status filter for this listing only (all, active, completed)
    #[arg(long)]
    pub status: Option<String>,
    /// Period start for this listing only (YYYY-MM-DD)
    #[arg(long)]
    pub from: Option<String>,
    /// Period end for this listing only (YYYY-MM-DD)
    #[arg(long)]
    pub to: Option<String>,
    /// Ignore the saved filter and period
    #[arg(long)]
    pub all: bool,
}

#[derive(Args)]
pub struct IdArgs {
    /// Task ID
    pub id: String,
}

#[derive(Args)]
pub struct EditArgs {
    /// Task ID
    pub id: String,
    /// New text (blank keeps the current text)
    pub text: String,
}

#[derive(Args)]
pub struct DueArgs {
    /// Task ID
    pub id: String,
    /// New deadline (YYYY-MM-DD); omit to clear
    pub date: Option<String>,
}

#[derive(Args)]
pub struct SortArgs {
    /// Earliest deadline first
    #[arg(long, conflicts_with = "desc")]
    pub asc: bool,
    /// Latest deadline first
    #[arg(long)]
    pub desc: bool,
}

#[derive(Args)]
pub struct FilterArgs {
    /// all, active or completed
    pub status: String,
}

#[derive(Args)]
pub struct PeriodArgs {
    /// Earliest deadline to show (YYYY-MM-DD)
    #[arg(long)]
    pub from: Option<String>,
    /// Latest deadline to show (YYYY-MM-DD)
    #[arg(long)]
    pub to: Option<String>,
    /// Clear the period
    #[arg(long, conflicts_with_all = ["from", "to"])]
    pub reset: bool,
}

#[derive(Args)]
pub struct WatchArgs {
    /// Seconds between refreshes (default from config.toml)
    #[arg(long)]
    pub interval: Option<u64>,
    /// Stop after this many refreshes
    #[arg(long)]
    pub count: Option<u64>,
}

#[derive(Args)]
pub struct RecoveryCmd {
    #[command(subcommand)]
    pub action: Option<RecoveryAction>,
    /// Show at most this many entries
    #[arg(long, default_value = "10")]
    pub limit: usize,
}

#[derive(Subcommand)]
pub enum RecoveryAction {
    /// Remove old entries (default: older than 30 days)
    Prune(PruneArgs),
}

#[derive(Args)]
pub struct PruneArgs {
    /// Remove every entry
    #[arg(long)]
    pub all: bool,
}
