mod init;
pub use init::cmd_init;

use std::io::Write;
use std::path::PathBuf;
use std::sync::Mutex;
use std::time::Duration;

use chrono::{Local, NaiveDate};
use crossterm::{
    cursor::MoveTo,
    execute,
    terminal::{Clear, ClearType},
};

use crate::cli::commands::*;
use crate::cli::output::*;
use crate::io::project_io::{self, ProjectError};
use crate::io::recovery::{self, RecoveryCategory, RecoveryEntry};
use crate::io::state::{self, ViewState};
use crate::io::storage::{self, FileSlot};
use crate::model::project::Project;
use crate::model::task::{Task, TaskId, parse_date_only};
use crate::model::view::{DeadlinePeriod, SortDirection, StatusFilter};
use crate::ops::query;
use crate::session::Session;

type CmdResult = Result<(), Box<dyn std::error::Error>>;

/// Global override for the working directory (set by -C)
static PROJECT_DIR_OVERRIDE: Mutex<Option<PathBuf>> = Mutex::new(None);

// ---------------------------------------------------------------------------
// Dispatch
// ---------------------------------------------------------------------------

pub fn dispatch(cli: Cli) -> CmdResult {
    let json = cli.json;

    if let Some(ref dir) = cli.project_dir {
        let abs = std::fs::canonicalize(dir)
            .map_err(|e| format!("cannot resolve -C path '{}': {}", dir, e))?;
        if let Ok(mut slot) = PROJECT_DIR_OVERRIDE.lock() {
            slot.replace(abs);
        }
    }

    match cli.command {
        Commands::Init(args) => cmd_init(args, &start_dir()?),

        // Read commands
        Commands::List(args) => cmd_list(args, json),
        Commands::Show(args) => cmd_show(args, json),
        Commands::Stats => cmd_stats(json),
        Commands::Watch(args) => cmd_watch(args),
        Commands::Recovery(args) => cmd_recovery(args, json),

        // Write commands
        Commands::Add(args) => cmd_add(args, json),
        Commands::Done(args) => cmd_set_completed(args, true),
        Commands::Undo(args) => cmd_set_completed(args, false),
        Commands::Toggle(args) => cmd_toggle(args),
        Commands::Rm(args) => cmd_rm(args),
        Commands::Edit(args) => cmd_edit(args),
        Commands::Due(args) => cmd_due(args),
        Commands::Sort(args) => cmd_sort(args),

        // View state
        Commands::Filter(args) => cmd_filter(args),
        Commands::Period(args) => cmd_period(args, json),
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn start_dir() -> Result<PathBuf, ProjectError> {
    let override_dir = PROJECT_DIR_OVERRIDE
        .lock()
        .ok()
        .and_then(|slot| slot.clone());
    match override_dir {
        Some(dir) => Ok(dir),
        None => std::env::current_dir().map_err(ProjectError::IoError),
    }
}

fn load_project_cwd() -> Result<Project, ProjectError> {
    let root = project_io::discover_project(&start_dir()?)?;
    project_io::load_project(&root)
}

fn saved_view(project: &Project) -> ViewState {
    state::read_view_state(&project.data_dir).unwrap_or_default()
}

fn open_session(project: &Project) -> Session {
    Session::open(
        Box::new(FileSlot::new(project.tasks_path())),
        saved_view(project),
    )
}

fn parse_id(raw: &str) -> Result<TaskId, Box<dyn std::error::Error>> {
    Ok(raw.parse::<TaskId>()?)
}

fn today() -> NaiveDate {
    Local::now().date_naive()
}

fn warn_if_malformed(date: &str) {
    if !date.is_empty() && parse_date_only(date).is_none() {
        eprintln!(
            "warning: '{}' is not a YYYY-MM-DD date; it will be ignored for overdue and period checks",
            date
        );
    }
}

fn print_lines(lines: &[String]) {
    for line in lines {
        println!("{}", line);
    }
}

// ---------------------------------------------------------------------------
// Read command handlers
// ---------------------------------------------------------------------------

fn cmd_list(args: ListArgs, json: bool) -> CmdResult {
    let project = load_project_cwd()?;
    let mut session = open_session(&project);

    if args.all {
        session.set_filter(StatusFilter::All);
        session.reset_period();
    }
    if let Some(ref status) = args.status {
        session.set_filter(status.parse::<StatusFilter>()?);
    }
    if args.from.is_some() || args.to.is_some() {
        let current = session.view().period.clone();
        session.set_period(DeadlinePeriod::new(
            args.from.unwrap_or(current.from),
            args.to.unwrap_or(current.to),
        ));
    }

    let today = today();
    let visible = session.visible();
    if json {
        let out = list_to_json(&visible, session.view(), today);
        println!("{}", serde_json::to_string_pretty(&out)?);
    } else {
        print_lines(&format_listing(
            &visible,
            session.view(),
            today,
            &project.config.display.date_format,
        ));
    }
    Ok(())
}

fn cmd_show(args: IdArgs, json: bool) -> CmdResult {
    let project = load_project_cwd()?;
    let session = open_session(&project);
    let id = parse_id(&args.id)?;
    let task = session
        .task(id)
        .ok_or_else(|| format!("task not found: {}", id))?;

    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&task_to_json(task, today()))?
        );
    } else {
        print_lines(&format_task_detail(
            task,
            today(),
            &project.config.display.date_format,
        ));
    }
    Ok(())
}

fn cmd_stats(json: bool) -> CmdResult {
    let project = load_project_cwd()?;
    let session = open_session(&project);
    let summary = session.summary(today());
    let visible = session.visible().len();

    if json {
        let out = StatsJson { summary, visible };
        println!("{}", serde_json::to_string_pretty(&out)?);
    } else {
        println!("{}", format_summary(&summary));
        println!("{} shown by {}", visible, format_view_header(session.view()));
    }
    Ok(())
}

/// Re-render the visible list every tick. Reads only; other invocations can
/// edit the list meanwhile and the next tick picks the changes up.
fn cmd_watch(args: WatchArgs) -> CmdResult {
    let project = load_project_cwd()?;
    let interval = Duration::from_secs(
        args.interval
            .unwrap_or(project.config.watch.interval_secs)
            .max(1),
    );
    let slot = FileSlot::new(project.tasks_path());
    let mut previous_overdue: Vec<TaskId> = Vec::new();
    let mut ticks = 0u64;

    loop {
        let view = saved_view(&project);
        let tasks: Vec<Task> = storage::load(&slot);
        let visible = query::visible_tasks(&tasks, view.filter, &view.period);
        let today = today();

        let overdue = query::overdue_ids(&tasks, today);
        for id in overdue.iter().filter(|id| !previous_overdue.contains(id)) {
            tracing::info!(task = %id, "task became overdue");
        }
        previous_overdue = overdue;

        execute!(std::io::stdout(), Clear(ClearType::All), MoveTo(0, 0))?;
        print_lines(&format_listing(
            &visible,
            &view,
            today,
            &project.config.display.date_format,
        ));
        println!();
        println!("{}", format_summary(&query::summarize(&tasks, today)));
        std::io::stdout().flush()?;

        ticks += 1;
        if args.count.is_some_and(|n| ticks >= n) {
            return Ok(());
        }
        std::thread::sleep(interval);
    }
}

fn cmd_recovery(args: RecoveryCmd, json: bool) -> CmdResult {
    let project = load_project_cwd()?;

    if let Some(RecoveryAction::Prune(prune)) = args.action {
        let removed = recovery::prune_recovery(&project.data_dir, None, prune.all)?;
        println!("removed {} recovery entries", removed);
        return Ok(());
    }

    let entries = recovery::read_recovery_entries(&project.data_dir, Some(args.limit), None);
    if json {
        let values: Vec<serde_json::Value> = entries.iter().map(|e| e.to_json()).collect();
        println!("{}", serde_json::to_string_pretty(&values)?);
    } else if entries.is_empty() {
        println!("recovery log is empty");
    } else {
        for entry in &entries {
            print!("{}", entry.to_display_markdown());
        }
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Write command handlers
// ---------------------------------------------------------------------------

fn cmd_add(args: AddArgs, json: bool) -> CmdResult {
    let project = load_project_cwd()?;
    let mut session = open_session(&project);
    let deadline = args.due.unwrap_or_default();
    warn_if_malformed(deadline.trim());

    let id = session.add(&args.text, &deadline)?;
    if json {
        if let Some(task) = session.task(id) {
            println!(
                "{}",
                serde_json::to_string_pretty(&task_to_json(task, today()))?
            );
        }
    } else {
        println!("{}", id);
    }
    Ok(())
}

fn cmd_set_completed(args: IdArgs, completed: bool) -> CmdResult {
    let project = load_project_cwd()?;
    let mut session = open_session(&project);
    let id = parse_id(&args.id)?;

    let changed = session.set_completed(id, completed)?;
    let word = if completed { "completed" } else { "reopened" };
    if changed {
        println!("{} {}", id, word);
    } else {
        println!("{} already {}", id, if completed { "completed" } else { "active" });
    }
    Ok(())
}

fn cmd_toggle(args: IdArgs) -> CmdResult {
    let project = load_project_cwd()?;
    let mut session = open_session(&project);
    let id = parse_id(&args.id)?;

    let completed = session.toggle(id)?;
    println!("{} {}", id, if completed { "completed" } else { "reopened" });
    Ok(())
}

fn cmd_rm(args: IdArgs) -> CmdResult {
    let project = load_project_cwd()?;
    let mut session = open_session(&project);
    let id = parse_id(&args.id)?;

    match session.remove(id) {
        Some(task) => {
            recovery::log_recovery(
                &project.data_dir,
                RecoveryEntry::new(RecoveryCategory::Delete, format!("task {} deleted", id))
                    .field("Task", id.to_string())
                    .body(serde_json::to_string_pretty(&task)?),
            );
            println!("{} deleted", id);
        }
        None => println!("{} not found, nothing deleted", id),
    }
    Ok(())
}

fn cmd_edit(args: EditArgs) -> CmdResult {
    let project = load_project_cwd()?;
    let mut session = open_session(&project);
    let id = parse_id(&args.id)?;

    if session.edit_text(id, &args.text)? {
        println!("{} text updated", id);
    } else {
        println!("{} unchanged (blank text)", id);
    }
    Ok(())
}

fn cmd_due(args: DueArgs) -> CmdResult {
    let project = load_project_cwd()?;
    let mut session = open_session(&project);
    let id = parse_id(&args.id)?;
    let date = args.date.unwrap_or_default();
    warn_if_malformed(date.trim());

    session.edit_deadline(id, &date)?;
    if date.trim().is_empty() {
        println!("{} deadline cleared", id);
    } else {
        println!(
            "{} due {}",
            id,
            format_deadline(date.trim(), &project.config.display.date_format)
        );
    }
    Ok(())
}

fn cmd_sort(args: SortArgs) -> CmdResult {
    let project = load_project_cwd()?;
    let mut session = open_session(&project);

    let direction = if args.asc {
        SortDirection::Ascending
    } else if args.desc {
        SortDirection::Descending
    } else {
        project.config.sort.direction
    };
    session.sort(direction);
    println!("sorted {} tasks by deadline ({})", session.tasks().len(), direction);
    Ok(())
}

// ---------------------------------------------------------------------------
// View state handlers
// ---------------------------------------------------------------------------

fn cmd_filter(args: FilterArgs) -> CmdResult {
    let project = load_project_cwd()?;
    let mut session = open_session(&project);

    session.set_filter(args.status.parse::<StatusFilter>()?);
    state::write_view_state(&project.data_dir, session.view())?;
    println!("showing {}", format_view_header(session.view()));
    Ok(())
}

fn cmd_period(args: PeriodArgs, json: bool) -> CmdResult {
    let project = load_project_cwd()?;
    let mut session = open_session(&project);

    if args.reset {
        session.reset_period();
    } else if args.from.is_some() || args.to.is_some() {
        let from = args.from.unwrap_or_default();
        let to = args.to.unwrap_or_default();
        warn_if_malformed(&from);
        warn_if_malformed(&to);
        session.set_period(DeadlinePeriod::new(from, to));
    } else {
        // No arguments: report the current period
        let period = &session.view().period;
        if json {
            println!(
                "{}",
                serde_json::to_string_pretty(&PeriodJson {
                    from: period.from.clone(),
                    to: period.to.clone(),
                })?
            );
        } else if period.is_active() {
            println!("{}", format_view_header(session.view()));
        } else {
            println!("no period set");
        }
        return Ok(());
    }

    state::write_view_state(&project.data_dir, session.view())?;
    println!("showing {}", format_view_header(session.view()));
    Ok(())
}
