//! taskdash command implementations.

use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::config::Config;
use crate::error::Result;
use crate::output::{emit_success, HumanOutput, OutputOptions};
use crate::session::{read_script, DashboardSession, StepOutcome, StepReport};
use crate::stats::{self, DashboardStats};
use crate::task::{TaskRecord, TaskStatus};
use crate::trend::{aggregate_trend, TrendPoint};
use crate::view::{project_view, SortDirection, SortKey, StatusFilter, ViewQuery};

pub struct SessionOptions {
    pub config: Option<PathBuf>,
    pub json: bool,
    pub quiet: bool,
}

impl SessionOptions {
    fn output(&self) -> OutputOptions {
        OutputOptions {
            json: self.json,
            quiet: self.quiet,
        }
    }
}

pub struct ListOptions {
    pub status: Option<String>,
    pub sort: Option<String>,
    pub direction: Option<String>,
}

struct LoadedSession {
    config: Config,
    session: DashboardSession,
    steps: Vec<StepReport>,
}

fn load_session(script: &Path, options: &SessionOptions) -> Result<LoadedSession> {
    let cwd = std::env::current_dir()?;
    let config = Config::resolve(options.config.as_deref(), &cwd)?;
    let text = read_script(script)?;
    let mut session = DashboardSession::new(&config);
    let steps = session.replay(&text)?;
    tracing::debug!(
        script = %script.display(),
        steps = steps.len(),
        tasks = session.store().len(),
        "session replayed"
    );
    Ok(LoadedSession {
        config,
        session,
        steps,
    })
}

fn push_skipped_steps(human: &mut HumanOutput, steps: &[StepReport]) {
    for step in steps {
        if step.outcome == StepOutcome::Applied {
            continue;
        }
        let message = step.message.as_deref().unwrap_or("skipped");
        human.push_warning(format!("line {} ({}): {}", step.line, step.op, message));
    }
}

fn format_task_line(task: &TaskRecord) -> String {
    let assignee = if task.assignee.trim().is_empty() {
        "unassigned"
    } else {
        task.assignee.as_str()
    };
    format!(
        "{} [{}] {} ({}, due {}, {}, {}h)",
        task.id, task.status, task.title, task.priority, task.due_date, assignee, task.time_spent
    )
}

#[derive(Serialize)]
struct ReplayOutput {
    steps: Vec<StepReport>,
    tasks: Vec<TaskRecord>,
}

pub fn run_replay(script: &Path, options: SessionOptions) -> Result<()> {
    let loaded = load_session(script, &options)?;
    let output = ReplayOutput {
        tasks: loaded.session.store().list(),
        steps: loaded.steps,
    };

    let count = |outcome: StepOutcome| {
        output
            .steps
            .iter()
            .filter(|step| step.outcome == outcome)
            .count()
    };
    let mut human = HumanOutput::new(format!("Replayed {} commands", output.steps.len()));
    human.push_summary("Applied", count(StepOutcome::Applied).to_string());
    human.push_summary("Not found", count(StepOutcome::NotFound).to_string());
    human.push_summary("Rejected", count(StepOutcome::Rejected).to_string());
    human.push_summary("Tasks", output.tasks.len().to_string());
    for task in &output.tasks {
        human.push_detail(format_task_line(task));
    }
    push_skipped_steps(&mut human, &output.steps);

    emit_success(options.output(), "replay", &output, Some(&human))
}

#[derive(Serialize)]
struct ListOutput {
    query: ViewQuery,
    total: usize,
    tasks: Vec<TaskRecord>,
}

fn resolve_query(config: &Config, list: &ListOptions) -> Result<ViewQuery> {
    let defaults = config.view.query()?;
    let filter = match list.status.as_deref() {
        Some(value) => value.parse::<StatusFilter>()?,
        None => defaults.filter,
    };
    let sort_key = match list.sort.as_deref() {
        Some(value) => value.parse::<SortKey>()?,
        None => defaults.sort_key,
    };
    let direction = match list.direction.as_deref() {
        Some(value) => value.parse::<SortDirection>()?,
        None => defaults.direction,
    };
    Ok(ViewQuery::new(filter, sort_key, direction))
}

pub fn run_list(script: &Path, list: ListOptions, options: SessionOptions) -> Result<()> {
    let loaded = load_session(script, &options)?;
    let query = resolve_query(&loaded.config, &list)?;
    let snapshot = loaded.session.store().snapshot();
    let tasks = project_view(&snapshot.tasks, &query);
    let output = ListOutput {
        query,
        total: snapshot.len(),
        tasks,
    };

    let mut human = HumanOutput::new(format!(
        "{} of {} tasks (status {}, sort {} {})",
        output.tasks.len(),
        output.total,
        query.filter,
        query.sort_key,
        query.direction
    ));
    for task in &output.tasks {
        human.push_detail(format_task_line(task));
    }
    push_skipped_steps(&mut human, &loaded.steps);

    emit_success(options.output(), "list", &output, Some(&human))
}

#[derive(Serialize)]
struct TrendOutput {
    points: Vec<TrendPoint>,
}

pub fn run_trend(script: &Path, options: SessionOptions) -> Result<()> {
    let loaded = load_session(script, &options)?;
    let output = TrendOutput {
        points: aggregate_trend(&loaded.session.store().list()),
    };

    let header = if output.points.is_empty() {
        "No tasks due".to_string()
    } else {
        format!("Tasks due per day ({} dates)", output.points.len())
    };
    let mut human = HumanOutput::new(header);
    for point in &output.points {
        human.push_detail(format!("{}: {}", point.date, point.count));
    }
    push_skipped_steps(&mut human, &loaded.steps);

    emit_success(options.output(), "trend", &output, Some(&human))
}

pub fn run_stats(script: &Path, options: SessionOptions) -> Result<()> {
    let loaded = load_session(script, &options)?;
    let output: DashboardStats = stats::compute(&loaded.session.store().list());

    let mut human = HumanOutput::new("Dashboard");
    human.push_summary("Total tasks", output.total.to_string());
    human.push_summary("To Do", output.count(TaskStatus::Todo).to_string());
    human.push_summary(
        "In Progress",
        output.count(TaskStatus::InProgress).to_string(),
    );
    human.push_summary("Done", output.count(TaskStatus::Done).to_string());
    human.push_detail(format!(
        "Statuses: {}",
        stats::format_status_counts(&output.statuses)
    ));
    push_skipped_steps(&mut human, &loaded.steps);

    emit_success(options.output(), "stats", &output, Some(&human))
}
