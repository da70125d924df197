use std::io::Write;

use anyhow::{Result, bail};
use clap::{Subcommand, ValueEnum};
use time::Date;
use toolbox_app::{Board, CreateTaskInput, DragMachine, DropOutcome, FilteredView, TaskFilterBuilder, TaskSort};
use toolbox_core::datefmt::{format_date, parse_date};
use toolbox_core::{EntityId, OptionalPatch, Priority, RecordFilter, Task, TaskPatch, TaskStatus};

use super::{CommandContext, confirm_and_delete, emit_json, filter_error, not_found, toolbox_error};
use crate::OutputFormat;
use crate::table::render_table;

#[derive(Subcommand, Debug)]
pub enum TaskCommand {
    /// List tasks, optionally filtered.
    List {
        /// Case-insensitive search over title and description.
        #[arg(long)]
        text: Option<String>,
        #[arg(long)]
        status: Option<String>,
        #[arg(long)]
        priority: Option<String>,
        #[arg(long)]
        assignee: Option<String>,
        #[arg(long)]
        category: Option<String>,
        #[arg(long, value_enum, default_value_t = TaskOrder::Created)]
        sort: TaskOrder,
    },

    /// Create a task.
    Add {
        #[arg(long)]
        title: String,
        /// Deadline (YYYY-MM-DD).
        #[arg(long, value_parser = parse_date)]
        due: Option<Date>,
        #[arg(long)]
        assignee: Option<String>,
        #[arg(long)]
        description: Option<String>,
        #[arg(long)]
        priority: Option<Priority>,
        #[arg(long)]
        category: Option<String>,
        /// Initial column; the board default when omitted.
        #[arg(long)]
        status: Option<TaskStatus>,
        #[arg(long, value_parser = clap::value_parser!(u8).range(0..=100))]
        progress: Option<u8>,
    },

    /// Edit a task. Only the given fields change; an empty description clears it.
    Update {
        id: EntityId,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        description: Option<String>,
        #[arg(long)]
        status: Option<TaskStatus>,
        #[arg(long)]
        priority: Option<Priority>,
        #[arg(long, value_parser = parse_date)]
        due: Option<Date>,
        #[arg(long)]
        assignee: Option<String>,
        #[arg(long)]
        category: Option<String>,
        #[arg(long, value_parser = clap::value_parser!(u8).range(0..=100))]
        progress: Option<u8>,
    },

    /// Drag a task onto another board column.
    Move { id: EntityId, status: TaskStatus },

    /// Delete a task.
    Delete {
        id: EntityId,
        /// Skip the confirmation prompt.
        #[arg(long)]
        yes: bool,
    },

    /// Show the kanban board.
    Board,

    /// List tasks past their deadline.
    Overdue {
        /// Evaluate deadlines as of this day (YYYY-MM-DD).
        #[arg(long, value_parser = parse_date)]
        today: Option<Date>,
        /// Also set their status to overdue.
        #[arg(long)]
        mark: bool,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum TaskOrder {
    Created,
    Due,
    Priority,
    Title,
}

impl From<TaskOrder> for TaskSort {
    fn from(order: TaskOrder) -> Self {
        match order {
            TaskOrder::Created => Self::Created,
            TaskOrder::Due => Self::DueDate,
            TaskOrder::Priority => Self::Priority,
            TaskOrder::Title => Self::Title,
        }
    }
}

#[allow(clippy::too_many_lines)]
pub fn run(command: TaskCommand, ctx: &mut CommandContext, out: &mut dyn Write) -> Result<()> {
    match command {
        TaskCommand::List {
            text,
            status,
            priority,
            assignee,
            category,
            sort,
        } => {
            let filter = TaskFilterBuilder::new()
                .with_text(text)
                .with_status(status.as_deref())
                .and_then(|builder| builder.with_priority(priority.as_deref()))
                .map_err(|err| filter_error(&err))?
                .with_assignee(assignee)
                .with_category(category)
                .build();
            let filtered = !filter.is_empty();
            let tasks = ctx.toolbox.tasks();
            let mut view = FilteredView::new(tasks, filter, TaskSort::from(sort));
            let visible = view.visible(tasks);
            if ctx.format == OutputFormat::Json {
                return emit_json(out, &visible);
            }
            if visible.is_empty() {
                if filtered {
                    writeln!(out, "Tidak ada tugas yang cocok dengan filter")?;
                } else {
                    writeln!(out, "Belum ada tugas")?;
                }
                return Ok(());
            }
            render_tasks(out, &visible)
        }
        TaskCommand::Add {
            title,
            due,
            assignee,
            description,
            priority,
            category,
            status,
            progress,
        } => {
            let task = ctx
                .toolbox
                .create_task(CreateTaskInput {
                    title,
                    description,
                    due_date: due,
                    assignee: assignee.unwrap_or_default(),
                    priority,
                    category,
                    status,
                    progress,
                })
                .map_err(|err| toolbox_error(&err))?;
            if ctx.format == OutputFormat::Json {
                return emit_json(out, &task);
            }
            writeln!(out, "tugas dibuat: #{} {} [{}]", task.id, task.title, task.status.label())?;
            Ok(())
        }
        TaskCommand::Update {
            id,
            title,
            description,
            status,
            priority,
            due,
            assignee,
            category,
            progress,
        } => {
            let patch = TaskPatch {
                title,
                description: description.as_deref().map(OptionalPatch::from_text),
                status,
                priority,
                due_date: due.map(OptionalPatch::Set),
                assignee: assignee.map(|name| (None, name)),
                category,
                progress,
            };
            if patch.is_empty() {
                bail!("tidak ada perubahan yang diberikan");
            }
            if !ctx.toolbox.update_task(id, patch).map_err(|err| toolbox_error(&err))? {
                return Err(not_found("tugas", id));
            }
            report_task(ctx, id, "tugas diperbarui", out)
        }
        TaskCommand::Move { id, status } => {
            let mut drag = DragMachine::new();
            let Some(task) = ctx.toolbox.tasks().get(id) else {
                return Err(not_found("tugas", id));
            };
            drag.drag_start(task);
            let board = ctx.toolbox.board().clone();
            match drag.drop_on(status, ctx.toolbox.tasks_mut()) {
                DropOutcome::Moved { task, from, to } => writeln!(
                    out,
                    "tugas #{task} dipindah: {} -> {}",
                    board.label_for(from),
                    board.label_for(to)
                )?,
                DropOutcome::Unchanged { task } => {
                    writeln!(out, "tugas #{task} sudah berada di kolom {}", board.label_for(status))?;
                }
                DropOutcome::Missing { task } => return Err(not_found("tugas", task)),
                DropOutcome::NotDragging | DropOutcome::Cancelled { .. } => {
                    writeln!(out, "tidak ada perubahan")?;
                }
            }
            Ok(())
        }
        TaskCommand::Delete { id, yes } => {
            let pending = ctx.toolbox.request_task_deletion(id);
            confirm_and_delete(ctx, pending, &format!("tugas #{id}"), yes, out)
        }
        TaskCommand::Board => {
            let board = Board::columns(ctx.toolbox.board(), ctx.toolbox.tasks().iter());
            if ctx.format == OutputFormat::Json {
                return emit_json(out, &board);
            }
            for (index, column) in board.as_slice().iter().enumerate() {
                if index > 0 {
                    writeln!(out)?;
                }
                writeln!(out, "{} ({})", column.label, column.tasks.len())?;
                for task in &column.tasks {
                    writeln!(
                        out,
                        "  #{} {} | {} | {}",
                        task.id,
                        task.title,
                        task.assignee,
                        task.due_date.map(format_date).unwrap_or_default()
                    )?;
                }
            }
            Ok(())
        }
        TaskCommand::Overdue { today, mark } => {
            let today = today.unwrap_or_else(|| ctx.toolbox.today());
            let marked = if mark { Some(ctx.toolbox.mark_overdue(today)) } else { None };
            let late = ctx.toolbox.overdue_tasks(today);
            if ctx.format == OutputFormat::Json {
                return emit_json(out, &late);
            }
            if let Some(count) = marked {
                writeln!(out, "{count} tugas ditandai terlambat")?;
            }
            if late.is_empty() {
                writeln!(out, "Tidak ada tugas terlambat per {}", format_date(today))?;
                return Ok(());
            }
            render_tasks(out, &late)
        }
    }
}

fn report_task(ctx: &CommandContext, id: EntityId, message: &str, out: &mut dyn Write) -> Result<()> {
    let task = ctx.toolbox.tasks().get(id).ok_or_else(|| not_found("tugas", id))?;
    if ctx.format == OutputFormat::Json {
        return emit_json(out, task);
    }
    writeln!(out, "{message}: #{} {} [{}]", task.id, task.title, task.status.label())?;
    Ok(())
}

fn render_tasks(out: &mut dyn Write, tasks: &[&Task]) -> Result<()> {
    let rows: Vec<Vec<String>> = tasks
        .iter()
        .map(|task| {
            vec![
                task.id.to_string(),
                task.status.label().to_owned(),
                task.priority.to_string(),
                task.title.clone(),
                task.assignee.clone(),
                task.due_date.map(format_date).unwrap_or_default(),
                format!("{}%", task.progress),
            ]
        })
        .collect();
    render_table(
        out,
        &["ID", "Status", "Prioritas", "Judul", "Penanggung Jawab", "Tenggat", "Progres"],
        &rows,
    )?;
    Ok(())
}
