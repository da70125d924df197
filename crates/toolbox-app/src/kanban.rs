//! Kanban board grouping and the drag-and-drop state machine.

use serde::Serialize;
use toolbox_core::{EntityId, Task, TaskPatch, TaskStatus};
use tracing::debug;

use crate::collection::Collection;
use crate::config::BoardConfig;

/// Drag state of the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DragState {
    /// Nothing is being dragged.
    #[default]
    Idle,
    /// A card is in flight.
    Dragging {
        /// Task being dragged.
        task: EntityId,
        /// Column the drag started from.
        source: TaskStatus,
    },
}

/// Result of ending a drag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropOutcome {
    /// No drag was active.
    NotDragging,
    /// The drag was abandoned without touching the store.
    Cancelled {
        /// Task that was being dragged.
        task: EntityId,
    },
    /// Dropped on its own column.
    Unchanged {
        /// Task that was dropped.
        task: EntityId,
    },
    /// Status changed.
    Moved {
        /// Task that moved.
        task: EntityId,
        /// Previous column.
        from: TaskStatus,
        /// New column.
        to: TaskStatus,
    },
    /// The task disappeared while being dragged.
    Missing {
        /// Task that could not be found.
        task: EntityId,
    },
}

/// Two-state drag machine. Every terminal call leaves it [`DragState::Idle`].
#[derive(Debug, Default)]
pub struct DragMachine {
    state: DragState,
}

impl DragMachine {
    /// Idle machine.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current state.
    #[must_use]
    pub const fn state(&self) -> DragState {
        self.state
    }

    /// Pick up `task`. A drag already in flight is dropped silently.
    pub fn drag_start(&mut self, task: &Task) {
        if let DragState::Dragging { task: previous, .. } = self.state {
            debug!(task = %previous, "previous drag cancelled by new drag");
        }
        self.state = DragState::Dragging {
            task: task.id,
            source: task.status,
        };
    }

    /// Abandon the drag without mutating anything.
    pub fn drag_end(&mut self) -> DropOutcome {
        match std::mem::take(&mut self.state) {
            DragState::Idle => DropOutcome::NotDragging,
            DragState::Dragging { task, .. } => DropOutcome::Cancelled { task },
        }
    }

    /// Drop the card on column `target`.
    pub fn drop_on(&mut self, target: TaskStatus, tasks: &mut Collection<Task>) -> DropOutcome {
        let DragState::Dragging { task, source } = std::mem::take(&mut self.state) else {
            return DropOutcome::NotDragging;
        };
        if source == target {
            return DropOutcome::Unchanged { task };
        }
        if tasks.update(task, TaskPatch::status(target)) {
            debug!(%task, from = %source, to = %target, "task moved on board");
            DropOutcome::Moved {
                task,
                from: source,
                to: target,
            }
        } else {
            DropOutcome::Missing { task }
        }
    }
}

/// One rendered column of the board.
#[derive(Debug, Clone, Serialize)]
pub struct BoardColumn<'a> {
    /// Status collected in the column.
    pub status: TaskStatus,
    /// Heading.
    pub label: String,
    /// Cards in collection order.
    pub tasks: Vec<&'a Task>,
}

/// Grouping of tasks into columns.
#[derive(Debug, Clone, Serialize)]
pub struct Board<'a> {
    columns: Vec<BoardColumn<'a>>,
}

impl<'a> Board<'a> {
    /// Group `tasks` by status in configured column order.
    ///
    /// Statuses that hold tasks but have no configured column get trailing
    /// columns so no card is hidden.
    #[must_use]
    pub fn columns<I>(config: &BoardConfig, tasks: I) -> Self
    where
        I: IntoIterator<Item = &'a Task>,
    {
        let mut columns: Vec<BoardColumn<'a>> = config
            .columns()
            .iter()
            .map(|column| BoardColumn {
                status: column.status(),
                label: column.label().to_owned(),
                tasks: Vec::new(),
            })
            .collect();

        for task in tasks {
            if let Some(column) = columns.iter_mut().find(|column| column.status == task.status) {
                column.tasks.push(task);
                continue;
            }
            columns.push(BoardColumn {
                status: task.status,
                label: config.label_for(task.status).to_owned(),
                tasks: vec![task],
            });
        }
        Self { columns }
    }

    /// Columns in display order.
    #[must_use]
    pub fn as_slice(&self) -> &[BoardColumn<'a>] {
        &self.columns
    }

    /// Column for `status`, if shown.
    #[must_use]
    pub fn column(&self, status: TaskStatus) -> Option<&BoardColumn<'a>> {
        self.columns.iter().find(|column| column.status == status)
    }
}
