use crate::task::{Task, TaskStatus};
use crate::view::ViewMode;

#[derive(Debug, Clone, PartialEq)]
pub struct KanbanColumn<'a> {
    pub status: TaskStatus,
    pub tasks: Vec<&'a Task>,
}

impl KanbanColumn<'_> {
    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }
}

/// Read-only shape handed to the presentation layer.
#[derive(Debug, Clone, PartialEq)]
pub enum Projection<'a> {
    List(Vec<&'a Task>),
    Kanban(Vec<KanbanColumn<'a>>),
}

impl<'a> Projection<'a> {
    pub fn build(sorted: &[&'a Task], mode: ViewMode) -> Self {
        match mode {
            ViewMode::List => Self::List(sorted.to_vec()),
            ViewMode::Kanban => Self::Kanban(kanban_columns(sorted)),
        }
    }

    pub fn task_count(&self) -> usize {
        match self {
            Self::List(tasks) => tasks.len(),
            Self::Kanban(columns) => columns.iter().map(KanbanColumn::len).sum(),
        }
    }
}

/// One column per status in board order; each column keeps the order of
/// `sorted`.
pub fn kanban_columns<'a>(sorted: &[&'a Task]) -> Vec<KanbanColumn<'a>> {
    TaskStatus::ALL
        .iter()
        .map(|status| KanbanColumn {
            status: *status,
            tasks: sorted
                .iter()
                .copied()
                .filter(|task| task.status == *status)
                .collect(),
        })
        .collect()
}
