use std::collections::BTreeSet;

use crate::task::{Task, TaskPriority, TaskStatus};
use crate::view::ViewState;

/// Sidebar facets. Counts are over the whole collection, not the view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Summary {
    pub total: usize,
    pub visible: usize,
    pub selected: usize,
    pub active_filters: usize,
    pub status_counts: Vec<(TaskStatus, usize)>,
    pub priority_counts: Vec<(TaskPriority, usize)>,
    pub assignees: Vec<String>,
}

impl Summary {
    pub fn build(tasks: &[Task], visible: usize, view: &ViewState) -> Self {
        Self {
            total: tasks.len(),
            visible,
            selected: view.selection.len(),
            active_filters: view.active_filter_count(),
            status_counts: status_counts(tasks),
            priority_counts: priority_counts(tasks),
            assignees: unique_assignees(tasks),
        }
    }

    pub fn status_count(&self, status: TaskStatus) -> usize {
        self.status_counts
            .iter()
            .find(|(s, _)| *s == status)
            .map(|(_, n)| *n)
            .unwrap_or(0)
    }

    pub fn priority_count(&self, priority: TaskPriority) -> usize {
        self.priority_counts
            .iter()
            .find(|(p, _)| *p == priority)
            .map(|(_, n)| *n)
            .unwrap_or(0)
    }
}

pub fn status_counts(tasks: &[Task]) -> Vec<(TaskStatus, usize)> {
    TaskStatus::ALL
        .iter()
        .map(|status| (*status, tasks.iter().filter(|t| t.status == *status).count()))
        .collect()
}

pub fn priority_counts(tasks: &[Task]) -> Vec<(TaskPriority, usize)> {
    TaskPriority::ALL
        .iter()
        .map(|priority| {
            (
                *priority,
                tasks.iter().filter(|t| t.priority == *priority).count(),
            )
        })
        .collect()
}

/// Assignee names in first-seen order.
pub fn unique_assignees(tasks: &[Task]) -> Vec<String> {
    let mut seen = BTreeSet::new();
    tasks
        .iter()
        .filter(|task| seen.insert(task.assignee.name.as_str()))
        .map(|task| task.assignee.name.clone())
        .collect()
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::{Summary, unique_assignees};
    use crate::task::{Assignee, Task, TaskPriority, TaskStatus};
    use crate::view::{Choice, ViewState};

    fn task(id: &str, status: TaskStatus, priority: TaskPriority, who: &str) -> Task {
        let due = NaiveDate::from_ymd_opt(2024, 1, 1).expect("valid date");
        let mut task = Task::new(id, id, due);
        task.status = status;
        task.priority = priority;
        task.assignee = Assignee::named(who);
        task
    }

    #[test]
    fn counts_cover_whole_collection() {
        let tasks = vec![
            task("1", TaskStatus::Todo, TaskPriority::High, "Can Yıldız"),
            task("2", TaskStatus::Todo, TaskPriority::Low, "Ayşe Demir"),
            task("3", TaskStatus::Done, TaskPriority::High, "Can Yıldız"),
        ];
        let view = ViewState {
            status: Choice::Only(TaskStatus::Done),
            ..ViewState::default()
        };

        let summary = Summary::build(&tasks, 1, &view);

        assert_eq!(summary.total, 3);
        assert_eq!(summary.visible, 1);
        assert_eq!(summary.active_filters, 1);
        assert_eq!(summary.status_count(TaskStatus::Todo), 2);
        assert_eq!(summary.status_count(TaskStatus::InReview), 0);
        assert_eq!(summary.priority_count(TaskPriority::High), 2);
        assert_eq!(summary.priority_counts[0].0, TaskPriority::Urgent);
    }

    #[test]
    fn assignees_are_deduplicated_in_first_seen_order() {
        let tasks = vec![
            task("1", TaskStatus::Todo, TaskPriority::Low, "Zeynep Kaya"),
            task("2", TaskStatus::Todo, TaskPriority::Low, "Ahmet Yılmaz"),
            task("3", TaskStatus::Todo, TaskPriority::Low, "Zeynep Kaya"),
        ];
        assert_eq!(
            unique_assignees(&tasks),
            vec!["Zeynep Kaya".to_string(), "Ahmet Yılmaz".to_string()]
        );
    }
}
