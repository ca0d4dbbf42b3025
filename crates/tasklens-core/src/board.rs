use chrono::NaiveDate;
use tracing::debug;

use crate::clock::Clock;
use crate::filter::{DateBucket, filter_tasks};
use crate::projection::Projection;
use crate::selection::Selection;
use crate::sort::{SortKey, sort_tasks};
use crate::summary::Summary;
use crate::task::{Task, TaskId, TaskPriority, TaskStatus};
use crate::view::{Choice, ViewMode, ViewState};

/// View-model of the task page: a read-only task snapshot, the view state
/// and the clock date buckets are evaluated against.
///
/// Every action mutates [`ViewState`] only; [`TaskBoard::snapshot`] re-runs
/// filter, sort and projection from scratch.
#[derive(Debug, Clone)]
pub struct TaskBoard<C> {
    tasks: Vec<Task>,
    view: ViewState,
    clock: C,
    purge_selection: bool,
}

/// Everything the presentation layer renders, derived in one pass.
#[derive(Debug, Clone)]
pub struct BoardSnapshot<'a> {
    pub today: NaiveDate,
    pub mode: ViewMode,
    pub visible: Vec<&'a Task>,
    pub projection: Projection<'a>,
    pub selection: &'a Selection,
    pub all_selected: bool,
    pub summary: Summary,
}

impl BoardSnapshot<'_> {
    pub fn visible_ids(&self) -> Vec<TaskId> {
        self.visible.iter().map(|task| task.id.clone()).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.visible.is_empty()
    }
}

impl<C: Clock> TaskBoard<C> {
    pub fn new(tasks: Vec<Task>, clock: C) -> Self {
        debug!(count = tasks.len(), "created task board");
        Self {
            tasks,
            view: ViewState::default(),
            clock,
            purge_selection: false,
        }
    }

    pub fn with_view(mut self, view: ViewState) -> Self {
        self.view = view;
        self.refiltered();
        self
    }

    /// Drop selected ids whenever they fall out of the filtered view.
    pub fn with_selection_purge(mut self, purge: bool) -> Self {
        self.purge_selection = purge;
        self.refiltered();
        self
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn view(&self) -> &ViewState {
        &self.view
    }

    pub fn today(&self) -> NaiveDate {
        self.clock.today()
    }

    /// Filter then sort.
    pub fn visible(&self) -> Vec<&Task> {
        let mut visible = filter_tasks(&self.tasks, &self.view, self.clock.today());
        sort_tasks(&mut visible, self.view.sort);
        visible
    }

    pub fn visible_ids(&self) -> Vec<TaskId> {
        self.visible().iter().map(|task| task.id.clone()).collect()
    }

    #[tracing::instrument(skip(self))]
    pub fn snapshot(&self) -> BoardSnapshot<'_> {
        let today = self.clock.today();
        let mut visible = filter_tasks(&self.tasks, &self.view, today);
        sort_tasks(&mut visible, self.view.sort);

        let ids: Vec<TaskId> = visible.iter().map(|task| task.id.clone()).collect();
        let projection = Projection::build(&visible, self.view.mode);
        let summary = Summary::build(&self.tasks, visible.len(), &self.view);

        BoardSnapshot {
            today,
            mode: self.view.mode,
            all_selected: self.view.selection.all_selected(&ids),
            selection: &self.view.selection,
            projection,
            summary,
            visible,
        }
    }

    /// New snapshot from the data source.
    pub fn replace_tasks(&mut self, tasks: Vec<Task>) {
        debug!(count = tasks.len(), "replaced task snapshot");
        self.tasks = tasks;
        self.refiltered();
    }

    pub fn set_status(&mut self, status: Choice<TaskStatus>) {
        debug!(?status, "status filter");
        self.view.status = status;
        self.refiltered();
    }

    pub fn set_priority(&mut self, priority: Choice<TaskPriority>) {
        debug!(?priority, "priority filter");
        self.view.priority = priority;
        self.refiltered();
    }

    pub fn set_assignee(&mut self, assignee: Choice<String>) {
        debug!(?assignee, "assignee filter");
        self.view.assignee = assignee;
        self.refiltered();
    }

    pub fn set_search(&mut self, term: impl Into<String>) {
        self.view.search = term.into();
        debug!(term = %self.view.search, "search term");
        self.refiltered();
    }

    pub fn set_due(&mut self, due: Choice<DateBucket>) {
        debug!(?due, "date filter");
        self.view.due = due;
        self.refiltered();
    }

    pub fn clear_filters(&mut self) {
        debug!("cleared filters");
        self.view.clear_filters();
        self.refiltered();
    }

    pub fn set_sort_key(&mut self, key: SortKey) {
        debug!(key = key.as_key(), "sort key");
        self.view.sort.key = key;
    }

    pub fn toggle_direction(&mut self) {
        self.view.toggle_direction();
        debug!(direction = self.view.sort.direction.as_key(), "sort direction");
    }

    pub fn set_mode(&mut self, mode: ViewMode) {
        debug!(mode = mode.as_key(), "view mode");
        self.view.mode = mode;
    }

    pub fn toggle_mode(&mut self) {
        self.view.toggle_mode();
        debug!(mode = self.view.mode.as_key(), "view mode");
    }

    pub fn toggle_selected(&mut self, id: &TaskId) {
        self.view.selection.toggle(id);
    }

    pub fn toggle_select_all(&mut self) {
        let visible = self.visible_ids();
        self.view.selection.select_all(&visible);
    }

    pub fn clear_selection(&mut self) {
        self.view.selection.clear();
    }

    fn refiltered(&mut self) {
        if self.purge_selection && !self.view.selection.is_empty() {
            let visible = self.visible_ids();
            self.view.selection.retain_visible(&visible);
        }
    }
}
