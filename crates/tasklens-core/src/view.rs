use tracing::warn;

use crate::filter::DateBucket;
use crate::selection::Selection;
use crate::sort::{
  SortDirection,
  SortKey,
  SortSpec
};
use crate::task::{
  TaskPriority,
  TaskStatus
};

/// One filter dimension: everything,
/// exactly one value, or a key nobody
/// recognized.
///
/// `Unrecognized` admits nothing, so a
/// malformed view degrades to an empty
/// list instead of an error.
#[derive(
  Debug, Clone, PartialEq, Eq,
)]
pub enum Choice<T> {
  All,
  Only(T),
  Unrecognized(String)
}

impl<T> Default for Choice<T> {
  fn default() -> Self {
    Self::All
  }
}

impl<T: PartialEq> Choice<T> {
  pub fn admits(
    &self,
    value: &T
  ) -> bool {
    match self {
      | Self::All => true,
      | Self::Only(wanted) => {
        wanted == value
      }
      | Self::Unrecognized(_) => false
    }
  }
}

impl<T> Choice<T> {
  pub fn is_all(&self) -> bool {
    matches!(self, Self::All)
  }

  /// Parses a presentation key. `all`
  /// and the empty string select
  /// everything.
  pub fn parse_with(
    key: &str,
    from_key: impl FnOnce(&str) -> Option<T>
  ) -> Self {
    let trimmed = key.trim();
    if trimmed.is_empty()
      || trimmed
        .eq_ignore_ascii_case("all")
    {
      return Self::All;
    }

    match from_key(trimmed) {
      | Some(value) => Self::Only(value),
      | None => {
        warn!(
          key = %trimmed,
          "unrecognized filter value; \
           view will be empty"
        );
        Self::Unrecognized(
          trimmed.to_string()
        )
      }
    }
  }
}

impl Choice<TaskStatus> {
  pub fn parse(key: &str) -> Self {
    Self::parse_with(
      key,
      TaskStatus::from_key
    )
  }
}

impl Choice<TaskPriority> {
  pub fn parse(key: &str) -> Self {
    Self::parse_with(
      key,
      TaskPriority::from_key
    )
  }
}

impl Choice<DateBucket> {
  pub fn parse(key: &str) -> Self {
    Self::parse_with(
      key,
      DateBucket::from_key
    )
  }
}

impl Choice<String> {
  /// Any non-`all` name is a valid
  /// assignee; names nobody carries
  /// simply match nothing.
  pub fn parse(key: &str) -> Self {
    Self::parse_with(key, |name| {
      Some(name.to_string())
    })
  }
}

#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  Default,
)]
pub enum ViewMode {
  #[default]
  List,
  Kanban
}

impl ViewMode {
  pub fn as_key(self) -> &'static str {
    match self {
      | Self::List => "list",
      | Self::Kanban => "kanban"
    }
  }

  pub fn from_key(
    key: &str
  ) -> Option<Self> {
    match key
      .trim()
      .to_ascii_lowercase()
      .as_str()
    {
      | "list" => Some(Self::List),
      | "kanban" | "board" => {
        Some(Self::Kanban)
      }
      | _ => None
    }
  }

  pub fn next(self) -> Self {
    match self {
      | Self::List => Self::Kanban,
      | Self::Kanban => Self::List
    }
  }
}

/// User-chosen parameters of one task
/// view.
#[derive(
  Debug, Clone, PartialEq, Default,
)]
pub struct ViewState {
  pub status:    Choice<TaskStatus>,
  pub priority:  Choice<TaskPriority>,
  pub assignee:  Choice<String>,
  pub search:    String,
  pub due:       Choice<DateBucket>,
  pub sort:      SortSpec,
  pub mode:      ViewMode,
  pub selection: Selection
}

impl ViewState {
  pub fn with_defaults(
    key: SortKey,
    direction: SortDirection,
    mode: ViewMode
  ) -> Self {
    Self {
      sort: SortSpec {
        key,
        direction
      },
      mode,
      ..Self::default()
    }
  }

  /// Resets the five filters. Sort,
  /// mode and selection are kept.
  pub fn clear_filters(&mut self) {
    self.status = Choice::All;
    self.priority = Choice::All;
    self.assignee = Choice::All;
    self.search.clear();
    self.due = Choice::All;
  }

  pub fn active_filter_count(
    &self
  ) -> usize {
    [
      !self.status.is_all(),
      !self.priority.is_all(),
      !self.assignee.is_all(),
      !self.search.is_empty(),
      !self.due.is_all()
    ]
    .into_iter()
    .filter(|active| *active)
    .count()
  }

  pub fn toggle_mode(&mut self) {
    self.mode = self.mode.next();
  }

  pub fn toggle_direction(&mut self) {
    self.sort.direction =
      self.sort.direction.reversed();
  }
}

#[cfg(test)]
mod tests {
  use super::{
    Choice,
    ViewMode,
    ViewState
  };
  use crate::filter::DateBucket;
  use crate::sort::{
    SortDirection,
    SortKey
  };
  use crate::task::{
    TaskPriority,
    TaskStatus
  };

  #[test]
  fn defaults_show_everything_by_due_date()
  {
    let view = ViewState::default();
    assert!(view.status.is_all());
    assert!(view.priority.is_all());
    assert!(view.assignee.is_all());
    assert!(view.due.is_all());
    assert!(view.search.is_empty());
    assert_eq!(
      view.sort.key,
      SortKey::DueDate
    );
    assert_eq!(
      view.sort.direction,
      SortDirection::Asc
    );
    assert_eq!(view.mode, ViewMode::List);
    assert!(view.selection.is_empty());
    assert_eq!(
      view.active_filter_count(),
      0
    );
  }

  #[test]
  fn parse_maps_unknown_keys_to_unrecognized()
   {
    assert_eq!(
      Choice::<TaskStatus>::parse("all"),
      Choice::All
    );
    assert_eq!(
      Choice::<TaskStatus>::parse(
        "DONE"
      ),
      Choice::Only(TaskStatus::Done)
    );
    assert_eq!(
      Choice::<TaskPriority>::parse(
        "critical"
      ),
      Choice::Unrecognized(
        "critical".to_string()
      )
    );
    assert_eq!(
      Choice::<DateBucket>::parse(
        "this_week"
      ),
      Choice::Only(DateBucket::ThisWeek)
    );
    assert!(
      !Choice::<TaskStatus>::parse(
        "ARCHIVED"
      )
      .admits(&TaskStatus::Todo)
    );
  }

  #[test]
  fn clear_filters_keeps_sort_mode_and_selection()
   {
    let mut view =
      ViewState::with_defaults(
        SortKey::Priority,
        SortDirection::Desc,
        ViewMode::Kanban
      );
    view.status =
      Choice::Only(TaskStatus::Done);
    view.priority =
      Choice::Only(TaskPriority::High);
    view.assignee =
      Choice::<String>::parse(
        "Ayşe Demir"
      );
    view.search = "logo".to_string();
    view.due =
      Choice::Only(DateBucket::Overdue);
    view.selection.toggle(&"1".into());
    assert_eq!(
      view.active_filter_count(),
      5
    );

    view.clear_filters();

    assert_eq!(
      view.active_filter_count(),
      0
    );
    assert_eq!(
      view.sort.key,
      SortKey::Priority
    );
    assert_eq!(
      view.mode,
      ViewMode::Kanban
    );
    assert_eq!(view.selection.len(), 1);
  }

  #[test]
  fn mode_and_direction_toggle_back_and_forth()
   {
    let mut view = ViewState::default();
    view.toggle_mode();
    assert_eq!(
      view.mode,
      ViewMode::Kanban
    );
    view.toggle_mode();
    assert_eq!(view.mode, ViewMode::List);

    view.toggle_direction();
    assert_eq!(
      view.sort.direction,
      SortDirection::Desc
    );
    view.toggle_direction();
    assert_eq!(
      view.sort.direction,
      SortDirection::Asc
    );
  }
}
