use chrono::{
  Days,
  NaiveDate
};
use tracing::{
  debug,
  trace
};

use crate::task::Task;
use crate::view::{
  Choice,
  ViewState
};

/// Due-date relation to "today".
#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  Hash,
)]
pub enum DateBucket {
  Today,
  Tomorrow,
  ThisWeek,
  Overdue
}

impl DateBucket {
  pub const ALL: [Self; 4] = [
    Self::Today,
    Self::Tomorrow,
    Self::ThisWeek,
    Self::Overdue
  ];

  pub fn as_key(self) -> &'static str {
    match self {
      | Self::Today => "today",
      | Self::Tomorrow => "tomorrow",
      | Self::ThisWeek => "this_week",
      | Self::Overdue => "overdue"
    }
  }

  pub fn from_key(
    key: &str
  ) -> Option<Self> {
    match key
      .trim()
      .to_ascii_lowercase()
      .replace('-', "_")
      .as_str()
    {
      | "today" => Some(Self::Today),
      | "tomorrow" => {
        Some(Self::Tomorrow)
      }
      | "this_week" | "week" => {
        Some(Self::ThisWeek)
      }
      | "overdue" => Some(Self::Overdue),
      | _ => None
    }
  }

  pub fn label(self) -> &'static str {
    match self {
      | Self::Today => "Bugün",
      | Self::Tomorrow => "Yarın",
      | Self::ThisWeek => "Bu Hafta",
      | Self::Overdue => "Gecikmiş"
    }
  }

  /// `ThisWeek` spans today through
  /// today + 7 inclusive and overlaps
  /// `Today`. Overdue is strictly
  /// before today.
  pub fn contains(
    self,
    due: NaiveDate,
    today: NaiveDate
  ) -> bool {
    match self {
      | Self::Today => due == today,
      | Self::Tomorrow => {
        today
          .checked_add_days(Days::new(1))
          == Some(due)
      }
      | Self::ThisWeek => {
        due >= today
          && today
            .checked_add_days(Days::new(
              7
            ))
            .is_some_and(|end| due <= end)
      }
      | Self::Overdue => due < today
    }
  }
}

fn search_matches(
  task: &Task,
  needle: &str
) -> bool {
  if needle.is_empty() {
    return true;
  }

  [
    task.title.as_str(),
    task.description.as_str(),
    task.assignee.name.as_str(),
    task.project.name.as_str()
  ]
  .iter()
  .any(|field| {
    field
      .to_lowercase()
      .contains(needle)
  })
}

fn matches_with_needle(
  task: &Task,
  view: &ViewState,
  needle: &str,
  today: NaiveDate
) -> bool {
  let status_match =
    view.status.admits(&task.status);
  let priority_match = view
    .priority
    .admits(&task.priority);
  let assignee_match = view
    .assignee
    .admits(&task.assignee.name);
  let search_match =
    search_matches(task, needle);
  let date_match = match &view.due {
    | Choice::All => true,
    | Choice::Only(bucket) => {
      bucket.contains(task.due, today)
    }
    | Choice::Unrecognized(_) => false
  };

  let ok = status_match
    && priority_match
    && assignee_match
    && search_match
    && date_match;
  trace!(
    id = %task.id,
    status_match,
    priority_match,
    assignee_match,
    search_match,
    date_match,
    "evaluated task"
  );
  ok
}

/// Filter stage: the tasks passing all
/// active filters, in input order.
#[tracing::instrument(skip(
  tasks, view
))]
pub fn filter_tasks<'a, I>(
  tasks: I,
  view: &ViewState,
  today: NaiveDate
) -> Vec<&'a Task>
where
  I: IntoIterator<Item = &'a Task>
{
  let needle =
    view.search.to_lowercase();
  let out: Vec<&Task> = tasks
    .into_iter()
    .filter(|task| {
      matches_with_needle(
        task, view, &needle, today
      )
    })
    .collect();
  debug!(
    visible = out.len(),
    "filtered view"
  );
  out
}
