use std::cmp::Ordering;

use tracing::debug;

use crate::task::Task;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortKey {
    #[default]
    DueDate,
    Priority,
    CreatedAt,
}

impl SortKey {
    pub fn as_key(self) -> &'static str {
        match self {
            Self::DueDate => "dueDate",
            Self::Priority => "priority",
            Self::CreatedAt => "createdAt",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        match key.trim().to_ascii_lowercase().replace(['_', '-'], "").as_str() {
            "duedate" | "due" => Some(Self::DueDate),
            "priority" => Some(Self::Priority),
            "createdat" | "created" => Some(Self::CreatedAt),
            _ => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::DueDate => "Teslim Tarihi",
            Self::Priority => "Öncelik",
            Self::CreatedAt => "Oluşturulma",
        }
    }

    fn compare(self, a: &Task, b: &Task) -> Ordering {
        match self {
            Self::DueDate => a.due.cmp(&b.due),
            Self::Priority => a.priority.rank().cmp(&b.priority.rank()),
            Self::CreatedAt => a.created.cmp(&b.created),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    pub fn as_key(self) -> &'static str {
        match self {
            Self::Asc => "asc",
            Self::Desc => "desc",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        match key.trim().to_ascii_lowercase().as_str() {
            "asc" | "ascending" => Some(Self::Asc),
            "desc" | "descending" => Some(Self::Desc),
            _ => None,
        }
    }

    pub fn reversed(self) -> Self {
        match self {
            Self::Asc => Self::Desc,
            Self::Desc => Self::Asc,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SortSpec {
    pub key: SortKey,
    pub direction: SortDirection,
}

impl SortSpec {
    /// Descending flips the comparator, not the output, so equal keys keep
    /// their input order either way.
    pub fn compare(&self, a: &Task, b: &Task) -> Ordering {
        let ord = self.key.compare(a, b);
        match self.direction {
            SortDirection::Asc => ord,
            SortDirection::Desc => ord.reverse(),
        }
    }
}

/// Stable in-place sort of a filtered view.
#[tracing::instrument(skip(tasks), fields(count = tasks.len()))]
pub fn sort_tasks(tasks: &mut [&Task], spec: SortSpec) {
    tasks.sort_by(|a, b| spec.compare(a, b));
    debug!(
        key = spec.key.as_key(),
        direction = spec.direction.as_key(),
        "sorted view"
    );
}
