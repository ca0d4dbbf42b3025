use std::io::IsTerminal;
use std::path::PathBuf;

use anyhow::anyhow;
use clap::{ArgAction, Parser};
use tracing::debug;
use tracing_subscriber::EnvFilter;

use crate::board::TaskBoard;
use crate::clock::Clock;
use crate::filter::DateBucket;
use crate::sort::SortKey;
use crate::task::{TaskId, TaskPriority, TaskStatus};
use crate::view::{Choice, ViewMode};

#[derive(Debug, Clone)]
pub struct KeyVal {
    pub key: String,
    pub value: String,
}

impl std::str::FromStr for KeyVal {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (k, v) = s
            .split_once('=')
            .ok_or_else(|| anyhow!("expected KEY=VALUE, got: {s}"))?;
        Ok(Self {
            key: k.trim().to_string(),
            value: v.trim().to_string(),
        })
    }
}

#[derive(Parser, Debug, Clone)]
#[command(
    name = "tasklens",
    version,
    about = "Filter, sort and select dashboard tasks from the terminal"
)]
pub struct GlobalCli {
    #[arg(short = 'v', long = "verbose", action = ArgAction::Count)]
    pub verbose: u8,

    #[arg(short = 'q', long = "quiet", action = ArgAction::Count)]
    pub quiet: u8,

    /// rc file to load instead of ~/.tasklensrc
    #[arg(long = "rc")]
    pub rc: Option<PathBuf>,

    #[arg(
        long = "config",
        value_parser = clap::builder::ValueParser::new(|s: &str| s.parse::<KeyVal>()),
        action = ArgAction::Append
    )]
    pub config_overrides: Vec<KeyVal>,

    /// JSON or JSON Lines task file; the built-in sample when absent
    #[arg(long = "tasks")]
    pub tasks: Option<PathBuf>,

    /// Pin "today" (today, tomorrow, -1d, +2w, YYYY-MM-DD)
    #[arg(long = "today")]
    pub today: Option<String>,

    #[arg(long = "status", default_value = "all")]
    pub status: String,

    #[arg(long = "priority", default_value = "all")]
    pub priority: String,

    #[arg(long = "assignee", default_value = "all")]
    pub assignee: String,

    #[arg(short = 's', long = "search", default_value = "")]
    pub search: String,

    /// all, today, tomorrow, this_week, overdue
    #[arg(long = "due", default_value = "all")]
    pub due: String,

    /// dueDate, priority, createdAt
    #[arg(long = "sort")]
    pub sort: Option<String>,

    /// Flip the configured sort direction
    #[arg(long = "reverse", action = ArgAction::SetTrue)]
    pub reverse: bool,

    /// list or kanban
    #[arg(long = "view")]
    pub view: Option<String>,

    /// Toggle selection of a task id; repeatable
    #[arg(long = "select", action = ArgAction::Append)]
    pub select: Vec<String>,

    /// Press select-all; repeatable
    #[arg(long = "select-all", action = ArgAction::Count)]
    pub select_all: u8,

    /// Print the filter sidebar facets
    #[arg(long = "facets", action = ArgAction::SetTrue)]
    pub facets: bool,
}

impl GlobalCli {
    /// Replays the command line as user actions on `board`.
    #[tracing::instrument(skip_all)]
    pub fn apply<C: Clock>(&self, board: &mut TaskBoard<C>) -> anyhow::Result<()> {
        board.set_status(Choice::<TaskStatus>::parse(&self.status));
        board.set_priority(Choice::<TaskPriority>::parse(&self.priority));
        board.set_assignee(Choice::<String>::parse(&self.assignee));
        board.set_search(self.search.clone());
        board.set_due(Choice::<DateBucket>::parse(&self.due));

        if let Some(raw) = &self.sort {
            let key = SortKey::from_key(raw).ok_or_else(|| anyhow!("unknown sort key: {raw}"))?;
            board.set_sort_key(key);
        }
        if self.reverse {
            board.toggle_direction();
        }
        if let Some(raw) = &self.view {
            let mode = ViewMode::from_key(raw).ok_or_else(|| anyhow!("unknown view mode: {raw}"))?;
            board.set_mode(mode);
        }

        for id in &self.select {
            board.toggle_selected(&TaskId::new(id.trim()));
        }
        for _ in 0..self.select_all {
            board.toggle_select_all();
        }

        debug!(view = ?board.view(), "applied command line");
        Ok(())
    }
}

pub fn init_tracing(verbose: u8, quiet: u8) -> anyhow::Result<()> {
    let default_level = if quiet >= 2 {
        "error"
    } else if quiet == 1 {
        "warn"
    } else if verbose >= 3 {
        "trace"
    } else if verbose == 2 {
        "debug"
    } else if verbose == 1 {
        "info"
    } else {
        "warn"
    };

    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_level))
        .map_err(|e| anyhow!("invalid RUST_LOG / log filter: {e}"))?;

    let init_result = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_level(true)
        .with_ansi(std::io::stderr().is_terminal())
        .try_init();

    if let Err(err) = init_result {
        debug!(error = %err, "tracing subscriber already set, continuing");
    }

    Ok(())
}
