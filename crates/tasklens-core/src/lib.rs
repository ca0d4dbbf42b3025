pub mod board;
pub mod cli;
pub mod clock;
pub mod config;
pub mod datetime;
pub mod filter;
pub mod projection;
pub mod render;
pub mod selection;
pub mod sort;
pub mod source;
pub mod summary;
pub mod task;
pub mod view;

use std::ffi::OsString;

use anyhow::Context;
use clap::Parser;
use tracing::{
  debug,
  info
};

use crate::board::TaskBoard;
use crate::clock::{
  Clock,
  FixedClock,
  SystemClock
};
use crate::source::{
  JsonFileSource,
  SampleSource,
  TaskSource
};
use crate::view::ViewState;

#[tracing::instrument(skip_all)]
pub fn run(
  raw_args: Vec<OsString>
) -> anyhow::Result<()> {
  let cli =
    cli::GlobalCli::parse_from(raw_args);

  cli::init_tracing(
    cli.verbose,
    cli.quiet
  )?;

  info!(
    verbose = cli.verbose,
    quiet = cli.quiet,
    "starting tasklens"
  );

  let mut cfg = config::Config::load(
    cli.rc.as_deref()
  )?;
  cfg.apply_overrides(
    cli
      .config_overrides
      .iter()
      .map(|kv| {
        (kv.key.clone(), kv.value.clone())
      })
  );
  debug!(files = ?cfg.loaded_files, "configuration ready");

  let system = SystemClock::new(
    datetime::resolve_timezone(
      cfg.timezone().as_deref()
    )
  );
  let clock = match cli.today.as_deref()
  {
    | Some(expr) => FixedClock(
      datetime::parse_date_expr(
        expr,
        system.today()
      )
      .context(
        "failed to parse --today"
      )?
    ),
    | None => FixedClock(system.today())
  };
  info!(today = %clock.today(), "evaluating date buckets");

  let source: Box<dyn TaskSource> =
    match cli
      .tasks
      .clone()
      .or_else(|| cfg.tasks_file())
    {
      | Some(path) => {
        Box::new(JsonFileSource::new(path))
      }
      | None => Box::new(SampleSource)
    };
  let tasks =
    source.load().with_context(|| {
      format!(
        "failed to load tasks from {}",
        source.describe()
      )
    })?;
  info!(
    source = %source.describe(),
    count = tasks.len(),
    "loaded task snapshot"
  );

  let view = ViewState::with_defaults(
    cfg.sort_key()?,
    cfg.sort_direction()?,
    cfg.view_mode()?
  );
  let mut board =
    TaskBoard::new(tasks, clock)
      .with_view(view)
      .with_selection_purge(
        cfg.purge_selection()?
      );

  cli.apply(&mut board)?;

  let renderer =
    render::Renderer::new(&cfg)?;
  let snapshot = board.snapshot();
  if cli.facets {
    renderer
      .print_facets(&snapshot.summary)?;
  } else {
    renderer.print_snapshot(&snapshot)?;
  }

  info!("done");
  Ok(())
}
