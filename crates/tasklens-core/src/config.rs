use std::collections::HashMap;
use std::fs;
use std::path::{
  Path,
  PathBuf
};

use anyhow::{
  Context,
  anyhow
};
use tracing::{
  debug,
  info,
  trace,
  warn
};

use crate::sort::{
  SortDirection,
  SortKey
};
use crate::view::ViewMode;

const RC_ENV_VAR: &str = "TASKLENSRC";
const RC_FILE_NAME: &str =
  ".tasklensrc";

#[derive(Debug, Clone)]
pub struct Config {
  map: HashMap<String, String>,
  pub loaded_files: Vec<PathBuf>
}

impl Default for Config {
  fn default() -> Self {
    let mut map = HashMap::new();
    for (k, v) in [
      ("color", "on"),
      ("default.sort", "dueDate"),
      ("default.direction", "asc"),
      ("default.view", "list"),
      ("selection.purge", "off")
    ] {
      map.insert(
        k.to_string(),
        v.to_string()
      );
    }

    Self {
      map,
      loaded_files: vec![]
    }
  }
}

impl Config {
  #[tracing::instrument(skip(
    rc_override
  ))]
  pub fn load(
    rc_override: Option<&Path>
  ) -> anyhow::Result<Self> {
    let mut cfg = Config::default();

    let rc = resolve_rc_path(
      rc_override
    )?;
    if let Some(path) = rc {
      info!(rc = %path.display(), "loading rc file");
      cfg.load_file(&path, &mut Vec::new())?;
    } else {
      debug!(
        "no rc file found; using \
         defaults"
      );
    }

    Ok(cfg)
  }

  #[tracing::instrument(skip(
    self, overrides
  ))]
  pub fn apply_overrides<I>(
    &mut self,
    overrides: I
  ) where
    I: IntoIterator<
      Item = (String, String)
    >
  {
    for (k, v) in overrides {
      debug!(key = %k, value = %v, "applying override");
      self.map.insert(k, v);
    }
  }

  pub fn get(
    &self,
    key: &str
  ) -> Option<String> {
    self.map.get(key).cloned()
  }

  pub fn get_bool(
    &self,
    key: &str
  ) -> anyhow::Result<bool> {
    let Some(raw) = self.map.get(key)
    else {
      return Ok(false);
    };
    parse_bool(raw).ok_or_else(|| {
      anyhow!(
        "invalid boolean for {key}: \
         {raw}"
      )
    })
  }

  pub fn sort_key(
    &self
  ) -> anyhow::Result<SortKey> {
    self.typed(
      "default.sort",
      SortKey::from_key
    )
    .map(|v| v.unwrap_or_default())
  }

  pub fn sort_direction(
    &self
  ) -> anyhow::Result<SortDirection> {
    self.typed(
      "default.direction",
      SortDirection::from_key
    )
    .map(|v| v.unwrap_or_default())
  }

  pub fn view_mode(
    &self
  ) -> anyhow::Result<ViewMode> {
    self.typed(
      "default.view",
      ViewMode::from_key
    )
    .map(|v| v.unwrap_or_default())
  }

  pub fn purge_selection(
    &self
  ) -> anyhow::Result<bool> {
    self.get_bool("selection.purge")
  }

  pub fn tasks_file(
    &self
  ) -> Option<PathBuf> {
    self
      .get("tasks.file")
      .filter(|v| !v.trim().is_empty())
      .map(|v| expand_tilde(Path::new(v.trim())))
  }

  pub fn timezone(
    &self
  ) -> Option<String> {
    self
      .get("timezone")
      .filter(|v| !v.trim().is_empty())
  }

  fn typed<T>(
    &self,
    key: &str,
    parse: impl FnOnce(&str) -> Option<T>
  ) -> anyhow::Result<Option<T>> {
    let Some(raw) = self.map.get(key)
    else {
      return Ok(None);
    };
    parse(raw).map(Some).ok_or_else(
      || {
        anyhow!(
          "invalid value for {key}: \
           {raw}"
        )
      }
    )
  }

  #[tracing::instrument(skip(
    self, include_stack
  ))]
  fn load_file(
    &mut self,
    path: &Path,
    include_stack: &mut Vec<PathBuf>
  ) -> anyhow::Result<()> {
    let path = expand_tilde(path);
    let canonical =
      fs::canonicalize(&path)
        .unwrap_or_else(|_| path.clone());
    if include_stack.contains(&canonical)
    {
      return Err(anyhow!(
        "include cycle at {}",
        path.display()
      ));
    }

    let text =
      fs::read_to_string(&path)
        .with_context(|| {
          format!(
            "failed to read {}",
            path.display()
          )
        })?;

    self
      .loaded_files
      .push(path.clone());

    let base_dir = path
      .parent()
      .map(|p| p.to_path_buf())
      .unwrap_or_else(|| {
        PathBuf::from(".")
      });

    include_stack.push(canonical);
    for (line_num, raw_line) in
      text.lines().enumerate()
    {
      let mut line = raw_line.trim();
      if line.is_empty()
        || line.starts_with('#')
      {
        continue;
      }

      if let Some((before, _)) =
        line.split_once('#')
      {
        line = before.trim();
      }

      if line.is_empty() {
        continue;
      }

      if let Some(include_rest) =
        line.strip_prefix("include ")
      {
        let include_path =
          resolve_include_path(
            &base_dir,
            include_rest.trim()
          )?;
        debug!(
            file = %path.display(),
            include = %include_path.display(),
            line = line_num + 1,
            "processing include"
        );

        if include_path.exists() {
          self.load_file(
            &include_path,
            include_stack
          )?;
        } else {
          warn!(include = %include_path.display(), "include file does not exist; skipping");
        }
        continue;
      }

      let (k, v) = line
        .split_once('=')
        .ok_or_else(|| {
          anyhow!(
            "invalid config line \
             {}:{}: {}",
            path.display(),
            line_num + 1,
            raw_line
          )
        })?;

      let key = k.trim().to_string();
      let value = v.trim().to_string();
      trace!(key = %key, value = %value, "loaded config key");
      self.map.insert(key, value);
    }
    include_stack.pop();

    Ok(())
  }
}

#[tracing::instrument(skip(
  override_path
))]
fn resolve_rc_path(
  override_path: Option<&Path>
) -> anyhow::Result<Option<PathBuf>> {
  if let Some(path) = override_path {
    return Ok(Some(path.to_path_buf()));
  }

  if let Ok(rc_env) =
    std::env::var(RC_ENV_VAR)
  {
    if rc_env == "/dev/null" {
      return Ok(None);
    }
    return Ok(Some(PathBuf::from(
      rc_env
    )));
  }

  let Some(home) = dirs::home_dir()
  else {
    warn!(
      "cannot determine home \
       directory; skipping rc file"
    );
    return Ok(None);
  };
  let candidate = home.join(RC_FILE_NAME);
  if candidate.exists() {
    return Ok(Some(candidate));
  }

  Ok(None)
}

fn resolve_include_path(
  base_dir: &Path,
  include: &str
) -> anyhow::Result<PathBuf> {
  if include.trim().is_empty() {
    return Err(anyhow!(
      "include path cannot be empty"
    ));
  }

  let raw = PathBuf::from(include);
  let expanded = expand_tilde(&raw);
  if expanded.is_absolute() {
    Ok(expanded)
  } else {
    Ok(base_dir.join(expanded))
  }
}

fn expand_tilde(
  path: &Path
) -> PathBuf {
  let text = path.to_string_lossy();
  if let Some(rest) =
    text.strip_prefix("~/")
    && let Some(home) = dirs::home_dir()
  {
    return home.join(rest);
  }
  path.to_path_buf()
}

fn parse_bool(s: &str) -> Option<bool> {
  match s
    .trim()
    .to_ascii_lowercase()
    .as_str()
  {
    | "1" | "y" | "yes" | "on"
    | "true" => Some(true),
    | "0" | "n" | "no" | "off"
    | "false" => Some(false),
    | _ => None
  }
}

#[cfg(test)]
mod tests {
  use std::fs;

  use tempfile::tempdir;

  use super::Config;
  use crate::sort::{
    SortDirection,
    SortKey
  };
  use crate::view::ViewMode;

  #[test]
  fn defaults_match_dashboard() {
    let cfg = Config::default();
    assert_eq!(
      cfg.sort_key().expect("sort"),
      SortKey::DueDate
    );
    assert_eq!(
      cfg
        .sort_direction()
        .expect("direction"),
      SortDirection::Asc
    );
    assert_eq!(
      cfg.view_mode().expect("view"),
      ViewMode::List
    );
    assert!(
      !cfg
        .purge_selection()
        .expect("purge")
    );
    assert!(cfg.tasks_file().is_none());
  }

  #[test]
  fn rc_file_with_include_and_comments()
  {
    let dir = tempdir().expect("tempdir");
    let extra = dir.path().join("extra.rc");
    fs::write(
      &extra,
      "selection.purge = yes\n"
    )
    .expect("write include");
    let rc = dir.path().join("main.rc");
    fs::write(
      &rc,
      "# board defaults\n\
       default.sort = priority  # \
       urgent first\n\
       default.direction=desc\n\
       include extra.rc\n\
       include missing.rc\n"
    )
    .expect("write rc");

    let cfg = Config::load(Some(&rc))
      .expect("load rc");

    assert_eq!(cfg.loaded_files.len(), 2);
    assert_eq!(
      cfg.sort_key().expect("sort"),
      SortKey::Priority
    );
    assert_eq!(
      cfg
        .sort_direction()
        .expect("direction"),
      SortDirection::Desc
    );
    assert!(
      cfg
        .purge_selection()
        .expect("purge")
    );
  }

  #[test]
  fn overrides_win_and_bad_values_error()
  {
    let mut cfg = Config::default();
    cfg.apply_overrides([
      (
        "default.view".to_string(),
        "kanban".to_string()
      ),
      (
        "default.sort".to_string(),
        "title".to_string()
      )
    ]);
    assert_eq!(
      cfg.view_mode().expect("view"),
      ViewMode::Kanban
    );
    assert!(cfg.sort_key().is_err());
  }

  #[test]
  fn include_cycle_is_an_error() {
    let dir = tempdir().expect("tempdir");
    let rc = dir.path().join("self.rc");
    fs::write(&rc, "include self.rc\n")
      .expect("write rc");
    let err = Config::load(Some(&rc))
      .expect_err("cycle must fail");
    assert!(
      err
        .to_string()
        .contains("include cycle")
    );

    let a = dir.path().join("a.rc");
    let b = dir.path().join("b.rc");
    fs::write(&a, "include b.rc\n")
      .expect("write a");
    fs::write(&b, "include a.rc\n")
      .expect("write b");
    assert!(
      Config::load(Some(&a)).is_err()
    );
  }

  #[test]
  fn same_file_may_be_included_twice()
  {
    let dir = tempdir().expect("tempdir");
    let shared =
      dir.path().join("shared.rc");
    fs::write(
      &shared,
      "default.view = kanban\n"
    )
    .expect("write shared");
    let rc = dir.path().join("main.rc");
    fs::write(
      &rc,
      "include shared.rc\n\
       include shared.rc\n"
    )
    .expect("write rc");

    let cfg = Config::load(Some(&rc))
      .expect("load rc");
    assert_eq!(cfg.loaded_files.len(), 3);
    assert_eq!(
      cfg.view_mode().expect("view"),
      ViewMode::Kanban
    );
  }

  #[test]
  fn malformed_line_is_rejected() {
    let dir = tempdir().expect("tempdir");
    let rc = dir.path().join("bad.rc");
    fs::write(&rc, "just words\n")
      .expect("write rc");
    assert!(
      Config::load(Some(&rc)).is_err()
    );
  }
}
