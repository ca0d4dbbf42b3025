use std::io::{self, IsTerminal, Write};

use anyhow::Context;
use chrono::NaiveDate;
use unicode_width::UnicodeWidthStr;

use crate::board::BoardSnapshot;
use crate::config::Config;
use crate::projection::{KanbanColumn, Projection};
use crate::selection::Selection;
use crate::summary::Summary;
use crate::task::Task;

#[derive(Debug, Clone)]
pub struct Renderer {
    color: bool,
}

impl Renderer {
    pub fn new(cfg: &Config) -> anyhow::Result<Self> {
        Self::for_terminal(cfg, io::stdout().is_terminal())
    }

    /// Colour only when the `color` key is on and the output is a terminal.
    pub fn for_terminal(cfg: &Config, is_terminal: bool) -> anyhow::Result<Self> {
        let enabled = cfg.get_bool("color").context("invalid color setting")?;
        Ok(Self {
            color: enabled && is_terminal,
        })
    }

    pub fn plain() -> Self {
        Self { color: false }
    }

    #[tracing::instrument(skip(self, snapshot))]
    pub fn print_snapshot(&self, snapshot: &BoardSnapshot<'_>) -> anyhow::Result<()> {
        let out = io::stdout().lock();
        self.write_snapshot(out, snapshot)
    }

    #[tracing::instrument(skip(self, summary))]
    pub fn print_facets(&self, summary: &Summary) -> anyhow::Result<()> {
        let out = io::stdout().lock();
        self.write_facets(out, summary)
    }

    pub fn write_snapshot<W: Write>(
        &self,
        mut out: W,
        snapshot: &BoardSnapshot<'_>,
    ) -> anyhow::Result<()> {
        if snapshot.summary.active_filters > 0 {
            writeln!(out, "{} filtre aktif", snapshot.summary.active_filters)?;
        }
        if !snapshot.selection.is_empty() {
            writeln!(out, "{} görev seçildi", snapshot.selection.len())?;
        }

        match &snapshot.projection {
            Projection::List(tasks) => {
                self.write_list(&mut out, tasks, snapshot.selection, snapshot.today)?
            }
            Projection::Kanban(columns) => {
                self.write_kanban(&mut out, columns, snapshot.selection, snapshot.today)?
            }
        }

        if snapshot.is_empty() {
            writeln!(out, "Görev bulunamadı")?;
        }
        writeln!(out, "{} görev bulundu", snapshot.visible.len())?;
        Ok(())
    }

    fn write_list<W: Write>(
        &self,
        out: &mut W,
        tasks: &[&Task],
        selection: &Selection,
        today: NaiveDate,
    ) -> anyhow::Result<()> {
        if tasks.is_empty() {
            return Ok(());
        }

        let headers = vec![
            "".to_string(),
            "ID".to_string(),
            "Durum".to_string(),
            "Öncelik".to_string(),
            "Görev".to_string(),
            "Atanan".to_string(),
            "Teslim".to_string(),
            "Proje".to_string(),
            "Süre".to_string(),
        ];

        let mut rows = Vec::with_capacity(tasks.len());
        for task in tasks {
            let mark = if selection.contains(&task.id) { "[x]" } else { "[ ]" };
            let id = self.paint(task.id.as_str(), "33");
            let due = task.due.format("%d.%m.%Y").to_string();
            let due = if task.is_overdue(today) {
                self.paint(&format!("{due} !"), "31")
            } else {
                due
            };
            let assignee = format!("{} {}", task.assignee.initials(), task.assignee.name);

            rows.push(vec![
                mark.to_string(),
                id,
                task.status.label().to_string(),
                task.priority.label().to_string(),
                task.title.clone(),
                assignee,
                due,
                task.project.name.clone(),
                task.effort_label(),
            ]);
        }

        write_table(out, headers, rows)
    }

    fn write_kanban<W: Write>(
        &self,
        out: &mut W,
        columns: &[KanbanColumn<'_>],
        selection: &Selection,
        today: NaiveDate,
    ) -> anyhow::Result<()> {
        for column in columns {
            let header = format!("{} ({})", column.status.label(), column.len());
            writeln!(out, "{}", self.paint(&header, "1"))?;
            for task in &column.tasks {
                let mark = if selection.contains(&task.id) { "[x]" } else { "[ ]" };
                let due = task.due.format("%d.%m.%Y").to_string();
                let due = if task.is_overdue(today) {
                    self.paint(&due, "31")
                } else {
                    due
                };
                writeln!(
                    out,
                    "  {mark} {} {} · {} · {} · {due}",
                    self.paint(task.id.as_str(), "33"),
                    task.title,
                    task.priority.label(),
                    task.assignee.name,
                )?;
            }
            writeln!(out)?;
        }
        Ok(())
    }

    pub fn write_facets<W: Write>(&self, mut out: W, summary: &Summary) -> anyhow::Result<()> {
        let mut rows = Vec::new();
        for (status, count) in &summary.status_counts {
            rows.push(vec![
                "Durum".to_string(),
                status.as_key().to_string(),
                status.label().to_string(),
                count.to_string(),
            ]);
        }
        for (priority, count) in &summary.priority_counts {
            rows.push(vec![
                "Öncelik".to_string(),
                priority.as_key().to_string(),
                priority.label().to_string(),
                count.to_string(),
            ]);
        }
        for name in &summary.assignees {
            rows.push(vec![
                "Atanan".to_string(),
                name.clone(),
                String::new(),
                String::new(),
            ]);
        }

        write_table(
            &mut out,
            vec![
                "Filtre".to_string(),
                "Anahtar".to_string(),
                "Etiket".to_string(),
                "Adet".to_string(),
            ],
            rows,
        )?;
        writeln!(out, "{} / {} görev", summary.visible, summary.total)?;
        Ok(())
    }

    fn paint(&self, text: &str, code: &str) -> String {
        if !self.color {
            return text.to_string();
        }
        format!("\x1b[{code}m{text}\x1b[0m")
    }
}

fn write_table<W: Write>(
    mut writer: W,
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
) -> anyhow::Result<()> {
    let column_count = headers.len();
    let mut widths = vec![0usize; column_count];

    for (idx, header) in headers.iter().enumerate() {
        widths[idx] = widths[idx].max(UnicodeWidthStr::width(header.as_str()));
    }

    for row in &rows {
        for (idx, cell) in row.iter().enumerate() {
            widths[idx] = widths[idx].max(UnicodeWidthStr::width(strip_ansi(cell).as_str()));
        }
    }

    for idx in 0..column_count {
        let padding = widths[idx].saturating_sub(UnicodeWidthStr::width(headers[idx].as_str()));
        write!(writer, "{}{} ", headers[idx], " ".repeat(padding))?;
    }
    writeln!(writer)?;

    for width in &widths {
        write!(writer, "{:-<width$} ", "", width = *width)?;
    }
    writeln!(writer)?;

    for row in rows {
        for idx in 0..column_count {
            let cell = &row[idx];
            let visible_width = UnicodeWidthStr::width(strip_ansi(cell).as_str());
            let padding = widths[idx].saturating_sub(visible_width);
            write!(writer, "{}{} ", cell, " ".repeat(padding))?;
        }
        writeln!(writer)?;
    }

    Ok(())
}

fn strip_ansi(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut escaped = false;

    for ch in s.chars() {
        if escaped {
            if ch == 'm' {
                escaped = false;
            }
            continue;
        }

        if ch == '\x1b' {
            escaped = true;
            continue;
        }

        out.push(ch);
    }

    out
}
