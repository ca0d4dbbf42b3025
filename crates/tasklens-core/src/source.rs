use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use chrono::NaiveDate;
use tracing::{debug, info};

use crate::task::{Assignee, ProjectRef, Task, TaskId, TaskPriority, TaskStatus, validate_tasks};

/// Supplies the task snapshot a board works on. Sources are read-only.
pub trait TaskSource {
    fn load(&self) -> anyhow::Result<Vec<Task>>;

    fn describe(&self) -> String;
}

/// Reads a JSON array of tasks, or one task per line (JSON Lines).
#[derive(Debug, Clone)]
pub struct JsonFileSource {
    path: PathBuf,
}

impl JsonFileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl TaskSource for JsonFileSource {
    #[tracing::instrument(skip(self), fields(file = %self.path.display()))]
    fn load(&self) -> anyhow::Result<Vec<Task>> {
        let text = fs::read_to_string(&self.path)
            .with_context(|| format!("failed to read {}", self.path.display()))?;

        let tasks = if text.trim_start().starts_with('[') {
            debug!("loading json array");
            serde_json::from_str::<Vec<Task>>(&text)
                .with_context(|| format!("failed parsing {}", self.path.display()))?
        } else {
            parse_jsonl(&self.path, &text)?
        };

        validate_tasks(&tasks)
            .with_context(|| format!("invalid task data in {}", self.path.display()))?;
        info!(count = tasks.len(), "loaded tasks");
        Ok(tasks)
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

fn parse_jsonl(path: &Path, text: &str) -> anyhow::Result<Vec<Task>> {
    debug!("loading jsonl");
    let mut out = Vec::new();
    for (idx, line) in text.lines().enumerate() {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }

        let task: Task = serde_json::from_str(trimmed)
            .with_context(|| format!("failed parsing {} line {}", path.display(), idx + 1))?;
        out.push(task);
    }
    Ok(out)
}

/// The built-in demo collection of the agency dashboard.
#[derive(Debug, Clone, Copy, Default)]
pub struct SampleSource;

impl TaskSource for SampleSource {
    fn load(&self) -> anyhow::Result<Vec<Task>> {
        let tasks = sample_tasks()?;
        validate_tasks(&tasks)?;
        Ok(tasks)
    }

    fn describe(&self) -> String {
        "built-in sample".to_string()
    }
}

#[allow(clippy::too_many_arguments)]
fn sample(
    id: &str,
    title: &str,
    description: &str,
    status: TaskStatus,
    priority: TaskPriority,
    due: &str,
    assignee: &str,
    project: &str,
    hours: (f64, f64),
    created: &str,
    tags: &[&str],
) -> anyhow::Result<Task> {
    let date = |raw: &str| {
        NaiveDate::parse_from_str(raw, "%Y-%m-%d")
            .with_context(|| format!("bad sample date {raw}"))
    };
    Ok(Task {
        id: TaskId::from(id),
        title: title.to_string(),
        description: description.to_string(),
        status,
        priority,
        due: date(due)?,
        assignee: Assignee::named(assignee),
        project: ProjectRef::named(project),
        estimated_hours: hours.0,
        actual_hours: hours.1,
        created: date(created)?,
        tags: tags.iter().map(|t| t.to_string()).collect(),
    })
}

pub fn sample_tasks() -> anyhow::Result<Vec<Task>> {
    Ok(vec![
        sample(
            "1",
            "Logo Tasarımı",
            "Kurumsal logo tasarımı ve varyasyonları",
            TaskStatus::Done,
            TaskPriority::High,
            "2024-01-20",
            "Ayşe Demir",
            "Brand Identity",
            (8.0, 6.0),
            "2024-01-15",
            &["Tasarım", "Logo"],
        )?,
        sample(
            "2",
            "Mobil Uygulama Testleri",
            "iOS ve Android uygulama testleri",
            TaskStatus::Todo,
            TaskPriority::Urgent,
            "2024-01-25",
            "Can Yıldız",
            "Mobile App",
            (10.0, 0.0),
            "2024-01-18",
            &["Test", "Mobil"],
        )?,
        sample(
            "3",
            "Müşteri Sunumu Hazırlama",
            "Q1 raporu için müşteri sunumu",
            TaskStatus::InProgress,
            TaskPriority::High,
            "2024-01-28",
            "Zeynep Kaya",
            "Client Relations",
            (4.0, 2.0),
            "2024-01-20",
            &["Sunum", "Rapor"],
        )?,
        sample(
            "4",
            "Sosyal Medya İçerikleri",
            "Instagram ve Facebook için içerik üretimi",
            TaskStatus::InReview,
            TaskPriority::Medium,
            "2024-02-10",
            "Selin Özkan",
            "Digital Marketing",
            (12.0, 10.0),
            "2024-01-22",
            &["Sosyal Medya", "İçerik"],
        )?,
        sample(
            "5",
            "Ana Sayfa Tasarımı",
            "E-ticaret sitesi ana sayfa tasarımı",
            TaskStatus::InProgress,
            TaskPriority::High,
            "2024-02-15",
            "Mehmet Kaya",
            "E-commerce Website",
            (16.0, 8.0),
            "2024-01-25",
            &["Web Tasarım", "UI/UX"],
        )?,
        sample(
            "6",
            "Veritabanı Optimizasyonu",
            "Performans iyileştirmeleri ve indeksleme",
            TaskStatus::Todo,
            TaskPriority::Low,
            "2024-03-01",
            "Ahmet Yılmaz",
            "Backend Development",
            (6.0, 0.0),
            "2024-01-28",
            &["Backend", "Optimizasyon"],
        )?,
    ])
}
