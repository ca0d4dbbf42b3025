use std::fs;

use chrono::{Days, NaiveDate};
use tasklens_core::board::TaskBoard;
use tasklens_core::clock::FixedClock;
use tasklens_core::filter::DateBucket;
use tasklens_core::projection::Projection;
use tasklens_core::sort::SortKey;
use tasklens_core::source::{JsonFileSource, SampleSource, TaskSource};
use tasklens_core::task::{Task, TaskId, TaskPriority, TaskStatus};
use tasklens_core::view::{Choice, ViewMode};
use tempfile::tempdir;

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 1, 24).expect("valid date")
}

fn ids(board: &TaskBoard<FixedClock>) -> Vec<String> {
    board.visible().iter().map(|t| t.id.to_string()).collect()
}

#[test]
fn overdue_bucket_ignores_status() {
    let mut future = Task::new("1", "a", today() + Days::new(10));
    future.priority = TaskPriority::Low;
    let mut past = Task::new("2", "b", today() - Days::new(1));
    past.status = TaskStatus::Done;
    past.priority = TaskPriority::Urgent;

    let mut board = TaskBoard::new(vec![future, past], FixedClock(today()));
    board.set_due(Choice::Only(DateBucket::Overdue));

    assert_eq!(ids(&board), vec!["2"]);
}

#[test]
fn priority_descending() {
    let mut tasks = Vec::new();
    for (id, priority) in [
        ("1", TaskPriority::Low),
        ("2", TaskPriority::Urgent),
        ("3", TaskPriority::Medium),
    ] {
        let mut task = Task::new(id, id, today());
        task.priority = priority;
        tasks.push(task);
    }

    let mut board = TaskBoard::new(tasks, FixedClock(today()));
    board.set_sort_key(SortKey::Priority);
    board.toggle_direction();

    let priorities: Vec<TaskPriority> = board.visible().iter().map(|t| t.priority).collect();
    assert_eq!(
        priorities,
        vec![TaskPriority::Urgent, TaskPriority::Medium, TaskPriority::Low]
    );
}

#[test]
fn search_matches_title_prefix_case_insensitively() {
    let tasks = vec![
        Task::new("1", "Logo Tasarımı", today()),
        Task::new("2", "Mobil Test", today()),
    ];
    let mut board = TaskBoard::new(tasks, FixedClock(today()));
    board.set_search("log");

    assert_eq!(ids(&board), vec!["1"]);
}

#[test]
fn select_all_toggles_back_to_empty() {
    let tasks = (1..=3)
        .map(|i| Task::new(i.to_string(), format!("t{i}"), today()))
        .collect();
    let mut board = TaskBoard::new(tasks, FixedClock(today()));

    board.toggle_select_all();
    assert_eq!(board.view().selection.len(), 3);
    assert!(board.snapshot().all_selected);

    board.toggle_select_all();
    assert!(board.view().selection.is_empty());
}

#[test]
fn sample_board_end_to_end() {
    let tasks = SampleSource.load().expect("sample");
    let mut board = TaskBoard::new(tasks, FixedClock(today()));

    board.set_due(Choice::Only(DateBucket::ThisWeek));
    assert_eq!(ids(&board), vec!["2", "3"]);

    board.set_due(Choice::All);
    board.set_assignee(Choice::Only("Zeynep Kaya".to_string()));
    assert_eq!(ids(&board), vec!["3"]);

    board.clear_filters();
    board.set_mode(ViewMode::Kanban);
    let snapshot = board.snapshot();
    assert_eq!(snapshot.summary.active_filters, 0);
    assert_eq!(snapshot.visible.len(), 6);
    match &snapshot.projection {
        Projection::Kanban(columns) => {
            let todo: Vec<&str> = columns[0].tasks.iter().map(|t| t.id.as_str()).collect();
            assert_eq!(columns[0].status, TaskStatus::Todo);
            assert_eq!(todo, vec!["2", "6"]);
        }
        other => panic!("expected kanban projection, got {other:?}"),
    }
    assert_eq!(
        snapshot.summary.assignees.first().map(String::as_str),
        Some("Ayşe Demir")
    );
}

#[test]
fn board_reads_json_file_and_keeps_selection_across_reload() {
    let dir = tempdir().expect("tempdir");
    let path = dir.path().join("tasks.json");
    let tasks = SampleSource.load().expect("sample");
    fs::write(&path, serde_json::to_string_pretty(&tasks).expect("serialize")).expect("write");

    let loaded = JsonFileSource::new(&path).load().expect("load json");
    assert_eq!(loaded, tasks);

    let mut board = TaskBoard::new(loaded, FixedClock(today()));
    board.toggle_selected(&TaskId::from("4"));
    board.replace_tasks(tasks.into_iter().filter(|t| t.id.as_str() != "4").collect());

    let snapshot = board.snapshot();
    assert_eq!(snapshot.visible.len(), 5);
    assert!(snapshot.selection.contains(&TaskId::from("4")));
}

#[test]
fn unknown_status_key_empties_the_view() {
    let tasks = SampleSource.load().expect("sample");
    let mut board = TaskBoard::new(tasks, FixedClock(today()));
    board.set_status(Choice::<TaskStatus>::parse("ARCHIVED"));

    let snapshot = board.snapshot();
    assert!(snapshot.is_empty());
    assert_eq!(snapshot.summary.total, 6);
}
