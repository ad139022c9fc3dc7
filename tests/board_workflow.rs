//! Workflow tests for the task and review boards
//!
//! These drive the boards through the same sequences a task list goes through
//! in daily use and check the batch handed back for saving.

use serde_json::{json, Value};
use tempfile::TempDir;

use task_memory::domain::{BoardError, ListFilter, NewTask, TaskEdit};
use task_memory::{Config, OrderKey, Task, TaskBoard, TaskId, TaskStatus};

fn key(s: &str) -> OrderKey {
    s.parse().unwrap()
}

fn id(n: u64) -> TaskId {
    TaskId::new(n)
}

/// Order keys of the whole batch, in storage order
fn orders(board: &TaskBoard) -> Vec<Option<String>> {
    board
        .tasks()
        .iter()
        .map(|t| t.order.as_ref().map(ToString::to_string))
        .collect()
}

fn listed_ids(tasks: Vec<&Task>) -> Vec<String> {
    tasks.into_iter().map(|t| t.id.to_string()).collect()
}

/// Creates one `todo` task per key, in order
fn board_with(keys: &[Option<&str>]) -> TaskBoard {
    let mut board = TaskBoard::default();
    for (i, k) in keys.iter().enumerate() {
        let mut new = NewTask::new(format!("Task {}", i + 1));
        if let Some(k) = k {
            new = new.with_order(key(k));
        }
        board.create(new).unwrap();
    }
    board
}

#[test]
fn sparse_keys_are_compacted_on_create() {
    let board = board_with(&[Some("1"), Some("5"), Some("10")]);
    assert_eq!(
        orders(&board),
        [Some("1".into()), Some("2".into()), Some("3".into())]
    );
}

#[test]
fn fractional_key_lands_between_siblings() {
    let mut board = board_with(&[Some("1"), Some("2")]);
    board
        .create(NewTask::new("Inserted").with_order(key("1.5")))
        .unwrap();

    assert_eq!(
        orders(&board),
        [Some("1".into()), Some("3".into()), Some("2".into())]
    );
    assert_eq!(
        listed_ids(board.list(ListFilter::Ordered)),
        ["TASK-1", "TASK-3", "TASK-2"]
    );
}

#[test]
fn nested_keys_keep_their_parents() {
    let board = board_with(&[Some("1"), Some("1-1"), Some("1-3"), Some("2-2")]);
    assert_eq!(
        orders(&board),
        [
            Some("1".into()),
            Some("1-1".into()),
            Some("1-2".into()),
            Some("2-1".into())
        ]
    );
}

#[test]
fn moving_a_task_to_the_front() {
    let mut board = board_with(&[Some("1"), Some("2"), Some("3")]);
    board
        .update(&[id(3)], &[TaskEdit::order_from_str("0.5").unwrap()])
        .unwrap();

    assert_eq!(
        listed_ids(board.list(ListFilter::Ordered)),
        ["TASK-3", "TASK-1", "TASK-2"]
    );
    assert_eq!(
        orders(&board),
        [Some("2".into()), Some("3".into()), Some("1".into())]
    );
}

#[test]
fn clearing_an_order_with_null() {
    let mut board = board_with(&[Some("1"), Some("2"), Some("3")]);
    board
        .update(&[id(1)], &[TaskEdit::order_from_str("null").unwrap()])
        .unwrap();

    assert_eq!(
        orders(&board),
        [None, Some("1".into()), Some("2".into())]
    );
    assert_eq!(
        listed_ids(board.list(ListFilter::Ordered)),
        ["TASK-2", "TASK-3", "TASK-1"]
    );
}

#[test]
fn finishing_a_parent_keeps_children_grouped() {
    let mut board = board_with(&[Some("1"), Some("1-1"), Some("1-2"), Some("2")]);
    board.finish(&[id(1)]).unwrap();

    assert_eq!(
        orders(&board),
        [
            None,
            Some("1-1".into()),
            Some("1-2".into()),
            Some("2".into())
        ]
    );
}

#[test]
fn switching_between_todo_and_wip_keeps_the_key() {
    let mut board = board_with(&[Some("1"), Some("2")]);
    board
        .update(&[id(2)], &[TaskEdit::Status(TaskStatus::Wip)])
        .unwrap();
    assert_eq!(orders(&board), [Some("1".into()), Some("2".into())]);

    board
        .update(&[id(2)], &[TaskEdit::Status(TaskStatus::Todo)])
        .unwrap();
    assert_eq!(orders(&board), [Some("1".into()), Some("2".into())]);
}

#[test]
fn moving_to_long_term_drops_the_key() {
    let mut board = board_with(&[Some("1"), Some("2"), Some("3")]);
    board
        .update(&[id(2)], &[TaskEdit::Status(TaskStatus::Long)])
        .unwrap();

    assert_eq!(
        orders(&board),
        [Some("1".into()), None, Some("2".into())]
    );
    assert_eq!(
        listed_ids(board.list(ListFilter::Open)),
        ["TASK-1", "TASK-3", "TASK-2"]
    );
}

#[test]
fn order_and_status_in_one_update() {
    let mut board = board_with(&[Some("1")]);
    board
        .create(NewTask::new("Pending").with_status(TaskStatus::Pending))
        .unwrap();

    // The status edit comes first, so the key applies to a `wip` task
    board
        .update(
            &[id(2)],
            &[
                TaskEdit::Status(TaskStatus::Wip),
                TaskEdit::Order(Some(key("0"))),
            ],
        )
        .unwrap();

    assert_eq!(orders(&board), [Some("2".into()), Some("1".into())]);
}

#[test]
fn update_many_tasks_at_once() {
    let mut board = board_with(&[Some("1"), Some("2"), Some("3")]);
    let updated = board
        .update(
            &[id(1), id(3)],
            &[TaskEdit::Status(TaskStatus::Wip), TaskEdit::Priority("high".into())],
        )
        .unwrap();

    assert_eq!(updated, 2);
    for n in [1, 3] {
        let task = board.get(&id(n)).unwrap();
        assert_eq!(task.status, TaskStatus::Wip);
        assert_eq!(task.priority.as_deref(), Some("high"));
    }
    assert_eq!(board.get(&id(2)).unwrap().status, TaskStatus::Todo);
}

#[test]
fn unknown_id_rejects_the_whole_batch() {
    let mut board = board_with(&[Some("1"), Some("2")]);
    let before = board.tasks().to_vec();

    let err = board.close(&[id(1), id(42)], Some("gone")).unwrap_err();
    assert_eq!(err, BoardError::NotFound(id(42)));
    assert_eq!(board.tasks(), before.as_slice());
}

#[test]
fn malformed_order_assignments_are_rejected() {
    assert!(TaskEdit::order_from_str("1--2").is_err());
    assert!(TaskEdit::order_from_str("first").is_err());
    assert!(TaskEdit::order_from_str("-1").is_err());
}

#[test]
fn release_then_close() {
    let mut board = board_with(&[Some("1"), Some("2")]);
    board.release(&[id(1)], "0.3.0").unwrap();
    board.close(&[id(1), id(2)], None).unwrap();

    let released = board.get(&id(1)).unwrap();
    assert_eq!(released.version.as_deref(), Some("0.3.0"));
    assert!(released.order.is_none());

    let unreleased = board.get(&id(2)).unwrap();
    assert!(unreleased.version.is_none());
    assert!(board.list(ListFilter::Ordered).is_empty());
    assert_eq!(board.list(ListFilter::Everything).len(), 2);
}

#[test]
fn configured_defaults_apply_to_new_tasks() {
    let config = Config::from_toml_str(
        r#"
[tasks]
default_status = "pending"
default_version = "next"

[list]
default_filter = "open"
"#,
    )
    .unwrap();
    let mut board = TaskBoard::new(config);

    let task = board.create(NewTask::new("Configured")).unwrap();
    assert_eq!(task.status, TaskStatus::Pending);
    assert_eq!(task.version.as_deref(), Some("next"));

    // `pending` is open but not ordered
    assert_eq!(board.list_default().len(), 1);
    assert!(board.list(ListFilter::Ordered).is_empty());
}

#[test]
fn config_file_drives_board() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.toml");

    let mut config = Config::default();
    config.tasks.default_status = TaskStatus::Wip;
    config.save_to(&path).unwrap();

    let mut board = TaskBoard::new(Config::from_path(&path).unwrap());
    let task = board
        .create(NewTask::new("Started").with_order(key("3")))
        .unwrap();
    assert_eq!(task.status, TaskStatus::Wip);
    assert_eq!(task.order, Some(key("1")));
}

#[test]
fn saved_batch_reloads_in_normal_form() {
    let mut board = board_with(&[Some("2"), Some("2-7"), None]);
    board.finish(&[id(3)]).unwrap();

    let saved = serde_json::to_string(board.tasks()).unwrap();
    let tasks: Vec<Task> = serde_json::from_str(&saved).unwrap();
    let mut reloaded = TaskBoard::from_tasks(tasks, Config::default());

    let before = orders(&reloaded);
    reloaded.renormalize();
    assert_eq!(orders(&reloaded), before);
    assert_eq!(
        before,
        [Some("1".into()), Some("2-1".into()), None]
    );
}

#[test]
fn stored_records_repair_on_load() {
    let stored = json!([
        {
            "id": "TASK-1",
            "status": "todo",
            "summary": "Sparse",
            "order": "4-10",
            "created_at": "2026-01-05T09:00:00Z",
            "updated_at": "2026-01-05T09:00:00Z"
        },
        {
            "id": "TASK-2",
            "status": "done",
            "summary": "Finished but still keyed",
            "order": "1",
            "created_at": "2026-01-05T09:00:00Z",
            "updated_at": "2026-01-06T09:00:00Z"
        },
        {
            "id": "TASK-3",
            "status": "wip",
            "summary": "Blank order",
            "order": "",
            "created_at": "2026-01-05T09:00:00Z",
            "updated_at": "2026-01-05T09:00:00Z"
        },
        {
            "id": "TASK-4",
            "status": "todo",
            "summary": "Null order",
            "order": null,
            "created_at": "2026-01-05T09:00:00Z",
            "updated_at": "2026-01-05T09:00:00Z"
        }
    ]);

    let tasks: Vec<Task> = serde_json::from_value(stored).unwrap();
    let mut board = TaskBoard::from_tasks(tasks, Config::default());
    board.renormalize();

    assert_eq!(
        orders(&board),
        [Some("1-1".into()), None, None, None]
    );

    let saved: Value = serde_json::to_value(board.tasks()).unwrap();
    assert_eq!(saved[0]["order"], "1-1");
    assert_eq!(saved[1]["order"], Value::Null);
}

#[test]
fn stored_record_with_bad_order_fails_to_load() {
    let stored = json!([{
        "id": "TASK-1",
        "status": "todo",
        "summary": "Broken",
        "order": "1-x",
        "created_at": "2026-01-05T09:00:00Z",
        "updated_at": "2026-01-05T09:00:00Z"
    }]);

    assert!(serde_json::from_value::<Vec<Task>>(stored).is_err());
}

#[test]
fn accepted_review_feeds_the_working_order() {
    use task_memory::{ReviewBoard, ReviewId, ReviewStatus};

    let mut tasks = board_with(&[Some("1"), Some("2")]);
    let mut reviews = ReviewBoard::new();
    let review_id = reviews
        .create("Split the importer", "It does three things")
        .unwrap()
        .id;

    reviews
        .return_review(&review_id, None, Some("Agreed, two pieces"))
        .unwrap();
    assert_eq!(
        reviews.get(&review_id).unwrap().status,
        ReviewStatus::Checking
    );

    let created = reviews
        .accept(
            &review_id,
            vec![
                NewTask::new("Reader").with_order(key("1.5")),
                // Reader already sits at 2 when Writer is created
                NewTask::new("Writer").with_order(key("2-1")),
            ],
            &mut tasks,
        )
        .unwrap();

    assert_eq!(created, [id(3), id(4)]);
    assert_eq!(
        listed_ids(tasks.list(ListFilter::Ordered)),
        ["TASK-1", "TASK-3", "TASK-4", "TASK-2"]
    );
    assert_eq!(
        orders(&tasks),
        [
            Some("1".into()),
            Some("3".into()),
            Some("2".into()),
            Some("2-1".into())
        ]
    );

    assert!(reviews.list_active().is_empty());
    assert_eq!(
        reviews.get(&ReviewId::new(1)).unwrap().related_task_ids,
        created
    );
}
