use chrono::{TimeZone, Utc};
use todo_core::{Todo, TodoId, TodoValidationError};

#[test]
fn todo_new_sets_defaults_and_trims_text() {
    let before = Utc::now();
    let todo = Todo::new("  Buy milk \n").unwrap();

    assert!(!todo.id.is_blank());
    assert_eq!(todo.text, "Buy milk");
    assert!(!todo.completed);
    assert!(todo.created_at >= before);
}

#[test]
fn with_id_rejects_blank_id() {
    let err = Todo::with_id(TodoId::from("  "), "text", Utc::now()).unwrap_err();
    assert_eq!(err, TodoValidationError::EmptyId);
}

#[test]
fn todo_serialization_uses_expected_wire_fields() {
    let created_at = Utc.with_ymd_and_hms(2024, 5, 1, 10, 30, 0).unwrap();
    let mut todo = Todo::with_id(TodoId::from("todo-1"), "Write report", created_at).unwrap();
    todo.completed = true;

    let json = serde_json::to_value(&todo).unwrap();
    assert_eq!(json["id"], "todo-1");
    assert_eq!(json["text"], "Write report");
    assert_eq!(json["completed"], true);
    assert_eq!(json["createdAt"], "2024-05-01T10:30:00Z");
    assert!(json.get("created_at").is_none());

    let decoded: Todo = serde_json::from_value(json).unwrap();
    assert_eq!(decoded, todo);
}

#[test]
fn deserialize_accepts_records_from_older_clients() {
    let value = serde_json::json!({
        "id": "1714557000000k3j9x0abc",
        "text": "Water plants",
        "completed": false,
        "createdAt": "2024-05-01T09:50:00.000Z"
    });

    let todo: Todo = serde_json::from_value(value).unwrap();
    assert_eq!(todo.id.as_str(), "1714557000000k3j9x0abc");
    assert_eq!(
        todo.created_at,
        Utc.with_ymd_and_hms(2024, 5, 1, 9, 50, 0).unwrap()
    );
}

#[test]
fn deserialize_rejects_blank_text() {
    let value = serde_json::json!({
        "id": "a",
        "text": "   ",
        "completed": false,
        "createdAt": "2024-05-01T09:50:00Z"
    });

    let err = serde_json::from_value::<Todo>(value).unwrap_err();
    assert!(
        err.to_string().contains("todo text cannot be empty"),
        "unexpected error: {err}"
    );
}

#[test]
fn deserialize_rejects_missing_timestamp() {
    let value = serde_json::json!({ "id": "a", "text": "x", "completed": false });
    assert!(serde_json::from_value::<Todo>(value).is_err());
}
