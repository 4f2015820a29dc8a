use kanban_core::{
    CardPayload, ErrorKind, MovePayload, OrderAssignment, Priority, ReorderPayload,
};
use serde_json::json;
use uuid::Uuid;

#[test]
fn card_payload_normalizes_priority_and_due_date_alias() {
    let fields = CardPayload::from_json(json!({
        "title": "  Ship it  ",
        "description": "release notes",
        "priority": " HIGH ",
        "dueDate": "1970-01-02"
    }))
    .unwrap()
    .into_fields()
    .unwrap();

    assert_eq!(fields.title, "Ship it");
    assert_eq!(fields.priority, Priority::High);
    assert_eq!(fields.due_at, Some(86_400_000));
}

#[test]
fn card_payload_defaults() {
    let fields = CardPayload::from_json(json!({ "title": "Plain", "priority": "none" }))
        .unwrap()
        .into_fields()
        .unwrap();

    assert_eq!(fields.priority, Priority::Low);
    assert_eq!(fields.description, "");
    assert_eq!(fields.due_at, None);
}

#[test]
fn card_payload_rejects_bad_input() {
    let cases = [
        json!({ "title": "Valid", "priority": "urgent" }),
        json!({ "title": "Valid", "due_date": "someday" }),
        json!({ "title": "no" }),
        json!({ "description": "missing title" }),
        json!({ "title": 42 }),
        json!("not an object"),
    ];
    for case in cases {
        let err = CardPayload::from_json(case.clone())
            .and_then(CardPayload::into_fields)
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::BadRequest, "{case}");
    }
}

#[test]
fn patch_distinguishes_absent_and_null_due_date() {
    let absent = CardPayload::from_json(json!({ "title": "Renamed" }))
        .unwrap()
        .into_patch()
        .unwrap();
    assert_eq!(absent.due_at, None);
    assert_eq!(absent.title.as_deref(), Some("Renamed"));

    let cleared = CardPayload::from_json(json!({ "dueDate": null }))
        .unwrap()
        .into_patch()
        .unwrap();
    assert_eq!(cleared.due_at, Some(None));

    let set = CardPayload::from_json(json!({ "due_at": "1970-01-01T00:00:01Z" }))
        .unwrap()
        .into_patch()
        .unwrap();
    assert_eq!(set.due_at, Some(Some(1_000)));
}

#[test]
fn reorder_payload_must_be_array() {
    let err = ReorderPayload::from_json(&json!({ "cards": [] })).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::BadRequest);

    let card = Uuid::new_v4();
    let payload = ReorderPayload::from_json(&json!([
        { "cardId": card.to_string(), "order": 0 }
    ]))
    .unwrap();
    assert_eq!(payload.assignments, vec![OrderAssignment::new(card, 0)]);

    let err = ReorderPayload::from_json(&json!([{ "cardId": "nope", "order": 0 }])).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::BadRequest);
}

#[test]
fn move_payload_accepts_aliases() {
    let column = Uuid::new_v4();
    let payload = MovePayload::from_json(json!({
        "columnId": column.to_string(),
        "newPosition": 3
    }))
    .unwrap();
    assert_eq!(payload.column_id, column);
    assert_eq!(payload.position, 3);

    let err = MovePayload::from_json(json!({ "columnId": column.to_string() })).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::BadRequest);
}
