//! Integration tests for the Searchable and Specification derive macros.

#![allow(dead_code)] // Some fields are intentionally skipped for testing

use sift::{
    EnumFilter, FieldKind, FieldRole, Filter, Number, Records, Scalar, SearchEnum, SearchExt,
    Searchable, SpecValue, Specification, StringFilter, Timestamp, Value,
};

// =============================================================================
// Searchable
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq)]
enum Priority {
    Low,
    Medium,
    High,
}

impl SearchEnum for Priority {
    fn discriminant(&self) -> u32 {
        match self {
            Priority::Low => 0,
            Priority::Medium => 1,
            Priority::High => 2,
        }
    }
}

#[derive(Searchable)]
struct Task {
    #[search(String)]
    name: String,
    #[search(String)]
    assignee: Option<String>,
    #[search(Number)]
    estimate: f64,
    #[search(Timestamp)]
    due: Option<Timestamp>,
    #[search(Enum)]
    priority: Priority,
    #[search(Bool)]
    done: bool,
    #[search(List, rename = "labels")]
    tags: Vec<String>,
    #[search(skip)]
    internal_id: u64,
    notes: String,
}

fn task() -> Task {
    Task {
        name: "Write docs".into(),
        assignee: None,
        estimate: 1.5,
        due: Some(Timestamp::from_ymd(2024, 6, 1)),
        priority: Priority::High,
        done: false,
        tags: vec!["docs".into(), "easy".into()],
        internal_id: 7,
        notes: "n/a".into(),
    }
}

#[test]
fn field_values() {
    let task = task();
    assert_eq!(task.field_value("name"), Value::String("Write docs"));
    assert_eq!(task.field_value("assignee"), Value::None);
    assert_eq!(task.field_value("estimate"), Value::Number(Number::F64(1.5)));
    assert_eq!(
        task.field_value("due"),
        Value::Timestamp(Timestamp::from_ymd(2024, 6, 1))
    );
    assert_eq!(task.field_value("priority"), Value::Enum(2));
    assert_eq!(task.field_value("done"), Value::Bool(false));
    assert_eq!(
        task.field_value("labels"),
        Value::List(vec![Value::String("docs"), Value::String("easy")])
    );
}

#[test]
fn skipped_and_unannotated_fields_are_unknown() {
    let task = task();
    assert_eq!(task.field_value("internal_id"), Value::None);
    assert_eq!(task.field_value("notes"), Value::None);
    assert_eq!(task.field_value("tags"), Value::None);
    assert!(!Task::has_field("internal_id"));
    assert!(!Task::has_field("notes"));
}

#[test]
fn field_kinds() {
    assert_eq!(Task::field_kind("name"), Some(FieldKind::String));
    assert_eq!(Task::field_kind("estimate"), Some(FieldKind::Number));
    assert_eq!(Task::field_kind("due"), Some(FieldKind::Timestamp));
    assert_eq!(Task::field_kind("priority"), Some(FieldKind::Enum));
    assert_eq!(Task::field_kind("done"), Some(FieldKind::Bool));
    assert_eq!(Task::field_kind("labels"), Some(FieldKind::List));
    assert_eq!(Task::field_kind("tags"), None);
    assert_eq!(Task::element_kind("labels"), Some(FieldKind::String));
    assert_eq!(Task::element_kind("name"), None);
}

#[test]
fn field_constants() {
    assert_eq!(Task::NAME, "name");
    assert_eq!(Task::ASSIGNEE, "assignee");
    assert_eq!(Task::LABELS, "labels");
}

#[test]
fn optional_enum_and_list_fields() {
    #[derive(Searchable)]
    struct Ticket {
        #[search(Enum)]
        priority: Option<Priority>,
        #[search(List)]
        watchers: Option<Vec<u32>>,
    }

    let open = Ticket {
        priority: Some(Priority::Medium),
        watchers: Some(vec![7]),
    };
    let blank = Ticket {
        priority: None,
        watchers: None,
    };

    assert_eq!(open.field_value("priority"), Value::Enum(1));
    assert_eq!(blank.field_value("priority"), Value::None);
    assert_eq!(Ticket::field_kind("priority"), Some(FieldKind::Enum));
    assert_eq!(
        open.field_value("watchers"),
        Value::List(vec![Value::Number(Number::U64(7))])
    );
    assert_eq!(blank.field_value("watchers"), Value::None);
    assert_eq!(Ticket::element_kind("watchers"), Some(FieldKind::Number));
    assert_eq!(Ticket::element_kind("priority"), None);
}

#[test]
fn generic_record() {
    #[derive(Searchable)]
    struct Tagged<T: sift::ToValue> {
        #[search(Number)]
        weight: T,
    }

    let item = Tagged { weight: 3u8 };
    assert_eq!(item.field_value("weight"), Value::Number(Number::U64(3)));
}

// =============================================================================
// Specification
// =============================================================================

#[derive(Default, Specification)]
struct TaskSearch {
    name: Option<StringFilter>,
    priority: Option<EnumFilter<Priority>>,
    #[spec(skip)]
    skip: u32,
    #[spec(take)]
    take: Option<u32>,
    done: Option<bool>,
    #[spec(ignore)]
    cursor: Vec<u8>,
    #[spec(rename = "labels")]
    label_filter: Option<sift::ListFilter<String>>,
}

#[test]
fn roles_in_declaration_order() {
    let roles: Vec<(&str, FieldRole)> = TaskSearch::FIELDS
        .iter()
        .map(|d| (d.name, d.role))
        .collect();
    assert_eq!(
        roles,
        vec![
            ("name", FieldRole::Filter),
            ("priority", FieldRole::Filter),
            ("skip", FieldRole::Skip),
            ("take", FieldRole::Take),
            ("done", FieldRole::Plain),
            ("labels", FieldRole::Filter),
        ]
    );
    assert!(TaskSearch::descriptor("cursor").is_none());
    assert_eq!(TaskSearch::LABELS, "labels");
}

#[test]
fn spec_values() {
    let spec = TaskSearch {
        name: Some(StringFilter::new().contains("docs")),
        skip: 3,
        ..Default::default()
    };

    match spec.spec_value("name") {
        SpecValue::Filter(Some(filter)) => assert!(filter.has_active_constraint()),
        other => panic!("unexpected {other:?}"),
    }
    assert!(matches!(spec.spec_value("priority"), SpecValue::Filter(None)));
    match spec.spec_value("skip") {
        SpecValue::Scalar(Some(value)) => {
            assert_eq!(value.scalar(), Some(Scalar::Number(Number::U64(3))))
        }
        other => panic!("unexpected {other:?}"),
    }
    match spec.spec_value("take") {
        SpecValue::Scalar(Some(value)) => assert_eq!(value.scalar(), None),
        other => panic!("unexpected {other:?}"),
    }
    assert!(matches!(spec.spec_value("cursor"), SpecValue::Missing));
}

#[derive(Debug, Clone, Default)]
struct Blank;

impl Filter for Blank {
    fn has_active_constraint(&self) -> bool {
        true
    }

    fn build_predicate(&self, field: &str) -> Option<sift::Predicate> {
        Some(sift::Predicate::null_or_empty(field))
    }

    fn target_kind(&self) -> FieldKind {
        FieldKind::String
    }
}

#[test]
fn custom_filter_marked_with_attribute() {
    #[derive(Specification)]
    struct AssigneeSearch {
        #[spec(filter)]
        assignee: Blank,
    }

    assert_eq!(AssigneeSearch::FIELDS[0].role, FieldRole::Filter);

    let tasks = vec![
        task(),
        Task {
            assignee: Some("sam".into()),
            ..task()
        },
    ];
    let spec = AssigneeSearch { assignee: Blank };
    let found = Records::new(&tasks).search(&spec).into_source().unwrap();
    assert_eq!(found.count(), 1);
    assert_eq!(found.first().and_then(|t| t.assignee.clone()), None);
}

#[test]
fn enum_filter_through_the_pipeline() {
    let tasks = vec![
        Task {
            priority: Priority::Low,
            ..task()
        },
        Task {
            priority: Priority::Medium,
            ..task()
        },
        task(),
    ];
    let spec = TaskSearch {
        priority: Some(EnumFilter::new().not_in([Priority::Low])),
        ..Default::default()
    };

    let found = Records::new(&tasks).search(&spec).into_source().unwrap();
    let priorities: Vec<Priority> = found.iter().map(|t| t.priority).collect();
    assert_eq!(priorities, vec![Priority::Medium, Priority::High]);
}
