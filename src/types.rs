//! Typed mirrors of the Todoist REST v2 JSON shapes.
//!
//! Tasks and projects are owned entirely by the remote service; this crate
//! only reads them and requests task closure, so every type here is a
//! deserialization target first and carries no behavior beyond display
//! helpers.

use serde::{Deserialize, Serialize};
use serde_repr::{Deserialize_repr, Serialize_repr};

/// A task as returned by `GET /tasks`.
#[derive(Deserialize, Serialize, PartialEq, Eq, Debug, Clone)]
pub struct TodoistItem {
    pub id: String,
    pub project_id: String,
    pub section_id: Option<String>,
    pub content: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub is_completed: bool,
    #[serde(default)]
    pub labels: Vec<String>,
    pub parent_id: Option<String>,
    #[serde(default)]
    pub order: i32,
    #[serde(default)]
    pub priority: Option<TodoistPriority>,
    pub due: Option<TodoistDue>,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub comment_count: i32,
    pub assignee_id: Option<String>,
    pub assigner_id: Option<String>,
    #[serde(default)]
    pub creator_id: String,
}

/// Due-date descriptor attached to a task.
///
/// `date` is always calendar-only; when the task has a clock time the
/// service also sends `datetime` with an explicit offset, and that value
/// wins for display.
#[derive(Deserialize, Serialize, PartialEq, Eq, Debug, Clone, Default)]
pub struct TodoistDue {
    #[serde(default)]
    pub string: String,
    #[serde(default)]
    pub date: String,
    #[serde(default)]
    pub is_recurring: bool,
    pub datetime: Option<String>,
    pub timezone: Option<String>,
}

/// The four fixed priority levels, serialized as the wire integer.
///
/// On the wire 4 is the most urgent; the app-facing names run the other
/// way, so `P4` displays as "p1".
#[derive(Serialize_repr, Deserialize_repr, PartialEq, Eq, Debug, Clone, Copy)]
#[repr(u8)]
pub enum TodoistPriority {
    P1 = 1,
    P2 = 2,
    P3 = 3,
    P4 = 4,
}

impl TodoistPriority {
    /// Label as shown in the Todoist apps ("p1" is the most urgent).
    pub fn label(self) -> &'static str {
        match self {
            TodoistPriority::P4 => "p1",
            TodoistPriority::P3 => "p2",
            TodoistPriority::P2 => "p3",
            TodoistPriority::P1 => "p4",
        }
    }
}

/// A project as returned by `GET /projects`.
#[derive(Deserialize, Serialize, PartialEq, Eq, Debug, Clone)]
pub struct TodoistProject {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub color: i32,
    pub parent_id: Option<String>,
    #[serde(default)]
    pub order: i32,
    #[serde(default)]
    pub comment_count: i32,
    #[serde(default)]
    pub is_shared: bool,
    #[serde(default)]
    pub is_favorite: bool,
    #[serde(default)]
    pub is_inbox_project: bool,
    #[serde(default)]
    pub is_team_inbox: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserializes_a_task_with_a_due_datetime() {
        let task: TodoistItem = serde_json::from_str(
            r#"
            {
                "id": "2995104339",
                "project_id": "2203306141",
                "section_id": "7025",
                "content": "Buy Milk",
                "description": "",
                "is_completed": false,
                "labels": ["Food", "Shopping"],
                "parent_id": null,
                "order": 1,
                "priority": 4,
                "due": {
                    "string": "tomorrow at 12",
                    "date": "2024-03-11",
                    "is_recurring": false,
                    "datetime": "2024-03-11T12:00:00+01:00",
                    "timezone": "Europe/Stockholm"
                },
                "url": "https://todoist.com/showTask?id=2995104339",
                "comment_count": 0,
                "assignee_id": null,
                "assigner_id": null,
                "creator_id": "2671355"
            }
            "#,
        )
        .unwrap();

        assert_eq!(task.content, "Buy Milk");
        assert_eq!(task.priority, Some(TodoistPriority::P4));
        assert_eq!(task.labels, vec!["Food", "Shopping"]);
        let due = task.due.unwrap();
        assert_eq!(due.date, "2024-03-11");
        assert_eq!(due.datetime.as_deref(), Some("2024-03-11T12:00:00+01:00"));
    }

    #[test]
    fn missing_optional_task_fields_default() {
        let task: TodoistItem = serde_json::from_str(
            r#"
            {
                "id": "1",
                "project_id": "2",
                "section_id": null,
                "content": "Water plants",
                "parent_id": null,
                "due": null,
                "assignee_id": null,
                "assigner_id": null
            }
            "#,
        )
        .unwrap();

        assert_eq!(task.priority, None);
        assert!(task.labels.is_empty());
        assert!(!task.is_completed);
        assert_eq!(task.due, None);
    }

    #[test]
    fn deserializes_a_project() {
        let project: TodoistProject = serde_json::from_str(
            r#"
            {
                "id": "220474322",
                "name": "Inbox",
                "color": 47,
                "parent_id": null,
                "order": 0,
                "comment_count": 10,
                "is_shared": false,
                "is_favorite": false,
                "is_inbox_project": true,
                "is_team_inbox": false
            }
            "#,
        )
        .unwrap();

        assert_eq!(project.name, "Inbox");
        assert_eq!(project.color, 47);
        assert!(project.is_inbox_project);
    }

    #[test]
    fn priority_labels_invert_the_wire_order() {
        assert_eq!(TodoistPriority::P4.label(), "p1");
        assert_eq!(TodoistPriority::P1.label(), "p4");
    }
}
