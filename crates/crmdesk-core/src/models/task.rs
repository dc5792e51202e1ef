use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

super::wire_enum! {
    /// Kind of record a task is attached to
    pub enum RelatedType {
        Customer => ("customer", "Customer"),
        Contact => ("contact", "Contact"),
        Deal => ("deal", "Deal"),
    }
}

super::wire_enum! {
    pub enum TaskPriority {
        Low => ("low", "Low"),
        Medium => ("medium", "Medium"),
        High => ("high", "High"),
    }
}

impl Default for TaskPriority {
    fn default() -> Self {
        TaskPriority::Medium
    }
}

super::wire_enum! {
    pub enum TaskStatus {
        Pending => ("pending", "Pending"),
        InProgress => ("in_progress", "In Progress"),
        Completed => ("completed", "Completed"),
    }
}

impl Default for TaskStatus {
    fn default() -> Self {
        TaskStatus::Pending
    }
}

impl TaskStatus {
    /// Statuses counted as pending on the dashboard
    pub fn is_pending(&self) -> bool {
        matches!(self, TaskStatus::Pending | TaskStatus::InProgress)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS))]
#[cfg_attr(feature = "ts", ts(export))]
pub struct Task {
    pub id: i64,
    pub title: String,
    #[serde(default)]
    pub related_type: Option<String>,
    #[serde(default, deserialize_with = "super::lenient_id")]
    pub related_id: Option<i64>,
    #[serde(default)]
    pub related_name: String,
    pub due_date: NaiveDate,
    #[serde(default = "default_priority", deserialize_with = "super::wire_or_default::<_, TaskPriority>")]
    pub priority: String,
    #[serde(default = "default_status", deserialize_with = "super::wire_or_default::<_, TaskStatus>")]
    pub status: String,
    #[serde(default)]
    pub description: Option<String>,
    pub created_at: NaiveDateTime,
}

fn default_priority() -> String {
    TaskPriority::Medium.as_str().to_string()
}

fn default_status() -> String {
    TaskStatus::Pending.as_str().to_string()
}

impl Task {
    pub fn priority_label(&self) -> &str {
        TaskPriority::label_for(&self.priority)
    }

    pub fn status_label(&self) -> &str {
        TaskStatus::label_for(&self.status)
    }

    /// Related record name, or "General" for tasks not attached to anything
    pub fn related_label(&self) -> &str {
        if self.related_name.is_empty() {
            "General"
        } else {
            &self.related_name
        }
    }

    pub fn is_pending(&self) -> bool {
        TaskStatus::parse(&self.status).is_some_and(|s| s.is_pending())
    }
}

/// Payload for `POST tasks`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS))]
#[cfg_attr(feature = "ts", ts(export))]
pub struct NewTask {
    pub title: String,
    pub due_date: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub related_type: Option<RelatedType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub related_id: Option<i64>,
    #[serde(default)]
    pub priority: TaskPriority,
    #[serde(default)]
    pub status: TaskStatus,
    #[serde(default)]
    pub description: String,
}

impl NewTask {
    pub fn new(title: impl Into<String>, due_date: NaiveDate) -> Self {
        Self {
            title: title.into(),
            due_date,
            related_type: None,
            related_id: None,
            priority: TaskPriority::default(),
            status: TaskStatus::default(),
            description: String::new(),
        }
    }

    pub fn related_to(mut self, kind: RelatedType, id: i64) -> Self {
        self.related_type = Some(kind);
        self.related_id = Some(id);
        self
    }
}

/// Payload for `PUT tasks/{id}`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS))]
#[cfg_attr(feature = "ts", ts(export))]
pub struct TaskUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub related_type: Option<RelatedType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub related_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<TaskPriority>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<TaskStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl TaskUpdate {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// A record a task can be attached to, as offered in a picker
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS))]
#[cfg_attr(feature = "ts", ts(export))]
pub struct RelatedOption {
    pub id: i64,
    pub label: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn task_json(related_id: serde_json::Value) -> serde_json::Value {
        json!({
            "id": 9,
            "title": "Call back",
            "related_type": "customer",
            "related_id": related_id,
            "related_name": "",
            "due_date": "2024-04-01",
            "priority": "high",
            "status": "in_progress",
            "description": "",
            "created_at": "2024-03-05T14:22:01.123456"
        })
    }

    #[test]
    fn test_related_id_is_lenient() {
        let parse = |v| serde_json::from_value::<Task>(task_json(v)).unwrap().related_id;
        assert_eq!(parse(json!(7)), Some(7));
        assert_eq!(parse(json!("7")), Some(7));
        assert_eq!(parse(json!("")), None);
        assert_eq!(parse(json!(null)), None);
        assert!(serde_json::from_value::<Task>(task_json(json!("abc"))).is_err());
    }

    #[test]
    fn test_task_labels() {
        let task: Task = serde_json::from_value(task_json(json!(null))).unwrap();
        assert_eq!(task.priority_label(), "High");
        assert_eq!(task.status_label(), "In Progress");
        assert_eq!(task.related_label(), "General");
        assert!(task.is_pending());
    }

    #[test]
    fn test_null_priority_and_status_use_defaults() {
        let mut value = task_json(json!(null));
        value["priority"] = json!(null);
        value["status"] = json!(null);
        let tasks: Vec<Task> = serde_json::from_value(json!([value, task_json(json!(3))])).unwrap();
        assert_eq!(tasks.len(), 2);
        assert_eq!(tasks[0].priority_label(), "Medium");
        assert_eq!(tasks[0].status_label(), "Pending");
        assert!(tasks[0].is_pending());
    }

    #[test]
    fn test_new_task_payload() {
        let due = NaiveDate::from_ymd_opt(2024, 4, 1).unwrap();
        let general = serde_json::to_value(NewTask::new("Plan", due)).unwrap();
        assert_eq!(general["due_date"], "2024-04-01");
        assert!(general.get("related_type").is_none());

        let linked = serde_json::to_value(NewTask::new("Plan", due).related_to(RelatedType::Deal, 3)).unwrap();
        assert_eq!(linked["related_type"], "deal");
        assert_eq!(linked["related_id"], 3);
        assert_eq!(linked["status"], "pending");
        assert_eq!(linked["priority"], "medium");
    }
}
