use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::{Validate, ValidationError};

pub const DESCRIPTION_MAX_LEN: usize = 5000;

/// Represents a task entity as stored in the database and returned by the API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Task {
    /// Unique identifier for the task (UUID v4).
    pub id: Uuid,
    /// The title of the task, 1 to 500 characters.
    pub title: String,
    /// An optional description, at most 5000 characters.
    pub description: Option<String>,
    /// Whether the task is done. Toggles freely in either direction.
    pub completed: bool,
    /// Timestamp of when the task was created.
    pub created_at: DateTime<Utc>,
    /// Timestamp of the last successful mutation.
    pub updated_at: DateTime<Utc>,
    /// Identifier of the owning user, taken from the verified token.
    pub user_id: String,
}

/// Input for `POST /api/{user_id}/tasks`.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct TaskCreate {
    #[validate(length(min = 1, max = 500))]
    pub title: String,
    #[validate(length(max = 5000))]
    #[serde(default)]
    pub description: Option<String>,
}

/// Input for `PUT /api/{user_id}/tasks/{task_id}`.
///
/// Every mutable field is part of the replacement. A missing `completed` is a
/// validation error, not "unchanged"; a missing `description` clears it.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct TaskReplace {
    #[validate(length(min = 1, max = 500))]
    pub title: String,
    #[validate(length(max = 5000))]
    #[serde(default)]
    pub description: Option<String>,
    #[validate(required)]
    #[serde(default)]
    pub completed: Option<bool>,
}

/// Input for `PATCH /api/{user_id}/tasks/{task_id}`.
///
/// `description` distinguishes omission from an explicit `null`:
/// `None` = leave unchanged, `Some(None)` = clear, `Some(Some(v))` = set.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[validate(schema(function = "validate_patch_description", skip_on_field_errors = false))]
pub struct TaskPatch {
    #[validate(length(min = 1, max = 500))]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(
        default,
        deserialize_with = "present_or_null",
        skip_serializing_if = "Option::is_none"
    )]
    pub description: Option<Option<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed: Option<bool>,
}

/// Wraps any value that is present in the JSON body, including `null`, in `Some`.
/// Absent keys never reach this function and fall back to `Default`.
fn present_or_null<'de, D>(deserializer: D) -> Result<Option<Option<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<String>::deserialize(deserializer).map(Some)
}

fn validate_patch_description(patch: &TaskPatch) -> Result<(), ValidationError> {
    match &patch.description {
        Some(Some(text)) if text.chars().count() > DESCRIPTION_MAX_LEN => {
            let mut error = ValidationError::new("length");
            error.message = Some("description must be at most 5000 characters".into());
            Err(error)
        }
        _ => Ok(()),
    }
}

impl Task {
    /// Creates a new, not yet completed task owned by `user_id`.
    /// `created_at` and `updated_at` start out equal.
    pub fn new(input: TaskCreate, user_id: &str) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            title: input.title,
            description: input.description,
            completed: false,
            created_at: now,
            updated_at: now,
            user_id: user_id.to_string(),
        }
    }

    /// Overwrites every mutable field and refreshes `updated_at`.
    /// The caller must have validated `input`, so `completed` is present.
    pub fn replace(&mut self, input: TaskReplace) {
        self.title = input.title;
        self.description = input.description;
        self.completed = input.completed.unwrap_or(self.completed);
        self.touch();
    }

    /// Applies only the fields present in `patch`.
    ///
    /// Returns whether anything actually changed; `updated_at` is refreshed
    /// only in that case.
    pub fn apply_patch(&mut self, patch: TaskPatch) -> bool {
        let mut changed = false;
        if let Some(title) = patch.title {
            if title != self.title {
                self.title = title;
                changed = true;
            }
        }
        if let Some(description) = patch.description {
            if description != self.description {
                self.description = description;
                changed = true;
            }
        }
        if let Some(completed) = patch.completed {
            if completed != self.completed {
                self.completed = completed;
                changed = true;
            }
        }
        if changed {
            self.touch();
        }
        changed
    }

    /// Moves `updated_at` forward. Postgres keeps microseconds, so the new value
    /// is at least one microsecond past the previous one even on a fast clock.
    fn touch(&mut self) {
        let floor = self.updated_at + Duration::microseconds(1);
        self.updated_at = Utc::now().max(floor);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn sample_task() -> Task {
        Task::new(
            TaskCreate {
                title: "Buy milk".to_string(),
                description: Some("2 litres".to_string()),
            },
            "u1",
        )
    }

    #[test]
    fn test_task_creation() {
        let task = sample_task();
        assert_eq!(task.title, "Buy milk");
        assert_eq!(task.user_id, "u1");
        assert!(!task.completed);
        assert_eq!(task.created_at, task.updated_at);
    }

    #[test]
    fn test_task_create_validation() {
        let valid = TaskCreate {
            title: "a".repeat(500),
            description: Some("b".repeat(5000)),
        };
        assert!(valid.validate().is_ok());

        let empty_title = TaskCreate {
            title: "".to_string(),
            description: None,
        };
        assert!(empty_title.validate().is_err());

        let long_title = TaskCreate {
            title: "a".repeat(501),
            description: None,
        };
        assert!(long_title.validate().is_err());

        let long_description = TaskCreate {
            title: "ok".to_string(),
            description: Some("b".repeat(5001)),
        };
        assert!(long_description.validate().is_err());
    }

    #[test]
    fn test_replace_requires_completed() {
        let input: TaskReplace =
            serde_json::from_value(serde_json::json!({ "title": "New" })).unwrap();
        assert!(input.validate().is_err());

        let input: TaskReplace = serde_json::from_value(serde_json::json!({
            "title": "New",
            "completed": false
        }))
        .unwrap();
        assert!(input.validate().is_ok());
    }

    #[test]
    fn test_replace_overwrites_everything() {
        let mut task = sample_task();
        let before = task.updated_at;
        task.replace(TaskReplace {
            title: "Buy oat milk".to_string(),
            description: None,
            completed: Some(true),
        });
        assert_eq!(task.title, "Buy oat milk");
        assert_eq!(task.description, None);
        assert!(task.completed);
        assert!(task.updated_at > before);
    }

    #[test]
    fn test_patch_distinguishes_null_from_omitted() {
        let omitted: TaskPatch =
            serde_json::from_value(serde_json::json!({ "completed": true })).unwrap();
        assert_eq!(omitted.description, None);

        let cleared: TaskPatch =
            serde_json::from_value(serde_json::json!({ "description": null })).unwrap();
        assert_eq!(cleared.description, Some(None));

        let set: TaskPatch =
            serde_json::from_value(serde_json::json!({ "description": "x" })).unwrap();
        assert_eq!(set.description, Some(Some("x".to_string())));
    }

    #[test]
    fn test_patch_only_touches_supplied_fields() {
        let mut task = sample_task();
        let before = task.clone();

        let changed = task.apply_patch(TaskPatch {
            completed: Some(true),
            ..Default::default()
        });

        assert!(changed);
        assert!(task.completed);
        assert_eq!(task.title, before.title);
        assert_eq!(task.description, before.description);
        assert!(task.updated_at > before.updated_at);
    }

    #[test]
    fn test_empty_patch_keeps_updated_at() {
        let mut task = sample_task();
        let before = task.clone();
        assert!(!task.apply_patch(TaskPatch::default()));
        assert_eq!(task, before);
    }

    #[test]
    fn test_patch_with_same_values_is_not_a_change() {
        let mut task = sample_task();
        let before = task.clone();
        let changed = task.apply_patch(TaskPatch {
            title: Some("Buy milk".to_string()),
            completed: Some(false),
            ..Default::default()
        });
        assert!(!changed);
        assert_eq!(task, before);
    }

    #[test]
    fn test_patch_clears_description() {
        let mut task = sample_task();
        assert!(task.apply_patch(TaskPatch {
            description: Some(None),
            ..Default::default()
        }));
        assert_eq!(task.description, None);
    }

    #[test]
    fn test_patch_validation() {
        let long_description = TaskPatch {
            description: Some(Some("d".repeat(5001))),
            ..Default::default()
        };
        assert!(long_description.validate().is_err());

        let empty_title = TaskPatch {
            title: Some(String::new()),
            ..Default::default()
        };
        assert!(empty_title.validate().is_err());

        assert!(TaskPatch::default().validate().is_ok());
    }
}
