//! Todo document and the request bodies that create or modify it.
//!
//! Inbound bodies (`CreateTodo`, `UpdateTodo`) are deliberately loose: every
//! field is optional so that "not provided" can be told apart from "provided
//! as empty/false". `validate` turns them into the checked forms the store
//! accepts (`NewTodo`, `TodoPatch`).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

use crate::error::ApiError;

/// A persisted todo. `id` and `created_at` are assigned by the store.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Todo {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub completed: bool,
    pub created_at: DateTime<Utc>,
}

impl Todo {
    /// Apply only the fields present in `patch`.
    pub fn apply(&mut self, patch: &TodoPatch) {
        if let Some(title) = &patch.title {
            self.title = title.clone();
        }
        if let Some(description) = &patch.description {
            self.description = description.clone();
        }
        if let Some(completed) = patch.completed {
            self.completed = completed;
        }
    }
}

/// Body of `POST /todos`.
#[derive(Debug, Default, Deserialize)]
pub struct CreateTodo {
    pub title: Option<String>,
    pub description: Option<String>,
}

/// Body of `PUT /todos/{id}`.
///
/// `title` keeps absent (`None`) apart from explicit `null` (`Some(None)`):
/// a null title is rejected like an empty one. For `description` and
/// `completed`, absent and `null` both leave the field unchanged.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateTodo {
    #[serde(default, deserialize_with = "present")]
    pub title: Option<Option<String>>,
    pub description: Option<String>,
    pub completed: Option<bool>,
}

/// Marks a field as present even when its value is `null`.
fn present<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    T::deserialize(deserializer).map(Some)
}

/// A validated create request.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NewTodo {
    pub title: String,
    pub description: String,
}

/// A validated partial update.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TodoPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub completed: Option<bool>,
}

impl CreateTodo {
    pub fn validate(self) -> Result<NewTodo, ApiError> {
        let title = self
            .title
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .ok_or_else(|| ApiError::Validation("Title is required".to_string()))?;

        Ok(NewTodo {
            title: title.to_string(),
            description: self
                .description
                .as_deref()
                .map(str::trim)
                .unwrap_or_default()
                .to_string(),
        })
    }
}

impl UpdateTodo {
    pub fn validate(self) -> Result<TodoPatch, ApiError> {
        let title = match self.title {
            Some(title) => {
                let trimmed = title.as_deref().map(str::trim).unwrap_or_default();
                if trimmed.is_empty() {
                    return Err(ApiError::Validation("Title cannot be empty".to_string()));
                }
                Some(trimmed.to_string())
            }
            None => None,
        };

        Ok(TodoPatch {
            title,
            description: self.description.map(|d| d.trim().to_string()),
            completed: self.completed,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Todo {
        Todo {
            id: Uuid::nil(),
            title: "Test".to_string(),
            description: String::new(),
            completed: false,
            created_at: DateTime::parse_from_rfc3339("2024-01-02T03:04:05Z")
                .unwrap()
                .with_timezone(&Utc),
        }
    }

    #[test]
    fn todo_serializes_with_camel_case_fields() {
        let json = serde_json::to_value(sample()).unwrap();
        assert_eq!(json["id"], "00000000-0000-0000-0000-000000000000");
        assert_eq!(json["title"], "Test");
        assert_eq!(json["description"], "");
        assert_eq!(json["completed"], false);
        assert_eq!(json["createdAt"], "2024-01-02T03:04:05Z");
        assert!(json.get("created_at").is_none());
    }

    #[test]
    fn create_trims_and_defaults_description() {
        let input: CreateTodo = serde_json::from_str(r#"{"title":"  Buy milk  "}"#).unwrap();
        let new = input.validate().unwrap();
        assert_eq!(new.title, "Buy milk");
        assert_eq!(new.description, "");
    }

    #[test]
    fn create_trims_description() {
        let input: CreateTodo =
            serde_json::from_str(r#"{"title":"a","description":"  two percent "}"#).unwrap();
        assert_eq!(input.validate().unwrap().description, "two percent");
    }

    #[test]
    fn create_rejects_missing_title() {
        let input: CreateTodo = serde_json::from_str(r#"{"description":"x"}"#).unwrap();
        let err = input.validate().unwrap_err();
        assert!(matches!(err, ApiError::Validation(ref m) if m == "Title is required"));
    }

    #[test]
    fn create_rejects_blank_title() {
        let input: CreateTodo = serde_json::from_str(r#"{"title":"   "}"#).unwrap();
        assert!(matches!(input.validate(), Err(ApiError::Validation(_))));
    }

    #[test]
    fn create_does_not_coerce_title_type() {
        let result: Result<CreateTodo, _> = serde_json::from_str(r#"{"title":42}"#);
        assert!(result.is_err());
    }

    #[test]
    fn update_all_fields_optional() {
        let input: UpdateTodo = serde_json::from_str(r#"{}"#).unwrap();
        assert_eq!(input.validate().unwrap(), TodoPatch::default());
    }

    #[test]
    fn update_distinguishes_false_and_empty_from_absent() {
        let input: UpdateTodo =
            serde_json::from_str(r#"{"description":"","completed":false}"#).unwrap();
        let patch = input.validate().unwrap();
        assert_eq!(patch.title, None);
        assert_eq!(patch.description.as_deref(), Some(""));
        assert_eq!(patch.completed, Some(false));
    }

    #[test]
    fn update_rejects_blank_title() {
        let input: UpdateTodo = serde_json::from_str(r#"{"title":""}"#).unwrap();
        assert!(matches!(input.validate(), Err(ApiError::Validation(_))));
    }

    #[test]
    fn update_rejects_null_title() {
        let input: UpdateTodo = serde_json::from_str(r#"{"title":null}"#).unwrap();
        assert_eq!(input.title, Some(None));
        assert!(matches!(input.validate(), Err(ApiError::Validation(_))));
    }

    #[test]
    fn update_null_description_and_completed_are_not_provided() {
        let input: UpdateTodo =
            serde_json::from_str(r#"{"description":null,"completed":null}"#).unwrap();
        assert_eq!(input.validate().unwrap(), TodoPatch::default());
    }

    #[test]
    fn update_rejects_string_completed() {
        let result: Result<UpdateTodo, _> = serde_json::from_str(r#"{"completed":"yes"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn apply_only_touches_present_fields() {
        let mut todo = sample();
        todo.description = "keep".to_string();
        todo.apply(&TodoPatch {
            completed: Some(true),
            ..TodoPatch::default()
        });
        assert_eq!(todo.title, "Test");
        assert_eq!(todo.description, "keep");
        assert!(todo.completed);
    }
}
