use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Todo {
    pub id: i64,
    pub text: String,
    pub completed: bool,
}

/// Body of `POST /todos`. Any `completed` field in the payload is ignored;
/// new todos always start incomplete.
#[derive(Debug, Deserialize)]
pub struct CreateTodo {
    pub text: String,
}

/// Body of `PATCH /todos/{id}`. Absent (or null) fields keep their stored value.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateTodo {
    pub text: Option<String>,
    pub completed: Option<bool>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TodoCount {
    pub amount: i64,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Message {
    pub message: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn todo_serializes_to_json() {
        let todo = Todo {
            id: 1,
            text: "Test".to_string(),
            completed: false,
        };
        let json = serde_json::to_value(&todo).unwrap();
        assert_eq!(json, serde_json::json!({"id": 1, "text": "Test", "completed": false}));
    }

    #[test]
    fn create_todo_ignores_completed() {
        let input: CreateTodo =
            serde_json::from_str(r#"{"text":"Done","completed":true}"#).unwrap();
        assert_eq!(input.text, "Done");
    }

    #[test]
    fn create_todo_rejects_missing_text() {
        let result: Result<CreateTodo, _> = serde_json::from_str(r#"{"completed":true}"#);
        assert!(result.is_err());
    }

    #[test]
    fn update_todo_all_fields_optional() {
        let input: UpdateTodo = serde_json::from_str(r#"{}"#).unwrap();
        assert!(input.text.is_none());
        assert!(input.completed.is_none());
    }

    #[test]
    fn update_todo_treats_null_as_absent() {
        let input: UpdateTodo =
            serde_json::from_str(r#"{"text":null,"completed":true}"#).unwrap();
        assert!(input.text.is_none());
        assert_eq!(input.completed, Some(true));
    }
}
