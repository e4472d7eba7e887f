//! Client-side view state for the todo list.
//!
//! # Design
//! `TodoView` caches the whole collection and never mutates that cache
//! locally: every successful mutation is followed by a full list refetch,
//! and the cache is only replaced by a successful list response. Like
//! `TodoClient` it performs no I/O. User actions hand back an `Outgoing`
//! request tagged with the `Action` it belongs to; the host executes it and
//! feeds the response to `receive`, which may hand back the follow-up
//! refetch. `drive` runs that loop against any `Transport`.
//!
//! Failed calls are logged and recorded in `last_error`; the cache is left
//! as it was.

use std::fmt::Display;

use crate::client::TodoClient;
use crate::error::ApiError;
use crate::http::{HttpRequest, HttpResponse};
use crate::types::{CreateTodo, Todo, UpdateTodo};

/// Which half of the collection is shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Filter {
    #[default]
    Incomplete,
    Complete,
}

impl Filter {
    pub fn matches(self, todo: &Todo) -> bool {
        todo.completed == (self == Filter::Complete)
    }
}

/// The item currently being edited and its unsaved text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Editing {
    pub id: i64,
    pub text: String,
}

/// What an in-flight request was issued for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Load,
    Create,
    Update(i64),
    Delete(i64),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outgoing {
    pub action: Action,
    pub request: HttpRequest,
}

/// One rendered list entry. `editing` holds the draft text while the row is
/// in edit mode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row {
    pub id: i64,
    pub text: String,
    pub completed: bool,
    pub editing: Option<String>,
}

/// Executes requests on behalf of a `TodoView`.
pub trait Transport {
    type Error: Display;

    fn execute(&mut self, request: HttpRequest) -> Result<HttpResponse, Self::Error>;
}

#[derive(Debug, Clone)]
pub struct TodoView {
    client: TodoClient,
    todos: Vec<Todo>,
    filter: Filter,
    draft: String,
    editing: Option<Editing>,
    last_error: Option<String>,
}

impl TodoView {
    pub fn new(client: TodoClient) -> Self {
        Self {
            client,
            todos: Vec::new(),
            filter: Filter::default(),
            draft: String::new(),
            editing: None,
            last_error: None,
        }
    }

    pub fn todos(&self) -> &[Todo] {
        &self.todos
    }

    pub fn filter(&self) -> Filter {
        self.filter
    }

    pub fn set_filter(&mut self, filter: Filter) {
        self.filter = filter;
    }

    pub fn draft(&self) -> &str {
        &self.draft
    }

    pub fn set_draft(&mut self, draft: impl Into<String>) {
        self.draft = draft.into();
    }

    pub fn editing(&self) -> Option<&Editing> {
        self.editing.as_ref()
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// Initial load of the full collection.
    pub fn mount(&self) -> Outgoing {
        self.refresh()
    }

    /// Submit the new-todo input. Blank drafts are kept and nothing is sent;
    /// otherwise the input is cleared straight away, whatever the request's
    /// eventual outcome.
    pub fn submit_draft(&mut self) -> Result<Option<Outgoing>, ApiError> {
        let text = self.draft.trim().to_string();
        if text.is_empty() {
            return Ok(None);
        }
        self.draft.clear();

        let request = self.client.build_create_todo(&CreateTodo { text })?;
        Ok(Some(Outgoing {
            action: Action::Create,
            request,
        }))
    }

    /// Flip `completed` on a cached todo, sending its current text along.
    pub fn toggle(&self, id: i64) -> Result<Option<Outgoing>, ApiError> {
        let Some(todo) = self.find(id) else {
            return Ok(None);
        };
        let patch = UpdateTodo {
            text: Some(todo.text.clone()),
            completed: Some(!todo.completed),
        };
        self.update(id, &patch).map(Some)
    }

    /// Enter edit mode for `id`, seeding the draft with its cached text.
    /// Returns `false` if the todo is not in the cache.
    pub fn begin_edit(&mut self, id: i64) -> bool {
        let Some(text) = self.find(id).map(|todo| todo.text.clone()) else {
            return false;
        };
        self.editing = Some(Editing { id, text });
        true
    }

    pub fn set_edit_text(&mut self, text: impl Into<String>) {
        if let Some(editing) = &mut self.editing {
            editing.text = text.into();
        }
    }

    /// Leave edit mode and send the draft text with the unchanged `completed`.
    pub fn save_edit(&mut self) -> Result<Option<Outgoing>, ApiError> {
        let Some(Editing { id, text }) = self.editing.take() else {
            return Ok(None);
        };
        let Some(completed) = self.find(id).map(|todo| todo.completed) else {
            return Ok(None);
        };
        let patch = UpdateTodo {
            text: Some(text),
            completed: Some(completed),
        };
        self.update(id, &patch).map(Some)
    }

    pub fn cancel_edit(&mut self) {
        self.editing = None;
    }

    pub fn delete(&self, id: i64) -> Outgoing {
        Outgoing {
            action: Action::Delete(id),
            request: self.client.build_delete_todo(id),
        }
    }

    /// Apply the response to a request issued for `action`. A successful
    /// mutation yields the refetch to run next.
    pub fn receive(&mut self, action: Action, response: HttpResponse) -> Option<Outgoing> {
        let outcome = match action {
            Action::Load => match self.client.parse_list_todos(response) {
                Ok(todos) => {
                    self.replace(todos);
                    self.last_error = None;
                    return None;
                }
                Err(e) => Err(e),
            },
            Action::Create => self.client.parse_create_todo(response).map(drop),
            Action::Update(_) => self.client.parse_update_todo(response).map(drop),
            Action::Delete(_) => self.client.parse_delete_todo(response).map(drop),
        };

        match outcome {
            Ok(()) => {
                self.last_error = None;
                Some(self.refresh())
            }
            Err(e) => {
                self.fail(action, e);
                None
            }
        }
    }

    /// Record a request that never produced a response.
    pub fn fail(&mut self, action: Action, error: impl Display) {
        tracing::warn!(?action, %error, "todo request failed");
        self.last_error = Some(error.to_string());
    }

    /// Execute `outgoing` and any follow-ups until the view is settled.
    pub fn drive<T: Transport>(&mut self, transport: &mut T, outgoing: Outgoing) {
        let mut next = Some(outgoing);
        while let Some(Outgoing { action, request }) = next.take() {
            match transport.execute(request) {
                Ok(response) => next = self.receive(action, response),
                Err(e) => self.fail(action, e),
            }
        }
    }

    /// Todos belonging to the active filter, in cache order.
    pub fn visible(&self) -> impl Iterator<Item = &Todo> + '_ {
        let filter = self.filter;
        self.todos.iter().filter(move |todo| filter.matches(todo))
    }

    pub fn rows(&self) -> Vec<Row> {
        self.visible()
            .map(|todo| Row {
                id: todo.id,
                text: todo.text.clone(),
                completed: todo.completed,
                editing: self
                    .editing
                    .as_ref()
                    .filter(|editing| editing.id == todo.id)
                    .map(|editing| editing.text.clone()),
            })
            .collect()
    }

    fn refresh(&self) -> Outgoing {
        Outgoing {
            action: Action::Load,
            request: self.client.build_list_todos(),
        }
    }

    fn update(&self, id: i64, patch: &UpdateTodo) -> Result<Outgoing, ApiError> {
        Ok(Outgoing {
            action: Action::Update(id),
            request: self.client.build_update_todo(id, patch)?,
        })
    }

    fn find(&self, id: i64) -> Option<&Todo> {
        self.todos.iter().find(|todo| todo.id == id)
    }

    fn replace(&mut self, todos: Vec<Todo>) {
        self.todos = todos;
        // Drop edit mode for an item that no longer exists.
        let stale = self
            .editing
            .as_ref()
            .is_some_and(|editing| self.find(editing.id).is_none());
        if stale {
            self.editing = None;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::HttpMethod;

    fn response(status: u16, body: &str) -> HttpResponse {
        HttpResponse {
            status,
            body: body.to_string(),
        }
    }

    fn body(outgoing: &Outgoing) -> serde_json::Value {
        serde_json::from_str(outgoing.request.body.as_deref().unwrap()).unwrap()
    }

    /// A view whose cache holds one open and one finished todo.
    fn loaded() -> TodoView {
        let mut view = TodoView::new(TodoClient::new("http://localhost:3000"));
        let list = r#"[
            {"id":1,"text":"buy milk","completed":false},
            {"id":2,"text":"walk dog","completed":true}
        ]"#;
        assert!(view.receive(Action::Load, response(200, list)).is_none());
        view
    }

    #[test]
    fn mount_requests_the_full_list() {
        let view = TodoView::new(TodoClient::new("http://localhost:3000"));
        let outgoing = view.mount();
        assert_eq!(outgoing.action, Action::Load);
        assert_eq!(outgoing.request.method, HttpMethod::Get);
        assert_eq!(outgoing.request.path, "http://localhost:3000/todos");
    }

    #[test]
    fn filters_partition_the_cache() {
        let mut view = loaded();
        let open: Vec<i64> = view.visible().map(|t| t.id).collect();
        assert_eq!(open, vec![1]);

        view.set_filter(Filter::Complete);
        let done: Vec<i64> = view.visible().map(|t| t.id).collect();
        assert_eq!(done, vec![2]);
    }

    #[test]
    fn blank_draft_is_not_sent() {
        let mut view = loaded();
        view.set_draft("   ");
        assert!(view.submit_draft().unwrap().is_none());
        assert_eq!(view.draft(), "   ");
    }

    #[test]
    fn submit_draft_trims_and_clears_input() {
        let mut view = loaded();
        view.set_draft("  call mom  ");
        let outgoing = view.submit_draft().unwrap().unwrap();
        assert_eq!(outgoing.action, Action::Create);
        assert_eq!(body(&outgoing), serde_json::json!({"text": "call mom"}));
        assert_eq!(view.draft(), "");
    }

    #[test]
    fn toggle_flips_completed_and_keeps_text() {
        let view = loaded();
        let outgoing = view.toggle(2).unwrap().unwrap();
        assert_eq!(outgoing.action, Action::Update(2));
        assert_eq!(outgoing.request.method, HttpMethod::Patch);
        assert_eq!(
            body(&outgoing),
            serde_json::json!({"text": "walk dog", "completed": false})
        );
        assert!(view.toggle(99).unwrap().is_none());
    }

    #[test]
    fn save_edit_sends_draft_and_exits_edit_mode() {
        let mut view = loaded();
        assert!(view.begin_edit(1));
        assert_eq!(view.editing().unwrap().text, "buy milk");

        view.set_edit_text("buy oat milk");
        let outgoing = view.save_edit().unwrap().unwrap();
        assert_eq!(
            body(&outgoing),
            serde_json::json!({"text": "buy oat milk", "completed": false})
        );
        assert!(view.editing().is_none());
    }

    #[test]
    fn cancel_edit_discards_draft() {
        let mut view = loaded();
        assert!(view.begin_edit(1));
        view.set_edit_text("never saved");
        view.cancel_edit();
        assert!(view.editing().is_none());
        assert!(view.save_edit().unwrap().is_none());
        assert_eq!(view.todos()[0].text, "buy milk");
    }

    #[test]
    fn begin_edit_unknown_id_is_refused() {
        let mut view = loaded();
        assert!(!view.begin_edit(42));
        assert!(view.editing().is_none());
    }

    #[test]
    fn rows_mark_the_row_being_edited() {
        let mut view = loaded();
        view.begin_edit(1);
        view.set_edit_text("draft");
        assert_eq!(
            view.rows(),
            vec![Row {
                id: 1,
                text: "buy milk".to_string(),
                completed: false,
                editing: Some("draft".to_string()),
            }]
        );
    }

    #[test]
    fn successful_mutation_requests_refetch() {
        let mut view = loaded();
        let next = view.receive(
            Action::Delete(1),
            response(200, r#"{"message":"Todo deleted successfully"}"#),
        );
        let next = next.unwrap();
        assert_eq!(next.action, Action::Load);
        // The cache is untouched until the refetch lands.
        assert_eq!(view.todos().len(), 2);
    }

    #[test]
    fn failed_mutation_is_recorded_without_refetch() {
        let mut view = loaded();
        let next = view.receive(
            Action::Update(1),
            response(500, r#"{"error":"Internal server error"}"#),
        );
        assert!(next.is_none());
        assert!(view.last_error().unwrap().contains("500"));
        assert_eq!(view.todos().len(), 2);

        // The next good response clears the error.
        view.receive(Action::Load, response(200, "[]"));
        assert!(view.last_error().is_none());
        assert!(view.todos().is_empty());
    }

    #[test]
    fn failed_load_keeps_cache() {
        let mut view = loaded();
        view.receive(Action::Load, response(503, "unavailable"));
        assert_eq!(view.todos().len(), 2);
        assert!(view.last_error().is_some());
    }

    #[test]
    fn refetch_without_edited_item_leaves_edit_mode() {
        let mut view = loaded();
        view.begin_edit(2);
        view.receive(
            Action::Load,
            response(200, r#"[{"id":1,"text":"buy milk","completed":false}]"#),
        );
        assert!(view.editing().is_none());
    }

    struct Scripted(Vec<Result<HttpResponse, String>>);

    impl Transport for Scripted {
        type Error = String;

        fn execute(&mut self, _request: HttpRequest) -> Result<HttpResponse, String> {
            self.0.remove(0)
        }
    }

    #[test]
    fn drive_runs_mutation_then_refetch() {
        let mut view = loaded();
        let mut transport = Scripted(vec![
            Ok(response(201, r#"{"id":3,"text":"new","completed":false}"#)),
            Ok(response(
                200,
                r#"[{"id":1,"text":"buy milk","completed":false},{"id":3,"text":"new","completed":false}]"#,
            )),
        ]);
        view.set_draft("new");
        let outgoing = view.submit_draft().unwrap().unwrap();
        view.drive(&mut transport, outgoing);

        assert!(transport.0.is_empty());
        let ids: Vec<i64> = view.todos().iter().map(|t| t.id).collect();
        assert_eq!(ids, vec![1, 3]);
    }

    #[test]
    fn drive_swallows_transport_errors() {
        let mut view = loaded();
        let mut transport = Scripted(vec![Err("connection refused".to_string())]);
        let outgoing = view.delete(1);
        view.drive(&mut transport, outgoing);

        assert_eq!(view.last_error(), Some("connection refused"));
        assert_eq!(view.todos().len(), 2);
    }
}
