use askama::Template;
use axum::{
    Form, Router,
    extract::State,
    http::{HeaderMap, HeaderName, HeaderValue, StatusCode},
    response::Html,
    routing::{get, post, put},
};
use serde::Deserialize;
use std::sync::Arc;

use crate::todo::{DescriptionPatch, Todo, TodoService, TodoServiceError};
use crate::web::components::SubmitButton;

#[derive(Debug, Deserialize)]
pub struct CreateTodoForm {
    title: String,
    description: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct EditTodoForm {
    title: String,
    // None when the field was absent from the payload, which is distinct
    // from a present-but-blank value.
    description: Option<String>,
}

/// Returns the trimmed title, or `None` when nothing usable remains.
/// Mutation handlers treat `None` as "perform no write at all".
fn normalized_title(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// Trims a description from the create form; blank collapses to absent.
fn normalized_description(raw: Option<String>) -> Option<String> {
    raw.and_then(|text| {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    })
}

/// Re-fetches the full ordered todo list and renders the list fragment.
/// Every mutation handler finishes here so the page always reflects a fresh
/// read of the table.
#[tracing::instrument(skip(todo_service))]
async fn render_todo_list(todo_service: &TodoService<'_>) -> Result<String, TodoError> {
    let todos = todo_service.get_all_todos().await?;
    let template = TodoListTemplate::new(todos);
    template.render().map_err(TodoError::from)
}

/// Custom error type for todo handler operations.
#[derive(Debug, thiserror::Error)]
enum TodoError {
    /// Represents an error during template rendering.
    #[error("Template rendering failed")]
    Template(#[from] askama::Error),
    /// Represents a todo service error.
    #[error("Todo service error")]
    Service(#[from] TodoServiceError),
}

impl axum::response::IntoResponse for TodoError {
    fn into_response(self) -> axum::response::Response {
        let (status_code, user_facing_error_message) = match self {
            TodoError::Service(TodoServiceError::TodoNotFound(_)) => (
                StatusCode::NOT_FOUND,
                "This to-do no longer exists. Refresh the page to see the current list.",
            ),
            _ => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "An unexpected error occurred while processing your request. Please try again later.",
            ),
        };

        let error_template = ErrorMessageTemplate::new(user_facing_error_message.to_string());
        let Ok(rendered) = error_template.render() else {
            return StatusCode::INTERNAL_SERVER_ERROR.into_response();
        };

        let mut response = (status_code, Html(rendered)).into_response();
        // Add HTMX headers to retarget the error message to the error div
        let mut headers = HeaderMap::new();
        headers.insert(
            HeaderName::from_static("hx-retarget"),
            HeaderValue::from_static("#error-message"),
        );
        headers.insert(
            HeaderName::from_static("hx-reswap"),
            HeaderValue::from_static("innerHTML"),
        );
        response.headers_mut().extend(headers);
        response
    }
}

#[derive(Template)]
#[template(path = "todos.html")]
struct TodosTemplate {}

impl TodosTemplate {
    pub fn new() -> Self {
        Self {}
    }

    fn add_button(&self) -> SubmitButton {
        SubmitButton::new("Add").pending_label("Adding…")
    }
}

#[derive(Template)]
#[template(path = "todos/todo_list.html")]
struct TodoListTemplate {
    todos: Vec<Todo>,
}

impl TodoListTemplate {
    pub fn new(todos: Vec<Todo>) -> Self {
        Self { todos }
    }

    fn toggle_button(&self, todo: &Todo) -> SubmitButton {
        let (label, tooltip) = if todo.completed() {
            ("✓", "Mark as incomplete")
        } else {
            ("", "Mark as complete")
        };
        SubmitButton::new(label)
            .class("toggle")
            .attr("title", tooltip)
            .attr("aria-pressed", todo.completed().to_string())
    }

    fn save_button(&self) -> SubmitButton {
        SubmitButton::new("Save").pending_label("Saving…")
    }

    fn delete_button(&self) -> SubmitButton {
        SubmitButton::new("Delete")
            .class("delete")
            .pending_label("Deleting…")
    }
}

#[derive(Template)]
#[template(path = "todos/error_message.html")]
struct ErrorMessageTemplate {
    message: String,
}

impl ErrorMessageTemplate {
    pub fn new(message: String) -> Self {
        Self { message }
    }
}

#[derive(Clone, Debug)]
pub struct TodoState {
    pub db: Arc<sea_orm::DatabaseConnection>,
}

/// Handler for the to-do page; the list itself is loaded as a fragment.
#[tracing::instrument]
async fn todos_page_handler() -> Result<Html<String>, TodoError> {
    let template = TodosTemplate::new();
    template.render().map(Html).map_err(TodoError::from)
}

/// Handler for GET /todos/list that returns the todo list fragment.
#[tracing::instrument(skip(state))]
async fn todo_list_handler(State(state): State<Arc<TodoState>>) -> Result<Html<String>, TodoError> {
    let todo_service = TodoService::new(&state.db);
    let list_html = render_todo_list(&todo_service).await?;
    Ok(Html(list_html))
}

/// Handler for creating a new todo via POST request.
///
/// A title that is blank after trimming performs no write; the handler just
/// returns the current list, so the form appears to do nothing.
#[tracing::instrument(skip(state))]
async fn create_todo_handler(
    State(state): State<Arc<TodoState>>,
    Form(form): Form<CreateTodoForm>,
) -> Result<Html<String>, TodoError> {
    let todo_service = TodoService::new(&state.db);

    let Some(title) = normalized_title(&form.title) else {
        let list_html = render_todo_list(&todo_service).await?;
        return Ok(Html(list_html));
    };
    let description = normalized_description(form.description);

    todo_service.create_todo(title, description).await?;

    let list_html = render_todo_list(&todo_service).await?;
    Ok(Html(list_html))
}

/// Handler for updating a todo's title and description via PUT request.
///
/// An omitted description field keeps the stored description; a blank one
/// clears it. A vanished id surfaces as an error rather than a no-op.
#[tracing::instrument(skip(state))]
async fn update_todo_handler(
    State(state): State<Arc<TodoState>>,
    axum::extract::Path(id): axum::extract::Path<i32>,
    Form(form): Form<EditTodoForm>,
) -> Result<Html<String>, TodoError> {
    let todo_service = TodoService::new(&state.db);

    let Some(title) = normalized_title(&form.title) else {
        let list_html = render_todo_list(&todo_service).await?;
        return Ok(Html(list_html));
    };
    let description = DescriptionPatch::from_form_field(form.description);

    todo_service.rename_todo_by_id(id, title, description).await?;

    let list_html = render_todo_list(&todo_service).await?;
    Ok(Html(list_html))
}

/// Handler for toggling a todo's completion flag via POST request.
///
/// A vanished id is a silent no-op; the refreshed list is returned either way.
#[tracing::instrument(skip(state))]
async fn toggle_todo_handler(
    State(state): State<Arc<TodoState>>,
    axum::extract::Path(id): axum::extract::Path<i32>,
) -> Result<Html<String>, TodoError> {
    let todo_service = TodoService::new(&state.db);

    todo_service.toggle_todo_by_id(id).await?;

    let list_html = render_todo_list(&todo_service).await?;
    Ok(Html(list_html))
}

/// Handler for deleting a todo via DELETE request.
#[tracing::instrument(skip(state))]
async fn delete_todo_handler(
    State(state): State<Arc<TodoState>>,
    axum::extract::Path(id): axum::extract::Path<i32>,
) -> Result<Html<String>, TodoError> {
    let todo_service = TodoService::new(&state.db);

    todo_service.delete_todo_by_id(id).await?;

    let list_html = render_todo_list(&todo_service).await?;
    Ok(Html(list_html))
}

/// Creates and returns the todo router with all todo-related routes.
pub fn create_todo_router(state: Arc<TodoState>) -> Router {
    Router::new()
        .route("/", get(todos_page_handler))
        .route("/todos", get(todos_page_handler).post(create_todo_handler))
        .route("/todos/list", get(todo_list_handler))
        .route(
            "/todos/{id}",
            put(update_todo_handler).delete(delete_todo_handler),
        )
        .route("/todos/{id}/toggle", post(toggle_todo_handler))
        .with_state(state)
}
