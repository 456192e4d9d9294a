use crate::entities::*;
use chrono::{DateTime, Utc};
use sea_orm::*;

pub mod web;

#[derive(Debug, PartialEq, Clone, Eq)]
pub struct Todo {
    id: i32,
    title: String,
    description: Option<String>,
    completed: bool,
    created_at: DateTime<Utc>,
}

impl Todo {
    pub fn new(
        id: i32,
        title: String,
        description: Option<String>,
        completed: bool,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            title,
            description,
            completed,
            created_at,
        }
    }

    /// Returns the ID of the todo.
    pub fn id(&self) -> i32 {
        self.id
    }

    /// Returns the title of the todo.
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Returns the description of the todo, if any.
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Returns the description as displayable text, empty when absent.
    pub fn description_text(&self) -> &str {
        self.description.as_deref().unwrap_or_default()
    }

    /// Returns whether the todo is completed.
    pub fn completed(&self) -> bool {
        self.completed
    }

    /// Returns the creation timestamp of the todo.
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

impl From<todo::Model> for Todo {
    fn from(model: todo::Model) -> Self {
        Todo::new(
            model.id,
            model.title,
            model.description,
            model.completed,
            model.created_at,
        )
    }
}

/// How a rename request treats the stored description.
///
/// A form payload that omits the description field leaves the stored value
/// untouched, while a payload that carries a blank description clears it.
#[derive(Debug, PartialEq, Clone, Eq)]
pub enum DescriptionPatch {
    /// Field absent from the payload: keep the stored description.
    Unchanged,
    /// Field present but blank after trimming: clear the stored description.
    Clear,
    /// Field present with text: store the trimmed text.
    Set(String),
}

impl DescriptionPatch {
    /// Builds a patch from the raw form field value.
    pub fn from_form_field(raw: Option<String>) -> Self {
        match raw {
            None => Self::Unchanged,
            Some(text) => {
                let trimmed = text.trim();
                if trimmed.is_empty() {
                    Self::Clear
                } else {
                    Self::Set(trimmed.to_string())
                }
            }
        }
    }
}

/// Error type for TodoService operations.
#[derive(Debug, thiserror::Error)]
pub enum TodoServiceError {
    /// Represents a database error.
    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),
    /// Represents a todo not found error.
    #[error("Todo with ID {0} not found")]
    TodoNotFound(i32),
}

pub struct TodoService<'a> {
    db: &'a sea_orm::DatabaseConnection,
}

impl TodoService<'_> {
    pub fn new(db: &sea_orm::DatabaseConnection) -> TodoService {
        TodoService { db }
    }

    /// Creates a new todo with the given title and optional description.
    ///
    /// The todo starts out not completed and its creation timestamp is set
    /// here, once; the timestamp is the sole sort key for listing.
    #[tracing::instrument(skip(self))]
    pub async fn create_todo(
        &self,
        title: String,
        description: Option<String>,
    ) -> Result<Todo, TodoServiceError> {
        let active_model = todo::ActiveModel {
            title: ActiveValue::Set(title),
            description: ActiveValue::Set(description),
            completed: ActiveValue::Set(false),
            created_at: ActiveValue::Set(Utc::now()),
            ..Default::default()
        };
        let created_model = active_model.insert(self.db).await?;
        Ok(Todo::from(created_model))
    }

    /// Retrieves a todo by its ID.
    #[tracing::instrument(skip(self))]
    pub async fn get_todo_by_id(&self, id: i32) -> Result<Todo, TodoServiceError> {
        let model = todo::Entity::find_by_id(id)
            .one(self.db)
            .await?
            .ok_or(TodoServiceError::TodoNotFound(id))?;
        Ok(Todo::from(model))
    }

    /// Retrieves all todos, newest first.
    ///
    /// Ordering is strictly by creation timestamp descending; ties carry no
    /// secondary key.
    #[tracing::instrument(skip(self))]
    pub async fn get_all_todos(&self) -> Result<Vec<Todo>, TodoServiceError> {
        let todos = todo::Entity::find()
            .order_by_desc(todo::Column::CreatedAt)
            .all(self.db)
            .await?
            .into_iter()
            .map(Todo::from)
            .collect();
        Ok(todos)
    }

    /// Updates the title and, per the patch, the description of a todo.
    ///
    /// Completion state and creation timestamp are never altered here.
    /// Returns [`TodoServiceError::TodoNotFound`] when the row has vanished.
    #[tracing::instrument(skip(self))]
    pub async fn rename_todo_by_id(
        &self,
        id: i32,
        new_title: String,
        description: DescriptionPatch,
    ) -> Result<Todo, TodoServiceError> {
        let todo_to_update = todo::Entity::find_by_id(id)
            .one(self.db)
            .await?
            .ok_or(TodoServiceError::TodoNotFound(id))?;

        let mut active_model: todo::ActiveModel = todo_to_update.into();
        active_model.title = ActiveValue::Set(new_title);
        match description {
            DescriptionPatch::Unchanged => {}
            DescriptionPatch::Clear => active_model.description = ActiveValue::Set(None),
            DescriptionPatch::Set(text) => active_model.description = ActiveValue::Set(Some(text)),
        }
        let updated_model = active_model.update(self.db).await?;

        Ok(Todo::from(updated_model))
    }

    /// Flips the completion flag of a todo.
    ///
    /// Returns `Ok(None)` when the row has vanished; callers treat that as a
    /// no-op. The read and the write are separate statements with no locking
    /// in between, so two concurrent toggles of the same row can lose one
    /// logical toggle.
    #[tracing::instrument(skip(self))]
    pub async fn toggle_todo_by_id(&self, id: i32) -> Result<Option<Todo>, TodoServiceError> {
        let Some(model) = todo::Entity::find_by_id(id).one(self.db).await? else {
            return Ok(None);
        };

        let completed = model.completed;
        let mut active_model: todo::ActiveModel = model.into();
        active_model.completed = ActiveValue::Set(!completed);
        let updated_model = active_model.update(self.db).await?;

        Ok(Some(Todo::from(updated_model)))
    }

    /// Deletes a todo by its ID. Hard delete, no tombstone.
    ///
    /// Existence is not pre-checked; a delete that touches no rows surfaces
    /// as [`TodoServiceError::TodoNotFound`].
    #[tracing::instrument(skip(self))]
    pub async fn delete_todo_by_id(&self, id: i32) -> Result<(), TodoServiceError> {
        let result = todo::Entity::delete_by_id(id).exec(self.db).await?;
        if result.rows_affected == 0 {
            return Err(TodoServiceError::TodoNotFound(id));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absent_description_field_keeps_stored_value() {
        assert_eq!(
            DescriptionPatch::from_form_field(None),
            DescriptionPatch::Unchanged
        );
    }

    #[test]
    fn blank_description_field_clears_stored_value() {
        assert_eq!(
            DescriptionPatch::from_form_field(Some("   ".to_string())),
            DescriptionPatch::Clear
        );
        assert_eq!(
            DescriptionPatch::from_form_field(Some(String::new())),
            DescriptionPatch::Clear
        );
    }

    #[test]
    fn description_field_with_text_is_trimmed_and_stored() {
        assert_eq!(
            DescriptionPatch::from_form_field(Some("  2 liters  ".to_string())),
            DescriptionPatch::Set("2 liters".to_string())
        );
    }
}
