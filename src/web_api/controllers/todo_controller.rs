use axum::{
    extract::{rejection::{JsonRejection, PathRejection}, Path, State},
    http::StatusCode,
    Json,
};

use crate::{
    app_state::SharedState, create_todo_request::CreateTodoRequest, todo::Todo,
    web_api::api_error::ApiError,
};

const REQUIRED_FIELDS: &str = "title and dueDate are required";
const INVALID_BODY: &str = "request body must be JSON with title and dueDate";

pub struct TodoController {}

impl TodoController {
    // GET /api/todos
    pub async fn list(State(state): State<SharedState>) -> Result<Json<Vec<Todo>>, ApiError> {
        state
            .data_context
            .list_todos()
            .map(Json)
            .map_err(ApiError::persistence("Error fetching todos"))
    }

    // POST /api/todos
    pub async fn create(
        State(state): State<SharedState>,
        payload: Result<Json<CreateTodoRequest>, JsonRejection>,
    ) -> Result<(StatusCode, Json<Todo>), ApiError> {
        let Json(request) = payload.map_err(|rejection| {
            tracing::debug!(error = %rejection, "rejected todo body");
            ApiError::Validation(INVALID_BODY.to_string())
        })?;
        let new_todo = request
            .validate()
            .ok_or_else(|| ApiError::Validation(REQUIRED_FIELDS.to_string()))?;

        // Image trouble never blocks the todo itself.
        let image_url = match state.image_source.acquire(&new_todo.title).await {
            Ok(image_url) => image_url,
            Err(e) => {
                tracing::warn!(error = %e, title = %new_todo.title, "image acquisition failed, creating todo without image");
                None
            }
        };

        let todo = state
            .data_context
            .create_todo(new_todo.with_image(image_url))
            .map_err(ApiError::persistence("Error creating todo"))?;

        tracing::info!(id = todo.id, has_image = todo.image_url.is_some(), "todo created");
        Ok((StatusCode::CREATED, Json(todo)))
    }

    // DELETE /api/todos/:id
    pub async fn delete(
        State(state): State<SharedState>,
        id: Result<Path<u64>, PathRejection>,
    ) -> Result<StatusCode, ApiError> {
        let Path(id) = id.map_err(|_| ApiError::Validation("id must be a number".to_string()))?;

        let deleted = state
            .data_context
            .delete_todo(id)
            .map_err(ApiError::persistence("Error deleting todo"))?;

        if !deleted {
            return Err(ApiError::NotFound("Todo not found".to_string()));
        }

        tracing::info!(id, "todo deleted");
        Ok(StatusCode::NO_CONTENT)
    }
}
