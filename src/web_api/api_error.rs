use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::{data_access::data_context::DataContextError, error_response::ErrorResponse};

/// Every failure a todo handler can answer with. The message is what the
/// client sees; persistence causes are logged, not returned.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{context}")]
    Persistence {
        context: &'static str,
        #[source]
        source: DataContextError,
    },
}

impl ApiError {
    pub fn persistence(context: &'static str) -> impl FnOnce(DataContextError) -> ApiError {
        move |source| ApiError::Persistence { context, source }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Persistence { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if let ApiError::Persistence { context, source } = &self {
            tracing::error!(error = %source, "{context}");
        }
        let body = ErrorResponse { error: self.to_string() };
        (self.status(), Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn body_of(error: ApiError) -> (StatusCode, String) {
        let response = error.into_response();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, String::from_utf8(bytes.to_vec()).unwrap())
    }

    #[tokio::test]
    async fn persistence_failures_are_500_without_the_cause() {
        let error = ApiError::persistence("Error creating todo")(DataContextError::Redb("disk gone".into()));

        let (status, body) = body_of(error).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body, r#"{"error":"Error creating todo"}"#);
        assert!(!body.contains("disk gone"));
    }

    #[tokio::test]
    async fn client_errors_carry_their_message() {
        let (status, body) = body_of(ApiError::Validation("title and dueDate are required".into())).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, r#"{"error":"title and dueDate are required"}"#);

        let (status, body) = body_of(ApiError::NotFound("Todo not found".into())).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body, r#"{"error":"Todo not found"}"#);
    }
}
