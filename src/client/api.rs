//! Typed HTTP client for the todo endpoints.

use async_trait::async_trait;
use reqwest::{Client, Response, StatusCode};
use thiserror::Error;

use crate::{
    create_todo_request::CreateTodoRequest, error_response::ErrorResponse,
    web_api::routes::todo_routes::ROUTER_PATH, todo::Todo,
};

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("http: {0}")]
    Http(#[from] reqwest::Error),

    #[error("server answered {status}: {message}")]
    Api { status: StatusCode, message: String },
}

/// The operations the board needs from the server.
#[async_trait]
pub trait TodoApi: Send + Sync {
    async fn list(&self) -> Result<Vec<Todo>, ClientError>;
    async fn create(&self, request: &CreateTodoRequest) -> Result<Todo, ClientError>;
    async fn delete(&self, id: u64) -> Result<(), ClientError>;
}

#[derive(Clone)]
pub struct TodoClient {
    http: Client,
    base_url: String,
}

impl TodoClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(Client::new(), base_url)
    }

    pub fn with_client(http: Client, base_url: impl Into<String>) -> Self {
        Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    fn todos_url(&self) -> String {
        format!("{}{}", self.base_url, ROUTER_PATH)
    }
}

// Non-2xx answers carry `{ "error": ... }`; fall back to the raw body.
async fn check(response: Response) -> Result<Response, ClientError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<ErrorResponse>(&body)
        .map(|e| e.error)
        .unwrap_or(body);
    Err(ClientError::Api { status, message })
}

#[async_trait]
impl TodoApi for TodoClient {
    async fn list(&self) -> Result<Vec<Todo>, ClientError> {
        let response = check(self.http.get(self.todos_url()).send().await?).await?;
        Ok(response.json().await?)
    }

    async fn create(&self, request: &CreateTodoRequest) -> Result<Todo, ClientError> {
        let response = self.http.post(self.todos_url()).json(request).send().await?;
        Ok(check(response).await?.json().await?)
    }

    async fn delete(&self, id: u64) -> Result<(), ClientError> {
        let url = format!("{}/{}", self.todos_url(), id);
        check(self.http.delete(url).send().await?).await?;
        Ok(())
    }
}
