// Requests
pub mod create_todo_request;

// Responses
pub mod error_response;
