use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::{due_date, todo::NewTodo};

/// Body of `POST /api/todos`. Both fields are optional on the wire so a
/// missing one surfaces as a validation error rather than a decode error.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTodoRequest {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default, with = "due_date::option")]
    pub due_date: Option<NaiveDate>,
}

impl CreateTodoRequest {
    pub fn new(title: impl Into<String>, due_date: NaiveDate) -> Self {
        Self {
            title: Some(title.into()),
            due_date: Some(due_date),
        }
    }

    /// `None` when the title is absent or blank, or the due date is absent.
    /// The title is kept as sent.
    pub fn validate(self) -> Option<NewTodo> {
        let title = self.title.filter(|t| !t.trim().is_empty())?;
        let due_date = self.due_date?;
        Some(NewTodo::new(title, due_date))
    }
}
