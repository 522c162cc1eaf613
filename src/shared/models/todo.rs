use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::due_date;

/// A persisted to-do item.
///
/// `id` and `created_at` are assigned by the data context on insert.
/// `image_url` is the bare file name under the public image directory,
/// written once at creation and never touched again.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Todo {
    pub id: u64,
    pub title: String,
    #[serde(with = "due_date")]
    pub due_date: NaiveDate,
    pub image_url: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// The caller-supplied part of a todo, already validated.
#[derive(Debug, Clone, PartialEq)]
pub struct NewTodo {
    pub title: String,
    pub due_date: NaiveDate,
    pub image_url: Option<String>,
}

impl NewTodo {
    pub fn new(title: impl Into<String>, due_date: NaiveDate) -> Self {
        Self {
            title: title.into(),
            due_date,
            image_url: None,
        }
    }

    pub fn with_image(mut self, image_url: Option<String>) -> Self {
        self.image_url = image_url;
        self
    }

    pub fn into_todo(self, id: u64, created_at: DateTime<Utc>) -> Todo {
        Todo {
            id,
            title: self.title,
            due_date: self.due_date,
            image_url: self.image_url,
            created_at,
        }
    }
}
