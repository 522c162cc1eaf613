//! The todo page as a state machine: task list, new-task form, loading flag.
//!
//! Every mutation patches local state from the server's answer; nothing is
//! re-fetched after the initial `load`.

use chrono::{Local, NaiveDate};

use super::{api::TodoApi, image_view::ImageView};
use crate::{create_todo_request::CreateTodoRequest, todo::Todo};

const DATE_LABEL_FORMAT: &str = "%-m/%-d/%Y";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTodoForm {
    pub title: String,
    pub due_date: NaiveDate,
}

impl NewTodoForm {
    pub fn new(today: NaiveDate) -> Self {
        Self {
            title: String::new(),
            due_date: today,
        }
    }

    pub fn is_blank(&self) -> bool {
        self.title.trim().is_empty()
    }

    fn to_request(&self) -> CreateTodoRequest {
        CreateTodoRequest::new(self.title.clone(), self.due_date)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum SubmitOutcome {
    /// Blank title, nothing sent.
    Rejected,
    Created(Todo),
    Failed,
}

/// One rendered list row.
#[derive(Debug, Clone)]
pub struct TodoRow {
    pub id: u64,
    pub title: String,
    pub due_date_label: String,
    pub overdue: bool,
    pub image: ImageView,
}

/// Due strictly before today, by full calendar date.
pub fn is_overdue(due_date: NaiveDate, today: NaiveDate) -> bool {
    due_date < today
}

pub struct TodoBoard<A: TodoApi> {
    api: A,
    todos: Vec<Todo>,
    form: NewTodoForm,
    today: NaiveDate,
    loading: bool,
}

impl<A: TodoApi> TodoBoard<A> {
    pub fn new(api: A) -> Self {
        Self::with_today(api, Local::now().date_naive())
    }

    pub fn with_today(api: A, today: NaiveDate) -> Self {
        Self {
            api,
            todos: Vec::new(),
            form: NewTodoForm::new(today),
            today,
            loading: false,
        }
    }

    pub fn todos(&self) -> &[Todo] {
        &self.todos
    }

    pub fn form(&self) -> &NewTodoForm {
        &self.form
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.form.title = title.into();
    }

    pub fn set_due_date(&mut self, due_date: NaiveDate) {
        self.form.due_date = due_date;
    }

    /// Replace local state with the server's list. Returns whether it worked;
    /// on failure the current list is kept.
    pub async fn load(&mut self) -> bool {
        self.loading = true;
        let result = self.api.list().await;
        self.loading = false;

        match result {
            Ok(todos) => {
                self.todos = todos;
                true
            }
            Err(e) => {
                tracing::warn!(error = %e, "failed to fetch todos");
                false
            }
        }
    }

    pub async fn submit(&mut self) -> SubmitOutcome {
        if self.form.is_blank() {
            return SubmitOutcome::Rejected;
        }

        self.loading = true;
        let result = self.api.create(&self.form.to_request()).await;
        self.loading = false;

        match result {
            Ok(todo) => {
                self.form = NewTodoForm::new(self.today);
                self.todos.push(todo.clone());
                SubmitOutcome::Created(todo)
            }
            Err(e) => {
                tracing::warn!(error = %e, "failed to add todo");
                SubmitOutcome::Failed
            }
        }
    }

    /// Returns whether the server deleted it and the row was dropped.
    pub async fn delete(&mut self, id: u64) -> bool {
        self.loading = true;
        let result = self.api.delete(id).await;
        self.loading = false;

        match result {
            Ok(()) => {
                self.todos = self.todos.iter().filter(|t| t.id != id).cloned().collect();
                true
            }
            Err(e) => {
                tracing::warn!(error = %e, id, "failed to delete todo");
                false
            }
        }
    }

    pub fn rows(&self) -> Vec<TodoRow> {
        self.todos
            .iter()
            .map(|todo| TodoRow {
                id: todo.id,
                title: todo.title.clone(),
                due_date_label: todo.due_date.format(DATE_LABEL_FORMAT).to_string(),
                overdue: is_overdue(todo.due_date, self.today),
                image: ImageView::new(todo.image_url.as_deref(), todo.title.clone()),
            })
            .collect()
    }
}
