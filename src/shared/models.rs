pub mod app_state;
pub mod due_date;
pub mod settings;
pub mod todo;
