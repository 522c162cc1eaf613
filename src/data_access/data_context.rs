//! Todo persistence on top of redb.
//!
//! Rows are postcard-encoded `Todo`s keyed by id. Ids come from a counter
//! in the meta table that is bumped in the same write transaction as the
//! insert, so they are unique and never reused.

use chrono::Utc;
use redb::{Database, ReadableTable, TableDefinition};
use std::{path::Path, sync::Arc};
use thiserror::Error;

use crate::todo::{NewTodo, Todo};

const TODOS_TABLE: TableDefinition<u64, &[u8]> = TableDefinition::new("todos");
const META_TABLE: TableDefinition<&str, u64> = TableDefinition::new("meta");
const NEXT_ID_KEY: &str = "next_id";
const FIRST_ID: u64 = 1;

/// Thin handle to the redb file. Cloneable (Arc inside).
#[derive(Clone)]
pub struct DataContext {
    db: Arc<Database>,
}

impl DataContext {
    /// Open (or create) the database at the given path and make sure the
    /// tables exist.
    pub fn new(path: impl AsRef<Path>) -> Result<Self, DataContextError> {
        let db = Database::create(path)?;

        let txn = db.begin_write()?;
        {
            let _ = txn.open_table(TODOS_TABLE)?;
            let _ = txn.open_table(META_TABLE)?;
        }
        txn.commit()?;

        Ok(DataContext { db: Arc::new(db) })
    }

    /// Insert a todo, assigning its id and creation timestamp.
    pub fn create_todo(&self, new_todo: NewTodo) -> Result<Todo, DataContextError> {
        let txn = self.db.begin_write()?;
        let todo;
        {
            let mut meta = txn.open_table(META_TABLE)?;
            let mut todos = txn.open_table(TODOS_TABLE)?;

            let id = meta
                .get(NEXT_ID_KEY)?
                .map(|guard| guard.value())
                .unwrap_or(FIRST_ID);
            meta.insert(NEXT_ID_KEY, id + 1)?;

            todo = new_todo.into_todo(id, Utc::now());
            let bytes = postcard::to_allocvec(&todo)
                .map_err(|e| DataContextError::Encode(e.to_string()))?;
            todos.insert(id, bytes.as_slice())?;
        }
        txn.commit()?;

        tracing::debug!(id = todo.id, "todo inserted");
        Ok(todo)
    }

    pub fn get_todo(&self, id: u64) -> Result<Option<Todo>, DataContextError> {
        let txn = self.db.begin_read()?;
        let todos = txn.open_table(TODOS_TABLE)?;

        match todos.get(id)? {
            Some(data) => Ok(Some(decode(data.value())?)),
            None => Ok(None),
        }
    }

    /// All todos, newest first. Rows created within the same instant fall
    /// back to id order, which follows insertion.
    pub fn list_todos(&self) -> Result<Vec<Todo>, DataContextError> {
        let txn = self.db.begin_read()?;
        let table = txn.open_table(TODOS_TABLE)?;

        let mut todos = Vec::new();
        for entry in table.iter()? {
            let (_, value) = entry?;
            todos.push(decode(value.value())?);
        }

        todos.sort_by(|a: &Todo, b: &Todo| {
            b.created_at.cmp(&a.created_at).then_with(|| b.id.cmp(&a.id))
        });
        Ok(todos)
    }

    /// Returns false when there was nothing to delete.
    pub fn delete_todo(&self, id: u64) -> Result<bool, DataContextError> {
        let txn = self.db.begin_write()?;
        let deleted;
        {
            let mut todos = txn.open_table(TODOS_TABLE)?;
            deleted = todos.remove(id)?.is_some();
        }
        txn.commit()?;
        Ok(deleted)
    }
}

fn decode(bytes: &[u8]) -> Result<Todo, DataContextError> {
    postcard::from_bytes(bytes).map_err(|e| DataContextError::Decode(e.to_string()))
}

// ── Errors ─────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum DataContextError {
    #[error("redb: {0}")]
    Redb(String),
    #[error("decode: {0}")]
    Decode(String),
    #[error("encode: {0}")]
    Encode(String),
}

// redb 2.x has many error types. Blanket them all into DataContextError::Redb.
macro_rules! from_redb {
    ($($t:ty),*) => {
        $(impl From<$t> for DataContextError {
            fn from(e: $t) -> Self { DataContextError::Redb(e.to_string()) }
        })*
    };
}

from_redb!(
    redb::Error,
    redb::DatabaseError,
    redb::TableError,
    redb::TransactionError,
    redb::StorageError,
    redb::CommitError
);

// ── Tests ──────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn temp_context() -> (DataContext, tempfile::TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let ctx = DataContext::new(dir.path().join("todos.redb")).unwrap();
        (ctx, dir)
    }

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, d).unwrap()
    }

    #[test]
    fn empty_store_lists_nothing() {
        let (ctx, _dir) = temp_context();
        assert!(ctx.list_todos().unwrap().is_empty());
        assert_eq!(ctx.get_todo(1).unwrap(), None);
    }

    #[test]
    fn create_assigns_increasing_ids() {
        let (ctx, _dir) = temp_context();

        let first = ctx.create_todo(NewTodo::new("first", day(1))).unwrap();
        let second = ctx
            .create_todo(NewTodo::new("second", day(2)).with_image(Some("cat.png".into())))
            .unwrap();

        assert_eq!(first.id, 1);
        assert_eq!(second.id, 2);
        assert_eq!(second.image_url.as_deref(), Some("cat.png"));
        assert_eq!(ctx.get_todo(2).unwrap(), Some(second));
    }

    #[test]
    fn list_is_newest_first() {
        let (ctx, _dir) = temp_context();
        for (i, title) in ["a", "b", "c"].into_iter().enumerate() {
            ctx.create_todo(NewTodo::new(title, day(i as u32 + 1))).unwrap();
        }

        let titles: Vec<_> = ctx
            .list_todos()
            .unwrap()
            .into_iter()
            .map(|t| t.title)
            .collect();
        assert_eq!(titles, ["c", "b", "a"]);
    }

    #[test]
    fn delete_removes_one_row_and_ids_are_not_reused() {
        let (ctx, _dir) = temp_context();
        let a = ctx.create_todo(NewTodo::new("a", day(1))).unwrap();
        let b = ctx.create_todo(NewTodo::new("b", day(2))).unwrap();

        assert!(ctx.delete_todo(b.id).unwrap());
        assert!(!ctx.delete_todo(b.id).unwrap());
        assert_eq!(ctx.list_todos().unwrap(), vec![a]);

        let c = ctx.create_todo(NewTodo::new("c", day(3))).unwrap();
        assert_eq!(c.id, 3);
    }

    #[test]
    fn data_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("todos.redb");

        let created = {
            let ctx = DataContext::new(&path).unwrap();
            ctx.create_todo(NewTodo::new("persisted", day(9))).unwrap()
        };

        let ctx = DataContext::new(&path).unwrap();
        assert_eq!(ctx.list_todos().unwrap(), vec![created]);
        assert_eq!(ctx.create_todo(NewTodo::new("next", day(9))).unwrap().id, 2);
    }
}
