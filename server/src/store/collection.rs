use std::collections::HashMap;

use chrono::Utc;
use uuid::Uuid;

use crate::model::{NewTodo, Todo, TodoPatch};

/// Keyed todo documents plus their insertion order.
///
/// Insertion sequence breaks ties between records created within the same
/// clock tick, so listing order is stable.
#[derive(Clone, Debug, Default)]
pub(crate) struct Collection {
    next_seq: u64,
    rows: HashMap<Uuid, Row>,
}

#[derive(Clone, Debug)]
struct Row {
    seq: u64,
    todo: Todo,
}

impl Collection {
    /// Rebuild from documents stored in insertion order.
    pub(crate) fn from_documents(documents: Vec<Todo>) -> Self {
        let mut collection = Self::default();
        for todo in documents {
            collection.push(todo);
        }
        collection
    }

    /// Documents in insertion order, for snapshotting.
    pub(crate) fn documents(&self) -> Vec<Todo> {
        let mut rows: Vec<&Row> = self.rows.values().collect();
        rows.sort_by_key(|row| row.seq);
        rows.into_iter().map(|row| row.todo.clone()).collect()
    }

    pub(crate) fn list(&self) -> Vec<Todo> {
        let mut rows: Vec<&Row> = self.rows.values().collect();
        rows.sort_by(|a, b| {
            b.todo
                .created_at
                .cmp(&a.todo.created_at)
                .then(b.seq.cmp(&a.seq))
        });
        rows.into_iter().map(|row| row.todo.clone()).collect()
    }

    pub(crate) fn get(&self, id: &Uuid) -> Option<Todo> {
        self.rows.get(id).map(|row| row.todo.clone())
    }

    pub(crate) fn insert(&mut self, new: NewTodo) -> Todo {
        let todo = Todo {
            id: Uuid::new_v4(),
            title: new.title,
            description: new.description,
            completed: false,
            created_at: Utc::now(),
        };
        self.push(todo.clone());
        todo
    }

    pub(crate) fn update(&mut self, id: &Uuid, patch: &TodoPatch) -> Option<Todo> {
        let row = self.rows.get_mut(id)?;
        row.todo.apply(patch);
        Some(row.todo.clone())
    }

    pub(crate) fn delete(&mut self, id: &Uuid) -> Option<Todo> {
        self.rows.remove(id).map(|row| row.todo)
    }

    pub(crate) fn len(&self) -> usize {
        self.rows.len()
    }

    fn push(&mut self, todo: Todo) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.rows.insert(todo.id, Row { seq, todo });
    }
}
