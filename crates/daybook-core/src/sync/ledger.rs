use crate::error::CoreError;
use crate::models::{MutationKind, Todo};
use std::collections::HashMap;
use uuid::Uuid;

/// What a todo looked like before a pending mutation touched it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PriorState {
    /// The todo did not exist yet (optimistic add).
    Absent,
    /// The todo as it was, and where it sat in the list.
    Present { index: usize, todo: Todo },
}

/// A locally applied mutation whose remote write has not settled yet.
#[derive(Debug, Clone)]
pub struct PendingMutation {
    pub kind: MutationKind,
    pub todo_id: Uuid,
    pub prior: PriorState,
}

impl PendingMutation {
    /// Reverse this one entry in `todos`, leaving every other row untouched.
    pub fn revert(&self, todos: &mut Vec<Todo>) {
        let position = todos.iter().position(|t| t.id == self.todo_id);
        match (&self.prior, position) {
            (PriorState::Absent, Some(at)) => {
                todos.remove(at);
            }
            (PriorState::Absent, None) => {}
            (PriorState::Present { todo, .. }, Some(at)) => {
                todos[at] = todo.clone();
            }
            (PriorState::Present { index, todo }, None) => {
                let at = (*index).min(todos.len());
                todos.insert(at, todo.clone());
            }
        }
    }
}

/// Pending mutations keyed by the todo they target.
///
/// At most one mutation per todo is pending; a todo with an entry here is
/// busy and its controls stay disabled until the entry is taken.
#[derive(Debug, Default)]
pub struct MutationLog {
    pending: HashMap<Uuid, PendingMutation>,
}

impl MutationLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, mutation: PendingMutation) -> Result<(), CoreError> {
        if self.pending.contains_key(&mutation.todo_id) {
            return Err(CoreError::Busy(mutation.todo_id));
        }
        self.pending.insert(mutation.todo_id, mutation);
        Ok(())
    }

    pub fn is_busy(&self, todo_id: Uuid) -> bool {
        self.pending.contains_key(&todo_id)
    }

    pub fn take(&mut self, todo_id: Uuid) -> Option<PendingMutation> {
        self.pending.remove(&todo_id)
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}
