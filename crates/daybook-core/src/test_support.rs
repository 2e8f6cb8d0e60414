//! Failure injection around [`MemoryRepository`] for unit tests.

use crate::error::CoreError;
use crate::models::{
    NewPatternData, NewTodo, PatternWithTemplate, RecurrencePattern, Todo, UpdatePatternData,
    UpdateTodoData,
};
use crate::repository::{MemoryRepository, PatternRepository, Repository, TodoRepository};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Op {
    FindTodos,
    InsertTodo,
    UpdateTodo,
    DeleteTodo,
    FindActivePatterns,
    FindPattern,
    InsertPattern,
    UpdatePattern,
    DeletePattern,
}

#[derive(Debug, Default, Clone)]
pub struct FlakyRepository {
    inner: MemoryRepository,
    failures: Arc<Mutex<HashMap<Op, usize>>>,
    writes: Arc<AtomicUsize>,
}

impl FlakyRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn inner(&self) -> &MemoryRepository {
        &self.inner
    }

    /// Make the next `times` calls of `op` fail with `CoreError::Store`.
    pub fn fail_next(&self, op: Op, times: usize) {
        self.failures.lock().unwrap().insert(op, times);
    }

    /// Write calls attempted so far, failed ones included.
    pub fn writes(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    fn check(&self, op: Op) -> Result<(), CoreError> {
        if !matches!(op, Op::FindTodos | Op::FindActivePatterns | Op::FindPattern) {
            self.writes.fetch_add(1, Ordering::SeqCst);
        }
        let mut failures = self.failures.lock().unwrap();
        match failures.get_mut(&op) {
            Some(left) if *left > 0 => {
                *left -= 1;
                Err(CoreError::Store(format!("injected {:?} failure", op)))
            }
            _ => Ok(()),
        }
    }
}

#[async_trait]
impl TodoRepository for FlakyRepository {
    async fn find_todos_for_owner(&self, owner: &str) -> Result<Vec<Todo>, CoreError> {
        self.check(Op::FindTodos)?;
        self.inner.find_todos_for_owner(owner).await
    }

    async fn find_todo_by_id(&self, id: Uuid) -> Result<Option<Todo>, CoreError> {
        self.check(Op::FindTodos)?;
        self.inner.find_todo_by_id(id).await
    }

    async fn insert_todo(&self, data: NewTodo) -> Result<Todo, CoreError> {
        self.check(Op::InsertTodo)?;
        self.inner.insert_todo(data).await
    }

    async fn update_todo(&self, id: Uuid, data: UpdateTodoData) -> Result<Todo, CoreError> {
        self.check(Op::UpdateTodo)?;
        self.inner.update_todo(id, data).await
    }

    async fn delete_todo(&self, id: Uuid) -> Result<(), CoreError> {
        self.check(Op::DeleteTodo)?;
        self.inner.delete_todo(id).await
    }
}

#[async_trait]
impl PatternRepository for FlakyRepository {
    async fn find_active_patterns(&self) -> Result<Vec<PatternWithTemplate>, CoreError> {
        self.check(Op::FindActivePatterns)?;
        self.inner.find_active_patterns().await
    }

    async fn find_pattern_by_parent(
        &self,
        parent_id: Uuid,
    ) -> Result<Option<RecurrencePattern>, CoreError> {
        self.check(Op::FindPattern)?;
        self.inner.find_pattern_by_parent(parent_id).await
    }

    async fn find_patterns_for_owner(
        &self,
        owner: &str,
    ) -> Result<Vec<PatternWithTemplate>, CoreError> {
        self.check(Op::FindPattern)?;
        self.inner.find_patterns_for_owner(owner).await
    }

    async fn insert_pattern(&self, data: NewPatternData) -> Result<RecurrencePattern, CoreError> {
        self.check(Op::InsertPattern)?;
        self.inner.insert_pattern(data).await
    }

    async fn update_pattern(
        &self,
        id: Uuid,
        data: UpdatePatternData,
    ) -> Result<RecurrencePattern, CoreError> {
        self.check(Op::UpdatePattern)?;
        self.inner.update_pattern(id, data).await
    }

    async fn delete_pattern(&self, id: Uuid) -> Result<(), CoreError> {
        self.check(Op::DeletePattern)?;
        self.inner.delete_pattern(id).await
    }
}

impl Repository for FlakyRepository {}
