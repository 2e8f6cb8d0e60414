use crate::db::DbPool;
use crate::error::CoreError;
use crate::models::{
    MoodEntry, NewMoodEntry, NewNote, NewPatternData, NewTodo, Note, PatternWithTemplate,
    RecurrencePattern, Todo, UpdatePatternData, UpdateTodoData,
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

pub mod memory;
pub mod moods;
pub mod notes;
pub mod patterns;
pub mod todos;

pub use memory::MemoryRepository;

/// Read/insert/update/delete access to the `todos` table.
#[async_trait]
pub trait TodoRepository: Send + Sync {
    /// All todos of one owner, ordered by date then creation time.
    async fn find_todos_for_owner(&self, owner: &str) -> Result<Vec<Todo>, CoreError>;
    async fn find_todo_by_id(&self, id: Uuid) -> Result<Option<Todo>, CoreError>;
    async fn insert_todo(&self, data: NewTodo) -> Result<Todo, CoreError>;
    async fn update_todo(&self, id: Uuid, data: UpdateTodoData) -> Result<Todo, CoreError>;
    async fn delete_todo(&self, id: Uuid) -> Result<(), CoreError>;
}

/// Read/insert/update/delete access to the `recurring_patterns` table.
#[async_trait]
pub trait PatternRepository: Send + Sync {
    /// Active patterns joined with their template todo.
    async fn find_active_patterns(&self) -> Result<Vec<PatternWithTemplate>, CoreError>;
    async fn find_pattern_by_parent(
        &self,
        parent_id: Uuid,
    ) -> Result<Option<RecurrencePattern>, CoreError>;
    async fn find_patterns_for_owner(
        &self,
        owner: &str,
    ) -> Result<Vec<PatternWithTemplate>, CoreError>;
    async fn insert_pattern(&self, data: NewPatternData) -> Result<RecurrencePattern, CoreError>;
    async fn update_pattern(
        &self,
        id: Uuid,
        data: UpdatePatternData,
    ) -> Result<RecurrencePattern, CoreError>;
    async fn delete_pattern(&self, id: Uuid) -> Result<(), CoreError>;
}

/// Quick notes, kept apart from the day lists.
#[async_trait]
pub trait NoteRepository: Send + Sync {
    /// All notes of one owner, newest first.
    async fn find_notes_for_owner(&self, owner: &str) -> Result<Vec<Note>, CoreError>;
    async fn insert_note(&self, data: NewNote) -> Result<Note, CoreError>;
    async fn update_note(&self, id: i64, note_text: &str) -> Result<Note, CoreError>;
    async fn delete_note(&self, id: i64) -> Result<(), CoreError>;
}

#[async_trait]
pub trait MoodRepository: Send + Sync {
    async fn insert_mood(&self, data: NewMoodEntry) -> Result<MoodEntry, CoreError>;
    /// Entries of one owner logged at or after `since`, oldest first.
    async fn find_moods_since(
        &self,
        owner: &str,
        since: DateTime<Utc>,
    ) -> Result<Vec<MoodEntry>, CoreError>;
}

/// The store interface handed to the expander, the todo list and the server
pub trait Repository: TodoRepository + PatternRepository {}

/// SQLite implementation of the repository pattern
#[derive(Clone)]
pub struct SqliteRepository {
    pool: DbPool,
}

impl SqliteRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// Get a reference to the database pool for internal use across modules
    pub(crate) fn pool(&self) -> &DbPool {
        &self.pool
    }
}

impl Repository for SqliteRepository {}
