//! In-memory repository for tests, benchmarks and throwaway sessions.
//!
//! Mirrors the SQLite schema rules: one pattern per template, deleting a
//! template removes its pattern and detaches its instances.

use crate::error::CoreError;
use crate::models::{
    MoodEntry, NewMoodEntry, NewNote, NewPatternData, NewTodo, Note, PatternWithTemplate,
    RecurrencePattern, Todo, UpdatePatternData, UpdateTodoData,
};
use crate::repository::{
    MoodRepository, NoteRepository, PatternRepository, Repository, TodoRepository,
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};
use uuid::Uuid;

#[derive(Debug, Default, Clone)]
pub struct MemoryRepository {
    tables: Arc<RwLock<Tables>>,
}

#[derive(Debug, Default)]
struct Tables {
    /// Insertion order breaks ties between equal (date, created_at).
    todos: Vec<Todo>,
    patterns: Vec<RecurrencePattern>,
    notes: Vec<Note>,
    moods: Vec<MoodEntry>,
    /// Last id handed out per table, like SQLite's AUTOINCREMENT.
    last_note_id: i64,
    last_mood_id: i64,
}

impl MemoryRepository {
    /// Creates a new empty repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of every stored todo, in insertion order.
    pub fn all_todos(&self) -> Vec<Todo> {
        self.read().map(|t| t.todos.clone()).unwrap_or_default()
    }

    /// Snapshot of every stored pattern, in insertion order.
    pub fn all_patterns(&self) -> Vec<RecurrencePattern> {
        self.read().map(|t| t.patterns.clone()).unwrap_or_default()
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, Tables>, CoreError> {
        self.tables
            .read()
            .map_err(|_| CoreError::Store("lock poisoned".to_string()))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, Tables>, CoreError> {
        self.tables
            .write()
            .map_err(|_| CoreError::Store("lock poisoned".to_string()))
    }
}

impl Tables {
    fn template_of(&self, pattern: &RecurrencePattern) -> Option<Todo> {
        self.todos.iter().find(|t| t.id == pattern.parent_id).cloned()
    }
}

#[async_trait]
impl TodoRepository for MemoryRepository {
    async fn find_todos_for_owner(&self, owner: &str) -> Result<Vec<Todo>, CoreError> {
        let tables = self.read()?;
        let mut todos: Vec<Todo> = tables
            .todos
            .iter()
            .filter(|t| t.user_id == owner)
            .cloned()
            .collect();
        todos.sort_by(|a, b| a.date.cmp(&b.date).then(a.created_at.cmp(&b.created_at)));
        Ok(todos)
    }

    async fn find_todo_by_id(&self, id: Uuid) -> Result<Option<Todo>, CoreError> {
        Ok(self.read()?.todos.iter().find(|t| t.id == id).cloned())
    }

    async fn insert_todo(&self, data: NewTodo) -> Result<Todo, CoreError> {
        let text = data.text.trim();
        if text.is_empty() {
            return Err(CoreError::InvalidInput("todo text cannot be empty".to_string()));
        }

        let todo = Todo {
            id: Uuid::now_v7(),
            user_id: data.user_id,
            text: text.to_string(),
            date: data.date,
            completed: data.completed,
            scheduled_days: data.scheduled_days,
            parent_todo_id: data.parent_todo_id,
            created_at: Utc::now(),
        };
        self.write()?.todos.push(todo.clone());
        Ok(todo)
    }

    async fn update_todo(&self, id: Uuid, data: UpdateTodoData) -> Result<Todo, CoreError> {
        if let Some(text) = &data.text {
            if text.trim().is_empty() {
                return Err(CoreError::InvalidInput("todo text cannot be empty".to_string()));
            }
        }

        let mut tables = self.write()?;
        let todo = tables
            .todos
            .iter_mut()
            .find(|t| t.id == id)
            .ok_or_else(|| CoreError::NotFound(id.to_string()))?;

        let mut data = data;
        data.text = data.text.map(|text| text.trim().to_string());
        data.apply_to(todo);
        Ok(todo.clone())
    }

    async fn delete_todo(&self, id: Uuid) -> Result<(), CoreError> {
        let mut tables = self.write()?;
        let before = tables.todos.len();
        tables.todos.retain(|t| t.id != id);
        if tables.todos.len() == before {
            return Err(CoreError::NotFound(id.to_string()));
        }

        tables.patterns.retain(|p| p.parent_id != id);
        for todo in tables.todos.iter_mut() {
            if todo.parent_todo_id == Some(id) {
                todo.parent_todo_id = None;
            }
        }
        Ok(())
    }
}

#[async_trait]
impl PatternRepository for MemoryRepository {
    async fn find_active_patterns(&self) -> Result<Vec<PatternWithTemplate>, CoreError> {
        let tables = self.read()?;
        Ok(tables
            .patterns
            .iter()
            .filter(|p| p.active)
            .map(|p| PatternWithTemplate {
                pattern: p.clone(),
                template: tables.template_of(p),
            })
            .collect())
    }

    async fn find_pattern_by_parent(
        &self,
        parent_id: Uuid,
    ) -> Result<Option<RecurrencePattern>, CoreError> {
        Ok(self
            .read()?
            .patterns
            .iter()
            .find(|p| p.parent_id == parent_id)
            .cloned())
    }

    async fn find_patterns_for_owner(
        &self,
        owner: &str,
    ) -> Result<Vec<PatternWithTemplate>, CoreError> {
        let tables = self.read()?;
        Ok(tables
            .patterns
            .iter()
            .filter_map(|p| {
                let template = tables.template_of(p)?;
                (template.user_id == owner).then(|| PatternWithTemplate {
                    pattern: p.clone(),
                    template: Some(template),
                })
            })
            .collect())
    }

    async fn insert_pattern(&self, data: NewPatternData) -> Result<RecurrencePattern, CoreError> {
        let mut tables = self.write()?;
        if !tables.todos.iter().any(|t| t.id == data.parent_id) {
            return Err(CoreError::NotFound(data.parent_id.to_string()));
        }
        if tables.patterns.iter().any(|p| p.parent_id == data.parent_id) {
            return Err(CoreError::InvalidInput(
                "A recurrence pattern already exists for this todo".to_string(),
            ));
        }

        let pattern = RecurrencePattern {
            id: Uuid::now_v7(),
            parent_id: data.parent_id,
            days: data.days,
            active: true,
            last_created_date: data.last_created_date,
            created_at: Utc::now(),
        };
        tables.patterns.push(pattern.clone());
        Ok(pattern)
    }

    async fn update_pattern(
        &self,
        id: Uuid,
        data: UpdatePatternData,
    ) -> Result<RecurrencePattern, CoreError> {
        let mut tables = self.write()?;
        let pattern = tables
            .patterns
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or_else(|| CoreError::NotFound(format!("Pattern with id {} not found", id)))?;
        data.apply_to(pattern);
        Ok(pattern.clone())
    }

    async fn delete_pattern(&self, id: Uuid) -> Result<(), CoreError> {
        let mut tables = self.write()?;
        let before = tables.patterns.len();
        tables.patterns.retain(|p| p.id != id);
        if tables.patterns.len() == before {
            return Err(CoreError::NotFound(format!("Pattern with id {} not found", id)));
        }
        Ok(())
    }
}

impl Repository for MemoryRepository {}

#[async_trait]
impl NoteRepository for MemoryRepository {
    async fn find_notes_for_owner(&self, owner: &str) -> Result<Vec<Note>, CoreError> {
        let tables = self.read()?;
        let mut notes: Vec<Note> = tables
            .notes
            .iter()
            .filter(|n| n.user_id == owner)
            .cloned()
            .collect();
        notes.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok(notes)
    }

    async fn insert_note(&self, data: NewNote) -> Result<Note, CoreError> {
        let note_text = data.note_text.trim();
        if note_text.is_empty() {
            return Err(CoreError::InvalidInput("note text cannot be empty".to_string()));
        }

        let mut tables = self.write()?;
        tables.last_note_id += 1;
        let note = Note {
            id: tables.last_note_id,
            user_id: data.user_id,
            note_text: note_text.to_string(),
            created_at: Utc::now(),
        };
        tables.notes.push(note.clone());
        Ok(note)
    }

    async fn update_note(&self, id: i64, note_text: &str) -> Result<Note, CoreError> {
        let note_text = note_text.trim();
        if note_text.is_empty() {
            return Err(CoreError::InvalidInput("note text cannot be empty".to_string()));
        }

        let mut tables = self.write()?;
        let note = tables
            .notes
            .iter_mut()
            .find(|n| n.id == id)
            .ok_or_else(|| CoreError::NotFound(format!("Note #{} not found", id)))?;
        note.note_text = note_text.to_string();
        Ok(note.clone())
    }

    async fn delete_note(&self, id: i64) -> Result<(), CoreError> {
        let mut tables = self.write()?;
        let before = tables.notes.len();
        tables.notes.retain(|n| n.id != id);
        if tables.notes.len() == before {
            return Err(CoreError::NotFound(format!("Note #{} not found", id)));
        }
        Ok(())
    }
}

#[async_trait]
impl MoodRepository for MemoryRepository {
    async fn insert_mood(&self, data: NewMoodEntry) -> Result<MoodEntry, CoreError> {
        let mut tables = self.write()?;
        tables.last_mood_id += 1;
        let entry = MoodEntry {
            id: tables.last_mood_id,
            user_id: data.user_id,
            mood: data.mood,
            created_at: Utc::now(),
        };
        tables.moods.push(entry.clone());
        Ok(entry)
    }

    async fn find_moods_since(
        &self,
        owner: &str,
        since: DateTime<Utc>,
    ) -> Result<Vec<MoodEntry>, CoreError> {
        let tables = self.read()?;
        let mut entries: Vec<MoodEntry> = tables
            .moods
            .iter()
            .filter(|e| e.user_id == owner && e.created_at >= since)
            .cloned()
            .collect();
        entries.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
        Ok(entries)
    }
}
