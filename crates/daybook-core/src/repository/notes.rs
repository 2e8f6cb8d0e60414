use crate::error::CoreError;
use crate::models::{NewNote, Note};
use crate::repository::{NoteRepository, SqliteRepository};
use async_trait::async_trait;
use chrono::Utc;

fn blank_note() -> CoreError {
    CoreError::InvalidInput("note text cannot be empty".to_string())
}

#[async_trait]
impl NoteRepository for SqliteRepository {
    async fn find_notes_for_owner(&self, owner: &str) -> Result<Vec<Note>, CoreError> {
        let notes = sqlx::query_as(
            "SELECT * FROM quick_notes WHERE user_id = $1 ORDER BY created_at DESC, id DESC",
        )
        .bind(owner)
        .fetch_all(self.pool())
        .await?;
        Ok(notes)
    }

    async fn insert_note(&self, data: NewNote) -> Result<Note, CoreError> {
        let note_text = data.note_text.trim();
        if note_text.is_empty() {
            return Err(blank_note());
        }

        let note = sqlx::query_as(
            r#"INSERT INTO quick_notes (user_id, note_text, created_at)
            VALUES ($1, $2, $3)
            RETURNING *
            "#,
        )
        .bind(&data.user_id)
        .bind(note_text)
        .bind(Utc::now())
        .fetch_one(self.pool())
        .await?;
        Ok(note)
    }

    async fn update_note(&self, id: i64, note_text: &str) -> Result<Note, CoreError> {
        let note_text = note_text.trim();
        if note_text.is_empty() {
            return Err(blank_note());
        }

        let note: Option<Note> =
            sqlx::query_as("UPDATE quick_notes SET note_text = $1 WHERE id = $2 RETURNING *")
                .bind(note_text)
                .bind(id)
                .fetch_optional(self.pool())
                .await?;
        note.ok_or_else(|| CoreError::NotFound(format!("Note #{} not found", id)))
    }

    async fn delete_note(&self, id: i64) -> Result<(), CoreError> {
        let result = sqlx::query("DELETE FROM quick_notes WHERE id = $1")
            .bind(id)
            .execute(self.pool())
            .await?;

        if result.rows_affected() == 0 {
            return Err(CoreError::NotFound(format!("Note #{} not found", id)));
        }
        Ok(())
    }
}
