use crate::error::CoreError;
use crate::models::{MoodEntry, NewMoodEntry};
use crate::repository::{MoodRepository, SqliteRepository};
use async_trait::async_trait;
use chrono::{DateTime, Utc};

#[async_trait]
impl MoodRepository for SqliteRepository {
    async fn insert_mood(&self, data: NewMoodEntry) -> Result<MoodEntry, CoreError> {
        let entry = sqlx::query_as(
            r#"INSERT INTO mood_logger (user_id, mood, created_at)
            VALUES ($1, $2, $3)
            RETURNING *
            "#,
        )
        .bind(&data.user_id)
        .bind(data.mood.as_str())
        .bind(Utc::now())
        .fetch_one(self.pool())
        .await?;
        Ok(entry)
    }

    async fn find_moods_since(
        &self,
        owner: &str,
        since: DateTime<Utc>,
    ) -> Result<Vec<MoodEntry>, CoreError> {
        let entries = sqlx::query_as(
            r#"SELECT * FROM mood_logger
            WHERE user_id = $1 AND created_at >= $2
            ORDER BY created_at, id"#,
        )
        .bind(owner)
        .bind(since)
        .fetch_all(self.pool())
        .await?;
        Ok(entries)
    }
}
