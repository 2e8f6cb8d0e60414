use crate::error::CoreError;
use crate::models::{
    NewPatternData, PatternWithTemplate, RecurrencePattern, Todo, UpdatePatternData,
};
use crate::repository::{PatternRepository, SqliteRepository};
use async_trait::async_trait;
use chrono::Utc;
use sqlx::{QueryBuilder, Sqlite};
use uuid::Uuid;

#[async_trait]
impl PatternRepository for SqliteRepository {
    async fn find_active_patterns(&self) -> Result<Vec<PatternWithTemplate>, CoreError> {
        let patterns: Vec<RecurrencePattern> = sqlx::query_as(
            "SELECT * FROM recurring_patterns WHERE active = TRUE ORDER BY created_at",
        )
        .fetch_all(self.pool())
        .await?;

        self.join_templates(patterns).await
    }

    async fn find_pattern_by_parent(
        &self,
        parent_id: Uuid,
    ) -> Result<Option<RecurrencePattern>, CoreError> {
        let pattern = sqlx::query_as("SELECT * FROM recurring_patterns WHERE parent_id = $1")
            .bind(parent_id)
            .fetch_optional(self.pool())
            .await?;
        Ok(pattern)
    }

    async fn find_patterns_for_owner(
        &self,
        owner: &str,
    ) -> Result<Vec<PatternWithTemplate>, CoreError> {
        let patterns: Vec<RecurrencePattern> = sqlx::query_as(
            r#"SELECT p.* FROM recurring_patterns p
            INNER JOIN todos t ON p.parent_id = t.id
            WHERE t.user_id = $1
            ORDER BY p.created_at"#,
        )
        .bind(owner)
        .fetch_all(self.pool())
        .await?;

        self.join_templates(patterns).await
    }

    async fn insert_pattern(&self, data: NewPatternData) -> Result<RecurrencePattern, CoreError> {
        let mut tx = self.pool().begin().await?;

        let template: Option<Todo> = sqlx::query_as("SELECT * FROM todos WHERE id = $1")
            .bind(data.parent_id)
            .fetch_optional(&mut *tx)
            .await?;
        if template.is_none() {
            return Err(CoreError::NotFound(data.parent_id.to_string()));
        }

        let existing: Option<RecurrencePattern> =
            sqlx::query_as("SELECT * FROM recurring_patterns WHERE parent_id = $1")
                .bind(data.parent_id)
                .fetch_optional(&mut *tx)
                .await?;
        if existing.is_some() {
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

        sqlx::query(
            r#"INSERT INTO recurring_patterns (id, parent_id, days, active, last_created_date, created_at)
            VALUES ($1, $2, $3, $4, $5, $6)"#,
        )
        .bind(pattern.id)
        .bind(pattern.parent_id)
        .bind(pattern.days.to_string())
        .bind(pattern.active)
        .bind(pattern.last_created_date)
        .bind(pattern.created_at)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(pattern)
    }

    async fn update_pattern(
        &self,
        id: Uuid,
        data: UpdatePatternData,
    ) -> Result<RecurrencePattern, CoreError> {
        if !data.is_empty() {
            let mut qb: QueryBuilder<Sqlite> = QueryBuilder::new("UPDATE recurring_patterns SET ");
            let mut separated = qb.separated(", ");

            if let Some(days) = &data.days {
                separated.push("days = ");
                separated.push_bind_unseparated(days.to_string());
            }
            if let Some(active) = data.active {
                separated.push("active = ");
                separated.push_bind_unseparated(active);
            }
            if let Some(stamp) = data.last_created_date {
                separated.push("last_created_date = ");
                separated.push_bind_unseparated(stamp);
            }

            qb.push(" WHERE id = ");
            qb.push_bind(id);

            let result = qb.build().execute(self.pool()).await?;
            if result.rows_affected() == 0 {
                return Err(CoreError::NotFound(format!("Pattern with id {} not found", id)));
            }
        }

        let pattern: Option<RecurrencePattern> =
            sqlx::query_as("SELECT * FROM recurring_patterns WHERE id = $1")
                .bind(id)
                .fetch_optional(self.pool())
                .await?;
        pattern.ok_or_else(|| CoreError::NotFound(format!("Pattern with id {} not found", id)))
    }

    async fn delete_pattern(&self, id: Uuid) -> Result<(), CoreError> {
        let result = sqlx::query("DELETE FROM recurring_patterns WHERE id = $1")
            .bind(id)
            .execute(self.pool())
            .await?;

        if result.rows_affected() == 0 {
            return Err(CoreError::NotFound(format!("Pattern with id {} not found", id)));
        }
        Ok(())
    }
}

impl SqliteRepository {
    async fn join_templates(
        &self,
        patterns: Vec<RecurrencePattern>,
    ) -> Result<Vec<PatternWithTemplate>, CoreError> {
        let mut joined = Vec::with_capacity(patterns.len());
        for pattern in patterns {
            let template: Option<Todo> = sqlx::query_as("SELECT * FROM todos WHERE id = $1")
                .bind(pattern.parent_id)
                .fetch_optional(self.pool())
                .await?;
            joined.push(PatternWithTemplate { pattern, template });
        }
        Ok(joined)
    }
}
