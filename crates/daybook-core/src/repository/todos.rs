use crate::error::CoreError;
use crate::models::{NewTodo, Todo, UpdateTodoData};
use crate::repository::{SqliteRepository, TodoRepository};
use async_trait::async_trait;
use chrono::Utc;
use sqlx::{QueryBuilder, Sqlite};
use uuid::Uuid;

#[async_trait]
impl TodoRepository for SqliteRepository {
    async fn find_todos_for_owner(&self, owner: &str) -> Result<Vec<Todo>, CoreError> {
        let todos = sqlx::query_as("SELECT * FROM todos WHERE user_id = $1 ORDER BY date, created_at, rowid")
            .bind(owner)
            .fetch_all(self.pool())
            .await?;
        Ok(todos)
    }

    async fn find_todo_by_id(&self, id: Uuid) -> Result<Option<Todo>, CoreError> {
        let todo = sqlx::query_as("SELECT * FROM todos WHERE id = $1")
            .bind(id)
            .fetch_optional(self.pool())
            .await?;
        Ok(todo)
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

        sqlx::query(
            r#"INSERT INTO todos (id, user_id, text, date, completed, scheduled_days, parent_todo_id, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)"#,
        )
        .bind(todo.id)
        .bind(&todo.user_id)
        .bind(&todo.text)
        .bind(todo.date)
        .bind(todo.completed)
        .bind(todo.scheduled_days.as_ref().map(|days| days.to_string()))
        .bind(todo.parent_todo_id)
        .bind(todo.created_at)
        .execute(self.pool())
        .await?;

        Ok(todo)
    }

    async fn update_todo(&self, id: Uuid, data: UpdateTodoData) -> Result<Todo, CoreError> {
        if let Some(text) = &data.text {
            if text.trim().is_empty() {
                return Err(CoreError::InvalidInput("todo text cannot be empty".to_string()));
            }
        }

        if !data.is_empty() {
            let mut qb: QueryBuilder<Sqlite> = QueryBuilder::new("UPDATE todos SET ");
            let mut separated = qb.separated(", ");

            if let Some(text) = &data.text {
                separated.push("text = ");
                separated.push_bind_unseparated(text.trim().to_string());
            }
            if let Some(date) = data.date {
                separated.push("date = ");
                separated.push_bind_unseparated(date);
            }
            if let Some(completed) = data.completed {
                separated.push("completed = ");
                separated.push_bind_unseparated(completed);
            }
            if let Some(days) = &data.scheduled_days {
                separated.push("scheduled_days = ");
                separated.push_bind_unseparated(days.as_ref().map(|d| d.to_string()));
            }

            qb.push(" WHERE id = ");
            qb.push_bind(id);

            let result = qb.build().execute(self.pool()).await?;
            if result.rows_affected() == 0 {
                return Err(CoreError::NotFound(id.to_string()));
            }
        }

        self.find_todo_by_id(id)
            .await?
            .ok_or_else(|| CoreError::NotFound(id.to_string()))
    }

    async fn delete_todo(&self, id: Uuid) -> Result<(), CoreError> {
        let result = sqlx::query("DELETE FROM todos WHERE id = $1")
            .bind(id)
            .execute(self.pool())
            .await?;

        if result.rows_affected() == 0 {
            return Err(CoreError::NotFound(id.to_string()));
        }
        Ok(())
    }
}
