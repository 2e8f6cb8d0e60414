//! HTTP trigger for the daily expansion of recurring todos.
//!
//! An external scheduler calls `POST /api/cron/create-scheduled-todos` once a
//! day. Running it twice on the same day creates nothing new.

use anyhow::{Context, Result};
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use chrono::Utc;
use daybook_core::clock::Clock;
use daybook_core::models::Todo;
use daybook_core::recurrence::InstanceExpander;
use daybook_core::repository::Repository;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

pub const CRON_PATH: &str = "/api/cron/create-scheduled-todos";

/// Shared handler state.
#[derive(Clone)]
pub struct AppState {
    pub repo: Arc<dyn Repository>,
    pub clock: Arc<dyn Clock>,
}

impl AppState {
    pub fn new(repo: Arc<dyn Repository>, clock: Arc<dyn Clock>) -> Self {
        Self { repo, clock }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
}

/// Body of every answer from the trigger endpoint except a failed fetch.
#[derive(Debug, Serialize, Deserialize)]
pub struct ExpansionResponse {
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub todos: Option<Vec<Todo>>,
}

impl ExpansionResponse {
    fn message(message: &str) -> Self {
        Self {
            message: message.to_string(),
            created: None,
            todos: None,
        }
    }
}

/// Body returned when the pattern fetch fails.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route(
            CRON_PATH,
            post(create_scheduled_todos).fallback(method_not_allowed),
        )
        .with_state(Arc::new(state))
}

/// Binds `addr` and serves until the process is stopped.
pub async fn serve(state: AppState, addr: &str) -> Result<()> {
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind to {addr}"))?;

    tracing::info!(%addr, path = CRON_PATH, "Starting daybook trigger server");
    println!("Listening on http://{addr}");

    axum::serve(listener, router(state))
        .await
        .context("server error")?;
    Ok(())
}

async fn health() -> impl IntoResponse {
    Json(HealthResponse {
        status: "ok".to_string(),
    })
}

async fn method_not_allowed() -> impl IntoResponse {
    (
        StatusCode::METHOD_NOT_ALLOWED,
        Json(ExpansionResponse::message("Method not allowed")),
    )
}

async fn create_scheduled_todos(State(state): State<Arc<AppState>>) -> Response {
    tracing::info!(started_at = %Utc::now().to_rfc3339(), "scheduled todo run started");

    let expander = InstanceExpander::new(Arc::clone(&state.repo), Arc::clone(&state.clock));
    // A panic inside the run surfaces as a JoinError instead of a dropped connection.
    let outcome = tokio::spawn(async move { expander.run().await }).await;

    match outcome {
        Ok(Ok(report)) if report.patterns_checked == 0 => (
            StatusCode::OK,
            Json(ExpansionResponse::message("No todos to create")),
        )
            .into_response(),
        Ok(Ok(report)) => {
            tracing::info!(created = report.created_count(), "scheduled todo run finished");
            (
                StatusCode::OK,
                Json(ExpansionResponse {
                    message: "Successfully created scheduled todos".to_string(),
                    created: Some(report.created_count()),
                    todos: Some(report.created),
                }),
            )
                .into_response()
        }
        Ok(Err(e)) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorResponse {
                error: e.to_string(),
            }),
        )
            .into_response(),
        Err(e) => {
            tracing::error!(error = %e, "error creating scheduled todos");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ExpansionResponse::message("Internal server error")),
            )
                .into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use axum::body::Body;
    use axum::http::{Method, Request};
    use chrono::NaiveDate;
    use daybook_core::clock::FixedClock;
    use daybook_core::error::CoreError;
    use daybook_core::models::{
        DaySet, NewPatternData, NewTodo, PatternWithTemplate, RecurrencePattern,
        UpdatePatternData, UpdateTodoData,
    };
    use daybook_core::repository::{MemoryRepository, PatternRepository, TodoRepository};
    use tower::ServiceExt;
    use uuid::Uuid;

    // 2024-01-01 was a Monday
    fn monday() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()
    }

    fn app(repo: Arc<dyn Repository>) -> Router {
        router(AppState::new(repo, Arc::new(FixedClock(monday()))))
    }

    async fn call(router: Router, method: Method, uri: &str) -> (StatusCode, serde_json::Value) {
        let request = Request::builder()
            .method(method)
            .uri(uri)
            .body(Body::empty())
            .unwrap();
        let response = router.oneshot(request).await.map_err(|err| match err {}).unwrap();
        let status = response.status();
        let body = axum::body::to_bytes(response.into_body(), 1024 * 1024)
            .await
            .unwrap();
        (status, serde_json::from_slice(&body).unwrap())
    }

    async fn seed_pattern(repo: &MemoryRepository, text: &str, days: DaySet) {
        let template = repo
            .insert_todo(NewTodo::new("ann", text, monday()))
            .await
            .unwrap();
        repo.insert_pattern(NewPatternData {
            parent_id: template.id,
            days,
            last_created_date: None,
        })
        .await
        .unwrap();
    }

    #[tokio::test]
    async fn test_health_endpoint() {
        let (status, body) = call(app(Arc::new(MemoryRepository::new())), Method::GET, "/health").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
    }

    #[tokio::test]
    async fn test_get_is_method_not_allowed() {
        let (status, body) =
            call(app(Arc::new(MemoryRepository::new())), Method::GET, CRON_PATH).await;
        assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(body["message"], "Method not allowed");
    }

    #[tokio::test]
    async fn test_no_patterns() {
        let (status, body) =
            call(app(Arc::new(MemoryRepository::new())), Method::POST, CRON_PATH).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, serde_json::json!({ "message": "No todos to create" }));
    }

    #[tokio::test]
    async fn test_creates_due_todos() {
        let repo = MemoryRepository::new();
        seed_pattern(&repo, "Stand-up", DaySet::weekdays()).await;
        seed_pattern(&repo, "Long run", DaySet::weekends()).await;
        let router = app(Arc::new(repo.clone()));

        let (status, body) = call(router.clone(), Method::POST, CRON_PATH).await;
        assert_eq!(status, StatusCode::OK);
        let response: ExpansionResponse = serde_json::from_value(body).unwrap();
        assert_eq!(response.message, "Successfully created scheduled todos");
        assert_eq!(response.created, Some(1));
        let todos = response.todos.unwrap();
        assert_eq!(todos[0].text, "Stand-up");
        assert_eq!(todos[0].date, monday());

        // second call the same day creates nothing
        let (_, body) = call(router, Method::POST, CRON_PATH).await;
        assert_eq!(body["created"], 0);
        assert_eq!(repo.all_todos().len(), 3);
    }

    struct UnreachableRepository;

    fn store_down() -> CoreError {
        CoreError::Store("connection refused".to_string())
    }

    #[async_trait]
    impl TodoRepository for UnreachableRepository {
        async fn find_todos_for_owner(&self, _owner: &str) -> Result<Vec<Todo>, CoreError> {
            Err(store_down())
        }
        async fn find_todo_by_id(&self, _id: Uuid) -> Result<Option<Todo>, CoreError> {
            Err(store_down())
        }
        async fn insert_todo(&self, _data: NewTodo) -> Result<Todo, CoreError> {
            Err(store_down())
        }
        async fn update_todo(&self, _id: Uuid, _data: UpdateTodoData) -> Result<Todo, CoreError> {
            Err(store_down())
        }
        async fn delete_todo(&self, _id: Uuid) -> Result<(), CoreError> {
            Err(store_down())
        }
    }

    #[async_trait]
    impl PatternRepository for UnreachableRepository {
        async fn find_active_patterns(&self) -> Result<Vec<PatternWithTemplate>, CoreError> {
            Err(store_down())
        }
        async fn find_pattern_by_parent(
            &self,
            _parent_id: Uuid,
        ) -> Result<Option<RecurrencePattern>, CoreError> {
            Err(store_down())
        }
        async fn find_patterns_for_owner(
            &self,
            _owner: &str,
        ) -> Result<Vec<PatternWithTemplate>, CoreError> {
            Err(store_down())
        }
        async fn insert_pattern(
            &self,
            _data: NewPatternData,
        ) -> Result<RecurrencePattern, CoreError> {
            Err(store_down())
        }
        async fn update_pattern(
            &self,
            _id: Uuid,
            _data: UpdatePatternData,
        ) -> Result<RecurrencePattern, CoreError> {
            Err(store_down())
        }
        async fn delete_pattern(&self, _id: Uuid) -> Result<(), CoreError> {
            Err(store_down())
        }
    }

    impl Repository for UnreachableRepository {}

    #[tokio::test]
    async fn test_fetch_failure_reports_error() {
        let (status, body) = call(app(Arc::new(UnreachableRepository)), Method::POST, CRON_PATH).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], "Store error: connection refused");
    }
}
