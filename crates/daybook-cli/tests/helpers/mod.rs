use assert_cmd::Command;
use daybook_core::db::establish_connection;
use daybook_core::models::Todo;
use daybook_core::repository::{SqliteRepository, TodoRepository};
use std::path::PathBuf;
use tempfile::TempDir;

pub const OWNER: &str = "tester";

/// Test harness for running CLI commands with temporary databases
pub struct CliTestHarness {
    temp_dir: TempDir,
    db_path: PathBuf,
}

impl CliTestHarness {
    /// Create a new test harness with a temporary database
    pub fn new() -> Self {
        let temp_dir = tempfile::tempdir().expect("Failed to create temp directory");
        let db_path = temp_dir.path().join("test.db");

        Self { temp_dir, db_path }
    }

    /// Get a Command instance configured for testing
    pub fn command(&self) -> Command {
        let mut cmd = Command::cargo_bin("daybook").expect("Failed to find daybook binary");

        // No daybook.toml in the temp dir, so the environment decides.
        cmd.current_dir(self.temp_dir.path())
            .env("DAYBOOK_DATABASE_PATH", &self.db_path)
            .env("DAYBOOK_OWNER", OWNER)
            .env("DAYBOOK_TIMEZONE", "UTC")
            .env_remove("RUST_LOG");

        cmd
    }

    /// Helper to run a command and assert success
    pub fn run_success(&self, args: &[&str]) -> assert_cmd::assert::Assert {
        self.command().args(args).assert().success()
    }

    /// Helper to run a command and assert failure
    pub fn run_failure(&self, args: &[&str]) -> assert_cmd::assert::Assert {
        self.command().args(args).assert().failure()
    }

    /// Todos of the test owner, read straight from the database
    pub fn todos(&self) -> Vec<Todo> {
        let runtime = tokio::runtime::Runtime::new().expect("Failed to start runtime");
        runtime.block_on(async {
            let pool = establish_connection(&self.db_path.to_string_lossy())
                .await
                .expect("Failed to open test database");
            SqliteRepository::new(pool)
                .find_todos_for_owner(OWNER)
                .await
                .expect("Failed to read todos")
        })
    }

    /// Full ID of the only todo with `text`
    pub fn id_of(&self, text: &str) -> String {
        let todos = self.todos();
        let matching: Vec<&Todo> = todos.iter().filter(|t| t.text == text).collect();
        assert_eq!(matching.len(), 1, "expected exactly one todo named '{}'", text);
        matching[0].id.to_string()
    }
}

/// Utility functions for test assertions
pub mod assertions {
    use predicates::prelude::*;

    /// Predicate to check if output contains the day table headers
    pub fn has_todo_table_headers() -> impl Predicate<str> {
        predicate::str::contains("ID")
            .and(predicate::str::contains("Done"))
            .and(predicate::str::contains("Todo"))
    }

    /// Predicate to check for an empty day
    pub fn empty_result() -> impl Predicate<str> {
        predicate::str::contains("No todos found")
    }

    /// Predicate to check for error messages
    pub fn has_error() -> impl Predicate<str> {
        predicate::str::contains("Error").or(predicate::str::contains("error"))
    }
}
