//! # Daybook Core Library
//!
//! Per-day todo lists with weekly recurrence, optimistic local updates and a
//! scheduled job that materializes recurring todos.
//!
//! ## Features
//!
//! - **Day Lists**: Todos belong to one calendar date and one owner
//! - **Weekly Recurrence**: A todo can act as a template that fires on a set
//!   of weekdays; the [`recurrence::InstanceExpander`] creates the day's copies
//! - **Optimistic Sync**: [`sync::TodoListViewModel`] applies changes locally,
//!   writes them through the repository and rolls back only what failed
//! - **Timezone Awareness**: "Today" always comes from an explicit IANA zone
//!
//! ## Core Modules
//!
//! - [`db`]: Database connection and migration management
//! - [`models`]: Todos, day sets and recurrence patterns
//! - [`repository`]: Data access layer with Repository pattern
//! - [`recurrence`]: Daily expansion of recurring todos
//! - [`sync`]: Optimistic mutation log and the list view-model
//! - [`calendar`]: Week arithmetic for the history view
//! - [`clock`]: Sources of "today"
//! - [`timezone`]: Timezone utilities and validation
//! - [`error`]: Error types shared by every layer
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use daybook_core::{
//!     clock::SystemClock,
//!     db,
//!     models::DaySet,
//!     recurrence::InstanceExpander,
//!     repository::SqliteRepository,
//!     sync::{SyncConfig, TodoListViewModel},
//! };
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let pool = db::establish_connection("daybook.db").await?;
//!     let repo = Arc::new(SqliteRepository::new(pool));
//!     let clock = Arc::new(SystemClock::from_name("Europe/Berlin")?);
//!
//!     let mut list =
//!         TodoListViewModel::load(repo.clone(), clock.clone(), "ann", SyncConfig::default()).await?;
//!     let settled = list.add("Water the plants").await?;
//!     if let Some(todo) = settled.todo() {
//!         list.schedule(todo.id, DaySet::weekdays()).await?;
//!     }
//!
//!     let report = InstanceExpander::new(repo, clock).run().await?;
//!     println!("created {} todos", report.created_count());
//!     Ok(())
//! }
//! ```

pub mod calendar;
pub mod clock;
pub mod db;
pub mod error;
pub mod models;
pub mod recurrence;
pub mod repository;
pub mod sync;
pub mod timezone;

#[cfg(test)]
mod test_support;
