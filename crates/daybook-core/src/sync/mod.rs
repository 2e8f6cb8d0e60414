//! Optimistic synchronization of the in-memory todo list.
//!
//! Every list mutation is applied locally first ([`TodoListViewModel::apply`]),
//! written to the repository ([`Ticket::persist`]) and then reconciled
//! ([`TodoListViewModel::reconcile`]). `persist` does not borrow the view-model,
//! so several tickets can be in flight and settle in any order; the
//! [`MutationLog`] keeps one pending entry per todo and reverses only that
//! entry when its write fails.

pub mod ledger;
pub mod view_model;

pub use ledger::{MutationLog, PendingMutation, PriorState};
pub use view_model::{Mutation, Notice, Settled, SyncConfig, Ticket, TodoListViewModel};
