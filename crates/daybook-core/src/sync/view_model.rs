use crate::calendar::{week_dates, DaySummary};
use crate::clock::Clock;
use crate::error::CoreError;
use crate::models::{
    DaySet, DayTab, MutationKind, NewPatternData, NewTodo, RecurrencePattern, Todo,
    UpdatePatternData, UpdateTodoData,
};
use crate::repository::Repository;
use crate::sync::ledger::{MutationLog, PendingMutation, PriorState};
use chrono::{DateTime, NaiveDate, Utc};
use std::sync::Arc;
use std::time::Duration;
use uuid::Uuid;

#[derive(Debug, Clone)]
pub struct SyncConfig {
    /// How long after an add settles the same text is refused again.
    pub debounce: Duration,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            debounce: Duration::from_secs(1),
        }
    }
}

/// A user action on the todo list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mutation {
    Add { text: String },
    Toggle { id: Uuid },
    Edit { id: Uuid, text: String },
    Delete { id: Uuid },
    Schedule { id: Uuid, days: DaySet },
    Unschedule { id: Uuid },
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum RemoteWrite {
    Insert(NewTodo),
    Update(UpdateTodoData),
    Delete,
    Schedule { days: DaySet, today: NaiveDate },
    Unschedule,
}

/// A locally applied mutation waiting for its remote write.
#[derive(Debug)]
#[must_use = "a ticket must be persisted and reconciled"]
pub struct Ticket {
    todo_id: Uuid,
    kind: MutationKind,
    write: RemoteWrite,
}

/// What the repository confirmed.
#[derive(Debug, Clone)]
pub enum Settled {
    Inserted(Todo),
    Updated(Todo),
    Deleted(Uuid),
    Scheduled {
        todo: Todo,
        pattern: RecurrencePattern,
    },
    Unscheduled {
        todo: Todo,
        pattern: Option<RecurrencePattern>,
    },
}

impl Settled {
    /// The authoritative row, if the write returned one.
    pub fn todo(&self) -> Option<&Todo> {
        match self {
            Settled::Inserted(todo)
            | Settled::Updated(todo)
            | Settled::Scheduled { todo, .. }
            | Settled::Unscheduled { todo, .. } => Some(todo),
            Settled::Deleted(_) => None,
        }
    }
}

impl Ticket {
    /// Id of the row in the local list this ticket targets. For an add this
    /// is the provisional id.
    pub fn todo_id(&self) -> Uuid {
        self.todo_id
    }

    pub fn kind(&self) -> MutationKind {
        self.kind
    }

    /// Issue the remote write(s) for this ticket.
    pub async fn persist<R: Repository + ?Sized>(&self, repo: &R) -> Result<Settled, CoreError> {
        match &self.write {
            RemoteWrite::Insert(data) => repo.insert_todo(data.clone()).await.map(Settled::Inserted),
            RemoteWrite::Update(data) => repo
                .update_todo(self.todo_id, data.clone())
                .await
                .map(Settled::Updated),
            RemoteWrite::Delete => repo
                .delete_todo(self.todo_id)
                .await
                .map(|()| Settled::Deleted(self.todo_id)),
            RemoteWrite::Schedule { days, today } => {
                schedule_remote(repo, self.todo_id, days, *today).await
            }
            RemoteWrite::Unschedule => unschedule_remote(repo, self.todo_id).await,
        }
    }
}

/// Upsert the pattern, then set `scheduled_days` on the todo. If the second
/// write fails the pattern write is undone.
async fn schedule_remote<R: Repository + ?Sized>(
    repo: &R,
    todo_id: Uuid,
    days: &DaySet,
    today: NaiveDate,
) -> Result<Settled, CoreError> {
    let previous = repo.find_pattern_by_parent(todo_id).await?;
    let pattern = match &previous {
        Some(existing) => {
            let update = UpdatePatternData {
                days: Some(days.clone()),
                active: Some(true),
                last_created_date: Some(Some(today)),
            };
            repo.update_pattern(existing.id, update).await?
        }
        None => {
            let data = NewPatternData {
                parent_id: todo_id,
                days: days.clone(),
                last_created_date: Some(today),
            };
            repo.insert_pattern(data).await?
        }
    };

    let update = UpdateTodoData {
        scheduled_days: Some(Some(days.clone())),
        ..Default::default()
    };
    match repo.update_todo(todo_id, update).await {
        Ok(todo) => Ok(Settled::Scheduled { todo, pattern }),
        Err(e) => {
            undo_pattern_write(repo, previous.as_ref(), &pattern).await;
            Err(e)
        }
    }
}

async fn unschedule_remote<R: Repository + ?Sized>(
    repo: &R,
    todo_id: Uuid,
) -> Result<Settled, CoreError> {
    let previous = repo.find_pattern_by_parent(todo_id).await?;
    let pattern = match &previous {
        Some(existing) if existing.active => {
            let update = UpdatePatternData {
                active: Some(false),
                ..Default::default()
            };
            Some(repo.update_pattern(existing.id, update).await?)
        }
        other => other.clone(),
    };

    let update = UpdateTodoData {
        scheduled_days: Some(None),
        ..Default::default()
    };
    match repo.update_todo(todo_id, update).await {
        Ok(todo) => Ok(Settled::Unscheduled { todo, pattern }),
        Err(e) => {
            if let (Some(prev), Some(written)) = (&previous, &pattern) {
                if prev != written {
                    undo_pattern_write(repo, Some(prev), written).await;
                }
            }
            Err(e)
        }
    }
}

async fn undo_pattern_write<R: Repository + ?Sized>(
    repo: &R,
    previous: Option<&RecurrencePattern>,
    written: &RecurrencePattern,
) {
    let undone = match previous {
        Some(prev) => repo
            .update_pattern(prev.id, UpdatePatternData::restoring(prev))
            .await
            .map(|_| ()),
        None => repo.delete_pattern(written.id).await,
    };
    if let Err(e) = undone {
        tracing::error!(
            pattern_id = %written.id,
            error = %e,
            "failed to undo pattern write; pattern and todo schedule disagree"
        );
    }
}

/// User-visible message about a failed write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub title: String,
    pub message: String,
}

impl Notice {
    fn for_failure(kind: MutationKind, error: &CoreError) -> Self {
        let title = match kind {
            MutationKind::Add => "Error adding todo",
            MutationKind::Update | MutationKind::Toggle => "Error updating todo",
            MutationKind::Delete => "Error deleting todo",
            MutationKind::Schedule => "Error scheduling todo",
        };
        Self {
            title: title.to_string(),
            message: error.to_string(),
        }
    }
}

#[derive(Debug, Clone)]
struct LastSubmission {
    text: String,
    settled_at: Option<DateTime<Utc>>,
}

impl LastSubmission {
    /// The owner's newest hand-written todo, settled when it was created.
    fn newest(todos: &[Todo]) -> Option<Self> {
        todos
            .iter()
            .filter(|t| t.parent_todo_id.is_none())
            .max_by_key(|t| t.created_at)
            .map(|t| Self {
                text: t.text.clone(),
                settled_at: Some(t.created_at),
            })
    }

    fn blocks(&self, text: &str, debounce: Duration) -> bool {
        if self.text != text {
            return false;
        }
        // A clock that went backwards counts as "just now".
        self.settled_at.map_or(true, |at| {
            (Utc::now() - at)
                .to_std()
                .map_or(true, |elapsed| elapsed < debounce)
        })
    }
}

/// The interactive todo list: owns the in-memory rows and the pending log.
pub struct TodoListViewModel<R: Repository + ?Sized> {
    repo: Arc<R>,
    clock: Arc<dyn Clock>,
    config: SyncConfig,
    owner: String,
    todos: Vec<Todo>,
    log: MutationLog,
    tab: DayTab,
    add_in_flight: bool,
    last_submitted: Option<LastSubmission>,
    notices: Vec<Notice>,
}

impl<R: Repository + ?Sized> TodoListViewModel<R> {
    /// An empty list for `owner`.
    pub fn new(
        repo: Arc<R>,
        clock: Arc<dyn Clock>,
        owner: impl Into<String>,
        config: SyncConfig,
    ) -> Self {
        Self {
            repo,
            clock,
            config,
            owner: owner.into(),
            todos: Vec::new(),
            log: MutationLog::new(),
            tab: DayTab::default(),
            add_in_flight: false,
            last_submitted: None,
            notices: Vec::new(),
        }
    }

    /// Fetch `owner`'s todos. A failed fetch aborts and is returned as is.
    ///
    /// The owner's newest row seeds the duplicate-add window, so an add
    /// repeated by a fresh session within `debounce` is still refused.
    pub async fn load(
        repo: Arc<R>,
        clock: Arc<dyn Clock>,
        owner: impl Into<String>,
        config: SyncConfig,
    ) -> Result<Self, CoreError> {
        let mut view_model = Self::new(repo, clock, owner, config);
        view_model.todos = view_model
            .repo
            .find_todos_for_owner(&view_model.owner)
            .await
            .map_err(|e| {
                tracing::error!(owner = %view_model.owner, error = %e, "error fetching todos");
                e
            })?;
        view_model.last_submitted = LastSubmission::newest(&view_model.todos);
        Ok(view_model)
    }

    pub fn owner(&self) -> &str {
        &self.owner
    }

    pub fn todos(&self) -> &[Todo] {
        &self.todos
    }

    pub fn get(&self, id: Uuid) -> Option<&Todo> {
        self.todos.iter().find(|t| t.id == id)
    }

    pub fn today(&self) -> NaiveDate {
        self.clock.today()
    }

    pub fn tab(&self) -> DayTab {
        self.tab
    }

    pub fn set_tab(&mut self, tab: DayTab) {
        self.tab = tab;
    }

    /// True while a mutation on `id` is pending; its controls stay disabled.
    pub fn is_busy(&self, id: Uuid) -> bool {
        self.log.is_busy(id)
    }

    pub fn pending_count(&self) -> usize {
        self.log.len()
    }

    pub fn notices(&self) -> &[Notice] {
        &self.notices
    }

    pub fn take_notices(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.notices)
    }

    // ------------------------------------------------------------------
    // Views
    // ------------------------------------------------------------------

    /// Exactly the todos dated `date`, in list order.
    pub fn day_view(&self, date: NaiveDate) -> Vec<&Todo> {
        self.todos.iter().filter(|t| t.date == date).collect()
    }

    pub fn tab_view(&self, tab: DayTab) -> Vec<&Todo> {
        self.day_view(tab.target_date(self.today()))
    }

    pub fn week_summary(
        &self,
        year: i32,
        month: u32,
        week: u32,
    ) -> Result<Vec<DaySummary>, CoreError> {
        Ok(week_dates(year, month, week)?
            .into_iter()
            .map(|date| DaySummary::collect(date, &self.todos))
            .collect())
    }

    // ------------------------------------------------------------------
    // Mutations
    // ------------------------------------------------------------------

    /// Apply `mutation` to the local list and record it as pending.
    ///
    /// A rejected mutation leaves the list and the log untouched.
    pub fn apply(&mut self, mutation: Mutation) -> Result<Ticket, CoreError> {
        match mutation {
            Mutation::Add { text } => self.apply_add(&text),
            Mutation::Toggle { id } => {
                let (index, current) = self.editable(id)?;
                let patch = UpdateTodoData {
                    completed: Some(!current.completed),
                    ..Default::default()
                };
                let write = RemoteWrite::Update(patch.clone());
                self.apply_patch(MutationKind::Toggle, index, current, patch, write)
            }
            Mutation::Edit { id, text } => {
                let text = text.trim();
                if text.is_empty() {
                    return Err(CoreError::InvalidInput("todo text cannot be empty".to_string()));
                }
                let (index, current) = self.editable(id)?;
                let patch = UpdateTodoData {
                    text: Some(text.to_string()),
                    ..Default::default()
                };
                let write = RemoteWrite::Update(patch.clone());
                self.apply_patch(MutationKind::Update, index, current, patch, write)
            }
            Mutation::Delete { id } => {
                let (index, current) = self.editable(id)?;
                self.log.record(PendingMutation {
                    kind: MutationKind::Delete,
                    todo_id: id,
                    prior: PriorState::Present {
                        index,
                        todo: current,
                    },
                })?;
                self.todos.remove(index);
                Ok(Ticket {
                    todo_id: id,
                    kind: MutationKind::Delete,
                    write: RemoteWrite::Delete,
                })
            }
            Mutation::Schedule { id, days } => {
                if days.is_empty() {
                    return Err(CoreError::InvalidInput(
                        "pick at least one day; unschedule to clear a schedule".to_string(),
                    ));
                }
                let (index, current) = self.editable(id)?;
                let patch = UpdateTodoData {
                    scheduled_days: Some(Some(days.clone())),
                    ..Default::default()
                };
                let write = RemoteWrite::Schedule {
                    days,
                    today: self.today(),
                };
                self.apply_patch(MutationKind::Schedule, index, current, patch, write)
            }
            Mutation::Unschedule { id } => {
                let (index, current) = self.editable(id)?;
                if !current.is_scheduled() {
                    return Err(CoreError::InvalidInput("todo is not scheduled".to_string()));
                }
                let patch = UpdateTodoData {
                    scheduled_days: Some(None),
                    ..Default::default()
                };
                self.apply_patch(MutationKind::Schedule, index, current, patch, RemoteWrite::Unschedule)
            }
        }
    }

    /// Settle `ticket` with the outcome of its remote write.
    ///
    /// On success the authoritative row replaces the local one. On failure
    /// only the ticket's own row is put back, a [`Notice`] is queued and the
    /// error is returned.
    pub fn reconcile(
        &mut self,
        ticket: Ticket,
        result: Result<Settled, CoreError>,
    ) -> Result<Settled, CoreError> {
        let pending = self.log.take(ticket.todo_id);
        if ticket.kind == MutationKind::Add {
            self.add_in_flight = false;
            if let Some(last) = self.last_submitted.as_mut() {
                last.settled_at = Some(Utc::now());
            }
        }

        match result {
            Ok(settled) => {
                if let Some(row) = settled.todo() {
                    if let Some(at) = self.index_of(ticket.todo_id) {
                        self.todos[at] = row.clone();
                    }
                }
                Ok(settled)
            }
            Err(e) => {
                if let Some(pending) = pending {
                    pending.revert(&mut self.todos);
                }
                tracing::warn!(
                    todo_id = %ticket.todo_id,
                    kind = %ticket.kind,
                    error = %e,
                    "remote write failed; local change rolled back"
                );
                self.notices.push(Notice::for_failure(ticket.kind, &e));
                Err(e)
            }
        }
    }

    /// Apply, persist and reconcile in one go.
    pub async fn run(&mut self, mutation: Mutation) -> Result<Settled, CoreError> {
        let ticket = self.apply(mutation)?;
        let repo = Arc::clone(&self.repo);
        let result = ticket.persist(repo.as_ref()).await;
        self.reconcile(ticket, result)
    }

    pub async fn add(&mut self, text: impl Into<String>) -> Result<Settled, CoreError> {
        self.run(Mutation::Add { text: text.into() }).await
    }

    pub async fn toggle(&mut self, id: Uuid) -> Result<Settled, CoreError> {
        self.run(Mutation::Toggle { id }).await
    }

    pub async fn edit(&mut self, id: Uuid, text: impl Into<String>) -> Result<Settled, CoreError> {
        self.run(Mutation::Edit {
            id,
            text: text.into(),
        })
        .await
    }

    pub async fn delete(&mut self, id: Uuid) -> Result<Settled, CoreError> {
        self.run(Mutation::Delete { id }).await
    }

    pub async fn schedule(&mut self, id: Uuid, days: DaySet) -> Result<Settled, CoreError> {
        self.run(Mutation::Schedule { id, days }).await
    }

    pub async fn unschedule(&mut self, id: Uuid) -> Result<Settled, CoreError> {
        self.run(Mutation::Unschedule { id }).await
    }

    /// Move `active` to where `over` sits. Local only; never persisted.
    pub fn reorder(&mut self, active: Uuid, over: Uuid) -> bool {
        if active == over {
            return false;
        }
        let (Some(from), Some(to)) = (self.index_of(active), self.index_of(over)) else {
            return false;
        };
        let moved = self.todos.remove(from);
        self.todos.insert(to, moved);
        true
    }

    fn index_of(&self, id: Uuid) -> Option<usize> {
        self.todos.iter().position(|t| t.id == id)
    }

    fn editable(&self, id: Uuid) -> Result<(usize, Todo), CoreError> {
        // A pending delete has already removed the row locally.
        if self.log.is_busy(id) {
            return Err(CoreError::Busy(id));
        }
        let index = self
            .index_of(id)
            .ok_or_else(|| CoreError::NotFound(id.to_string()))?;
        Ok((index, self.todos[index].clone()))
    }

    fn apply_patch(
        &mut self,
        kind: MutationKind,
        index: usize,
        prior: Todo,
        patch: UpdateTodoData,
        write: RemoteWrite,
    ) -> Result<Ticket, CoreError> {
        let todo_id = prior.id;
        self.log.record(PendingMutation {
            kind,
            todo_id,
            prior: PriorState::Present {
                index,
                todo: prior,
            },
        })?;
        patch.apply_to(&mut self.todos[index]);
        Ok(Ticket {
            todo_id,
            kind,
            write,
        })
    }

    fn apply_add(&mut self, text: &str) -> Result<Ticket, CoreError> {
        let text = text.trim();
        if text.is_empty() {
            return Err(CoreError::InvalidInput("todo text cannot be empty".to_string()));
        }
        if self.add_in_flight {
            return Err(CoreError::AddInFlight);
        }
        if let Some(last) = &self.last_submitted {
            if last.blocks(text, self.config.debounce) {
                return Err(CoreError::DuplicateSubmission(text.to_string()));
            }
        }

        let date = self.tab.target_date(self.today());
        let data = NewTodo::new(self.owner.clone(), text, date);
        let provisional = Todo {
            id: Uuid::now_v7(),
            user_id: data.user_id.clone(),
            text: data.text.clone(),
            date,
            completed: false,
            scheduled_days: None,
            parent_todo_id: None,
            created_at: Utc::now(),
        };
        let todo_id = provisional.id;

        self.log.record(PendingMutation {
            kind: MutationKind::Add,
            todo_id,
            prior: PriorState::Absent,
        })?;
        self.todos.push(provisional);
        self.add_in_flight = true;
        self.last_submitted = Some(LastSubmission {
            text: text.to_string(),
            settled_at: None,
        });

        Ok(Ticket {
            todo_id,
            kind: MutationKind::Add,
            write: RemoteWrite::Insert(data),
        })
    }
}
