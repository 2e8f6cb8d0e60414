use anyhow::Result;
use daybook_core::repository::Repository;
use daybook_core::sync::{Settled, TodoListViewModel};
use owo_colors::OwoColorize;

use crate::cli::{IdCommand, ScheduleCommand};
use crate::parser::parse_days;
use crate::util::resolve_todo_id;
use crate::views::table::display_patterns;

pub async fn schedule_todo<R: Repository + ?Sized>(
    list: &mut TodoListViewModel<R>,
    command: ScheduleCommand,
) -> Result<()> {
    let todo_id = resolve_todo_id(list.todos(), &command.id)?;
    let days = parse_days(&command.days)?;

    if let Settled::Scheduled { todo, pattern } = list.schedule(todo_id, days).await? {
        let label = if pattern.days.is_every_day() {
            "every day".to_string()
        } else {
            pattern.days.to_string()
        };
        println!("'{}' now repeats {}", todo.text, label.cyan());
    }
    Ok(())
}

pub async fn unschedule_todo<R: Repository + ?Sized>(
    list: &mut TodoListViewModel<R>,
    command: IdCommand,
) -> Result<()> {
    let todo_id = resolve_todo_id(list.todos(), &command.id)?;
    let settled = list.unschedule(todo_id).await?;

    if let Some(todo) = settled.todo() {
        println!("'{}' no longer repeats", todo.text);
    }
    Ok(())
}

pub async fn list_patterns<R: Repository + ?Sized>(repo: &R, owner: &str) -> Result<()> {
    let patterns = repo.find_patterns_for_owner(owner).await?;
    display_patterns(&patterns);
    Ok(())
}
