use anyhow::Result;
use chrono::{Duration, Utc};
use chrono_tz::Tz;
use daybook_core::repository::Repository;
use daybook_core::sync::TodoListViewModel;

use crate::cli::{ListCommand, ReorderCommand};
use crate::parser::parse_day;
use crate::util::{resolve_todo_id, short_ids};
use crate::views::table::display_todos;

pub async fn list_todos<R: Repository + ?Sized>(
    list: &TodoListViewModel<R>,
    command: ListCommand,
    tz: Tz,
) -> Result<()> {
    let today = list.today();
    let date = match (command.date, command.tomorrow) {
        (Some(date), _) => parse_day(&date, Utc::now().with_timezone(&tz))?,
        (None, true) => today + Duration::days(1),
        (None, false) => today,
    };

    display_todos(date, &list.day_view(date), &short_ids(list.todos()));
    Ok(())
}

/// Moves one todo onto another's position and prints the resulting day.
/// The new order only lives for this listing.
pub async fn reorder_todos<R: Repository + ?Sized>(
    list: &mut TodoListViewModel<R>,
    command: ReorderCommand,
) -> Result<()> {
    let active = resolve_todo_id(list.todos(), &command.id)?;
    let over = resolve_todo_id(list.todos(), &command.over)?;

    if !list.reorder(active, over) {
        println!("Nothing to reorder.");
        return Ok(());
    }

    let date = list.get(active).map(|t| t.date).unwrap_or_else(|| list.today());
    display_todos(date, &list.day_view(date), &short_ids(list.todos()));
    Ok(())
}
