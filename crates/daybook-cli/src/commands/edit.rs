use anyhow::Result;
use daybook_core::repository::Repository;
use daybook_core::sync::TodoListViewModel;
use dialoguer::Confirm;

use crate::cli::{DeleteCommand, EditCommand, IdCommand};
use crate::util::resolve_todo_id;

pub async fn toggle_todo<R: Repository + ?Sized>(
    list: &mut TodoListViewModel<R>,
    command: IdCommand,
) -> Result<()> {
    let todo_id = resolve_todo_id(list.todos(), &command.id)?;
    let settled = list.toggle(todo_id).await?;

    if let Some(todo) = settled.todo() {
        if todo.completed {
            println!("Completed todo: '{}'", todo.text);
        } else {
            println!("Reopened todo: '{}'", todo.text);
        }
    }
    Ok(())
}

pub async fn edit_todo<R: Repository + ?Sized>(
    list: &mut TodoListViewModel<R>,
    command: EditCommand,
) -> Result<()> {
    let todo_id = resolve_todo_id(list.todos(), &command.id)?;
    let settled = list.edit(todo_id, command.text.join(" ")).await?;

    if let Some(todo) = settled.todo() {
        println!("Updated todo: '{}'", todo.text);
    }
    Ok(())
}

pub async fn delete_todo<R: Repository + ?Sized>(
    list: &mut TodoListViewModel<R>,
    command: DeleteCommand,
) -> Result<()> {
    let todo_id = resolve_todo_id(list.todos(), &command.id)?;
    let text = list
        .get(todo_id)
        .map(|t| t.text.clone())
        .unwrap_or_default();

    if !command.force {
        let confirmation = Confirm::new()
            .with_prompt(format!("Are you sure you want to delete todo '{}'?", text))
            .default(false)
            .interact()
            .unwrap_or(false);

        if !confirmation {
            println!("Deletion cancelled.");
            return Ok(());
        }
    }

    list.delete(todo_id).await?;
    println!("Deleted todo: '{}'", text);
    Ok(())
}
