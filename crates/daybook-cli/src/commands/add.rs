use anyhow::{anyhow, Result};
use daybook_core::error::CoreError;
use daybook_core::models::DayTab;
use daybook_core::repository::Repository;
use daybook_core::sync::TodoListViewModel;
use owo_colors::OwoColorize;

use crate::cli::AddCommand;
use crate::parser::parse_days;

pub async fn add_todo<R: Repository + ?Sized>(
    list: &mut TodoListViewModel<R>,
    command: AddCommand,
) -> Result<()> {
    // Validate the days before anything is written.
    let days = command
        .every
        .map(|every| parse_days(&[every]))
        .transpose()?;

    list.set_tab(if command.tomorrow {
        DayTab::Tomorrow
    } else {
        DayTab::Today
    });

    let settled = match list.add(command.text.join(" ")).await {
        Ok(settled) => settled,
        Err(CoreError::DuplicateSubmission(text)) => {
            println!(
                "{} '{}' was just added; ignoring the repeat",
                "Warning:".yellow().bold(),
                text
            );
            return Ok(());
        }
        Err(e) => return Err(e.into()),
    };
    let todo = settled
        .todo()
        .cloned()
        .ok_or_else(|| anyhow!("store did not return the new todo"))?;
    println!("Added todo: '{}' for {}", todo.text, todo.date);

    if let Some(days) = days {
        list.schedule(todo.id, days.clone()).await?;
        println!("{} {}", "Repeats on".cyan(), days);
    }

    Ok(())
}
