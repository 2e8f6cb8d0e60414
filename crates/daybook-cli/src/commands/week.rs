use anyhow::Result;
use chrono::Datelike;
use daybook_core::calendar::week_of_month;
use daybook_core::repository::Repository;
use daybook_core::sync::TodoListViewModel;

use crate::cli::WeekCommand;
use crate::views::table::display_week;

pub async fn show_week<R: Repository + ?Sized>(
    list: &TodoListViewModel<R>,
    command: WeekCommand,
) -> Result<()> {
    let today = list.today();
    let year = command.year.unwrap_or_else(|| today.year());
    let month = command.month.unwrap_or_else(|| today.month());
    let week = command.week.unwrap_or_else(|| {
        if year == today.year() && month == today.month() {
            week_of_month(today)
        } else {
            1
        }
    });

    let summary = list.week_summary(year, month, week)?;
    println!("Week {} of {}-{:02}", week, year, month);
    display_week(&summary);
    Ok(())
}
