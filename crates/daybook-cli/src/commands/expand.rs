use anyhow::Result;
use chrono::Utc;
use chrono_tz::Tz;
use daybook_core::clock::Clock;
use daybook_core::recurrence::InstanceExpander;
use daybook_core::repository::Repository;
use std::sync::Arc;

use crate::cli::ExpandCommand;
use crate::parser::parse_day;
use crate::views::table::display_report;

pub async fn expand<R: Repository + ?Sized>(
    repo: Arc<R>,
    clock: Arc<dyn Clock>,
    command: ExpandCommand,
    tz: Tz,
) -> Result<()> {
    let expander = InstanceExpander::new(repo, clock);
    let report = match command.date {
        Some(date) => {
            let date = parse_day(&date, Utc::now().with_timezone(&tz))?;
            expander.run_for(date).await?
        }
        None => expander.run().await?,
    };

    if command.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        display_report(&report);
    }
    Ok(())
}
