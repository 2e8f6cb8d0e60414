use clap::Parser;
use daybook_core::clock::{Clock, SystemClock};
use daybook_core::db;
use daybook_core::error::CoreError;
use daybook_core::repository::SqliteRepository;
use daybook_core::sync::TodoListViewModel;
use owo_colors::{OwoColorize, Style};
use std::sync::Arc;

use cli::Commands;
use config::Config;

mod cli;
mod commands;
mod config;
mod logging;
mod parser;
mod server;
mod timezone;
mod util;
mod views;

#[tokio::main]
async fn main() {
    let cli = cli::Cli::parse();

    let config = match Config::new() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{} invalid configuration: {}", "Error:".red().bold(), e);
            std::process::exit(1);
        }
    };

    let default_level = match cli.command {
        Commands::Serve(_) => "info",
        _ => "warn",
    };
    logging::init_logging(config.log_format, default_level);

    if let Err(e) = run(cli, config).await {
        handle_error(e);
        std::process::exit(1);
    }
}

async fn run(cli: cli::Cli, config: Config) -> anyhow::Result<()> {
    let tz = config.timezone()?;
    let pool = db::establish_connection(&config.database_path).await?;
    let repository = Arc::new(SqliteRepository::new(pool));
    let clock: Arc<dyn Clock> = Arc::new(SystemClock::new(tz));
    let owner = cli.owner.unwrap_or_else(|| config.owner.clone());

    match cli.command {
        Commands::Expand(command) => {
            commands::expand::expand(repository, clock, command, tz).await
        }
        Commands::Serve(command) => {
            let bind = command.bind.unwrap_or_else(|| config.bind.clone());
            server::serve(server::AppState::new(repository, clock), &bind).await
        }
        Commands::Patterns => commands::schedule::list_patterns(repository.as_ref(), &owner).await,
        Commands::Note(command) => {
            commands::note::handle_note_command(repository.as_ref(), clock.as_ref(), &owner, command, tz)
                .await
        }
        Commands::Mood(command) => {
            commands::mood::handle_mood_command(repository.as_ref(), &owner, command, tz).await
        }
        command => {
            let mut list =
                TodoListViewModel::load(repository, clock, owner, config.sync_config()).await?;
            match command {
                Commands::Add(command) => commands::add::add_todo(&mut list, command).await,
                Commands::List(command) => commands::list::list_todos(&list, command, tz).await,
                Commands::Toggle(command) => commands::edit::toggle_todo(&mut list, command).await,
                Commands::Edit(command) => commands::edit::edit_todo(&mut list, command).await,
                Commands::Delete(command) => commands::edit::delete_todo(&mut list, command).await,
                Commands::Schedule(command) => {
                    commands::schedule::schedule_todo(&mut list, command).await
                }
                Commands::Unschedule(command) => {
                    commands::schedule::unschedule_todo(&mut list, command).await
                }
                Commands::Reorder(command) => {
                    commands::list::reorder_todos(&mut list, command).await
                }
                Commands::Week(command) => commands::week::show_week(&list, command).await,
                Commands::Expand(_)
                | Commands::Serve(_)
                | Commands::Patterns
                | Commands::Note(_)
                | Commands::Mood(_) => Ok(()),
            }
        }
    }
}

fn handle_error(err: anyhow::Error) {
    let error_style = Style::new().red().bold();

    if let Some(core_error) = err.downcast_ref::<CoreError>() {
        match core_error {
            CoreError::NotFound(s) => {
                eprintln!("{} {}", "Error:".style(error_style), s);
            }
            CoreError::AmbiguousId(todos) => {
                eprintln!("{}", "Error: Ambiguous ID.".style(error_style));
                eprintln!("Did you mean one of these?");
                for (id, text) in todos {
                    eprintln!("  {} ({})", id.yellow(), text);
                }
            }
            CoreError::InvalidInput(s) => {
                eprintln!("{} Invalid input: {}", "Error:".style(error_style), s);
            }
            CoreError::InvalidTimezone(s) => {
                eprintln!("{} Invalid timezone: {}", "Error:".style(error_style), s.yellow());
            }
            CoreError::InvalidDay(s) => {
                eprintln!("{} {}", "Error:".style(error_style), s);
            }
            CoreError::Database(e) => {
                eprintln!("{} Database error: {}", "Error:".style(error_style), e);
            }
            _ => eprintln!("{} {}", "Error:".style(error_style), err),
        }
    } else {
        eprintln!("{} {:#}", "Error:".style(error_style), err);
    }
}
