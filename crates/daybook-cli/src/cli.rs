use clap::{Parser, Subcommand, ValueEnum};
use daybook_core::models::Mood;

/// Per-day todo lists with weekly recurring todos
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Act as this owner instead of the configured one
    #[arg(long, global = true)]
    pub owner: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Add a todo for today (or tomorrow)
    Add(AddCommand),
    /// List todos for one day
    List(ListCommand),
    /// Flip a todo between done and not done
    Toggle(IdCommand),
    /// Replace the text of a todo
    Edit(EditCommand),
    /// Delete a todo
    Delete(DeleteCommand),
    /// Repeat a todo on a set of weekdays
    Schedule(ScheduleCommand),
    /// Stop repeating a todo
    Unschedule(IdCommand),
    /// Move a todo to another todo's position in the listing
    Reorder(ReorderCommand),
    /// Show one week of completed and pending todos
    Week(WeekCommand),
    /// List recurring todos
    Patterns,
    /// Create today's copies of recurring todos
    Expand(ExpandCommand),
    /// Serve the scheduled-todo trigger endpoint over HTTP
    Serve(ServeCommand),
    /// Write down, list and manage quick notes
    Note(NoteCommand),
    /// Log how you feel and look back at it
    Mood(MoodCommand),
}

#[derive(Parser, Debug, Clone)]
pub struct AddCommand {
    /// The text of the todo
    #[arg(required = true, num_args = 1..)]
    pub text: Vec<String>,
    /// Add to tomorrow's list
    #[arg(long, short)]
    pub tomorrow: bool,
    /// Also repeat the todo on these days (e.g. "mon,wed" or "weekdays")
    #[arg(long)]
    pub every: Option<String>,
}

#[derive(Parser, Debug, Clone)]
pub struct ListCommand {
    /// Show tomorrow's list
    #[arg(long, short, conflicts_with = "date")]
    pub tomorrow: bool,
    /// Show the list of this day (e.g. "2024-05-01", "yesterday", "last friday")
    #[arg(long, short)]
    pub date: Option<String>,
}

#[derive(Parser, Debug, Clone)]
pub struct IdCommand {
    /// The ID (or unique ID prefix) of the todo
    pub id: String,
}

#[derive(Parser, Debug, Clone)]
pub struct EditCommand {
    /// The ID (or unique ID prefix) of the todo
    pub id: String,
    /// The new text
    #[arg(required = true, num_args = 1..)]
    pub text: Vec<String>,
}

#[derive(Parser, Debug, Clone)]
pub struct DeleteCommand {
    /// The ID (or unique ID prefix) of the todo
    pub id: String,
    /// Do not ask for confirmation
    #[arg(long, short)]
    pub force: bool,
}

#[derive(Parser, Debug, Clone)]
pub struct ScheduleCommand {
    /// The ID (or unique ID prefix) of the todo
    pub id: String,
    /// Days to repeat on (mon,tue,wed,thu,fri,sat,sun, "weekdays", "weekends", "daily")
    #[arg(required = true, num_args = 1..)]
    pub days: Vec<String>,
}

#[derive(Parser, Debug, Clone)]
pub struct ReorderCommand {
    /// The todo to move
    pub id: String,
    /// The todo whose position it takes
    pub over: String,
}

#[derive(Parser, Debug, Clone)]
pub struct WeekCommand {
    /// Year (defaults to the current year)
    #[arg(long)]
    pub year: Option<i32>,
    /// Month 1-12 (defaults to the current month)
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..=12))]
    pub month: Option<u32>,
    /// Week of the month 0-6 (defaults to the current week)
    #[arg(long, value_parser = clap::value_parser!(u32).range(0..=6))]
    pub week: Option<u32>,
}

#[derive(Parser, Debug, Clone)]
pub struct ExpandCommand {
    /// Expand for this day instead of today
    #[arg(long)]
    pub date: Option<String>,
    /// Print the report as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Parser, Debug, Clone)]
pub struct ServeCommand {
    /// Listen address, overrides the configured one
    #[arg(long)]
    pub bind: Option<String>,
}

#[derive(Parser, Debug, Clone)]
pub struct NoteCommand {
    #[command(subcommand)]
    pub command: NoteSubcommand,
}

#[derive(Subcommand, Debug, Clone)]
pub enum NoteSubcommand {
    /// Save a new note
    Add(AddNoteCommand),
    /// List notes, newest first
    List(ListNotesCommand),
    /// Replace the text of a note
    Edit(EditNoteCommand),
    /// Delete a note
    Delete(DeleteNoteCommand),
}

#[derive(Parser, Debug, Clone)]
pub struct AddNoteCommand {
    /// The text of the note
    #[arg(required = true, num_args = 1..)]
    pub text: Vec<String>,
}

#[derive(Parser, Debug, Clone)]
pub struct ListNotesCommand {
    /// Only notes written today
    #[arg(long)]
    pub today: bool,
}

#[derive(Parser, Debug, Clone)]
pub struct EditNoteCommand {
    /// The note number shown by `note list`
    pub id: i64,
    /// The new text
    #[arg(required = true, num_args = 1..)]
    pub text: Vec<String>,
}

#[derive(Parser, Debug, Clone)]
pub struct DeleteNoteCommand {
    /// The note number shown by `note list`
    pub id: i64,
    /// Do not ask for confirmation
    #[arg(long, short)]
    pub force: bool,
}

#[derive(Parser, Debug, Clone)]
pub struct MoodCommand {
    #[command(subcommand)]
    pub command: MoodSubcommand,
}

#[derive(Subcommand, Debug, Clone)]
pub enum MoodSubcommand {
    /// Record your current mood (happy, neutral or sad)
    Log(LogMoodCommand),
    /// Show logged moods over a recent period
    History(MoodHistoryCommand),
}

#[derive(Parser, Debug, Clone)]
pub struct LogMoodCommand {
    pub mood: Mood,
}

#[derive(Parser, Debug, Clone)]
pub struct MoodHistoryCommand {
    #[arg(long, value_enum, default_value_t = MoodRange::Week)]
    pub range: MoodRange,
}

/// How far back the mood history reaches
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoodRange {
    /// The last 7 days
    Week,
    /// The last 30 days
    Month,
    /// The last 365 days
    Year,
}

impl MoodRange {
    pub fn days(&self) -> i64 {
        match self {
            MoodRange::Week => 7,
            MoodRange::Month => 30,
            MoodRange::Year => 365,
        }
    }
}
