use anyhow::Result;
use chrono::{Duration, Utc};
use chrono_tz::Tz;
use daybook_core::models::{average_mood_score, NewMoodEntry};
use daybook_core::repository::MoodRepository;
use owo_colors::OwoColorize;

use crate::cli::{MoodCommand, MoodSubcommand};
use crate::views::table::display_moods;

const CHEERS: &[&str] = &[
    "Whatever today holds, you showed up for it.",
    "Small steps still count.",
    "Be as kind to yourself as you would be to a friend.",
    "Tomorrow is a fresh page.",
    "Thanks for checking in with yourself.",
];

pub async fn handle_mood_command<R: MoodRepository + ?Sized>(
    repo: &R,
    owner: &str,
    command: MoodCommand,
    tz: Tz,
) -> Result<()> {
    match command.command {
        MoodSubcommand::Log(log) => {
            let entry = repo
                .insert_mood(NewMoodEntry {
                    user_id: owner.to_string(),
                    mood: log.mood,
                })
                .await?;
            println!("Logged mood: {}", entry.mood);
            println!("{}", CHEERS[fastrand::usize(..CHEERS.len())].dimmed());
        }
        MoodSubcommand::History(history) => {
            let since = Utc::now() - Duration::days(history.range.days());
            let entries = repo.find_moods_since(owner, since).await?;
            display_moods(&entries, tz);
            if let Some(average) = average_mood_score(&entries) {
                println!(
                    "Average over the last {} days: {:.2} (sad 1, neutral 2, happy 3)",
                    history.range.days(),
                    average
                );
            }
        }
    }
    Ok(())
}
