use anyhow::Result;
use chrono_tz::Tz;
use daybook_core::clock::Clock;
use daybook_core::models::NewNote;
use daybook_core::repository::NoteRepository;
use daybook_core::timezone::local_date;
use dialoguer::Confirm;

use crate::cli::{NoteCommand, NoteSubcommand};
use crate::views::table::display_notes;

pub async fn handle_note_command<R: NoteRepository + ?Sized>(
    repo: &R,
    clock: &dyn Clock,
    owner: &str,
    command: NoteCommand,
    tz: Tz,
) -> Result<()> {
    match command.command {
        NoteSubcommand::Add(add) => {
            let note = repo
                .insert_note(NewNote::new(owner, add.text.join(" ")))
                .await?;
            println!("Saved note #{}", note.id);
        }
        NoteSubcommand::List(list) => {
            let mut notes = repo.find_notes_for_owner(owner).await?;
            if list.today {
                let today = clock.today();
                notes.retain(|note| local_date(note.created_at, tz) == today);
            }
            display_notes(&notes, tz);
        }
        NoteSubcommand::Edit(edit) => {
            let note = repo.update_note(edit.id, &edit.text.join(" ")).await?;
            println!("Updated note #{}: '{}'", note.id, note.note_text);
        }
        NoteSubcommand::Delete(delete) => {
            if !delete.force {
                let confirmation = Confirm::new()
                    .with_prompt(format!("Are you sure you want to delete note #{}?", delete.id))
                    .default(false)
                    .interact()
                    .unwrap_or(false);

                if !confirmation {
                    println!("Deletion cancelled.");
                    return Ok(());
                }
            }
            repo.delete_note(delete.id).await?;
            println!("Deleted note #{}", delete.id);
        }
    }
    Ok(())
}
