use chrono::NaiveDate;
use chrono_tz::Tz;
use comfy_table::{Attribute, Cell, Color, Row, Table};
use daybook_core::calendar::DaySummary;
use daybook_core::models::{Mood, MoodEntry, Note, PatternWithTemplate, Todo};
use daybook_core::recurrence::ExpansionReport;
use std::collections::HashMap;
use uuid::Uuid;

pub fn display_todos(date: NaiveDate, todos: &[&Todo], short_ids: &HashMap<Uuid, String>) {
    println!("{}", date.format("%A, %B %-d %Y"));
    if todos.is_empty() {
        println!("No todos found.");
        return;
    }

    let mut table = Table::new();
    table.set_header(vec!["ID", "Done", "Todo", "Repeats"]);

    for todo in todos {
        let mut row = Row::new();
        let short = short_ids
            .get(&todo.id)
            .cloned()
            .unwrap_or_else(|| todo.id.simple().to_string());
        row.add_cell(Cell::new(short));

        row.add_cell(if todo.completed {
            Cell::new("✔").fg(Color::Green)
        } else {
            Cell::new(" ")
        });

        let mut display_text = String::new();
        if todo.parent_todo_id.is_some() {
            display_text.push('↻');
            display_text.push(' ');
        }
        display_text.push_str(&todo.text);
        let mut text_cell = Cell::new(display_text);
        if todo.completed {
            text_cell = text_cell
                .add_attribute(Attribute::CrossedOut)
                .fg(Color::DarkGrey);
        }
        row.add_cell(text_cell);

        row.add_cell(match &todo.scheduled_days {
            Some(days) if days.is_every_day() => Cell::new("every day").fg(Color::Cyan),
            Some(days) => Cell::new(days.to_string()).fg(Color::Cyan),
            None => Cell::new(""),
        });
        table.add_row(row);
    }

    println!("{table}");
}

pub fn display_week(week: &[DaySummary]) {
    let mut table = Table::new();
    table.set_header(vec!["Day", "Completed", "Pending"]);

    for day in week {
        let mut row = Row::new();
        row.add_cell(Cell::new(day.date.format("%a %d %b")).add_attribute(Attribute::Bold));
        row.add_cell(bullet_cell(&day.completed).fg(Color::Green));
        row.add_cell(bullet_cell(&day.pending));
        table.add_row(row);
    }

    println!("{table}");
}

fn bullet_cell(todos: &[Todo]) -> Cell {
    if todos.is_empty() {
        return Cell::new("-");
    }
    let lines: Vec<String> = todos.iter().map(|t| format!("• {}", t.text)).collect();
    Cell::new(lines.join("\n"))
}

pub fn display_patterns(patterns: &[PatternWithTemplate]) {
    if patterns.is_empty() {
        println!("No recurring todos found.");
        return;
    }

    let mut table = Table::new();
    table.set_header(vec!["Todo", "Days", "Active", "Last Created"]);

    for entry in patterns {
        let mut row = Row::new();
        row.add_cell(match &entry.template {
            Some(template) => Cell::new(&template.text),
            None => Cell::new("(deleted)").fg(Color::DarkGrey),
        });
        row.add_cell(Cell::new(entry.pattern.days.to_string()));
        row.add_cell(if entry.pattern.active {
            Cell::new("yes").fg(Color::Green)
        } else {
            Cell::new("paused").fg(Color::Yellow)
        });
        row.add_cell(Cell::new(
            entry
                .pattern
                .last_created_date
                .map(|d| d.to_string())
                .unwrap_or_else(|| "never".to_string()),
        ));
        table.add_row(row);
    }

    println!("{table}");
}

pub fn display_report(report: &ExpansionReport) {
    println!(
        "{} ({}): checked {} pattern(s), {} due, {} created, {} already done, {} failed",
        report.date,
        report.day,
        report.patterns_checked,
        report.patterns_due,
        report.created_count(),
        report.skipped_already_expanded,
        report.failures.len()
    );
    if report.created.is_empty() && report.failures.is_empty() {
        return;
    }

    let mut table = Table::new();
    table.set_header(vec!["Owner", "Todo", "Result"]);
    for todo in &report.created {
        table.add_row(vec![
            Cell::new(&todo.user_id),
            Cell::new(&todo.text),
            Cell::new("created").fg(Color::Green),
        ]);
    }
    for failure in &report.failures {
        table.add_row(vec![
            Cell::new("-"),
            Cell::new(failure.parent_id.to_string()),
            Cell::new(&failure.reason).fg(Color::Red),
        ]);
    }
    println!("{table}");
}

pub fn display_notes(notes: &[Note], tz: Tz) {
    if notes.is_empty() {
        println!("No notes found.");
        return;
    }

    let mut table = Table::new();
    table.set_header(vec!["#", "Written", "Note"]);
    for note in notes {
        table.add_row(vec![
            Cell::new(note.id),
            Cell::new(note.created_at.with_timezone(&tz).format("%a %d %b %H:%M")).fg(Color::DarkGrey),
            Cell::new(&note.note_text),
        ]);
    }
    println!("{table}");
}

pub fn display_moods(entries: &[MoodEntry], tz: Tz) {
    if entries.is_empty() {
        println!("No moods logged.");
        return;
    }

    let mut table = Table::new();
    table.set_header(vec!["When", "Mood"]);
    for entry in entries {
        let color = match entry.mood {
            Mood::Happy => Color::Green,
            Mood::Neutral => Color::Yellow,
            Mood::Sad => Color::Blue,
        };
        table.add_row(vec![
            Cell::new(entry.created_at.with_timezone(&tz).format("%a %d %b %H:%M")),
            Cell::new(entry.mood).fg(color),
        ]);
    }
    println!("{table}");
}
