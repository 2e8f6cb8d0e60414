use anyhow::{anyhow, Result};
use daybook_core::error::CoreError;
use daybook_core::models::Todo;
use std::collections::{HashMap, HashSet};
use uuid::Uuid;

const MIN_PREFIX: usize = 2;
const MIN_DISPLAY: usize = 8;

/// Resolve a full ID or a unique prefix against the owner's todos.
///
/// Hyphens are ignored, so prefixes copied from either ID form work.
pub fn resolve_todo_id(todos: &[Todo], short_id: &str) -> Result<Uuid> {
    let needle: String = short_id
        .trim()
        .chars()
        .filter(|c| *c != '-')
        .collect::<String>()
        .to_lowercase();
    if needle.len() < MIN_PREFIX {
        return Err(anyhow!(CoreError::InvalidInput(
            "Short ID must be at least 2 characters long.".to_string()
        )));
    }

    let matches: Vec<&Todo> = todos
        .iter()
        .filter(|t| t.id.simple().to_string().starts_with(&needle))
        .collect();

    match matches.as_slice() {
        [todo] => Ok(todo.id),
        [] => Err(anyhow!(CoreError::NotFound(format!(
            "No todo found with ID prefix '{}'",
            short_id
        )))),
        _ => {
            let candidates: Vec<(String, String)> = matches
                .into_iter()
                .map(|t| (t.id.to_string(), t.text.clone()))
                .collect();
            Err(anyhow!(CoreError::AmbiguousId(candidates)))
        }
    }
}

/// Shortest display prefix (at least 8 hex digits) that is unique among `todos`.
///
/// Time-ordered IDs share their leading digits, so a fixed short prefix is
/// not enough once several todos are created in the same minute.
pub fn short_ids(todos: &[Todo]) -> HashMap<Uuid, String> {
    let full: Vec<(Uuid, String)> = todos
        .iter()
        .map(|t| (t.id, t.id.simple().to_string()))
        .collect();

    let mut len = MIN_DISPLAY;
    while len < 32 {
        let unique: HashSet<&str> = full.iter().map(|(_, s)| &s[..len]).collect();
        if unique.len() == full.len() {
            break;
        }
        len += 2;
    }

    full.into_iter()
        .map(|(id, s)| (id, s[..len.min(32)].to_string()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, Utc};

    fn todo(id: &str, text: &str) -> Todo {
        Todo {
            id: Uuid::parse_str(id).unwrap(),
            user_id: "ann".to_string(),
            text: text.to_string(),
            date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            completed: false,
            scheduled_days: None,
            parent_todo_id: None,
            created_at: Utc::now(),
        }
    }

    fn sample() -> Vec<Todo> {
        vec![
            todo("018f0000-aaaa-7000-8000-000000000001", "first"),
            todo("018f0000-aaab-7000-8000-000000000002", "second"),
            todo("028f0000-0000-7000-8000-000000000003", "third"),
        ]
    }

    #[test]
    fn test_unique_prefix_resolves() {
        let todos = sample();
        assert_eq!(resolve_todo_id(&todos, "02").unwrap(), todos[2].id);
        assert_eq!(resolve_todo_id(&todos, "018f0000-aaab").unwrap(), todos[1].id);
        assert_eq!(resolve_todo_id(&todos, "018F0000AAAA").unwrap(), todos[0].id);
    }

    #[test]
    fn test_ambiguous_prefix_lists_candidates() {
        let err = resolve_todo_id(&sample(), "018f").unwrap_err();
        match err.downcast_ref::<CoreError>() {
            Some(CoreError::AmbiguousId(candidates)) => assert_eq!(candidates.len(), 2),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_short_or_unknown_prefix_is_rejected() {
        let todos = sample();
        let too_short = resolve_todo_id(&todos, "0").unwrap_err();
        assert!(matches!(
            too_short.downcast_ref::<CoreError>(),
            Some(CoreError::InvalidInput(_))
        ));
        let missing = resolve_todo_id(&todos, "ff").unwrap_err();
        assert!(matches!(
            missing.downcast_ref::<CoreError>(),
            Some(CoreError::NotFound(_))
        ));
    }

    #[test]
    fn test_short_ids_are_unique() {
        let todos = sample();
        let ids = short_ids(&todos);
        assert_eq!(ids[&todos[0].id], "018f0000aaaa");
        assert_eq!(ids[&todos[2].id], "028f00000000");
        let unique: HashSet<&String> = ids.values().collect();
        assert_eq!(unique.len(), 3);
    }
}
