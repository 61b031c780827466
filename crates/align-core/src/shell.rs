//! Shell command rendering for manually testing stdio servers.

use crate::model::{AttrValue, ServerDefinition};

/// Build a one-line POSIX shell command that launches the server.
///
/// Environment assignments come first in sorted order, followed by the
/// command and its string arguments. Returns `None` when the server has no
/// non-empty string `command`.
pub fn server_command(server: &ServerDefinition) -> Option<String> {
    let command = server.get_str("command").filter(|c| !c.trim().is_empty())?;

    let mut parts = Vec::new();

    if let Some(env) = server.get("env").and_then(AttrValue::as_map) {
        let assignments: Vec<String> = env
            .iter()
            .map(|(key, value)| {
                let value = value.to_string();
                if is_variable_reference(&value) {
                    format!("{key}={value}")
                } else {
                    format!("{key}={}", shell_quote(&value))
                }
            })
            .collect();
        if !assignments.is_empty() {
            parts.push(assignments.join(" "));
        }
    }

    parts.push(shell_quote(command));
    match server.get("args") {
        Some(AttrValue::List(items)) => {
            parts.extend(items.iter().filter_map(AttrValue::as_str).map(shell_quote));
        }
        Some(AttrValue::String(arg)) => parts.push(shell_quote(arg)),
        _ => {}
    }

    Some(parts.join(" "))
}

fn is_variable_reference(value: &str) -> bool {
    value.starts_with('$')
}

fn is_safe(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '.' | '/' | '@' | '-' | '_' | ':' | '+' | '=')
}

/// Quote a word for a POSIX shell.
///
/// Variable references (`$VAR`, `${VAR}`) and words made only of safe
/// characters are returned unchanged.
pub fn shell_quote(word: &str) -> String {
    if word.is_empty() {
        return "''".to_string();
    }
    if is_variable_reference(word) || word.chars().all(is_safe) {
        return word.to_string();
    }
    format!("'{}'", word.replace('\'', "'\\''"))
}
