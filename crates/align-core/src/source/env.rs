//! Environment variable expansion for source values.
//!
//! Supports `$VAR`, `${VAR}` and `${VAR:-default}`. The default is used when
//! the variable is unset or empty; otherwise unset variables expand to "".

use crate::model::AttrValue;

/// Expand variables in `input` using the process environment.
pub fn expand_env(input: &str) -> String {
    expand(input, |name| std::env::var(name).ok())
}

/// Expand variables in `input` using `lookup` to resolve names.
pub fn expand<F>(input: &str, lookup: F) -> String
where
    F: Fn(&str) -> Option<String>,
{
    let mut out = String::with_capacity(input.len());
    let mut rest = input;

    while let Some(idx) = rest.find('$') {
        out.push_str(&rest[..idx]);
        let after = &rest[idx + 1..];

        if let Some(braced) = after.strip_prefix('{') {
            let Some(end) = braced.find('}') else {
                // Unterminated: keep the text as written.
                out.push_str(&rest[idx..]);
                return out;
            };
            out.push_str(&resolve_braced(&braced[..end], &lookup));
            rest = &braced[end + 1..];
            continue;
        }

        let name_len = after
            .find(|c: char| !(c.is_ascii_alphanumeric() || c == '_'))
            .unwrap_or(after.len());
        if name_len == 0 {
            out.push('$');
        } else {
            out.push_str(&lookup(&after[..name_len]).unwrap_or_default());
        }
        rest = &after[name_len..];
    }

    out.push_str(rest);
    out
}

fn resolve_braced<F>(expr: &str, lookup: &F) -> String
where
    F: Fn(&str) -> Option<String>,
{
    match expr.split_once(":-") {
        Some((name, default)) => lookup(name)
            .filter(|value| !value.is_empty())
            .unwrap_or_else(|| default.to_string()),
        None => lookup(expr).unwrap_or_default(),
    }
}

/// Expand every string inside `value`, recursing into lists and mappings.
pub(crate) fn expand_value<F>(value: &mut AttrValue, lookup: &F)
where
    F: Fn(&str) -> Option<String>,
{
    match value {
        AttrValue::String(s) => *s = expand(s, lookup),
        AttrValue::List(items) => items.iter_mut().for_each(|item| expand_value(item, lookup)),
        AttrValue::Map(map) => map.values_mut().for_each(|item| expand_value(item, lookup)),
        AttrValue::Bool(_) | AttrValue::Integer(_) | AttrValue::Float(_) => {}
    }
}
