//! Managed-section replacement for section-text destinations.

/// Header text of a section line, without an optional trailing `#` comment.
fn section_header(line: &str) -> Option<&str> {
    let trimmed = line.trim();
    if !trimmed.starts_with('[') {
        return None;
    }

    // Track quotes so `#` and `]` inside quoted keys are not structural.
    let mut quote: Option<char> = None;
    let mut escaped = false;
    let mut close = None;
    for (idx, c) in trimmed.char_indices() {
        match quote {
            Some('"') if escaped => escaped = false,
            Some('"') if c == '\\' => escaped = true,
            Some(q) if c == q => quote = None,
            Some(_) => {}
            None => match c {
                '"' | '\'' => quote = Some(c),
                '#' => break,
                ']' => close = Some(idx),
                _ => {}
            },
        }
    }

    let close = close?;
    let rest = trimmed[close + 1..].trim_start();
    (rest.is_empty() || rest.starts_with('#')).then(|| &trimmed[..=close])
}

fn is_managed_header(header: &str, namespace: &str) -> bool {
    let Some(inner) = header.strip_prefix('[') else {
        return false;
    };
    inner
        .strip_prefix(namespace)
        .is_some_and(|rest| rest == "]" || rest.starts_with('.'))
}

/// Remove every section under `namespace`, keeping all other lines verbatim.
///
/// A managed region starts at a `[<namespace>]` or `[<namespace>.…]` header and
/// runs until the next header of any other section.
pub fn strip_managed_sections(content: &str, namespace: &str) -> String {
    if content.trim().is_empty() {
        return String::new();
    }

    let mut kept = Vec::new();
    let mut managed = false;
    for line in content.split('\n') {
        if let Some(header) = section_header(line) {
            managed = is_managed_header(header, namespace);
        }
        if !managed {
            kept.push(line);
        }
    }
    kept.join("\n")
}

/// Replace the managed sections of `existing` with `rendered`.
pub fn merge_sections(existing: &str, rendered: &str, namespace: &str) -> String {
    let stripped = strip_managed_sections(existing, namespace);
    let preserved = stripped.trim_end_matches(['\r', '\n']);
    let rendered = rendered.trim_end_matches(['\r', '\n']);

    let parts: Vec<&str> = [preserved, rendered]
        .into_iter()
        .filter(|part| !part.is_empty())
        .collect();
    if parts.is_empty() {
        return String::new();
    }
    format!("{}\n", parts.join("\n\n"))
}

#[cfg(test)]
mod tests {
    use super::*;

    const NS: &str = "mcp_servers";

    #[test]
    fn strips_namespace_and_subsections() {
        let existing = "model = \"o3\"\n\n[mcp_servers.old]\ncommand = \"x\"\n\n[mcp_servers.old.env]\nA = \"1\"\n\n[profiles.default]\nmodel = \"o4\"\n";

        let out = strip_managed_sections(existing, NS);

        assert_eq!(out, "model = \"o3\"\n\n[profiles.default]\nmodel = \"o4\"\n");
    }

    #[test]
    fn bare_namespace_header_is_managed() {
        let existing = "[mcp_servers]\nfoo = 1\n[other]\nbar = 2";
        assert_eq!(strip_managed_sections(existing, NS), "[other]\nbar = 2");
    }

    #[test]
    fn similar_prefix_is_not_managed() {
        let existing = "[mcp_servers_extra]\nkeep = true";
        assert_eq!(strip_managed_sections(existing, NS), existing);
    }

    #[test]
    fn header_with_comment_is_recognized() {
        let existing = "[mcp_servers.a] # generated\ncommand = \"x\"\n[tui] # ui\nstyle = \"dark\"";
        assert_eq!(
            strip_managed_sections(existing, NS),
            "[tui] # ui\nstyle = \"dark\""
        );
    }

    #[test]
    fn quoted_header_with_hash_and_comment() {
        let existing = "[keep]\nk = 1\n[mcp_servers.\"a#b\"] # note\ncommand = \"x\"\n";

        let out = strip_managed_sections(existing, NS);

        assert_eq!(out, "[keep]\nk = 1");
    }

    #[test]
    fn quoted_header_with_bracket_is_managed() {
        let existing = "[mcp_servers.\"x]y\"]\ncommand = \"x\"\n[keep]\nk = 1";
        assert_eq!(strip_managed_sections(existing, NS), "[keep]\nk = 1");
    }

    #[test]
    fn array_lines_are_not_headers() {
        let existing = "[mcp_servers.a]\nargs = [\n  [\"x\"], # inner\n]\n[keep]\nk = 1";
        assert_eq!(strip_managed_sections(existing, NS), "[keep]\nk = 1");
    }

    #[test]
    fn indented_headers_are_recognized() {
        let existing = "  [mcp_servers.a]\n  command = \"x\"\n  [keep]\n  a = 1";
        assert_eq!(strip_managed_sections(existing, NS), "  [keep]\n  a = 1");
    }

    #[test]
    fn merge_joins_with_single_blank_line() {
        let existing = "model = \"o3\"\n\n\n[mcp_servers.old]\ncommand = \"x\"\n";
        let rendered = "[mcp_servers.new]\ncommand = \"y\"";

        let out = merge_sections(existing, rendered, NS);

        assert_eq!(out, "model = \"o3\"\n\n[mcp_servers.new]\ncommand = \"y\"\n");
    }

    #[test]
    fn merge_into_empty_file() {
        assert_eq!(
            merge_sections("", "[mcp_servers.a]\nx = 1", NS),
            "[mcp_servers.a]\nx = 1\n"
        );
    }

    #[test]
    fn merge_with_nothing_is_empty() {
        assert_eq!(merge_sections("", "", NS), "");
        assert_eq!(merge_sections("[mcp_servers.a]\nx = 1\n", "", NS), "");
    }

    #[test]
    fn merge_keeps_crlf_lines_of_preserved_content() {
        let existing = "model = \"o3\"\r\n[mcp_servers.a]\r\nx = 1\r\n";
        let out = merge_sections(existing, "[mcp_servers.b]\ny = 2", NS);
        assert_eq!(out, "model = \"o3\"\n\n[mcp_servers.b]\ny = 2\n");
    }

    #[test]
    fn merge_is_idempotent() {
        let existing = "model = \"o3\"\n\n[mcp_servers.a]\nx = 1\n\n[history]\npersistence = \"none\"\n";
        let rendered = "[mcp_servers.a]\nx = 2";

        let once = merge_sections(existing, rendered, NS);
        let twice = merge_sections(&once, rendered, NS);

        assert_eq!(once, twice);
        assert_eq!(
            once,
            "model = \"o3\"\n\n[history]\npersistence = \"none\"\n\n[mcp_servers.a]\nx = 2\n"
        );
    }
}
