//! Helpers for pulling JSON out of free-form model replies.

/// Removes a single surrounding markdown code fence (```` ```json ... ``` ````).
pub fn strip_code_fence(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    // Drop the info string (e.g. "json") on the opening line.
    let body = match rest.find('\n') {
        Some(idx) => &rest[idx + 1..],
        None => return trimmed,
    };
    body.trim_end()
        .strip_suffix("```")
        .unwrap_or(body)
        .trim()
}

/// Returns the balanced `[ ... ]` span starting at byte offset `start`.
///
/// `text[start..]` must begin with `[`. Brackets inside JSON strings are
/// ignored. Returns `None` when the array is never closed.
pub fn balanced_array_at(text: &str, start: usize) -> Option<&str> {
    let tail = text.get(start..)?;
    if !tail.starts_with('[') {
        return None;
    }

    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (idx, ch) in tail.char_indices() {
        if in_string {
            match ch {
                _ if escaped => escaped = false,
                '\\' => escaped = true,
                '"' => in_string = false,
                _ => {}
            }
            continue;
        }
        match ch {
            '"' => in_string = true,
            '[' => depth += 1,
            ']' => {
                depth -= 1;
                if depth == 0 {
                    return Some(&tail[..=idx]);
                }
            }
            _ => {}
        }
    }
    None
}

/// Returns the first balanced array that stands on its own lines.
///
/// The opening `[` must be the first non-blank character of its line and the
/// closing `]` the last non-blank character of its line (a trailing `,` or
/// `.` is tolerated). Brackets inside prose, such as `i.e. [] items`, are
/// never returned.
pub fn standalone_array(text: &str) -> Option<&str> {
    let mut line_start = 0;
    for line in text.split_inclusive('\n') {
        let indent = line.len() - line.trim_start().len();
        let start = line_start + indent;
        line_start += line.len();

        if !line.trim_start().starts_with('[') {
            continue;
        }
        let Some(span) = balanced_array_at(text, start) else {
            continue;
        };
        let rest_of_line = text[start + span.len()..]
            .split('\n')
            .next()
            .unwrap_or_default();
        if rest_of_line.trim().trim_end_matches([',', '.']).trim().is_empty() {
            return Some(span);
        }
    }
    None
}
