/// The one list-marker glyph the summarizer emits. Dashes, numbers and other
/// markers pass through untouched.
const BULLET: char = '\u{2022}';

/// Split a multi-line summary into display list items.
///
/// Each line is trimmed and loses a single leading bullet glyph if one is
/// present; items come back in original line order. An empty summary yields
/// no items rather than one empty item.
pub fn summary_lines(summary: &str) -> Vec<String> {
    if summary.is_empty() {
        return Vec::new();
    }
    summary
        .split('\n')
        .map(|line| {
            let line = line.trim();
            let line = line.strip_prefix(BULLET).unwrap_or(line);
            line.trim().to_string()
        })
        .collect()
}
