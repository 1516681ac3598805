//! Ad-hoc table detection over raw lines.
//!
//! A table is a run of at least three consecutive lines starting with `|`:
//! a header, a separator made of dashes and pipes, and one or more rows.
//! Runs that do not qualify are handed back as ordinary text.

use super::inline::parse_inlines;
use super::node::{Table, TableCell};
use super::parser::fence_mask;

/// Input split into ordinary text and detected tables, in source order.
#[derive(Debug)]
pub(super) enum Segment<'a> {
    Text(Vec<&'a str>),
    Table(Table),
}

pub(super) fn split_tables<'a>(lines: &[&'a str]) -> Vec<Segment<'a>> {
    let piped = lines.iter().filter(|line| line.contains('|')).count();
    if piped < 2 {
        return vec![Segment::Text(lines.to_vec())];
    }

    let fenced = fence_mask(lines);
    let mut segments = Vec::new();
    let mut text: Vec<&'a str> = Vec::new();
    let mut i = 0;

    while i < lines.len() {
        if fenced[i] || !is_table_line(lines[i]) {
            text.push(lines[i]);
            i += 1;
            continue;
        }

        let start = i;
        while i < lines.len() && !fenced[i] && is_table_line(lines[i]) {
            i += 1;
        }
        let run = &lines[start..i];
        match build_table(run) {
            Some(table) => {
                if !text.is_empty() {
                    segments.push(Segment::Text(std::mem::take(&mut text)));
                }
                segments.push(Segment::Table(table));
            }
            None => text.extend_from_slice(run),
        }
    }

    if !text.is_empty() {
        segments.push(Segment::Text(text));
    }
    segments
}

fn is_table_line(line: &str) -> bool {
    line.trim_start().starts_with('|')
}

fn is_separator_line(line: &str) -> bool {
    let trimmed = line.trim();
    trimmed.contains('-')
        && trimmed
            .chars()
            .all(|ch| matches!(ch, '|' | '-' | ':') || ch.is_whitespace())
}

/// Turn a run of piped lines into a table: header, separator, then rows.
///
/// The second line is checked rather than discarded blindly. A run whose
/// second line holds anything besides pipes, dashes, colons and spaces is
/// not a table, so a real data row is never thrown away as a separator.
fn build_table(run: &[&str]) -> Option<Table> {
    if run.len() < 3 || !is_separator_line(run[1]) {
        return None;
    }
    let headers = split_cells(run[0]);
    if headers.is_empty() {
        return None;
    }
    let rows = run[2..].iter().map(|line| split_cells(line)).collect();
    Some(Table { headers, rows })
}

/// Split on `|`, trimming each fragment. Only the empty fragments created by
/// a leading or trailing pipe are dropped; interior empty cells stay.
pub(super) fn split_cells(line: &str) -> Vec<TableCell> {
    let trimmed = line.trim();
    let inner = trimmed.strip_prefix('|').unwrap_or(trimmed);
    let inner = inner.strip_suffix('|').unwrap_or(inner);
    if inner.trim().is_empty() {
        return Vec::new();
    }
    inner
        .split('|')
        .map(|fragment| {
            let text = fragment.trim();
            TableCell {
                text: text.to_string(),
                content: parse_inlines(text),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn texts(cells: &[TableCell]) -> Vec<&str> {
        cells.iter().map(|cell| cell.text.as_str()).collect()
    }

    #[test]
    fn split_cells_drops_only_framing_fragments() {
        assert_eq!(texts(&split_cells("| A | B |")), vec!["A", "B"]);
        assert_eq!(texts(&split_cells("| A | | B |")), vec!["A", "", "B"]);
        assert_eq!(texts(&split_cells("| A | B")), vec!["A", "B"]);
        assert_eq!(texts(&split_cells("  |x|  ")), vec!["x"]);
        assert!(split_cells("| |").is_empty());
    }

    #[test]
    fn separator_requires_dashes() {
        assert!(is_separator_line("| - | - |"));
        assert!(is_separator_line("|:---|---:|"));
        assert!(!is_separator_line("| 1 | 2 |"));
        assert!(!is_separator_line("|   |   |"));
    }

    #[test]
    fn single_piped_line_is_never_a_table() {
        let lines = ["| lonely |", "text"];
        let segments = split_tables(&lines);
        assert!(matches!(segments.as_slice(), [Segment::Text(lines)] if lines.len() == 2));
    }

    #[test]
    fn two_line_run_stays_text() {
        let lines = ["| A | B |", "| - | - |", "after"];
        let segments = split_tables(&lines);
        assert_eq!(segments.len(), 1);
        assert!(matches!(&segments[0], Segment::Text(lines) if lines.len() == 3));
    }

    #[test]
    fn run_without_separator_stays_text() {
        let lines = ["| A | B |", "| 1 | 2 |", "| 3 | 4 |"];
        let segments = split_tables(&lines);
        assert!(matches!(segments.as_slice(), [Segment::Text(lines)] if lines.len() == 3));
    }

    #[test]
    fn surrounding_text_keeps_order() {
        let lines = ["before", "| A |", "|---|", "| 1 |", "after"];
        let segments = split_tables(&lines);
        assert_eq!(segments.len(), 3);
        assert!(matches!(&segments[0], Segment::Text(t) if t == &vec!["before"]));
        assert!(matches!(&segments[1], Segment::Table(t) if t.header_texts() == vec!["A"]));
        assert!(matches!(&segments[2], Segment::Text(t) if t == &vec!["after"]));
    }

    #[test]
    fn pipes_inside_code_fence_are_not_tables() {
        let lines = ["```", "| A | B |", "| - | - |", "| 1 | 2 |", "```"];
        let segments = split_tables(&lines);
        assert!(matches!(segments.as_slice(), [Segment::Text(lines)] if lines.len() == 5));
    }
}
