use std::collections::{BTreeMap, BTreeSet};

use regex::{Regex, RegexBuilder};

use crate::format::ParsedLine;

/// Case-sensitive only when `pattern` has an uppercase letter.
pub fn smartcase(pattern: &str) -> Option<Regex> {
    RegexBuilder::new(&regex::escape(pattern))
        .case_insensitive(!pattern.chars().any(char::is_uppercase))
        .build()
        .ok()
}

/// Matches of one search pattern over a page's columns. Offsets and
/// lengths are in chars.
#[derive(Debug, Clone)]
pub struct Highlight {
    pattern: String,
    per_column: Vec<BTreeMap<usize, Vec<(usize, usize)>>>,
    nmatches: usize,
    last_line: Option<usize>,
}

impl Highlight {
    /// `None` when the pattern is empty or matches nothing.
    pub fn search(columns: &[Vec<ParsedLine>], pattern: &str) -> Option<Self> {
        if pattern.is_empty() {
            return None;
        }
        let regex = smartcase(pattern)?;

        let mut nmatches = 0;
        let per_column: Vec<BTreeMap<usize, Vec<(usize, usize)>>> = columns
            .iter()
            .map(|column| {
                column
                    .iter()
                    .enumerate()
                    .filter_map(|(index, line)| {
                        let found: Vec<(usize, usize)> = regex
                            .find_iter(&line.text)
                            .map(|m| {
                                let offset = line.text[..m.start()].chars().count();
                                (offset, m.as_str().chars().count())
                            })
                            .collect();
                        nmatches += found.len();
                        (!found.is_empty()).then_some((index, found))
                    })
                    .collect()
            })
            .collect();

        if nmatches == 0 {
            return None;
        }
        tracing::debug!("{nmatches} matches of {pattern:?}");
        Some(Self {
            pattern: pattern.to_string(),
            per_column,
            nmatches,
            last_line: None,
        })
    }

    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    pub fn nmatches(&self) -> usize {
        self.nmatches
    }

    pub fn last_line(&self) -> Option<usize> {
        self.last_line
    }

    /// `(offset, len)` of every match on `line` of `column`.
    pub fn matches(&self, column: usize, line: usize) -> &[(usize, usize)] {
        self.per_column
            .get(column)
            .and_then(|lines| lines.get(&line))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    fn lines(&self) -> BTreeSet<usize> {
        self.per_column
            .iter()
            .flat_map(|lines| lines.keys().copied())
            .collect()
    }

    /// Scroll position of the next line with a match below `scroll`, and
    /// whether the search wrapped around to the top.
    pub fn next(&mut self, scroll: usize, max_scroll: usize) -> (usize, bool) {
        let lines = self.lines();
        let (target, wrapped) = match lines.range(scroll + 1..).next() {
            Some(&line) if line.min(max_scroll) != scroll => (line.min(max_scroll), false),
            _ => (lines.first().map_or(0, |&l| l.min(max_scroll)), true),
        };
        self.last_line = Some(target);
        (target, wrapped)
    }

    /// Like [`Highlight::next`], upwards.
    pub fn prev(&mut self, scroll: usize, max_scroll: usize) -> (usize, bool) {
        let lines = self.lines();
        let (target, wrapped) = match lines.range(..scroll).next_back() {
            Some(&line) => (line.min(max_scroll), false),
            None => (lines.last().map_or(0, |&l| l.min(max_scroll)), true),
        };
        self.last_line = Some(target);
        (target, wrapped)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn column(texts: &[&str]) -> Vec<ParsedLine> {
        texts
            .iter()
            .enumerate()
            .map(|(i, t)| ParsedLine {
                op_index: i,
                text: t.to_string(),
                attrs: Vec::new(),
            })
            .collect()
    }

    fn columns() -> Vec<Vec<ParsedLine>> {
        vec![
            column(&["To mint. To coin.", "", "to stamp", "To strike To", "x", "x", "x", "x"]),
            column(&["", "To make", "", "", "", "into To", "x", "Tomorrow To"]),
        ]
    }

    #[test]
    fn smartcase_counts() {
        let hl = Highlight::search(&columns(), "To").unwrap();
        assert_eq!(hl.nmatches(), 8);
        assert_eq!(hl.matches(0, 0), &[(0, 2), (9, 2)]);
        assert_eq!(hl.matches(1, 5), &[(5, 2)]);
        assert!(hl.matches(0, 1).is_empty());

        let hl = Highlight::search(&columns(), "to").unwrap();
        assert_eq!(hl.nmatches(), 10);

        assert!(Highlight::search(&columns(), "absent").is_none());
        assert!(Highlight::search(&columns(), "").is_none());
    }

    #[test]
    fn offsets_are_in_chars() {
        let hl = Highlight::search(&[column(&["ɪɪ mint"])], "mint").unwrap();
        assert_eq!(hl.matches(0, 0), &[(3, 4)]);
    }

    #[test]
    fn next_moves_down_then_wraps() {
        let mut hl = Highlight::search(&columns(), "To").unwrap();
        // Match lines: 0, 1, 3, 5, 7.
        let mut scroll = 0;
        let mut seen = Vec::new();
        loop {
            let (next, wrapped) = hl.next(scroll, 10);
            if wrapped {
                assert_eq!(next, 0);
                break;
            }
            assert!(next > scroll);
            seen.push(next);
            scroll = next;
        }
        assert_eq!(seen, vec![1, 3, 5, 7]);
    }

    #[test]
    fn next_wraps_when_clamped_scroll_cannot_move() {
        let mut hl = Highlight::search(&columns(), "To").unwrap();
        assert_eq!(hl.next(3, 3), (0, true));
        assert_eq!(hl.prev(0, 3), (3, true));
        assert_eq!(hl.prev(5, 10), (3, false));
        assert_eq!(hl.last_line(), Some(3));
    }
}
