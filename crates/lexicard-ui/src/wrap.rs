use std::str::SplitWhitespace;

/// Where the first line of a wrap starts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Initial {
    /// Text put in front of the first line, counted towards its width.
    Prefix(String),
    /// The first line continues a line that is already this many columns long.
    Column(usize),
}

/// Greedy word wrap as a lazy sequence of right-trimmed lines.
///
/// Widths are counted in chars. A word longer than the width gets a line of
/// its own and is never split.
pub struct Wrapper<'a> {
    width: usize,
    words: SplitWhitespace<'a>,
    indent: &'a str,
    indent_len: usize,
    line: String,
    cursor: usize,
    /// Whether breaking now would leave something behind on the current line.
    can_break: bool,
    done: bool,
}

impl<'a> Wrapper<'a> {
    pub fn new(width: usize, text: &'a str, initial: Initial, indent: &'a str) -> Self {
        let (line, cursor, can_break) = match initial {
            Initial::Prefix(prefix) => {
                let len = prefix.chars().count();
                (prefix, len, false)
            }
            Initial::Column(column) => (String::new(), column, column > 0),
        };
        Self {
            width: width.max(1),
            words: text.split_whitespace(),
            indent,
            indent_len: indent.chars().count(),
            line,
            cursor,
            can_break,
            done: false,
        }
    }

    /// Column right after the last word emitted so far, separator included.
    /// After exhaustion this is where a follow-up run on the last line starts.
    pub fn current_line_pos(&self) -> usize {
        self.cursor
    }
}

fn trimmed(mut line: String) -> String {
    line.truncate(line.trim_end().len());
    line
}

impl Iterator for Wrapper<'_> {
    type Item = String;

    fn next(&mut self) -> Option<String> {
        if self.done {
            return None;
        }

        for word in self.words.by_ref() {
            let len = word.chars().count();
            if self.can_break && self.cursor + len > self.width {
                let next = format!("{}{word} ", self.indent);
                let line = std::mem::replace(&mut self.line, next);
                self.cursor = self.indent_len + len + 1;
                return Some(trimmed(line));
            }
            self.line.push_str(word);
            self.line.push(' ');
            self.cursor += len + 1;
            self.can_break = true;
        }

        self.done = true;
        Some(trimmed(std::mem::take(&mut self.line)))
    }
}

/// Wrap `text` completely, returning the lines and the final line position.
pub fn wrap(width: usize, text: &str, initial: Initial, indent: &str) -> (Vec<String>, usize) {
    let mut wrapper = Wrapper::new(width, text, initial, indent);
    let lines: Vec<String> = wrapper.by_ref().collect();
    (lines, wrapper.current_line_pos())
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEXT: &str = "Any of various aromatic plants of the genus Mentha, having \
                        opposite leaves and small purplish or white flowers";

    fn plain(width: usize, text: &str) -> Vec<String> {
        wrap(width, text, Initial::Prefix(String::new()), "").0
    }

    #[test]
    fn lines_fit_the_width() {
        for width in 8..40 {
            for line in plain(width, TEXT) {
                assert!(line.chars().count() <= width, "{width}: {line:?}");
            }
        }
    }

    #[test]
    fn rejoining_restores_the_words() {
        let normalized = TEXT.split_whitespace().collect::<Vec<_>>().join(" ");
        for width in [1, 5, 13, 27, 200] {
            assert_eq!(plain(width, TEXT).join(" "), normalized);
        }
    }

    #[test]
    fn long_word_gets_its_own_line() {
        let lines = plain(6, "a incomprehensibilities b");
        assert_eq!(lines, vec!["a", "incomprehensibilities", "b"]);
    }

    #[test]
    fn empty_input_yields_one_empty_line() {
        assert_eq!(plain(10, ""), vec![""]);
        assert_eq!(plain(10, "   "), vec![""]);
    }

    #[test]
    fn prefix_and_indent() {
        let (lines, pos) = wrap(12, "one two three four", Initial::Prefix(">1 ".into()), "   ");
        assert_eq!(lines, vec![">1 one two", "   three", "   four"]);
        assert_eq!(pos, "   four ".len());
    }

    #[test]
    fn column_start_continues_a_line() {
        // "mint" already occupies 5 columns of a 12 column line.
        let (lines, _) = wrap(12, "/mɪnt/ noun", Initial::Column(5), "");
        assert_eq!(lines, vec!["/mɪnt/", "noun"]);

        let (lines, _) = wrap(8, "/mɪnt/", Initial::Column(5), "");
        assert_eq!(lines, vec!["", "/mɪnt/"]);
    }

    #[test]
    fn lazy_iteration_tracks_position() {
        let mut wrapper = Wrapper::new(10, "aa bb cc", Initial::Column(0), "");
        assert_eq!(wrapper.next().as_deref(), Some("aa bb cc"));
        assert_eq!(wrapper.current_line_pos(), 9);
        assert_eq!(wrapper.next(), None);
    }
}
