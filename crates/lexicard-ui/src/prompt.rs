use std::collections::BTreeMap;

use ratatui::buffer::Buffer;
use ratatui::layout::{Position, Rect};
use ratatui::style::{Modifier, Style};

use crate::keys::Key;
use crate::palette::{Palette, Role};

/// What the caller should do after a key reached the prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PromptAction {
    Continue,
    Accept(String),
    Cancel,
    /// Read the clipboard and feed it to [`Prompt::insert_str`].
    Paste,
}

/// Completion entries bucketed by lowercase first char.
#[derive(Debug, Clone, Default)]
pub struct Completion {
    entries: Vec<String>,
    buckets: BTreeMap<char, Vec<usize>>,
}

impl Completion {
    pub fn new<I, S>(entries: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let entries: Vec<String> = entries.into_iter().map(Into::into).collect();
        let mut buckets: BTreeMap<char, Vec<usize>> = BTreeMap::new();
        for (i, entry) in entries.iter().enumerate() {
            if let Some(first) = entry.chars().next() {
                buckets.entry(lower(first)).or_default().push(i);
            }
        }
        Self { entries, buckets }
    }

    /// Entries starting with `input`, ignoring case and surrounding
    /// whitespace. Empty input yields every entry.
    pub fn matches(&self, input: &str) -> Vec<String> {
        let input = input.trim();
        let Some(first) = input.chars().next() else {
            return self.entries.clone();
        };
        let prefix = input.to_lowercase();
        self.buckets
            .get(&lower(first))
            .into_iter()
            .flatten()
            .map(|&i| &self.entries[i])
            .filter(|entry| entry.to_lowercase().starts_with(&prefix))
            .cloned()
            .collect()
    }
}

fn lower(c: char) -> char {
    c.to_lowercase().next().unwrap_or(c)
}

/// Single-line editor with a completion menu and history.
#[derive(Debug, Clone)]
pub struct Prompt {
    label: String,
    text: Vec<char>,
    cursor: usize,
    completion: Option<Completion>,
    candidates: Vec<String>,
    selected: Option<usize>,
    /// Text as typed, restored when cycling wraps.
    typed: String,
    history: Vec<String>,
    history_index: Option<usize>,
    exiting_bspace: bool,
}

impl Prompt {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            text: Vec::new(),
            cursor: 0,
            completion: None,
            candidates: Vec::new(),
            selected: None,
            typed: String::new(),
            history: Vec::new(),
            history_index: None,
            exiting_bspace: false,
        }
    }

    /// Start with `text` typed and the cursor at its end.
    pub fn with_text(mut self, text: &str) -> Self {
        self.set_text(text);
        self.edited();
        self
    }

    pub fn with_completion(mut self, completion: Completion) -> Self {
        self.completion = Some(completion);
        self.edited();
        self
    }

    /// Entries walked by Up and Down, most recent first.
    pub fn with_history(mut self, history: Vec<String>) -> Self {
        self.history = history;
        self
    }

    /// Backspace on an empty line cancels the prompt.
    pub fn exiting_bspace(mut self, on: bool) -> Self {
        self.exiting_bspace = on;
        self
    }

    pub fn text(&self) -> String {
        self.text.iter().collect()
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn set_cursor(&mut self, cursor: usize) {
        self.cursor = cursor.min(self.text.len());
    }

    pub fn candidates(&self) -> &[String] {
        &self.candidates
    }

    pub fn selected(&self) -> Option<usize> {
        self.selected
    }

    fn set_text(&mut self, text: &str) {
        self.text = text.chars().collect();
        self.cursor = self.text.len();
    }

    /// Called after every edit of the typed text.
    fn edited(&mut self) {
        self.selected = None;
        self.history_index = None;
        self.typed = self.text();
        self.candidates = self
            .completion
            .as_ref()
            .map(|c| c.matches(&self.typed))
            .unwrap_or_default();
    }

    pub fn insert_str(&mut self, s: &str) {
        for c in s.chars().filter(|c| !c.is_control()) {
            self.text.insert(self.cursor, c);
            self.cursor += 1;
        }
        self.edited();
    }

    fn word_left(&self) -> usize {
        let mut i = self.cursor;
        while i > 0 && self.text[i - 1].is_whitespace() {
            i -= 1;
        }
        while i > 0 && !self.text[i - 1].is_whitespace() {
            i -= 1;
        }
        i
    }

    fn word_right(&self) -> usize {
        let len = self.text.len();
        let mut i = self.cursor;
        while i < len && self.text[i].is_whitespace() {
            i += 1;
        }
        while i < len && !self.text[i].is_whitespace() {
            i += 1;
        }
        i
    }

    fn backspace(&mut self) {
        if self.cursor > 0 {
            self.cursor -= 1;
            self.text.remove(self.cursor);
            self.edited();
        }
    }

    fn delete(&mut self) {
        if self.cursor < self.text.len() {
            self.text.remove(self.cursor);
            self.edited();
        }
    }

    fn backspace_word(&mut self) {
        let start = self.word_left();
        self.text.drain(start..self.cursor);
        self.cursor = start;
        self.edited();
    }

    fn kill_line(&mut self) {
        self.text.truncate(self.cursor);
        self.edited();
    }

    /// Keep only the word under the cursor. The line is left alone when the
    /// cursor sits between words.
    pub fn keep_current_word(&mut self) {
        let trimmed = self
            .text
            .iter()
            .rposition(|c| !c.is_whitespace())
            .map_or(0, |i| i + 1);
        let cursor = self.cursor.min(trimmed);
        let text = &self.text[..trimmed];

        let left = text[..cursor]
            .iter()
            .rposition(|c| *c == ' ')
            .map_or(0, |i| i + 1);
        let right = text[cursor..]
            .iter()
            .position(|c| *c == ' ')
            .map_or(trimmed, |i| cursor + i);
        if left >= right {
            return;
        }

        self.text = text[left..right].to_vec();
        self.cursor = (cursor - left).min(self.text.len());
        self.edited();
    }

    fn cycle(&mut self, forward: bool) {
        let n = self.candidates.len();
        if n == 0 {
            return;
        }
        self.selected = match (self.selected, forward) {
            (None, true) => Some(0),
            (None, false) => Some(n - 1),
            (Some(i), true) => (i + 1 < n).then_some(i + 1),
            (Some(i), false) => i.checked_sub(1),
        };
        let text = match self.selected {
            Some(i) => self.candidates[i].clone(),
            None => self.typed.clone(),
        };
        self.set_text(&text);
    }

    fn history_step(&mut self, older: bool) {
        if self.history.is_empty() {
            return;
        }
        let index = match (self.history_index, older) {
            (None, true) => Some(0),
            (None, false) => return,
            (Some(i), true) => Some((i + 1).min(self.history.len() - 1)),
            (Some(i), false) => i.checked_sub(1),
        };
        let text = match index {
            Some(i) => self.history[i].clone(),
            None => self.typed.clone(),
        };
        self.set_text(&text);
        self.history_index = index;
    }

    pub fn handle(&mut self, key: &Key) -> PromptAction {
        match key {
            Key::Enter => {
                let text = self.text();
                self.set_text("");
                self.edited();
                return PromptAction::Accept(text);
            }
            Key::Esc | Key::Ctrl('c') => return PromptAction::Cancel,
            Key::MiddleClick => return PromptAction::Paste,
            Key::Backspace if self.text.is_empty() && self.exiting_bspace => {
                return PromptAction::Cancel;
            }
            Key::Backspace => self.backspace(),
            Key::Delete | Key::Ctrl('d') => self.delete(),
            Key::Left | Key::Ctrl('b') => self.cursor = self.cursor.saturating_sub(1),
            Key::Right | Key::Ctrl('f') => self.cursor = (self.cursor + 1).min(self.text.len()),
            Key::Alt('b') | Key::CtrlLeft => self.cursor = self.word_left(),
            Key::Alt('f') | Key::CtrlRight => self.cursor = self.word_right(),
            Key::Home | Key::Ctrl('a') => self.cursor = 0,
            Key::End | Key::Ctrl('e') => self.cursor = self.text.len(),
            Key::Ctrl('w') => self.backspace_word(),
            Key::Ctrl('k') => self.kill_line(),
            Key::Ctrl('t') => self.keep_current_word(),
            Key::Tab | Key::Ctrl('n') => self.cycle(true),
            Key::BackTab | Key::Ctrl('p') => self.cycle(false),
            Key::Up => self.history_step(true),
            Key::Down => self.history_step(false),
            Key::Char(c) => {
                self.text.insert(self.cursor, *c);
                self.cursor += 1;
                self.edited();
            }
            _ => {}
        }
        PromptAction::Continue
    }

    /// Rows of the completion menu on a terminal `rows` high.
    pub fn menu_height(&self, rows: u16) -> u16 {
        let max = (rows / 5).max(1);
        (self.candidates.len() as u16).min(max)
    }

    /// Draw the prompt on the bottom row of `area` with the menu above it.
    /// Returns where the terminal cursor belongs.
    pub fn draw(&self, area: Rect, buf: &mut Buffer, palette: &Palette) -> Position {
        let y = area.bottom().saturating_sub(1);
        let width = usize::from(area.width);
        buf.set_style(Rect::new(area.x, y, area.width, 1), Style::reset());

        let (x, _) = buf.set_stringn(
            area.x,
            y,
            &self.label,
            width,
            palette.style(Role::Index).add_modifier(Modifier::BOLD),
        );
        let label_len = usize::from(x - area.x);
        let room = width.saturating_sub(label_len + 1).max(1);
        let offset = self.cursor.saturating_sub(room);
        let visible: String = self.text.iter().skip(offset).take(room).collect();
        buf.set_stringn(x, y, &visible, room, Style::default());

        self.draw_menu(area, buf, palette, y);
        Position::new(x + (self.cursor - offset) as u16, y)
    }

    fn draw_menu(&self, area: Rect, buf: &mut Buffer, palette: &Palette, prompt_y: u16) {
        let height = self.menu_height(area.height);
        if height == 0 || prompt_y < area.y + height {
            return;
        }
        let height = usize::from(height);
        let first = match self.selected {
            Some(i) if i >= height => i + 1 - height,
            _ => 0,
        };
        let top = prompt_y - height as u16;
        let style = palette.style(Role::Def1);

        for (row, (i, candidate)) in self.candidates.iter().enumerate().skip(first).take(height).enumerate() {
            let y = top + row as u16;
            let line = Rect::new(area.x, y, area.width, 1);
            let style = if self.selected == Some(i) {
                style.add_modifier(Modifier::REVERSED)
            } else {
                style
            };
            buf.set_style(line, Style::reset());
            buf.set_stringn(area.x + 1, y, candidate, usize::from(area.width.saturating_sub(2)), style);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn typed(text: &str) -> Prompt {
        Prompt::new("> ").with_text(text)
    }

    fn keys(prompt: &mut Prompt, keys: &[Key]) {
        for key in keys {
            prompt.handle(key);
        }
    }

    #[test]
    fn keep_current_word() {
        for (cursor, expected) in [(3, "foo"), (5, "foo"), (11, "barbaz"), (15, "barbaz"), (6, "  foo    barbaz"), (7, "  foo    barbaz")] {
            let mut prompt = typed("  foo    barbaz");
            prompt.set_cursor(cursor);
            prompt.handle(&Key::Ctrl('t'));
            assert_eq!(prompt.text(), expected, "cursor {cursor}");
        }
    }

    #[test]
    fn keep_current_word_ignores_trailing_space() {
        let mut prompt = typed("mint   ");
        prompt.handle(&Key::Ctrl('t'));
        assert_eq!(prompt.text(), "mint");
        assert_eq!(prompt.cursor(), 4);
    }

    #[test]
    fn word_motion_and_kills() {
        let mut prompt = typed("peppermint tea  leaves");
        prompt.handle(&Key::Alt('b'));
        assert_eq!(prompt.cursor(), 16);
        prompt.handle(&Key::CtrlLeft);
        assert_eq!(prompt.cursor(), 11);
        prompt.handle(&Key::Alt('f'));
        assert_eq!(prompt.cursor(), 14);
        prompt.handle(&Key::Ctrl('k'));
        assert_eq!(prompt.text(), "peppermint tea");
        prompt.handle(&Key::Ctrl('w'));
        assert_eq!(prompt.text(), "peppermint ");
        keys(&mut prompt, &[Key::Home, Key::Delete, Key::End, Key::Backspace]);
        assert_eq!(prompt.text(), "eppermint");
    }

    #[test]
    fn enter_accepts_and_clears() {
        let mut prompt = typed("mint");
        keys(&mut prompt, &[Key::Char(' '), Key::Char('-'), Key::Char('f')]);
        assert_eq!(prompt.handle(&Key::Enter), PromptAction::Accept("mint -f".into()));
        assert_eq!(prompt.text(), "");
        assert_eq!(prompt.handle(&Key::Esc), PromptAction::Cancel);
        assert_eq!(prompt.handle(&Key::MiddleClick), PromptAction::Paste);
    }

    #[test]
    fn exiting_backspace_cancels_on_empty_line() {
        let mut prompt = Prompt::new("> ").exiting_bspace(true).with_text("a");
        assert_eq!(prompt.handle(&Key::Backspace), PromptAction::Continue);
        assert_eq!(prompt.handle(&Key::Backspace), PromptAction::Cancel);

        let mut prompt = Prompt::new("> ");
        assert_eq!(prompt.handle(&Key::Backspace), PromptAction::Continue);
    }

    #[test]
    fn completion_filters_by_prefix() {
        let completion = Completion::new(["hidedef", "HideSyn", "histsave", "audio"]);
        assert_eq!(completion.matches("hid"), vec!["hidedef", "HideSyn"]);
        assert_eq!(completion.matches("  HIS "), vec!["histsave"]);
        assert_eq!(completion.matches("").len(), 4);
        assert!(completion.matches("x").is_empty());
    }

    #[test]
    fn cycling_wraps_to_the_typed_text() {
        let mut prompt = Prompt::new(":").with_completion(Completion::new(["hidedef", "hidesyn", "audio"]));
        keys(&mut prompt, &[Key::Char('h'), Key::Char('i')]);
        assert_eq!(prompt.candidates().len(), 2);

        prompt.handle(&Key::Tab);
        assert_eq!(prompt.text(), "hidedef");
        prompt.handle(&Key::Ctrl('n'));
        assert_eq!(prompt.text(), "hidesyn");
        prompt.handle(&Key::Tab);
        assert_eq!(prompt.text(), "hi");
        assert_eq!(prompt.selected(), None);
        prompt.handle(&Key::BackTab);
        assert_eq!(prompt.text(), "hidesyn");

        // Typing rebuilds the list from the new text.
        prompt.handle(&Key::Backspace);
        assert_eq!(prompt.text(), "hidesy");
        assert_eq!(prompt.candidates(), &["hidesyn".to_string()]);
    }

    #[test]
    fn history_walk_restores_typed_text() {
        let mut prompt = Prompt::new("> ").with_history(vec!["newest".into(), "older".into()]);
        prompt.insert_str("mi");
        keys(&mut prompt, &[Key::Up, Key::Up, Key::Up]);
        assert_eq!(prompt.text(), "older");
        prompt.handle(&Key::Down);
        assert_eq!(prompt.text(), "newest");
        prompt.handle(&Key::Down);
        assert_eq!(prompt.text(), "mi");
    }

    #[test]
    fn menu_height_is_bounded() {
        let prompt = Prompt::new(":").with_completion(Completion::new((0..20).map(|i| format!("o{i}"))));
        assert_eq!(prompt.menu_height(24), 4);
        assert_eq!(prompt.menu_height(3), 1);
        assert_eq!(Prompt::new(":").menu_height(24), 0);
    }

    #[test]
    fn draws_text_menu_and_cursor() {
        let mut prompt = Prompt::new("Search: ").with_completion(Completion::new(["mint", "mist"]));
        prompt.insert_str("mi");
        prompt.handle(&Key::Tab);
        let mut buf = Buffer::empty(Rect::new(0, 0, 20, 10));
        let cursor = prompt.draw(buf.area, &mut buf, &Palette::default());

        let row = |y: u16| (0..20).map(|x| buf[(x, y)].symbol()).collect::<String>();
        assert_eq!(row(9).trim_end(), "Search: mint");
        assert_eq!(row(7).trim_end(), " mint");
        assert_eq!(row(8).trim_end(), " mist");
        assert!(buf[(1, 7)].modifier.contains(Modifier::REVERSED));
        assert_eq!(cursor, Position::new(12, 9));
    }
}
