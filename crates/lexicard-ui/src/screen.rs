use std::sync::Arc;

use lexicard_core::{CorollarySet, Selector, SelectorError, ToggleState};
use lexicard_types::{Dictionary, DictionarySelection};
use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::Modifier;

use crate::format::FormatOptions;
use crate::highlight::Highlight;
use crate::keys::{Key, select_index};
use crate::layout::{Layout, MARGIN};
use crate::page::{Dispatch, Page, Request, draw_line, scroll_hint};
use crate::palette::{Palette, Role};

const WHEEL_STEP: usize = 2;

/// One dictionary's page: its selection state, layout and search matches.
#[derive(Debug)]
pub struct Screen {
    selector: Selector,
    opts: FormatOptions,
    layout: Layout,
    width: u16,
    height: u16,
    margin_bot: u16,
    scroll: usize,
    highlight: Option<Highlight>,
}

impl Screen {
    pub fn new(
        dictionary: Arc<Dictionary>,
        corollary: CorollarySet,
        opts: FormatOptions,
        width: u16,
        height: u16,
    ) -> Self {
        let mut screen = Self {
            selector: Selector::new(dictionary, corollary),
            opts,
            layout: Layout::default(),
            width,
            height,
            margin_bot: 0,
            scroll: 0,
            highlight: None,
        };
        screen.relayout();
        screen
    }

    pub fn dictionary(&self) -> &Arc<Dictionary> {
        self.selector.dictionary()
    }

    pub fn selector(&self) -> &Selector {
        &self.selector
    }

    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    pub fn scroll(&self) -> usize {
        self.scroll
    }

    pub fn highlight(&self) -> Option<&Highlight> {
        self.highlight.as_ref()
    }

    /// Rows available to dictionary text.
    pub fn content_height(&self) -> usize {
        usize::from(self.height).saturating_sub(2 + usize::from(self.margin_bot))
    }

    pub fn max_scroll(&self) -> usize {
        self.layout.height().saturating_sub(self.content_height())
    }

    fn page_step(&self) -> usize {
        self.content_height().saturating_sub(2).max(1)
    }

    /// Recompute the layout for the current size and options. Search
    /// matches are recomputed against the new lines.
    pub fn relayout(&mut self) {
        self.layout = Layout::build(
            self.selector.dictionary(),
            usize::from(self.width),
            self.content_height(),
            &self.opts,
        );
        if let Some(highlight) = self.highlight.take() {
            let pattern = highlight.pattern().to_string();
            self.highlight = Highlight::search(&self.layout.columns, &pattern);
        }
        self.adjust_scroll_past_eof();
    }

    pub fn set_format_options(&mut self, opts: FormatOptions) {
        if self.opts != opts {
            self.opts = opts;
            self.relayout();
        }
    }

    pub fn set_corollary(&mut self, corollary: CorollarySet) {
        self.selector.set_corollary(corollary);
    }

    pub fn adjust_scroll_past_eof(&mut self) {
        self.scroll = self.scroll.min(self.max_scroll());
    }

    pub fn scroll_down(&mut self, n: usize) {
        self.scroll = (self.scroll + n).min(self.max_scroll());
    }

    pub fn scroll_up(&mut self, n: usize) {
        self.scroll = self.scroll.saturating_sub(n);
    }

    pub fn page_down(&mut self) {
        self.scroll_down(self.page_step());
    }

    pub fn page_up(&mut self) {
        self.scroll_up(self.page_step());
    }

    pub fn go_top(&mut self) {
        self.scroll = 0;
    }

    pub fn go_bottom(&mut self) {
        self.scroll = self.max_scroll();
    }

    /// Toggle the entry drawn at screen row `y`, screen column `x`.
    /// Returns whether a toggleable entry was hit.
    pub fn mark_box_at(&mut self, y: u16, x: u16) -> Result<bool, SelectorError> {
        let Some(row) = usize::from(y).checked_sub(1) else {
            return Ok(false);
        };
        if row >= self.content_height() {
            return Ok(false);
        }
        let Some(column) = self.layout.column_at(usize::from(x)) else {
            return Ok(false);
        };
        let Some(line) = self.layout.line(column, self.scroll + row) else {
            return Ok(false);
        };
        let index = line.op_index;
        if !self.dictionary()[index].is_toggleable() {
            return Ok(false);
        }
        self.selector.toggle_by_entry(index)?;
        Ok(true)
    }

    /// Toggle the DEF/SYN bound to select key `c`.
    pub fn mark_box_by_selector(&mut self, c: char) -> Option<usize> {
        select_index(c).and_then(|n| self.selector.toggle_by_def_index(n))
    }

    pub fn deselect_all(&mut self) {
        self.selector.clear_selection();
    }

    pub fn dump_selection(&self) -> Vec<DictionarySelection> {
        self.selector.dump_selection()
    }

    /// Audio to play: the selection's, else the dictionary's first.
    pub fn audio_url(&self) -> Option<String> {
        self.dump_selection()
            .into_iter()
            .find_map(|selection| selection.audio)
            .or_else(|| {
                self.dictionary()
                    .distinct_audio()
                    .first()
                    .map(|url| url.to_string())
            })
    }

    pub fn url(&self) -> Option<String> {
        self.dictionary().url.clone()
    }

    /// Move to the next line with a match. Returns whether the search
    /// wrapped, `None` without an active highlight.
    pub fn highlight_next(&mut self) -> Option<bool> {
        let max_scroll = self.max_scroll();
        let highlight = self.highlight.as_mut()?;
        let (scroll, wrapped) = highlight.next(self.scroll, max_scroll);
        self.scroll = scroll;
        Some(wrapped)
    }

    pub fn highlight_prev(&mut self) -> Option<bool> {
        let max_scroll = self.max_scroll();
        let highlight = self.highlight.as_mut()?;
        let (scroll, wrapped) = highlight.prev(self.scroll, max_scroll);
        self.scroll = scroll;
        Some(wrapped)
    }

    fn overlay(&self, op_index: usize) -> Modifier {
        match self.selector.state(op_index) {
            ToggleState::Untoggled => Modifier::empty(),
            ToggleState::ToggledPrimary => Modifier::REVERSED,
            ToggleState::ToggledCorollary => Modifier::BOLD,
        }
    }
}

impl Page for Screen {
    fn title(&self) -> String {
        let dictionary = self.dictionary();
        match dictionary.first_phrase() {
            Some(phrase) => format!("{}: {}", dictionary.name, phrase.phrase),
            None => dictionary.name.clone(),
        }
    }

    fn draw(&self, area: Rect, buf: &mut Buffer, palette: &Palette) {
        let column_width = self.layout.column_width;
        let text_width = column_width.saturating_sub(2 * MARGIN);
        let height = self.content_height().min(usize::from(area.height.saturating_sub(2)));
        let delimit = palette.style(Role::Delimit);

        for (c, column) in self.layout.columns.iter().enumerate() {
            let x0 = area.x + 1 + (c * (column_width + 1)) as u16;
            let x_text = x0 + MARGIN as u16;

            for row in 0..height {
                let y = area.y + 1 + row as u16;
                if c + 1 < self.layout.columns.len() {
                    let x_sep = x0 + column_width as u16;
                    if let Some(cell) = buf.cell_mut((x_sep, y)) {
                        cell.set_symbol("│").set_style(delimit);
                    }
                }
                let index = self.scroll + row;
                let Some(line) = column.get(index) else {
                    continue;
                };
                let matches = self
                    .highlight
                    .as_ref()
                    .map_or(&[][..], |hl| hl.matches(c, index));
                draw_line(
                    buf,
                    x_text,
                    y,
                    text_width,
                    line,
                    0,
                    self.overlay(line.op_index),
                    matches,
                    palette,
                );
            }
        }
    }

    fn dispatch(&mut self, key: &Key) -> Dispatch {
        match key {
            Key::Char('j') | Key::Down => self.scroll_down(1),
            Key::Char('k') | Key::Up => self.scroll_up(1),
            Key::Char(' ') | Key::PageDown => self.page_down(),
            Key::Char('b') | Key::PageUp => self.page_up(),
            Key::Char('g') | Key::Home => self.go_top(),
            Key::Char('G') | Key::End => self.go_bottom(),
            Key::WheelDown => self.scroll_down(WHEEL_STEP),
            Key::WheelUp => self.scroll_up(WHEEL_STEP),
            Key::Esc if self.highlight.is_some() => self.hlclear(),
            Key::Char('n') => {
                self.highlight_next();
            }
            Key::Char('N') => {
                self.highlight_prev();
            }
            Key::Char('d') => self.deselect_all(),
            Key::Char(c) if select_index(*c).is_some() => {
                self.mark_box_by_selector(*c);
            }
            Key::Click { x, y } => {
                if let Err(e) = self.mark_box_at(*y, *x) {
                    tracing::error!("Click at {x},{y}: {e}");
                }
            }
            Key::MiddleClick => return Dispatch::Request(Request::Paste),
            Key::Char('p') | Key::Insert | Key::Enter => {
                return Dispatch::Request(Request::Search(None));
            }
            Key::Char('a') => return Dispatch::Request(Request::PlayAudio(self.audio_url())),
            Key::Char('o') => return Dispatch::Request(Request::OpenBrowser(self.url())),
            Key::Char('c') => return Dispatch::Request(Request::CreateCards),
            _ => return Dispatch::Ignored,
        }
        Dispatch::Handled
    }

    fn resize(&mut self, width: u16, height: u16) {
        if (self.width, self.height) != (width, height) {
            self.width = width;
            self.height = height;
            self.relayout();
        }
    }

    fn margin_bot(&self) -> u16 {
        self.margin_bot
    }

    fn set_margin_bot(&mut self, margin: u16) {
        if self.margin_bot != margin {
            self.margin_bot = margin;
            self.relayout();
        }
    }

    fn scroll_hint(&self) -> String {
        scroll_hint(self.scroll, self.max_scroll())
    }

    fn hlsearch(&mut self, pattern: &str) -> usize {
        self.highlight = Highlight::search(&self.layout.columns, pattern);
        self.highlight.as_ref().map_or(0, Highlight::nmatches)
    }

    fn hlclear(&mut self) {
        self.highlight = None;
    }
}

#[cfg(test)]
mod tests {
    use lexicard_types::{Def, Op};

    use super::*;

    fn mint() -> Arc<Dictionary> {
        let mut ops = vec![
            Op::header("Free Dictionary"),
            Op::phrase("mint", "/mɪnt/"),
            Op::label("noun", ""),
        ];
        for i in 0..4 {
            ops.push(Op::Def(Def::new(format!("To mint sense {i}."))));
        }
        ops.push(Op::audio("https://example.org/mint.mp3"));
        ops.push(Op::etym("Old English mynet"));
        ops.push(Op::phrase("mint", ""));
        for i in 0..20 {
            ops.push(Op::Def(Def::new(format!("plant sense {i}"))));
        }
        Arc::new(Dictionary::from_ops("Free Dictionary", ops).with_url("https://example.org/mint"))
    }

    fn screen(width: u16, height: u16) -> Screen {
        Screen::new(mint(), CorollarySet::default(), FormatOptions::default(), width, height)
    }

    fn row(buf: &Buffer, y: u16) -> String {
        (0..buf.area.width).map(|x| buf[(x, y)].symbol()).collect()
    }

    #[test]
    fn scroll_is_clamped() {
        let mut s = screen(60, 12);
        assert_eq!(s.layout().columns.len(), 1);
        let max = s.max_scroll();
        assert!(max > 0);

        s.scroll_up(3);
        assert_eq!(s.scroll(), 0);
        s.page_down();
        assert_eq!(s.scroll(), 8);
        s.go_bottom();
        assert_eq!(s.scroll(), max);
        s.scroll_down(5);
        assert_eq!(s.scroll(), max);
        assert_eq!(s.scroll_hint(), "<END>");
    }

    #[test]
    fn growing_margin_keeps_scroll_in_range() {
        let mut s = screen(60, 12);
        s.go_bottom();
        let before = s.max_scroll();
        s.set_margin_bot(3);
        assert_eq!(s.max_scroll(), before + 3);
        s.go_bottom();
        s.set_margin_bot(0);
        assert_eq!(s.scroll(), before);
    }

    #[test]
    fn click_toggles_the_entry_under_the_pointer() {
        let mut s = screen(60, 40);
        // Row 1 shows line 0: the phrase. Line 2 is the label, 3 the first def.
        let line = s.layout().line(0, 3).unwrap().clone();
        assert!(line.text.starts_with(">1 "));

        assert!(!s.mark_box_at(1, 5).unwrap());
        assert!(s.mark_box_at(4, 5).unwrap());
        assert!(s.selector().is_toggled(line.op_index));
        assert!(!s.mark_box_at(0, 5).unwrap());
        assert!(!s.mark_box_at(4, 0).unwrap());
    }

    #[test]
    fn select_keys_toggle_in_document_order() {
        let mut s = screen(60, 40);
        assert_eq!(s.dispatch(&Key::Char('1')), Dispatch::Handled);
        assert_eq!(s.dispatch(&Key::Char('!')), Dispatch::Handled);
        let toggled: Vec<usize> = s
            .selector()
            .toggleables()
            .iter()
            .copied()
            .filter(|&i| s.selector().is_toggled(i))
            .collect();
        assert_eq!(toggled, vec![3, 16]);

        let dump = s.dump_selection();
        assert_eq!(dump.len(), 2);
        assert_eq!(dump[0].definitions.len(), 1);

        s.dispatch(&Key::Char('d'));
        assert!(s.dump_selection().is_empty());
    }

    #[test]
    fn requests_carry_audio_and_url() {
        let mut s = screen(60, 40);
        assert_eq!(
            s.dispatch(&Key::Char('a')),
            Dispatch::Request(Request::PlayAudio(Some("https://example.org/mint.mp3".into())))
        );
        assert_eq!(
            s.dispatch(&Key::Char('o')),
            Dispatch::Request(Request::OpenBrowser(Some("https://example.org/mint".into())))
        );
        assert_eq!(s.dispatch(&Key::Enter), Dispatch::Request(Request::Search(None)));
        assert_eq!(s.dispatch(&Key::Char('z')), Dispatch::Ignored);
        assert_eq!(s.dispatch(&Key::Esc), Dispatch::Ignored);
    }

    #[test]
    fn hlsearch_counts_and_navigates() {
        let mut s = screen(60, 12);
        assert_eq!(s.hlsearch("To"), 4);
        assert_eq!(s.hlsearch("to"), 4);
        assert_eq!(s.hlsearch("plant"), 20);
        let mut last = s.scroll();
        while let Some(false) = s.highlight_next() {
            assert!(s.scroll() > last);
            last = s.scroll();
        }
        assert_eq!(s.dispatch(&Key::Esc), Dispatch::Handled);
        assert!(s.highlight().is_none());
        assert_eq!(s.hlsearch("absent"), 0);
    }

    #[test]
    fn draws_selection_overlay() {
        let mut s = screen(60, 40);
        s.mark_box_by_selector('1');
        let mut buf = Buffer::empty(Rect::new(0, 0, 60, 40));
        s.draw(buf.area, &mut buf, &Palette::default());

        assert_eq!(row(&buf, 1).trim(), "mint /mɪnt/");
        assert!(buf[(2, 1)].modifier.contains(Modifier::BOLD));
        assert!(row(&buf, 4).trim_start().starts_with(">1 To mint sense 0."));
        assert!(buf[(2, 4)].modifier.contains(Modifier::REVERSED));
        assert!(!buf[(2, 5)].modifier.contains(Modifier::REVERSED));
    }
}
