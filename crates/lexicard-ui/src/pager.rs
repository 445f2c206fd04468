use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::Modifier;

use crate::format::ParsedLine;
use crate::highlight::Highlight;
use crate::keys::Key;
use crate::page::{Dispatch, Page, draw_line, scroll_hint};
use crate::palette::{Palette, Role};

const WHEEL_STEP: usize = 2;

/// Scrollable view of pre-formatted lines, used for the help text.
#[derive(Debug)]
pub struct Pager {
    title: String,
    lines: Vec<ParsedLine>,
    width: u16,
    height: u16,
    margin_bot: u16,
    scroll: usize,
    hscroll: usize,
    hscroll_ratio: f32,
    highlight: Option<Highlight>,
}

impl Pager {
    pub fn new(title: impl Into<String>, lines: Vec<ParsedLine>, width: u16, height: u16) -> Self {
        Self {
            title: title.into(),
            lines,
            width,
            height,
            margin_bot: 0,
            scroll: 0,
            hscroll: 0,
            hscroll_ratio: 0.67,
            highlight: None,
        }
    }

    pub fn set_hscroll_ratio(&mut self, ratio: f32) {
        self.hscroll_ratio = ratio.clamp(0.1, 1.0);
    }

    pub fn scroll(&self) -> usize {
        self.scroll
    }

    pub fn hscroll(&self) -> usize {
        self.hscroll
    }

    fn content_height(&self) -> usize {
        usize::from(self.height).saturating_sub(2 + usize::from(self.margin_bot))
    }

    /// Cells per line between the truncation arrows.
    fn text_width(&self) -> usize {
        usize::from(self.width).saturating_sub(4)
    }

    pub fn max_scroll(&self) -> usize {
        self.lines.len().saturating_sub(self.content_height())
    }

    pub fn max_hscroll(&self) -> usize {
        let longest = self.lines.iter().map(ParsedLine::len).max().unwrap_or(0);
        longest.saturating_sub(self.text_width())
    }

    fn hscroll_step(&self) -> usize {
        ((f32::from(self.width) * self.hscroll_ratio) as usize).max(1)
    }

    pub fn scroll_down(&mut self, n: usize) {
        self.scroll = (self.scroll + n).min(self.max_scroll());
    }

    pub fn scroll_up(&mut self, n: usize) {
        self.scroll = self.scroll.saturating_sub(n);
    }

    pub fn scroll_right(&mut self) {
        self.hscroll = (self.hscroll + self.hscroll_step()).min(self.max_hscroll());
    }

    pub fn scroll_left(&mut self) {
        self.hscroll = self.hscroll.saturating_sub(self.hscroll_step());
    }

    fn clamp(&mut self) {
        self.scroll = self.scroll.min(self.max_scroll());
        self.hscroll = self.hscroll.min(self.max_hscroll());
    }

    fn step(&mut self, next: bool) {
        let max_scroll = self.max_scroll();
        if let Some(highlight) = self.highlight.as_mut() {
            let (scroll, _) = if next {
                highlight.next(self.scroll, max_scroll)
            } else {
                highlight.prev(self.scroll, max_scroll)
            };
            self.scroll = scroll;
        }
    }
}

impl Page for Pager {
    fn title(&self) -> String {
        self.title.clone()
    }

    fn draw(&self, area: Rect, buf: &mut Buffer, palette: &Palette) {
        let width = self.text_width();
        let height = self.content_height().min(usize::from(area.height.saturating_sub(2)));
        let arrow = palette.style(Role::Delimit).add_modifier(Modifier::BOLD);

        for row in 0..height {
            let index = self.scroll + row;
            let Some(line) = self.lines.get(index) else {
                break;
            };
            let y = area.y + 1 + row as u16;
            let matches = self
                .highlight
                .as_ref()
                .map_or(&[][..], |hl| hl.matches(0, index));
            let clipped = draw_line(
                buf,
                area.x + 2,
                y,
                width,
                line,
                self.hscroll,
                Modifier::empty(),
                matches,
                palette,
            );
            if self.hscroll > 0 && !line.is_empty() {
                buf.set_string(area.x + 1, y, "«", arrow);
            }
            if clipped {
                buf.set_string(area.x + 2 + width as u16, y, "»", arrow);
            }
        }
    }

    fn dispatch(&mut self, key: &Key) -> Dispatch {
        match key {
            Key::Char('j') | Key::Down => self.scroll_down(1),
            Key::Char('k') | Key::Up => self.scroll_up(1),
            Key::Char(' ') | Key::PageDown => {
                self.scroll_down(self.content_height().saturating_sub(2).max(1));
            }
            Key::Char('b') | Key::PageUp => {
                self.scroll_up(self.content_height().saturating_sub(2).max(1));
            }
            Key::Char('g') | Key::Home => self.scroll = 0,
            Key::Char('G') | Key::End => self.scroll = self.max_scroll(),
            Key::WheelDown => self.scroll_down(WHEEL_STEP),
            Key::WheelUp => self.scroll_up(WHEEL_STEP),
            Key::Right => self.scroll_right(),
            Key::Left => self.scroll_left(),
            Key::Char('n') => self.step(true),
            Key::Char('N') => self.step(false),
            Key::Esc if self.highlight.is_some() => self.hlclear(),
            _ => return Dispatch::Ignored,
        }
        Dispatch::Handled
    }

    fn resize(&mut self, width: u16, height: u16) {
        self.width = width;
        self.height = height;
        self.clamp();
    }

    fn margin_bot(&self) -> u16 {
        self.margin_bot
    }

    fn set_margin_bot(&mut self, margin: u16) {
        self.margin_bot = margin;
        self.clamp();
    }

    fn scroll_hint(&self) -> String {
        scroll_hint(self.scroll, self.max_scroll())
    }

    fn hlsearch(&mut self, pattern: &str) -> usize {
        self.highlight = Highlight::search(std::slice::from_ref(&self.lines), pattern);
        self.highlight.as_ref().map_or(0, Highlight::nmatches)
    }

    fn hlclear(&mut self) {
        self.highlight = None;
    }
}
