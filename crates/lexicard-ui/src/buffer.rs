use std::sync::Arc;

use lexicard_config::Config;
use lexicard_core::CorollarySet;
use lexicard_types::{Dictionary, DictionarySelection};
use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Widget};

use crate::format::FormatOptions;
use crate::help::{FUNCTION_BAR, help_lines};
use crate::keys::Key;
use crate::page::{Dispatch, Page, Request};
use crate::pager::Pager;
use crate::palette::{Palette, Role};
use crate::screen::Screen;
use crate::status::Status;

/// Every page of the session plus the status overlay, and the key routing
/// between them.
#[derive(Debug)]
pub struct ScreenBuffer {
    screens: Vec<Screen>,
    current: usize,
    help: Pager,
    show_help: bool,
    status: Status,
    palette: Palette,
    opts: FormatOptions,
    corollary: CorollarySet,
    nohelp: bool,
    width: u16,
    height: u16,
}

impl ScreenBuffer {
    pub fn new(config: &Config, width: u16, height: u16) -> Self {
        let mut help = Pager::new("Help", help_lines(), width, height);
        help.set_hscroll_ratio(config.ui.hscroll_ratio);
        Self {
            screens: Vec::new(),
            current: 0,
            help,
            show_help: false,
            status: Status::new(config.ui.status_persistence),
            palette: Palette::new(&config.colors),
            opts: FormatOptions {
                shortetyms: config.ui.shortetyms,
            },
            corollary: CorollarySet::from(&config.card),
            nohelp: config.ui.nohelp,
            width,
            height,
        }
    }

    /// Replace every screen with one per dictionary.
    pub fn set_screens(&mut self, dictionaries: Vec<Arc<Dictionary>>) {
        self.screens = dictionaries
            .into_iter()
            .map(|dictionary| Screen::new(dictionary, self.corollary, self.opts, self.width, self.height))
            .collect();
        self.current = 0;
        self.show_help = false;
        tracing::debug!("{} screens", self.screens.len());
    }

    pub fn screens(&self) -> &[Screen] {
        &self.screens
    }

    pub fn current_index(&self) -> usize {
        self.current
    }

    pub fn current_screen(&self) -> Option<&Screen> {
        self.screens.get(self.current)
    }

    pub fn is_help_shown(&self) -> bool {
        self.show_help || self.screens.is_empty()
    }

    pub fn status(&self) -> &Status {
        &self.status
    }

    pub fn status_mut(&mut self) -> &mut Status {
        &mut self.status
    }

    pub fn palette(&self) -> &Palette {
        &self.palette
    }

    fn page(&self) -> &dyn Page {
        match self.screens.get(self.current) {
            Some(screen) if !self.show_help => screen,
            _ => &self.help,
        }
    }

    fn page_mut(&mut self) -> &mut dyn Page {
        match self.screens.get_mut(self.current) {
            Some(screen) if !self.show_help => screen,
            _ => &mut self.help,
        }
    }

    /// Selections of every screen, in page order.
    pub fn selections(&self) -> Vec<DictionarySelection> {
        self.screens.iter().flat_map(Screen::dump_selection).collect()
    }

    /// Pick up changed options: colors, corollary set and layout options.
    pub fn apply_config(&mut self, config: &Config) {
        self.palette = Palette::new(&config.colors);
        self.status.set_persistence(config.ui.status_persistence);
        self.help.set_hscroll_ratio(config.ui.hscroll_ratio);
        self.nohelp = config.ui.nohelp;
        self.corollary = CorollarySet::from(&config.card);
        self.opts = FormatOptions {
            shortetyms: config.ui.shortetyms,
        };
        for screen in &mut self.screens {
            screen.set_corollary(self.corollary);
            screen.set_format_options(self.opts);
        }
    }

    pub fn resize(&mut self, width: u16, height: u16) {
        self.width = width;
        self.height = height;
        for screen in &mut self.screens {
            screen.resize(width, height);
        }
        self.help.resize(width, height);
    }

    /// Highlight `pattern` on the current page and report the count.
    pub fn find_in_page(&mut self, pattern: &str) -> usize {
        let n = self.page_mut().hlsearch(pattern);
        if n == 0 {
            self.status.error("Pattern not found", Some(pattern));
        } else {
            self.status.writeln(&format!("{n} matches"), Some(pattern));
        }
        n
    }

    fn next_page(&mut self) {
        if self.show_help {
            self.show_help = false;
        } else if self.current + 1 < self.screens.len() {
            self.current += 1;
        }
    }

    fn prev_page(&mut self) {
        if self.show_help {
            self.show_help = false;
        } else {
            self.current = self.current.saturating_sub(1);
        }
    }

    fn cycle(&mut self, forward: bool) {
        let n = self.screens.len();
        if n == 0 {
            return;
        }
        self.show_help = false;
        self.current = if forward {
            (self.current + 1) % n
        } else {
            (self.current + n - 1) % n
        };
    }

    /// Route a key: the current page first, then the global actions.
    pub fn dispatch(&mut self, key: &Key) -> Dispatch {
        if let Key::Resize(width, height) = key {
            self.resize(*width, *height);
            return Dispatch::Handled;
        }

        match self.page_mut().dispatch(key) {
            Dispatch::Ignored => {}
            Dispatch::Request(Request::PlayAudio(None)) => {
                self.status.error("NoAudio", Some("nothing to play"));
                return Dispatch::Handled;
            }
            Dispatch::Request(Request::OpenBrowser(None)) => {
                self.status.error("NoUrl", Some("this dictionary has no page"));
                return Dispatch::Handled;
            }
            handled => return handled,
        }

        let request = match key {
            Key::Ctrl('l') => Request::Redraw,
            Key::Char('l') | Key::Right => {
                self.next_page();
                return Dispatch::Handled;
            }
            Key::Char('h') | Key::Left => {
                self.prev_page();
                return Dispatch::Handled;
            }
            Key::Tab => {
                self.cycle(true);
                return Dispatch::Handled;
            }
            Key::BackTab => {
                self.cycle(false);
                return Dispatch::Handled;
            }
            Key::F(1) | Key::Char('?') => {
                self.show_help = !self.show_help;
                return Dispatch::Handled;
            }
            Key::F(8) => Request::AnkiSetup,
            Key::Char('/') => Request::FindInPage,
            Key::Char(':') => Request::Command,
            Key::Char('q') | Key::F(10) => Request::Quit,
            Key::Char('p') | Key::Insert | Key::Enter => Request::Search(None),
            Key::MiddleClick => Request::Paste,
            _ => return Dispatch::Ignored,
        };
        Dispatch::Request(request)
    }

    /// Rows under the bottom border: the status, else the function bar.
    fn margin_bot(&self) -> u16 {
        if self.status.is_empty() {
            u16::from(!self.nohelp)
        } else {
            self.status.height(self.height)
        }
    }

    fn tabs(&self) -> Line<'static> {
        let delimit = self.palette.style(Role::Delimit);
        let current = self
            .palette
            .style(Role::Header)
            .add_modifier(Modifier::BOLD | Modifier::REVERSED);
        let plain = self.palette.style(Role::Header);

        let mut spans = Vec::new();
        for (i, screen) in self.screens.iter().enumerate() {
            let style = if i == self.current && !self.show_help {
                current
            } else {
                plain
            };
            spans.push(Span::styled("[", delimit));
            spans.push(Span::styled(format!(" {} ", screen.title()), style));
            spans.push(Span::styled("]", delimit));
        }
        if self.is_help_shown() {
            spans.push(Span::styled("[", delimit));
            spans.push(Span::styled(" Help ", current));
            spans.push(Span::styled("]", delimit));
        }
        Line::from(spans)
    }

    /// Draw the current page, the border and the bottom rows, then advance
    /// the status clock.
    pub fn draw(&mut self, area: Rect, buf: &mut Buffer) {
        buf.set_style(area, Style::reset());

        let margin = self.margin_bot().min(area.height.saturating_sub(3));
        self.page_mut().set_margin_bot(margin);

        let page = self.page();
        page.draw(area, buf, &self.palette);

        let framed = Rect::new(area.x, area.y, area.width, area.height - margin);
        let hint = page.scroll_hint();
        let mut block = Block::bordered()
            .border_style(self.palette.style(Role::Delimit))
            .title(self.tabs());
        if !hint.is_empty() {
            block = block.title_bottom(Line::from(format!(" {hint} ")).right_aligned());
        }
        block.render(framed, buf);

        if !self.status.is_empty() {
            self.status.draw(area, buf, &self.palette);
        } else if !self.nohelp && margin > 0 {
            buf.set_stringn(
                area.x,
                area.bottom() - 1,
                FUNCTION_BAR,
                usize::from(area.width),
                self.palette.style(Role::Barhint),
            );
        }
        self.status.tick();
    }
}
