use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};

use crate::format::ParsedLine;
use crate::keys::Key;
use crate::palette::Palette;

/// Work a page cannot do by itself and hands up to the application.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Request {
    Quit,
    /// Clear and repaint the terminal.
    Redraw,
    /// Open the search prompt, optionally pre-filled.
    Search(Option<String>),
    FindInPage,
    Command,
    AnkiSetup,
    CreateCards,
    /// `None` when the current dictionary has no audio.
    PlayAudio(Option<String>),
    /// `None` when the current dictionary has no page URL.
    OpenBrowser(Option<String>),
    /// Search for the clipboard contents.
    Paste,
}

/// Outcome of routing a key through a page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Dispatch {
    Handled,
    Ignored,
    Request(Request),
}

/// One full-window view drawn inside the border.
pub trait Page {
    fn title(&self) -> String;

    fn draw(&self, area: Rect, buf: &mut Buffer, palette: &Palette);

    fn dispatch(&mut self, key: &Key) -> Dispatch;

    fn resize(&mut self, width: u16, height: u16);

    /// Rows reserved under the bottom border.
    fn margin_bot(&self) -> u16;

    fn set_margin_bot(&mut self, margin: u16);

    /// Text shown on the bottom border.
    fn scroll_hint(&self) -> String;

    /// Highlight `pattern`, returning the number of matches.
    fn hlsearch(&mut self, pattern: &str) -> usize;

    fn hlclear(&mut self);
}

/// `<TOP>`, `<END>` or the percentage scrolled; empty when everything fits.
pub fn scroll_hint(scroll: usize, max_scroll: usize) -> String {
    if max_scroll == 0 {
        String::new()
    } else if scroll == 0 {
        "<TOP>".to_string()
    } else if scroll >= max_scroll {
        "<END>".to_string()
    } else {
        format!("{}%", scroll * 100 / max_scroll)
    }
}

fn style_at(line: &ParsedLine, index: usize, palette: &Palette) -> Style {
    line.attrs
        .iter()
        .find(|attr| index >= attr.offset && index < attr.offset + attr.span)
        .map_or_else(Style::default, |attr| {
            let style = palette.style(attr.paint.role);
            if attr.paint.bold {
                style.add_modifier(Modifier::BOLD)
            } else {
                style
            }
        })
}

/// Paint `line` at `(x, y)`, skipping its first `skip` chars and clipping it
/// to `width`. `overlay` is added to every run; chars inside `matches` take
/// the highlight style. Returns true when the line continues past `width`.
#[allow(clippy::too_many_arguments)]
pub(crate) fn draw_line(
    buf: &mut Buffer,
    x: u16,
    y: u16,
    width: usize,
    line: &ParsedLine,
    skip: usize,
    overlay: Modifier,
    matches: &[(usize, usize)],
    palette: &Palette,
) -> bool {
    let mut clipped = false;
    for (index, c) in line.text.chars().enumerate().skip(skip) {
        let column = index - skip;
        if column >= width {
            clipped = true;
            break;
        }
        let highlighted = matches
            .iter()
            .any(|&(offset, len)| index >= offset && index < offset + len);
        let style = if highlighted {
            palette.highlight()
        } else {
            style_at(line, index, palette).add_modifier(overlay)
        };
        if let Some(cell) = buf.cell_mut((x + column as u16, y)) {
            cell.set_char(c).set_style(style);
        }
    }
    clipped
}
