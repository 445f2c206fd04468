use std::collections::VecDeque;

use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};

use crate::palette::{Palette, Role};

const CAPACITY: usize = 32;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Normal,
    Error,
    Success,
    Attention,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusLine {
    pub header: String,
    pub body: Option<String>,
    pub severity: Severity,
}

/// Short-lived messages drawn above the bottom edge.
#[derive(Debug)]
pub struct Status {
    lines: VecDeque<StatusLine>,
    ticks: u32,
    persistence: u32,
}

impl Status {
    pub fn new(persistence: u32) -> Self {
        Self {
            lines: VecDeque::with_capacity(CAPACITY),
            ticks: 0,
            persistence: persistence.max(1),
        }
    }

    pub fn set_persistence(&mut self, persistence: u32) {
        self.persistence = persistence.max(1);
    }

    fn push(&mut self, header: &str, body: Option<&str>, severity: Severity) {
        if self.lines.len() == CAPACITY {
            self.lines.pop_front();
        }
        self.lines.push_back(StatusLine {
            header: header.to_string(),
            body: body.map(str::to_string),
            severity,
        });
        self.ticks = 0;
    }

    pub fn writeln(&mut self, header: &str, body: Option<&str>) {
        self.push(header, body, Severity::Normal);
    }

    pub fn error(&mut self, header: &str, body: Option<&str>) {
        tracing::warn!("{header}{}", body.map(|b| format!(": {b}")).unwrap_or_default());
        self.push(header, body, Severity::Error);
    }

    pub fn success(&mut self, header: &str, body: Option<&str>) {
        self.push(header, body, Severity::Success);
    }

    pub fn attention(&mut self, header: &str, body: Option<&str>) {
        self.push(header, body, Severity::Attention);
    }

    /// Called once per frame; clears the messages once they have been shown
    /// for `persistence` frames.
    pub fn tick(&mut self) {
        if self.lines.is_empty() {
            return;
        }
        self.ticks += 1;
        if self.ticks >= self.persistence {
            self.clear();
        }
    }

    pub fn clear(&mut self) {
        self.lines.clear();
        self.ticks = 0;
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn lines(&self) -> impl Iterator<Item = &StatusLine> {
        self.lines.iter()
    }

    /// Rows the status takes on a terminal `rows` high.
    pub fn height(&self, rows: u16) -> u16 {
        let cap = (f32::from(rows) * 0.6).floor() as usize;
        self.lines.len().min(cap) as u16
    }

    /// Draw the newest messages into the bottom rows of `area`.
    pub fn draw(&self, area: Rect, buf: &mut Buffer, palette: &Palette) {
        let height = self.height(area.height);
        if height == 0 {
            return;
        }
        let top = area.bottom() - height;
        let shown = self.lines.iter().skip(self.lines.len() - height as usize);

        for (row, line) in shown.enumerate() {
            let y = top + row as u16;
            let role = match line.severity {
                Severity::Normal => None,
                Severity::Error => Some(Role::Error),
                Severity::Success => Some(Role::Success),
                Severity::Attention => Some(Role::Attention),
            };
            let header_style = role
                .map_or_else(Style::default, |role| palette.style(role))
                .add_modifier(Modifier::BOLD);

            let (x, _) = buf.set_stringn(area.x, y, &line.header, area.width as usize, header_style);
            if let Some(body) = &line.body {
                let used = x - area.x;
                if used + 2 < area.width {
                    buf.set_stringn(x, y, format!(": {body}"), (area.width - used) as usize, Style::default());
                }
            }
        }
    }
}
