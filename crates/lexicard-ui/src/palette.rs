use std::collections::HashMap;
use std::str::FromStr;

use lexicard_config::colors::Colors;
use ratatui::style::{Color, Modifier, Style};

/// Abstract color role of a text run; `c.<role>` options map roles to colors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    Delimit,
    Index,
    Def1,
    Def2,
    Exsen,
    Label,
    Inflection,
    Phrase,
    Phon,
    Header,
    Etym,
    Pos,
    Syn,
    Syngloss,
    Note,
    Highlight,
    Error,
    Success,
    Attention,
    Barhint,
}

impl Role {
    pub const ALL: [Role; 20] = [
        Role::Delimit,
        Role::Index,
        Role::Def1,
        Role::Def2,
        Role::Exsen,
        Role::Label,
        Role::Inflection,
        Role::Phrase,
        Role::Phon,
        Role::Header,
        Role::Etym,
        Role::Pos,
        Role::Syn,
        Role::Syngloss,
        Role::Note,
        Role::Highlight,
        Role::Error,
        Role::Success,
        Role::Attention,
        Role::Barhint,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Role::Delimit => "delimit",
            Role::Index => "index",
            Role::Def1 => "def1",
            Role::Def2 => "def2",
            Role::Exsen => "exsen",
            Role::Label => "label",
            Role::Inflection => "inflection",
            Role::Phrase => "phrase",
            Role::Phon => "phon",
            Role::Header => "header",
            Role::Etym => "etym",
            Role::Pos => "pos",
            Role::Syn => "syn",
            Role::Syngloss => "syngloss",
            Role::Note => "note",
            Role::Highlight => "highlight",
            Role::Error => "error",
            Role::Success => "success",
            Role::Attention => "attention",
            Role::Barhint => "barhint",
        }
    }
}

/// Parse a `c.*` value. Unknown values fall back to the terminal default.
pub fn parse_color(value: &str) -> Color {
    match value.trim().to_ascii_lowercase().as_str() {
        "default" | "reset" => Color::Reset,
        "grey" => Color::Gray,
        other => Color::from_str(other).unwrap_or(Color::Reset),
    }
}

/// Role -> terminal color, resolved once per configuration change.
#[derive(Debug, Clone)]
pub struct Palette {
    colors: HashMap<Role, Color>,
}

impl Palette {
    pub fn new(colors: &Colors) -> Self {
        let colors = Role::ALL
            .iter()
            .map(|role| {
                let color = colors.get(role.name()).map_or(Color::Reset, parse_color);
                (*role, color)
            })
            .collect();
        Self { colors }
    }

    pub fn color(&self, role: Role) -> Color {
        self.colors.get(&role).copied().unwrap_or(Color::Reset)
    }

    pub fn style(&self, role: Role) -> Style {
        Style::default().fg(self.color(role))
    }

    /// Style of matched search text.
    pub fn highlight(&self) -> Style {
        Style::default()
            .fg(Color::Black)
            .bg(self.color(Role::Highlight))
            .add_modifier(Modifier::BOLD)
    }
}

impl Default for Palette {
    fn default() -> Self {
        Self::new(&Colors::default())
    }
}
