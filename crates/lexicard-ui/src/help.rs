use crate::format::{Paint, ParsedLine, compose_attrs};
use crate::palette::Role;

const KEY_COLUMN: usize = 22;

const SECTIONS: &[(&str, &[(&str, &str)])] = &[
    (
        "Global",
        &[
            ("q  F10", "quit"),
            ("F1  ?", "show or hide this help"),
            ("l  Right", "next page"),
            ("h  Left", "previous page"),
            ("Tab  Shift-Tab", "cycle pages"),
            ("/", "find in page"),
            (":", "set an option"),
            ("F8", "configure Anki"),
            ("^L", "redraw"),
        ],
    ),
    (
        "Dictionary",
        &[
            ("j k  Down Up", "scroll one line"),
            ("Space b  PgDn PgUp", "scroll one page"),
            ("g G  Home End", "go to top or bottom"),
            ("1-0  !-)", "select definitions 1 to 20"),
            ("click", "select the definition under the pointer"),
            ("d", "deselect all"),
            ("n N", "next or previous match"),
            ("Esc", "clear matches"),
            ("p  Enter  Insert", "search"),
            ("middle click", "search the clipboard"),
            ("a", "play audio"),
            ("o", "open the page in a browser"),
            ("c", "create cards from the selection"),
        ],
    ),
    (
        "Search",
        &[
            ("word, other", "search several phrases"),
            ("word -f -w", "ask specific dictionaries"),
            ("word -c", "compare primary and secondary"),
            ("word -noun", "keep definitions labeled noun"),
        ],
    ),
    (
        "Prompt",
        &[
            ("^B ^F  Left Right", "move one char"),
            ("Alt-b Alt-f", "move one word"),
            ("^A ^E  Home End", "go to start or end"),
            ("^D  Delete", "delete char"),
            ("^W", "delete previous word"),
            ("^K", "delete to end of line"),
            ("^T", "keep only the word under the cursor"),
            ("Tab ^N  Shift-Tab ^P", "cycle completions"),
            ("Up Down", "walk history"),
            ("^C  Esc", "cancel"),
        ],
    ),
];

/// Lines of the help page.
pub fn help_lines() -> Vec<ParsedLine> {
    let mut lines = Vec::new();
    for (section, bindings) in SECTIONS {
        if !lines.is_empty() {
            lines.push(ParsedLine::blank(0));
        }
        lines.push(ParsedLine::painted(0, section.to_string(), Paint::bold(Role::Header)));
        for (keys, action) in *bindings {
            let text = format!("  {keys:<width$}{action}", width = KEY_COLUMN);
            let attrs = compose_attrs(
                &[
                    (2, Paint::of(Role::Delimit), 0),
                    (KEY_COLUMN, Paint::of(Role::Index), 0),
                    (usize::MAX, Paint::of(Role::Def1), 0),
                ],
                text.chars().count(),
            );
            lines.push(ParsedLine {
                op_index: 0,
                text,
                attrs,
            });
        }
    }
    lines
}

/// One-line hint drawn under the border when no status is shown.
pub const FUNCTION_BAR: &str = "F1 help  p search  c cards  a audio  / find  : options  F8 anki  q quit";
