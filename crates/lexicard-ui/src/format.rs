use lexicard_types::{Def, Dictionary, Op, Syn};

use crate::palette::Role;
use crate::wrap::{Initial, wrap};

/// Color role plus boldness of a run of text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Paint {
    pub role: Role,
    pub bold: bool,
}

impl Paint {
    pub const fn of(role: Role) -> Self {
        Self { role, bold: false }
    }

    pub const fn bold(role: Role) -> Self {
        Self { role, bold: true }
    }
}

/// A painted run of a line, in chars.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Attr {
    pub offset: usize,
    pub span: usize,
    pub paint: Paint,
}

/// One display line and the entry it came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedLine {
    pub op_index: usize,
    pub text: String,
    pub attrs: Vec<Attr>,
}

impl ParsedLine {
    pub fn blank(op_index: usize) -> Self {
        Self {
            op_index,
            text: String::new(),
            attrs: Vec::new(),
        }
    }

    /// A line painted in one run.
    pub fn painted(op_index: usize, text: String, paint: Paint) -> Self {
        let attrs = compose_attrs(&[(usize::MAX, paint, 0)], text.chars().count());
        Self {
            op_index,
            text,
            attrs,
        }
    }

    pub fn len(&self) -> usize {
        self.text.chars().count()
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }
}

/// Lay `(span, paint, gap)` runs left to right, clamping them to `width`.
pub fn compose_attrs(runs: &[(usize, Paint, usize)], width: usize) -> Vec<Attr> {
    let mut attrs = Vec::with_capacity(runs.len());
    let mut offset = 0;
    for &(span, paint, gap) in runs {
        if offset >= width {
            break;
        }
        let span = span.min(width - offset);
        if span > 0 {
            attrs.push(Attr {
                offset,
                span,
                paint,
            });
        }
        offset = offset.saturating_add(span).saturating_add(gap);
    }
    attrs
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FormatOptions {
    /// Cut etymologies at their first clause.
    pub shortetyms: bool,
}

fn first_clause(etymology: &str) -> &str {
    match etymology.find([';', ':']) {
        Some(end) => etymology[..end].trim_end(),
        None => etymology,
    }
}

struct Formatter<'a> {
    width: usize,
    opts: &'a FormatOptions,
    lines: Vec<ParsedLine>,
    /// Running number of toggleable entries.
    index: usize,
}

impl Formatter<'_> {
    fn push(&mut self, line: ParsedLine) {
        self.lines.push(line);
    }

    fn blank(&mut self, op_index: usize) {
        if !self.lines.is_empty() {
            self.push(ParsedLine::blank(op_index));
        }
    }

    fn wrapped(&mut self, op_index: usize, text: &str, initial: Initial, indent: &str, paint: Paint) {
        for line in wrap(self.width, text, initial, indent).0 {
            self.push(ParsedLine::painted(op_index, line, paint));
        }
    }

    /// `head` and `tail` wrapped as one text, `tail` starting on the last
    /// line of `head` when it fits.
    fn merged(&mut self, op_index: usize, head: &str, head_paint: Paint, tail: &str, tail_paint: Paint) {
        let (mut head_lines, pos) = wrap(self.width, head, Initial::Prefix(String::new()), "");
        let last = head_lines.pop().unwrap_or_default();
        for line in head_lines {
            self.push(ParsedLine::painted(op_index, line, head_paint));
        }

        if tail.trim().is_empty() {
            self.push(ParsedLine::painted(op_index, last, head_paint));
            return;
        }

        let start = if last.is_empty() { 0 } else { pos };
        let mut tail_lines = wrap(self.width, tail, Initial::Column(start), "").0.into_iter();
        let first = tail_lines.next().unwrap_or_default();

        if first.is_empty() {
            self.push(ParsedLine::painted(op_index, last, head_paint));
        } else if last.is_empty() {
            self.push(ParsedLine::painted(op_index, first, tail_paint));
        } else {
            let head_len = last.chars().count();
            let text = format!("{last} {first}");
            let attrs = compose_attrs(
                &[(head_len, head_paint, 1), (usize::MAX, tail_paint, 0)],
                text.chars().count(),
            );
            self.push(ParsedLine {
                op_index,
                text,
                attrs,
            });
        }
        for line in tail_lines {
            self.push(ParsedLine::painted(op_index, line, tail_paint));
        }
    }

    /// Numbered lines of a toggleable entry; returns the continuation indent.
    fn numbered(&mut self, op_index: usize, marker: &str, label: &str, text: &str, paint: Paint) -> String {
        self.index += 1;
        let number = format!("{marker}{}", self.index);
        let number_len = number.chars().count();
        let indent = " ".repeat(number_len + 1);

        let mut prefix = format!("{number} ");
        if !label.is_empty() {
            prefix.push_str(label);
            prefix.push(' ');
        }

        let lines = wrap(self.width, text, Initial::Prefix(prefix), &indent).0;
        for (i, line) in lines.into_iter().enumerate() {
            let len = line.chars().count();
            let attrs = if i > 0 {
                compose_attrs(&[(usize::MAX, paint, 0)], len)
            } else if label.is_empty() {
                compose_attrs(&[(number_len, Paint::of(Role::Index), 1), (usize::MAX, paint, 0)], len)
            } else {
                compose_attrs(
                    &[
                        (number_len, Paint::of(Role::Index), 1),
                        (label.chars().count(), Paint::of(Role::Label), 1),
                        (usize::MAX, paint, 0),
                    ],
                    len,
                )
            };
            self.push(ParsedLine {
                op_index,
                text: line,
                attrs,
            });
        }
        indent
    }

    fn examples(&mut self, op_index: usize, examples: &[String], indent: &str) {
        for example in examples {
            self.wrapped(
                op_index,
                example,
                Initial::Prefix(indent.to_string()),
                indent,
                Paint::of(Role::Exsen),
            );
        }
    }

    fn def(&mut self, op_index: usize, def: &Def) {
        let marker = if def.subdef { " " } else { ">" };
        let paint = if (self.index + 1) % 2 == 1 {
            Paint::of(Role::Def1)
        } else {
            Paint::of(Role::Def2)
        };
        let indent = self.numbered(op_index, marker, &def.label, &def.definition, paint);
        self.examples(op_index, &def.examples, &format!("{indent}  "));
    }

    fn syn(&mut self, op_index: usize, syn: &Syn) {
        let indent = self.numbered(op_index, ">", "", &syn.synonyms, Paint::bold(Role::Syn));
        if !syn.definition.is_empty() {
            self.wrapped(
                op_index,
                &syn.definition,
                Initial::Prefix(format!("{indent}: ")),
                &format!("{indent}  "),
                Paint::of(Role::Syngloss),
            );
        }
        self.examples(op_index, &syn.examples, &format!("{indent}  "));
    }

    fn header(&mut self, op_index: usize, header: &str) {
        if op_index == 0 {
            return;
        }
        self.blank(op_index);
        let rule = "─".repeat(self.width);
        if header.is_empty() {
            self.push(ParsedLine::painted(op_index, rule, Paint::of(Role::Delimit)));
            return;
        }

        let title_len = header.chars().count();
        let text: String = format!("─[ {header} ]{rule}").chars().take(self.width).collect();
        let attrs = compose_attrs(
            &[
                (3, Paint::of(Role::Delimit), 0),
                (title_len, Paint::bold(Role::Header), 0),
                (usize::MAX, Paint::of(Role::Delimit), 0),
            ],
            text.chars().count(),
        );
        self.push(ParsedLine {
            op_index,
            text,
            attrs,
        });
    }

    fn note(&mut self, op_index: usize, note: &str) {
        let lines = wrap(self.width, note, Initial::Prefix("> ".to_string()), "  ").0;
        for (i, line) in lines.into_iter().enumerate() {
            let len = line.chars().count();
            let attrs = if i == 0 {
                compose_attrs(
                    &[(2, Paint::of(Role::Attention), 0), (usize::MAX, Paint::bold(Role::Note), 0)],
                    len,
                )
            } else {
                compose_attrs(&[(usize::MAX, Paint::bold(Role::Note), 0)], len)
            };
            self.push(ParsedLine {
                op_index,
                text: line,
                attrs,
            });
        }
    }

    fn op(&mut self, op_index: usize, op: &Op) {
        match op {
            Op::Def(def) => self.def(op_index, def),
            Op::Label { label, extra } => {
                self.blank(op_index);
                self.merged(op_index, label, Paint::of(Role::Label), extra, Paint::of(Role::Inflection));
            }
            Op::Phrase(phrase) => {
                self.blank(op_index);
                self.merged(
                    op_index,
                    &phrase.phrase,
                    Paint::bold(Role::Phrase),
                    &phrase.extra,
                    Paint::of(Role::Phon),
                );
            }
            Op::Header { header } => self.header(op_index, header),
            Op::Etym { etymology } => {
                self.blank(op_index);
                let text = if self.opts.shortetyms {
                    first_clause(etymology)
                } else {
                    etymology
                };
                self.wrapped(
                    op_index,
                    text,
                    Initial::Prefix(String::new()),
                    "",
                    Paint::of(Role::Etym),
                );
            }
            Op::Pos(pos) => {
                self.blank(op_index);
                for (part, phon) in &pos.pos {
                    self.merged(op_index, part, Paint::of(Role::Pos), phon, Paint::of(Role::Phon));
                }
            }
            Op::Audio { .. } => {}
            Op::Syn(syn) => self.syn(op_index, syn),
            Op::Note { note } => self.note(op_index, note),
        }
    }
}

/// Display lines of `dictionary` for a column `width` chars wide.
pub fn format_dictionary(dictionary: &Dictionary, width: usize, opts: &FormatOptions) -> Vec<ParsedLine> {
    let mut formatter = Formatter {
        width: width.max(1),
        opts,
        lines: Vec::new(),
        index: 0,
    };
    for (op_index, op) in dictionary.iter().enumerate() {
        formatter.op(op_index, op);
    }
    formatter.lines
}
