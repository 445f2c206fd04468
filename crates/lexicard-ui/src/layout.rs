use lexicard_types::{Dictionary, Op};

use crate::format::{FormatOptions, ParsedLine, format_dictionary};

/// Width a column should have before another one is added.
pub const AUTO_COLUMN_WIDTH: usize = 52;
/// Blank cells on each side of a column's text.
pub const MARGIN: usize = 1;

/// Formatter output packed into columns of equal width.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Layout {
    pub columns: Vec<Vec<ParsedLine>>,
    pub column_width: usize,
}

/// Column count wanted for `dictionary` on a screen `width` x `height`.
pub fn column_count(dictionary: &Dictionary, width: usize, height: usize) -> usize {
    let defs = dictionary.count_defs();
    let wanted = if defs < 6 {
        1
    } else if defs < 12 && dictionary.len() < height {
        2
    } else {
        3
    };
    let fit = width.saturating_sub(2) / AUTO_COLUMN_WIDTH;
    wanted.min(fit).max(1)
}

fn ends_block(dictionary: &Dictionary, lines: &[ParsedLine], i: usize) -> bool {
    let op_index = lines[i].op_index;
    let next_differs = lines.get(i + 1).is_none_or(|next| next.op_index != op_index);
    next_differs && matches!(dictionary.get(op_index), Some(Op::Def(_) | Op::Etym { .. }))
}

impl Layout {
    /// Lay `dictionary` out for a screen `width` columns wide, borders
    /// included, showing `height` lines.
    pub fn build(dictionary: &Dictionary, width: usize, height: usize, opts: &FormatOptions) -> Self {
        let ncols = column_count(dictionary, width, height);
        let usable = width.saturating_sub(2);
        let column_width = (usable / ncols).saturating_sub(1).max(1);
        let lines = format_dictionary(dictionary, column_width.saturating_sub(2 * MARGIN), opts);

        let mut columns: Vec<Vec<ParsedLine>> = vec![Vec::new(); ncols];
        let height_target = lines.len().div_ceil(ncols).saturating_sub(1).max(1);
        let mut column = 0;
        let mut column_break = height_target;

        for (i, line) in lines.iter().enumerate() {
            columns[column].push(line.clone());
            if column + 1 < ncols && i >= column_break && ends_block(dictionary, &lines, i) {
                column += 1;
                column_break = (column + 1) * height_target;
            }
        }

        Self {
            columns,
            column_width,
        }
    }

    /// Length of the longest column.
    pub fn height(&self) -> usize {
        self.columns.iter().map(Vec::len).max().unwrap_or(0)
    }

    pub fn line(&self, column: usize, index: usize) -> Option<&ParsedLine> {
        self.columns.get(column).and_then(|c| c.get(index))
    }

    /// Column whose cells include screen x `x` (the left border is x 0).
    pub fn column_at(&self, x: usize) -> Option<usize> {
        let column = x.checked_sub(1)? / (self.column_width + 1);
        (column < self.columns.len()).then_some(column)
    }
}

#[cfg(test)]
mod tests {
    use lexicard_types::Def;

    use super::*;

    fn dictionary(defs: usize) -> Dictionary {
        let mut ops = vec![Op::header("Test"), Op::phrase("mint", "/mɪnt/"), Op::label("noun", "")];
        for i in 0..defs {
            ops.push(Op::Def(
                Def::new(format!("definition number {i} of a moderately long text"))
                    .with_examples([format!("example {i}")]),
            ));
        }
        ops.push(Op::etym("Old English mynet, from Latin moneta"));
        Dictionary::from_ops("Test", ops)
    }

    #[test]
    fn column_count_heuristic() {
        assert_eq!(column_count(&dictionary(5), 200, 50), 1);
        assert_eq!(column_count(&dictionary(8), 200, 50), 2);
        assert_eq!(column_count(&dictionary(8), 200, 5), 3);
        assert_eq!(column_count(&dictionary(20), 200, 50), 3);
        // Capped by what fits.
        assert_eq!(column_count(&dictionary(20), 110, 50), 2);
        assert_eq!(column_count(&dictionary(20), 40, 50), 1);
    }

    #[test]
    fn columns_concatenate_to_formatter_output() {
        let opts = FormatOptions::default();
        for (defs, width, height) in [(3, 80, 24), (9, 160, 40), (25, 200, 30), (25, 170, 10)] {
            let dict = dictionary(defs);
            let layout = Layout::build(&dict, width, height, &opts);
            let expected = format_dictionary(&dict, layout.column_width - 2 * MARGIN, &opts);
            let joined: Vec<ParsedLine> = layout.columns.concat();
            assert_eq!(joined, expected, "{defs} defs at {width}x{height}");
        }
    }

    #[test]
    fn columns_break_after_whole_definitions() {
        let dict = dictionary(25);
        let layout = Layout::build(&dict, 200, 30, &FormatOptions::default());
        assert_eq!(layout.columns.len(), 3);
        assert!(layout.columns.iter().all(|c| !c.is_empty()));
        for column in &layout.columns[..2] {
            let last = column.last().unwrap();
            assert!(matches!(dict.get(last.op_index), Some(Op::Def(_) | Op::Etym { .. })));
        }
        for column in &layout.columns[1..] {
            assert!(column[0].text.starts_with('>'), "{:?}", column[0].text);
        }
    }

    #[test]
    fn column_hit_test() {
        let layout = Layout {
            columns: vec![Vec::new(), Vec::new()],
            column_width: 10,
        };
        assert_eq!(layout.column_at(0), None);
        assert_eq!(layout.column_at(1), Some(0));
        assert_eq!(layout.column_at(11), Some(0));
        assert_eq!(layout.column_at(12), Some(1));
        assert_eq!(layout.column_at(22), Some(1));
        assert_eq!(layout.column_at(23), None);
    }
}
