//! Label filtering driven by free-form query flags (`mint -n`, `run -verb`).

use lexicard_types::{Dictionary, Op};

fn label_matches(label: &str, flags: &[String]) -> bool {
    let label = label.to_lowercase();
    label
        .split(|c: char| !c.is_alphanumeric())
        .filter(|word| !word.is_empty())
        .any(|word| flags.iter().any(|flag| word.starts_with(flag.as_str())))
}

/// Keep only definitions under a LABEL (or carrying a label) that matches one
/// of `flags`. Phrase blocks left without any DEF or SYN are dropped.
///
/// Returns `None` when nothing selectable survives.
pub fn filter_by_labels(dictionary: &Dictionary, flags: &[String]) -> Option<Dictionary> {
    if flags.is_empty() {
        return Some(dictionary.clone());
    }

    let mut kept: Vec<Op> = Vec::with_capacity(dictionary.len());
    let mut section_matches = false;
    for op in dictionary {
        let keep = match op {
            Op::Phrase(_) => {
                section_matches = false;
                true
            }
            Op::Label { label, .. } => {
                section_matches = label_matches(label, flags);
                section_matches
            }
            Op::Def(def) => section_matches || label_matches(&def.label, flags),
            Op::Syn(_) => section_matches,
            Op::Header { .. }
            | Op::Etym { .. }
            | Op::Pos(_)
            | Op::Audio { .. }
            | Op::Note { .. } => true,
        };
        if keep {
            kept.push(op.clone());
        }
    }

    // Drop phrase blocks that lost every selectable entry.
    let mut result: Vec<Op> = Vec::with_capacity(kept.len());
    let mut block: Vec<Op> = Vec::new();
    let mut in_block = false;
    let flush = |block: &mut Vec<Op>, result: &mut Vec<Op>| {
        if block.iter().any(Op::is_toggleable) {
            result.append(block);
        } else {
            block.clear();
        }
    };
    for op in kept {
        match op {
            Op::Phrase(_) => {
                if in_block {
                    flush(&mut block, &mut result);
                }
                in_block = true;
                block.push(op);
            }
            // A trailing rule closes the last block rather than belonging to it.
            Op::Header { .. } if in_block => {
                flush(&mut block, &mut result);
                in_block = false;
                result.push(op);
            }
            op if in_block => block.push(op),
            op => result.push(op),
        }
    }
    if in_block {
        flush(&mut block, &mut result);
    }

    let mut filtered = Dictionary::from_ops(dictionary.name.clone(), result);
    filtered.url = dictionary.url.clone();
    (filtered.count_toggleable() > 0).then_some(filtered)
}
