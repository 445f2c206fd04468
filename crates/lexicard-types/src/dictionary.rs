use std::ops::Index;

use serde::{Deserialize, Serialize};

use crate::op::{Def, Op, Phrase, Pos, Syn};

/// An ordered stream of entries produced by one dictionary for one query.
///
/// PHRASE entries partition the stream into phrase blocks: every entry after
/// a PHRASE belongs to it until the next PHRASE. Entries are never mutated
/// after construction; filtering produces a new `Dictionary`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Dictionary {
    /// Name of the source, e.g. "Free Dictionary".
    pub name: String,
    /// Page the entries were taken from, if the source has one.
    #[serde(default)]
    pub url: Option<String>,
    ops: Vec<Op>,
}

impl Dictionary {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            url: None,
            ops: Vec::new(),
        }
    }

    pub fn from_ops(name: impl Into<String>, ops: Vec<Op>) -> Self {
        Self {
            name: name.into(),
            url: None,
            ops,
        }
    }

    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    pub fn add(&mut self, op: Op) {
        self.ops.push(op);
    }

    pub fn ops(&self) -> &[Op] {
        &self.ops
    }

    pub fn get(&self, index: usize) -> Option<&Op> {
        self.ops.get(index)
    }

    pub fn len(&self) -> usize {
        self.ops.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Op> {
        self.ops.iter()
    }

    /// Number of DEF entries, sub-definitions included.
    pub fn count_defs(&self) -> usize {
        self.ops.iter().filter(|op| matches!(op, Op::Def(_))).count()
    }

    pub fn count_toggleable(&self) -> usize {
        self.ops.iter().filter(|op| op.is_toggleable()).count()
    }

    /// Distinct AUDIO resources in document order.
    pub fn distinct_audio(&self) -> Vec<&str> {
        let mut seen: Vec<&str> = Vec::new();
        for op in &self.ops {
            if let Op::Audio { resource } = op
                && !seen.contains(&resource.as_str())
            {
                seen.push(resource);
            }
        }
        seen
    }

    /// Title of the leading HEADER, if the stream starts with one.
    pub fn title(&self) -> Option<&str> {
        match self.ops.first() {
            Some(Op::Header { header }) => Some(header),
            _ => None,
        }
    }

    /// The first PHRASE in the stream, used as the query's display form.
    pub fn first_phrase(&self) -> Option<&Phrase> {
        self.ops.iter().find_map(|op| match op {
            Op::Phrase(phrase) => Some(phrase),
            _ => None,
        })
    }
}

impl Index<usize> for Dictionary {
    type Output = Op;

    fn index(&self, index: usize) -> &Op {
        &self.ops[index]
    }
}

impl<'a> IntoIterator for &'a Dictionary {
    type Item = &'a Op;
    type IntoIter = std::slice::Iter<'a, Op>;

    fn into_iter(self) -> Self::IntoIter {
        self.ops.iter()
    }
}

/// What the user picked from one phrase block, reassembled for card export.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DictionarySelection {
    pub audio: Option<String>,
    pub definitions: Vec<Def>,
    pub etymology: Option<String>,
    pub phrase: Phrase,
    pub pos: Option<Pos>,
    pub synonyms: Vec<Syn>,
}

impl DictionarySelection {
    pub fn new(phrase: Phrase) -> Self {
        Self {
            audio: None,
            definitions: Vec::new(),
            etymology: None,
            phrase,
            pos: None,
            synonyms: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn distinct_audio_deduplicates_in_order() {
        let dict = Dictionary::from_ops(
            "test",
            vec![
                Op::phrase("a", ""),
                Op::audio("u1"),
                Op::phrase("b", ""),
                Op::audio("u2"),
                Op::phrase("c", ""),
                Op::audio("u1"),
            ],
        );
        assert_eq!(dict.distinct_audio(), vec!["u1", "u2"]);
    }

    #[test]
    fn title_comes_from_leading_header() {
        let dict = Dictionary::from_ops("x", vec![Op::header("AH Dictionary"), Op::phrase("a", "")]);
        assert_eq!(dict.title(), Some("AH Dictionary"));
        assert_eq!(dict.first_phrase().map(|p| p.phrase.as_str()), Some("a"));

        let dict = Dictionary::from_ops("x", vec![Op::phrase("a", "")]);
        assert_eq!(dict.title(), None);
    }
}
