use std::collections::HashMap;
use std::sync::Arc;

use lexicard_config::card::CardConfig;
use lexicard_types::{Dictionary, DictionarySelection, Op};

use crate::error::SelectorError;

/// Which corollary entries follow a DEF/SYN selection. PHRASE always does.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CorollarySet {
    pub audio: bool,
    pub pos: bool,
    pub etym: bool,
}

impl Default for CorollarySet {
    fn default() -> Self {
        Self {
            audio: true,
            pos: true,
            etym: true,
        }
    }
}

impl From<&CardConfig> for CorollarySet {
    fn from(config: &CardConfig) -> Self {
        Self {
            audio: config.audio,
            pos: config.pos,
            etym: config.etym,
        }
    }
}

impl CorollarySet {
    fn follows(&self, op: &Op) -> bool {
        match op {
            Op::Audio { .. } => self.audio,
            Op::Pos(_) => self.pos,
            Op::Etym { .. } => self.etym,
            _ => false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToggleState {
    Untoggled,
    /// A DEF or SYN picked by the user.
    ToggledPrimary,
    /// Picked along because its phrase block has a primary selection.
    ToggledCorollary,
}

/// Toggle state over one dictionary's entries.
///
/// Phrase blocks are addressed by the index of their PHRASE entry; members
/// are kept as indices into the dictionary.
#[derive(Debug, Clone)]
pub struct Selector {
    dictionary: Arc<Dictionary>,
    corollary: CorollarySet,
    phrase_indices: Vec<usize>,
    group_of: HashMap<usize, Vec<usize>>,
    owner: Vec<Option<usize>>,
    toggleables: Vec<usize>,
    ptoggled: HashMap<usize, usize>,
    toggled: Vec<bool>,
}

impl Selector {
    pub fn new(dictionary: Arc<Dictionary>, corollary: CorollarySet) -> Self {
        let mut phrase_indices = Vec::new();
        let mut group_of: HashMap<usize, Vec<usize>> = HashMap::new();
        let mut owner = Vec::with_capacity(dictionary.len());
        let mut toggleables = Vec::new();
        let mut current = None;

        for (i, op) in dictionary.iter().enumerate() {
            if let Op::Phrase(_) = op {
                phrase_indices.push(i);
                group_of.insert(i, Vec::new());
                current = Some(i);
                owner.push(Some(i));
                continue;
            }
            if let Some(phrase) = current
                && let Some(group) = group_of.get_mut(&phrase)
            {
                group.push(i);
            }
            if op.is_toggleable() {
                toggleables.push(i);
            }
            owner.push(current);
        }

        let ptoggled = phrase_indices.iter().map(|&p| (p, 0)).collect();
        let toggled = vec![false; dictionary.len()];

        Self {
            dictionary,
            corollary,
            phrase_indices,
            group_of,
            owner,
            toggleables,
            ptoggled,
            toggled,
        }
    }

    pub fn dictionary(&self) -> &Arc<Dictionary> {
        &self.dictionary
    }

    pub fn corollary(&self) -> CorollarySet {
        self.corollary
    }

    pub fn phrase_indices(&self) -> &[usize] {
        &self.phrase_indices
    }

    /// Entry indices of DEFs and SYNs in document order.
    pub fn toggleables(&self) -> &[usize] {
        &self.toggleables
    }

    /// Number of toggled DEF/SYN entries in the block headed by `phrase_index`.
    pub fn phrase_count(&self, phrase_index: usize) -> usize {
        self.ptoggled.get(&phrase_index).copied().unwrap_or(0)
    }

    pub fn has_selection(&self) -> bool {
        self.ptoggled.values().any(|&n| n > 0)
    }

    pub fn is_toggled(&self, index: usize) -> bool {
        self.toggled.get(index).copied().unwrap_or(false)
    }

    pub fn state(&self, index: usize) -> ToggleState {
        if !self.is_toggled(index) {
            return ToggleState::Untoggled;
        }
        match self.dictionary.get(index) {
            Some(op) if op.is_toggleable() => ToggleState::ToggledPrimary,
            _ => ToggleState::ToggledCorollary,
        }
    }

    pub fn toggle_by_entry(&mut self, index: usize) -> Result<(), SelectorError> {
        let op = self
            .dictionary
            .get(index)
            .ok_or(SelectorError::InvalidIndex {
                index,
                len: self.dictionary.len(),
            })?;
        if !op.is_toggleable() {
            return Err(SelectorError::NotToggleable {
                index,
                kind: op.kind(),
            });
        }

        let now = !self.toggled[index];
        self.toggled[index] = now;

        let Some(phrase) = self.owner[index] else {
            return Ok(());
        };
        let Some(count) = self.ptoggled.get_mut(&phrase) else {
            return Ok(());
        };
        let before = *count;
        if now {
            *count += 1;
        } else {
            *count = count.saturating_sub(1);
        }
        let after = *count;

        if (before == 0) != (after == 0) {
            self.propagate(phrase, after > 0);
        }
        Ok(())
    }

    /// Toggle the `n`-th DEF or SYN in document order, counting from 1.
    /// Returns the entry index that was toggled, `None` when out of range.
    pub fn toggle_by_def_index(&mut self, n: usize) -> Option<usize> {
        let index = *self.toggleables.get(n.checked_sub(1)?)?;
        // Indices in `toggleables` are valid toggleable entries by construction.
        self.toggle_by_entry(index).ok()?;
        Some(index)
    }

    pub fn clear_selection(&mut self) {
        self.toggled.iter_mut().for_each(|t| *t = false);
        self.ptoggled.values_mut().for_each(|n| *n = 0);
    }

    /// Switch the corollary set, re-deriving corollary toggles of every block
    /// that currently has a selection.
    pub fn set_corollary(&mut self, corollary: CorollarySet) {
        if self.corollary == corollary {
            return;
        }
        let active: Vec<usize> = self
            .phrase_indices
            .iter()
            .copied()
            .filter(|p| self.phrase_count(*p) > 0)
            .collect();
        for &phrase in &active {
            self.propagate(phrase, false);
        }
        self.corollary = corollary;
        for &phrase in &active {
            self.propagate(phrase, true);
        }
    }

    fn propagate(&mut self, phrase: usize, value: bool) {
        self.toggled[phrase] = value;
        let Some(members) = self.group_of.get(&phrase) else {
            return;
        };
        for &member in members {
            if self.corollary.follows(&self.dictionary[member]) {
                self.toggled[member] = value;
            }
        }
    }

    pub fn dump_selection(&self) -> Vec<DictionarySelection> {
        if !self.has_selection() {
            return Vec::new();
        }

        let mut selections = Vec::new();
        for &phrase_index in &self.phrase_indices {
            if self.phrase_count(phrase_index) == 0 {
                continue;
            }
            let Op::Phrase(phrase) = &self.dictionary[phrase_index] else {
                continue;
            };

            let mut selection = DictionarySelection::new(phrase.clone());
            for &member in self.group_of.get(&phrase_index).into_iter().flatten() {
                if !self.toggled[member] {
                    continue;
                }
                match &self.dictionary[member] {
                    Op::Def(def) => selection.definitions.push(def.clone()),
                    Op::Syn(syn) => selection.synonyms.push(syn.clone()),
                    Op::Audio { resource } => selection.audio = Some(resource.clone()),
                    Op::Etym { etymology } => selection.etymology = Some(etymology.clone()),
                    Op::Pos(pos) => selection.pos = Some(pos.clone()),
                    Op::Label { .. } | Op::Phrase(_) | Op::Header { .. } | Op::Note { .. } => {}
                }
            }
            selections.push(selection);
        }

        if selections.iter().all(|s| s.audio.is_none())
            && let [only] = self.dictionary.distinct_audio().as_slice()
        {
            for selection in &mut selections {
                selection.audio = Some(only.to_string());
            }
        }

        selections
    }
}

#[cfg(test)]
mod tests {
    use lexicard_types::{Def, Pos};

    use super::*;

    /// Two "mint" blocks shaped like American Heritage output.
    fn mint() -> Arc<Dictionary> {
        Arc::new(Dictionary::from_ops(
            "AH Dictionary",
            vec![
                Op::header("AH Dictionary"),
                Op::phrase("mint", "mĭnt"),
                Op::label("n.", ""),
                Op::Def(Def::new("A place where coins are manufactured.")),
                Op::Def(Def::new("A place where something is produced.")),
                Op::Def(Def::new("An abundant amount, especially of money.")),
                Op::label("tr.v.", "mint·ed, mint·ing, mints"),
                Op::Def(Def::new("To produce (money) by stamping metal.")),
                Op::Def(Def::new("To invent or fabricate.").subdef()),
                Op::label("adj.", ""),
                Op::Def(Def::new("Undamaged as if fresh from the mint.")),
                Op::audio("https://ahdictionary.com/mint1.wav"),
                Op::etym("Middle English mynt, coin."),
                Op::phrase("mint", "mĭnt"),
                Op::label("n.", ""),
                Op::Def(Def::new("Any of various aromatic plants.")),
                Op::Def(Def::new("A candy flavored with mint.")),
                Op::audio("https://ahdictionary.com/mint2.wav"),
                Op::etym("Old English minte."),
                Op::header(""),
            ],
        ))
    }

    fn selector(dict: Arc<Dictionary>) -> Selector {
        Selector::new(dict, CorollarySet::default())
    }

    #[test]
    fn toggling_propagates_to_corollary_entries() {
        let mut s = selector(mint());
        s.toggle_by_entry(3).unwrap();

        assert_eq!(s.state(3), ToggleState::ToggledPrimary);
        assert_eq!(s.state(1), ToggleState::ToggledCorollary);
        assert_eq!(s.state(11), ToggleState::ToggledCorollary);
        assert_eq!(s.state(12), ToggleState::ToggledCorollary);
        assert_eq!(s.state(2), ToggleState::Untoggled);
        assert_eq!(s.state(13), ToggleState::Untoggled);
        assert_eq!(s.phrase_count(1), 1);

        s.toggle_by_entry(4).unwrap();
        assert_eq!(s.phrase_count(1), 2);
        s.toggle_by_entry(3).unwrap();
        assert!(s.is_toggled(1), "block still has a selection");
        s.toggle_by_entry(4).unwrap();
        assert!(!s.is_toggled(1));
        assert!(!s.is_toggled(11));
    }

    #[test]
    fn double_toggle_restores_initial_state_for_every_entry() {
        let dict = mint();
        for i in 0..dict.len() {
            let mut s = selector(dict.clone());
            let first = s.toggle_by_entry(i);
            let second = s.toggle_by_entry(i);
            assert_eq!(first.is_ok(), second.is_ok());
            for j in 0..dict.len() {
                assert!(!s.is_toggled(j), "entry {j} stuck after toggling {i}");
            }
            for &p in s.phrase_indices() {
                assert_eq!(s.phrase_count(p), 0);
            }
        }
    }

    #[test]
    fn non_toggleable_and_out_of_bounds_are_rejected() {
        let mut s = selector(mint());
        assert_eq!(
            s.toggle_by_entry(1),
            Err(SelectorError::NotToggleable {
                index: 1,
                kind: lexicard_types::OpKind::Phrase
            })
        );
        assert_eq!(
            s.toggle_by_entry(99),
            Err(SelectorError::InvalidIndex { index: 99, len: 20 })
        );
    }

    #[test]
    fn def_index_is_a_bijection_onto_toggleables() {
        let dict = mint();
        let mut s = selector(dict.clone());
        let count = dict.count_toggleable();
        let mut seen = Vec::new();
        for n in 1..=count {
            let index = s.toggle_by_def_index(n).unwrap();
            assert!(dict[index].is_toggleable());
            seen.push(index);
        }
        assert_eq!(seen, s.toggleables());
        let mut sorted = seen.clone();
        sorted.dedup();
        assert_eq!(sorted.len(), count);
    }

    #[test]
    fn out_of_range_def_index_is_a_noop() {
        let mut s = selector(mint());
        assert_eq!(s.toggle_by_def_index(0), None);
        assert_eq!(s.toggle_by_def_index(9), None);
        assert!(s.dump_selection().is_empty());
    }

    #[test]
    fn dump_first_block_selection() {
        let mut s = selector(mint());
        s.toggle_by_def_index(1).unwrap();
        s.toggle_by_def_index(2).unwrap();

        let dump = s.dump_selection();
        assert_eq!(dump.len(), 1);
        let sel = &dump[0];
        assert_eq!(sel.phrase.phrase, "mint");
        assert_eq!(
            sel.definitions
                .iter()
                .map(|d| d.definition.as_str())
                .collect::<Vec<_>>(),
            vec![
                "A place where coins are manufactured.",
                "A place where something is produced."
            ]
        );
        assert_eq!(sel.audio.as_deref(), Some("https://ahdictionary.com/mint1.wav"));
        assert_eq!(sel.etymology.as_deref(), Some("Middle English mynt, coin."));
        assert!(sel.synonyms.is_empty());
    }

    #[test]
    fn dump_second_block_selection() {
        let mut s = selector(mint());
        s.toggle_by_def_index(7).unwrap();

        let dump = s.dump_selection();
        assert_eq!(dump.len(), 1);
        let sel = &dump[0];
        assert_eq!(sel.definitions.len(), 1);
        assert_eq!(sel.definitions[0].definition, "Any of various aromatic plants.");
        assert_eq!(sel.audio.as_deref(), Some("https://ahdictionary.com/mint2.wav"));
        assert_eq!(sel.etymology.as_deref(), Some("Old English minte."));
    }

    #[test]
    fn single_audio_is_attached_to_every_selection() {
        let dict = Arc::new(Dictionary::from_ops(
            "test",
            vec![
                Op::phrase("run", ""),
                Op::Def(Def::new("to move fast")),
                Op::audio("https://x/run.mp3"),
                Op::phrase("run", ""),
                Op::Def(Def::new("a score in cricket")),
                Op::syn("sprint, dash", "move fast", vec![]),
            ],
        ));
        let mut s = selector(dict);
        s.toggle_by_entry(4).unwrap();
        s.toggle_by_entry(5).unwrap();

        let dump = s.dump_selection();
        assert_eq!(dump.len(), 1);
        assert_eq!(dump[0].audio.as_deref(), Some("https://x/run.mp3"));
        assert_eq!(dump[0].synonyms.len(), 1);
    }

    #[test]
    fn phrase_of_every_selection_heads_its_block() {
        let dict = mint();
        let mut s = selector(dict.clone());
        s.toggle_by_def_index(3).unwrap();
        s.toggle_by_def_index(8).unwrap();
        let dump = s.dump_selection();
        assert_eq!(dump.len(), 2);
        for (sel, &p) in dump.iter().zip(s.phrase_indices()) {
            let Op::Phrase(phrase) = &dict[p] else { panic!() };
            assert_eq!(&sel.phrase, phrase);
        }
    }

    #[test]
    fn corollary_set_limits_followers() {
        let dict = Arc::new(Dictionary::from_ops(
            "test",
            vec![
                Op::phrase("set", ""),
                Op::Pos(Pos {
                    pos: vec![("verb".into(), "sɛt".into())],
                }),
                Op::Def(Def::new("to put")),
                Op::audio("a1"),
                Op::audio("a1"),
                Op::etym("Old English settan"),
            ],
        ));
        let mut s = Selector::new(
            dict,
            CorollarySet {
                audio: false,
                pos: true,
                etym: false,
            },
        );
        s.toggle_by_entry(2).unwrap();
        assert!(s.is_toggled(1));
        assert!(!s.is_toggled(3));
        assert!(!s.is_toggled(5));

        s.set_corollary(CorollarySet::default());
        assert!(s.is_toggled(3));
        assert!(s.is_toggled(5));

        s.clear_selection();
        assert!((0..6).all(|i| !s.is_toggled(i)));
        assert!(s.dump_selection().is_empty());
    }
}
