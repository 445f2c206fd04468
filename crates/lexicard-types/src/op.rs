use serde::{Deserialize, Serialize};

/// A (sub-)definition with its example sentences.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Def {
    pub definition: String,
    #[serde(default)]
    pub examples: Vec<String>,
    #[serde(default)]
    pub label: String,
    #[serde(default)]
    pub subdef: bool,
}

impl Def {
    pub fn new(definition: impl Into<String>) -> Self {
        Self {
            definition: definition.into(),
            examples: Vec::new(),
            label: String::new(),
            subdef: false,
        }
    }

    pub fn with_examples<I, S>(mut self, examples: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.examples = examples.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    pub fn subdef(mut self) -> Self {
        self.subdef = true;
        self
    }
}

/// Thesaurus block: a gloss and the synonyms sharing it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Syn {
    pub synonyms: String,
    pub definition: String,
    #[serde(default)]
    pub examples: Vec<String>,
}

/// Head of a phrase block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Phrase {
    pub phrase: String,
    /// Phonetic spelling, empty when the source has none.
    #[serde(default)]
    pub extra: String,
}

/// Compact table of parts of speech and their phonetic spellings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pos {
    pub pos: Vec<(String, String)>,
}

/// One record of a dictionary's instruction stream.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "lowercase")]
pub enum Op {
    Def(Def),
    Label { label: String, extra: String },
    Phrase(Phrase),
    /// Section header. An empty header is a plain rule.
    Header { header: String },
    Etym { etymology: String },
    Pos(Pos),
    Audio { resource: String },
    Syn(Syn),
    Note { note: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OpKind {
    Def,
    Label,
    Phrase,
    Header,
    Etym,
    Pos,
    Audio,
    Syn,
    Note,
}

impl OpKind {
    pub fn name(self) -> &'static str {
        match self {
            OpKind::Def => "DEF",
            OpKind::Label => "LABEL",
            OpKind::Phrase => "PHRASE",
            OpKind::Header => "HEADER",
            OpKind::Etym => "ETYM",
            OpKind::Pos => "POS",
            OpKind::Audio => "AUDIO",
            OpKind::Syn => "SYN",
            OpKind::Note => "NOTE",
        }
    }
}

impl std::fmt::Display for OpKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl Op {
    pub fn phrase(phrase: impl Into<String>, extra: impl Into<String>) -> Self {
        Op::Phrase(Phrase {
            phrase: phrase.into(),
            extra: extra.into(),
        })
    }

    pub fn label(label: impl Into<String>, extra: impl Into<String>) -> Self {
        Op::Label {
            label: label.into(),
            extra: extra.into(),
        }
    }

    pub fn header(header: impl Into<String>) -> Self {
        Op::Header {
            header: header.into(),
        }
    }

    pub fn etym(etymology: impl Into<String>) -> Self {
        Op::Etym {
            etymology: etymology.into(),
        }
    }

    pub fn audio(resource: impl Into<String>) -> Self {
        Op::Audio {
            resource: resource.into(),
        }
    }

    pub fn note(note: impl Into<String>) -> Self {
        Op::Note { note: note.into() }
    }

    pub fn syn(
        synonyms: impl Into<String>,
        definition: impl Into<String>,
        examples: Vec<String>,
    ) -> Self {
        Op::Syn(Syn {
            synonyms: synonyms.into(),
            definition: definition.into(),
            examples,
        })
    }

    pub fn kind(&self) -> OpKind {
        match self {
            Op::Def(_) => OpKind::Def,
            Op::Label { .. } => OpKind::Label,
            Op::Phrase(_) => OpKind::Phrase,
            Op::Header { .. } => OpKind::Header,
            Op::Etym { .. } => OpKind::Etym,
            Op::Pos(_) => OpKind::Pos,
            Op::Audio { .. } => OpKind::Audio,
            Op::Syn(_) => OpKind::Syn,
            Op::Note { .. } => OpKind::Note,
        }
    }

    /// DEF and SYN are the only entries a user picks directly.
    pub fn is_toggleable(&self) -> bool {
        matches!(self, Op::Def(_) | Op::Syn(_))
    }

    pub fn is_subdef(&self) -> bool {
        matches!(self, Op::Def(def) if def.subdef)
    }
}
