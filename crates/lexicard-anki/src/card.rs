use std::collections::{BTreeMap, HashMap};

use lexicard_config::card::CardConfig;
use lexicard_types::DictionarySelection;
use serde_json::{Map, Value};

use crate::hide::Hider;

/// Card fields the setup walkthrough can map onto note fields.
pub const CARD_FIELDS: &[&str] = &["phrase", "def", "exsen", "syn", "pos", "etym", "audio"];

/// Opacity of definitions, from the first to the last quarter.
const DEF_STYLES: [&str; 4] = ["1", "0.85", "0.7", "0.55"];

/// One Anki note worth of HTML, built from one selection.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Card {
    pub phrase: String,
    pub def: String,
    pub exsen: String,
    pub syn: String,
    pub pos: String,
    pub etym: String,
    pub audio: String,
}

impl Card {
    pub fn field(&self, name: &str) -> Option<&str> {
        let value = match name {
            "phrase" => &self.phrase,
            "def" => &self.def,
            "exsen" => &self.exsen,
            "syn" => &self.syn,
            "pos" => &self.pos,
            "etym" => &self.etym,
            "audio" => &self.audio,
            _ => return None,
        };
        Some(value)
    }

    /// Note fields keyed by note field name, following `mapping`
    /// (card field -> note field).
    pub fn note_fields(&self, mapping: &BTreeMap<String, String>) -> Map<String, Value> {
        mapping
            .iter()
            .filter_map(|(card_field, note_field)| {
                self.field(card_field)
                    .map(|value| (note_field.clone(), Value::String(value.to_string())))
            })
            .collect()
    }
}

fn escape_quotes(text: &str) -> String {
    text.replace('\'', "&#39;").replace('"', "&quot;")
}

fn format_defs(defs: &[String]) -> String {
    let n = defs.len();
    defs.iter()
        .enumerate()
        .map(|(i, def)| {
            let style = DEF_STYLES[i * DEF_STYLES.len() / n];
            format!(
                "<span style=\"opacity: {style}\"><small>{}.</small> {def}</span>",
                i + 1
            )
        })
        .collect::<Vec<_>>()
        .join("<br>")
}

/// Turns selection dumps into cards under one configuration snapshot.
pub struct CardBuilder<'a> {
    config: &'a CardConfig,
}

impl<'a> CardBuilder<'a> {
    pub fn new(config: &'a CardConfig) -> Self {
        Self { config }
    }

    /// `media` maps audio URLs to the file names stored in Anki's media folder.
    pub fn build(&self, selection: &DictionarySelection, media: &HashMap<String, String>) -> Card {
        let config = self.config;
        let phrase = escape_quotes(&selection.phrase.phrase);
        let hider = Hider::new(&phrase, &config.hides, config.hidepreps);
        let hide_if = |enabled: bool, text: String| {
            if enabled { hider.hide(&text) } else { text }
        };

        let defs: Vec<String> = selection
            .definitions
            .iter()
            .map(|def| hide_if(config.hidedef, escape_quotes(&def.definition)))
            .collect();
        let def = if config.formatdefs && !defs.is_empty() {
            format_defs(&defs)
        } else {
            defs.join("<br>")
        };

        let syn = selection
            .synonyms
            .iter()
            .map(|syn| {
                let entry = if syn.definition.is_empty() {
                    syn.synonyms.clone()
                } else {
                    format!("{} {}", syn.definition, syn.synonyms)
                };
                hide_if(config.hidesyn, escape_quotes(&entry))
            })
            .collect::<Vec<_>>()
            .join("<br>");

        let exsen = selection
            .definitions
            .iter()
            .flat_map(|def| def.examples.iter())
            .chain(selection.synonyms.iter().flat_map(|syn| syn.examples.iter()))
            .map(|example| hide_if(config.hideexsen, escape_quotes(example)))
            .collect::<Vec<_>>()
            .join("<br>");

        let pos = selection
            .pos
            .as_ref()
            .map(|pos| {
                pos.pos
                    .iter()
                    .map(|(pos, phon)| escape_quotes(format!("{pos}  {phon}").trim_end()))
                    .collect::<Vec<_>>()
                    .join("<br>")
            })
            .unwrap_or_default();

        let audio = selection
            .audio
            .as_ref()
            .filter(|_| config.audio)
            .and_then(|url| media.get(url))
            .map(|file| format!("[sound:{file}]"))
            .unwrap_or_default();

        Card {
            phrase,
            def,
            exsen,
            syn,
            pos,
            etym: selection
                .etymology
                .as_deref()
                .map(escape_quotes)
                .unwrap_or_default(),
            audio,
        }
    }
}
