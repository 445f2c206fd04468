use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

fn default_url() -> String {
    "http://127.0.0.1:8765".to_string()
}

fn default_tags() -> String {
    "lexicard".to_string()
}

/// Where AnkiConnect looks for duplicates of a new note.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DupeScope {
    #[default]
    Deck,
    Collection,
}

impl DupeScope {
    pub fn as_str(self) -> &'static str {
        match self {
            DupeScope::Deck => "deck",
            DupeScope::Collection => "collection",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AnkiConfig {
    /// AnkiConnect URL
    #[serde(default = "default_url")]
    pub url: String,
    /// Note type the cards are added as
    pub note: String,
    /// Target deck
    pub deck: String,
    /// Card field name -> note field name, filled in by the setup walkthrough
    pub fields: BTreeMap<String, String>,
    /// Allow adding notes whose first field already exists
    pub duplicates: bool,
    pub dupescope: DupeScope,
    /// Space or comma separated tags attached to every note
    #[serde(default = "default_tags")]
    pub tags: String,
    /// Anki's collection.media directory. When unset, AnkiConnect fetches audio itself.
    pub mediadir: Option<String>,
}

impl Default for AnkiConfig {
    fn default() -> Self {
        Self {
            url: default_url(),
            note: String::new(),
            deck: String::new(),
            fields: BTreeMap::new(),
            duplicates: false,
            dupescope: DupeScope::default(),
            tags: default_tags(),
            mediadir: None,
        }
    }
}

impl AnkiConfig {
    pub fn tag_list(&self) -> Vec<String> {
        self.tags
            .split([',', ' '])
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(str::to_string)
            .collect()
    }

    pub fn is_configured(&self) -> bool {
        !self.note.is_empty() && !self.deck.is_empty() && !self.fields.is_empty()
    }
}
