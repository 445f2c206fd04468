//! Flat option names over the nested [`Config`], as typed at the `:` prompt.

use crate::anki::DupeScope;
use crate::colors::{Colors, is_valid_color};
use crate::{Config, ConfigError};

/// Every scalar option, in completion order. Colors are `c.<role>`.
pub const OPTION_NAMES: &[&str] = &[
    "audio",
    "cachefile",
    "deck",
    "dupescope",
    "duplicates",
    "etym",
    "formatdefs",
    "hidedef",
    "hideexsen",
    "hidepreps",
    "hides",
    "hidesyn",
    "histsave",
    "histshow",
    "mediadir",
    "nohelp",
    "note",
    "pos",
    "primary",
    "secondary",
    "shortetyms",
    "tags",
];

/// Options whose change alters which entries follow a definition selection.
pub fn affects_selection(name: &str) -> bool {
    matches!(name, "audio" | "pos" | "etym")
}

/// Options whose change requires recomputing screen layouts.
pub fn affects_layout(name: &str) -> bool {
    affects_selection(name) || matches!(name, "shortetyms" | "nohelp")
}

enum Slot<'a> {
    Bool(&'a mut bool),
    Text(&'a mut String),
    Path(&'a mut Option<String>),
    Scope(&'a mut DupeScope),
}

fn parse_bool(option: &str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "on" | "true" | "yes" | "1" => Ok(true),
        "off" | "false" | "no" | "0" => Ok(false),
        _ => Err(ConfigError::InvalidValue {
            option: option.to_string(),
            value: value.to_string(),
            expected: "on/off",
        }),
    }
}

impl Config {
    fn slot(&mut self, name: &str) -> Option<Slot<'_>> {
        let slot = match name {
            "audio" => Slot::Bool(&mut self.card.audio),
            "pos" => Slot::Bool(&mut self.card.pos),
            "etym" => Slot::Bool(&mut self.card.etym),
            "formatdefs" => Slot::Bool(&mut self.card.formatdefs),
            "hidedef" => Slot::Bool(&mut self.card.hidedef),
            "hidesyn" => Slot::Bool(&mut self.card.hidesyn),
            "hideexsen" => Slot::Bool(&mut self.card.hideexsen),
            "hidepreps" => Slot::Bool(&mut self.card.hidepreps),
            "hides" => Slot::Text(&mut self.card.hides),
            "histsave" => Slot::Bool(&mut self.histsave),
            "histshow" => Slot::Bool(&mut self.histshow),
            "cachefile" => Slot::Bool(&mut self.cachefile),
            "note" => Slot::Text(&mut self.anki.note),
            "deck" => Slot::Text(&mut self.anki.deck),
            "mediadir" => Slot::Path(&mut self.anki.mediadir),
            "duplicates" => Slot::Bool(&mut self.anki.duplicates),
            "dupescope" => Slot::Scope(&mut self.anki.dupescope),
            "tags" => Slot::Text(&mut self.anki.tags),
            "primary" => Slot::Text(&mut self.dictionary.primary),
            "secondary" => Slot::Text(&mut self.dictionary.secondary),
            "shortetyms" => Slot::Bool(&mut self.ui.shortetyms),
            "nohelp" => Slot::Bool(&mut self.ui.nohelp),
            _ => return None,
        };
        Some(slot)
    }

    /// Current value of `name` rendered as text.
    pub fn get(&self, name: &str) -> Option<String> {
        if let Some(role) = name.strip_prefix("c.") {
            return self.colors.get(role).map(str::to_string);
        }

        // `slot` borrows mutably; read through a scratch copy.
        let mut scratch = self.clone();
        let value = match scratch.slot(name)? {
            Slot::Bool(b) => if *b { "on" } else { "off" }.to_string(),
            Slot::Text(s) => s.clone(),
            Slot::Path(p) => p.clone().unwrap_or_default(),
            Slot::Scope(s) => s.as_str().to_string(),
        };
        Some(value)
    }

    pub fn is_bool(&self, name: &str) -> bool {
        let mut scratch = self.clone();
        matches!(scratch.slot(name), Some(Slot::Bool(_)))
    }

    pub fn set(&mut self, name: &str, value: &str) -> Result<(), ConfigError> {
        if let Some(role) = name.strip_prefix("c.") {
            if !Colors::is_role(role) {
                return Err(ConfigError::UnknownOption(name.to_string()));
            }
            if !is_valid_color(value) {
                return Err(ConfigError::InvalidValue {
                    option: name.to_string(),
                    value: value.to_string(),
                    expected: "a color name, 0-255 or #rrggbb",
                });
            }
            self.colors.insert(role, value);
            return Ok(());
        }

        let slot = self
            .slot(name)
            .ok_or_else(|| ConfigError::UnknownOption(name.to_string()))?;
        match slot {
            Slot::Bool(b) => *b = parse_bool(name, value)?,
            Slot::Text(s) => *s = value.trim().to_string(),
            Slot::Path(p) => {
                let value = value.trim();
                *p = (!value.is_empty() && value != "none").then(|| value.to_string());
            }
            Slot::Scope(s) => {
                *s = match value.trim().to_ascii_lowercase().as_str() {
                    "deck" => DupeScope::Deck,
                    "collection" => DupeScope::Collection,
                    _ => {
                        return Err(ConfigError::InvalidValue {
                            option: name.to_string(),
                            value: value.to_string(),
                            expected: "deck or collection",
                        });
                    }
                }
            }
        }
        tracing::debug!("Option {name} set to {value:?}");
        Ok(())
    }

    /// Flip a boolean option, returning its new value.
    pub fn toggle(&mut self, name: &str) -> Result<bool, ConfigError> {
        match self.slot(name) {
            Some(Slot::Bool(b)) => {
                *b = !*b;
                Ok(*b)
            }
            Some(_) => Err(ConfigError::InvalidValue {
                option: name.to_string(),
                value: String::new(),
                expected: "a value",
            }),
            None => Err(ConfigError::UnknownOption(name.to_string())),
        }
    }
}
