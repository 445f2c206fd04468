use serde::{Deserialize, Serialize};

fn default_enabled() -> bool {
    true
}

fn default_mask() -> String {
    "...".to_string()
}

/// What goes into a card and how its fields are dressed.
#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct CardConfig {
    /// AUDIO follows definition selection
    #[serde(default = "default_enabled")]
    pub audio: bool,
    /// POS follows definition selection
    #[serde(default = "default_enabled")]
    pub pos: bool,
    /// ETYM follows definition selection
    #[serde(default = "default_enabled")]
    pub etym: bool,
    /// Number definitions and fade the later ones
    pub formatdefs: bool,
    pub hidedef: bool,
    pub hidesyn: bool,
    pub hideexsen: bool,
    /// Also hide prepositions of the phrase
    pub hidepreps: bool,
    /// Replacement for hidden phrase words
    #[serde(default = "default_mask")]
    pub hides: String,
}

impl Default for CardConfig {
    fn default() -> Self {
        Self {
            audio: default_enabled(),
            pos: default_enabled(),
            etym: default_enabled(),
            formatdefs: false,
            hidedef: false,
            hidesyn: false,
            hideexsen: false,
            hidepreps: false,
            hides: default_mask(),
        }
    }
}
