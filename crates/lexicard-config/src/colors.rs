use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Every role that can be colored with a `c.<role>` option, with its default.
pub const COLOR_ROLES: &[(&str, &str)] = &[
    ("delimit", "darkgray"),
    ("index", "lightblue"),
    ("def1", "default"),
    ("def2", "gray"),
    ("exsen", "darkgray"),
    ("label", "lightcyan"),
    ("inflection", "cyan"),
    ("phrase", "lightyellow"),
    ("phon", "gray"),
    ("header", "lightblue"),
    ("etym", "yellow"),
    ("pos", "lightcyan"),
    ("syn", "lightgreen"),
    ("syngloss", "default"),
    ("note", "lightred"),
    ("highlight", "yellow"),
    ("error", "lightred"),
    ("success", "lightgreen"),
    ("attention", "lightyellow"),
    ("barhint", "darkgray"),
];

const COLOR_NAMES: &[&str] = &[
    "default",
    "reset",
    "black",
    "red",
    "green",
    "yellow",
    "blue",
    "magenta",
    "cyan",
    "gray",
    "grey",
    "darkgray",
    "lightred",
    "lightgreen",
    "lightyellow",
    "lightblue",
    "lightmagenta",
    "lightcyan",
    "white",
];

/// Whether `value` names a color: a known name, a 0-255 index or `#rrggbb`.
pub fn is_valid_color(value: &str) -> bool {
    let value = value.trim().to_ascii_lowercase();
    if COLOR_NAMES.contains(&value.as_str()) {
        return true;
    }
    if value.parse::<u8>().is_ok() {
        return true;
    }
    value.len() == 7
        && value.starts_with('#')
        && value[1..].chars().all(|c| c.is_ascii_hexdigit())
}

/// `c.*` sub-map: role name -> color string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Colors(BTreeMap<String, String>);

impl Default for Colors {
    fn default() -> Self {
        Self(
            COLOR_ROLES
                .iter()
                .map(|(role, color)| (role.to_string(), color.to_string()))
                .collect(),
        )
    }
}

impl Colors {
    /// Color for `role`, falling back to the built-in default when a profile
    /// predates the role.
    pub fn get(&self, role: &str) -> Option<&str> {
        self.0.get(role).map(String::as_str).or_else(|| {
            COLOR_ROLES
                .iter()
                .find(|(name, _)| *name == role)
                .map(|(_, color)| *color)
        })
    }

    pub fn is_role(role: &str) -> bool {
        COLOR_ROLES.iter().any(|(name, _)| *name == role)
    }

    pub(crate) fn insert(&mut self, role: &str, color: &str) {
        self.0.insert(role.to_string(), color.trim().to_ascii_lowercase());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validates_names_indices_and_hex() {
        assert!(is_valid_color("LightRed"));
        assert!(is_valid_color("default"));
        assert!(is_valid_color("208"));
        assert!(is_valid_color("#1a2B3c"));
        assert!(!is_valid_color("256"));
        assert!(!is_valid_color("#12345"));
        assert!(!is_valid_color("mauve"));
    }

    #[test]
    fn missing_role_falls_back_to_default() {
        let colors = Colors(BTreeMap::new());
        assert_eq!(colors.get("phrase"), Some("lightyellow"));
        assert_eq!(colors.get("nope"), None);
    }
}
