use serde::{Deserialize, Serialize};

fn default_status_persistence() -> u32 {
    4
}

fn default_hscroll_ratio() -> f32 {
    0.67
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct UiConfig {
    /// Hide the function-bar hint
    pub nohelp: bool,
    /// Show etymologies up to their first clause
    pub shortetyms: bool,
    /// Frames a status message survives without a newer one
    #[serde(default = "default_status_persistence")]
    pub status_persistence: u32,
    /// Horizontal scroll step of the pager as a fraction of the width
    #[serde(default = "default_hscroll_ratio")]
    pub hscroll_ratio: f32,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            nohelp: false,
            shortetyms: false,
            status_persistence: default_status_persistence(),
            hscroll_ratio: default_hscroll_ratio(),
        }
    }
}
