use std::process::{Command, Stdio};

use arboard::Clipboard;

use crate::error::ClipboardError;

/// Clipboard/selection port.
pub trait ClipboardRead {
    fn read(&mut self) -> Result<String, ClipboardError>;
}

#[cfg(unix)]
const COMMANDS: &[(&str, &[&str])] = &[
    ("wl-paste", &["--no-newline", "--primary"]),
    ("xclip", &["-o", "-selection", "primary"]),
    ("xsel", &["-p", "-o"]),
];

#[cfg(windows)]
const COMMANDS: &[(&str, &[&str])] = &[("powershell", &["-NoProfile", "-Command", "Get-Clipboard"])];

#[cfg(not(any(unix, windows)))]
const COMMANDS: &[(&str, &[&str])] = &[];

/// Reads the primary selection through the platform's command pipeline,
/// falling back to the regular clipboard.
pub struct SystemClipboard {
    commands: Vec<(&'static str, &'static [&'static str])>,
    fallback: Option<Clipboard>,
}

impl SystemClipboard {
    pub fn new() -> Self {
        let fallback = Clipboard::new()
            .map_err(|e| tracing::debug!("arboard unavailable: {e}"))
            .ok();
        Self {
            commands: COMMANDS.to_vec(),
            fallback,
        }
    }

    fn run(program: &str, args: &[&str]) -> Option<String> {
        let output = Command::new(program)
            .args(args)
            .stdin(Stdio::null())
            .stderr(Stdio::null())
            .output()
            .ok()?;
        output
            .status
            .success()
            .then(|| String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

impl Default for SystemClipboard {
    fn default() -> Self {
        Self::new()
    }
}

/// Selection text as one line.
fn clean(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

impl ClipboardRead for SystemClipboard {
    fn read(&mut self) -> Result<String, ClipboardError> {
        let mut reachable = false;
        for (program, args) in &self.commands {
            if let Some(text) = Self::run(program, args) {
                reachable = true;
                let text = clean(&text);
                if !text.is_empty() {
                    return Ok(text);
                }
            }
        }

        if let Some(clipboard) = self.fallback.as_mut() {
            return match clipboard.get_text() {
                Ok(text) if !clean(&text).is_empty() => Ok(clean(&text)),
                Ok(_) | Err(arboard::Error::ContentNotAvailable) => Err(ClipboardError::Empty),
                Err(e) => Err(ClipboardError::Unavailable(e.to_string())),
            };
        }

        if reachable {
            Err(ClipboardError::Empty)
        } else {
            Err(ClipboardError::Unavailable(
                "no selection command succeeded".to_string(),
            ))
        }
    }
}
