use std::env;
use std::process::{Child, Command, ExitStatus, Stdio};

use crate::error::AudioError;

const PLAYERS: &[(&str, &[&str])] = &[
    ("mpv", &["--no-video", "--really-quiet"]),
    ("ffplay", &["-nodisp", "-autoexit", "-loglevel", "quiet"]),
];

fn on_path(program: &str) -> bool {
    let Some(paths) = env::var_os("PATH") else {
        return false;
    };
    env::split_paths(&paths).any(|dir| {
        let candidate = dir.join(program);
        candidate.is_file() || (cfg!(windows) && candidate.with_extension("exe").is_file())
    })
}

/// What happened to the previous playback when a new one started.
#[derive(Debug, PartialEq, Eq)]
pub struct Played {
    pub previous: Option<String>,
    /// Exit status of the previous player, if it had already finished.
    pub previous_status: Option<ExitStatus>,
}

/// Plays audio URLs through an external player, one at a time.
pub struct AudioPlayer {
    player: Option<(&'static str, &'static [&'static str])>,
    child: Option<Child>,
    current: Option<String>,
}

impl AudioPlayer {
    pub fn new() -> Self {
        let player = PLAYERS.iter().copied().find(|(program, _)| on_path(program));
        match player {
            Some((program, _)) => tracing::debug!("Audio player: {program}"),
            None => tracing::info!("No audio player on PATH"),
        }
        Self {
            player,
            child: None,
            current: None,
        }
    }

    /// Stop whatever is playing and start `url`.
    pub fn play(&mut self, url: &str) -> Result<Played, AudioError> {
        let (program, args) = self.player.ok_or(AudioError::NoPlayer)?;
        let previous_status = self.stop();

        let child = Command::new(program)
            .args(args)
            .arg(url)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|source| AudioError::Spawn {
                player: program,
                source,
            })?;
        tracing::info!("Playing {url} with {program}");

        self.child = Some(child);
        Ok(Played {
            previous: self.current.replace(url.to_string()),
            previous_status,
        })
    }

    /// Kill the running player, returning its exit status if it had
    /// already finished on its own.
    pub fn stop(&mut self) -> Option<ExitStatus> {
        let mut child = self.child.take()?;
        match child.try_wait() {
            Ok(Some(status)) => Some(status),
            _ => {
                if let Err(e) = child.kill() {
                    tracing::debug!("Audio player already gone: {e}");
                }
                let _ = child.wait();
                None
            }
        }
    }

    pub fn is_playing(&mut self) -> bool {
        self.child
            .as_mut()
            .is_some_and(|child| matches!(child.try_wait(), Ok(None)))
    }
}

impl Default for AudioPlayer {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for AudioPlayer {
    fn drop(&mut self) {
        self.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_player_is_an_error() {
        let mut player = AudioPlayer {
            player: None,
            child: None,
            current: None,
        };
        assert!(matches!(player.play("https://x.org/a.mp3"), Err(AudioError::NoPlayer)));
    }

    #[cfg(unix)]
    #[test]
    fn reports_previous_url() {
        let mut player = AudioPlayer {
            player: Some(("sleep", &[] as &[&str])),
            child: None,
            current: None,
        };
        let first = player.play("5").unwrap();
        assert_eq!(first.previous, None);
        assert!(player.is_playing());

        let second = player.play("5").unwrap();
        assert_eq!(second.previous.as_deref(), Some("5"));
        assert_eq!(second.previous_status, None);
        player.stop();
        assert!(!player.is_playing());
    }

    #[test]
    fn missing_program_is_not_on_path() {
        assert!(!on_path("lexicard-no-such-player"));
    }
}
