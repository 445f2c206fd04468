use lexicard_config::colors::COLOR_ROLES;
use lexicard_config::{Config, ConfigError, OPTION_NAMES};

/// Result of one `:` command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandOutcome {
    Changed { name: String, value: String },
    Shown { name: String, value: String },
}

impl CommandOutcome {
    pub fn is_change(&self) -> bool {
        matches!(self, CommandOutcome::Changed { .. })
    }
}

/// Names offered by the command prompt's completion menu.
pub fn command_names() -> Vec<String> {
    OPTION_NAMES
        .iter()
        .map(|name| name.to_string())
        .chain(COLOR_ROLES.iter().map(|(role, _)| format!("c.{role}")))
        .collect()
}

/// `name value` sets, a bare boolean name toggles, any other bare name
/// shows its value.
pub fn apply_command(config: &mut Config, input: &str) -> Result<CommandOutcome, ConfigError> {
    let input = input.trim();
    let (name, value) = match input.split_once(char::is_whitespace) {
        Some((name, value)) => (name, Some(value.trim())),
        None => (input, None),
    };

    match value {
        Some(value) => config.set(name, value)?,
        None if config.is_bool(name) => {
            config.toggle(name)?;
        }
        None => {
            let value = config
                .get(name)
                .ok_or_else(|| ConfigError::UnknownOption(name.to_string()))?;
            return Ok(CommandOutcome::Shown {
                name: name.to_string(),
                value,
            });
        }
    }

    Ok(CommandOutcome::Changed {
        name: name.to_string(),
        value: config.get(name).unwrap_or_default(),
    })
}
