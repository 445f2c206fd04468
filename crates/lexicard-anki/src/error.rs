/// Failures of the card-export port.
#[derive(Debug, thiserror::Error)]
pub enum AnkiError {
    #[error("could not connect to AnkiConnect: {0}")]
    NotConnected(String),

    #[error("deck does not exist: {0}")]
    UnknownDeck(String),

    #[error("note type does not exist: {0}")]
    UnknownNote(String),

    #[error("duplicate note")]
    Duplicate,

    #[error("the first field of the note is empty")]
    EmptyFirstField,

    #[error("note type {0:?} has no field lexicard can fill")]
    IncompatibleNote(String),

    #[error("anki is not configured, run the setup first")]
    NotConfigured,

    #[error("AnkiConnect error: {0}")]
    Api(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl AnkiError {
    /// Short subkind name shown as the Status header.
    pub fn label(&self) -> &'static str {
        match self {
            AnkiError::NotConnected(_) => "NotConnected",
            AnkiError::UnknownDeck(_) => "UnknownDeck",
            AnkiError::UnknownNote(_) => "UnknownNote",
            AnkiError::Duplicate => "Duplicate",
            AnkiError::EmptyFirstField => "EmptyFirstField",
            AnkiError::IncompatibleNote(_) => "IncompatibleNote",
            AnkiError::NotConfigured => "NotConfigured",
            AnkiError::Api(_) => "AnkiError",
            AnkiError::Io(_) => "IOError",
        }
    }

    /// Classify an error string returned by AnkiConnect.
    pub(crate) fn from_api(message: &str, deck: &str, note: &str) -> Self {
        let lower = message.to_lowercase();
        if lower.contains("duplicate") {
            AnkiError::Duplicate
        } else if lower.contains("empty") {
            AnkiError::EmptyFirstField
        } else if lower.contains("deck") && lower.contains("not found") {
            AnkiError::UnknownDeck(deck.to_string())
        } else if lower.contains("model") && lower.contains("not found") {
            AnkiError::UnknownNote(note.to_string())
        } else {
            AnkiError::Api(message.to_string())
        }
    }
}

impl From<reqwest::Error> for AnkiError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_connect() || e.is_timeout() {
            AnkiError::NotConnected(e.to_string())
        } else {
            AnkiError::Api(e.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_anki_connect_messages() {
        let err = AnkiError::from_api("cannot create note because it is a duplicate", "d", "n");
        assert!(matches!(err, AnkiError::Duplicate));

        let err = AnkiError::from_api("cannot create note because it is empty", "d", "n");
        assert!(matches!(err, AnkiError::EmptyFirstField));

        let err = AnkiError::from_api("deck was not found: English", "English", "n");
        assert!(matches!(err, AnkiError::UnknownDeck(deck) if deck == "English"));

        let err = AnkiError::from_api("model was not found: Vocab", "d", "Vocab");
        assert!(matches!(err, AnkiError::UnknownNote(note) if note == "Vocab"));

        let err = AnkiError::from_api("collection is not available", "d", "n");
        assert_eq!(err.label(), "AnkiError");
    }
}
