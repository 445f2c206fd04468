use std::collections::BTreeMap;

use lexicard_anki::{AnkiError, AnkiPort};
use lexicard_config::anki::AnkiConfig;

/// Fields of `note` mapped onto card fields.
pub async fn fetch_note_mapping<P>(port: &P, note: &str) -> Result<BTreeMap<String, String>, AnkiError>
where
    P: AnkiPort + ?Sized,
{
    let models = port.model_names().await?;
    if !models.iter().any(|m| m == note) {
        return Err(AnkiError::UnknownNote(note.to_string()));
    }
    let fields = port.model_field_names(note).await?;
    lexicard_anki::auto_map(note, &fields)
}

pub async fn check_deck<P>(port: &P, deck: &str) -> Result<(), AnkiError>
where
    P: AnkiPort + ?Sized,
{
    let decks = port.deck_names().await?;
    if decks.iter().any(|d| d == deck) {
        Ok(())
    } else {
        Err(AnkiError::UnknownDeck(deck.to_string()))
    }
}

pub fn apply_setup(config: &mut AnkiConfig, note: &str, deck: &str, fields: BTreeMap<String, String>) {
    config.note = note.to_string();
    config.deck = deck.to_string();
    config.fields = fields;
    tracing::info!("Anki configured: note {note:?}, deck {deck:?}");
}

/// `card -> Note field` pairs for the status line.
pub fn describe_mapping(fields: &BTreeMap<String, String>) -> String {
    fields
        .iter()
        .map(|(card, note)| format!("{card}: {note}"))
        .collect::<Vec<_>>()
        .join(", ")
}
