use std::collections::BTreeMap;

use crate::error::AnkiError;

/// Keywords recognised in note field names, per card field. Checked in
/// order; audio comes first so "Pronunciation audio" is not taken as pos.
const KEYWORDS: &[(&str, &[&str])] = &[
    ("audio", &["audio", "sound"]),
    ("exsen", &["example", "sentence", "exsen", "context"]),
    ("syn", &["syn", "thesaurus"]),
    ("etym", &["etym", "origin"]),
    ("pos", &["pos", "part", "speech", "phon", "ipa", "pronunc"]),
    ("def", &["def", "meaning", "gloss", "back"]),
    ("phrase", &["phrase", "word", "term", "expression", "vocab", "front"]),
];

/// Guess which note field each card field goes into. Every card field and
/// every note field is used at most once.
pub fn auto_map(note: &str, note_fields: &[String]) -> Result<BTreeMap<String, String>, AnkiError> {
    let mut mapping = BTreeMap::new();

    for (card_field, keywords) in KEYWORDS {
        let found = note_fields.iter().find(|field| {
            let lower = field.to_lowercase();
            !mapping.values().any(|taken: &String| taken == *field)
                && keywords.iter().any(|keyword| lower.contains(keyword))
        });
        if let Some(field) = found {
            mapping.insert(card_field.to_string(), field.clone());
        }
    }

    if mapping.is_empty() {
        return Err(AnkiError::IncompatibleNote(note.to_string()));
    }
    tracing::debug!("Mapped {note:?} fields: {mapping:?}");
    Ok(mapping)
}
