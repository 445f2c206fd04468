mod card;
mod client;
mod error;
mod fields;
mod hide;

pub use card::{CARD_FIELDS, Card, CardBuilder};
pub use client::{AnkiConnectClient, AnkiPort, NewNote};
pub use error::AnkiError;
pub use fields::auto_map;
pub use hide::Hider;

use std::collections::HashMap;

use lexicard_config::Config;
use lexicard_types::DictionarySelection;

/// Outcome of adding one batch of selections.
#[derive(Debug, Default)]
pub struct AddReport {
    pub added: Vec<u64>,
    /// Phrase and failure of every note that was rejected.
    pub failed: Vec<(String, AnkiError)>,
}

/// Name an audio URL gets in Anki's media folder.
pub fn audio_filename(url: &str) -> String {
    let last = url
        .split(['?', '#'])
        .next()
        .and_then(|path| path.rsplit('/').find(|s| !s.is_empty()))
        .unwrap_or("audio");
    let clean: String = last
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') { c } else { '_' })
        .collect();
    format!("lexicard-{clean}")
}

async fn resolve_media<P>(port: &P, selections: &[DictionarySelection]) -> HashMap<String, String>
where
    P: AnkiPort + ?Sized,
{
    let mut media = HashMap::new();
    for url in selections.iter().filter_map(|s| s.audio.as_deref()) {
        if media.contains_key(url) {
            continue;
        }
        match port.store_audio(url, &audio_filename(url)).await {
            Ok(file) => {
                media.insert(url.to_string(), file);
            }
            Err(e) => tracing::warn!("Audio {url} not stored: {e}"),
        }
    }
    media
}

/// Build one card per selection and submit them.
pub async fn add_cards<P>(
    port: &P,
    config: &Config,
    selections: &[DictionarySelection],
) -> Result<AddReport, AnkiError>
where
    P: AnkiPort + ?Sized,
{
    if !config.anki.is_configured() {
        return Err(AnkiError::NotConfigured);
    }

    let media = if config.card.audio {
        resolve_media(port, selections).await
    } else {
        HashMap::new()
    };

    let builder = CardBuilder::new(&config.card);
    let mut report = AddReport::default();
    for selection in selections {
        let card = builder.build(selection, &media);
        let note = NewNote {
            deck: config.anki.deck.clone(),
            model: config.anki.note.clone(),
            fields: card.note_fields(&config.anki.fields),
            tags: config.anki.tag_list(),
        };

        match port.add_note(&note).await {
            Ok(id) => {
                tracing::info!("Added note {id} for {:?}", selection.phrase.phrase);
                report.added.push(id);
            }
            Err(e @ AnkiError::NotConnected(_)) => return Err(e),
            Err(e) => {
                tracing::warn!("Note for {:?} rejected: {e}", selection.phrase.phrase);
                report.failed.push((selection.phrase.phrase.clone(), e));
            }
        }
    }
    Ok(report)
}

/// Browser query selecting the given notes.
pub fn browse_query(ids: &[u64]) -> String {
    let ids: Vec<String> = ids.iter().map(u64::to_string).collect();
    format!("nid:{}", ids.join(","))
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;
    use std::sync::Mutex;

    use lexicard_types::{Def, Phrase};

    use super::*;

    #[derive(Default)]
    struct FakeAnki {
        notes: Mutex<Vec<NewNote>>,
        stored: Mutex<Vec<String>>,
        reject: Option<&'static str>,
    }

    #[async_trait::async_trait]
    impl AnkiPort for FakeAnki {
        async fn add_note(&self, note: &NewNote) -> Result<u64, AnkiError> {
            let phrase = note.fields.get("Front").and_then(|v| v.as_str()).unwrap_or_default();
            if Some(phrase) == self.reject {
                return Err(AnkiError::Duplicate);
            }
            let mut notes = self.notes.lock().unwrap();
            notes.push(note.clone());
            Ok(notes.len() as u64)
        }

        async fn model_names(&self) -> Result<Vec<String>, AnkiError> {
            Ok(vec!["Basic".to_string()])
        }

        async fn model_field_names(&self, _model: &str) -> Result<Vec<String>, AnkiError> {
            Ok(vec!["Front".to_string(), "Back".to_string()])
        }

        async fn deck_names(&self) -> Result<Vec<String>, AnkiError> {
            Ok(vec!["Default".to_string()])
        }

        async fn browse(&self, _query: &str) -> Result<(), AnkiError> {
            Ok(())
        }

        async fn store_audio(&self, url: &str, filename: &str) -> Result<String, AnkiError> {
            self.stored.lock().unwrap().push(url.to_string());
            Ok(filename.to_string())
        }
    }

    fn configured() -> Config {
        let mut config = Config::default();
        config.anki.note = "Basic".to_string();
        config.anki.deck = "English".to_string();
        config.anki.fields = BTreeMap::from([
            ("phrase".to_string(), "Front".to_string()),
            ("def".to_string(), "Back".to_string()),
        ]);
        config
    }

    fn selection(phrase: &str, audio: Option<&str>) -> DictionarySelection {
        let mut selection = DictionarySelection::new(Phrase {
            phrase: phrase.to_string(),
            extra: String::new(),
        });
        selection.definitions = vec![Def::new(format!("meaning of {phrase}"))];
        selection.audio = audio.map(str::to_string);
        selection
    }

    #[tokio::test]
    async fn unconfigured_anki_is_refused() {
        let port = FakeAnki::default();
        let err = add_cards(&port, &Config::default(), &[selection("mint", None)])
            .await
            .unwrap_err();
        assert!(matches!(err, AnkiError::NotConfigured));
    }

    #[tokio::test]
    async fn adds_one_note_per_selection() {
        let port = FakeAnki::default();
        let selections = [
            selection("mint", Some("https://x.org/a/mint.mp3")),
            selection("coin", Some("https://x.org/a/mint.mp3")),
        ];
        let report = add_cards(&port, &configured(), &selections).await.unwrap();

        assert_eq!(report.added, vec![1, 2]);
        assert!(report.failed.is_empty());
        // Shared audio is stored once.
        assert_eq!(port.stored.lock().unwrap().len(), 1);

        let notes = port.notes.lock().unwrap();
        assert_eq!(notes[0].deck, "English");
        assert_eq!(notes[0].fields["Back"], "meaning of mint");
        assert_eq!(notes[1].tags, vec!["lexicard"]);
    }

    #[tokio::test]
    async fn rejected_notes_are_reported() {
        let port = FakeAnki {
            reject: Some("mint"),
            ..FakeAnki::default()
        };
        let selections = [selection("mint", None), selection("coin", None)];
        let report = add_cards(&port, &configured(), &selections).await.unwrap();

        assert_eq!(report.added.len(), 1);
        assert_eq!(report.failed.len(), 1);
        assert!(matches!(report.failed[0], (ref phrase, AnkiError::Duplicate) if phrase == "mint"));
    }

    #[test]
    fn audio_file_names_are_sanitised() {
        assert_eq!(
            audio_filename("https://api.dictionaryapi.dev/media/pronunciations/en/mint-us.mp3?x=1"),
            "lexicard-mint-us.mp3"
        );
        assert_eq!(audio_filename("https://x.org/a b/c d.ogg"), "lexicard-c_d.ogg");
    }

    #[test]
    fn browse_query_lists_note_ids() {
        assert_eq!(browse_query(&[1, 22]), "nid:1,22");
    }
}
