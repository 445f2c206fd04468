use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

use lexicard_anki::{AnkiError, AnkiPort, NewNote};
use lexicard_config::{Config, ConfigError};
use lexicard_core::{Query, SearchFailure, SearchHit, SearchOutcome};
use lexicard_types::{Def, Dictionary, DictionaryError, Op};
use lexicard_ui::{Key, ScreenBuffer, Severity};

use crate::events::anki_setup::{apply_setup, check_deck, describe_mapping, fetch_note_mapping};
use crate::events::command::{CommandOutcome, apply_command, command_names};
use crate::events::create_card::handle_card_creation;
use crate::events::search::{query_line, report_search};

#[derive(Default)]
struct FakeAnki {
    notes: Mutex<Vec<NewNote>>,
    browsed: Mutex<Vec<String>>,
}

#[async_trait::async_trait]
impl AnkiPort for FakeAnki {
    async fn add_note(&self, note: &NewNote) -> Result<u64, AnkiError> {
        let mut notes = self.notes.lock().unwrap();
        notes.push(note.clone());
        Ok(notes.len() as u64)
    }

    async fn model_names(&self) -> Result<Vec<String>, AnkiError> {
        Ok(vec!["Basic".to_string(), "Cloze".to_string()])
    }

    async fn model_field_names(&self, model: &str) -> Result<Vec<String>, AnkiError> {
        match model {
            "Basic" => Ok(vec!["Front".to_string(), "Back".to_string()]),
            _ => Ok(vec!["Text".to_string(), "Extra".to_string()]),
        }
    }

    async fn deck_names(&self) -> Result<Vec<String>, AnkiError> {
        Ok(vec!["Default".to_string(), "English".to_string()])
    }

    async fn browse(&self, query: &str) -> Result<(), AnkiError> {
        self.browsed.lock().unwrap().push(query.to_string());
        Ok(())
    }

    async fn store_audio(&self, _url: &str, filename: &str) -> Result<String, AnkiError> {
        Ok(filename.to_string())
    }
}

fn dictionary(name: &str, phrase: &str) -> Arc<Dictionary> {
    Arc::new(Dictionary::from_ops(
        name,
        vec![
            Op::header(name),
            Op::phrase(phrase, ""),
            Op::Def(Def::new(format!("first sense of {phrase}"))),
            Op::Def(Def::new(format!("second sense of {phrase}"))),
        ],
    ))
}

fn hit(key: &str, phrase: &str, dictionaries: &[&str]) -> SearchHit {
    SearchHit {
        dictionary_key: key.to_string(),
        query: Query {
            phrase: phrase.to_string(),
            dictionaries: dictionaries.iter().map(|d| d.to_string()).collect(),
            flags: Vec::new(),
        },
        dictionary: dictionary(key, phrase),
    }
}

fn buffer() -> ScreenBuffer {
    ScreenBuffer::new(&Config::default(), 80, 24)
}

fn headers(buffer: &ScreenBuffer) -> Vec<(String, Severity)> {
    buffer
        .status()
        .lines()
        .map(|line| (line.header.clone(), line.severity))
        .collect()
}

fn configured() -> Config {
    let mut config = Config::default();
    apply_setup(
        &mut config.anki,
        "Basic",
        "English",
        BTreeMap::from([
            ("phrase".to_string(), "Front".to_string()),
            ("def".to_string(), "Back".to_string()),
        ]),
    );
    config
}

#[test]
fn bare_boolean_toggles_and_pairs_set() {
    let mut config = Config::default();
    let outcome = apply_command(&mut config, "hidedef").unwrap();
    assert_eq!(
        outcome,
        CommandOutcome::Changed {
            name: "hidedef".to_string(),
            value: "on".to_string()
        }
    );
    assert!(config.card.hidedef);

    let outcome = apply_command(&mut config, "  hides   ***  ").unwrap();
    assert!(outcome.is_change());
    assert_eq!(config.card.hides, "***");

    apply_command(&mut config, "c.phrase red").unwrap();
    assert_eq!(config.colors.get("phrase"), Some("red"));
}

#[test]
fn bare_text_option_is_shown() {
    let mut config = Config::default();
    let outcome = apply_command(&mut config, "primary").unwrap();
    assert_eq!(
        outcome,
        CommandOutcome::Shown {
            name: "primary".to_string(),
            value: config.dictionary.primary.clone()
        }
    );
    assert!(!outcome.is_change());
}

#[test]
fn bad_commands_are_config_errors() {
    let mut config = Config::default();
    assert!(matches!(
        apply_command(&mut config, "bogus"),
        Err(ConfigError::UnknownOption(name)) if name == "bogus"
    ));
    assert!(matches!(
        apply_command(&mut config, "audio maybe"),
        Err(ConfigError::InvalidValue { .. })
    ));
}

#[test]
fn command_completion_lists_options_and_colors() {
    let names = command_names();
    assert!(names.iter().any(|n| n == "nohelp"));
    assert!(names.iter().any(|n| n == "c.phrase"));
    assert!(!names.iter().any(|n| n == "toipa"));
}

#[test]
fn hits_become_screens() {
    let mut buffer = buffer();
    let outcome = SearchOutcome {
        hits: vec![
            hit("free", "mint", &["free", "wikt"]),
            hit("wikt", "mint", &["free", "wikt"]),
            hit("free", "coin", &[]),
        ],
        ..SearchOutcome::default()
    };

    let found = report_search(&mut buffer, outcome);
    assert_eq!(found, ["mint -free -wikt", "coin"]);
    assert_eq!(buffer.screens().len(), 3);
    assert!(!buffer.is_help_shown());
    assert!(buffer.status().is_empty());
}

#[test]
fn failures_are_labeled_by_kind() {
    let mut buffer = buffer();
    let outcome = SearchOutcome {
        failures: vec![
            SearchFailure {
                dictionary_key: "free".to_string(),
                phrase: "mint".to_string(),
                error: DictionaryError::Connection("timed out".to_string()),
            },
            SearchFailure {
                dictionary_key: "wikt".to_string(),
                phrase: "mint".to_string(),
                error: DictionaryError::NotFound("mint".to_string()),
            },
        ],
        ..SearchOutcome::default()
    };

    assert!(report_search(&mut buffer, outcome).is_empty());
    assert_eq!(
        headers(&buffer),
        [
            ("ConnectionError".to_string(), Severity::Error),
            ("DictionaryError".to_string(), Severity::Error),
        ]
    );
    assert!(buffer.screens().is_empty());
}

#[test]
fn empty_search_says_so_and_keeps_screens() {
    let mut buffer = buffer();
    buffer.set_screens(vec![dictionary("free", "mint")]);

    let found = report_search(&mut buffer, SearchOutcome::default());
    assert!(found.is_empty());
    assert_eq!(headers(&buffer), [("No results".to_string(), Severity::Error)]);
    assert_eq!(buffer.screens().len(), 1);
}

#[test]
fn query_line_writes_flags_back() {
    let query = Query {
        phrase: "run".to_string(),
        dictionaries: vec!["wikt".to_string()],
        flags: vec!["verb".to_string()],
    };
    assert_eq!(query_line(&query), "run -wikt -verb");
}

#[tokio::test]
async fn nothing_selected_adds_nothing() {
    let port = FakeAnki::default();
    let mut buffer = buffer();
    buffer.set_screens(vec![dictionary("free", "mint")]);

    handle_card_creation(&port, &configured(), &mut buffer).await;
    assert_eq!(headers(&buffer), [("Nothing selected".to_string(), Severity::Error)]);
    assert!(port.notes.lock().unwrap().is_empty());
}

#[tokio::test]
async fn selections_are_added_and_browsed() {
    let port = FakeAnki::default();
    let mut buffer = buffer();
    buffer.set_screens(vec![dictionary("free", "mint"), dictionary("wikt", "coin")]);
    buffer.dispatch(&Key::Char('1'));
    buffer.dispatch(&Key::Char('l'));
    buffer.dispatch(&Key::Char('2'));

    handle_card_creation(&port, &configured(), &mut buffer).await;

    let notes = port.notes.lock().unwrap();
    assert_eq!(notes.len(), 2);
    assert_eq!(notes[0].deck, "English");
    assert_eq!(notes[0].fields["Front"], "mint");
    assert_eq!(notes[1].fields["Front"], "coin");
    assert_eq!(*port.browsed.lock().unwrap(), ["nid:1,2"]);
    assert_eq!(headers(&buffer), [("2 cards added".to_string(), Severity::Success)]);
}

#[tokio::test]
async fn unconfigured_anki_is_reported() {
    let port = FakeAnki::default();
    let mut buffer = buffer();
    buffer.set_screens(vec![dictionary("free", "mint")]);
    buffer.dispatch(&Key::Char('1'));

    handle_card_creation(&port, &Config::default(), &mut buffer).await;
    assert_eq!(headers(&buffer), [("NotConfigured".to_string(), Severity::Error)]);
    assert!(port.browsed.lock().unwrap().is_empty());
}

#[tokio::test]
async fn setup_maps_fields_and_checks_deck() {
    let port = FakeAnki::default();

    let fields = fetch_note_mapping(&port, "Basic").await.unwrap();
    assert_eq!(describe_mapping(&fields), "def: Back, phrase: Front");

    assert!(matches!(
        fetch_note_mapping(&port, "Vocab").await,
        Err(AnkiError::UnknownNote(note)) if note == "Vocab"
    ));
    assert!(matches!(
        fetch_note_mapping(&port, "Cloze").await,
        Err(AnkiError::IncompatibleNote(_))
    ));

    assert!(check_deck(&port, "English").await.is_ok());
    assert!(matches!(
        check_deck(&port, "French").await,
        Err(AnkiError::UnknownDeck(deck)) if deck == "French"
    ));

    let mut config = Config::default();
    apply_setup(&mut config.anki, "Basic", "English", fields);
    assert!(config.anki.is_configured());
}
