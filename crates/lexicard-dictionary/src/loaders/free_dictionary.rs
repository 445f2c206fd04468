use lexicard_core::Lookup;
use lexicard_types::{Def, Dictionary, DictionaryError, Op, Pos};
use reqwest::Client;
use serde::Deserialize;

use crate::http::{get_json, url_with_segment};

const API_URL: &str = "https://api.dictionaryapi.dev/api/v2/entries/en/";
const NAME: &str = "Free Dictionary";

// JSON structures of the dictionaryapi.dev response
#[derive(Debug, Deserialize)]
struct WordEntry {
    word: String,
    #[serde(default)]
    phonetic: Option<String>,
    #[serde(default)]
    phonetics: Vec<Phonetic>,
    #[serde(default)]
    origin: Option<String>,
    #[serde(default)]
    meanings: Vec<Meaning>,
    #[serde(rename = "sourceUrls", default)]
    source_urls: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct Phonetic {
    #[serde(default)]
    text: Option<String>,
    #[serde(default)]
    audio: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Meaning {
    #[serde(rename = "partOfSpeech", default)]
    part_of_speech: String,
    #[serde(default)]
    definitions: Vec<Definition>,
    #[serde(default)]
    synonyms: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct Definition {
    definition: String,
    #[serde(default)]
    example: Option<String>,
}

fn non_empty(s: &Option<String>) -> Option<&str> {
    s.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

impl WordEntry {
    fn phonetic(&self) -> &str {
        non_empty(&self.phonetic)
            .or_else(|| self.phonetics.iter().find_map(|p| non_empty(&p.text)))
            .unwrap_or_default()
    }

    fn audio(&self) -> Option<&str> {
        self.phonetics.iter().find_map(|p| non_empty(&p.audio))
    }
}

/// Turn a dictionaryapi.dev response into an entry stream: one phrase block
/// per returned word entry.
fn to_dictionary(entries: Vec<WordEntry>, query: &str) -> Result<Dictionary, DictionaryError> {
    if entries.is_empty() {
        return Err(DictionaryError::NotFound(query.to_string()));
    }

    let mut dict = Dictionary::new(NAME);
    dict.add(Op::header(NAME));

    for entry in &entries {
        let phonetic = entry.phonetic();
        dict.add(Op::phrase(entry.word.as_str(), phonetic));

        for meaning in &entry.meanings {
            dict.add(Op::label(meaning.part_of_speech.as_str(), ""));
            for definition in &meaning.definitions {
                let def = Def::new(definition.definition.trim())
                    .with_examples(non_empty(&definition.example).map(|e| format!("\"{e}\"")));
                dict.add(Op::Def(def));
            }
            if !meaning.synonyms.is_empty() {
                let gloss = meaning
                    .definitions
                    .first()
                    .map(|d| d.definition.trim().to_string())
                    .unwrap_or_default();
                dict.add(Op::syn(meaning.synonyms.join(", "), gloss, Vec::new()));
            }
        }

        let parts: Vec<(String, String)> = entry
            .meanings
            .iter()
            .filter(|m| !m.part_of_speech.is_empty())
            .map(|m| (m.part_of_speech.clone(), phonetic.to_string()))
            .fold(Vec::new(), |mut acc, row| {
                if !acc.contains(&row) {
                    acc.push(row);
                }
                acc
            });
        if !parts.is_empty() {
            dict.add(Op::Pos(Pos { pos: parts }));
        }
        if let Some(audio) = entry.audio() {
            dict.add(Op::audio(audio));
        }
        if let Some(origin) = non_empty(&entry.origin) {
            dict.add(Op::etym(origin));
        }
    }

    if dict.count_toggleable() == 0 {
        return Err(DictionaryError::NotFound(query.to_string()));
    }

    if let Some(url) = entries.iter().find_map(|e| e.source_urls.first()) {
        dict = dict.with_url(url.as_str());
    }
    Ok(dict)
}

pub struct FreeDictionary {
    client: Client,
}

impl FreeDictionary {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait::async_trait]
impl Lookup for FreeDictionary {
    fn key(&self) -> &str {
        "free"
    }

    fn aliases(&self) -> &[&'static str] {
        &["f", "free"]
    }

    async fn ask(&self, query: &str) -> Result<Dictionary, DictionaryError> {
        let url = url_with_segment(API_URL, query)?;
        let entries: Vec<WordEntry> = get_json(&self.client, url, query).await?;
        let dict = to_dictionary(entries, query)?;
        tracing::debug!("{NAME}: {} entries for {query:?}", dict.len());
        Ok(dict)
    }
}
