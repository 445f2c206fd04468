use std::collections::HashMap;

use lexicard_core::Lookup;
use lexicard_types::{Def, Dictionary, DictionaryError, Op};
use reqwest::Client;
use serde::Deserialize;

use crate::html::strip_html;
use crate::http::{get_json, url_with_segment};

const API_URL: &str = "https://en.wiktionary.org/api/rest_v1/page/definition/";
const PAGE_URL: &str = "https://en.wiktionary.org/wiki/";
const NAME: &str = "Wiktionary";

#[derive(Debug, Deserialize)]
struct Usage {
    #[serde(rename = "partOfSpeech", default)]
    part_of_speech: String,
    #[serde(default)]
    definitions: Vec<Sense>,
}

#[derive(Debug, Deserialize)]
struct Sense {
    #[serde(default)]
    definition: String,
    #[serde(default)]
    examples: Vec<String>,
    #[serde(rename = "parsedExamples", default)]
    parsed_examples: Vec<ParsedExample>,
}

#[derive(Debug, Deserialize)]
struct ParsedExample {
    #[serde(default)]
    example: String,
}

impl Sense {
    fn examples(&self) -> Vec<String> {
        let raw: Vec<&str> = if self.parsed_examples.is_empty() {
            self.examples.iter().map(String::as_str).collect()
        } else {
            self.parsed_examples.iter().map(|e| e.example.as_str()).collect()
        };
        raw.into_iter()
            .map(strip_html)
            .filter(|e| !e.is_empty())
            .collect()
    }
}

/// Keep the English section of a REST definition response.
fn to_dictionary(
    mut sections: HashMap<String, Vec<Usage>>,
    query: &str,
) -> Result<Dictionary, DictionaryError> {
    let usages = sections
        .remove("en")
        .ok_or_else(|| DictionaryError::NotFound(query.to_string()))?;

    let mut dict = Dictionary::new(NAME);
    dict.add(Op::header(NAME));
    dict.add(Op::phrase(query, ""));

    for usage in usages {
        let senses: Vec<Def> = usage
            .definitions
            .iter()
            .filter_map(|sense| {
                let definition = strip_html(&sense.definition);
                (!definition.is_empty()).then(|| Def::new(definition).with_examples(sense.examples()))
            })
            .collect();
        if senses.is_empty() {
            continue;
        }
        dict.add(Op::label(usage.part_of_speech.to_lowercase(), ""));
        senses.into_iter().for_each(|def| dict.add(Op::Def(def)));
    }

    if dict.count_defs() == 0 {
        return Err(DictionaryError::NotFound(query.to_string()));
    }

    let page = url_with_segment(PAGE_URL, &query.replace(' ', "_"))?;
    Ok(dict.with_url(page.as_str()))
}

pub struct Wiktionary {
    client: Client,
}

impl Wiktionary {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait::async_trait]
impl Lookup for Wiktionary {
    fn key(&self) -> &str {
        "wikt"
    }

    fn aliases(&self) -> &[&'static str] {
        &["w", "wikt"]
    }

    async fn ask(&self, query: &str) -> Result<Dictionary, DictionaryError> {
        let url = url_with_segment(API_URL, &query.replace(' ', "_"))?;
        let sections: HashMap<String, Vec<Usage>> = get_json(&self.client, url, query).await?;
        let dict = to_dictionary(sections, query)?;
        tracing::debug!("{NAME}: {} entries for {query:?}", dict.len());
        Ok(dict)
    }
}
