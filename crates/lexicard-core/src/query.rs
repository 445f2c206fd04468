use std::collections::HashMap;

use crate::preprocess::{Preprocessor, QueryPreprocessor};

/// One comma-separated part of a search string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Query {
    pub phrase: String,
    /// Dictionary keys in flag order, deduplicated.
    pub dictionaries: Vec<String>,
    /// Flags that name no dictionary, lowercased. Used as label filters.
    pub flags: Vec<String>,
}

const COMPARE_FLAGS: &[&str] = &["c", "compare"];

fn push_unique(list: &mut Vec<String>, value: &str) {
    if !list.iter().any(|v| v == value) {
        list.push(value.to_string());
    }
}

/// Split `raw` into sub-queries.
///
/// `aliases` maps a flag (without the dash) to a dictionary key.
pub fn parse_queries(
    raw: &str,
    aliases: &HashMap<String, String>,
    primary: &str,
    secondary: &str,
) -> Vec<Query> {
    let raw = raw.trim_matches(|c: char| c == ',' || c.is_whitespace());
    let preprocessor = QueryPreprocessor;

    let mut queries = Vec::new();
    for part in raw.split(',') {
        let part = part.trim();
        if part.is_empty() {
            continue;
        }

        let mut pieces = part.split(" -");
        let phrase = preprocessor.process(pieces.next().unwrap_or_default());
        if phrase.is_empty() {
            continue;
        }

        let mut query = Query {
            phrase,
            dictionaries: Vec::new(),
            flags: Vec::new(),
        };
        for flag in pieces {
            let flag = flag.trim().trim_start_matches('-').to_lowercase();
            if flag.is_empty() {
                continue;
            }
            if COMPARE_FLAGS.contains(&flag.as_str()) {
                push_unique(&mut query.dictionaries, primary);
                push_unique(&mut query.dictionaries, secondary);
            } else if let Some(key) = aliases.get(&flag) {
                push_unique(&mut query.dictionaries, key);
            } else {
                push_unique(&mut query.flags, &flag);
            }
        }
        queries.push(query);
    }
    queries
}
