use lexicard_core::{Query, SearchOutcome};
use lexicard_ui::ScreenBuffer;

/// A sub-query written back the way it can be typed again.
pub fn query_line(query: &Query) -> String {
    let mut line = query.phrase.clone();
    for flag in query.dictionaries.iter().chain(&query.flags) {
        line.push_str(" -");
        line.push_str(flag);
    }
    line
}

/// Show a finished search: failures and notices in the status, hits as the
/// new screens. Returns the sub-queries that found something, for history.
pub fn report_search(buffer: &mut ScreenBuffer, outcome: SearchOutcome) -> Vec<String> {
    let status = buffer.status_mut();
    for failure in &outcome.failures {
        let header = if failure.error.is_connection() {
            "ConnectionError"
        } else {
            "DictionaryError"
        };
        status.error(
            header,
            Some(&format!("{}: {}", failure.dictionary_key, failure.error)),
        );
    }
    for notice in &outcome.notices {
        status.attention(notice, None);
    }

    if outcome.hits.is_empty() {
        if outcome.failures.is_empty() {
            status.error("No results", None);
        }
        return Vec::new();
    }

    let mut found: Vec<String> = Vec::new();
    for hit in &outcome.hits {
        let line = query_line(&hit.query);
        if !found.contains(&line) {
            found.push(line);
        }
    }
    tracing::info!("{} screens for {:?}", outcome.hits.len(), found);

    buffer.set_screens(outcome.hits.into_iter().map(|hit| hit.dictionary).collect());
    found
}
