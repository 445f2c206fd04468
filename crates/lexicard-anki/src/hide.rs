use regex::{NoExpand, Regex, RegexBuilder};

const STOP_WORDS: &[&str] = &[
    "the", "and", "a", "is", "an", "it", "or", "be", "do", "does", "not", "if", "he",
];

const PREPOSITIONS: &[&str] = &[
    "about", "above", "across", "after", "against", "along", "among", "around", "at", "before",
    "behind", "below", "beneath", "beside", "between", "beyond", "but", "by", "despite", "down",
    "during", "except", "for", "from", "in", "inside", "into", "like", "near", "of", "off", "on",
    "onto", "out", "outside", "over", "past", "since", "through", "throughout", "to", "toward",
    "under", "until", "up", "upon", "with", "within", "without", "via",
];

/// Regular inflections of `word`, the word itself first.
fn inflections(word: &str) -> Vec<String> {
    let mut forms = vec![word.to_string()];
    if let Some(stem) = word.strip_suffix("ie") {
        forms.push(format!("{stem}ying"));
    } else if let Some(stem) = word.strip_suffix('e') {
        forms.push(format!("{stem}ing"));
    }
    if let Some(stem) = word.strip_suffix('y') {
        forms.push(format!("{stem}ies"));
        forms.push(format!("{stem}ied"));
    }
    forms
}

/// Masks the words of a phrase (and their regular inflections) in card text.
pub struct Hider {
    pattern: Option<Regex>,
    mask: String,
}

impl Hider {
    pub fn new(phrase: &str, mask: &str, hidepreps: bool) -> Self {
        let mut forms: Vec<String> = phrase
            .split_whitespace()
            .map(str::to_lowercase)
            .filter(|w| !STOP_WORDS.contains(&w.as_str()))
            .filter(|w| hidepreps || !PREPOSITIONS.contains(&w.as_str()))
            .flat_map(|w| inflections(&w))
            .collect();
        // Longest first so "carries" wins over "carr".
        forms.sort_by_key(|f| std::cmp::Reverse(f.chars().count()));
        forms.dedup();

        let pattern = if forms.is_empty() {
            None
        } else {
            let alternation = forms
                .iter()
                .map(|f| regex::escape(f))
                .collect::<Vec<_>>()
                .join("|");
            RegexBuilder::new(&format!(r"\b(?:{alternation})\b"))
                .case_insensitive(true)
                .build()
                .map_err(|e| tracing::warn!("Cannot build hide pattern for {phrase:?}: {e}"))
                .ok()
        };

        Self {
            pattern,
            mask: mask.to_string(),
        }
    }

    pub fn hide(&self, text: &str) -> String {
        match &self.pattern {
            Some(pattern) => pattern.replace_all(text, NoExpand(&self.mask)).into_owned(),
            None => text.to_string(),
        }
    }
}
