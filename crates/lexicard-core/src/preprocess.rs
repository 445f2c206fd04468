use unicode_normalization::UnicodeNormalization;

pub trait Preprocessor {
    // Default query preprocessor
    fn process(&self, text: &str) -> String {
        let text = text.trim();

        if text.is_empty() {
            return String::new();
        }

        // Unicode normalization (NFKC): full-width letters, ligatures, etc.
        let text: String = text.nfkc().collect();

        // Collapse newlines and runs of whitespace
        text.split_whitespace().collect::<Vec<_>>().join(" ")
    }
}

pub struct QueryPreprocessor;
impl Preprocessor for QueryPreprocessor {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalizes_and_collapses_whitespace() {
        let p = QueryPreprocessor;
        assert_eq!(p.process("  ｍｉｎｔ \n  leaf\t"), "mint leaf");
        assert_eq!(p.process("ﬁne"), "fine");
        assert_eq!(p.process("   "), "");
    }
}
