pub mod free_dictionary;
pub mod wiktionary;
