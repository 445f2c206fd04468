pub mod dictionary;
pub mod error;
pub mod op;

pub use dictionary::{Dictionary, DictionarySelection};
pub use error::DictionaryError;
pub use op::{Def, Op, OpKind, Phrase, Pos, Syn};
