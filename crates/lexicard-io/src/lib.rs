pub mod audio;
pub mod browser;
pub mod clipboard;
pub mod error;
pub mod history;

pub use audio::AudioPlayer;
pub use browser::open_url;
pub use clipboard::{ClipboardRead, SystemClipboard};
pub use error::{AudioError, ClipboardError, HistoryError};
pub use history::History;
