//! Terminal pages of lexicard: dictionary screens, the help pager, the
//! prompt and the status overlay, all drawn into a ratatui [`Buffer`].
//!
//! [`Buffer`]: ratatui::buffer::Buffer

pub mod buffer;
pub mod format;
pub mod help;
pub mod highlight;
pub mod keys;
pub mod layout;
pub mod page;
pub mod pager;
pub mod palette;
pub mod prompt;
pub mod screen;
pub mod status;
pub mod wrap;

pub use buffer::ScreenBuffer;
pub use format::{FormatOptions, ParsedLine, format_dictionary};
pub use keys::Key;
pub use layout::Layout;
pub use page::{Dispatch, Page, Request};
pub use pager::Pager;
pub use palette::Palette;
pub use prompt::{Completion, Prompt, PromptAction};
pub use screen::Screen;
pub use status::{Severity, Status};
