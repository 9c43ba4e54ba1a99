pub mod app;
pub mod cli;
pub mod config;
pub mod error;
pub mod highlight;
pub mod markdown;
pub mod notes;
pub mod render;
pub mod search;
pub mod ui;

pub use config::{AppConfig, ConfigLoader, ConfigPaths};
pub use error::{NoteDateError, RejectedNote};
pub use markdown::{parse_markdown, BlockType, MarkdownBlock};
pub use notes::{build_display_items, DisplayItem, Note, NoteCalendar, RawNote};
pub use search::{filter_display_items, FilterOutcome};
