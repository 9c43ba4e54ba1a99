use thiserror::Error;

/// Reasons a note's `date_text` could not become a timestamp.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NoteDateError {
    #[error("date text does not match \"<Mon> <day>, <h>:<mm> <AM|PM>\": {0}")]
    Malformed(#[source] time::error::ParseFromDescription),

    #[error("unexpected text after the AM/PM marker")]
    TrailingInput,

    #[error("date does not exist in {year} or the years before it: {source}")]
    InvalidDate {
        year: i32,
        #[source]
        source: time::error::TryFromParsed,
    },
}

/// A raw note dropped while building the display list.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("skipped note {title:?} with date {date_text:?}: {error}")]
pub struct RejectedNote {
    pub title: String,
    pub date_text: String,
    #[source]
    pub error: NoteDateError,
}
