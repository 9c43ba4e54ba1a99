use time::error::TryFromParsed;
use time::format_description::FormatItem;
use time::macros::format_description;
use time::parsing::Parsed;
use time::{Date, OffsetDateTime, PrimitiveDateTime, UtcOffset};

use crate::error::NoteDateError;

/// `"May 9, 6:00 PM"`
const NOTE_DATE_FORMAT: &[FormatItem<'static>] = format_description!(
    "[month repr:short] [day padding:none], [hour repr:12 padding:none]:[minute] [period]"
);

/// `"Thu 08 May"`
const SEPARATOR_FORMAT: &[FormatItem<'static>] =
    format_description!("[weekday repr:short] [day] [month repr:short]");

/// `"6:00 PM"`
const SHORT_TIME_FORMAT: &[FormatItem<'static>] =
    format_description!("[hour repr:12 padding:none]:[minute] [period]");

/// Leap days can be up to eight years apart (e.g. 1896 and 1904).
const MAX_YEARS_BACK: i32 = 8;

/// The reference day used to resolve the year of note dates and to label
/// the current and previous day.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NoteCalendar {
    today: Date,
}

impl NoteCalendar {
    pub fn fixed(today: Date) -> Self {
        Self { today }
    }

    pub fn from_offset(offset: UtcOffset) -> Self {
        Self::at(OffsetDateTime::now_utc(), offset)
    }

    /// The calendar day `instant` falls on as seen from `offset`.
    pub fn at(instant: OffsetDateTime, offset: UtcOffset) -> Self {
        Self {
            today: instant.to_offset(offset).date(),
        }
    }

    /// Uses the platform's local offset, falling back to UTC when it cannot
    /// be determined (e.g. in multi-threaded processes on some unix targets).
    pub fn now_local() -> Self {
        let offset = UtcOffset::current_local_offset().unwrap_or_else(|err| {
            tracing::debug!(%err, "local offset unavailable, using UTC");
            UtcOffset::UTC
        });
        Self::from_offset(offset)
    }

    pub fn today(&self) -> Date {
        self.today
    }

    pub fn separator_label(&self, day: Date) -> String {
        if day == self.today {
            return "Today".to_string();
        }
        if self.today.previous_day() == Some(day) {
            return "Yesterday".to_string();
        }
        format_day_label(day)
    }

    /// Parses `"<Mon> <day>, <h>:<mm> <AM|PM>"`. The text carries no year, so
    /// the most recent year in which that day exists and is not after today
    /// is used.
    pub fn parse_note_date(&self, text: &str) -> Result<PrimitiveDateTime, NoteDateError> {
        let normalized = normalize_spaces(text.trim());
        let mut parsed = Parsed::new();
        let rest = parsed
            .parse_items(normalized.as_bytes(), NOTE_DATE_FORMAT)
            .map_err(NoteDateError::Malformed)?;
        if !rest.is_empty() {
            return Err(NoteDateError::TrailingInput);
        }

        let current_year = self.today.year();
        let mut first_error = None;
        for year in (current_year - MAX_YEARS_BACK..=current_year).rev() {
            let mut candidate = parsed;
            // Parsed only rejects years outside the supported range, which a
            // `Date` can never hold.
            let _ = candidate.set_year(year);
            match PrimitiveDateTime::try_from(candidate) {
                Ok(timestamp) if timestamp.date() <= self.today => return Ok(timestamp),
                Ok(_) => {}
                Err(source) => {
                    first_error.get_or_insert(source);
                }
            }
        }
        Err(NoteDateError::InvalidDate {
            year: current_year,
            source: first_error.unwrap_or(TryFromParsed::InsufficientInformation),
        })
    }
}

pub fn format_day_label(day: Date) -> String {
    day.format(SEPARATOR_FORMAT)
        .unwrap_or_else(|_| day.to_string())
}

pub fn format_short_time(timestamp: PrimitiveDateTime) -> String {
    timestamp
        .format(SHORT_TIME_FORMAT)
        .unwrap_or_else(|_| timestamp.time().to_string())
}

// Date strings copied out of Apple formatters use NBSP / narrow NBSP before
// the period marker.
fn normalize_spaces(text: &str) -> String {
    text.chars()
        .map(|ch| match ch {
            '\u{00a0}' | '\u{202f}' => ' ',
            other => other,
        })
        .collect()
}
