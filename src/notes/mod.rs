use std::fmt;

use serde::{Deserialize, Serialize, Serializer};
use time::macros::format_description;
use time::{Date, PrimitiveDateTime};
use uuid::Uuid;

use crate::error::RejectedNote;

mod dates;
pub mod sample;

pub use dates::{format_day_label, format_short_time, NoteCalendar};

/// A note as it arrives from fixture data, before its date is understood.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawNote {
    pub title: String,
    #[serde(alias = "date")]
    pub date_text: String,
    #[serde(default)]
    pub icon_ref: String,
    #[serde(default)]
    pub is_custom_icon: bool,
}

impl RawNote {
    pub fn new(title: &str, date_text: &str, icon_ref: &str, is_custom_icon: bool) -> Self {
        Self {
            title: title.to_string(),
            date_text: date_text.to_string(),
            icon_ref: icon_ref.to_string(),
            is_custom_icon,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct NoteId(Uuid);

impl NoteId {
    fn generate() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for NoteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Note {
    pub id: NoteId,
    pub title: String,
    #[serde(serialize_with = "serialize_timestamp")]
    pub timestamp: PrimitiveDateTime,
    pub icon_ref: String,
    pub is_custom_icon: bool,
    pub display_time: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum DisplayItem {
    Note(Note),
    Separator { label: String },
}

impl DisplayItem {
    pub fn as_note(&self) -> Option<&Note> {
        match self {
            DisplayItem::Note(note) => Some(note),
            DisplayItem::Separator { .. } => None,
        }
    }

    pub fn is_separator(&self) -> bool {
        matches!(self, DisplayItem::Separator { .. })
    }
}

/// Result of a list build: the display sequence plus every record that had
/// to be dropped on the way.
#[derive(Debug, Clone, Default)]
pub struct NoteList {
    pub items: Vec<DisplayItem>,
    pub rejected: Vec<RejectedNote>,
}

impl NoteList {
    pub fn note_count(&self) -> usize {
        self.items.iter().filter(|item| !item.is_separator()).count()
    }
}

pub struct NoteListBuilder {
    calendar: NoteCalendar,
}

impl NoteListBuilder {
    pub fn new(calendar: NoteCalendar) -> Self {
        Self { calendar }
    }

    pub fn build(&self, raw_notes: &[RawNote]) -> NoteList {
        let mut rejected = Vec::new();
        let mut parsed: Vec<(PrimitiveDateTime, &RawNote)> = Vec::with_capacity(raw_notes.len());
        for raw in raw_notes {
            match self.calendar.parse_note_date(&raw.date_text) {
                Ok(timestamp) => parsed.push((timestamp, raw)),
                Err(error) => {
                    tracing::warn!(
                        title = %raw.title,
                        date_text = %raw.date_text,
                        %error,
                        "dropping note with unparseable date"
                    );
                    rejected.push(RejectedNote {
                        title: raw.title.clone(),
                        date_text: raw.date_text.clone(),
                        error,
                    });
                }
            }
        }

        // sort_by is stable: equal timestamps keep their input order.
        parsed.sort_by(|(a, _), (b, _)| b.cmp(a));

        let mut items = Vec::with_capacity(parsed.len() * 2);
        let mut last_day: Option<Date> = None;
        for (timestamp, raw) in parsed {
            let day = timestamp.date();
            if last_day != Some(day) {
                items.push(DisplayItem::Separator {
                    label: self.calendar.separator_label(day),
                });
                last_day = Some(day);
            }
            items.push(DisplayItem::Note(Note {
                id: NoteId::generate(),
                title: raw.title.clone(),
                timestamp,
                icon_ref: raw.icon_ref.clone(),
                is_custom_icon: raw.is_custom_icon,
                display_time: format_short_time(timestamp),
            }));
        }

        tracing::debug!(
            notes = items.len() - count_separators(&items),
            rejected = rejected.len(),
            "built note list"
        );
        NoteList { items, rejected }
    }
}

pub fn build_display_items(raw_notes: &[RawNote], calendar: &NoteCalendar) -> Vec<DisplayItem> {
    NoteListBuilder::new(*calendar).build(raw_notes).items
}

fn count_separators(items: &[DisplayItem]) -> usize {
    items.iter().filter(|item| item.is_separator()).count()
}

fn serialize_timestamp<S>(timestamp: &PrimitiveDateTime, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    let formatted = timestamp
        .format(format_description!(
            "[year]-[month]-[day]T[hour]:[minute]:[second]"
        ))
        .map_err(serde::ser::Error::custom)?;
    serializer.serialize_str(&formatted)
}
