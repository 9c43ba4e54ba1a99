//! Built-in notes and the reader showcase document.

use super::RawNote;

const SAMPLE_NOTES: &[(&str, &str, &str, bool)] = &[
    ("Product sync recap", "May 9, 6:00 PM", "waveform", false),
    ("Grocery list for the weekend", "May 9, 1:20 PM", "cart", false),
    ("Interview with Dana: onboarding pain points", "May 8, 4:45 PM", "person.2", false),
    ("Morning voice memo", "May 10, 7:12 AM", "sunrise", false),
    ("Book notes: Thinking in Systems", "May 6, 9:30 PM", "book", false),
    ("Design review follow-ups", "May 10, 11:40 AM", "pencil.and.ruler", false),
    ("Podcast idea dump", "May 7, 8:05 AM", "mic", false),
    ("Trip planning: Lisbon", "May 3, 2:15 PM", "airplane", true),
    ("Quarterly goals draft", "May 8, 10:00 AM", "target", false),
    ("Half-remembered dream", "Someday, 3:00 AM", "moon", true),
];

pub fn sample_notes() -> Vec<RawNote> {
    SAMPLE_NOTES
        .iter()
        .map(|(title, date, icon, custom)| RawNote::new(title, date, icon, *custom))
        .collect()
}

/// Shown in the reader pane; touches every block type the parser knows.
pub const SHOWCASE_DOCUMENT: &str = r#"# Product sync recap

Quick summary of what we agreed on during the sync.

## Decisions

- Ship the recording sheet behind a flag
- Keep transcripts local for now
* Revisit sharing after beta

### Numbers

1. Activation is up week over week
2. Retention holds at day seven
10. Support tickets trending down

> Recording is the feature, everything else is chrome.

## Action items

- [x] Update project timeline
- [ ] Draft release notes
- [ ] Schedule user interviews

---

Run this before sharing a build:

`make preview`

```swift
let formatter = DateFormatter()
formatter.dateFormat = "MMM d, h:mm a"
# not a heading inside a fence
```

![Whiteboard from the sync](https://example.com/whiteboard.png)

[Link Text](https://example.com)
"#;
