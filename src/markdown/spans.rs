//! Decoders for block contents that keep their markdown syntax until render
//! time. None of them fail: malformed input degrades to empty values.

use super::{TASK_CHECKED, TASK_UNCHECKED};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImageRef {
    pub caption: Option<String>,
    pub url: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LinkRef {
    pub text: String,
    pub url: String,
}

impl LinkRef {
    pub fn is_empty(&self) -> bool {
        self.text.is_empty() && self.url.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskItem {
    pub checked: bool,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NumberedItem {
    pub number: u64,
    pub text: String,
}

/// `![caption](url)`
pub fn parse_image(content: &str) -> ImageRef {
    let Some(start) = content.find("![") else {
        return ImageRef::default();
    };
    let after_bang = &content[start + 2..];
    let Some(close) = after_bang.find(']') else {
        return ImageRef::default();
    };
    let caption = &after_bang[..close];
    let url = after_bang[close + 1..]
        .strip_prefix('(')
        .and_then(|rest| rest.find(')').map(|end| &rest[..end]))
        .unwrap_or_default();
    ImageRef {
        caption: (!caption.is_empty()).then(|| caption.to_string()),
        url: url.to_string(),
    }
}

/// `[text](url)`, where `(` must directly follow `]`.
pub fn parse_link(content: &str) -> LinkRef {
    let Some(open) = content.find('[') else {
        return LinkRef::default();
    };
    let Some(close) = content[open..].find(']').map(|idx| open + idx) else {
        return LinkRef::default();
    };
    let paren_open = close + 1;
    if content.as_bytes().get(paren_open) != Some(&b'(') {
        return LinkRef::default();
    }
    let Some(paren_close) = content[paren_open..].find(')').map(|idx| paren_open + idx) else {
        return LinkRef::default();
    };
    LinkRef {
        text: content[open + 1..close].to_string(),
        url: content[paren_open + 1..paren_close].to_string(),
    }
}

pub fn parse_task(content: &str) -> TaskItem {
    if let Some(text) = content.strip_prefix(TASK_CHECKED) {
        return TaskItem {
            checked: true,
            text: text.to_string(),
        };
    }
    let text = content.strip_prefix(TASK_UNCHECKED).unwrap_or(content);
    TaskItem {
        checked: false,
        text: text.to_string(),
    }
}

/// Returns `None` when the part before the first `". "` is not an integer;
/// callers then show the whole line as text.
pub fn parse_numbered(content: &str) -> Option<NumberedItem> {
    let (number, text) = content.split_once(". ")?;
    let number = number.trim().parse::<u64>().ok()?;
    Some(NumberedItem {
        number,
        text: text.to_string(),
    })
}
