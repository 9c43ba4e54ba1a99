use crate::notes::DisplayItem;

/// A title search as typed by the user. Matching is a case-insensitive
/// substring test; the query is used verbatim, whitespace included.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchQuery {
    raw: String,
    folded: String,
}

impl SearchQuery {
    pub fn parse(input: &str) -> Self {
        Self {
            raw: input.to_string(),
            folded: input.to_lowercase(),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }

    pub fn is_empty(&self) -> bool {
        self.raw.is_empty()
    }

    pub fn matches(&self, title: &str) -> bool {
        self.is_empty() || title.to_lowercase().contains(&self.folded)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterOutcome {
    Items(Vec<DisplayItem>),
    /// A non-empty query matched no note title.
    NoResults,
}

impl FilterOutcome {
    pub fn items(&self) -> &[DisplayItem] {
        match self {
            FilterOutcome::Items(items) => items,
            FilterOutcome::NoResults => &[],
        }
    }

    pub fn is_no_results(&self) -> bool {
        matches!(self, FilterOutcome::NoResults)
    }
}

pub fn filter_display_items(all_items: &[DisplayItem], query: &str) -> FilterOutcome {
    filter_with_query(all_items, &SearchQuery::parse(query))
}

/// Expects `all_items` in the builder's descending order; each note is
/// attributed to the separator most recently seen before it.
pub fn filter_with_query(all_items: &[DisplayItem], query: &SearchQuery) -> FilterOutcome {
    if query.is_empty() {
        return FilterOutcome::Items(all_items.to_vec());
    }

    let mut filtered = Vec::new();
    let mut emitted_labels: Vec<&str> = Vec::new();
    let mut current_label: Option<&str> = None;
    let mut matched = 0usize;

    for item in all_items {
        match item {
            DisplayItem::Separator { label } => {
                current_label = Some(label.as_str());
            }
            DisplayItem::Note(note) => {
                if !query.matches(&note.title) {
                    continue;
                }
                if let Some(label) = current_label {
                    if !emitted_labels.contains(&label) {
                        emitted_labels.push(label);
                        filtered.push(DisplayItem::Separator {
                            label: label.to_string(),
                        });
                    }
                }
                filtered.push(item.clone());
                matched += 1;
            }
        }
    }

    tracing::trace!(query = query.as_str(), matched, "filtered note list");
    if matched == 0 {
        FilterOutcome::NoResults
    } else {
        FilterOutcome::Items(filtered)
    }
}
