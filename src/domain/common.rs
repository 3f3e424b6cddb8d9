use std::collections::BTreeSet;

/// Ordered tag set; ordering keeps hashing and display deterministic.
pub type Tags = BTreeSet<String>;

/// Provides access to a human-friendly entity name.
pub trait NamedEntity {
    fn name(&self) -> &str;
}

/// Supplies a presentation-ready label for UI or logs.
pub trait Displayable {
    fn display_label(&self) -> String;
}

/// Builds a [`Tags`] set from anything yielding string-like items.
pub fn tags<I, S>(items: I) -> Tags
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    items.into_iter().map(Into::into).collect()
}

pub(crate) fn format_tags(tags: &Tags) -> String {
    let joined: Vec<&str> = tags.iter().map(String::as_str).collect();
    format!("{{{}}}", joined.join(", "))
}

// Re-export common dependencies so consumers can rely on this module as a façade.
pub use chrono;
pub use serde;
