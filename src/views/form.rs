use thiserror::Error;

use super::notify::Notifier;

/// Client-side validation failures. `title()` is the toast title, `Display` the description.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FormError {
    #[error("Please fill in all required fields")]
    MissingFields,

    #[error("Please add at least one tag")]
    MissingTags,

    #[error("Please upload a featured image")]
    MissingImage,

    #[error("Please provide both demo and repository URLs")]
    MissingUrls,

    #[error("Please add at least one feature")]
    MissingFeatures,

    #[error("Please provide both URL and caption for the media")]
    IncompleteMedia,

    #[error("You must have at least one version")]
    LastVersion,

    #[error("Please enter your name and comment")]
    IncompleteComment,
}

impl FormError {
    pub fn title(&self) -> &'static str {
        match self {
            FormError::MissingFields => "Missing Fields",
            FormError::MissingTags => "Missing Tags",
            FormError::MissingImage => "Missing Image",
            FormError::MissingUrls => "Missing URLs",
            FormError::MissingFeatures => "Missing Features",
            FormError::IncompleteMedia
            | FormError::LastVersion
            | FormError::IncompleteComment => "Error",
        }
    }

    pub fn notify(&self, notifier: &mut Notifier) {
        notifier.error(self.title(), self.to_string());
    }
}

/// Set-like add: trims, ignores blank input and values already present.
/// Returns whether the value was appended.
pub fn add_unique(values: &mut Vec<String>, input: &str) -> bool {
    let value = input.trim();
    if value.is_empty() || values.iter().any(|v| v == value) {
        return false;
    }
    values.push(value.to_string());
    true
}

/// Removes every occurrence of `value`. Absent values are a no-op.
pub fn remove_value(values: &mut Vec<String>, value: &str) {
    values.retain(|v| v != value);
}

/// Append-only add: trims and ignores blank input, duplicates allowed.
pub fn append(values: &mut Vec<String>, input: &str) -> bool {
    let value = input.trim();
    if value.is_empty() {
        return false;
    }
    values.push(value.to_string());
    true
}

/// Removes by position; out-of-range indices are a no-op.
pub fn remove_at<T>(values: &mut Vec<T>, index: usize) -> Option<T> {
    if index < values.len() {
        Some(values.remove(index))
    } else {
        None
    }
}

pub(crate) fn blank(value: &str) -> bool {
    value.trim().is_empty()
}
