use thiserror::Error;

#[derive(Error, Debug)]
pub enum FillableError {
    #[error("Failed to parse PDF: {0}")]
    InvalidDocument(#[source] lopdf::Error),

    #[error("Page {page} has an unusable {key}: {reason}")]
    MalformedPage {
        page: usize,
        key: &'static str,
        reason: String,
    },

    #[error("Font size must be a finite, non-negative number, got {0}")]
    InvalidFontSize(f64),

    #[error(
        "Field '{name}' targets page index {page_index} but the document has {page_count} pages"
    )]
    FieldOutOfRange {
        name: String,
        page_index: usize,
        page_count: usize,
    },

    #[error("Duplicate field name: {0}")]
    DuplicateFieldName(String),

    #[error("Invalid field '{name}': {reason}")]
    InvalidField { name: String, reason: String },

    #[error("PDF operation failed: {0}")]
    UnderlyingLibrary(#[from] lopdf::Error),

    #[error("Failed to serialize PDF: {0}")]
    Save(#[source] std::io::Error),
}

impl FillableError {
    pub(crate) fn invalid_field(name: &str, reason: impl Into<String>) -> Self {
        Self::InvalidField {
            name: name.to_string(),
            reason: reason.into(),
        }
    }
}
