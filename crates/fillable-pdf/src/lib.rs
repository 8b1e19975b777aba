//! Fillable PDF forms
//!
//! Adds interactive form fields (text, checkbox, date, signature placeholder)
//! to an existing PDF using lopdf, and reads them back for verification.

mod acroform;
pub mod error;
pub mod field;
pub mod inspect;
pub mod page_geometry;
pub mod synthesize;
mod widgets;

pub use error::FillableError;
pub use field::{FillOptions, FillableFieldDefinition, PositionUnits};
pub use inspect::{list_form_fields, FormFieldInfo};
pub use page_geometry::PageGeometry;
pub use synthesize::create_fillable_pdf;
pub use widgets::DATE_FORMAT;

/// Parse PDF bytes and return page count
pub fn page_count(bytes: &[u8]) -> Result<usize, FillableError> {
    let doc = lopdf::Document::load_mem(bytes).map_err(FillableError::InvalidDocument)?;
    Ok(doc.get_pages().len())
}

/// Media box and rotation of every page
pub fn page_geometry(bytes: &[u8]) -> Result<Vec<PageGeometry>, FillableError> {
    let doc = lopdf::Document::load_mem(bytes).map_err(FillableError::InvalidDocument)?;
    PageGeometry::all_from_document(&doc)
}
