//! Subcommand bodies, kept free of file and terminal I/O

use anyhow::Context;
use field_geometry::{format_page_range, parse_page_range, NormalizedPoint};
use fillable_pdf::{
    create_fillable_pdf, list_form_fields, page_geometry, FillOptions, FillableFieldDefinition,
    FormFieldInfo,
};
use image_qa::{compare_images, ImageComparison};
use serde::Serialize;

/// Parse a JSON array of field definitions and add them to `pdf`
pub fn fill(pdf: &[u8], fields_json: &str, options: &FillOptions) -> anyhow::Result<Vec<u8>> {
    let fields: Vec<FillableFieldDefinition> =
        serde_json::from_str(fields_json).context("Failed to parse field definitions")?;
    let output = create_fillable_pdf(pdf, &fields, options)?;
    Ok(output)
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageSelection {
    /// 0-based page indices
    pub indices: Vec<usize>,
    /// 1-based compact form, e.g. "1-3, 5"
    pub pages: String,
}

pub fn select_pages(range: &str, max_pages: usize) -> PageSelection {
    let indices = parse_page_range(range, max_pages);
    let pages = format_page_range(&indices);
    PageSelection { indices, pages }
}

/// A widget plus where it sits on the displayed page
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldReport {
    #[serde(flatten)]
    pub field: FormFieldInfo,
    pub anchor: NormalizedPoint,
}

pub fn describe_fields(pdf: &[u8], options: &FillOptions) -> anyhow::Result<Vec<FieldReport>> {
    let geometry = page_geometry(pdf)?;
    let fields = list_form_fields(pdf)?;

    let mut reports = Vec::with_capacity(fields.len());
    for field in fields {
        let page = geometry
            .get(field.page_index)
            .with_context(|| format!("No geometry for page {}", field.page_index + 1))?;
        let anchor = field.normalized_anchor(page, options.normalize_page_rotation);
        reports.push(FieldReport { field, anchor });
    }
    Ok(reports)
}

pub fn compare(left: &[u8], right: &[u8]) -> anyhow::Result<ImageComparison> {
    Ok(compare_images(left, right)?)
}
