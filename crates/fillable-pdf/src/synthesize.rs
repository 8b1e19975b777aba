//! Add interactive form fields to an existing PDF

use crate::acroform::{existing_field_names, prepare_acroform, push_reference};
use crate::error::FillableError;
use crate::field::{FillOptions, FillableFieldDefinition, PositionUnits};
use crate::page_geometry::PageGeometry;
use crate::widgets::{add_widget, WidgetSpec};
use field_geometry::{clamp_nxny_to_bounds, nxny_to_pdf_pt};
use lopdf::{Document, ObjectId};
use std::collections::{HashMap, HashSet};
use tracing::{debug, info, instrument, warn};

/// Produce a copy of `input` with one form widget per field definition.
///
/// Options are checked first, then each field in input order: page index,
/// name, uniqueness (against each other and the document's existing fields),
/// then geometry. Nothing is written unless everything passes. `input` is only
/// borrowed; the result is a freshly serialized buffer.
#[instrument(skip_all, fields(input_len = input.len(), fields = fields.len()))]
pub fn create_fillable_pdf(
    input: &[u8],
    fields: &[FillableFieldDefinition],
    options: &FillOptions,
) -> Result<Vec<u8>, FillableError> {
    let mut doc = Document::load_mem(input).map_err(FillableError::InvalidDocument)?;

    let pages: Vec<ObjectId> = doc.get_pages().into_values().collect();
    validate_options(options)?;
    validate_fields(&doc, fields, pages.len())?;

    if fields.is_empty() {
        // No changes, return original
        return Ok(input.to_vec());
    }

    let mut geometries: HashMap<usize, PageGeometry> = HashMap::new();
    let mut placements = Vec::with_capacity(fields.len());
    for field in fields {
        let page_id = pages[field.page_index];
        let geometry = match geometries.get(&field.page_index) {
            Some(geometry) => *geometry,
            None => {
                let geometry = PageGeometry::from_page(&doc, field.page_index, page_id)?;
                geometries.insert(field.page_index, geometry);
                geometry
            }
        };
        let rect = resolve_rect(field, &geometry, options);
        placements.push((field, page_id, geometry, rect));
    }

    let form_id = prepare_acroform(&mut doc, options.need_appearances)?;

    for (field, page_id, geometry, rect) in placements {
        let spec = WidgetSpec {
            field_type: field.field_type,
            name: &field.name,
            label: field.label.as_deref(),
            rect,
            page_id,
            rotation: geometry.frame_rotation(options.normalize_page_rotation),
            font_size: options.font_size,
        };
        let widget_id = add_widget(&mut doc, &spec);
        push_reference(&mut doc, page_id, b"Annots", widget_id)?;
        push_reference(&mut doc, form_id, b"Fields", widget_id)?;

        debug!(
            name = %field.name,
            field_type = %field.field_type,
            page_index = field.page_index,
            ?rect,
            "Placed form field"
        );
    }

    let mut output = Vec::new();
    doc.save_to(&mut output).map_err(FillableError::Save)?;

    info!(
        fields = fields.len(),
        output_len = output.len(),
        "Created fillable PDF"
    );
    Ok(output)
}

/// Zero is allowed: viewers treat `0 Tf` as auto-size
fn validate_options(options: &FillOptions) -> Result<(), FillableError> {
    if !options.font_size.is_finite() || options.font_size < 0.0 {
        return Err(FillableError::InvalidFontSize(options.font_size));
    }
    Ok(())
}

fn validate_fields(
    doc: &Document,
    fields: &[FillableFieldDefinition],
    page_count: usize,
) -> Result<(), FillableError> {
    let taken = existing_field_names(doc);
    let mut seen = HashSet::new();

    for field in fields {
        if field.page_index >= page_count {
            return Err(FillableError::FieldOutOfRange {
                name: field.name.clone(),
                page_index: field.page_index,
                page_count,
            });
        }

        if field.name.trim().is_empty() {
            return Err(FillableError::invalid_field(&field.name, "name is empty"));
        }
        if field.name.contains('.') {
            // '.' separates hierarchy levels in fully qualified field names
            return Err(FillableError::invalid_field(&field.name, "name contains '.'"));
        }
        if !seen.insert(field.name.as_str()) || taken.contains(&field.name) {
            return Err(FillableError::DuplicateFieldName(field.name.clone()));
        }

        let size = field.size();
        if !field.x.is_finite() || !field.y.is_finite() {
            return Err(FillableError::invalid_field(
                &field.name,
                "position is not a finite number",
            ));
        }
        if !(size.width_pt.get() > 0.0 && size.height_pt.get() > 0.0)
            || !size.width_pt.is_finite()
            || !size.height_pt.is_finite()
        {
            return Err(FillableError::invalid_field(
                &field.name,
                format!(
                    "size must be positive, got {} x {}",
                    size.width_pt.get(),
                    size.height_pt.get()
                ),
            ));
        }
    }

    Ok(())
}

/// Widget rect `[x0, y0, x1, y1]` in user space
fn resolve_rect(
    field: &FillableFieldDefinition,
    geometry: &PageGeometry,
    options: &FillOptions,
) -> [f64; 4] {
    let size = field.size();
    let (width, height) = (size.width_pt.get(), size.height_pt.get());

    match field.units {
        PositionUnits::Points => [field.x, field.y, field.x + width, field.y + height],
        PositionUnits::Normalized => {
            let page_size = geometry.effective_size(options.normalize_page_rotation);

            let clamped = clamp_nxny_to_bounds(field.anchor(), page_size, size);
            let page_num = field.page_index + 1;
            if !clamped.fits() {
                warn!(name = %field.name, "Field is larger than page {}", page_num);
            } else if clamped.point() != field.anchor() {
                warn!(name = %field.name, "Field extends past the edge of page {}", page_num);
            }

            let corner = nxny_to_pdf_pt(field.anchor(), page_size, size);
            let (x, y) = (corner.x_pt.get(), corner.y_pt.get());
            geometry.displayed_rect_to_user(
                [x, y, x + width, y + height],
                options.normalize_page_rotation,
            )
        }
    }
}
