//! Read form widgets back out of a PDF

use crate::acroform::partial_name;
use crate::error::FillableError;
use crate::page_geometry::{parse_box_array, resolve, PageGeometry};
use field_geometry::{pdf_pt_to_nxny, FieldType, NormalizedPoint, PointPt, Pt, SizePt};
use lopdf::{Dictionary, Document, Object};
use serde::Serialize;

/// Inherited field attributes are looked up at most this many levels up
const MAX_PARENT_DEPTH: usize = 16;

/// One widget annotation found on a page
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FormFieldInfo {
    /// Fully qualified field name
    pub name: String,
    /// `None` for field kinds this crate does not create (choice, radio, ...)
    pub field_type: Option<FieldType>,
    /// 0-based page index
    pub page_index: usize,
    /// [x0, y0, x1, y1] in user space
    pub rect: [f64; 4],
}

impl FormFieldInfo {
    /// Top-left anchor of the widget as displayed, in page fractions
    pub fn normalized_anchor(
        &self,
        geometry: &PageGeometry,
        normalize_rotation: bool,
    ) -> NormalizedPoint {
        let [x0, y0, x1, y1] = geometry.user_rect_to_displayed(self.rect, normalize_rotation);
        pdf_pt_to_nxny(
            PointPt {
                x_pt: Pt(x0),
                y_pt: Pt(y0),
            },
            geometry.effective_size(normalize_rotation),
            SizePt::new(x1 - x0, y1 - y0),
        )
    }
}

/// List every widget annotation in page order
pub fn list_form_fields(bytes: &[u8]) -> Result<Vec<FormFieldInfo>, FillableError> {
    let doc = Document::load_mem(bytes).map_err(FillableError::InvalidDocument)?;
    Ok(form_fields(&doc))
}

pub(crate) fn form_fields(doc: &Document) -> Vec<FormFieldInfo> {
    let mut fields = Vec::new();

    for (page_index, page_id) in doc.get_pages().into_values().enumerate() {
        let Ok(page) = doc.get_dictionary(page_id) else {
            continue;
        };
        let annots = page
            .get(b"Annots")
            .ok()
            .and_then(|obj| resolve(doc, obj).ok())
            .and_then(|obj| obj.as_array().ok());
        let Some(annots) = annots else {
            continue;
        };

        for annot in annots {
            let Some(widget) = resolve(doc, annot).ok().and_then(|obj| obj.as_dict().ok()) else {
                continue;
            };
            if !is_widget(widget) {
                continue;
            }
            let Some(rect) = widget
                .get(b"Rect")
                .ok()
                .and_then(|obj| resolve(doc, obj).ok())
                .and_then(|obj| obj.as_array().ok())
                .and_then(|array| parse_box_array(array).ok())
            else {
                continue;
            };

            fields.push(FormFieldInfo {
                name: qualified_name(doc, widget),
                field_type: field_type(doc, widget),
                page_index,
                rect: [
                    rect[0].min(rect[2]),
                    rect[1].min(rect[3]),
                    rect[0].max(rect[2]),
                    rect[1].max(rect[3]),
                ],
            });
        }
    }

    fields
}

fn is_widget(dict: &Dictionary) -> bool {
    matches!(dict.get(b"Subtype"), Ok(Object::Name(name)) if name == b"Widget")
}

/// Walk /Parent collecting partial names
fn qualified_name(doc: &Document, widget: &Dictionary) -> String {
    let mut parts = Vec::new();
    let mut current = Some(widget);

    for _ in 0..MAX_PARENT_DEPTH {
        let Some(dict) = current else {
            break;
        };
        if let Some(name) = partial_name(dict) {
            parts.push(name);
        }
        current = parent(doc, dict);
    }

    parts.reverse();
    parts.join(".")
}

fn parent<'a>(doc: &'a Document, dict: &'a Dictionary) -> Option<&'a Dictionary> {
    let parent_id = dict.get(b"Parent").ok()?.as_reference().ok()?;
    doc.get_dictionary(parent_id).ok()
}

/// Look up an inheritable field attribute on the widget or its ancestors
fn inherited<'a>(doc: &'a Document, widget: &'a Dictionary, key: &[u8]) -> Option<&'a Object> {
    let mut current = Some(widget);
    for _ in 0..MAX_PARENT_DEPTH {
        let dict = current?;
        if let Ok(value) = dict.get(key) {
            return Some(value);
        }
        current = parent(doc, dict);
    }
    None
}

fn field_type(doc: &Document, widget: &Dictionary) -> Option<FieldType> {
    let ft = match inherited(doc, widget, b"FT")? {
        Object::Name(name) => name.as_slice(),
        _ => return None,
    };

    match ft {
        b"Tx" if has_date_format(doc, widget) => Some(FieldType::Date),
        b"Tx" => Some(FieldType::Text),
        b"Sig" => Some(FieldType::Signature),
        b"Btn" => {
            // Radio (bit 16) and push buttons (bit 17) share /FT /Btn
            let flags = inherited(doc, widget, b"Ff")
                .and_then(|obj| obj.as_i64().ok())
                .unwrap_or(0);
            if flags & ((1 << 15) | (1 << 16)) == 0 {
                Some(FieldType::Checkbox)
            } else {
                None
            }
        }
        _ => None,
    }
}

/// Date fields are text fields whose format action calls AFDate_*
fn has_date_format(doc: &Document, widget: &Dictionary) -> bool {
    let script = inherited(doc, widget, b"AA")
        .and_then(|obj| resolve(doc, obj).ok())
        .and_then(|obj| obj.as_dict().ok())
        .and_then(|aa| aa.get(b"F").ok())
        .and_then(|obj| resolve(doc, obj).ok())
        .and_then(|obj| obj.as_dict().ok())
        .and_then(|action| action.get(b"JS").ok());

    match script {
        Some(Object::String(bytes, _)) => String::from_utf8_lossy(bytes).contains("AFDate_"),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lopdf::dictionary;

    #[test]
    fn test_radio_button_is_not_a_checkbox() {
        let mut doc = Document::with_version("1.7");
        let id = doc.add_object(dictionary! {
            "Subtype" => "Widget",
            "FT" => "Btn",
            "Ff" => 1 << 15,
        });
        let widget = doc.get_dictionary(id).unwrap();
        assert_eq!(field_type(&doc, widget), None);
    }

    #[test]
    fn test_kid_widget_inherits_type_and_name() {
        let mut doc = Document::with_version("1.7");
        let parent_id = doc.add_object(dictionary! {
            "T" => Object::string_literal("agree"),
            "FT" => "Btn",
        });
        let kid_id = doc.add_object(dictionary! {
            "Subtype" => "Widget",
            "Parent" => Object::Reference(parent_id),
        });
        let widget = doc.get_dictionary(kid_id).unwrap();
        assert_eq!(field_type(&doc, widget), Some(FieldType::Checkbox));
        assert_eq!(qualified_name(&doc, widget), "agree");
    }

    #[test]
    fn test_normalized_anchor_unrotated() {
        let geometry = PageGeometry {
            page_index: 0,
            media_box: [0.0, 0.0, 612.0, 792.0],
            rotation: 0,
        };
        let info = FormFieldInfo {
            name: "x".into(),
            field_type: Some(FieldType::Checkbox),
            page_index: 0,
            rect: [61.2, 692.8, 81.2, 712.8],
        };
        let anchor = info.normalized_anchor(&geometry, true);
        assert!((anchor.nx - 0.1).abs() < 1e-9);
        assert!((anchor.ny - 0.1).abs() < 1e-9);
    }
}
