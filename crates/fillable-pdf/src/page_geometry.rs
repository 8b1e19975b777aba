//! Page-level geometry: media box, rotation and the mapping between the
//! displayed (rotated) frame and unrotated user space.

use crate::error::FillableError;
use field_geometry::PageSizePt;
use lopdf::{Dictionary, Document, Object, ObjectId};
use serde::Serialize;

/// Page tree inheritance is bounded to guard against cyclic /Parent links
const MAX_INHERITANCE_DEPTH: usize = 32;

/// Geometry of a single PDF page
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PageGeometry {
    /// 0-based page index
    pub page_index: usize,
    /// [x1, y1, x2, y2] in user space
    pub media_box: [f64; 4],
    /// Page rotation in degrees (0, 90, 180, 270)
    pub rotation: i32,
}

impl PageGeometry {
    /// Read geometry for a page object, inheriting from the page tree
    pub fn from_page(
        doc: &Document,
        page_index: usize,
        page_id: ObjectId,
    ) -> Result<Self, FillableError> {
        let page_dict = doc.get_dictionary(page_id)?;

        let media_box = match inherited_attribute(doc, page_dict, b"MediaBox") {
            Some(obj) => {
                let array = resolve(doc, obj)?.as_array()?;
                parse_box_array(array).map_err(|reason| FillableError::MalformedPage {
                    page: page_index + 1,
                    key: "MediaBox",
                    reason,
                })?
            }
            // Default to US Letter size
            None => [0.0, 0.0, 612.0, 792.0],
        };

        let rotation = inherited_attribute(doc, page_dict, b"Rotate")
            .and_then(|obj| resolve(doc, obj).ok())
            .and_then(|obj| obj.as_i64().ok())
            .map(normalize_rotation)
            .unwrap_or(0);

        Ok(Self {
            page_index,
            media_box,
            rotation,
        })
    }

    /// Geometry of every page, in page order
    pub fn all_from_document(doc: &Document) -> Result<Vec<Self>, FillableError> {
        doc.get_pages()
            .into_values()
            .enumerate()
            .map(|(index, page_id)| Self::from_page(doc, index, page_id))
            .collect()
    }

    /// Unrotated page size
    pub fn size(&self) -> PageSizePt {
        let [x1, y1, x2, y2] = self.media_box;
        PageSizePt::new((x2 - x1).abs(), (y2 - y1).abs())
    }

    /// Rotation applied when mapping between frames
    pub fn frame_rotation(&self, normalize_rotation: bool) -> i32 {
        if normalize_rotation {
            self.rotation
        } else {
            0
        }
    }

    /// Page size as displayed: width and height swap for 90/270 when rotation
    /// is normalized
    pub fn effective_size(&self, normalize_rotation: bool) -> PageSizePt {
        match self.frame_rotation(normalize_rotation) {
            90 | 270 => self.size().swapped(),
            _ => self.size(),
        }
    }

    /// Map a rect `[x0, y0, x1, y1]` from the displayed frame (bottom-left
    /// origin at 0,0, y up) into absolute user space.
    pub fn displayed_rect_to_user(&self, rect: [f64; 4], normalize_rotation: bool) -> [f64; 4] {
        let rotation = self.frame_rotation(normalize_rotation);
        let (ax, ay) = self.displayed_to_user(rotation, rect[0], rect[1]);
        let (bx, by) = self.displayed_to_user(rotation, rect[2], rect[3]);
        let [ox, oy, _, _] = self.origin_box();
        [
            ox + ax.min(bx),
            oy + ay.min(by),
            ox + ax.max(bx),
            oy + ay.max(by),
        ]
    }

    /// Inverse of [`PageGeometry::displayed_rect_to_user`]
    pub fn user_rect_to_displayed(&self, rect: [f64; 4], normalize_rotation: bool) -> [f64; 4] {
        let rotation = self.frame_rotation(normalize_rotation);
        let [ox, oy, _, _] = self.origin_box();
        let (ax, ay) = self.user_to_displayed(rotation, rect[0] - ox, rect[1] - oy);
        let (bx, by) = self.user_to_displayed(rotation, rect[2] - ox, rect[3] - oy);
        [ax.min(bx), ay.min(by), ax.max(bx), ay.max(by)]
    }

    // Lower-left corner of the media box, whichever order the corners were stored in
    fn origin_box(&self) -> [f64; 4] {
        let [x1, y1, x2, y2] = self.media_box;
        [x1.min(x2), y1.min(y2), x1.max(x2), y1.max(y2)]
    }

    // `/Rotate` turns the page clockwise for display
    fn displayed_to_user(&self, rotation: i32, x: f64, y: f64) -> (f64, f64) {
        let size = self.size();
        let (w, h) = (size.width_pt.get(), size.height_pt.get());
        match rotation {
            90 => (w - y, x),
            180 => (w - x, h - y),
            270 => (y, h - x),
            _ => (x, y),
        }
    }

    fn user_to_displayed(&self, rotation: i32, x: f64, y: f64) -> (f64, f64) {
        let size = self.size();
        let (w, h) = (size.width_pt.get(), size.height_pt.get());
        match rotation {
            90 => (y, w - x),
            180 => (w - x, h - y),
            270 => (h - y, x),
            _ => (x, y),
        }
    }
}

/// Look up a page attribute, walking up /Parent for inheritable keys
fn inherited_attribute<'a>(
    doc: &'a Document,
    page_dict: &'a Dictionary,
    key: &[u8],
) -> Option<&'a Object> {
    let mut current = page_dict;
    for _ in 0..MAX_INHERITANCE_DEPTH {
        if let Ok(value) = current.get(key) {
            return Some(value);
        }
        let parent_id = current.get(b"Parent").ok()?.as_reference().ok()?;
        current = doc.get_dictionary(parent_id).ok()?;
    }
    None
}

/// Follow an indirect reference, if any
pub(crate) fn resolve<'a>(doc: &'a Document, obj: &'a Object) -> Result<&'a Object, FillableError> {
    match obj {
        Object::Reference(id) => Ok(doc.get_object(*id)?),
        other => Ok(other),
    }
}

/// Parse a box array [x1, y1, x2, y2]
pub(crate) fn parse_box_array(array: &[Object]) -> Result<[f64; 4], String> {
    if array.len() != 4 {
        return Err("box must have 4 elements".to_string());
    }

    let mut result = [0.0; 4];
    for (i, obj) in array.iter().enumerate() {
        result[i] = match obj {
            Object::Integer(n) => *n as f64,
            Object::Real(n) => *n as f64,
            _ => return Err(format!("box element {} is not a number", i)),
        };
    }

    Ok(result)
}

/// Normalize rotation to 0, 90, 180, or 270
fn normalize_rotation(angle: i64) -> i32 {
    let normalized = (angle.rem_euclid(360) / 90) * 90;
    normalized as i32
}

#[cfg(test)]
mod tests {
    use super::*;
    use lopdf::dictionary;

    fn geometry(rotation: i32) -> PageGeometry {
        PageGeometry {
            page_index: 0,
            media_box: [0.0, 0.0, 612.0, 792.0],
            rotation,
        }
    }

    #[test]
    fn test_normalize_rotation() {
        assert_eq!(normalize_rotation(0), 0);
        assert_eq!(normalize_rotation(90), 90);
        assert_eq!(normalize_rotation(270), 270);
        assert_eq!(normalize_rotation(360), 0);
        assert_eq!(normalize_rotation(450), 90);
        assert_eq!(normalize_rotation(-90), 270);
    }

    #[test]
    fn test_parse_box_array() {
        let array = vec![
            Object::Integer(0),
            Object::Integer(0),
            Object::Real(612.0),
            Object::Real(792.0),
        ];
        assert_eq!(parse_box_array(&array).unwrap(), [0.0, 0.0, 612.0, 792.0]);
        assert!(parse_box_array(&array[..3]).is_err());
    }

    #[test]
    fn test_short_media_box_is_malformed_page() {
        let mut doc = Document::with_version("1.7");
        let page_id = doc.add_object(lopdf::dictionary! {
            "Type" => "Page",
            "MediaBox" => vec![0.into(), 0.into(), 612.into()],
        });
        match PageGeometry::from_page(&doc, 2, page_id) {
            Err(FillableError::MalformedPage { page, key, .. }) => {
                assert_eq!(page, 3);
                assert_eq!(key, "MediaBox");
            }
            other => panic!("expected MalformedPage, got {:?}", other),
        }
    }

    #[test]
    fn test_effective_size_swaps_for_quarter_turns() {
        assert_eq!(geometry(90).effective_size(true), PageSizePt::new(792.0, 612.0));
        assert_eq!(geometry(180).effective_size(true), PageSizePt::new(612.0, 792.0));
        assert_eq!(geometry(90).effective_size(false), PageSizePt::new(612.0, 792.0));
    }

    #[test]
    fn test_displayed_top_left_on_rotated_page() {
        // Displayed top-left 10x10 box on a page shown rotated 90 degrees clockwise
        // (displayed size 792 x 612) sits at the user-space bottom-left.
        let g = geometry(90);
        let rect = g.displayed_rect_to_user([0.0, 602.0, 10.0, 612.0], true);
        assert_eq!(rect, [0.0, 0.0, 10.0, 10.0]);
    }

    #[test]
    fn test_media_box_offset_applied() {
        let g = PageGeometry {
            page_index: 0,
            media_box: [50.0, 100.0, 662.0, 892.0],
            rotation: 0,
        };
        assert_eq!(
            g.displayed_rect_to_user([0.0, 0.0, 20.0, 20.0], true),
            [50.0, 100.0, 70.0, 120.0]
        );
    }
}
