//! Geometry for placing fillable fields on PDF pages
//!
//! Three coordinate spaces meet here:
//! - CSS pixels of the rendered page preview (top-left origin)
//! - normalized page fractions `(nx, ny)` in `[0, 1]` (top-left origin)
//! - PDF points, 1/72 inch (bottom-left origin, y up)
//!
//! Pixels and points are distinct newtypes so that mixing them up fails to
//! compile. The page-range parser used by the page pickers also lives here.

pub mod coords;
pub mod field_type;
pub mod page_ranges;
pub mod units;

pub use coords::{
    clamp_nxny_to_bounds, css_px_to_pdf_pt_size, dom_point_to_nxny, nxny_to_css_px,
    nxny_to_pdf_pt, pdf_pt_size_to_css_px, pdf_pt_to_nxny, ClampedPoint, NormalizedPoint,
    OffsetPx, PageRectCss,
};
pub use field_type::{get_default_field_size, FieldType, ParseFieldTypeError};
pub use page_ranges::{format_page_range, parse_page_range};
pub use units::{PageSizePt, PointPt, Pt, Px, SizePt, SizePx};
