//! Coordinate transformation between the rendered page, normalized page
//! fractions and PDF points

use crate::units::{PageSizePt, PointPt, Pt, Px, SizePt, SizePx};
use serde::{Deserialize, Serialize};

/// On-screen bounding box of a rendered page, in CSS pixels
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PageRectCss {
    pub left: Px,
    pub top: Px,
    pub width: Px,
    pub height: Px,
}

impl PageRectCss {
    pub fn new(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self {
            left: Px(left),
            top: Px(top),
            width: Px(width),
            height: Px(height),
        }
    }
}

/// Top-left anchor as a fraction of page width/height (screen convention)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NormalizedPoint {
    pub nx: f64,
    pub ny: f64,
}

impl NormalizedPoint {
    pub fn new(nx: f64, ny: f64) -> Self {
        Self { nx, ny }
    }
}

/// Pixel offset relative to the page's top-left corner
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OffsetPx {
    pub left_px: Px,
    pub top_px: Px,
}

/// Result of [`clamp_nxny_to_bounds`]
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClampedPoint {
    pub nx: f64,
    pub ny: f64,
    pub max_nx: f64,
    pub max_ny: f64,
}

impl ClampedPoint {
    /// False when the field is larger than the page in either dimension
    pub fn fits(&self) -> bool {
        self.max_nx >= 0.0 && self.max_ny >= 0.0
    }

    pub fn point(&self) -> NormalizedPoint {
        NormalizedPoint::new(self.nx, self.ny)
    }
}

/// Project an absolute screen point into page-fractional space.
///
/// No clamping: callers clamp with [`clamp_nxny_to_bounds`] when placing.
pub fn dom_point_to_nxny(client_x: Px, client_y: Px, page_rect: &PageRectCss) -> NormalizedPoint {
    NormalizedPoint {
        nx: (client_x - page_rect.left) / page_rect.width,
        ny: (client_y - page_rect.top) / page_rect.height,
    }
}

/// Scale a point-space size into the currently rendered pixel space.
///
/// Width and height use their own zoom ratio; the rendered page is not
/// assumed to keep the exact aspect ratio of the PDF page.
pub fn pdf_pt_size_to_css_px(
    size: SizePt,
    page_rect: &PageRectCss,
    page_size: PageSizePt,
) -> SizePx {
    let scale_x = page_rect.width.get() / page_size.width_pt.get();
    let scale_y = page_rect.height.get() / page_size.height_pt.get();
    SizePx {
        width_px: Px(size.width_pt.get() * scale_x),
        height_px: Px(size.height_pt.get() * scale_y),
    }
}

/// Inverse of [`pdf_pt_size_to_css_px`]
pub fn css_px_to_pdf_pt_size(
    size: SizePx,
    page_rect: &PageRectCss,
    page_size: PageSizePt,
) -> SizePt {
    let scale_x = page_size.width_pt.get() / page_rect.width.get();
    let scale_y = page_size.height_pt.get() / page_rect.height.get();
    SizePt {
        width_pt: Pt(size.width_px.get() * scale_x),
        height_pt: Pt(size.height_px.get() * scale_y),
    }
}

/// Page-relative pixel offset of a normalized point.
///
/// Add `page_rect.left/top` for an absolute screen position.
pub fn nxny_to_css_px(point: NormalizedPoint, page_rect: &PageRectCss) -> OffsetPx {
    OffsetPx {
        left_px: page_rect.width * point.nx,
        top_px: page_rect.height * point.ny,
    }
}

/// Convert a normalized top-left anchor into the PDF lower-left corner of a
/// field box.
///
/// `ny` grows downward while PDF y grows upward, so y is flipped and then the
/// field height is subtracted to land on the box's bottom edge.
pub fn nxny_to_pdf_pt(
    point: NormalizedPoint,
    page_size: PageSizePt,
    field_size: SizePt,
) -> PointPt {
    let x_pt = page_size.width_pt * point.nx;
    let y_pt = page_size.height_pt - page_size.height_pt * point.ny - field_size.height_pt;
    PointPt { x_pt, y_pt }
}

/// Inverse of [`nxny_to_pdf_pt`]: recover the top-left normalized anchor from
/// the lower-left corner of a field box.
pub fn pdf_pt_to_nxny(
    point: PointPt,
    page_size: PageSizePt,
    field_size: SizePt,
) -> NormalizedPoint {
    let top_pt = point.y_pt + field_size.height_pt;
    NormalizedPoint {
        nx: point.x_pt / page_size.width_pt,
        ny: (page_size.height_pt - top_pt) / page_size.height_pt,
    }
}

/// Clamp a normalized anchor so the whole field stays on the page.
///
/// When the field is wider or taller than the page the corresponding max goes
/// negative and the coordinate collapses to that max. No error is raised;
/// callers check [`ClampedPoint::fits`].
pub fn clamp_nxny_to_bounds(
    point: NormalizedPoint,
    page_size: PageSizePt,
    field_size: SizePt,
) -> ClampedPoint {
    let max_nx = 1.0 - field_size.width_pt / page_size.width_pt;
    let max_ny = 1.0 - field_size.height_pt / page_size.height_pt;
    ClampedPoint {
        nx: clamp_unit(point.nx, max_nx),
        ny: clamp_unit(point.ny, max_ny),
        max_nx,
        max_ny,
    }
}

// f64::clamp panics when min > max, which happens for oversized fields
fn clamp_unit(value: f64, max: f64) -> f64 {
    value.max(0.0).min(max)
}
