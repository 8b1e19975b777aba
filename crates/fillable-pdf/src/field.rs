//! Field definitions handed to the synthesizer

use field_geometry::{get_default_field_size, FieldType, NormalizedPoint, Pt, SizePt};
use serde::{Deserialize, Serialize};

/// How `x`/`y` of a [`FillableFieldDefinition`] are interpreted
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PositionUnits {
    /// `x`/`y` are `nx`/`ny`: top-left anchor as page fractions, y down
    #[default]
    Normalized,
    /// `x`/`y` are the lower-left corner in the page's unrotated user space
    Points,
}

/// One form field to place, matching the editor's PlacedField shape
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FillableFieldDefinition {
    #[serde(rename = "type")]
    pub field_type: FieldType,
    /// 0-based page index
    pub page_index: usize,
    pub x: f64,
    pub y: f64,
    /// Width in points; the field type's default when absent
    #[serde(default)]
    pub width: Option<f64>,
    /// Height in points; the field type's default when absent
    #[serde(default)]
    pub height: Option<f64>,
    /// Form field name, unique within the document
    pub name: String,
    /// Tooltip shown by viewers (`/TU`)
    #[serde(default)]
    pub label: Option<String>,
    #[serde(default)]
    pub units: PositionUnits,
}

impl FillableFieldDefinition {
    /// Field anchored at a normalized top-left position with the default size
    pub fn new(
        field_type: FieldType,
        page_index: usize,
        nx: f64,
        ny: f64,
        name: impl Into<String>,
    ) -> Self {
        Self {
            field_type,
            page_index,
            x: nx,
            y: ny,
            width: None,
            height: None,
            name: name.into(),
            label: None,
            units: PositionUnits::Normalized,
        }
    }

    /// Field whose lower-left corner is given directly in PDF points
    pub fn at_points(
        field_type: FieldType,
        page_index: usize,
        x: f64,
        y: f64,
        name: impl Into<String>,
    ) -> Self {
        Self {
            units: PositionUnits::Points,
            ..Self::new(field_type, page_index, x, y, name)
        }
    }

    pub fn with_size(mut self, width: f64, height: f64) -> Self {
        self.width = Some(width);
        self.height = Some(height);
        self
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Resolved size: explicit dimensions win, missing ones fall back to the default
    pub fn size(&self) -> SizePt {
        let default = get_default_field_size(self.field_type);
        SizePt {
            width_pt: self.width.map(Pt).unwrap_or(default.width_pt),
            height_pt: self.height.map(Pt).unwrap_or(default.height_pt),
        }
    }

    pub fn anchor(&self) -> NormalizedPoint {
        NormalizedPoint::new(self.x, self.y)
    }
}

/// Synthesizer options
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FillOptions {
    /// Interpret normalized positions in the page's displayed (rotated) frame
    pub normalize_page_rotation: bool,
    /// Font size for text and date fields
    pub font_size: f64,
    /// Ask viewers to regenerate field appearances (`/NeedAppearances`)
    pub need_appearances: bool,
}

impl Default for FillOptions {
    fn default() -> Self {
        Self {
            normalize_page_rotation: true,
            font_size: 12.0,
            need_appearances: true,
        }
    }
}
