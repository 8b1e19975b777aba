use crate::units::SizePt;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Kind of interactive form field that can be placed on a page
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    Text,
    Checkbox,
    Date,
    Signature,
}

impl FieldType {
    pub const ALL: [FieldType; 4] = [
        FieldType::Text,
        FieldType::Checkbox,
        FieldType::Date,
        FieldType::Signature,
    ];

    /// Default dimensions in points when the caller supplies no explicit size
    pub fn default_size(&self) -> SizePt {
        match self {
            FieldType::Text => SizePt::new(150.0, 30.0),
            FieldType::Checkbox => SizePt::new(20.0, 20.0),
            FieldType::Date => SizePt::new(100.0, 30.0),
            FieldType::Signature => SizePt::new(200.0, 50.0),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            FieldType::Text => "text",
            FieldType::Checkbox => "checkbox",
            FieldType::Date => "date",
            FieldType::Signature => "signature",
        }
    }
}

/// Free-function form of [`FieldType::default_size`]
pub fn get_default_field_size(field_type: FieldType) -> SizePt {
    field_type.default_size()
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("Unknown field type: {0}")]
pub struct ParseFieldTypeError(pub String);

impl FromStr for FieldType {
    type Err = ParseFieldTypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "text" => Ok(FieldType::Text),
            "checkbox" => Ok(FieldType::Checkbox),
            "date" => Ok(FieldType::Date),
            "signature" => Ok(FieldType::Signature),
            _ => Err(ParseFieldTypeError(s.to_string())),
        }
    }
}
