//! Widget annotations and their appearance streams

use field_geometry::FieldType;
use lopdf::{dictionary, Dictionary, Document, Object, ObjectId, Stream, StringFormat};

/// Widget annotation flag: Print (bit 3)
const PRINT_FLAG: i64 = 4;

/// Display pattern used for date fields
pub const DATE_FORMAT: &str = "mm/dd/yyyy";

/// Everything needed to build one merged field/widget dictionary
pub(crate) struct WidgetSpec<'a> {
    pub field_type: FieldType,
    pub name: &'a str,
    pub label: Option<&'a str>,
    /// [x0, y0, x1, y1] in user space
    pub rect: [f64; 4],
    pub page_id: ObjectId,
    /// Page rotation the widget should compensate for
    pub rotation: i32,
    pub font_size: f64,
}

/// Escape special characters for PDF string literals
fn escape_pdf_string(s: &str) -> String {
    s.chars()
        .map(|c| match c {
            '(' => "\\(".to_string(),
            ')' => "\\)".to_string(),
            '\\' => "\\\\".to_string(),
            _ if c.is_ascii() => c.to_string(),
            _ => "?".to_string(), // Replace non-ASCII with ?
        })
        .collect()
}

fn literal(s: &str) -> Object {
    Object::String(s.as_bytes().to_vec(), StringFormat::Literal)
}

/// PDF text string: ASCII as-is, anything else as UTF-16BE behind a BOM
fn text_string(s: &str) -> Object {
    if s.is_ascii() {
        return literal(s);
    }
    let mut bytes = vec![0xFE, 0xFF];
    for unit in s.encode_utf16() {
        bytes.extend_from_slice(&unit.to_be_bytes());
    }
    Object::String(bytes, StringFormat::Hexadecimal)
}

/// Create the field/widget object and return its id.
///
/// The caller links it into the page /Annots and the AcroForm /Fields.
pub(crate) fn add_widget(doc: &mut Document, spec: &WidgetSpec) -> ObjectId {
    let [x0, y0, x1, y1] = spec.rect;

    let mut widget = Dictionary::new();
    widget.set("Type", Object::Name(b"Annot".to_vec()));
    widget.set("Subtype", Object::Name(b"Widget".to_vec()));
    widget.set(
        "Rect",
        Object::Array(vec![
            Object::Real(x0 as f32),
            Object::Real(y0 as f32),
            Object::Real(x1 as f32),
            Object::Real(y1 as f32),
        ]),
    );
    widget.set("F", Object::Integer(PRINT_FLAG));
    widget.set("P", Object::Reference(spec.page_id));
    widget.set("T", text_string(spec.name));
    if let Some(label) = spec.label {
        widget.set("TU", text_string(label));
    }

    let mut mk = dictionary! {
        "BC" => vec![0.into(), 0.into(), 0.into()],
        "BG" => vec![1.into(), 1.into(), 1.into()],
    };
    if spec.rotation != 0 {
        mk.set("R", Object::Integer(spec.rotation as i64));
    }

    // Appearance is drawn upright in the displayed frame, so swap for quarter turns
    let (width, height) = match spec.rotation {
        90 | 270 => (y1 - y0, x1 - x0),
        _ => (x1 - x0, y1 - y0),
    };

    match spec.field_type {
        FieldType::Text => {
            widget.set("FT", Object::Name(b"Tx".to_vec()));
            widget.set("DA", literal(&text_da(spec.font_size)));
            let ap = box_appearance(width, height, spec.rotation, [1.0, 1.0, 1.0]);
            set_normal_appearance(doc, &mut widget, ap);
        }
        FieldType::Date => {
            widget.set("FT", Object::Name(b"Tx".to_vec()));
            widget.set("DA", literal(&text_da(spec.font_size)));
            if spec.label.is_none() {
                widget.set("TU", text_string(DATE_FORMAT));
            }
            widget.set("AA", date_actions());
            let ap = box_appearance(width, height, spec.rotation, [1.0, 1.0, 1.0]);
            set_normal_appearance(doc, &mut widget, ap);
        }
        FieldType::Checkbox => {
            widget.set("FT", Object::Name(b"Btn".to_vec()));
            widget.set("V", Object::Name(b"Off".to_vec()));
            widget.set("AS", Object::Name(b"Off".to_vec()));
            // ZapfDingbats check mark for viewer-generated appearances
            mk.set("CA", literal("4"));

            let on = checkbox_appearance(width, height, spec.rotation, true);
            let off = checkbox_appearance(width, height, spec.rotation, false);
            let on_id = doc.add_object(on);
            let off_id = doc.add_object(off);
            widget.set(
                "AP",
                dictionary! {
                    "N" => dictionary! {
                        "Yes" => Object::Reference(on_id),
                        "Off" => Object::Reference(off_id),
                    },
                },
            );
        }
        FieldType::Signature => {
            // Only reserves the box; signing is left to the viewer
            widget.set("FT", Object::Name(b"Sig".to_vec()));
            let ap = signature_appearance(width, height, spec.rotation, spec.label);
            set_normal_appearance(doc, &mut widget, ap);
        }
    }

    widget.set("MK", Object::Dictionary(mk));
    doc.add_object(Object::Dictionary(widget))
}

fn text_da(font_size: f64) -> String {
    format!("/Helv {} Tf 0 g", font_size)
}

/// Format/keystroke actions using the viewer's built-in date helpers
fn date_actions() -> Object {
    let format_js = format!("AFDate_FormatEx(\"{}\");", DATE_FORMAT);
    let keystroke_js = format!("AFDate_KeystrokeEx(\"{}\");", DATE_FORMAT);
    Object::Dictionary(dictionary! {
        "F" => dictionary! {
            "S" => "JavaScript",
            "JS" => literal(&format_js),
        },
        "K" => dictionary! {
            "S" => "JavaScript",
            "JS" => literal(&keystroke_js),
        },
    })
}

fn set_normal_appearance(doc: &mut Document, widget: &mut Dictionary, stream: Stream) {
    let stream_id = doc.add_object(stream);
    widget.set("AP", dictionary! { "N" => Object::Reference(stream_id) });
}

/// Form XObject with the given upright size, rotated back by the page rotation
fn form_xobject(width: f64, height: f64, rotation: i32, content: String) -> Stream {
    let matrix: [i64; 4] = match rotation {
        90 => [0, 1, -1, 0],
        180 => [-1, 0, 0, -1],
        270 => [0, -1, 1, 0],
        _ => [1, 0, 0, 1],
    };

    let mut stream_dict = Dictionary::new();
    stream_dict.set("Type", Object::Name(b"XObject".to_vec()));
    stream_dict.set("Subtype", Object::Name(b"Form".to_vec()));
    stream_dict.set("FormType", Object::Integer(1));
    stream_dict.set(
        "BBox",
        Object::Array(vec![
            Object::Integer(0),
            Object::Integer(0),
            Object::Real(width as f32),
            Object::Real(height as f32),
        ]),
    );
    stream_dict.set(
        "Matrix",
        Object::Array(vec![
            Object::Integer(matrix[0]),
            Object::Integer(matrix[1]),
            Object::Integer(matrix[2]),
            Object::Integer(matrix[3]),
            Object::Integer(0),
            Object::Integer(0),
        ]),
    );

    Stream::new(stream_dict, content.into_bytes())
}

/// Filled box with a thin black border
fn box_appearance(width: f64, height: f64, rotation: i32, fill: [f64; 3]) -> Stream {
    let content = format!(
        "q\n\
{r} {g} {b} rg\n\
0 0 {w} {h} re f\n\
0 0 0 RG\n\
1 w\n\
0.5 0.5 {w2} {h2} re S\n\
Q",
        r = fill[0],
        g = fill[1],
        b = fill[2],
        w = width,
        h = height,
        w2 = (width - 1.0).max(0.0),
        h2 = (height - 1.0).max(0.0),
    );
    form_xobject(width, height, rotation, content)
}

fn checkbox_appearance(width: f64, height: f64, rotation: i32, checked: bool) -> Stream {
    let checkmark = if checked {
        format!(
            "q\n\
0 G\n\
2 w\n\
{x1} {y1} m\n\
{x2} {y2} l\n\
{x3} {y3} l\n\
S\n\
Q",
            x1 = width * 0.2,
            y1 = height * 0.5,
            x2 = width * 0.4,
            y2 = height * 0.3,
            x3 = width * 0.8,
            y3 = height * 0.8,
        )
    } else {
        String::new()
    };

    let content = format!(
        "q\n\
1 1 1 rg\n\
0 0 {w} {h} re f\n\
0 0 0 RG\n\
1 w\n\
0 0 {w} {h} re S\n\
{check}\n\
Q",
        w = width,
        h = height,
        check = checkmark,
    );
    form_xobject(width, height, rotation, content)
}

/// Light blue placeholder box with a caption
fn signature_appearance(width: f64, height: f64, rotation: i32, label: Option<&str>) -> Stream {
    let caption = escape_pdf_string(label.unwrap_or("Sign here"));
    let font_size = (height * 0.25).clamp(6.0, 10.0);

    let content = format!(
        "q\n\
0.9 0.95 1 rg\n\
0 0 {w} {h} re f\n\
0.2 0.4 0.8 RG\n\
1 w\n\
0.5 0.5 {w2} {h2} re S\n\
0 0 0 rg\n\
BT\n\
/Helv {fs} Tf\n\
4 4 Td\n\
({caption}) Tj\n\
ET\n\
Q",
        w = width,
        h = height,
        w2 = (width - 1.0).max(0.0),
        h2 = (height - 1.0).max(0.0),
        fs = font_size,
        caption = caption,
    );

    let mut stream = form_xobject(width, height, rotation, content);
    stream.dict.set(
        "Resources",
        dictionary! {
            "Font" => dictionary! {
                "Helv" => helvetica_font(),
            },
        },
    );
    stream
}

pub(crate) fn helvetica_font() -> Dictionary {
    dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
        "Encoding" => "WinAnsiEncoding",
    }
}

pub(crate) fn zapf_dingbats_font() -> Dictionary {
    dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "ZapfDingbats",
    }
}
