//! In-memory PDF fixtures

#![allow(dead_code)]

use lopdf::{content::Content, content::Operation, dictionary, Dictionary, Document, Object, Stream};

/// Page description for [`build_pdf`]
#[derive(Clone, Copy)]
pub struct PageSpec {
    pub media_box: [i64; 4],
    pub rotate: Option<i64>,
}

impl PageSpec {
    pub fn letter() -> Self {
        Self {
            media_box: [0, 0, 612, 792],
            rotate: None,
        }
    }

    pub fn rotated(rotate: i64) -> Self {
        Self {
            rotate: Some(rotate),
            ..Self::letter()
        }
    }
}

/// Create a simple PDF with N letter-size pages
pub fn create_test_pdf(num_pages: usize) -> Vec<u8> {
    build_pdf(&vec![PageSpec::letter(); num_pages])
}

pub fn build_pdf(pages: &[PageSpec]) -> Vec<u8> {
    let mut doc = Document::with_version("1.7");
    let pages_id = doc.new_object_id();

    let mut page_ids = Vec::new();
    for (i, spec) in pages.iter().enumerate() {
        let content = Content {
            operations: vec![
                Operation::new("BT", vec![]),
                Operation::new("Tf", vec![Object::Name(b"F1".to_vec()), Object::Integer(12)]),
                Operation::new("Td", vec![Object::Integer(100), Object::Integer(700)]),
                Operation::new(
                    "Tj",
                    vec![Object::String(
                        format!("Page {}", i + 1).into_bytes(),
                        lopdf::StringFormat::Literal,
                    )],
                ),
                Operation::new("ET", vec![]),
            ],
        };
        let content_id = doc.add_object(Stream::new(Dictionary::new(), content.encode().unwrap()));

        let mut page = dictionary! {
            "Type" => "Page",
            "Parent" => Object::Reference(pages_id),
            "MediaBox" => spec.media_box.iter().map(|v| Object::Integer(*v)).collect::<Vec<_>>(),
            "Contents" => Object::Reference(content_id),
        };
        if let Some(rotate) = spec.rotate {
            page.set("Rotate", Object::Integer(rotate));
        }
        page_ids.push(doc.add_object(page));
    }

    let pages_dict = dictionary! {
        "Type" => "Pages",
        "Count" => pages.len() as i64,
        "Kids" => page_ids.iter().map(|id| Object::Reference(*id)).collect::<Vec<_>>(),
    };
    doc.objects.insert(pages_id, Object::Dictionary(pages_dict));

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => Object::Reference(pages_id),
    });
    doc.trailer.set("Root", Object::Reference(catalog_id));

    let mut buffer = Vec::new();
    doc.save_to(&mut buffer).unwrap();
    buffer
}

/// Two-page PDF whose pages inherit an offset MediaBox and a rotation from
/// the page tree root
pub fn create_inherited_geometry_pdf() -> Vec<u8> {
    let mut doc = Document::with_version("1.7");
    let pages_id = doc.new_object_id();

    let page_ids: Vec<_> = (0..2)
        .map(|_| {
            doc.add_object(dictionary! {
                "Type" => "Page",
                "Parent" => Object::Reference(pages_id),
            })
        })
        .collect();

    let pages_dict = dictionary! {
        "Type" => "Pages",
        "Count" => 2,
        "Kids" => page_ids.iter().map(|id| Object::Reference(*id)).collect::<Vec<_>>(),
        "MediaBox" => vec![50.into(), 100.into(), 662.into(), 892.into()],
        "Rotate" => 180,
    };
    doc.objects.insert(pages_id, Object::Dictionary(pages_dict));

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => Object::Reference(pages_id),
    });
    doc.trailer.set("Root", Object::Reference(catalog_id));

    let mut buffer = Vec::new();
    doc.save_to(&mut buffer).unwrap();
    buffer
}

/// Bytes a field name is stored as: ASCII verbatim, otherwise UTF-16BE with a BOM
pub fn encode_text_string(s: &str) -> Vec<u8> {
    if s.is_ascii() {
        return s.as_bytes().to_vec();
    }
    let mut bytes = vec![0xFE, 0xFF];
    bytes.extend(s.encode_utf16().flat_map(|unit| unit.to_be_bytes()));
    bytes
}

/// Look up the widget dictionary for a named field in a saved PDF
pub fn widget_dict(bytes: &[u8], name: &str) -> Dictionary {
    let doc = Document::load_mem(bytes).unwrap();
    for object in doc.objects.values() {
        if let Ok(dict) = object.as_dict() {
            if let Ok(Object::String(t, _)) = dict.get(b"T") {
                if t.as_slice() == encode_text_string(name).as_slice() {
                    return dict.clone();
                }
            }
        }
    }
    panic!("no widget named {}", name);
}
