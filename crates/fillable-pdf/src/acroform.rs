//! Interactive form dictionary (`/AcroForm`) bookkeeping

use crate::error::FillableError;
use crate::page_geometry::resolve;
use crate::widgets::{helvetica_font, zapf_dingbats_font};
use lopdf::{dictionary, Dictionary, Document, Object, ObjectId};
use std::collections::HashSet;

/// Field hierarchies deeper than this are not walked
const MAX_FIELD_DEPTH: usize = 16;

/// Get or create the catalog's AcroForm as an indirect dictionary.
///
/// An inline AcroForm is moved into its own object so later edits go through
/// a single id.
pub(crate) fn prepare_acroform(
    doc: &mut Document,
    need_appearances: bool,
) -> Result<ObjectId, FillableError> {
    let existing = doc.catalog()?.get(b"AcroForm").ok().cloned();

    let acroform_id = match existing {
        Some(Object::Reference(id)) => id,
        Some(Object::Dictionary(dict)) => {
            let id = doc.add_object(Object::Dictionary(dict));
            doc.catalog_mut()?.set("AcroForm", Object::Reference(id));
            id
        }
        _ => {
            let id = doc.add_object(dictionary! { "Fields" => Vec::<Object>::new() });
            doc.catalog_mut()?.set("AcroForm", Object::Reference(id));
            id
        }
    };

    let acroform = doc.get_object_mut(acroform_id)?.as_dict_mut()?;
    if acroform.get(b"Fields").is_err() {
        acroform.set("Fields", Vec::<Object>::new());
    }
    if acroform.get(b"DA").is_err() {
        acroform.set(
            "DA",
            Object::String(b"/Helv 0 Tf 0 g".to_vec(), lopdf::StringFormat::Literal),
        );
    }
    if need_appearances {
        acroform.set("NeedAppearances", Object::Boolean(true));
    }
    ensure_default_resources(acroform);

    Ok(acroform_id)
}

/// Make sure /DR carries the fonts our /DA strings name.
///
/// Only inline resource dictionaries are extended; an indirect /DR is left
/// as the author wrote it.
fn ensure_default_resources(acroform: &mut Dictionary) {
    if acroform.get(b"DR").is_err() {
        acroform.set("DR", dictionary! { "Font" => Dictionary::new() });
    }
    let Ok(Object::Dictionary(dr)) = acroform.get_mut(b"DR") else {
        return;
    };
    if dr.get(b"Font").is_err() {
        dr.set("Font", Dictionary::new());
    }
    let Ok(Object::Dictionary(fonts)) = dr.get_mut(b"Font") else {
        return;
    };
    if fonts.get(b"Helv").is_err() {
        fonts.set("Helv", helvetica_font());
    }
    if fonts.get(b"ZaDb").is_err() {
        fonts.set("ZaDb", zapf_dingbats_font());
    }
}

/// Append a reference to an array entry of `owner_id` (page /Annots, form
/// /Fields). The array may be inline, indirect, or missing.
pub(crate) fn push_reference(
    doc: &mut Document,
    owner_id: ObjectId,
    key: &[u8],
    item_id: ObjectId,
) -> Result<(), FillableError> {
    let current = doc.get_object(owner_id)?.as_dict()?.get(key).ok().cloned();

    match current {
        Some(Object::Reference(array_id)) => {
            if let Ok(Object::Array(items)) = doc.get_object_mut(array_id) {
                items.push(Object::Reference(item_id));
                return Ok(());
            }
            // Dangling or non-array reference: replace with a fresh inline array
            let owner = doc.get_object_mut(owner_id)?.as_dict_mut()?;
            owner.set(key.to_vec(), vec![Object::Reference(item_id)]);
        }
        Some(Object::Array(mut items)) => {
            items.push(Object::Reference(item_id));
            let owner = doc.get_object_mut(owner_id)?.as_dict_mut()?;
            owner.set(key.to_vec(), items);
        }
        _ => {
            let owner = doc.get_object_mut(owner_id)?.as_dict_mut()?;
            owner.set(key.to_vec(), vec![Object::Reference(item_id)]);
        }
    }

    Ok(())
}

/// Fully qualified names of the fields already in the document's AcroForm
pub(crate) fn existing_field_names(doc: &Document) -> HashSet<String> {
    let mut names = HashSet::new();

    let fields = doc
        .catalog()
        .ok()
        .and_then(|catalog| catalog.get(b"AcroForm").ok())
        .and_then(|obj| resolve(doc, obj).ok())
        .and_then(|obj| obj.as_dict().ok())
        .and_then(|form| form.get(b"Fields").ok())
        .and_then(|obj| resolve(doc, obj).ok())
        .and_then(|obj| obj.as_array().ok());

    if let Some(fields) = fields {
        for field in fields {
            collect_names(doc, field, None, 0, &mut names);
        }
    }

    names
}

fn collect_names(
    doc: &Document,
    field: &Object,
    parent: Option<&str>,
    depth: usize,
    names: &mut HashSet<String>,
) {
    if depth > MAX_FIELD_DEPTH {
        return;
    }
    let Some(dict) = resolve(doc, field).ok().and_then(|obj| obj.as_dict().ok()) else {
        return;
    };

    let full_name = match (parent, partial_name(dict)) {
        (Some(parent), Some(own)) => Some(format!("{}.{}", parent, own)),
        (None, Some(own)) => Some(own),
        (parent, None) => parent.map(str::to_string),
    };

    if let Some(name) = &full_name {
        names.insert(name.clone());
    }

    let kids = dict
        .get(b"Kids")
        .ok()
        .and_then(|obj| resolve(doc, obj).ok())
        .and_then(|obj| obj.as_array().ok());
    if let Some(kids) = kids {
        for kid in kids {
            collect_names(doc, kid, full_name.as_deref(), depth + 1, names);
        }
    }
}

/// The field's own `/T`, decoded lossily
pub(crate) fn partial_name(dict: &Dictionary) -> Option<String> {
    match dict.get(b"T").ok()? {
        Object::String(bytes, _) => Some(decode_text_string(bytes)),
        _ => None,
    }
}

/// PDF text strings are PDFDocEncoding or UTF-16BE with a BOM
fn decode_text_string(bytes: &[u8]) -> String {
    if bytes.starts_with(&[0xFE, 0xFF]) {
        let units: Vec<u16> = bytes[2..]
            .chunks_exact(2)
            .map(|pair| u16::from_be_bytes([pair[0], pair[1]]))
            .collect();
        String::from_utf16_lossy(&units)
    } else {
        String::from_utf8_lossy(bytes).into_owned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn empty_doc() -> Document {
        let mut doc = Document::with_version("1.7");
        let pages_id = doc.add_object(dictionary! {
            "Type" => "Pages",
            "Kids" => Vec::<Object>::new(),
            "Count" => 0,
        });
        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => Object::Reference(pages_id),
        });
        doc.trailer.set("Root", Object::Reference(catalog_id));
        doc
    }

    #[test]
    fn test_prepare_creates_acroform_with_fonts() {
        let mut doc = empty_doc();
        let form_id = prepare_acroform(&mut doc, true).unwrap();

        let catalog = doc.catalog().unwrap();
        assert_eq!(catalog.get(b"AcroForm").unwrap().as_reference().unwrap(), form_id);

        let form = doc.get_object(form_id).unwrap().as_dict().unwrap();
        assert!(form.get(b"Fields").unwrap().as_array().unwrap().is_empty());
        assert!(form.get(b"NeedAppearances").unwrap().as_bool().unwrap());
        let fonts = form
            .get(b"DR")
            .unwrap()
            .as_dict()
            .unwrap()
            .get(b"Font")
            .unwrap()
            .as_dict()
            .unwrap();
        assert!(fonts.get(b"Helv").is_ok());
        assert!(fonts.get(b"ZaDb").is_ok());
    }

    #[test]
    fn test_prepare_moves_inline_acroform() {
        let mut doc = empty_doc();
        let existing = doc.add_object(dictionary! { "T" => Object::string_literal("existing") });
        doc.catalog_mut().unwrap().set(
            "AcroForm",
            dictionary! { "Fields" => vec![Object::Reference(existing)] },
        );

        let form_id = prepare_acroform(&mut doc, false).unwrap();
        let form = doc.get_object(form_id).unwrap().as_dict().unwrap();
        assert_eq!(form.get(b"Fields").unwrap().as_array().unwrap().len(), 1);
        assert!(form.get(b"NeedAppearances").is_err());
    }

    #[test]
    fn test_push_reference_to_indirect_array() {
        let mut doc = empty_doc();
        let array_id = doc.add_object(Vec::<Object>::new());
        let owner_id = doc.add_object(dictionary! { "Annots" => Object::Reference(array_id) });
        let item_id = doc.add_object(Dictionary::new());

        push_reference(&mut doc, owner_id, b"Annots", item_id).unwrap();

        let array = doc.get_object(array_id).unwrap().as_array().unwrap();
        assert_eq!(array.len(), 1);
    }

    #[test]
    fn test_push_reference_creates_missing_array() {
        let mut doc = empty_doc();
        let owner_id = doc.add_object(Dictionary::new());
        let item_id = doc.add_object(Dictionary::new());

        push_reference(&mut doc, owner_id, b"Annots", item_id).unwrap();
        push_reference(&mut doc, owner_id, b"Annots", item_id).unwrap();

        let owner = doc.get_object(owner_id).unwrap().as_dict().unwrap();
        assert_eq!(owner.get(b"Annots").unwrap().as_array().unwrap().len(), 2);
    }

    #[test]
    fn test_existing_names_are_fully_qualified() {
        let mut doc = empty_doc();
        let kid = doc.add_object(dictionary! { "T" => Object::string_literal("city") });
        let parent = doc.add_object(dictionary! {
            "T" => Object::string_literal("address"),
            "Kids" => vec![Object::Reference(kid)],
        });
        let form_id = doc.add_object(dictionary! { "Fields" => vec![Object::Reference(parent)] });
        doc.catalog_mut()
            .unwrap()
            .set("AcroForm", Object::Reference(form_id));

        let names = existing_field_names(&doc);
        assert!(names.contains("address"));
        assert!(names.contains("address.city"));
    }

    #[test]
    fn test_decode_utf16_name() {
        assert_eq!(decode_text_string(&[0xFE, 0xFF, 0x00, 0x41, 0x00, 0x42]), "AB");
        assert_eq!(decode_text_string(b"plain"), "plain");
    }
}
