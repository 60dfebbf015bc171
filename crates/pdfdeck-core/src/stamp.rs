//! Shared drawing layer for the stamping operations.
//!
//! Page numbers and watermarks draw by appending a content stream to the
//! page and registering the font (and, for watermarks, an `ExtGState` for
//! opacity) under the page's `Resources`. Standard-14 fonts need no
//! embedding; text widths come from their AFM advance-width tables.

use lopdf::{dictionary, Dictionary, Document, Object, ObjectId, Stream};

use crate::error::PdfDeckError;

/// Resource name for the opacity graphics state.
pub(crate) const OPACITY_GS_KEY: &str = "GSdeck";

const FALLBACK_WIDTH: u16 = 600;

/// Helvetica advance widths for ASCII 32..=126, glyph units per 1000.
#[rustfmt::skip]
const HELVETICA_WIDTHS: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333,
    389, 584, 278, 333, 278, 278, 556, 556, 556, 556,
    556, 556, 556, 556, 556, 556, 278, 278, 584, 584,
    584, 556, 1015, 667, 667, 722, 722, 667, 611, 778,
    722, 278, 500, 667, 556, 833, 722, 778, 667, 778,
    722, 667, 611, 722, 667, 944, 667, 667, 611, 278,
    278, 278, 469, 556, 333, 556, 556, 500, 556, 556,
    278, 556, 556, 222, 222, 500, 222, 833, 556, 556,
    556, 556, 333, 500, 278, 556, 500, 722, 500, 500,
    500, 334, 260, 334, 584,
];

/// Helvetica-Bold advance widths for ASCII 32..=126, glyph units per 1000.
#[rustfmt::skip]
const HELVETICA_BOLD_WIDTHS: [u16; 95] = [
    278, 333, 474, 556, 556, 889, 722, 238, 333, 333,
    389, 584, 278, 333, 278, 278, 556, 556, 556, 556,
    556, 556, 556, 556, 556, 556, 333, 333, 584, 584,
    584, 611, 975, 722, 722, 722, 722, 667, 611, 778,
    722, 278, 556, 722, 611, 833, 722, 778, 667, 778,
    722, 667, 611, 722, 667, 944, 667, 667, 611, 333,
    278, 333, 584, 556, 333, 556, 611, 556, 611, 556,
    333, 611, 611, 278, 278, 556, 278, 889, 611, 611,
    611, 611, 389, 556, 333, 611, 556, 778, 556, 556,
    500, 389, 280, 389, 584,
];

/// Standard-14 fonts used by the stamping operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum StandardFont {
    Helvetica,
    HelveticaBold,
}

impl StandardFont {
    pub(crate) fn base_font(self) -> &'static str {
        match self {
            StandardFont::Helvetica => "Helvetica",
            StandardFont::HelveticaBold => "Helvetica-Bold",
        }
    }

    /// Name the font is registered under in the page's `Resources`.
    pub(crate) fn resource_key(self) -> &'static str {
        match self {
            StandardFont::Helvetica => "Fdeck",
            StandardFont::HelveticaBold => "FdeckB",
        }
    }

    fn widths(self) -> &'static [u16; 95] {
        match self {
            StandardFont::Helvetica => &HELVETICA_WIDTHS,
            StandardFont::HelveticaBold => &HELVETICA_BOLD_WIDTHS,
        }
    }
}

/// Width of `text` at `font_size`, in user-space units.
///
/// Characters outside printable ASCII use a fallback advance width.
pub(crate) fn text_width(font: StandardFont, text: &str, font_size: f64) -> f64 {
    let table = font.widths();
    let units: u32 = text
        .chars()
        .map(|c| {
            let code = c as u32;
            if (32..=126).contains(&code) {
                u32::from(table[(code - 32) as usize])
            } else {
                u32::from(FALLBACK_WIDTH)
            }
        })
        .sum();
    f64::from(units) * font_size / 1000.0
}

/// Escape a string for a PDF literal: backslash first, then parentheses.
pub(crate) fn escape_pdf_text(text: &str) -> String {
    text.replace('\\', "\\\\")
        .replace('(', "\\(")
        .replace(')', "\\)")
}

/// Add a Standard-14 font dictionary to the document.
pub(crate) fn add_standard_font(doc: &mut Document, font: StandardFont) -> ObjectId {
    doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => font.base_font(),
    })
}

/// Add an `ExtGState` setting fill and stroke alpha to `opacity`.
pub(crate) fn add_opacity_gstate(doc: &mut Document, opacity: f64) -> ObjectId {
    doc.add_object(dictionary! {
        "Type" => "ExtGState",
        "ca" => Object::Real(opacity as f32),
        "CA" => Object::Real(opacity as f32),
    })
}

/// Register `font` on a page under its resource key.
pub(crate) fn register_font(
    doc: &mut Document,
    page_id: ObjectId,
    font: StandardFont,
    font_id: ObjectId,
) -> Result<(), PdfDeckError> {
    register_resource(
        doc,
        page_id,
        b"Font",
        font.resource_key(),
        Object::Reference(font_id),
    )
}

/// Register the opacity graphics state on a page.
pub(crate) fn register_gstate(
    doc: &mut Document,
    page_id: ObjectId,
    gs_id: ObjectId,
) -> Result<(), PdfDeckError> {
    register_resource(
        doc,
        page_id,
        b"ExtGState",
        OPACITY_GS_KEY,
        Object::Reference(gs_id),
    )
}

/// One text draw, positioned in page coordinates.
pub(crate) struct TextStamp<'a> {
    pub font: StandardFont,
    pub size: f64,
    pub text: &'a str,
    pub x: f64,
    pub y: f64,
    /// Counter-clockwise degrees about the draw origin.
    pub rotation: f64,
    /// Emit the opacity graphics state before drawing.
    pub use_opacity: bool,
}

/// Build the content-stream bytes for one [`TextStamp`].
pub(crate) fn stamp_content(stamp: &TextStamp<'_>) -> Vec<u8> {
    let mut ops = String::new();
    ops.push_str("q\n");
    if stamp.use_opacity {
        ops.push_str(&format!("/{} gs\n", OPACITY_GS_KEY));
    }
    ops.push_str("BT\n");
    ops.push_str(&format!("/{} {} Tf\n", stamp.font.resource_key(), stamp.size));
    ops.push_str("0 0 0 rg\n");
    if stamp.rotation != 0.0 {
        let (sin, cos) = stamp.rotation.to_radians().sin_cos();
        ops.push_str(&format!(
            "{:.4} {:.4} {:.4} {:.4} {:.2} {:.2} Tm\n",
            cos, sin, -sin, cos, stamp.x, stamp.y
        ));
    } else {
        ops.push_str(&format!("{:.2} {:.2} Td\n", stamp.x, stamp.y));
    }
    ops.push_str(&format!("({}) Tj\n", escape_pdf_text(stamp.text)));
    ops.push_str("ET\nQ");
    ops.into_bytes()
}

/// Append a content stream to a page's `Contents`.
///
/// A single reference becomes a two-element array; an array gets one more
/// element; a page without contents gets a direct reference.
pub(crate) fn append_content(
    doc: &mut Document,
    page_id: ObjectId,
    content: Vec<u8>,
) -> Result<(), PdfDeckError> {
    let stream_id = doc.add_object(Stream::new(Dictionary::new(), content));

    enum Existing {
        Reference(ObjectId),
        Array,
        None,
    }

    let page_dict = page_dict_mut(doc, page_id)?;
    let existing = match page_dict.get(b"Contents") {
        Ok(Object::Reference(id)) => Existing::Reference(*id),
        Ok(Object::Array(_)) => Existing::Array,
        _ => Existing::None,
    };
    match existing {
        Existing::Reference(id) => {
            page_dict.set(
                "Contents",
                Object::Array(vec![Object::Reference(id), Object::Reference(stream_id)]),
            );
        }
        Existing::Array => {
            if let Ok(Object::Array(arr)) = page_dict.get_mut(b"Contents") {
                arr.push(Object::Reference(stream_id));
            }
        }
        Existing::None => {
            page_dict.set("Contents", Object::Reference(stream_id));
        }
    }
    Ok(())
}

/// Effective `MediaBox` of a page: inline or referenced on the page itself,
/// else inherited through `Parent` (bounded walk), else US Letter.
pub(crate) fn media_box(doc: &Document, page_id: ObjectId) -> [f64; 4] {
    let mut current = page_id;
    for _ in 0..10 {
        let dict = match doc.get_object(current).and_then(|o| o.as_dict()) {
            Ok(dict) => dict,
            Err(_) => break,
        };
        if let Ok(obj) = dict.get(b"MediaBox") {
            if let Some(rect) = rect_values(doc, obj) {
                return rect;
            }
        }
        match dict.get(b"Parent").and_then(|o| o.as_reference()) {
            Ok(parent) => current = parent,
            Err(_) => break,
        }
    }
    [0.0, 0.0, 612.0, 792.0]
}

/// Page width and height from the effective `MediaBox`.
pub(crate) fn page_size(doc: &Document, page_id: ObjectId) -> (f64, f64) {
    let [x0, y0, x1, y1] = media_box(doc, page_id);
    (x1 - x0, y1 - y0)
}

fn rect_values(doc: &Document, obj: &Object) -> Option<[f64; 4]> {
    let resolved;
    let arr = match obj {
        Object::Array(arr) => arr,
        Object::Reference(id) => {
            resolved = doc.get_object(*id).ok()?;
            resolved.as_array().ok()?
        }
        _ => return None,
    };
    if arr.len() != 4 {
        return None;
    }
    let mut values = [0.0; 4];
    for (slot, item) in values.iter_mut().zip(arr) {
        *slot = number(item)?;
    }
    Some(values)
}

fn number(obj: &Object) -> Option<f64> {
    match obj {
        Object::Integer(i) => Some(*i as f64),
        Object::Real(r) => Some(f64::from(*r)),
        _ => None,
    }
}

fn page_dict_mut<'a>(
    doc: &'a mut Document,
    page_id: ObjectId,
) -> Result<&'a mut Dictionary, PdfDeckError> {
    doc.get_object_mut(page_id)
        .and_then(|o| o.as_dict_mut())
        .map_err(|e| PdfDeckError::OperationError(format!("Invalid page object: {}", e)))
}

/// Insert `key => value` into the `category` subdictionary of the page's
/// `Resources`, resolving referenced and inherited dictionaries first.
fn register_resource(
    doc: &mut Document,
    page_id: ObjectId,
    category: &[u8],
    key: &str,
    value: Object,
) -> Result<(), PdfDeckError> {
    enum Res {
        Inline,
        Ref(ObjectId),
    }

    // Locate the page's own Resources, materializing a copy of the
    // inherited dictionary when the page has none so existing names keep
    // resolving.
    let located = {
        let page_dict = doc
            .get_object(page_id)
            .and_then(|o| o.as_dict())
            .map_err(|e| PdfDeckError::OperationError(format!("Invalid page object: {}", e)))?;
        match page_dict.get(b"Resources") {
            Ok(Object::Reference(id)) => Some(Res::Ref(*id)),
            Ok(Object::Dictionary(_)) => Some(Res::Inline),
            _ => None,
        }
    };
    let location = match located {
        Some(location) => location,
        None => {
            let inherited = inherited_resources(doc, page_id).unwrap_or_default();
            page_dict_mut(doc, page_id)?.set("Resources", Object::Dictionary(inherited));
            Res::Inline
        }
    };

    // The category dict may itself be an indirect object.
    let category_ref = {
        let resources = match &location {
            Res::Inline => {
                let page_dict = doc
                    .get_object(page_id)
                    .and_then(|o| o.as_dict())
                    .map_err(|e| {
                        PdfDeckError::OperationError(format!("Invalid page object: {}", e))
                    })?;
                match page_dict.get(b"Resources") {
                    Ok(Object::Dictionary(dict)) => dict,
                    _ => {
                        return Err(PdfDeckError::OperationError(
                            "Invalid resources dictionary".into(),
                        ))
                    }
                }
            }
            Res::Ref(id) => doc
                .get_object(*id)
                .and_then(|o| o.as_dict())
                .map_err(|e| {
                    PdfDeckError::OperationError(format!("Invalid resources object: {}", e))
                })?,
        };
        match resources.get(category) {
            Ok(Object::Reference(id)) => Some(*id),
            _ => None,
        }
    };

    match category_ref {
        Some(id) => {
            let dict = doc
                .get_object_mut(id)
                .and_then(|o| o.as_dict_mut())
                .map_err(|e| {
                    PdfDeckError::OperationError(format!("Invalid resource category: {}", e))
                })?;
            dict.set(key, value);
        }
        None => {
            let resources = match location {
                Res::Inline => page_dict_mut(doc, page_id)?
                    .get_mut(b"Resources")
                    .and_then(|o| o.as_dict_mut())
                    .map_err(|e| {
                        PdfDeckError::OperationError(format!("Invalid resources dictionary: {}", e))
                    })?,
                Res::Ref(id) => doc
                    .get_object_mut(id)
                    .and_then(|o| o.as_dict_mut())
                    .map_err(|e| {
                        PdfDeckError::OperationError(format!("Invalid resources object: {}", e))
                    })?,
            };
            match resources.get_mut(category) {
                Ok(Object::Dictionary(dict)) => dict.set(key, value),
                _ => {
                    let mut dict = Dictionary::new();
                    dict.set(key, value);
                    resources.set(category, Object::Dictionary(dict));
                }
            }
        }
    }
    Ok(())
}

fn inherited_resources(doc: &Document, page_id: ObjectId) -> Option<Dictionary> {
    let page = doc.get_object(page_id).and_then(|o| o.as_dict()).ok()?;
    let mut current = page.get(b"Parent").and_then(|o| o.as_reference()).ok()?;
    for _ in 0..10 {
        let dict = doc.get_object(current).and_then(|o| o.as_dict()).ok()?;
        match dict.get(b"Resources") {
            Ok(Object::Dictionary(found)) => return Some(found.clone()),
            Ok(Object::Reference(id)) => {
                return doc.get_object(*id).and_then(|o| o.as_dict()).ok().cloned();
            }
            _ => {}
        }
        current = dict.get(b"Parent").and_then(|o| o.as_reference()).ok()?;
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pages::test_pdf::create_test_pdf;
    use lopdf::Document;
    use pretty_assertions::assert_eq;

    /// One page, no MediaBox or Resources of its own; both sit on the
    /// Pages node.
    fn pdf_with_inherited_attributes() -> Document {
        let mut doc = Document::with_version("1.7");
        let pages_id = doc.new_object_id();

        let font_id = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Courier",
        });
        let content_id = doc.add_object(Stream::new(
            Dictionary::new(),
            b"BT /F1 10 Tf 72 720 Td (x) Tj ET".to_vec(),
        ));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => Object::Reference(pages_id),
            "Contents" => Object::Reference(content_id),
        });

        let pages = dictionary! {
            "Type" => "Pages",
            "Count" => 1,
            "Kids" => vec![Object::Reference(page_id)],
            "MediaBox" => vec![0.into(), 0.into(), 595.into(), 842.into()],
            "Resources" => dictionary! {
                "Font" => dictionary! {
                    "F1" => Object::Reference(font_id),
                },
            },
        };
        doc.objects.insert(pages_id, Object::Dictionary(pages));

        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => Object::Reference(pages_id),
        });
        doc.trailer.set("Root", Object::Reference(catalog_id));
        doc
    }

    #[test]
    fn test_text_width_sums_advance_widths() {
        // H 722, e 556, l 222, l 222, o 556
        let expected = 2278.0 * 12.0 / 1000.0;
        assert_eq!(text_width(StandardFont::Helvetica, "Hello", 12.0), expected);
    }

    #[test]
    fn test_text_width_bold_is_wider() {
        let regular = text_width(StandardFont::Helvetica, "Page 1", 12.0);
        let bold = text_width(StandardFont::HelveticaBold, "Page 1", 12.0);
        assert!(bold > regular);
    }

    #[test]
    fn test_text_width_fallback_for_non_ascii() {
        let width = text_width(StandardFont::Helvetica, "é", 10.0);
        assert_eq!(width, 600.0 * 10.0 / 1000.0);
    }

    #[test]
    fn test_escape_pdf_text() {
        assert_eq!(escape_pdf_text("a(b)c\\"), "a\\(b\\)c\\\\");
        assert_eq!(escape_pdf_text("plain"), "plain");
    }

    #[test]
    fn test_stamp_content_operators() {
        let content = stamp_content(&TextStamp {
            font: StandardFont::Helvetica,
            size: 12.0,
            text: "Page 1",
            x: 30.0,
            y: 30.0,
            rotation: 0.0,
            use_opacity: false,
        });
        let text = String::from_utf8(content).unwrap();
        assert!(text.contains("BT"));
        assert!(text.contains("/Fdeck 12 Tf"));
        assert!(text.contains("30.00 30.00 Td"));
        assert!(text.contains("(Page 1) Tj"));
        assert!(!text.contains("gs"));
        assert!(!text.contains("Tm"));
    }

    #[test]
    fn test_stamp_content_rotation_uses_text_matrix() {
        let content = stamp_content(&TextStamp {
            font: StandardFont::HelveticaBold,
            size: 36.0,
            text: "DRAFT",
            x: 100.0,
            y: 200.0,
            rotation: 45.0,
            use_opacity: true,
        });
        let text = String::from_utf8(content).unwrap();
        assert!(text.contains("/GSdeck gs"));
        assert!(text.contains("0.7071 0.7071 -0.7071 0.7071 100.00 200.00 Tm"));
        assert!(!text.contains("Td"));
    }

    #[test]
    fn test_append_content_wraps_reference_into_array() {
        let mut doc = Document::load_mem(&create_test_pdf(1)).unwrap();
        let page_id = doc.get_pages()[&1];

        append_content(&mut doc, page_id, b"q Q".to_vec()).unwrap();
        let contents_len = |doc: &Document| {
            doc.get_object(page_id)
                .and_then(|o| o.as_dict())
                .unwrap()
                .get(b"Contents")
                .and_then(|o| o.as_array())
                .map(|a| a.len())
                .unwrap_or(0)
        };
        assert_eq!(contents_len(&doc), 2);

        append_content(&mut doc, page_id, b"q Q".to_vec()).unwrap();
        assert_eq!(contents_len(&doc), 3);
    }

    #[test]
    fn test_media_box_reads_page_entry() {
        let doc = Document::load_mem(&create_test_pdf(1)).unwrap();
        let page_id = doc.get_pages()[&1];
        assert_eq!(media_box(&doc, page_id), [0.0, 0.0, 612.0, 792.0]);
        assert_eq!(page_size(&doc, page_id), (612.0, 792.0));
    }

    #[test]
    fn test_media_box_inherits_from_parent() {
        let doc = pdf_with_inherited_attributes();
        let page_id = doc.get_pages()[&1];
        assert_eq!(media_box(&doc, page_id), [0.0, 0.0, 595.0, 842.0]);
    }

    #[test]
    fn test_register_font_creates_resources() {
        let mut doc = Document::load_mem(&create_test_pdf(1)).unwrap();
        let page_id = doc.get_pages()[&1];
        let font_id = add_standard_font(&mut doc, StandardFont::Helvetica);

        register_font(&mut doc, page_id, StandardFont::Helvetica, font_id).unwrap();

        let page = doc.get_object(page_id).and_then(|o| o.as_dict()).unwrap();
        let resources = page
            .get(b"Resources")
            .and_then(|o| o.as_dict())
            .unwrap();
        let fonts = resources.get(b"Font").and_then(|o| o.as_dict()).unwrap();
        assert!(fonts.has(b"Fdeck"));
    }

    #[test]
    fn test_register_font_keeps_inherited_entries() {
        let mut doc = pdf_with_inherited_attributes();
        let page_id = doc.get_pages()[&1];
        let font_id = add_standard_font(&mut doc, StandardFont::HelveticaBold);

        register_font(&mut doc, page_id, StandardFont::HelveticaBold, font_id).unwrap();

        let page = doc.get_object(page_id).and_then(|o| o.as_dict()).unwrap();
        let resources = page
            .get(b"Resources")
            .and_then(|o| o.as_dict())
            .unwrap();
        let fonts = resources.get(b"Font").and_then(|o| o.as_dict()).unwrap();
        assert!(fonts.has(b"F1"), "inherited font entry must survive");
        assert!(fonts.has(b"FdeckB"));
    }

    #[test]
    fn test_register_gstate_sets_alpha() {
        let mut doc = Document::load_mem(&create_test_pdf(1)).unwrap();
        let page_id = doc.get_pages()[&1];
        let gs_id = add_opacity_gstate(&mut doc, 0.3);

        register_gstate(&mut doc, page_id, gs_id).unwrap();

        let gs = doc.get_object(gs_id).and_then(|o| o.as_dict()).unwrap();
        let ca = gs.get(b"ca").and_then(|o| o.as_float()).unwrap();
        assert!((ca - 0.3).abs() < 1e-6);
    }
}
