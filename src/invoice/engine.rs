//! PDF rendering engine.
//!
//! Serialises a laid-out `Page` into a single-page PDF document that uses the
//! standard Helvetica fonts, so no font files are embedded.

use chrono::NaiveDate;
use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, ObjectId, Stream};

use super::common::invoice_filename;
use super::layout::{DrawOp, Font, Page, Rgb};
use super::{GeneratedDocument, InvoiceError};

const PDF_VERSION: &str = "1.5";
const PRODUCER: &str = concat!(env!("CARGO_PKG_NAME"), " ", env!("CARGO_PKG_VERSION"));

/// Stateless engine for rendering pages to PDF.
pub struct PdfRenderEngine;

impl PdfRenderEngine {
    /// Render a page to a PDF document.
    ///
    /// # Arguments
    /// * `page` - The laid-out page.
    /// * `title` - Document title stored in the PDF info dictionary.
    /// * `member_name` - Used to build the download filename.
    /// * `issued_on` - Issue date, stored as the creation date.
    pub fn render(
        page: &Page,
        title: &str,
        member_name: &str,
        issued_on: NaiveDate,
    ) -> Result<GeneratedDocument, InvoiceError> {
        let pdf = Self::encode(page, title, issued_on)?;

        Ok(GeneratedDocument {
            filename: invoice_filename(member_name),
            pdf,
            issued_on,
        })
    }

    /// Encode the page as PDF bytes.
    pub fn encode(page: &Page, title: &str, issued_on: NaiveDate) -> Result<Vec<u8>, InvoiceError> {
        let mut doc = Document::with_version(PDF_VERSION);
        let pages_id = doc.new_object_id();

        let regular_id = add_font(&mut doc, "Helvetica");
        let bold_id = add_font(&mut doc, "Helvetica-Bold");
        let resources_id = doc.add_object(dictionary! {
            "Font" => dictionary! {
                font_resource(Font::Helvetica) => regular_id,
                font_resource(Font::HelveticaBold) => bold_id,
            },
        });

        let operations: Vec<Operation> = page.ops.iter().flat_map(operations_for).collect();
        let content = Content { operations };
        let encoded = content
            .encode()
            .map_err(|e| InvoiceError::Pdf(e.to_string()))?;
        let content_id = doc.add_object(Stream::new(dictionary! {}, encoded));

        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
            "Resources" => resources_id,
        });

        let pages = dictionary! {
            "Type" => "Pages",
            "Kids" => vec![page_id.into()],
            "Count" => 1,
            "MediaBox" => vec![0.into(), 0.into(), page.width.into(), page.height.into()],
        };
        doc.objects.insert(pages_id, Object::Dictionary(pages));

        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        let info_id = doc.add_object(dictionary! {
            "Title" => Object::string_literal(encode_text(title)),
            "Producer" => Object::string_literal(PRODUCER),
            "CreationDate" => Object::string_literal(issued_on.format("D:%Y%m%d000000").to_string()),
        });
        doc.trailer.set("Root", catalog_id);
        doc.trailer.set("Info", info_id);

        let mut buffer = Vec::new();
        doc.save_to(&mut buffer)
            .map_err(|e| InvoiceError::Pdf(e.to_string()))?;

        log::debug!("Encoded PDF '{}' ({} bytes, {} draw ops)", title, buffer.len(), page.ops.len());
        Ok(buffer)
    }
}

fn add_font(doc: &mut Document, base_font: &str) -> ObjectId {
    doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => base_font,
        "Encoding" => "WinAnsiEncoding",
    })
}

fn font_resource(font: Font) -> &'static str {
    match font {
        Font::Helvetica => "F1",
        Font::HelveticaBold => "F2",
    }
}

fn color_operands(color: Rgb) -> Vec<Object> {
    vec![color.0.into(), color.1.into(), color.2.into()]
}

fn operations_for(op: &DrawOp) -> Vec<Operation> {
    match op {
        DrawOp::Text {
            text,
            x,
            y,
            size,
            font,
            color,
        } => vec![
            Operation::new("BT", vec![]),
            Operation::new("Tf", vec![font_resource(*font).into(), (*size).into()]),
            Operation::new("rg", color_operands(*color)),
            Operation::new("Td", vec![(*x).into(), (*y).into()]),
            Operation::new("Tj", vec![Object::string_literal(encode_text(text))]),
            Operation::new("ET", vec![]),
        ],
        DrawOp::Line {
            start,
            end,
            thickness,
            color,
        } => vec![
            Operation::new("q", vec![]),
            Operation::new("w", vec![(*thickness).into()]),
            Operation::new("RG", color_operands(*color)),
            Operation::new("m", vec![start.0.into(), start.1.into()]),
            Operation::new("l", vec![end.0.into(), end.1.into()]),
            Operation::new("S", vec![]),
            Operation::new("Q", vec![]),
        ],
        DrawOp::Rect {
            x,
            y,
            width,
            height,
            color,
        } => vec![
            Operation::new("q", vec![]),
            Operation::new("rg", color_operands(*color)),
            Operation::new("re", vec![(*x).into(), (*y).into(), (*width).into(), (*height).into()]),
            Operation::new("f", vec![]),
            Operation::new("Q", vec![]),
        ],
    }
}

/// Encode text for a WinAnsiEncoding font.
///
/// Latin-1 characters map to themselves, a few common typographic characters
/// map to their WinAnsi code points, control characters become spaces and
/// everything else becomes '?'.
pub fn encode_text(text: &str) -> Vec<u8> {
    text.chars()
        .map(|c| match c {
            '\u{0}'..='\u{1f}' | '\u{7f}' => b' ',
            ' '..='~' | '\u{a0}'..='\u{ff}' => c as u8,
            '€' => 0x80,
            '‘' => 0x91,
            '’' => 0x92,
            '“' => 0x93,
            '”' => 0x94,
            '•' => 0x95,
            '–' => 0x96,
            '—' => 0x97,
            _ => b'?',
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::invoice::layout::{BLACK, RED};

    fn sample_page() -> Page {
        let mut page = Page::a4();
        page.text("XYZ GYM", 50.0, 782.0, 32.0, Font::HelveticaBold, RED);
        page.text("Jane Doe", 50.0, 652.0, 14.0, Font::Helvetica, BLACK);
        page.line((50.0, 762.0), (545.0, 762.0), 2.0, RED);
        page.rect(300.0, 400.0, 245.0, 35.0, RED);
        page
    }

    fn issued() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 18).unwrap()
    }

    #[test]
    fn test_encode_produces_loadable_single_page_pdf() {
        let pdf = PdfRenderEngine::encode(&sample_page(), "Invoice", issued()).unwrap();
        assert!(pdf.starts_with(b"%PDF-1.5"));

        let doc = Document::load_mem(&pdf).unwrap();
        assert_eq!(doc.get_pages().len(), 1);
    }

    #[test]
    fn test_content_stream_contains_text() {
        let pdf = PdfRenderEngine::encode(&sample_page(), "Invoice", issued()).unwrap();
        let haystack = String::from_utf8_lossy(&pdf);
        assert!(haystack.contains("(XYZ GYM)"));
        assert!(haystack.contains("(Jane Doe)"));
        assert!(haystack.contains("Helvetica-Bold"));
        assert!(haystack.contains("WinAnsiEncoding"));
    }

    #[test]
    fn test_render_sets_filename() {
        let document = PdfRenderEngine::render(&sample_page(), "Invoice", "Jane Doe", issued()).unwrap();
        assert_eq!(document.filename, "invoice-Jane-Doe.pdf");
        assert_eq!(document.issued_on, issued());
        assert!(!document.pdf.is_empty());
    }

    #[test]
    fn test_empty_page_still_encodes() {
        let pdf = PdfRenderEngine::encode(&Page::a4(), "Blank", issued()).unwrap();
        assert!(Document::load_mem(&pdf).is_ok());
    }

    #[test]
    fn test_encode_text() {
        assert_eq!(encode_text("Jane Doe"), b"Jane Doe".to_vec());
        assert_eq!(encode_text("Zoë"), vec![b'Z', b'o', 0xEB]);
        assert_eq!(encode_text("€5 – ok"), vec![0x80, b'5', b' ', 0x96, b' ', b'o', b'k']);
        assert_eq!(encode_text("a\tb"), b"a b".to_vec());
        assert_eq!(encode_text("日本"), b"??".to_vec());
    }
}
