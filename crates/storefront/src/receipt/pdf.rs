//! In-process receipt PDF rendering.
//!
//! US Letter, portrait, half-inch margins, Helvetica. Rows that do not fit on
//! the first page continue on following pages; the total is printed after the
//! last row.
//!
//! The base-14 fonts only cover `WinAnsiEncoding`, so prices are printed
//! with `Tk` instead of the taka sign and other characters outside Latin-1
//! become `?`.

use lopdf::content::{Content, Operation};
use lopdf::{Dictionary, Document, Object, ObjectId, Stream, dictionary};

use erashid_core::Price;

use super::{ReceiptError, ReceiptView};

const PAGE_WIDTH: i64 = 612;
const PAGE_HEIGHT: i64 = 792;
const MARGIN: i64 = 36;

const TITLE_SIZE: i64 = 18;
const BODY_SIZE: i64 = 11;
const ROW_HEIGHT: i64 = 18;

/// Left edge of each table column: item, quantity, unit price, subtotal.
const COLUMNS: [i64; 4] = [MARGIN, 340, 400, 490];
const MAX_NAME_CHARS: usize = 48;

const REGULAR_FONT: &str = "F1";
const BOLD_FONT: &str = "F2";

/// Render `receipt` to PDF bytes.
///
/// # Errors
///
/// Returns [`ReceiptError::Render`] if the document cannot be encoded.
pub fn render(receipt: &ReceiptView) -> Result<Vec<u8>, ReceiptError> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let regular_id = doc.add_object(font("Helvetica"));
    let bold_id = doc.add_object(font("Helvetica-Bold"));
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! {
            REGULAR_FONT => regular_id,
            BOLD_FONT => bold_id,
        },
    });

    let mut page_ids = Vec::new();
    for content in layout(receipt) {
        let encoded = content
            .encode()
            .map_err(|e| ReceiptError::Render(e.to_string()))?;
        let content_id = doc.add_object(Stream::new(dictionary! {}, encoded));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
        });
        page_ids.push(page_id);
    }

    let page_count = i64::try_from(page_ids.len()).unwrap_or(i64::MAX);
    let pages = dictionary! {
        "Type" => "Pages",
        "Kids" => page_ids.into_iter().map(Object::from).collect::<Vec<_>>(),
        "Count" => Object::Integer(page_count),
        "Resources" => resources_id,
        "MediaBox" => vec![
            Object::Integer(0),
            Object::Integer(0),
            Object::Integer(PAGE_WIDTH),
            Object::Integer(PAGE_HEIGHT),
        ],
    };
    doc.objects.insert(pages_id, Object::Dictionary(pages));

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);
    set_info(&mut doc, receipt);
    doc.compress();

    let mut bytes = Vec::new();
    doc.save_to(&mut bytes)
        .map_err(|e| ReceiptError::Render(e.to_string()))?;
    Ok(bytes)
}

fn font(base: &str) -> Dictionary {
    dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => base,
        "Encoding" => "WinAnsiEncoding",
    }
}

fn set_info(doc: &mut Document, receipt: &ReceiptView) {
    let info_id: ObjectId = doc.add_object(dictionary! {
        "Title" => Object::string_literal("e-Rashid Receipt"),
        "Subject" => Object::string_literal(encode_text(&receipt.date)),
        "Producer" => Object::string_literal("erashid-storefront"),
    });
    doc.trailer.set("Info", info_id);
}

/// Split the receipt into one content stream per page.
fn layout(receipt: &ReceiptView) -> Vec<Content> {
    let mut pages = Vec::new();
    let mut page = PageWriter::new();

    page.text(BOLD_FONT, TITLE_SIZE, MARGIN, "e-Rashid Receipt");
    page.advance(ROW_HEIGHT + 6);
    page.text(REGULAR_FONT, BODY_SIZE, MARGIN, &format!("Date: {}", receipt.date));
    page.advance(ROW_HEIGHT * 2);
    page.table_header();

    for line in &receipt.lines {
        if !page.has_room_for(1) {
            pages.push(page.finish());
            page = PageWriter::new();
            page.table_header();
        }
        let cells = [
            truncate_name(&line.name),
            line.quantity.to_string(),
            pdf_money(line.unit_price),
            pdf_money(line.subtotal),
        ];
        page.row(REGULAR_FONT, &cells);
    }

    // Total needs a rule plus one row
    if !page.has_room_for(2) {
        pages.push(page.finish());
        page = PageWriter::new();
    }
    page.rule();
    page.advance(6);
    page.text(BOLD_FONT, BODY_SIZE, COLUMNS[2], "Total");
    page.text(BOLD_FONT, BODY_SIZE, COLUMNS[3], &pdf_money(receipt.total));
    pages.push(page.finish());

    pages
}

/// Accumulates operations for one page, tracking the baseline from the top.
struct PageWriter {
    operations: Vec<Operation>,
    y: i64,
}

impl PageWriter {
    const fn new() -> Self {
        Self {
            operations: Vec::new(),
            y: PAGE_HEIGHT - MARGIN - TITLE_SIZE,
        }
    }

    fn has_room_for(&self, rows: i64) -> bool {
        self.y - rows * ROW_HEIGHT >= MARGIN
    }

    fn advance(&mut self, by: i64) {
        self.y -= by;
    }

    fn text(&mut self, font: &str, size: i64, x: i64, text: &str) {
        self.operations.extend([
            Operation::new("BT", vec![]),
            Operation::new("Tf", vec![Object::from(font), Object::Integer(size)]),
            Operation::new("Td", vec![Object::Integer(x), Object::Integer(self.y)]),
            Operation::new("Tj", vec![Object::string_literal(encode_text(text))]),
            Operation::new("ET", vec![]),
        ]);
    }

    fn row(&mut self, font: &str, cells: &[String; 4]) {
        for (x, cell) in COLUMNS.iter().zip(cells) {
            self.text(font, BODY_SIZE, *x, cell);
        }
        self.advance(ROW_HEIGHT);
    }

    fn table_header(&mut self) {
        let headers = ["Item", "Qty", "Price", "Subtotal"].map(String::from);
        self.row(BOLD_FONT, &headers);
        self.rule();
        self.advance(6);
    }

    /// Horizontal line just above the current baseline.
    fn rule(&mut self) {
        let y = self.y + ROW_HEIGHT - 4;
        self.operations.extend([
            Operation::new("w", vec![Object::Real(0.5)]),
            Operation::new("m", vec![Object::Integer(MARGIN), Object::Integer(y)]),
            Operation::new(
                "l",
                vec![Object::Integer(PAGE_WIDTH - MARGIN), Object::Integer(y)],
            ),
            Operation::new("S", vec![]),
        ]);
    }

    fn finish(self) -> Content {
        Content {
            operations: self.operations,
        }
    }
}

/// The base fonts cannot show the taka sign.
fn pdf_money(price: Price) -> String {
    price.format_with("Tk ")
}

fn truncate_name(name: &str) -> String {
    if name.chars().count() <= MAX_NAME_CHARS {
        return name.to_string();
    }
    let mut truncated: String = name.chars().take(MAX_NAME_CHARS - 3).collect();
    truncated.push_str("...");
    truncated
}

/// Encode text as Latin-1 bytes, substituting `?` for anything else.
fn encode_text(text: &str) -> Vec<u8> {
    text.chars()
        .map(|c| u8::try_from(u32::from(c)).unwrap_or(b'?'))
        .collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::receipt::ReceiptLineView;

    fn receipt(rows: usize) -> ReceiptView {
        ReceiptView {
            lines: (0..rows)
                .map(|i| ReceiptLineView {
                    name: format!("Item {i}"),
                    quantity: 1,
                    unit_price: Price::from(10),
                    subtotal: Price::from(10),
                })
                .collect(),
            total: Price::from(10 * u32::try_from(rows).unwrap()),
            item_count: u32::try_from(rows).unwrap(),
            date: "3 March 2026, 02:05 PM".to_string(),
        }
    }

    #[test]
    fn test_render_produces_pdf() {
        let bytes = render(&receipt(2)).unwrap();
        assert!(bytes.starts_with(b"%PDF-1.5"));

        let doc = Document::load_mem(&bytes).unwrap();
        assert_eq!(doc.get_pages().len(), 1);
    }

    #[test]
    fn test_long_receipt_spans_pages() {
        let bytes = render(&receipt(120)).unwrap();
        let doc = Document::load_mem(&bytes).unwrap();
        assert!(doc.get_pages().len() >= 3);
    }

    #[test]
    fn test_layout_page_count_matches_rows() {
        assert_eq!(layout(&receipt(1)).len(), 1);
        assert!(layout(&receipt(60)).len() > 1);
    }

    #[test]
    fn test_pdf_money_uses_tk() {
        assert_eq!(pdf_money(Price::from(250)), "Tk 250.00");
    }

    #[test]
    fn test_encode_text_latin1() {
        assert_eq!(encode_text("Café"), vec![b'C', b'a', b'f', 0xE9]);
        assert_eq!(encode_text("চা"), b"??".to_vec());
    }

    #[test]
    fn test_truncate_name() {
        assert_eq!(truncate_name("Tea"), "Tea");
        let long = "x".repeat(80);
        let truncated = truncate_name(&long);
        assert_eq!(truncated.chars().count(), MAX_NAME_CHARS);
        assert!(truncated.ends_with("..."));
    }
}
