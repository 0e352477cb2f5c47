//! Fixed-coordinate layout of a single-page A4 invoice.
//!
//! Coordinates are PDF points with the origin at the bottom-left corner of
//! the page. Nothing is paginated: content that does not fit is drawn past
//! the page edge.

use chrono::NaiveDate;

use super::common::format_long_date;
use super::models::Invoice;
use super::totals::format_amount;

pub const PAGE_WIDTH: f32 = 595.0;
pub const PAGE_HEIGHT: f32 = 842.0;

const MARGIN_LEFT: f32 = 50.0;
const MARGIN_RIGHT: f32 = 545.0;
const AMOUNT_RIGHT: f32 = 535.0;
const PERIOD_X: f32 = 300.0;
const ROW_HEIGHT: f32 = 25.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rgb(pub f32, pub f32, pub f32);

pub const RED: Rgb = Rgb(0.86, 0.2, 0.2);
pub const BLACK: Rgb = Rgb(0.1, 0.1, 0.1);
pub const GRAY: Rgb = Rgb(0.4, 0.4, 0.4);
pub const LIGHT_GRAY: Rgb = Rgb(0.8, 0.8, 0.8);
pub const TABLE_HEADER: Rgb = Rgb(0.95, 0.95, 0.95);
pub const WHITE: Rgb = Rgb(1.0, 1.0, 1.0);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Font {
    Helvetica,
    HelveticaBold,
}

#[derive(Debug, Clone, PartialEq)]
pub enum DrawOp {
    Text {
        text: String,
        x: f32,
        y: f32,
        size: f32,
        font: Font,
        color: Rgb,
    },
    Line {
        start: (f32, f32),
        end: (f32, f32),
        thickness: f32,
        color: Rgb,
    },
    Rect {
        x: f32,
        y: f32,
        width: f32,
        height: f32,
        color: Rgb,
    },
}

/// A page as an ordered list of draw operations.
#[derive(Debug, Clone, PartialEq)]
pub struct Page {
    pub width: f32,
    pub height: f32,
    pub ops: Vec<DrawOp>,
}

impl Page {
    pub fn a4() -> Self {
        Self {
            width: PAGE_WIDTH,
            height: PAGE_HEIGHT,
            ops: Vec::new(),
        }
    }

    pub fn text(&mut self, text: impl Into<String>, x: f32, y: f32, size: f32, font: Font, color: Rgb) {
        self.ops.push(DrawOp::Text {
            text: text.into(),
            x,
            y,
            size,
            font,
            color,
        });
    }

    /// Draw text so that it ends at `right`.
    pub fn text_right(&mut self, text: impl Into<String>, right: f32, y: f32, size: f32, font: Font, color: Rgb) {
        let text = text.into();
        let x = right - text_width(&text, size, font);
        self.text(text, x, y, size, font, color);
    }

    /// Draw text horizontally centered on the page.
    pub fn text_centered(&mut self, text: impl Into<String>, y: f32, size: f32, font: Font, color: Rgb) {
        let text = text.into();
        let x = (self.width - text_width(&text, size, font)) / 2.0;
        self.text(text, x, y, size, font, color);
    }

    pub fn line(&mut self, start: (f32, f32), end: (f32, f32), thickness: f32, color: Rgb) {
        self.ops.push(DrawOp::Line {
            start,
            end,
            thickness,
            color,
        });
    }

    pub fn rect(&mut self, x: f32, y: f32, width: f32, height: f32, color: Rgb) {
        self.ops.push(DrawOp::Rect {
            x,
            y,
            width,
            height,
            color,
        });
    }

    /// All text drawn on the page, in drawing order.
    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.ops.iter().filter_map(|op| match op {
            DrawOp::Text { text, .. } => Some(text.as_str()),
            _ => None,
        })
    }

    pub fn find_text(&self, needle: &str) -> Option<&DrawOp> {
        self.ops
            .iter()
            .find(|op| matches!(op, DrawOp::Text { text, .. } if text == needle))
    }
}

/// Gym details printed on every invoice.
#[derive(Debug, Clone, PartialEq)]
pub struct Branding {
    pub gym_name: String,
    pub tagline: String,
    pub terms: String,
}

impl Default for Branding {
    fn default() -> Self {
        Self::new("XYZ GYM")
    }
}

impl Branding {
    pub fn new(gym_name: impl Into<String>) -> Self {
        Self {
            gym_name: gym_name.into(),
            tagline: "Stay fit, stay strong!".to_string(),
            terms: "Payment is due upon receipt. Memberships are non-refundable and non-transferable."
                .to_string(),
        }
    }
}

/// Lay out the invoice on a single A4 page.
pub fn layout_invoice(invoice: &Invoice, branding: &Branding, issued_on: NaiveDate) -> Page {
    let mut page = Page::a4();
    let height = page.height;

    // Header
    page.text(&branding.gym_name, MARGIN_LEFT, height - 60.0, 32.0, Font::HelveticaBold, RED);
    page.text_right("INVOICE", MARGIN_RIGHT, height - 60.0, 24.0, Font::HelveticaBold, BLACK);
    page.line((MARGIN_LEFT, height - 80.0), (MARGIN_RIGHT, height - 80.0), 2.0, RED);

    page.text(
        format!("Date of Issue: {}", format_long_date(issued_on)),
        MARGIN_LEFT,
        height - 120.0,
        12.0,
        Font::Helvetica,
        GRAY,
    );

    // Bill to
    page.text("BILL TO:", MARGIN_LEFT, height - 170.0, 12.0, Font::HelveticaBold, RED);
    page.text(&invoice.member_name, MARGIN_LEFT, height - 190.0, 14.0, Font::HelveticaBold, BLACK);
    page.text(&invoice.member_email, MARGIN_LEFT, height - 210.0, 11.0, Font::Helvetica, GRAY);
    if let Some(phone) = &invoice.member_phone {
        page.text(phone, MARGIN_LEFT, height - 226.0, 11.0, Font::Helvetica, GRAY);
    }

    // Membership summary
    page.text("MEMBERSHIP:", PERIOD_X + 30.0, height - 170.0, 12.0, Font::HelveticaBold, RED);
    page.text(&invoice.plan_type, PERIOD_X + 30.0, height - 190.0, 14.0, Font::HelveticaBold, BLACK);
    page.text(
        format!(
            "{} to {}",
            format_long_date(invoice.start_date),
            format_long_date(invoice.end_date)
        ),
        PERIOD_X + 30.0,
        height - 210.0,
        11.0,
        Font::Helvetica,
        GRAY,
    );

    // Line-item table
    let table_top = height - 280.0;
    page.rect(MARGIN_LEFT, table_top - 5.0, MARGIN_RIGHT - MARGIN_LEFT, 25.0, TABLE_HEADER);
    page.text("Description", 60.0, table_top, 11.0, Font::HelveticaBold, BLACK);
    page.text("Period", PERIOD_X, table_top, 11.0, Font::HelveticaBold, BLACK);
    page.text_right("Amount", AMOUNT_RIGHT, table_top, 11.0, Font::HelveticaBold, BLACK);

    let mut y = table_top - 35.0;
    for item in &invoice.line_items {
        page.text(&item.description, 60.0, y, 11.0, Font::Helvetica, BLACK);
        if let Some(period) = &item.period {
            page.text(period, PERIOD_X, y, 11.0, Font::Helvetica, GRAY);
        }
        page.text_right(format_amount(item.amount), AMOUNT_RIGHT, y, 11.0, Font::Helvetica, BLACK);
        y -= ROW_HEIGHT;
    }

    page.line((MARGIN_LEFT, y + 5.0), (MARGIN_RIGHT, y + 5.0), 1.0, LIGHT_GRAY);

    // Totals
    y -= 20.0;
    page.text("Subtotal", 350.0, y, 11.0, Font::Helvetica, BLACK);
    page.text_right(format_amount(invoice.totals.subtotal), AMOUNT_RIGHT, y, 11.0, Font::Helvetica, BLACK);

    if invoice.totals.has_discount() {
        y -= 20.0;
        page.text("Discount", 350.0, y, 11.0, Font::Helvetica, BLACK);
        page.text_right(
            format!("-{}", format_amount(invoice.totals.discount)),
            AMOUNT_RIGHT,
            y,
            11.0,
            Font::Helvetica,
            RED,
        );
    }

    y -= 40.0;
    page.rect(300.0, y - 10.0, MARGIN_RIGHT - 300.0, 35.0, RED);
    page.text("TOTAL AMOUNT:", 310.0, y, 12.0, Font::HelveticaBold, WHITE);
    page.text_right(format_amount(invoice.totals.total), AMOUNT_RIGHT, y, 14.0, Font::HelveticaBold, WHITE);

    // Footer
    page.line((MARGIN_LEFT, 125.0), (MARGIN_RIGHT, 125.0), 1.0, LIGHT_GRAY);
    page.text_centered(format!("Terms: {}", branding.terms), 105.0, 9.0, Font::Helvetica, GRAY);
    page.text_centered(
        format!("Thank you for being a valued member of {}!", branding.gym_name),
        80.0,
        11.0,
        Font::Helvetica,
        GRAY,
    );
    page.text_centered(&branding.tagline, 55.0, 10.0, Font::Helvetica, RED);

    page
}

/// Advance width of `text` in points, from the standard Helvetica metrics.
pub fn text_width(text: &str, size: f32, font: Font) -> f32 {
    let units: u32 = text.chars().map(|c| glyph_width(c, font)).sum();
    units as f32 * size / 1000.0
}

// Widths for printable ASCII (0x20..=0x7E) in 1/1000 em.
const HELVETICA_WIDTHS: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278, // ' '../
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 278, 278, 584, 584, 584, 556, // 0..?
    1015, 667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833, 722, 778, // @..O
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 278, 278, 278, 469, 556, // P.._
    333, 556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833, 556, 556, // `..o
    556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500, 334, 260, 334, 584, // p..~
];

const HELVETICA_BOLD_WIDTHS: [u16; 95] = [
    278, 333, 474, 556, 556, 889, 722, 238, 333, 333, 389, 584, 278, 333, 278, 278, // ' '../
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 333, 333, 584, 584, 584, 611, // 0..?
    975, 722, 722, 722, 722, 667, 611, 778, 722, 278, 556, 722, 611, 833, 722, 778, // @..O
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 333, 278, 333, 584, 556, // P.._
    333, 556, 611, 556, 611, 556, 333, 611, 611, 278, 278, 556, 278, 889, 611, 611, // `..o
    611, 611, 389, 556, 333, 611, 556, 778, 556, 556, 500, 389, 280, 389, 584, // p..~
];

// Widths for Latin-1 (0xA0..=0xFF), which WinAnsiEncoding maps one to one.
const HELVETICA_LATIN1_WIDTHS: [u16; 96] = [
    278, 333, 556, 556, 556, 556, 260, 556, 333, 737, 370, 556, 584, 333, 737, 333, // 0xA0
    400, 584, 333, 333, 333, 556, 537, 278, 333, 333, 365, 556, 834, 834, 834, 611, // 0xB0
    667, 667, 667, 667, 667, 667, 1000, 722, 667, 667, 667, 667, 278, 278, 278, 278, // 0xC0
    722, 722, 778, 778, 778, 778, 778, 584, 778, 722, 722, 722, 722, 667, 667, 611, // 0xD0
    556, 556, 556, 556, 556, 556, 889, 500, 556, 556, 556, 556, 278, 278, 278, 278, // 0xE0
    556, 556, 556, 556, 556, 556, 556, 584, 611, 556, 556, 556, 556, 500, 556, 500, // 0xF0
];

const HELVETICA_BOLD_LATIN1_WIDTHS: [u16; 96] = [
    278, 333, 556, 556, 556, 556, 280, 556, 333, 737, 370, 556, 584, 333, 737, 333, // 0xA0
    400, 584, 333, 333, 333, 611, 556, 278, 333, 333, 365, 556, 834, 834, 834, 611, // 0xB0
    722, 722, 722, 722, 722, 722, 1000, 722, 667, 667, 667, 667, 278, 278, 278, 278, // 0xC0
    722, 722, 778, 778, 778, 778, 778, 584, 778, 722, 722, 722, 722, 667, 667, 611, // 0xD0
    556, 556, 556, 556, 556, 556, 889, 556, 556, 556, 556, 556, 278, 278, 278, 278, // 0xE0
    611, 611, 611, 611, 611, 611, 611, 584, 611, 611, 611, 611, 611, 556, 611, 556, // 0xF0
];

/// Width of `c` as the engine encodes it; unmapped characters print as '?'.
fn glyph_width(c: char, font: Font) -> u32 {
    let (ascii, latin1) = match font {
        Font::Helvetica => (&HELVETICA_WIDTHS, &HELVETICA_LATIN1_WIDTHS),
        Font::HelveticaBold => (&HELVETICA_BOLD_WIDTHS, &HELVETICA_BOLD_LATIN1_WIDTHS),
    };
    let bold = font == Font::HelveticaBold;
    let width = match c {
        '\u{0}'..='\u{1f}' | '\u{7f}' => ascii[0],
        ' '..='~' => ascii[c as usize - 0x20],
        '\u{a0}'..='\u{ff}' => latin1[c as usize - 0xa0],
        '€' | '–' => 556,
        '‘' | '’' => if bold { 278 } else { 222 },
        '“' | '”' => if bold { 500 } else { 333 },
        '•' => 350,
        '—' => 1000,
        _ => ascii['?' as usize - 0x20],
    };
    u32::from(width)
}
