//! Invoice arithmetic and currency display.

const CURRENCY_SYMBOL: &str = "$";

/// Subtotal, discount and total of an invoice, in dollars.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InvoiceTotals {
    pub subtotal: f64,
    pub discount: f64,
    pub total: f64,
}

impl InvoiceTotals {
    /// subtotal = base + additional; total = subtotal - discount.
    ///
    /// Missing additional amount and discount count as zero.
    pub fn compute(base: f64, additional: Option<f64>, discount: Option<f64>) -> Self {
        let subtotal = base + additional.unwrap_or(0.0);
        let discount = discount.unwrap_or(0.0);
        Self {
            subtotal,
            discount,
            total: subtotal - discount,
        }
    }

    pub fn has_discount(&self) -> bool {
        self.discount > 0.0
    }

    /// Compared in whole cents, as the amounts are displayed.
    pub fn discount_exceeds_subtotal(&self) -> bool {
        to_cents(self.discount) > to_cents(self.subtotal)
    }

    /// False when the sum of finite amounts overflowed.
    pub fn is_finite(&self) -> bool {
        self.subtotal.is_finite() && self.total.is_finite()
    }
}

fn to_cents(value: f64) -> f64 {
    (value * 100.0).round()
}

/// Format an amount with two decimals and a currency symbol, e.g. "$99.99".
///
/// Values that round to zero print as "$0.00", never "$-0.00".
pub fn format_amount(value: f64) -> String {
    let rounded = format!("{:.2}", value);
    if rounded.trim_start_matches('-').chars().all(|c| c == '0' || c == '.') {
        return format!("{}0.00", CURRENCY_SYMBOL);
    }

    match rounded.strip_prefix('-') {
        Some(magnitude) => format!("-{}{}", CURRENCY_SYMBOL, magnitude),
        None => format!("{}{}", CURRENCY_SYMBOL, rounded),
    }
}
