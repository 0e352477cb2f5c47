//! Generator for membership invoices.

use chrono::NaiveDate;

use super::common::today;
use super::engine::PdfRenderEngine;
use super::layout::{layout_invoice, Branding};
use super::models::{Invoice, InvoiceRequest};
use super::traits::Generator;
use super::{GeneratedDocument, InvoiceError};

/// Generator for single-page membership invoices.
#[derive(Debug, Clone, Default)]
pub struct InvoiceGenerator {
    branding: Branding,
}

impl InvoiceGenerator {
    pub fn new(branding: Branding) -> Self {
        Self { branding }
    }

    /// Generate the invoice as if issued on `issued_on`.
    pub fn generate_on(
        &self,
        request: &InvoiceRequest,
        issued_on: NaiveDate,
    ) -> Result<GeneratedDocument, InvoiceError> {
        let invoice = Invoice::try_from(request)?;
        let page = layout_invoice(&invoice, &self.branding, issued_on);
        let title = format!("{} Invoice - {}", self.branding.gym_name, invoice.member_name);

        let document = PdfRenderEngine::render(&page, &title, &invoice.member_name, issued_on)?;
        log::info!(
            "Generated invoice {} for {} ({} line item(s))",
            document.filename,
            invoice.plan_type,
            invoice.line_items.len()
        );
        Ok(document)
    }
}

impl Generator<InvoiceRequest> for InvoiceGenerator {
    /// Generate the invoice, issued today.
    fn generate(&self, request: InvoiceRequest) -> Result<GeneratedDocument, InvoiceError> {
        self.generate_on(&request, today())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::invoice::validation::ValidationErrors;

    fn request() -> InvoiceRequest {
        InvoiceRequest {
            member_name: "Jane Doe".to_string(),
            member_email: "jane@example.com".to_string(),
            plan_type: "Quarterly".to_string(),
            amount: Some("249.00".into()),
            start_date: "2026-10-01".to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_generate_on() {
        let generator = InvoiceGenerator::default();
        let issued = NaiveDate::from_ymd_opt(2026, 10, 18).unwrap();

        let document = generator.generate_on(&request(), issued).unwrap();
        assert_eq!(document.filename, "invoice-Jane-Doe.pdf");
        assert_eq!(document.issued_on, issued);
        assert!(document.pdf.starts_with(b"%PDF-"));

        let content = String::from_utf8_lossy(&document.pdf);
        assert!(content.contains("($249.00)"));
        assert!(content.contains("(Date of Issue: October 18, 2026)"));
    }

    #[test]
    fn test_generate_rejects_invalid_request() {
        let generator = InvoiceGenerator::new(Branding::new("Iron Temple"));
        let mut req = request();
        req.amount = Some("ninety".into());

        match generator.generate(req) {
            Err(InvoiceError::Validation(errors)) => {
                let errors: ValidationErrors = errors;
                assert!(errors.has_field("amount"));
            }
            other => panic!("expected validation error, got {other:?}"),
        }
    }
}
