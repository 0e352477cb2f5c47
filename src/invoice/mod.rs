//! Invoice module - validation, layout and PDF rendering of membership invoices.
//!
//! The pipeline runs in four steps:
//! - `validation` checks the raw request and collects every problem found
//! - `models` turns the request into a validated `Invoice` with its `totals`
//! - `layout` places the invoice on a fixed A4 `Page` of draw operations
//! - `engine` serialises the page into PDF bytes

pub mod common;
pub mod engine;
pub mod generator;
pub mod handlers;
pub mod layout;
pub mod models;
pub mod totals;
pub mod traits;
pub mod validation;

pub use engine::PdfRenderEngine;
pub use generator::InvoiceGenerator;
pub use layout::Branding;
pub use models::{Invoice, InvoiceRequest, InvoiceResponse};
pub use traits::{Generator, Validator};

use chrono::NaiveDate;
use thiserror::Error;

use validation::ValidationErrors;

/// Errors that can occur during invoice generation.
#[derive(Debug, Error)]
pub enum InvoiceError {
    #[error("invalid invoice request: {0}")]
    Validation(#[from] ValidationErrors),
    #[error("failed to encode PDF document: {0}")]
    Pdf(String),
}

/// Result of a successful invoice generation.
#[derive(Debug)]
pub struct GeneratedDocument {
    pub filename: String,
    pub pdf: Vec<u8>,
    pub issued_on: NaiveDate,
}
