//! Traits shared by request validation and document generation.

use super::validation::ValidationErrors;
use super::{GeneratedDocument, InvoiceError};

/// Trait for validating request objects.
pub trait Validator {
    /// Validate the state of the object, collecting every problem found.
    fn validate(&self) -> Result<(), ValidationErrors>;
}

/// Trait for document generators.
pub trait Generator<Req> {
    /// Generate a document from the request.
    fn generate(&self, request: Req) -> Result<GeneratedDocument, InvoiceError>;
}
