//! Brazilian Taxpayer Document Validation
//!
//! Pure validators for the two taxpayer registry formats:
//!
//! - [`cpf`]: 11-digit individual registry numbers
//! - [`cnpj`]: 14-digit entity registry numbers
//!
//! Both modules share the same contract: `normalize` strips punctuation,
//! `validate_checksum` runs the modulo-11 check-digit passes, `format`
//! re-punctuates for display, and nothing ever panics or returns an error -
//! malformed input is simply invalid.

pub mod cnpj;
pub mod cpf;

/// Kind of taxpayer document, detected from digit count.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    Cpf,
    Cnpj,
}

/// Detect the document kind from the number of digits after normalization.
///
/// 11 digits reads as CPF, 14 as CNPJ, anything else is unrecognized.
pub fn detect_kind(input: &str) -> Option<DocumentKind> {
    match cpf::normalize(input).len() {
        11 => Some(DocumentKind::Cpf),
        14 => Some(DocumentKind::Cnpj),
        _ => None,
    }
}
