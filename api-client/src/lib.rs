// PDFShift API client library
//
// This crate submits conversion requests built with `pdfshift-core` to the
// PDFShift service and maps its responses to typed errors.

pub mod config;
pub mod errors;
pub mod http_client;

// Re-export commonly used items
pub use config::ClientConfig;
pub use errors::{classify, ErrorKind, PdfShiftError};
pub use http_client::{Conversion, ConvertOutcome, PdfShiftClient};
pub use pdfshift_core::*;
