// PDFShift client - Core Library
//
// Conversion options and results shared by the HTTP client and the CLI.
// Nothing in this crate touches the network.

pub mod models;
pub mod request;

pub use models::*;
pub use request::{ConversionRequest, HeaderValue};
