//! OCR Engine Adapters.
//!
//! - `TesseractOcr` - Runs the Tesseract CLI on a temp file
//! - `MockOcr` - Canned results for testing

mod mock_ocr;
mod tesseract;

pub use mock_ocr::{MockOcr, MockOcrResult};
pub use tesseract::{TesseractConfig, TesseractOcr};
