pub mod classifier;
pub mod config;
pub mod diagnostics;
pub mod extractor;
pub mod fallback;
pub mod landmarks;
pub mod ocr;
pub mod reader;
pub mod regions;

#[cfg(test)]
pub mod testing;
