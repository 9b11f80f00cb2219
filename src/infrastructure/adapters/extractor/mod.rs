//! Text Extractor Adapters

mod pptx_extractor;

pub use pptx_extractor::PptxTextExtractor;
