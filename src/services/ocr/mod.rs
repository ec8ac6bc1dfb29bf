pub mod engine;
pub mod template_matcher;

// Re-export main types
pub use engine::{
    AffixDecoder, AffixRequest, AspectDecoder, DecodeFailure, ItemTypeDecoder, TemplateLocator,
    TypeReading,
};
pub use template_matcher::{Template, TemplateMatcher};
