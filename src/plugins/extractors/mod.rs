// Built-in listing extractors, one per retail source
pub mod kohls;
pub mod pattern;
pub mod walmart;

pub use pattern::{ExtractionPattern, PatternExtractor};

use crate::models::SourceDefinition;

pub const BUILTIN_SOURCES: &[SourceDefinition] = &[walmart::DEFINITION, kohls::DEFINITION];

pub fn builtin_definition(id: &str) -> Option<&'static SourceDefinition> {
    BUILTIN_SOURCES.iter().find(|def| def.id == id)
}
