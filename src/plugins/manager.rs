use std::collections::HashMap;
use std::sync::Arc;

use super::extractors::{kohls, walmart};
use super::traits::ListingExtractor;
use crate::utils::error::AppError;

pub type ExtractorHandle = Arc<dyn ListingExtractor>;

/// Listing extractors keyed by source id. Built once at startup.
#[derive(Clone, Default)]
pub struct ExtractorRegistry {
    extractors: HashMap<String, ExtractorHandle>,
}

impl ExtractorRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry holding every built-in source's extractor.
    pub fn with_builtin() -> Result<Self, AppError> {
        let mut registry = Self::new();
        registry.register(Arc::new(walmart::extractor()?));
        registry.register(Arc::new(kohls::extractor()?));
        Ok(registry)
    }

    /// Register an extractor, replacing any previous one for the same source.
    pub fn register(&mut self, extractor: ExtractorHandle) {
        let source_id = extractor.source_id().to_string();
        if self.extractors.insert(source_id.clone(), extractor).is_some() {
            tracing::debug!(source = %source_id, "replaced extractor");
        }
    }

    pub fn get(&self, source_id: &str) -> Result<ExtractorHandle, AppError> {
        self.extractors
            .get(source_id)
            .cloned()
            .ok_or_else(|| AppError::UnknownSource {
                id: source_id.to_string(),
            })
    }
}
