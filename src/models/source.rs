use url::Url;

/// A retail listing page known at compile time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SourceDefinition {
    pub id: &'static str,
    pub label: &'static str,
    pub listing_url: &'static str,
    pub base_url: &'static str,
}

/// A source as configured for one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Source {
    pub id: String,
    pub label: String,
    pub url: Url,
    pub max_items: usize,
}

impl Source {
    pub fn new(id: impl Into<String>, label: impl Into<String>, url: Url, max_items: usize) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            url,
            max_items,
        }
    }
}
