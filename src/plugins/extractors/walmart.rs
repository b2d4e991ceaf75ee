use super::pattern::{ExtractionPattern, PatternExtractor};
use crate::models::SourceDefinition;
use crate::Result;

pub const DEFINITION: SourceDefinition = SourceDefinition {
    id: "walmart",
    label: "Walmart",
    listing_url: "https://www.walmart.com/search?q=clearance&sort=price_low",
    base_url: "https://www.walmart.com",
};

// Search results embed one JSON object per tile in the page state blob.
const ITEM_PATTERN: &str =
    r#""name":"(?P<name>[^"]+?)".*?"price":\{"price":(?P<price>[0-9.]+).*?"canonicalUrl":"(?P<link>[^"]+?)""#;

pub fn extractor() -> Result<PatternExtractor> {
    PatternExtractor::new(
        DEFINITION.id,
        DEFINITION.base_url,
        vec![ExtractionPattern::new(ITEM_PATTERN)?],
    )
}
