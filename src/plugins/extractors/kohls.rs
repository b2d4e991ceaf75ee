use super::pattern::{ExtractionPattern, PatternExtractor};
use crate::models::SourceDefinition;
use crate::Result;

pub const DEFINITION: SourceDefinition = SourceDefinition {
    id: "kohls",
    label: "Kohl's",
    listing_url: "https://www.kohls.com/sale-event/clearance.jsp",
    base_url: "https://www.kohls.com",
};

const SALE_PRICE_PATTERN: &str =
    r#""productTitle":"(?P<name>[^"]{3,160})".{0,500}?"salePrice":"?\$?(?P<price>[0-9.,]+)"?"#;
const REGULAR_PRICE_PATTERN: &str =
    r#""productTitle":"(?P<name>[^"]{3,160})".{0,500}?"price":"?\$?(?P<price>[0-9.,]+)"?"#;
// Product URLs sit outside the title/price window, paired by position.
const PDP_URL_PATTERN: &str = r#""pdpUrl":"(?P<link>[^"]{5,220})""#;

pub fn extractor() -> Result<PatternExtractor> {
    let patterns = vec![
        ExtractionPattern::new(SALE_PRICE_PATTERN)?.with_link_pattern(PDP_URL_PATTERN)?,
        ExtractionPattern::new(REGULAR_PRICE_PATTERN)?.with_link_pattern(PDP_URL_PATTERN)?,
    ];
    PatternExtractor::new(DEFINITION.id, DEFINITION.base_url, patterns)?
        .with_fallback_link(DEFINITION.listing_url)
}
