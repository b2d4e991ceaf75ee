use crate::models::ListingItem;

/// Turns the raw markup of one source's listing page into listing items.
///
/// Implementations are keyed by source id so a source's pattern set can be
/// swapped without touching fetching or notification.
pub trait ListingExtractor: Send + Sync {
    fn source_id(&self) -> &str;

    /// Extract at most `max_items` distinct items in first-seen order.
    ///
    /// An empty result is a valid outcome, not an error.
    fn extract(&self, markup: &str, max_items: usize) -> Vec<ListingItem>;
}
