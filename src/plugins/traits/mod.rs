pub mod extractor;
pub mod notifier;

pub use extractor::ListingExtractor;
pub use notifier::Notifier;
