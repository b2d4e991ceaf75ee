pub mod extractors;
pub mod manager;
pub mod notifiers;
pub mod traits;

pub use manager::ExtractorRegistry;
pub use traits::{ListingExtractor, Notifier};
