pub mod listing;
pub mod outcome;
pub mod source;

// Re-exports for convenience
pub use listing::*;
pub use outcome::*;
pub use source::*;
