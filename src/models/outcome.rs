use super::ListingItem;

/// What happened to one source during a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    ItemsFound(Vec<ListingItem>),
    Empty,
    FetchError(String),
    NotifyError(String),
}

impl RunOutcome {
    pub fn from_items(items: Vec<ListingItem>) -> Self {
        if items.is_empty() {
            RunOutcome::Empty
        } else {
            RunOutcome::ItemsFound(items)
        }
    }

    pub fn item_count(&self) -> usize {
        match self {
            RunOutcome::ItemsFound(items) => items.len(),
            _ => 0,
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, RunOutcome::FetchError(_) | RunOutcome::NotifyError(_))
    }
}
