use sx_types::Item;

/// Pure inclusion test applied to every fetched item before ranking
pub trait Filter: Send + Sync {
    fn keep(&self, item: &Item) -> bool;
}

/// Keeps only questions that have not been answered yet
#[derive(Debug, Clone, Copy, Default)]
pub struct Unanswered;

impl Filter for Unanswered {
    #[inline]
    fn keep(&self, item: &Item) -> bool {
        !item.is_answered
    }
}

impl<F> Filter for F
where
    F: Fn(&Item) -> bool + Send + Sync,
{
    fn keep(&self, item: &Item) -> bool {
        self(item)
    }
}
