mod summary;
pub mod views;

pub use summary::{AccountWithPendencies, PendenciesSummary, PendencyReport};
