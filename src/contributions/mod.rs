pub mod aggregator;
pub mod model;
pub mod query;

pub use aggregator::Aggregator;
pub use query::DateRange;
