pub mod filter;
pub mod range;

pub use filter::RecordFilter;
pub use range::DateRange;
