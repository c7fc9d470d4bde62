//! Pagination, sorting, and search over normalized results
//!
//! All three apply to the full record set in a fixed order: filter, then
//! sort, then the pager slices the visible page.

pub mod pager;
pub mod search;
pub mod sort;

pub use pager::{Pager, DEFAULT_PAGE_SIZE, PAGE_OPTIONS};
pub use search::{FreeTextFilter, RecordFilter};
pub use sort::Sorter;
