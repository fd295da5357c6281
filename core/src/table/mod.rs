pub mod format;
pub mod pager;
pub mod sort;

pub use format::{format_measure, row_cells};
pub use pager::{PageSize, PageView, SortedPager, PAGINATION_THRESHOLD};
pub use sort::{sort_rows, SortDirection, SortKey};
