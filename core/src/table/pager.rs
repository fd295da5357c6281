use serde::{Deserialize, Serialize};
use std::fmt;

use crate::model::EquipmentItem;
use crate::prelude::DashboardError;
use crate::table::sort::{sort_rows, SortDirection, SortKey};

/// Pagination controls are hidden entirely at or below this many items.
pub const PAGINATION_THRESHOLD: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "usize", into = "usize")]
pub enum PageSize {
    #[default]
    Ten,
    Twenty,
    Thirty,
    Fifty,
}

impl PageSize {
    pub const ALL: [PageSize; 4] = [
        PageSize::Ten,
        PageSize::Twenty,
        PageSize::Thirty,
        PageSize::Fifty,
    ];

    pub fn get(self) -> usize {
        match self {
            PageSize::Ten => 10,
            PageSize::Twenty => 20,
            PageSize::Thirty => 30,
            PageSize::Fifty => 50,
        }
    }
}

impl TryFrom<usize> for PageSize {
    type Error = DashboardError;

    fn try_from(value: usize) -> Result<Self, Self::Error> {
        PageSize::ALL
            .into_iter()
            .find(|size| size.get() == value)
            .ok_or_else(|| {
                DashboardError::Config(format!("page size must be 10, 20, 30 or 50 (got {value})"))
            })
    }
}

impl From<PageSize> for usize {
    fn from(size: PageSize) -> Self {
        size.get()
    }
}

impl fmt::Display for PageSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.get())
    }
}

/// Client-side sort and window state for the detail table.
///
/// The pager never owns the rows: every call to [`SortedPager::page`] sorts
/// the current snapshot, which keeps it trivially consistent with whatever
/// item list the controller holds.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SortedPager {
    sort_key: Option<SortKey>,
    sort_direction: SortDirection,
    page_index: usize,
    page_size: PageSize,
}

/// One rendered window of the sorted rows plus pagination metadata.
#[derive(Debug, Clone, PartialEq)]
pub struct PageView<'a> {
    pub rows: Vec<&'a EquipmentItem>,
    pub page_index: usize,
    pub page_count: usize,
    pub page_size: PageSize,
    pub total: usize,
    pub show_controls: bool,
}

impl PageView<'_> {
    /// 1-based index of the first row shown, 0 when the table is empty.
    pub fn first_row(&self) -> usize {
        if self.rows.is_empty() {
            0
        } else {
            self.page_index * self.page_size.get() + 1
        }
    }

    pub fn last_row(&self) -> usize {
        self.page_index * self.page_size.get() + self.rows.len()
    }

    pub fn can_previous(&self) -> bool {
        self.page_index > 0
    }

    pub fn can_next(&self) -> bool {
        self.page_index + 1 < self.page_count
    }

    pub fn range_caption(&self) -> String {
        format!(
            "Showing {} to {} of {} entries",
            self.first_row(),
            self.last_row(),
            self.total
        )
    }

    pub fn page_caption(&self) -> String {
        format!("Page {} of {}", self.page_index + 1, self.page_count.max(1))
    }
}

impl SortedPager {
    pub fn new(page_size: PageSize) -> Self {
        Self {
            page_size,
            ..Default::default()
        }
    }

    pub fn sort_key(&self) -> Option<SortKey> {
        self.sort_key
    }

    pub fn sort_direction(&self) -> SortDirection {
        self.sort_direction
    }

    /// Direction shown on a column header.
    pub fn direction_for(&self, key: SortKey) -> SortDirection {
        if self.sort_key == Some(key) {
            self.sort_direction
        } else {
            SortDirection::Unsorted
        }
    }

    pub fn page_index(&self) -> usize {
        self.page_index
    }

    pub fn page_size(&self) -> PageSize {
        self.page_size
    }

    /// Header click: the active column advances its direction, any other
    /// column starts ascending.
    pub fn toggle_sort(&mut self, key: SortKey) {
        let direction = if self.sort_key == Some(key) {
            self.sort_direction.next()
        } else {
            SortDirection::Ascending
        };
        self.set_sort(Some(key), direction);
    }

    pub fn set_sort(&mut self, key: Option<SortKey>, direction: SortDirection) {
        match (key, direction) {
            (Some(key), SortDirection::Ascending | SortDirection::Descending) => {
                self.sort_key = Some(key);
                self.sort_direction = direction;
            }
            _ => {
                self.sort_key = None;
                self.sort_direction = SortDirection::Unsorted;
            }
        }
        self.page_index = 0;
    }

    pub fn set_page_size(&mut self, page_size: PageSize) {
        self.page_size = page_size;
        self.page_index = 0;
    }

    /// Called when the item snapshot is replaced.
    pub fn rewind(&mut self) {
        self.page_index = 0;
    }

    pub fn page_count(&self, total: usize) -> usize {
        total.div_ceil(self.page_size.get())
    }

    pub fn first(&mut self) {
        self.page_index = 0;
    }

    pub fn previous(&mut self) {
        self.page_index = self.page_index.saturating_sub(1);
    }

    pub fn next(&mut self, total: usize) {
        if self.page_index + 1 < self.page_count(total) {
            self.page_index += 1;
        }
    }

    pub fn last(&mut self, total: usize) {
        self.page_index = self.page_count(total).saturating_sub(1);
    }

    pub fn go_to(&mut self, page_index: usize, total: usize) {
        self.page_index = page_index.min(self.page_count(total).saturating_sub(1));
    }

    /// Sorts the snapshot and cuts out the current window. The stored index
    /// is clamped into range, so a list shorter than one page always shows
    /// every row.
    pub fn page<'a>(&self, items: &'a [EquipmentItem]) -> PageView<'a> {
        let total = items.len();
        let page_count = self.page_count(total);
        let page_index = self.page_index.min(page_count.saturating_sub(1));
        let size = self.page_size.get();

        let rows = sort_rows(items, self.sort_key, self.sort_direction)
            .into_iter()
            .skip(page_index * size)
            .take(size)
            .collect::<Vec<_>>();

        PageView {
            rows,
            page_index,
            page_count,
            page_size: self.page_size,
            total,
            show_controls: total > PAGINATION_THRESHOLD,
        }
    }
}
