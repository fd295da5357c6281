//! Text shown around the charts and table: summary cards and history entries.

pub mod cards;
pub mod history;

pub use cards::{summary_cards, SummaryCard, NO_SUMMARY};
pub use history::{history_line, relative_age};
