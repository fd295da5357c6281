use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use crate::model::EquipmentItem;
use crate::prelude::DashboardError;

/// Sortable table columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortKey {
    EquipmentName,
    Type,
    Flowrate,
    Pressure,
    Temperature,
}

impl SortKey {
    pub const ALL: [SortKey; 5] = [
        SortKey::EquipmentName,
        SortKey::Type,
        SortKey::Flowrate,
        SortKey::Pressure,
        SortKey::Temperature,
    ];

    pub fn header(self) -> &'static str {
        match self {
            SortKey::EquipmentName => "Equipment Name",
            SortKey::Type => "Type",
            SortKey::Flowrate => "Flowrate (m³/h)",
            SortKey::Pressure => "Pressure (Bar)",
            SortKey::Temperature => "Temperature (°C)",
        }
    }

    pub fn is_numeric(self) -> bool {
        matches!(
            self,
            SortKey::Flowrate | SortKey::Pressure | SortKey::Temperature
        )
    }

    /// Ascending comparison. Text columns use natural order ("Pump-2" before
    /// "Pump-10"); measures compare numerically with a total order so NaN
    /// readings cannot break the sort.
    pub fn compare(self, a: &EquipmentItem, b: &EquipmentItem) -> Ordering {
        match self {
            SortKey::EquipmentName => natural_cmp(&a.equipment_name, &b.equipment_name),
            SortKey::Type => natural_cmp(&a.kind, &b.kind),
            SortKey::Flowrate => a.flowrate.total_cmp(&b.flowrate),
            SortKey::Pressure => a.pressure.total_cmp(&b.pressure),
            SortKey::Temperature => a.temperature.total_cmp(&b.temperature),
        }
    }
}

/// Case-insensitive comparison where runs of digits compare by value.
/// Strings that only differ in case or leading zeros fall back to byte order.
fn natural_cmp(a: &str, b: &str) -> Ordering {
    let mut left = a.chars().peekable();
    let mut right = b.chars().peekable();
    loop {
        let ordering = match (left.peek().copied(), right.peek().copied()) {
            (None, None) => return a.cmp(b),
            (None, Some(_)) => return Ordering::Less,
            (Some(_), None) => return Ordering::Greater,
            (Some(l), Some(r)) if l.is_ascii_digit() && r.is_ascii_digit() => {
                let l = digit_run(&mut left);
                let r = digit_run(&mut right);
                l.len().cmp(&r.len()).then_with(|| l.cmp(&r))
            }
            (Some(l), Some(r)) => {
                left.next();
                right.next();
                l.to_lowercase().cmp(r.to_lowercase())
            }
        };
        if ordering != Ordering::Equal {
            return ordering;
        }
    }
}

fn digit_run(chars: &mut std::iter::Peekable<std::str::Chars<'_>>) -> String {
    let mut run = String::new();
    while let Some(digit) = chars.next_if(char::is_ascii_digit) {
        run.push(digit);
    }
    run.trim_start_matches('0').to_string()
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SortKey::EquipmentName => "name",
            SortKey::Type => "type",
            SortKey::Flowrate => "flowrate",
            SortKey::Pressure => "pressure",
            SortKey::Temperature => "temperature",
        };
        f.write_str(name)
    }
}

impl FromStr for SortKey {
    type Err = DashboardError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "name" | "equipment_name" => Ok(SortKey::EquipmentName),
            "type" => Ok(SortKey::Type),
            "flowrate" => Ok(SortKey::Flowrate),
            "pressure" => Ok(SortKey::Pressure),
            "temperature" => Ok(SortKey::Temperature),
            other => Err(DashboardError::Config(format!("unknown sort column {other:?}"))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SortDirection {
    #[default]
    Unsorted,
    Ascending,
    Descending,
}

impl SortDirection {
    /// Header toggle cycle: unsorted, ascending, descending, unsorted.
    pub fn next(self) -> Self {
        match self {
            SortDirection::Unsorted => SortDirection::Ascending,
            SortDirection::Ascending => SortDirection::Descending,
            SortDirection::Descending => SortDirection::Unsorted,
        }
    }

    pub fn indicator(self) -> &'static str {
        match self {
            SortDirection::Unsorted => "⇅",
            SortDirection::Ascending => "↑",
            SortDirection::Descending => "↓",
        }
    }
}

/// Stable sort of borrowed rows. Descending reverses the key comparison only,
/// so ties keep their input order in both directions.
pub fn sort_rows<'a>(
    items: &'a [EquipmentItem],
    key: Option<SortKey>,
    direction: SortDirection,
) -> Vec<&'a EquipmentItem> {
    let mut rows: Vec<&EquipmentItem> = items.iter().collect();
    match (key, direction) {
        (Some(key), SortDirection::Ascending) => rows.sort_by(|a, b| key.compare(a, b)),
        (Some(key), SortDirection::Descending) => rows.sort_by(|a, b| key.compare(a, b).reverse()),
        _ => {}
    }
    rows
}
