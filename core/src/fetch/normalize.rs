use serde_json::Value;

use crate::model::EquipmentItem;
use crate::prelude::{DashResult, DashboardError};

/// Which response shape the items endpoint answered with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemsShape {
    Flat,
    Paginated,
    Unrecognized,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedItems {
    pub items: Vec<EquipmentItem>,
    pub shape: ItemsShape,
    pub skipped: usize,
}

fn classify(payload: Value) -> (ItemsShape, Vec<Value>) {
    match payload {
        Value::Array(entries) => (ItemsShape::Flat, entries),
        Value::Object(mut envelope) => match envelope.remove("results") {
            Some(Value::Array(entries)) => (ItemsShape::Paginated, entries),
            _ => (ItemsShape::Unrecognized, Vec::new()),
        },
        _ => (ItemsShape::Unrecognized, Vec::new()),
    }
}

/// Accepts a bare array or a paginated `{"results": [...]}` envelope.
///
/// Any other shape yields an empty list, or `UnrecognizedShape` when `strict`
/// is set. Entries that fail validation are dropped individually.
pub fn normalize_items(payload: Value, strict: bool) -> DashResult<NormalizedItems> {
    let (shape, entries) = classify(payload);
    if shape == ItemsShape::Unrecognized {
        if strict {
            return Err(DashboardError::UnrecognizedShape);
        }
        log::warn!("equipment payload has neither array nor results shape; showing no items");
    }

    let mut skipped = 0;
    let items = entries
        .into_iter()
        .enumerate()
        .filter_map(|(idx, entry)| match serde_json::from_value::<EquipmentItem>(entry) {
            Ok(item) => Some(item),
            Err(err) => {
                skipped += 1;
                log::warn!("dropping equipment entry #{idx}: {err}");
                None
            }
        })
        .collect();

    Ok(NormalizedItems {
        items,
        shape,
        skipped,
    })
}
