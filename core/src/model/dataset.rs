use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::prelude::DatasetId;

/// Server-side snapshot attached to each listed dataset.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DatasetStats {
    #[serde(default)]
    pub total_equipment_count: u64,
}

/// One uploaded CSV batch as listed by the history endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
    pub id: DatasetId,
    pub filename: String,
    pub uploaded_at: DateTime<Utc>,
    #[serde(default, deserialize_with = "lenient_stats")]
    pub summary: DatasetStats,
}

impl Dataset {
    pub fn item_count(&self) -> u64 {
        self.summary.total_equipment_count
    }

    /// Decodes the history listing. A non-array payload yields an empty list
    /// and malformed entries are dropped individually.
    pub fn list_from_value(value: serde_json::Value) -> Vec<Self> {
        let entries = match value {
            serde_json::Value::Array(entries) => entries,
            other => {
                log::warn!("dataset list is not an array ({}); showing none", kind_of(&other));
                return Vec::new();
            }
        };
        entries
            .into_iter()
            .filter_map(|entry| match serde_json::from_value::<Dataset>(entry) {
                Ok(dataset) => Some(dataset),
                Err(err) => {
                    log::warn!("skipping malformed dataset entry: {err}");
                    None
                }
            })
            .collect()
    }
}

fn kind_of(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "bool",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}

// A dataset whose summary failed to compute server-side arrives with `{}` or
// `null`; neither should hide the dataset from the history list.
fn lenient_stats<'de, D>(deserializer: D) -> Result<DatasetStats, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(value
        .and_then(|value| serde_json::from_value(value).ok())
        .unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn dataset_decodes_history_entry() {
        let dataset: Dataset = serde_json::from_value(json!({
            "id": 7,
            "filename": "plant.csv",
            "uploaded_at": "2024-03-01T09:30:00.123456Z",
            "summary": {"total_equipment_count": 15, "average_flowrate": 12.5}
        }))
        .unwrap();
        assert_eq!(dataset.id, DatasetId(7));
        assert_eq!(dataset.item_count(), 15);
    }

    #[test]
    fn dataset_tolerates_missing_or_broken_summary() {
        let missing: Dataset = serde_json::from_value(json!({
            "id": 1,
            "filename": "a.csv",
            "uploaded_at": "2024-03-01T09:30:00Z"
        }))
        .unwrap();
        assert_eq!(missing.item_count(), 0);

        let broken: Dataset = serde_json::from_value(json!({
            "id": 2,
            "filename": "b.csv",
            "uploaded_at": "2024-03-01T09:30:00Z",
            "summary": {"total_equipment_count": "many"}
        }))
        .unwrap();
        assert_eq!(broken.item_count(), 0);
    }

    #[test]
    fn list_skips_malformed_entries() {
        let list = Dataset::list_from_value(json!([
            {"id": 4, "filename": "ok.csv", "uploaded_at": "2024-03-01T09:30:00Z"},
            {"id": "x", "filename": "bad.csv"},
            {"id": 5, "filename": "ok2.csv", "uploaded_at": "2024-03-02T09:30:00Z"}
        ]));
        let ids: Vec<_> = list.iter().map(|dataset| dataset.id).collect();
        assert_eq!(ids, vec![DatasetId(4), DatasetId(5)]);
    }

    #[test]
    fn list_non_array_is_empty() {
        assert!(Dataset::list_from_value(json!({"results": []})).is_empty());
        assert!(Dataset::list_from_value(json!(null)).is_empty());
    }
}
