use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Mean measures across every item of a dataset.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Averages {
    pub flowrate: f64,
    pub pressure: f64,
    pub temperature: f64,
}

/// Read-only statistics snapshot computed by the service for one dataset.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Summary {
    pub total_count: u64,
    pub averages: Averages,
    pub type_distribution: BTreeMap<String, u64>,
}

impl Summary {
    /// Decodes an untrusted payload. Anything that is not a summary object
    /// renders as "no summary" instead of failing the whole detail load.
    pub fn from_value(value: serde_json::Value) -> Option<Self> {
        if !value.is_object() {
            log::warn!("summary payload is not an object; treating as absent");
            return None;
        }
        match serde_json::from_value(value) {
            Ok(summary) => Some(summary),
            Err(err) => {
                log::warn!("summary payload rejected: {err}");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn summary_defaults_missing_fields() {
        let summary = Summary::from_value(json!({
            "dataset_id": 3,
            "total_count": 12,
            "averages": {"flowrate": 10.5}
        }))
        .unwrap();
        assert_eq!(summary.total_count, 12);
        assert_eq!(summary.averages.flowrate, 10.5);
        assert_eq!(summary.averages.pressure, 0.0);
        assert!(summary.type_distribution.is_empty());
    }

    #[test]
    fn summary_non_object_is_absent() {
        assert!(Summary::from_value(json!([1, 2, 3])).is_none());
        assert!(Summary::from_value(json!(null)).is_none());
        assert!(Summary::from_value(json!({"total_count": "lots"})).is_none());
    }
}
