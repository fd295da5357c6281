use serde::{Deserialize, Serialize};

use crate::model::equipment::measures;

/// Per-type averages for one bar group.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartBar {
    pub label: String,
    pub flowrate: f64,
    pub pressure: f64,
}

/// Server-computed per-type aggregate, stored as one record per label so the
/// label/value alignment cannot drift.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChartSeries {
    pub bars: Vec<ChartBar>,
}

/// Parallel-array wire shape produced by the chart endpoint.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ChartSeriesWire {
    #[serde(default)]
    pub labels: Vec<String>,
    #[serde(default, deserialize_with = "measures")]
    pub flowrate: Vec<f64>,
    #[serde(default, deserialize_with = "measures")]
    pub pressure: Vec<f64>,
}

impl ChartSeries {
    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    /// Zips the parallel arrays. Arrays of unequal length are truncated to the
    /// shortest one; an empty label list means "no chart".
    pub fn from_wire(wire: ChartSeriesWire) -> Option<Self> {
        let aligned = wire
            .labels
            .len()
            .min(wire.flowrate.len())
            .min(wire.pressure.len());
        if aligned != wire.labels.len()
            || aligned != wire.flowrate.len()
            || aligned != wire.pressure.len()
        {
            log::warn!(
                "chart arrays misaligned (labels {}, flowrate {}, pressure {}); keeping {}",
                wire.labels.len(),
                wire.flowrate.len(),
                wire.pressure.len(),
                aligned
            );
        }

        let bars = wire
            .labels
            .into_iter()
            .zip(wire.flowrate)
            .zip(wire.pressure)
            .map(|((label, flowrate), pressure)| ChartBar {
                label,
                flowrate,
                pressure,
            })
            .collect::<Vec<_>>();

        if bars.is_empty() {
            None
        } else {
            Some(Self { bars })
        }
    }

    /// Decodes an untrusted chart payload.
    pub fn from_value(value: serde_json::Value) -> Option<Self> {
        match serde_json::from_value::<ChartSeriesWire>(value) {
            Ok(wire) => Self::from_wire(wire),
            Err(err) => {
                log::warn!("chart payload rejected: {err}");
                None
            }
        }
    }
}
