//! Client-side chart views derived from the loaded item list.
//!
//! Everything here is a pure function of the items; views are recomputed on
//! every render rather than cached.

pub mod distribution;
pub mod palette;
pub mod scatter;

pub use distribution::{DistributionSlice, TypeDistribution};
pub use palette::{Rgba, Swatch, PALETTE};
pub use scatter::{AxisBounds, ScatterPoint, ScatterSeries};

use crate::model::EquipmentItem;

/// Both derived views for one item snapshot.
#[derive(Debug, Clone, PartialEq)]
pub struct DerivedCharts {
    pub distribution: Option<TypeDistribution>,
    pub scatter: Option<ScatterSeries>,
}

pub fn derive(items: &[EquipmentItem]) -> DerivedCharts {
    DerivedCharts {
        distribution: TypeDistribution::from_items(items),
        scatter: ScatterSeries::from_items(items),
    }
}
