use crate::math::stats::StatsHelper;
use crate::model::EquipmentItem;

/// Pressure (x) against temperature (y) for one item.
#[derive(Debug, Clone, PartialEq)]
pub struct ScatterPoint {
    pub x: f64,
    pub y: f64,
    pub label: String,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AxisBounds {
    pub min: f64,
    pub max: f64,
}

impl AxisBounds {
    /// Position of `value` inside the bounds as `0.0..=1.0`. A degenerate
    /// axis places everything in the middle.
    pub fn normalize(&self, value: f64) -> f64 {
        let span = self.max - self.min;
        if span.abs() < f64::EPSILON {
            0.5
        } else {
            ((value - self.min) / span).clamp(0.0, 1.0)
        }
    }
}

/// One point per item, no deduplication or binning.
#[derive(Debug, Clone, PartialEq)]
pub struct ScatterSeries {
    pub points: Vec<ScatterPoint>,
    pub x_bounds: AxisBounds,
    pub y_bounds: AxisBounds,
}

impl ScatterSeries {
    pub fn from_items(items: &[EquipmentItem]) -> Option<Self> {
        if items.is_empty() {
            return None;
        }

        let points = items
            .iter()
            .map(|item| ScatterPoint {
                x: item.pressure,
                y: item.temperature,
                label: item.equipment_name.clone(),
            })
            .collect::<Vec<_>>();

        let (x_min, x_max) = StatsHelper::bounds(points.iter().map(|p| p.x)).unwrap_or((0.0, 0.0));
        let (y_min, y_max) = StatsHelper::bounds(points.iter().map(|p| p.y)).unwrap_or((0.0, 0.0));

        Some(Self {
            points,
            x_bounds: AxisBounds {
                min: x_min,
                max: x_max,
            },
            y_bounds: AxisBounds {
                min: y_min,
                max: y_max,
            },
        })
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn one_point_per_item_including_duplicates() {
        let items = vec![
            EquipmentItem::new(1, "P-1", "Pump", 10.0, 2.0, 25.0),
            EquipmentItem::new(2, "P-1", "Pump", 10.0, 2.0, 25.0),
            EquipmentItem::new(3, "V-1", "Valve", 5.0, 1.0, 20.0),
        ];
        let series = ScatterSeries::from_items(&items).unwrap();
        assert_eq!(series.len(), items.len());
        assert_eq!(
            series.points[2],
            ScatterPoint {
                x: 1.0,
                y: 20.0,
                label: "V-1".into(),
            }
        );
        assert_eq!(series.x_bounds, AxisBounds { min: 1.0, max: 2.0 });
        assert_eq!(series.y_bounds.normalize(25.0), 1.0);
    }

    #[test]
    fn empty_items_have_no_series() {
        assert!(ScatterSeries::from_items(&[]).is_none());
    }

    #[test]
    fn degenerate_axis_centres_points() {
        let bounds = AxisBounds { min: 3.0, max: 3.0 };
        assert_eq!(bounds.normalize(3.0), 0.5);
    }
}
