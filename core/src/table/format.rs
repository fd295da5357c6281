use crate::model::EquipmentItem;
use crate::table::sort::SortKey;

/// Table cells show measures with exactly two decimals. Stored values keep
/// their full precision.
pub fn format_measure(value: f64) -> String {
    format!("{value:.2}")
}

pub fn cell(item: &EquipmentItem, key: SortKey) -> String {
    match key {
        SortKey::EquipmentName => item.equipment_name.clone(),
        SortKey::Type => item.kind.clone(),
        SortKey::Flowrate => format_measure(item.flowrate),
        SortKey::Pressure => format_measure(item.pressure),
        SortKey::Temperature => format_measure(item.temperature),
    }
}

/// All cells of a row in column order.
pub fn row_cells(item: &EquipmentItem) -> [String; 5] {
    SortKey::ALL.map(|key| cell(item, key))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn measures_render_with_two_decimals() {
        assert_eq!(format_measure(5.0), "5.00");
        assert_eq!(format_measure(120.456), "120.46");
        assert_eq!(format_measure(-0.5), "-0.50");
    }

    #[test]
    fn row_cells_follow_column_order() {
        let item = EquipmentItem::new(1, "Pump-1", "Pump", 120.0, 5.25, 110.126);
        assert_eq!(
            row_cells(&item),
            [
                "Pump-1".to_string(),
                "Pump".to_string(),
                "120.00".to_string(),
                "5.25".to_string(),
                "110.13".to_string(),
            ]
        );
    }
}
