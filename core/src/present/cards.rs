use crate::model::Summary;

pub const NO_SUMMARY: &str = "No summary available for this dataset.";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SummaryCard {
    pub title: &'static str,
    pub value: String,
    pub unit: Option<&'static str>,
}

impl SummaryCard {
    pub fn display_value(&self) -> String {
        match self.unit {
            Some(unit) => format!("{} {unit}", self.value),
            None => self.value.clone(),
        }
    }
}

/// Total count plus the three averages, one decimal each.
pub fn summary_cards(summary: &Summary) -> [SummaryCard; 4] {
    let averages = summary.averages;
    [
        SummaryCard {
            title: "Total Equipment",
            value: summary.total_count.to_string(),
            unit: None,
        },
        SummaryCard {
            title: "Avg Flowrate",
            value: format!("{:.1}", averages.flowrate),
            unit: Some("m³/h"),
        },
        SummaryCard {
            title: "Avg Pressure",
            value: format!("{:.1}", averages.pressure),
            unit: Some("Bar"),
        },
        SummaryCard {
            title: "Avg Temperature",
            value: format!("{:.1}", averages.temperature),
            unit: Some("°C"),
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Averages;

    #[test]
    fn cards_round_to_one_decimal() {
        let summary = Summary {
            total_count: 15,
            averages: Averages {
                flowrate: 119.8,
                pressure: 6.1066,
                temperature: 117.466,
            },
            ..Default::default()
        };
        let cards = summary_cards(&summary);
        assert_eq!(cards[0].display_value(), "15");
        assert_eq!(cards[1].display_value(), "119.8 m³/h");
        assert_eq!(cards[2].display_value(), "6.1 Bar");
        assert_eq!(cards[3].display_value(), "117.5 °C");
    }
}
