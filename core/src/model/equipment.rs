use serde::{Deserialize, Deserializer, Serialize};

/// One equipment reading row belonging to a dataset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EquipmentItem {
    pub id: i64,
    pub equipment_name: String,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(deserialize_with = "measure")]
    pub flowrate: f64,
    #[serde(deserialize_with = "measure")]
    pub pressure: f64,
    #[serde(deserialize_with = "measure")]
    pub temperature: f64,
}

impl EquipmentItem {
    pub fn new(
        id: i64,
        equipment_name: impl Into<String>,
        kind: impl Into<String>,
        flowrate: f64,
        pressure: f64,
        temperature: f64,
    ) -> Self {
        Self {
            id,
            equipment_name: equipment_name.into(),
            kind: kind.into(),
            flowrate,
            pressure,
            temperature,
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum NumberOrText {
    Number(f64),
    Text(String),
}

/// Accepts a JSON number or numeric text. Decimal fields serialized as strings
/// must still sort numerically.
pub(crate) fn measure<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    match NumberOrText::deserialize(deserializer)? {
        NumberOrText::Number(value) => Ok(value),
        NumberOrText::Text(text) => text
            .trim()
            .parse::<f64>()
            .map_err(|_| serde::de::Error::custom(format!("non-numeric measure {text:?}"))),
    }
}

pub(crate) fn measures<'de, D>(deserializer: D) -> Result<Vec<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    struct Wrapped(#[serde(deserialize_with = "measure")] f64);

    let values = Vec::<Wrapped>::deserialize(deserializer)?;
    Ok(values.into_iter().map(|Wrapped(value)| value).collect())
}
