use serde::{Deserialize, Deserializer, Serialize};

/// Top level of an export file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExportDocument {
    pub data: Option<ExportData>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExportData {
    pub metrics: Option<Vec<Metric>>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Metric {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub data: Option<Vec<RawRecord>>,
}

/// One sleep record as exported. Every field may be absent; validation
/// decides whether the record is usable.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawRecord {
    pub source: Option<String>,
    /// `None` when the key is absent, `Some(Value::Null)` for an explicit null
    #[serde(default, deserialize_with = "present")]
    pub qty: Option<serde_json::Value>,
    pub start_date: Option<String>,
    pub value: Option<String>,
    pub end_date: Option<String>,
}

fn present<'de, D>(deserializer: D) -> Result<Option<serde_json::Value>, D::Error>
where
    D: Deserializer<'de>,
{
    serde_json::Value::deserialize(deserializer).map(Some)
}

impl RawRecord {
    /// Quantity as a float. A missing quantity counts as zero; a null or
    /// non-numeric one is invalid.
    pub fn quantity(&self) -> Option<f64> {
        match &self.qty {
            None => Some(0.0),
            Some(value) => value.as_f64().filter(|q| q.is_finite()),
        }
    }
}
