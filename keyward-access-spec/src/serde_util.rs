use serde::{Deserialize, Deserializer};
use serde_json::{Map, Value};

/// Decode an optional JSON object, normalizing `null` and absent values to `{}`.
pub fn null_as_empty_map<'de, D>(deserializer: D) -> Result<Map<String, Value>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Map<String, Value>>::deserialize(deserializer)?;
    Ok(value.unwrap_or_default())
}
