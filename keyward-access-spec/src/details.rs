//! The open detail document attached to every secret.
//!
//! Details are a string-keyed JSON object merged from declared defaults and
//! caller input; the caller wins on key collision and unspecified defaults
//! survive.

use serde_json::{Map, Value};

pub const DETAIL_CERT_FILE_NAME: &str = "certFileName";
pub const DETAIL_ACCOUNT_DOMAIN: &str = "account_domain";
pub const DETAIL_EPHEMERAL_USER_DATA: &str = "ephemeral_domain_user_data";

/// Defaults applied to every newly created secret.
pub fn default_secret_details() -> Map<String, Value> {
    let mut details = Map::new();
    details.insert(
        DETAIL_CERT_FILE_NAME.to_string(),
        Value::String(String::new()),
    );
    details.insert(
        DETAIL_ACCOUNT_DOMAIN.to_string(),
        Value::String("local".to_string()),
    );
    details.insert(
        DETAIL_EPHEMERAL_USER_DATA.to_string(),
        Value::Object(Map::new()),
    );
    details
}

/// Merge `overlay` over `base` key-by-key; overlay wins on collision.
pub fn merge_details(base: Map<String, Value>, overlay: &Map<String, Value>) -> Map<String, Value> {
    let mut merged = base;
    for (key, value) in overlay {
        merged.insert(key.clone(), value.clone());
    }
    merged
}

/// The `account_domain` detail value, when present and textual.
pub fn account_domain(details: &Map<String, Value>) -> Option<&str> {
    details.get(DETAIL_ACCOUNT_DOMAIN).and_then(Value::as_str)
}
