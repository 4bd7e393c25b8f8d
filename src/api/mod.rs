pub mod handlers;
pub mod middleware;
pub mod routes;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Body of `POST /text-to-speech`.
///
/// Nothing is validated here: missing, null or mistyped values decode as
/// empty text/voice or an absent speed and go to the provider as-is.
#[derive(Debug, Deserialize)]
pub struct SynthesisRequest {
    #[serde(default, deserialize_with = "lenient_string")]
    pub text: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub voice: String,
    #[serde(default, deserialize_with = "lenient_number")]
    pub speed: Option<f64>,
}

fn lenient_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => s,
        _ => String::new(),
    })
}

fn lenient_number<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Value::deserialize(deserializer)?.as_f64())
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}
