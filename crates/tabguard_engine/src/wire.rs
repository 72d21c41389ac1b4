use guard_logging::guard_warn;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};

use tabguard_core::Classification;

#[derive(Debug, Serialize)]
pub(crate) struct ClassifyRequest<'a> {
    pub url: &'a str,
}

/// Response body of the classification service. Every field is optional,
/// and a field of the wrong type reads as absent without hiding the others.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct ClassifierResponse {
    #[serde(deserialize_with = "lenient")]
    pub url: Option<String>,
    #[serde(deserialize_with = "lenient")]
    pub threat: Option<bool>,
    #[serde(deserialize_with = "lenient")]
    pub dataset: Option<bool>,
    #[serde(deserialize_with = "lenient")]
    pub malicious_probability: Option<f64>,
    #[serde(deserialize_with = "lenient")]
    pub genai_analysis: Option<String>,
    #[serde(deserialize_with = "lenient")]
    pub message: Option<String>,
}

fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).ok())
}

impl ClassifierResponse {
    /// True when at least one of the decision signals is present.
    pub fn has_signal(&self) -> bool {
        self.malicious_probability.is_some() || self.threat.is_some() || self.dataset.is_some()
    }

    /// Converts the body into a classification for `requested_url`.
    ///
    /// A body without any decision signal becomes the uninformative safe default.
    pub fn into_classification(self, requested_url: &str) -> Classification {
        if !self.has_signal() {
            return Classification::uninformative(requested_url);
        }
        Classification {
            url: requested_url.to_string(),
            dataset_match: self.dataset.unwrap_or(false),
            ml_probability: self.malicious_probability.unwrap_or(0.0),
            genai_text: self.genai_analysis,
            message: self.message,
            reported_threat: self.threat,
        }
    }
}

/// Parses a success body. Undecodable bodies are treated like empty ones.
pub fn parse_response(body: &[u8], requested_url: &str) -> Classification {
    match serde_json::from_slice::<ClassifierResponse>(body) {
        Ok(response) => response.into_classification(requested_url),
        Err(err) => {
            guard_warn!(
                "Undecodable classifier response for {}: {}",
                requested_url,
                err
            );
            Classification::uninformative(requested_url)
        }
    }
}
