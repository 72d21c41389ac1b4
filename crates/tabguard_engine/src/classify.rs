use std::time::Duration;

use guard_logging::guard_debug;
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use tabguard_core::{ClassificationError, ClassificationResult};

use crate::wire::{parse_response, ClassifyRequest};
use crate::EngineError;

pub const DEFAULT_ENDPOINT: &str = "http://127.0.0.1:5000/analyze";

#[derive(Debug, Clone)]
pub struct ClassifierSettings {
    pub endpoint: String,
    pub connect_timeout: Duration,
    /// Bound on the whole exchange, body included.
    pub request_timeout: Duration,
}

impl Default for ClassifierSettings {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            connect_timeout: Duration::from_secs(5),
            request_timeout: Duration::from_secs(10),
        }
    }
}

#[async_trait::async_trait]
pub trait Classifier: Send + Sync {
    /// One attempt, no retries. Every failure comes back as a value.
    async fn classify(&self, url: &str) -> ClassificationResult;
}

#[derive(Debug, Clone)]
pub struct ReqwestClassifier {
    client: reqwest::Client,
    endpoint: reqwest::Url,
}

impl ReqwestClassifier {
    pub fn new(settings: ClassifierSettings) -> Result<Self, EngineError> {
        let endpoint =
            reqwest::Url::parse(&settings.endpoint).map_err(|err| EngineError::InvalidEndpoint {
                endpoint: settings.endpoint.clone(),
                reason: err.to_string(),
            })?;
        let client = reqwest::Client::builder()
            .connect_timeout(settings.connect_timeout)
            .timeout(settings.request_timeout)
            .build()
            .map_err(|err| EngineError::Client(err.to_string()))?;
        Ok(Self { client, endpoint })
    }

    pub fn endpoint(&self) -> &reqwest::Url {
        &self.endpoint
    }
}

#[async_trait::async_trait]
impl Classifier for ReqwestClassifier {
    async fn classify(&self, url: &str) -> ClassificationResult {
        let body = serde_json::to_vec(&ClassifyRequest { url }).map_err(|err| {
            ClassificationError::Transport {
                detail: err.to_string(),
            }
        })?;

        let response = self
            .client
            .post(self.endpoint.clone())
            .header(CONTENT_TYPE, "application/json")
            .header(ACCEPT, "application/json")
            .body(body)
            .send()
            .await
            .map_err(map_reqwest_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(ClassificationError::Api {
                status: status.as_u16(),
            });
        }

        let bytes = response.bytes().await.map_err(map_reqwest_error)?;
        guard_debug!("Classifier answered {} bytes for {}", bytes.len(), url);
        Ok(parse_response(&bytes, url))
    }
}

fn map_reqwest_error(err: reqwest::Error) -> ClassificationError {
    let detail = if err.is_timeout() {
        format!("timeout: {err}")
    } else {
        err.to_string()
    };
    ClassificationError::Transport { detail }
}
