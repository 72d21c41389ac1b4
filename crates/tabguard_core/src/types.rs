use std::time::SystemTime;

use thiserror::Error;

/// Browser tab identifier as reported by the extension.
pub type TabId = u32;

/// Per-navigation sequence number handed out by the request tracker.
pub type Sequence = u64;

/// One observed URL change on a tab.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavigationEvent {
    pub tab_id: TabId,
    pub url: String,
    pub observed_at: SystemTime,
}

impl NavigationEvent {
    pub fn new(tab_id: TabId, url: impl Into<String>) -> Self {
        Self {
            tab_id,
            url: url.into(),
            observed_at: SystemTime::now(),
        }
    }
}

/// Signals returned by the remote classifier for one URL.
///
/// `ml_probability` is the raw fraction the service reported; it is clamped
/// and scaled only when a verdict is derived from it.
#[derive(Debug, Clone, PartialEq)]
pub struct Classification {
    pub url: String,
    pub dataset_match: bool,
    pub ml_probability: f64,
    pub genai_text: Option<String>,
    pub message: Option<String>,
    /// The service's own `threat` flag. Kept for display, never used for the decision.
    pub reported_threat: Option<bool>,
}

impl Classification {
    pub const DEFAULT_MESSAGE: &'static str = "no threat found by default";

    /// Result used when the service answered but carried none of the expected signals.
    pub fn uninformative(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            dataset_match: false,
            ml_probability: 0.0,
            genai_text: None,
            message: Some(Self::DEFAULT_MESSAGE.to_string()),
            reported_threat: None,
        }
    }
}

/// Classification failures that abort a navigation's verdict computation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClassificationError {
    /// Network failure or timeout; `detail` is for logs only.
    #[error("connection failed")]
    Transport { detail: String },
    #[error("API error {status}")]
    Api { status: u16 },
}

pub type ClassificationResult = Result<Classification, ClassificationError>;
