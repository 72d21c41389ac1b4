use crate::{Classification, ClassificationError};

/// Probability fraction above which a URL is treated as a threat.
pub const THREAT_THRESHOLD: f64 = 0.5;

pub const DEFAULT_DISPLAY_TEXT: &str = "No known threats detected.";
pub const KNOWN_SAFE_TEXT: &str = "Trusted search results page.";
pub const CONTRADICTION_TEXT: &str =
    "The AI analysis disagrees with a high-confidence detection. The ML/dataset verdict takes precedence.";

/// Which signal decided a verdict.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VerdictSource {
    Dataset,
    Probability,
    /// Classification failed and nothing was installed yet; the tab is assumed safe.
    HeuristicOverride,
    Safe,
    GoogleExempt,
}

impl VerdictSource {
    pub fn as_str(self) -> &'static str {
        match self {
            VerdictSource::Dataset => "DATASET",
            VerdictSource::Probability => "PROBABILITY",
            VerdictSource::HeuristicOverride => "HEURISTIC_OVERRIDE",
            VerdictSource::Safe => "SAFE",
            VerdictSource::GoogleExempt => "GOOGLE_EXEMPT",
        }
    }
}

/// The single threat decision for one URL.
#[derive(Debug, Clone, PartialEq)]
pub struct Verdict {
    pub url: String,
    pub is_threat: bool,
    /// Always on a 0-100 scale, rounded to two decimals.
    pub probability_percent: f64,
    pub display_text: String,
    pub source: VerdictSource,
    /// Raw analysis text as received, for display next to the verdict.
    pub analysis: Option<String>,
}

impl Verdict {
    /// Verdict for a URL matched by the known-safe predicate.
    pub fn known_safe(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            is_threat: false,
            probability_percent: 0.0,
            display_text: KNOWN_SAFE_TEXT.to_string(),
            source: VerdictSource::GoogleExempt,
            analysis: None,
        }
    }

    /// Fail-open verdict for a tab that has no verdict yet and whose classification failed.
    pub fn assumed_safe(url: impl Into<String>, error: &ClassificationError) -> Self {
        Self {
            url: url.into(),
            is_threat: false,
            probability_percent: 0.0,
            display_text: format!("Classification unavailable ({error}); assuming safe."),
            source: VerdictSource::HeuristicOverride,
            analysis: None,
        }
    }

    pub fn dataset_match(&self) -> bool {
        self.source == VerdictSource::Dataset
    }
}

/// Tuning parameters for reconciling the free-text analysis with the numeric signals.
///
/// Only `display_text` is affected; the threat decision never depends on this policy.
#[derive(Debug, Clone, PartialEq)]
pub struct TextPolicy {
    /// Whole words that mark the analysis as contradicting a detection.
    pub negation_tokens: Vec<String>,
    /// Substrings that mark the analysis as hedging.
    pub hedging_phrases: Vec<String>,
    /// Analysis shorter than this many characters is weak.
    pub min_length: usize,
    pub contradiction_floor: f64,
    pub weak_text_floor: f64,
}

impl Default for TextPolicy {
    fn default() -> Self {
        Self {
            negation_tokens: vec!["false".to_string()],
            hedging_phrases: [
                "appears to be legitimate",
                "appears to be a legitimate",
                "always be cautious",
                "cannot determine",
                "can't determine",
                "not enough information",
                "no obvious signs",
                "difficult to say",
                "as an ai",
            ]
            .iter()
            .map(|phrase| phrase.to_string())
            .collect(),
            min_length: 40,
            contradiction_floor: 0.9,
            weak_text_floor: 0.95,
        }
    }
}

impl TextPolicy {
    pub fn contradicts(&self, text: &str) -> bool {
        text.split(|c: char| !c.is_alphanumeric())
            .filter(|word| !word.is_empty())
            .any(|word| {
                self.negation_tokens
                    .iter()
                    .any(|token| token.eq_ignore_ascii_case(word))
            })
    }

    pub fn is_weak(&self, text: &str) -> bool {
        if text.chars().count() < self.min_length {
            return true;
        }
        let lowered = text.to_lowercase();
        self.hedging_phrases
            .iter()
            .any(|phrase| lowered.contains(&phrase.to_lowercase()))
    }
}

/// Merges the classifier's signals into one verdict.
///
/// Dataset match wins over probability; probability above [`THREAT_THRESHOLD`]
/// wins over safe. Text reconciliation runs afterwards and only rewrites the
/// display text.
pub fn merge(result: &Classification, policy: &TextPolicy) -> Verdict {
    let probability = normalized_probability(result.ml_probability);

    let (is_threat, source) = if result.dataset_match {
        (true, VerdictSource::Dataset)
    } else if probability > THREAT_THRESHOLD {
        (true, VerdictSource::Probability)
    } else {
        (false, VerdictSource::Safe)
    };

    let percent = probability_percent(result.ml_probability);
    let analysis = result
        .genai_text
        .as_deref()
        .map(str::trim)
        .filter(|text| !text.is_empty());

    let display_text = match analysis {
        Some(text) if probability >= policy.contradiction_floor && policy.contradicts(text) => {
            CONTRADICTION_TEXT.to_string()
        }
        Some(text) if probability >= policy.weak_text_floor && policy.is_weak(text) => {
            strong_warning(percent)
        }
        Some(text) => text.to_string(),
        None => match result
            .message
            .as_deref()
            .map(str::trim)
            .filter(|message| !message.is_empty())
        {
            Some(message) => message.to_string(),
            None if is_threat => flagged_text(source, percent),
            None => DEFAULT_DISPLAY_TEXT.to_string(),
        },
    };

    Verdict {
        url: result.url.clone(),
        is_threat,
        probability_percent: percent,
        display_text,
        source,
        analysis: analysis.map(ToOwned::to_owned),
    }
}

/// Scales a raw probability fraction to a 0-100 percentage rounded to two decimals.
pub fn probability_percent(raw: f64) -> f64 {
    (normalized_probability(raw) * 10_000.0).round() / 100.0
}

fn normalized_probability(raw: f64) -> f64 {
    if raw.is_nan() {
        0.0
    } else {
        raw.clamp(0.0, 1.0)
    }
}

/// Display text for a threat the classifier sent no wording for.
fn flagged_text(source: VerdictSource, percent: f64) -> String {
    match source {
        VerdictSource::Dataset => "This site is listed in a known-threat dataset.".to_string(),
        _ => format!("This site is {percent:.2}% likely to be malicious."),
    }
}

fn strong_warning(percent: f64) -> String {
    format!(
        "Strong warning: this site is {percent:.2}% likely to be malicious. \
         The AI analysis was inconclusive, so do not enter passwords or payment details here."
    )
}
