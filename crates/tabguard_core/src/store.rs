use std::collections::BTreeMap;

use crate::{Sequence, TabId, Verdict};

/// The installed verdict for one tab.
#[derive(Debug, Clone, PartialEq)]
pub struct TabState {
    pub tab_id: TabId,
    pub current_url: String,
    pub verdict: Verdict,
    pub last_sequence: Sequence,
}

/// Record shown by the popup surfaces.
#[derive(Debug, Clone, PartialEq)]
pub struct DisplayRecord {
    pub url: String,
    pub message: String,
    /// 0-100 scale.
    pub malicious_probability: f64,
    pub threat: bool,
    pub dataset: bool,
    pub genai_analysis: Option<String>,
}

impl From<&Verdict> for DisplayRecord {
    fn from(verdict: &Verdict) -> Self {
        Self {
            url: verdict.url.clone(),
            message: verdict.display_text.clone(),
            malicious_probability: verdict.probability_percent,
            threat: verdict.is_threat,
            dataset: verdict.dataset_match(),
            genai_analysis: verdict.analysis.clone(),
        }
    }
}

/// Everything that gets persisted: the latest installed result plus one record per open tab.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct VerdictSnapshot {
    pub latest: Option<DisplayRecord>,
    pub tabs: BTreeMap<TabId, DisplayRecord>,
}

/// One verdict per tab, replaced only by writes with a sequence at least as new.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TabStateStore {
    tabs: BTreeMap<TabId, TabState>,
    latest: Option<TabId>,
}

impl TabStateStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Installs `verdict` unless the tab already holds a newer one.
    ///
    /// Returns whether the verdict was installed.
    pub fn accept(&mut self, tab_id: TabId, verdict: Verdict, sequence: Sequence) -> bool {
        if let Some(existing) = self.tabs.get(&tab_id) {
            if sequence < existing.last_sequence {
                return false;
            }
        }
        self.tabs.insert(
            tab_id,
            TabState {
                tab_id,
                current_url: verdict.url.clone(),
                verdict,
                last_sequence: sequence,
            },
        );
        self.latest = Some(tab_id);
        true
    }

    pub fn get(&self, tab_id: TabId) -> Option<&Verdict> {
        self.tabs.get(&tab_id).map(|state| &state.verdict)
    }

    pub fn state(&self, tab_id: TabId) -> Option<&TabState> {
        self.tabs.get(&tab_id)
    }

    pub fn remove(&mut self, tab_id: TabId) -> Option<TabState> {
        if self.latest == Some(tab_id) {
            self.latest = None;
        }
        self.tabs.remove(&tab_id)
    }

    pub fn len(&self) -> usize {
        self.tabs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tabs.is_empty()
    }

    pub fn snapshot(&self) -> VerdictSnapshot {
        VerdictSnapshot {
            latest: self
                .latest
                .and_then(|tab_id| self.tabs.get(&tab_id))
                .map(|state| DisplayRecord::from(&state.verdict)),
            tabs: self
                .tabs
                .iter()
                .map(|(tab_id, state)| (*tab_id, DisplayRecord::from(&state.verdict)))
                .collect(),
        }
    }
}
