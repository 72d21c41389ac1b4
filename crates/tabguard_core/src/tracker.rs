use std::collections::HashMap;

use crate::{Sequence, TabId};

/// Identity of one outgoing classification request.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RequestTicket {
    pub tab_id: TabId,
    pub url: String,
    pub sequence: Sequence,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct TabCursor {
    current_url: String,
    latest_sequence: Sequence,
}

/// Hands out sequence numbers per navigation and decides whether a completed
/// request is still the newest one for its tab.
///
/// Sequences come from one counter shared by all tabs, so they increase
/// strictly per tab and a recycled tab id never sees an old number again.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RequestTracker {
    tabs: HashMap<TabId, TabCursor>,
    last_issued: Sequence,
}

impl RequestTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// True when `url` is what the tab already shows.
    pub fn is_unchanged(&self, tab_id: TabId, url: &str) -> bool {
        self.tabs
            .get(&tab_id)
            .is_some_and(|cursor| cursor.current_url == url)
    }

    /// Records a navigation and issues the ticket for it.
    pub fn begin(&mut self, tab_id: TabId, url: impl Into<String>) -> RequestTicket {
        self.last_issued += 1;
        let url = url.into();
        self.tabs.insert(
            tab_id,
            TabCursor {
                current_url: url.clone(),
                latest_sequence: self.last_issued,
            },
        );
        RequestTicket {
            tab_id,
            url,
            sequence: self.last_issued,
        }
    }

    /// Accept rule: same URL as the tab shows now and the tab's latest sequence.
    pub fn is_current(&self, ticket: &RequestTicket) -> bool {
        self.tabs.get(&ticket.tab_id).is_some_and(|cursor| {
            cursor.current_url == ticket.url && cursor.latest_sequence == ticket.sequence
        })
    }

    pub fn current_url(&self, tab_id: TabId) -> Option<&str> {
        self.tabs
            .get(&tab_id)
            .map(|cursor| cursor.current_url.as_str())
    }

    pub fn latest_sequence(&self, tab_id: TabId) -> Option<Sequence> {
        self.tabs.get(&tab_id).map(|cursor| cursor.latest_sequence)
    }

    pub fn forget(&mut self, tab_id: TabId) {
        self.tabs.remove(&tab_id);
    }
}

