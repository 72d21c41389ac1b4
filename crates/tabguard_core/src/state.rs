use crate::{
    KnownSafeList, RequestTracker, TabId, TabStateStore, TextPolicy, Verdict, VerdictSnapshot,
};

/// Static settings for the watcher.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct WatcherSettings {
    pub known_safe: KnownSafeList,
    pub text_policy: TextPolicy,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct WatcherState {
    settings: WatcherSettings,
    tracker: RequestTracker,
    store: TabStateStore,
}

impl WatcherState {
    pub fn new(settings: WatcherSettings) -> Self {
        Self {
            settings,
            tracker: RequestTracker::new(),
            store: TabStateStore::new(),
        }
    }

    pub fn settings(&self) -> &WatcherSettings {
        &self.settings
    }

    pub fn tracker(&self) -> &RequestTracker {
        &self.tracker
    }

    pub fn store(&self) -> &TabStateStore {
        &self.store
    }

    pub fn verdict(&self, tab_id: TabId) -> Option<&Verdict> {
        self.store.get(tab_id)
    }

    pub fn snapshot(&self) -> VerdictSnapshot {
        self.store.snapshot()
    }

    pub(crate) fn parts_mut(
        &mut self,
    ) -> (&WatcherSettings, &mut RequestTracker, &mut TabStateStore) {
        (&self.settings, &mut self.tracker, &mut self.store)
    }
}
