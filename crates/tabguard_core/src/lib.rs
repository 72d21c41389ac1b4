//! Tabguard core: pure verdict logic and the per-tab navigation state machine.
mod effect;
mod known_safe;
mod msg;
mod presentation;
mod state;
mod store;
mod tracker;
mod types;
mod update;
mod verdict;

pub use effect::Effect;
pub use known_safe::{KnownSafeList, KnownSafeRule};
pub use msg::Msg;
pub use presentation::{
    plan_presentation, Alert, AlertSeverity, IconSet, TabPresentation, SAFE_ICONS, SAFE_POPUP,
    THREAT_POPUP, WARNING_ICONS,
};
pub use state::{WatcherSettings, WatcherState};
pub use store::{DisplayRecord, TabState, TabStateStore, VerdictSnapshot};
pub use tracker::{RequestTicket, RequestTracker};
pub use types::{
    Classification, ClassificationError, ClassificationResult, NavigationEvent, Sequence, TabId,
};
pub use update::update;
pub use verdict::{
    merge, probability_percent, TextPolicy, Verdict, VerdictSource, CONTRADICTION_TEXT,
    DEFAULT_DISPLAY_TEXT, KNOWN_SAFE_TEXT, THREAT_THRESHOLD,
};
