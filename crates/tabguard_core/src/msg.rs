use crate::{ClassificationResult, NavigationEvent, RequestTicket, TabId};

#[derive(Debug, Clone, PartialEq)]
pub enum Msg {
    /// The browser reported a URL change on a tab.
    Navigated(NavigationEvent),
    /// The classifier answered (or failed) for an earlier request.
    ClassificationCompleted {
        ticket: RequestTicket,
        result: ClassificationResult,
    },
    /// The browser closed a tab.
    TabClosed { tab_id: TabId },
    /// Fallback for placeholder wiring.
    NoOp,
}
