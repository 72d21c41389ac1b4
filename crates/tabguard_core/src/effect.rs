use crate::{RequestTicket, TabId, Verdict, VerdictSnapshot};

#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    /// Send the ticket's URL to the classifier.
    Classify(RequestTicket),
    /// Render the installed verdict on the tab.
    Present { tab_id: TabId, verdict: Verdict },
    /// Write the current per-tab records. Failures are logged only.
    PersistVerdicts(VerdictSnapshot),
    /// Drop any per-tab memory held outside the state machine.
    ForgetTab { tab_id: TabId },
}
