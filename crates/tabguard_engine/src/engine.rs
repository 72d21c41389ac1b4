use std::sync::Arc;

use tokio::sync::mpsc;

use tabguard_core::RequestTicket;

use crate::{Classifier, EngineEvent};

/// Dispatches classification requests and collects their completions.
///
/// Requests run concurrently on the current Tokio runtime. Nothing is
/// cancelled when a tab navigates again; the state machine discards
/// superseded completions when they arrive.
pub struct EngineHandle {
    classifier: Arc<dyn Classifier>,
    event_tx: mpsc::UnboundedSender<EngineEvent>,
    event_rx: mpsc::UnboundedReceiver<EngineEvent>,
}

impl EngineHandle {
    pub fn new(classifier: Arc<dyn Classifier>) -> Self {
        let (event_tx, event_rx) = mpsc::unbounded_channel();
        Self {
            classifier,
            event_tx,
            event_rx,
        }
    }

    /// Starts classifying the ticket's URL. Must be called inside a Tokio runtime.
    pub fn enqueue(&self, ticket: RequestTicket) {
        let classifier = self.classifier.clone();
        let event_tx = self.event_tx.clone();
        tokio::spawn(async move {
            let result = classifier.classify(&ticket.url).await;
            let _ = event_tx.send(EngineEvent::ClassificationCompleted { ticket, result });
        });
    }

    /// Waits for the next completion.
    pub async fn recv(&mut self) -> Option<EngineEvent> {
        self.event_rx.recv().await
    }

    pub fn try_recv(&mut self) -> Option<EngineEvent> {
        self.event_rx.try_recv().ok()
    }
}
