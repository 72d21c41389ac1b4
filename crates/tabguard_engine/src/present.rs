use std::collections::HashMap;
use std::io;

use thiserror::Error;

use tabguard_core::{plan_presentation, Alert, IconSet, TabId, TabPresentation, Verdict};

#[derive(Debug, Error)]
pub enum SurfaceError {
    #[error("surface closed")]
    Closed,
    #[error("surface rejected command: {0}")]
    Rejected(String),
    #[error("io error: {0}")]
    Io(#[from] io::Error),
}

/// Tab-scoped visible state owned by the browser.
#[async_trait::async_trait]
pub trait TabSurface: Send + Sync {
    async fn set_icon(&self, tab_id: TabId, icons: &IconSet) -> Result<(), SurfaceError>;
    async fn set_popup(&self, tab_id: TabId, popup: &str) -> Result<(), SurfaceError>;
    async fn notify(&self, tab_id: TabId, alert: &Alert) -> Result<(), SurfaceError>;
}

/// Applies verdicts to a [`TabSurface`], remembering what each tab last showed
/// so a repeated verdict never raises a second alert.
pub struct Presenter<S> {
    surface: S,
    shown: HashMap<TabId, Verdict>,
}

impl<S: TabSurface> Presenter<S> {
    pub fn new(surface: S) -> Self {
        Self {
            surface,
            shown: HashMap::new(),
        }
    }

    pub async fn present(
        &mut self,
        tab_id: TabId,
        verdict: &Verdict,
    ) -> Result<TabPresentation, SurfaceError> {
        let plan = plan_presentation(self.shown.get(&tab_id), verdict);
        self.surface.set_icon(tab_id, &plan.icons).await?;
        self.surface.set_popup(tab_id, plan.popup).await?;
        // The alert is one-shot: remember the verdict even if the notification fails.
        self.shown.insert(tab_id, verdict.clone());
        if let Some(alert) = &plan.alert {
            self.surface.notify(tab_id, alert).await?;
        }
        Ok(plan)
    }

    pub fn forget(&mut self, tab_id: TabId) {
        self.shown.remove(&tab_id);
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }
}
