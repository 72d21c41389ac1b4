use std::sync::{Arc, Mutex};

use tabguard_core::{Alert, IconSet, TabId, Verdict, VerdictSource, SAFE_POPUP, THREAT_POPUP};
use tabguard_engine::{Presenter, SurfaceError, TabSurface};

#[derive(Debug, Clone, PartialEq)]
enum Call {
    Icon(TabId, &'static str),
    Popup(TabId, String),
    Notify(TabId, String),
}

#[derive(Default, Clone)]
struct RecordingSurface {
    calls: Arc<Mutex<Vec<Call>>>,
    fail_notify: bool,
}

impl RecordingSurface {
    fn take(&self) -> Vec<Call> {
        self.calls.lock().unwrap().drain(..).collect()
    }

    fn alerts(calls: &[Call]) -> usize {
        calls
            .iter()
            .filter(|call| matches!(call, Call::Notify(..)))
            .count()
    }
}

#[async_trait::async_trait]
impl TabSurface for RecordingSurface {
    async fn set_icon(&self, tab_id: TabId, icons: &IconSet) -> Result<(), SurfaceError> {
        self.calls
            .lock()
            .unwrap()
            .push(Call::Icon(tab_id, icons.size_16));
        Ok(())
    }

    async fn set_popup(&self, tab_id: TabId, popup: &str) -> Result<(), SurfaceError> {
        self.calls
            .lock()
            .unwrap()
            .push(Call::Popup(tab_id, popup.to_string()));
        Ok(())
    }

    async fn notify(&self, tab_id: TabId, alert: &Alert) -> Result<(), SurfaceError> {
        if self.fail_notify {
            return Err(SurfaceError::Rejected("notifications disabled".to_string()));
        }
        self.calls
            .lock()
            .unwrap()
            .push(Call::Notify(tab_id, alert.message.clone()));
        Ok(())
    }
}

fn threat(url: &str) -> Verdict {
    Verdict {
        url: url.to_string(),
        is_threat: true,
        probability_percent: 91.5,
        display_text: "Lookalike banking domain".to_string(),
        source: VerdictSource::Probability,
        analysis: None,
    }
}

#[tokio::test]
async fn threat_sets_warning_state_and_alerts() {
    let surface = RecordingSurface::default();
    let mut presenter = Presenter::new(surface.clone());

    presenter
        .present(7, &threat("https://evil.example/"))
        .await
        .unwrap();

    let calls = surface.take();
    assert_eq!(calls[0], Call::Icon(7, "icons/warning16.png"));
    assert_eq!(calls[1], Call::Popup(7, THREAT_POPUP.to_string()));
    assert_eq!(RecordingSurface::alerts(&calls), 1);
}

#[tokio::test]
async fn presenting_twice_is_idempotent() {
    let surface = RecordingSurface::default();
    let mut presenter = Presenter::new(surface.clone());
    let verdict = threat("https://evil.example/");

    presenter.present(7, &verdict).await.unwrap();
    let first = surface.take();
    presenter.present(7, &verdict).await.unwrap();
    let second = surface.take();

    assert_eq!(RecordingSurface::alerts(&first), 1);
    assert_eq!(RecordingSurface::alerts(&second), 0);
    assert_eq!(first[..2], second[..]);
}

#[tokio::test]
async fn alert_memory_is_per_tab() {
    let surface = RecordingSurface::default();
    let mut presenter = Presenter::new(surface.clone());
    let verdict = threat("https://evil.example/");

    presenter.present(1, &verdict).await.unwrap();
    presenter.present(2, &verdict).await.unwrap();

    assert_eq!(RecordingSurface::alerts(&surface.take()), 2);
}

#[tokio::test]
async fn safe_in_between_rearms_alert_and_forget_resets() {
    let surface = RecordingSurface::default();
    let mut presenter = Presenter::new(surface.clone());
    let verdict = threat("https://evil.example/");

    presenter.present(1, &verdict).await.unwrap();
    presenter
        .present(1, &Verdict::known_safe("https://www.google.com/search?q=z"))
        .await
        .unwrap();
    presenter.present(1, &verdict).await.unwrap();
    let calls = surface.take();
    assert_eq!(RecordingSurface::alerts(&calls), 2);
    assert!(calls.contains(&Call::Popup(1, SAFE_POPUP.to_string())));

    presenter.forget(1);
    presenter.present(1, &verdict).await.unwrap();
    assert_eq!(RecordingSurface::alerts(&surface.take()), 1);
}

#[tokio::test]
async fn failed_alert_is_reported_and_not_repeated() {
    let surface = RecordingSurface {
        fail_notify: true,
        ..RecordingSurface::default()
    };
    let mut presenter = Presenter::new(surface.clone());
    let verdict = threat("https://evil.example/");

    let err = presenter.present(4, &verdict).await.unwrap_err();
    assert!(matches!(err, SurfaceError::Rejected(_)));

    // Same verdict again: visible state is reapplied, no second alert attempt.
    presenter.present(4, &verdict).await.unwrap();
    assert_eq!(surface.take().len(), 4);
}
