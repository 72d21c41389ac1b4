use guard_logging::{guard_debug, guard_error, guard_info};
use tabguard_core::Effect;
use tabguard_engine::{EngineEvent, EngineHandle, PersistHandle, Presenter, TabSurface};

/// Executes the effects returned by the watcher's update function.
pub struct EffectRunner<S> {
    engine: EngineHandle,
    presenter: Presenter<S>,
    persist: PersistHandle,
}

impl<S: TabSurface> EffectRunner<S> {
    pub fn new(engine: EngineHandle, presenter: Presenter<S>, persist: PersistHandle) -> Self {
        Self {
            engine,
            presenter,
            persist,
        }
    }

    pub async fn run(&mut self, effects: Vec<Effect>) {
        for effect in effects {
            match effect {
                Effect::Classify(ticket) => {
                    guard_info!(
                        "Classify tab={} seq={} url_len={}",
                        ticket.tab_id,
                        ticket.sequence,
                        ticket.url.len()
                    );
                    self.engine.enqueue(ticket);
                }
                Effect::Present { tab_id, verdict } => {
                    if let Err(err) = self.presenter.present(tab_id, &verdict).await {
                        guard_error!("Failed to present verdict on tab {}: {}", tab_id, err);
                    }
                }
                Effect::PersistVerdicts(snapshot) => {
                    self.persist.submit(snapshot);
                }
                Effect::ForgetTab { tab_id } => {
                    guard_debug!("Forget tab {}", tab_id);
                    self.presenter.forget(tab_id);
                }
            }
        }
    }

    pub async fn next_event(&mut self) -> Option<EngineEvent> {
        self.engine.recv().await
    }
}
