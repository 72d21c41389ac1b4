use std::io::{BufRead, Write};
use std::path::PathBuf;
use std::sync::Arc;
use std::thread;

use guard_logging::{guard_info, guard_warn};
use tabguard_core::{update, Msg, WatcherSettings, WatcherState};
use tabguard_engine::{
    Classifier, EngineEvent, EngineHandle, PersistHandle, Presenter, VerdictFileStore,
};
use tokio::sync::mpsc;

use super::effects::EffectRunner;
use super::protocol::{read_message, Framing, HostMessage};
use super::surface::HostSurface;

pub struct HostOptions {
    pub framing: Framing,
    pub settings: WatcherSettings,
    pub classifier: Arc<dyn Classifier>,
    pub state_dir: PathBuf,
}

/// Reads messages on a dedicated thread so the event loop never blocks on input.
///
/// The channel closes when the stream ends or becomes unreadable.
pub fn spawn_reader<R>(mut reader: R, framing: Framing) -> mpsc::UnboundedReceiver<HostMessage>
where
    R: BufRead + Send + 'static,
{
    let (tx, rx) = mpsc::unbounded_channel();
    thread::spawn(move || loop {
        match read_message(&mut reader, framing) {
            Ok(Some(message)) => {
                if tx.send(message).is_err() {
                    break;
                }
            }
            Ok(None) => break,
            Err(err) if err.is_recoverable() => {
                guard_warn!("Skipping inbound message: {}", err);
            }
            Err(err) => {
                guard_warn!("Inbound stream unreadable, stopping: {}", err);
                break;
            }
        }
    });
    rx
}

enum Next {
    Inbound(Option<HostMessage>),
    Engine(Option<EngineEvent>),
}

/// Runs the watcher until the inbound channel closes.
///
/// Navigation handling, merging and installation happen inside `update`;
/// the loop only awaits between messages and while applying effects.
pub async fn run_host<W>(
    mut inbound: mpsc::UnboundedReceiver<HostMessage>,
    surface: HostSurface<W>,
    options: HostOptions,
) where
    W: Write + Send + 'static,
{
    let store = VerdictFileStore::new(options.state_dir);
    let (persist, persist_worker) = PersistHandle::spawn(store);
    let engine = EngineHandle::new(options.classifier);
    let mut runner = EffectRunner::new(engine, Presenter::new(surface), persist);
    let mut state = WatcherState::new(options.settings);

    guard_info!("Host started ({:?} framing)", options.framing);
    loop {
        let next = tokio::select! {
            message = inbound.recv() => Next::Inbound(message),
            event = runner.next_event() => Next::Engine(event),
        };
        let msg = match next {
            Next::Inbound(Some(message)) => message.into_msg(),
            Next::Inbound(None) => break,
            Next::Engine(Some(EngineEvent::ClassificationCompleted { ticket, result })) => {
                Msg::ClassificationCompleted { ticket, result }
            }
            Next::Engine(None) => Msg::NoOp,
        };

        let (next_state, effects) = update(std::mem::take(&mut state), msg);
        state = next_state;
        runner.run(effects).await;
    }

    guard_info!("Inbound stream closed; {} tab(s) tracked", state.store().len());
    drop(runner);
    if let Err(err) = persist_worker.await {
        guard_warn!("Persist worker ended abnormally: {}", err);
    }
}
