//! Tabguard engine: classifier I/O, presentation and persistence effects.
mod classify;
mod engine;
mod persist;
mod present;
mod types;
mod wire;

pub use classify::{Classifier, ClassifierSettings, ReqwestClassifier, DEFAULT_ENDPOINT};
pub use engine::EngineHandle;
pub use persist::{
    ensure_state_dir, AtomicFileWriter, PersistError, PersistHandle, PersistedRecord,
    PersistedVerdicts, VerdictFileStore,
};
pub use present::{Presenter, SurfaceError, TabSurface};
pub use types::{EngineError, EngineEvent};
pub use wire::{parse_response, ClassifierResponse};
