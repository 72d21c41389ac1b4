use std::collections::BTreeMap;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use chrono::Utc;
use guard_logging::{guard_debug, guard_error};
use serde::{Deserialize, Serialize};
use tempfile::NamedTempFile;
use thiserror::Error;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use tabguard_core::{DisplayRecord, TabId, VerdictSnapshot};

#[derive(Debug, Error)]
pub enum PersistError {
    #[error("state directory missing or not writable: {0}")]
    StateDir(String),
    #[error("io error: {0}")]
    Io(#[from] io::Error),
    #[error("encoding error: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Ensure the state directory exists; create if missing.
pub fn ensure_state_dir(dir: &Path) -> Result<(), PersistError> {
    if dir.exists() {
        let meta = fs::metadata(dir).map_err(|e| PersistError::StateDir(e.to_string()))?;
        if !meta.is_dir() {
            return Err(PersistError::StateDir("path is not a directory".into()));
        }
    } else {
        fs::create_dir_all(dir).map_err(|e| PersistError::StateDir(e.to_string()))?;
    }
    Ok(())
}

/// Atomically write content to `{dir}/{filename}` by writing a temp file then renaming.
#[derive(Debug, Clone)]
pub struct AtomicFileWriter {
    dir: PathBuf,
}

impl AtomicFileWriter {
    pub fn new(dir: PathBuf) -> Self {
        Self { dir }
    }

    pub fn write(&self, filename: &str, content: &[u8]) -> Result<PathBuf, PersistError> {
        ensure_state_dir(&self.dir)?;

        let target = self.dir.join(filename);
        let mut tmp = NamedTempFile::new_in(&self.dir)?;
        tmp.write_all(content)?;
        tmp.flush()?;
        tmp.as_file_mut().sync_all()?;

        tmp.persist(&target).map_err(|e| PersistError::Io(e.error))?;
        Ok(target)
    }
}

/// On-disk form of a [`DisplayRecord`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersistedRecord {
    pub url: String,
    pub message: String,
    /// 0-100 scale.
    pub malicious_probability: f64,
    pub threat: bool,
    pub dataset: bool,
    pub genai_analysis: Option<String>,
}

impl From<&DisplayRecord> for PersistedRecord {
    fn from(record: &DisplayRecord) -> Self {
        Self {
            url: record.url.clone(),
            message: record.message.clone(),
            malicious_probability: record.malicious_probability,
            threat: record.threat,
            dataset: record.dataset,
            genai_analysis: record.genai_analysis.clone(),
        }
    }
}

/// Contents of `verdicts.json`. `latest` is the most recent result, not a history.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PersistedVerdicts {
    pub saved_at: Option<String>,
    pub latest: Option<PersistedRecord>,
    pub tabs: BTreeMap<TabId, PersistedRecord>,
}

impl PersistedVerdicts {
    fn from_snapshot(snapshot: &VerdictSnapshot) -> Self {
        Self {
            saved_at: Some(Utc::now().to_rfc3339()),
            latest: snapshot.latest.as_ref().map(PersistedRecord::from),
            tabs: snapshot
                .tabs
                .iter()
                .map(|(tab_id, record)| (*tab_id, PersistedRecord::from(record)))
                .collect(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct VerdictFileStore {
    dir: PathBuf,
    writer: AtomicFileWriter,
}

impl VerdictFileStore {
    pub const FILENAME: &'static str = "verdicts.json";

    pub fn new(dir: PathBuf) -> Self {
        Self {
            writer: AtomicFileWriter::new(dir.clone()),
            dir,
        }
    }

    pub fn path(&self) -> PathBuf {
        self.dir.join(Self::FILENAME)
    }

    pub fn save(&self, snapshot: &VerdictSnapshot) -> Result<PathBuf, PersistError> {
        let content = serde_json::to_vec_pretty(&PersistedVerdicts::from_snapshot(snapshot))?;
        self.writer.write(Self::FILENAME, &content)
    }

    /// Reads the persisted verdicts; a missing file is an empty result.
    pub fn load(&self) -> Result<PersistedVerdicts, PersistError> {
        match fs::read(self.path()) {
            Ok(bytes) => Ok(serde_json::from_slice(&bytes)?),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(PersistedVerdicts::default()),
            Err(err) => Err(err.into()),
        }
    }
}

/// Fire-and-forget sender for snapshots. A single worker writes them in order.
#[derive(Debug, Clone)]
pub struct PersistHandle {
    tx: mpsc::UnboundedSender<VerdictSnapshot>,
}

impl PersistHandle {
    /// Spawns the writer on the current Tokio runtime.
    ///
    /// The worker exits once every handle is dropped; await the returned
    /// task to flush the last snapshot.
    pub fn spawn(store: VerdictFileStore) -> (Self, JoinHandle<()>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let worker = tokio::spawn(persist_worker(store, rx));
        (Self { tx }, worker)
    }

    pub fn submit(&self, snapshot: VerdictSnapshot) {
        if self.tx.send(snapshot).is_err() {
            guard_error!("Persist worker stopped; snapshot dropped");
        }
    }
}

async fn persist_worker(store: VerdictFileStore, mut rx: mpsc::UnboundedReceiver<VerdictSnapshot>) {
    while let Some(mut snapshot) = rx.recv().await {
        // Only the newest queued snapshot matters.
        while let Ok(newer) = rx.try_recv() {
            snapshot = newer;
        }
        let store = store.clone();
        match tokio::task::spawn_blocking(move || store.save(&snapshot)).await {
            Ok(Ok(path)) => guard_debug!("Persisted verdicts to {:?}", path),
            Ok(Err(err)) => guard_error!("Failed to persist verdicts: {}", err),
            Err(err) => guard_error!("Persist task failed: {}", err),
        }
    }
}
