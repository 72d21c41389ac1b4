use std::io::Write;
use std::sync::{Arc, Mutex};

use tabguard_core::{Alert, IconSet, TabId};
use tabguard_engine::{SurfaceError, TabSurface};

use super::protocol::{write_command, Framing, HostCommand, IconPaths, ProtocolError};

/// Tab surface that forwards every change to the extension as a host command.
pub struct HostSurface<W> {
    writer: Arc<Mutex<W>>,
    framing: Framing,
}

impl<W> Clone for HostSurface<W> {
    fn clone(&self) -> Self {
        Self {
            writer: self.writer.clone(),
            framing: self.framing,
        }
    }
}

impl<W: Write + Send> HostSurface<W> {
    pub fn new(writer: W, framing: Framing) -> Self {
        Self {
            writer: Arc::new(Mutex::new(writer)),
            framing,
        }
    }

    /// Shared access to the underlying writer.
    pub fn writer(&self) -> Arc<Mutex<W>> {
        self.writer.clone()
    }

    fn send(&self, command: &HostCommand) -> Result<(), SurfaceError> {
        let mut writer = self.writer.lock().map_err(|_| SurfaceError::Closed)?;
        write_command(&mut *writer, self.framing, command).map_err(|err| match err {
            ProtocolError::Io(io) => SurfaceError::Io(io),
            other => SurfaceError::Rejected(other.to_string()),
        })
    }
}

#[async_trait::async_trait]
impl<W: Write + Send> TabSurface for HostSurface<W> {
    async fn set_icon(&self, tab_id: TabId, icons: &IconSet) -> Result<(), SurfaceError> {
        self.send(&HostCommand::SetIcon {
            tab_id,
            path: IconPaths::from(icons),
        })
    }

    async fn set_popup(&self, tab_id: TabId, popup: &str) -> Result<(), SurfaceError> {
        self.send(&HostCommand::SetPopup {
            tab_id,
            popup: popup.to_string(),
        })
    }

    async fn notify(&self, tab_id: TabId, alert: &Alert) -> Result<(), SurfaceError> {
        self.send(&HostCommand::notify(tab_id, alert))
    }
}
