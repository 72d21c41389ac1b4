//! Browser native-messaging wire format.
//!
//! Each message is UTF-8 JSON. In native framing it is preceded by its byte
//! length as a native-endian `u32`; in line framing it is terminated by `\n`.

use std::io::{self, BufRead, Read, Write};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use tabguard_core::{Alert, AlertSeverity, IconSet, Msg, NavigationEvent, TabId};

/// Upper bound for a single inbound frame.
pub const MAX_FRAME_BYTES: usize = 1024 * 1024;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Framing {
    Native,
    Lines,
}

#[derive(Debug, Error)]
pub enum ProtocolError {
    #[error("io error: {0}")]
    Io(#[from] io::Error),
    #[error("malformed message: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("frame of {0} bytes exceeds limit")]
    FrameTooLarge(usize),
}

impl ProtocolError {
    /// Whether the stream can still be read after this error.
    ///
    /// Oversized frames are skipped whole, so the reader stays in sync.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            ProtocolError::Decode(_) | ProtocolError::FrameTooLarge(_)
        )
    }
}

/// Messages sent by the extension's background page.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum HostMessage {
    #[serde(rename_all = "camelCase")]
    Navigation {
        tab_id: TabId,
        url: String,
        /// Milliseconds since the Unix epoch, as browsers report event times.
        #[serde(default)]
        time_stamp: Option<f64>,
    },
    #[serde(rename_all = "camelCase")]
    TabClosed { tab_id: TabId },
}

impl HostMessage {
    pub fn into_msg(self) -> Msg {
        match self {
            HostMessage::Navigation {
                tab_id,
                url,
                time_stamp,
            } => {
                let observed_at = time_stamp
                    .and_then(|ms| Duration::try_from_secs_f64(ms / 1000.0).ok())
                    .and_then(|since_epoch| UNIX_EPOCH.checked_add(since_epoch))
                    .unwrap_or_else(SystemTime::now);
                Msg::Navigated(NavigationEvent {
                    tab_id,
                    url,
                    observed_at,
                })
            }
            HostMessage::TabClosed { tab_id } => Msg::TabClosed { tab_id },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IconPaths {
    #[serde(rename = "16")]
    pub size_16: String,
    #[serde(rename = "48")]
    pub size_48: String,
    #[serde(rename = "128")]
    pub size_128: String,
}

impl From<&IconSet> for IconPaths {
    fn from(icons: &IconSet) -> Self {
        Self {
            size_16: icons.size_16.to_string(),
            size_48: icons.size_48.to_string(),
            size_128: icons.size_128.to_string(),
        }
    }
}

/// Commands the extension applies to a tab.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum HostCommand {
    #[serde(rename_all = "camelCase")]
    SetIcon { tab_id: TabId, path: IconPaths },
    #[serde(rename_all = "camelCase")]
    SetPopup { tab_id: TabId, popup: String },
    #[serde(rename_all = "camelCase")]
    Notify {
        tab_id: TabId,
        title: String,
        message: String,
        severity: String,
    },
}

impl HostCommand {
    pub fn notify(tab_id: TabId, alert: &Alert) -> Self {
        let severity = match alert.severity {
            AlertSeverity::Information => "info",
            AlertSeverity::Warning => "warning",
        };
        HostCommand::Notify {
            tab_id,
            title: alert.title.clone(),
            message: alert.message.clone(),
            severity: severity.to_string(),
        }
    }
}

/// Reads the next message. `Ok(None)` means the stream ended cleanly.
pub fn read_message<R: BufRead>(
    reader: &mut R,
    framing: Framing,
) -> Result<Option<HostMessage>, ProtocolError> {
    let payload = match framing {
        Framing::Native => read_native_frame(reader)?,
        Framing::Lines => read_line_frame(reader)?,
    };
    match payload {
        Some(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
        None => Ok(None),
    }
}

pub fn write_command<W: Write>(
    writer: &mut W,
    framing: Framing,
    command: &HostCommand,
) -> Result<(), ProtocolError> {
    let payload = serde_json::to_vec(command)?;
    match framing {
        Framing::Native => {
            let len = u32::try_from(payload.len())
                .map_err(|_| ProtocolError::FrameTooLarge(payload.len()))?;
            writer.write_all(&len.to_ne_bytes())?;
            writer.write_all(&payload)?;
        }
        Framing::Lines => {
            writer.write_all(&payload)?;
            writer.write_all(b"\n")?;
        }
    }
    writer.flush()?;
    Ok(())
}

fn read_native_frame<R: Read>(reader: &mut R) -> Result<Option<Vec<u8>>, ProtocolError> {
    let mut len_bytes = [0u8; 4];
    match reader.read_exact(&mut len_bytes) {
        Ok(()) => {}
        Err(err) if err.kind() == io::ErrorKind::UnexpectedEof => return Ok(None),
        Err(err) => return Err(err.into()),
    }
    let len = u32::from_ne_bytes(len_bytes) as usize;
    if len > MAX_FRAME_BYTES {
        let skipped = io::copy(&mut (&mut *reader).take(len as u64), &mut io::sink())?;
        if skipped < len as u64 {
            return Err(io::Error::from(io::ErrorKind::UnexpectedEof).into());
        }
        return Err(ProtocolError::FrameTooLarge(len));
    }
    let mut payload = vec![0u8; len];
    reader.read_exact(&mut payload)?;
    Ok(Some(payload))
}

/// Lines are kept as raw bytes; invalid UTF-8 surfaces as a decode error.
fn read_line_frame<R: BufRead>(reader: &mut R) -> Result<Option<Vec<u8>>, ProtocolError> {
    let mut line = Vec::new();
    loop {
        line.clear();
        if reader.read_until(b'\n', &mut line)? == 0 {
            return Ok(None);
        }
        if line.len() > MAX_FRAME_BYTES {
            return Err(ProtocolError::FrameTooLarge(line.len()));
        }
        if !line.iter().all(u8::is_ascii_whitespace) {
            return Ok(Some(line));
        }
    }
}
