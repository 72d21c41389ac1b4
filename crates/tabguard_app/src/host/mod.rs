//! Native-messaging host: wire protocol, tab surface and the event loop.
mod app;
mod effects;
pub mod logging;
mod protocol;
mod surface;

pub use app::{run_host, spawn_reader, HostOptions};
pub use effects::EffectRunner;
pub use protocol::{
    read_message, write_command, Framing, HostCommand, HostMessage, IconPaths, ProtocolError,
    MAX_FRAME_BYTES,
};
pub use surface::HostSurface;
