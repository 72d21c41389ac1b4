//! Tabguard host application: configuration and the native-messaging host loop.
pub mod config;
pub mod host;
