//! Log sinks injected into `ApiClient`.
//!
//! The client never reaches for a global logger; it is handed a `LogSink`
//! so tests can observe or silence it. `TracingSink` forwards to `tracing`
//! and only emits debug records in development mode.

use std::fmt;

use serde_json::Value;

/// Destination for the client's diagnostic messages.
pub trait LogSink: Send + Sync + fmt::Debug {
    fn debug(&self, message: &str, data: Option<&Value>);
    fn info(&self, message: &str, data: Option<&Value>);
    fn warning(&self, message: &str, data: Option<&Value>);
    fn error(&self, message: &str, data: Option<&Value>);
}

/// Forwards to the `tracing` macros under the `dashboard_api` target.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink {
    dev_mode: bool,
}

impl TracingSink {
    pub fn new(dev_mode: bool) -> Self {
        Self { dev_mode }
    }

    pub fn dev_mode(&self) -> bool {
        self.dev_mode
    }
}

impl LogSink for TracingSink {
    fn debug(&self, message: &str, data: Option<&Value>) {
        if !self.dev_mode {
            return;
        }
        match data {
            Some(data) => tracing::debug!(target: "dashboard_api", %data, "{message}"),
            None => tracing::debug!(target: "dashboard_api", "{message}"),
        }
    }

    fn info(&self, message: &str, data: Option<&Value>) {
        match data {
            Some(data) => tracing::info!(target: "dashboard_api", %data, "{message}"),
            None => tracing::info!(target: "dashboard_api", "{message}"),
        }
    }

    fn warning(&self, message: &str, data: Option<&Value>) {
        match data {
            Some(data) => tracing::warn!(target: "dashboard_api", %data, "{message}"),
            None => tracing::warn!(target: "dashboard_api", "{message}"),
        }
    }

    fn error(&self, message: &str, data: Option<&Value>) {
        match data {
            Some(data) => tracing::error!(target: "dashboard_api", %data, "{message}"),
            None => tracing::error!(target: "dashboard_api", "{message}"),
        }
    }
}

/// Discards every message.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopSink;

impl LogSink for NoopSink {
    fn debug(&self, _message: &str, _data: Option<&Value>) {}
    fn info(&self, _message: &str, _data: Option<&Value>) {}
    fn warning(&self, _message: &str, _data: Option<&Value>) {}
    fn error(&self, _message: &str, _data: Option<&Value>) {}
}
