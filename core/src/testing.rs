//! In-memory transport and log sink for unit tests.

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::Value;

use crate::error::TransportError;
use crate::http::{HttpRequest, HttpResponse};
use crate::logging::LogSink;
use crate::transport::Transport;

/// Replays queued outcomes in order and records every request it sees.
#[derive(Debug, Default)]
pub struct StubTransport {
    outcomes: Mutex<VecDeque<Result<HttpResponse, TransportError>>>,
    requests: Mutex<Vec<HttpRequest>>,
}

impl StubTransport {
    pub fn with_responses(outcomes: Vec<Result<HttpResponse, TransportError>>) -> Self {
        Self {
            outcomes: Mutex::new(outcomes.into()),
            requests: Mutex::default(),
        }
    }

    /// Queue a JSON success body.
    pub fn push_json(&self, status: u16, body: Value) {
        self.outcomes.lock().unwrap().push_back(Ok(HttpResponse {
            status,
            headers: Vec::new(),
            body: body.to_string(),
        }));
    }

    pub fn requests(&self) -> Vec<HttpRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl Transport for StubTransport {
    async fn execute(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        self.requests.lock().unwrap().push(request);
        self.outcomes
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(TransportError::Other("no stubbed response".to_string())))
    }
}

/// Keeps every record as `(level, message, data)`.
#[derive(Debug, Default)]
pub struct MemorySink {
    records: Mutex<Vec<(&'static str, String, Option<Value>)>>,
}

impl MemorySink {
    pub fn count(&self, level: &str) -> usize {
        self.records
            .lock()
            .unwrap()
            .iter()
            .filter(|(l, _, _)| *l == level)
            .count()
    }

    pub fn records(&self) -> Vec<(&'static str, String, Option<Value>)> {
        self.records.lock().unwrap().clone()
    }

    fn push(&self, level: &'static str, message: &str, data: Option<&Value>) {
        self.records
            .lock()
            .unwrap()
            .push((level, message.to_string(), data.cloned()));
    }
}

impl LogSink for MemorySink {
    fn debug(&self, message: &str, data: Option<&Value>) {
        self.push("debug", message, data);
    }

    fn info(&self, message: &str, data: Option<&Value>) {
        self.push("info", message, data);
    }

    fn warning(&self, message: &str, data: Option<&Value>) {
        self.push("warning", message, data);
    }

    fn error(&self, message: &str, data: Option<&Value>) {
        self.push("error", message, data);
    }
}
