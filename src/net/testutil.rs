//! Scripted [`Transport`] double shared by the networking/session/guard
//! tests.
//!
//! Outcomes are queued per path and popped per call; unscripted calls
//! answer 200 with a null body. Every call records its path, and the first
//! poll yields back to the scheduler once, modelling the suspension point a
//! real network call has — that yield is what lets concurrent requests
//! overlap the way they do in production.

use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::Value;

use super::transport::{ApiRequest, ApiResponse, Transport};
use super::types::ApiError;

type Outcome = Result<ApiResponse, ApiError>;

#[derive(Default)]
pub struct ScriptedTransport {
    scripts: Mutex<HashMap<String, VecDeque<Outcome>>>,
    calls: Mutex<Vec<String>>,
}

impl ScriptedTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue the next outcome for `path`.
    pub fn script(&self, path: &str, outcome: Outcome) {
        self.scripts.lock().unwrap().entry(path.to_owned()).or_default().push_back(outcome);
    }

    /// Paths of all calls made, in order.
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    /// How many calls hit `path`.
    pub fn count(&self, path: &str) -> usize {
        self.calls.lock().unwrap().iter().filter(|p| *p == path).count()
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn execute(&self, req: &ApiRequest) -> Result<ApiResponse, ApiError> {
        // Suspend once, like a real network call would.
        tokio::task::yield_now().await;
        self.calls.lock().unwrap().push(req.path.clone());
        self.scripts
            .lock()
            .unwrap()
            .get_mut(&req.path)
            .and_then(VecDeque::pop_front)
            .unwrap_or(Ok(ApiResponse { status: 200, body: Value::Null }))
    }
}

/// 200 with the given JSON body.
pub fn ok_json(body: Value) -> Outcome {
    Ok(ApiResponse { status: 200, body })
}

/// Failure with the given status and no message.
pub fn status(code: u16) -> Outcome {
    Err(ApiError::Status { status: code, message: None })
}

/// Failure with the given status and a backend message.
pub fn status_with_message(code: u16, message: &str) -> Outcome {
    Err(ApiError::Status { status: code, message: Some(message.to_owned()) })
}
