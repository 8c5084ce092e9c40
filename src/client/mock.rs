//! Mock transport for testing
//!
//! Records every request it is handed and replays scripted responses, so
//! executor and tool tests run without a network.

use std::collections::VecDeque;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;

use super::transport::{Transport, TransportError, TransportRequest, TransportResponse};

type Scripted = Result<TransportResponse, TransportError>;

/// Mock transport for testing.
///
/// Queue responses via builder methods; once the queue is empty every call
/// gets `200 {}`.
///
/// # Example
/// ```ignore
/// let mock = MockTransport::new().with_response(404, r#"{"error":"app not found"}"#);
/// let executor = RequestExecutor::with_transport(config, Arc::new(mock.clone()));
/// ```
#[derive(Clone, Default)]
pub struct MockTransport {
    responses: Arc<Mutex<VecDeque<Scripted>>>,
    requests: Arc<Mutex<Vec<TransportRequest>>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a response with the given status and body
    pub fn with_response(self, status: u16, body: impl Into<String>) -> Self {
        self.push(Ok(TransportResponse {
            status,
            body: body.into(),
        }));
        self
    }

    /// Queue a JSON response
    pub fn with_json(self, status: u16, body: serde_json::Value) -> Self {
        self.with_response(status, body.to_string())
    }

    /// Queue a transport failure
    pub fn with_error(self, error: TransportError) -> Self {
        self.push(Err(error));
        self
    }

    fn push(&self, scripted: Scripted) {
        // Builders run before any request, so the lock is uncontended
        if let Ok(mut queue) = self.responses.try_lock() {
            queue.push_back(scripted);
        }
    }

    /// Number of requests sent so far
    pub async fn call_count(&self) -> usize {
        self.requests.lock().await.len()
    }

    /// All captured requests, oldest first
    pub async fn requests(&self) -> Vec<TransportRequest> {
        self.requests.lock().await.clone()
    }

    /// The most recent request, if any
    pub async fn last_request(&self) -> Option<TransportRequest> {
        self.requests.lock().await.last().cloned()
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn send(&self, request: TransportRequest) -> Scripted {
        self.requests.lock().await.push(request);
        self.responses
            .lock()
            .await
            .pop_front()
            .unwrap_or_else(|| {
                Ok(TransportResponse {
                    status: 200,
                    body: "{}".to_string(),
                })
            })
    }
}
