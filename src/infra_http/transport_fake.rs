use crate::domain_model::*;
use crate::domain_port::*;
use dashmap::DashMap;
use std::sync::{Arc, Mutex};
use tokio::sync::Semaphore;

type Handler = dyn Fn(&ApiRequest) -> Result<ApiResponse, TransportError> + Send + Sync;

/// In-process transport answering from a closure. Records every request it
/// sees, and can hold replies for a path until permits are released.
pub struct FakeTransport {
    handler: Box<Handler>,
    requests: Mutex<Vec<ApiRequest>>,
    gates: DashMap<String, Arc<Semaphore>>,
}

impl FakeTransport {
    pub fn new<F>(handler: F) -> Self
    where
        F: Fn(&ApiRequest) -> Result<ApiResponse, TransportError> + Send + Sync + 'static,
    {
        Self {
            handler: Box::new(handler),
            requests: Mutex::new(Vec::new()),
            gates: DashMap::new(),
        }
    }

    /// Replies for `path` wait for a permit on the returned semaphore.
    pub fn hold(&self, path: &str) -> Arc<Semaphore> {
        let gate = Arc::new(Semaphore::new(0));
        self.gates.insert(path.to_string(), gate.clone());
        gate
    }

    pub fn requests(&self) -> Vec<ApiRequest> {
        self.requests
            .lock()
            .map(|r| r.clone())
            .unwrap_or_default()
    }

    pub fn count(&self, path: &str) -> usize {
        self.requests
            .lock()
            .map(|r| r.iter().filter(|req| req.path == path).count())
            .unwrap_or(0)
    }
}

#[async_trait::async_trait]
impl Transport for FakeTransport {
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse, TransportError> {
        if let Ok(mut requests) = self.requests.lock() {
            requests.push(request.clone());
        }
        let gate = self.gates.get(&request.path).map(|g| g.value().clone());
        if let Some(gate) = gate {
            let _permit = gate
                .acquire()
                .await
                .map_err(|e| TransportError::Network(e.to_string()))?;
        }
        (self.handler)(&request)
    }
}
