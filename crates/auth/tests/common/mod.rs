use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;
use opensocial::{HttpMessage, HttpResponse, HttpTransport, TransportError};

/// Records every message and replays canned responses in order.
#[derive(Default)]
pub struct StubTransport {
    responses: Mutex<VecDeque<Result<HttpResponse, TransportError>>>,
    seen: Mutex<Vec<HttpMessage>>,
}

impl StubTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn respond(self, status: u16, body: &str) -> Self {
        self.responses
            .lock()
            .unwrap()
            .push_back(Ok(HttpResponse::new(status, body)));
        self
    }

    pub fn fail(self, error: TransportError) -> Self {
        self.responses.lock().unwrap().push_back(Err(error));
        self
    }

    pub fn requests(&self) -> Vec<HttpMessage> {
        self.seen.lock().unwrap().clone()
    }
}

#[async_trait]
impl HttpTransport for StubTransport {
    async fn execute(&self, message: HttpMessage) -> Result<HttpResponse, TransportError> {
        self.seen.lock().unwrap().push(message);
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(TransportError::Io("no canned response".into())))
    }
}
