#![allow(dead_code)]

use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use opensocial::{HttpMessage, HttpResponse, HttpTransport, TransportError};

struct Route {
    fragment: String,
    delay: Option<Duration>,
    reply: Result<HttpResponse, TransportError>,
}

/// Answers by URL fragment and records every message it receives.
#[derive(Default)]
pub struct StubTransport {
    routes: Vec<Route>,
    seen: Mutex<Vec<HttpMessage>>,
}

impl StubTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Answers URLs containing `fragment` with `status` and `body`.
    pub fn on(mut self, fragment: &str, status: u16, body: &str) -> Self {
        self.routes.push(Route {
            fragment: fragment.to_owned(),
            delay: None,
            reply: Ok(HttpResponse::new(status, body)),
        });
        self
    }

    /// Like [`StubTransport::on`] but answers only after `delay`.
    pub fn on_slow(mut self, fragment: &str, delay: Duration, body: &str) -> Self {
        self.routes.push(Route {
            fragment: fragment.to_owned(),
            delay: Some(delay),
            reply: Ok(HttpResponse::new(200, body)),
        });
        self
    }

    pub fn fail_on(mut self, fragment: &str, error: TransportError) -> Self {
        self.routes.push(Route {
            fragment: fragment.to_owned(),
            delay: None,
            reply: Err(error),
        });
        self
    }

    pub fn requests(&self) -> Vec<HttpMessage> {
        self.seen.lock().unwrap().clone()
    }
}

#[async_trait]
impl HttpTransport for StubTransport {
    async fn execute(&self, message: HttpMessage) -> Result<HttpResponse, TransportError> {
        self.seen.lock().unwrap().push(message.clone());
        let route = self
            .routes
            .iter()
            .find(|route| message.url.contains(&route.fragment));
        match route {
            Some(route) => {
                if let Some(delay) = route.delay {
                    tokio::time::sleep(delay).await;
                }
                route.reply.clone()
            }
            None => Ok(HttpResponse::new(404, "")),
        }
    }
}
