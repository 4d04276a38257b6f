//! Recording transport stub for client tests.

use std::fmt;
use std::sync::{Arc, Mutex};

use http::StatusCode;
use tracing::field::{Field, Visit};
use tracing::{Event, Subscriber};
use tracing_subscriber::Layer;
use tracing_subscriber::layer::Context;

use crate::codec::encode_user;
use crate::error::TransportError;
use crate::model::{Role, User};
use crate::transport::{HttpTransport, TransportFuture, TransportRequest, TransportResponse};

type Responder = dyn Fn() -> Result<TransportResponse, TransportError> + Send + Sync;

/// Answers every request the same way and remembers what was sent.
#[derive(Clone)]
pub struct StubTransport {
    responder: Arc<Responder>,
    requests: Arc<Mutex<Vec<TransportRequest>>>,
}

impl StubTransport {
    pub fn responding(status: StatusCode, body: impl Into<String>) -> Self {
        let response = TransportResponse::new(status, body);
        Self::with_responder(move || Ok(response.clone()))
    }

    pub fn failing(error: impl Fn() -> TransportError + Send + Sync + 'static) -> Self {
        Self::with_responder(move || Err(error()))
    }

    fn with_responder(
        responder: impl Fn() -> Result<TransportResponse, TransportError> + Send + Sync + 'static,
    ) -> Self {
        Self {
            responder: Arc::new(responder),
            requests: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn requests(&self) -> Vec<TransportRequest> {
        self.requests.lock().unwrap().clone()
    }
}

impl HttpTransport for StubTransport {
    fn send(&self, request: TransportRequest) -> TransportFuture<'_> {
        self.requests.lock().unwrap().push(request);
        let result = (self.responder)();
        Box::pin(async move { result })
    }
}

/// JSON body of a valid user with the `Creator` role at `institution.id`.
pub fn user_json(username: &str) -> String {
    let user = User::new(username, "institution.id", vec![Role::new("Creator")]);
    String::from_utf8(encode_user(&user)).unwrap()
}

/// Layer that keeps the message of every event it sees.
#[derive(Clone, Default)]
pub struct CapturedMessages {
    messages: Arc<Mutex<Vec<String>>>,
}

impl CapturedMessages {
    /// Remove and return everything captured so far.
    pub fn drain(&self) -> Vec<String> {
        std::mem::take(&mut *self.messages.lock().unwrap())
    }
}

impl<S: Subscriber> Layer<S> for CapturedMessages {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let mut visitor = MessageVisitor(String::new());
        event.record(&mut visitor);
        self.messages.lock().unwrap().push(visitor.0);
    }
}

struct MessageVisitor(String);

impl Visit for MessageVisitor {
    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        if field.name() == "message" {
            self.0 = format!("{value:?}");
        }
    }
}
