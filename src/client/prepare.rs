use crate::close_reason::CloseReason;
use crate::redirect::Redirect as RedirectDecision;
use crate::request;
use crate::url::Target;

use super::state::{Prepare, SendRequest};
use super::{Flow, Inner};

impl Flow<Prepare> {
    /// Create a new Flow.
    pub fn new(target: Target) -> Self {
        let inner = Inner {
            target,
            request: Vec::new(),
            head: Vec::new(),
            head_complete: false,
            response: None,
            reader: None,
            end_of_stream: false,
            decoded: None,
            redirect: RedirectDecision::None,
            // The request always carries connection: close.
            close_reason: vec![CloseReason::ClientConnectionClose],
        };

        Flow::wrap(inner)
    }

    /// Host to open a connection to.
    pub fn host(&self) -> &str {
        self.inner.target.host()
    }

    /// Port to open a connection to.
    pub fn port(&self) -> u16 {
        self.inner.target.port()
    }

    /// Continue to the next flow state.
    ///
    /// Call this once the connection is open.
    pub fn proceed(mut self) -> Flow<SendRequest> {
        self.inner.request = request::build(&self.inner.target);
        Flow::wrap(self.inner)
    }
}
