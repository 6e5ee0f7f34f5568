use crate::close_reason::CloseReason;
use crate::redirect::Redirect as RedirectDecision;
use crate::response::ParsedResponse;

use super::state::{Cleanup, Prepare, Redirect};
use super::Flow;

impl Flow<Redirect> {
    /// What to do about the location header.
    pub fn redirect(&self) -> &RedirectDecision {
        &self.inner.redirect
    }

    /// The parsed response carrying the location.
    pub fn response(&self) -> &ParsedResponse {
        // Unwrap is OK, because we can't be here without having read a response.
        self.inner.response.as_ref().unwrap()
    }

    /// The decoded body of the redirect response.
    pub fn body(&self) -> &str {
        self.inner.decoded.as_ref().map(|d| d.body.as_str()).unwrap_or("")
    }

    /// Whether the body of the redirect response ended early.
    pub fn is_truncated(&self) -> bool {
        self.inner.decoded.as_ref().map(|d| d.truncated).unwrap_or(false)
    }

    /// Construct a new `Flow` by following the redirect.
    ///
    /// Returns `None` if the location is not something we follow, in which
    /// case this exchange ends with [`proceed()`](Self::proceed).
    ///
    /// The new flow is a fresh exchange. It needs a new connection, the
    /// current one must be closed.
    pub fn as_new_flow(&mut self) -> Option<Flow<Prepare>> {
        let target = self.inner.redirect.target()?.clone();

        self.inner.close_reason.push(CloseReason::Redirect);

        Some(Flow::new(target))
    }

    /// The most recent reason for closing the connection.
    ///
    /// After [`as_new_flow()`](Self::as_new_flow) this is the redirect.
    pub fn close_reason(&self) -> Option<&'static str> {
        self.inner.close_reason.last().map(|s| s.explain())
    }

    /// Proceed to the cleanup state without following.
    pub fn proceed(self) -> Flow<Cleanup> {
        Flow::wrap(self.inner)
    }
}
