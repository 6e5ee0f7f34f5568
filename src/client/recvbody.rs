use crate::body::BodyMode;
use crate::close_reason::CloseReason;
use crate::redirect;
use crate::response::ParsedResponse;

use super::state::RecvBody;
use super::{Flow, RecvBodyResult};

impl Flow<RecvBody> {
    /// The parsed response head.
    pub fn response(&self) -> &ParsedResponse {
        // Unwrap is OK, because RecvResponse::proceed() sets the response.
        self.inner.response.as_ref().unwrap()
    }

    /// Tell which framing the body uses.
    pub fn body_mode(&self) -> BodyMode {
        self.inner
            .reader
            .as_ref()
            .map(|r| r.body_mode())
            .unwrap_or(BodyMode::NoBody)
    }

    /// Feed one line of the body, without its line ending.
    pub fn push_line(&mut self, line: &str) {
        if let Some(reader) = self.inner.reader.as_mut() {
            reader.push_line(line);
        }
    }

    /// Signal that the stream has ended.
    pub fn end_of_stream(&mut self) {
        self.inner.end_of_stream = true;
    }

    /// The body decoded so far.
    pub fn body(&self) -> &str {
        self.inner.reader.as_ref().map(|r| r.body()).unwrap_or("")
    }

    /// Check if the body is done, either by framing or because the stream ended.
    pub fn can_proceed(&self) -> bool {
        self.is_ended() || self.inner.end_of_stream
    }

    fn is_ended(&self) -> bool {
        self.inner
            .reader
            .as_ref()
            .map(|r| r.is_ended())
            .unwrap_or(true)
    }

    /// Finish the body and proceed to the next state.
    ///
    /// Proceeding before [`can_proceed()`](Self::can_proceed) marks the body as truncated.
    pub fn proceed(mut self) -> RecvBodyResult {
        if let Some(reader) = self.inner.reader.take() {
            let decoded = reader.finish();
            if decoded.truncated {
                self.inner.close_reason.push(CloseReason::TruncatedBody);
            }
            self.inner.decoded = Some(decoded);
        }

        let decision = redirect::resolve(self.response());
        let has_location = decision.location().is_some();
        self.inner.redirect = decision;

        if has_location {
            RecvBodyResult::Redirect(Flow::wrap(self.inner))
        } else {
            RecvBodyResult::Cleanup(Flow::wrap(self.inner))
        }
    }
}
