use crate::body::{BodyMode, BodyReader};
use crate::close_reason::CloseReason;
use crate::response;
use crate::util::join_lines;
use crate::Error;

use super::state::{RecvBody, RecvResponse};
use super::Flow;

impl Flow<RecvResponse> {
    /// Feed one line of the response head, without its line ending.
    ///
    /// The head is complete once the blank line is received. Lines after that
    /// belong to the body and are not accepted here.
    pub fn push_line(&mut self, line: &str) {
        if self.inner.head_complete {
            debug!("Ignore line after complete response head: {:?}", line);
            return;
        }

        self.inner.head.push(line.to_string());

        if line.is_empty() {
            self.inner.head_complete = true;
        }
    }

    /// The head lines received so far, joined with `\n`.
    pub fn head(&self) -> String {
        join_lines(&self.inner.head)
    }

    /// Tell if the entire response head has been received.
    pub fn can_proceed(&self) -> bool {
        self.inner.head_complete
    }

    /// Parse the response head and proceed to receiving the body.
    ///
    /// A head that is not complete (the stream ended before the blank line)
    /// is [`Error::NoResponse`].
    pub fn proceed(mut self) -> Result<Flow<RecvBody>, Error> {
        if !self.can_proceed() {
            return Err(Error::NoResponse);
        }

        let parsed = response::parse(&self.inner.head)?;

        let server_close = parsed
            .header(http::header::CONNECTION)
            .map(|v| v.eq_ignore_ascii_case("close"))
            .unwrap_or(false);

        if server_close {
            self.inner
                .close_reason
                .push(CloseReason::ServerConnectionClose);
        }

        let mode = BodyMode::for_response(&parsed);
        debug!("Response {} with body mode {:?}", parsed.status(), mode);

        self.inner.reader = Some(BodyReader::new(mode));
        self.inner.response = Some(parsed);

        Ok(Flow::wrap(self.inner))
    }
}
