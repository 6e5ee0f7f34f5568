//! HTTP/1.1 exchange state machine
//!
//! The [`Flow`] object encodes one request/response exchange using state
//! variables, for example `Flow<RecvBody>` to represent the lifecycle stage
//! where we are reading the response body.
//!
//! The flow itself does no I/O. It hands out the request bytes and is fed
//! the response one line at a time. [`Fetcher`](fetch::Fetcher) drives flows
//! over a [`Transport`](crate::transport::Transport), following redirects.
//!
//! The states are:
//!
//! * **Prepare** - The target is known, the caller opens a connection to it.
//! * **SendRequest** - Send the request line and the fixed headers.
//! * **RecvResponse** - Receive lines up to the blank line ending the response
//!   head, then parse status and headers.
//! * **RecvBody** - Receive the body using the framing given by the headers.
//! * **Redirect** - The response has a `Location` header. Either start a new
//!   flow for the new target, or give up on it.
//! * **Cleanup** - Close the connection. The exchange is done.
//!
//! ```text
//!                            ┌──────────────────┐
//! ┌ ─ ─ ─ ─ ─ ─ ─ ─ ─ ─ ─ ─ ▶│     Prepare      │
//!                            └──────────────────┘
//! │                                    │
//!                                      ▼
//! │                          ┌──────────────────┐
//!                            │   SendRequest    │
//! │                          └──────────────────┘
//!                                      │
//! │                                    ▼
//!                            ┌──────────────────┐
//! │                          │   RecvResponse   │
//!                            └──────────────────┘
//! │                                    │
//!                                      ▼
//! │                          ┌──────────────────┐
//!              ┌─────────────│     RecvBody     │
//! │            │             └──────────────────┘
//!              ▼                       │
//! │  ┌──────────────────┐              │
//!  ─ │     Redirect     │              │
//!    └──────────────────┘              │
//!              │                       ▼
//!              │             ┌──────────────────┐
//!              └────────────▶│     Cleanup      │
//!                            └──────────────────┘
//! ```
//!
//! # Example
//!
//! ```
//! use termfetch::client::*;
//! use termfetch::url;
//!
//! let target = url::parse("example.test/page").unwrap();
//!
//! // ********************************** Prepare
//!
//! let flow = Flow::new(target);
//!
//! // The caller opens a connection to flow.target().host() and port().
//!
//! // ********************************** SendRequest
//!
//! let flow = flow.proceed();
//!
//! assert_eq!(flow.request(), b"\
//!     GET /page HTTP/1.1\r\n\
//!     Host: example.test\r\n\
//!     User-Agent: Terminal-Web-Client/1.0\r\n\
//!     Accept: */*\r\n\
//!     Connection: close\r\n\
//!     \r\n");
//!
//! // ********************************** RecvResponse
//!
//! let mut flow = flow.proceed();
//!
//! for line in ["HTTP/1.1 200 OK", "Content-Length: 9"] {
//!     flow.push_line(line);
//!     assert!(!flow.can_proceed());
//! }
//!
//! // The blank line ends the response head.
//! flow.push_line("");
//! assert!(flow.can_proceed());
//!
//! // ********************************** RecvBody
//!
//! let mut flow = flow.proceed().unwrap();
//!
//! assert_eq!(flow.response().status(), 200);
//!
//! flow.push_line("hi there");
//! assert!(flow.can_proceed());
//!
//! // ********************************** Cleanup
//!
//! let flow = match flow.proceed() {
//!     RecvBodyResult::Cleanup(v) => v,
//!     _ => panic!(),
//! };
//!
//! assert_eq!(flow.body(), "hi there\n");
//! assert_eq!(flow.close_reason(), Some("client sent Connection: close"));
//! ```
//!
//! # In scope:
//!
//! * `GET` requests with a fixed header set
//! * `content-length` and `transfer-encoding: chunked` bodies (line oriented)
//! * Following `http://` redirects
//!
//! # Out of scope:
//!
//! * TLS (https)
//! * Keep-alive and connection pooling
//! * Request bodies
//! * Header folding

use std::fmt;
use std::marker::PhantomData;

use crate::body::{BodyReader, Decoded};
use crate::close_reason::CloseReason;
use crate::redirect::Redirect as RedirectDecision;
use crate::response::ParsedResponse;
use crate::url::Target;

pub mod fetch;

mod prepare;
mod recvbody;
mod recvresp;
mod redirect;
mod sendreq;

#[cfg(test)]
pub(crate) mod test;

pub use fetch::{Event, FetchConfig, Fetcher};

/// State types for the Flow state machine.
///
/// These types are used as type parameters to `Flow<State>` to represent
/// the current state of the exchange.
pub mod state {
    pub(crate) trait Named {
        fn name() -> &'static str;
    }

    macro_rules! flow_state {
        ($n:tt) => {
            #[doc(hidden)]
            pub struct $n(());
            impl Named for $n {
                fn name() -> &'static str {
                    stringify!($n)
                }
            }
        };
    }

    flow_state!(Prepare);
    flow_state!(SendRequest);
    flow_state!(RecvResponse);
    flow_state!(RecvBody);
    flow_state!(Redirect);
    flow_state!(Cleanup);
}
use self::state::*;

/// One request/response exchange, in some state of the [state graph][crate::client].
pub struct Flow<State> {
    inner: Inner,
    _ph: PhantomData<State>,
}

// pub(crate) for tests to inspect state
#[derive(Debug)]
pub(crate) struct Inner {
    pub target: Target,
    pub request: Vec<u8>,
    pub head: Vec<String>,
    pub head_complete: bool,
    pub response: Option<ParsedResponse>,
    pub reader: Option<BodyReader>,
    pub end_of_stream: bool,
    pub decoded: Option<Decoded>,
    pub redirect: RedirectDecision,
    pub close_reason: Vec<CloseReason>,
}

impl<S> Flow<S> {
    fn wrap(inner: Inner) -> Flow<S>
    where
        S: Named,
    {
        let wrapped = Flow {
            inner,
            _ph: PhantomData,
        };

        debug!("{:?}", wrapped);

        wrapped
    }

    /// The target of this exchange.
    pub fn target(&self) -> &Target {
        &self.inner.target
    }

    /// All close reasons collected so far, oldest first.
    pub(crate) fn close_reasons(&self) -> String {
        let v: Vec<_> = self.inner.close_reason.iter().map(|r| r.explain()).collect();
        v.join(", ")
    }

    #[cfg(test)]
    pub(crate) fn inner(&self) -> &Inner {
        &self.inner
    }
}

/// Possible state transitions after receiving a response body.
///
/// See the [state graph][crate::client] for a visual representation.
pub enum RecvBodyResult {
    /// The response has a location header.
    Redirect(Flow<Redirect>),

    /// Go to cleanup.
    Cleanup(Flow<Cleanup>),
}

/// A finished exchange, as handed to the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Exchange {
    /// Where the request went.
    pub target: Target,
    /// The request as sent.
    pub request: String,
    /// The response head as received, lines joined with `\n`.
    pub head: String,
    /// The parsed status line and headers.
    pub response: ParsedResponse,
    /// The decoded body.
    pub body: String,
    /// Whether the stream ended before the body framing was satisfied.
    pub truncated: bool,
    /// How many redirects were followed to get here.
    pub redirects: usize,
}

// //////////////////////////////////////////////////////////////////////////////////////////// CLEANUP

impl Flow<Cleanup> {
    /// The parsed response.
    pub fn response(&self) -> &ParsedResponse {
        // Unwrap is OK, because we can't be in Cleanup without a response.
        self.inner.response.as_ref().unwrap()
    }

    /// The decoded body.
    pub fn body(&self) -> &str {
        self.inner.decoded.as_ref().map(|d| d.body.as_str()).unwrap_or("")
    }

    /// The connection is always closed, this gives the most recent reason.
    pub fn close_reason(&self) -> Option<&'static str> {
        self.inner.close_reason.last().map(|s| s.explain())
    }

    /// Turn the flow into the finished exchange.
    pub fn into_exchange(self) -> Exchange {
        let inner = self.inner;

        let (body, truncated) = match inner.decoded {
            Some(d) => (d.body, d.truncated),
            None => (String::new(), false),
        };

        Exchange {
            request: String::from_utf8_lossy(&inner.request).into_owned(),
            head: crate::util::join_lines(&inner.head),
            // Unwrap is OK, because we can't be in Cleanup without a response.
            response: inner.response.unwrap(),
            target: inner.target,
            body,
            truncated,
            redirects: 0,
        }
    }
}

// ////////////////////////////////////////////////////////////////////////////////////////////

impl<State: Named> fmt::Debug for Flow<State> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Flow<{}>", State::name())
    }
}
