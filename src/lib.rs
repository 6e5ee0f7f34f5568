//! Line-oriented HTTP/1.1 client engine.
//!
//! termfetch turns `host[:port][/path]` into a `GET` request, sends it over a
//! byte stream, and decodes the response: status line, headers and body. Both
//! `content-length` and `transfer-encoding: chunked` bodies are supported,
//! and `http://` redirects are followed up to a bound.
//!
//! The pieces can be used on their own:
//!
//! * [`url::parse`] – user input to a connection [`Target`](url::Target).
//! * [`request::build`] – the request bytes for a target.
//! * [`response::parse`] – response head lines to a [`ParsedResponse`](response::ParsedResponse).
//! * [`body::decode`] – the body, framed by the parsed headers.
//! * [`redirect::resolve`] – whether and where to redirect.
//!
//! [`client::Flow`] ties them together as a state machine without I/O, and
//! [`client::Fetcher`] runs flows over a [`transport::Transport`].
//!
//! ```no_run
//! use termfetch::client::{Event, FetchConfig, Fetcher};
//!
//! let target = termfetch::url::parse("example.com").unwrap();
//!
//! let mut fetcher = Fetcher::tcp(FetchConfig::default());
//!
//! let exchange = fetcher
//!     .fetch(target, |event| {
//!         if let Event::RequestSent(text) = event {
//!             println!("{}", text);
//!         }
//!     })
//!     .unwrap();
//!
//! println!("{} {}", exchange.response.status(), exchange.response.message());
//! println!("{}", exchange.body);
//! ```

#![forbid(unsafe_code)]
#![warn(clippy::all)]
#![deny(missing_docs)]

#[macro_use]
extern crate log;

mod error;
pub use error::Error;

mod close_reason;
mod util;

pub mod body;
pub mod client;
pub mod redirect;
pub mod request;
pub mod response;
pub mod transport;
pub mod url;

pub use http;
