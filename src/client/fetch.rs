//! Driving flows over a transport.

use std::time::Duration;

use crate::redirect::Redirect;
use crate::response::ParsedResponse;
use crate::transport::{Connection, TcpTransport, Transport};
use crate::url::Target;
use crate::Error;

use super::state::Prepare;
use super::{Exchange, Flow, RecvBodyResult};

/// Default bound on how many redirects are followed.
pub const DEFAULT_MAX_REDIRECTS: usize = 10;

/// Default connect and read timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Settings for [`Fetcher`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchConfig {
    max_redirects: usize,
    connect_timeout: Option<Duration>,
    read_timeout: Option<Duration>,
}

impl Default for FetchConfig {
    fn default() -> Self {
        FetchConfig {
            max_redirects: DEFAULT_MAX_REDIRECTS,
            connect_timeout: Some(DEFAULT_TIMEOUT),
            read_timeout: Some(DEFAULT_TIMEOUT),
        }
    }
}

impl FetchConfig {
    /// Max number of redirects to follow before failing with
    /// [`Error::TooManyRedirects`]. With `0` any redirect to an `http://`
    /// location is an error.
    pub fn max_redirects(mut self, v: usize) -> Self {
        self.max_redirects = v;
        self
    }

    /// Timeout for opening a connection. `None` waits forever.
    pub fn connect_timeout(mut self, v: Option<Duration>) -> Self {
        self.connect_timeout = v;
        self
    }

    /// Timeout for each read. `None` waits forever.
    pub fn read_timeout(mut self, v: Option<Duration>) -> Self {
        self.read_timeout = v;
        self
    }

    /// The configured redirect bound.
    pub fn get_max_redirects(&self) -> usize {
        self.max_redirects
    }

    /// The configured connect timeout.
    pub fn get_connect_timeout(&self) -> Option<Duration> {
        self.connect_timeout
    }

    /// The configured read timeout.
    pub fn get_read_timeout(&self) -> Option<Duration> {
        self.read_timeout
    }

    /// A TCP transport using the configured timeouts.
    pub fn tcp_transport(&self) -> TcpTransport {
        TcpTransport::new()
            .connect_timeout(self.connect_timeout)
            .read_timeout(self.read_timeout)
    }
}

/// Things happening during a fetch, for showing to a user.
#[derive(Debug)]
pub enum Event<'a> {
    /// About to open a connection.
    Connecting(&'a Target),

    /// The connection is open.
    Connected(&'a Target),

    /// The request was written. The text is the raw request.
    RequestSent(&'a str),

    /// The response head was received. The text is the raw head.
    ResponseHead(&'a str),

    /// The response head was parsed.
    Response(&'a ParsedResponse),

    /// The status code is not a registered HTTP/1.1 code.
    UnknownStatus(u16),

    /// The body was decoded.
    Body {
        /// The decoded text.
        body: &'a str,
        /// Whether the stream ended before the framing was satisfied.
        truncated: bool,
    },

    /// The response has a location header. The redirect is only followed
    /// if it is [`Redirect::Follow`].
    Redirect(&'a Redirect),
}

/// Runs exchanges, following redirects.
///
/// Each exchange gets its own connection, which is closed before the next
/// exchange starts or `fetch()` returns.
#[derive(Debug)]
pub struct Fetcher<T> {
    transport: T,
    config: FetchConfig,
}

impl Fetcher<TcpTransport> {
    /// A fetcher over TCP, using the timeouts in `config`.
    pub fn tcp(config: FetchConfig) -> Self {
        Fetcher::new(config.tcp_transport(), config)
    }
}

enum Step {
    Done(Exchange),
    Redirect(Flow<Prepare>),
}

impl<T: Transport> Fetcher<T> {
    /// Create a fetcher over the given transport.
    pub fn new(transport: T, config: FetchConfig) -> Self {
        Fetcher { transport, config }
    }

    /// The settings in use.
    pub fn config(&self) -> &FetchConfig {
        &self.config
    }

    /// Fetch `target`, following redirects.
    ///
    /// `on_event` is called as the exchanges progress. An error ends the
    /// fetch, nothing is retried.
    pub fn fetch<F>(&mut self, target: Target, mut on_event: F) -> Result<Exchange, Error>
    where
        F: FnMut(Event<'_>),
    {
        let mut flow = Flow::new(target);
        let mut redirects = 0;

        loop {
            match self.exchange(flow, &mut on_event)? {
                Step::Done(mut exchange) => {
                    exchange.redirects = redirects;
                    return Ok(exchange);
                }
                Step::Redirect(next) => {
                    redirects += 1;

                    if redirects > self.config.max_redirects {
                        warn!("Giving up after {} redirects", self.config.max_redirects);
                        return Err(Error::TooManyRedirects(self.config.max_redirects));
                    }

                    flow = next;
                }
            }
        }
    }

    fn exchange<F>(&mut self, flow: Flow<Prepare>, on_event: &mut F) -> Result<Step, Error>
    where
        F: FnMut(Event<'_>),
    {
        on_event(Event::Connecting(flow.target()));

        let mut conn = self.transport.open(flow.host(), flow.port())?;

        on_event(Event::Connected(flow.target()));

        let result = run(flow, &mut conn, on_event);

        conn.close();

        result
    }
}

fn run<C, F>(flow: Flow<Prepare>, conn: &mut C, on_event: &mut F) -> Result<Step, Error>
where
    C: Connection,
    F: FnMut(Event<'_>),
{
    // ********************************** SendRequest

    let flow = flow.proceed();

    conn.write_bytes(flow.request())?;
    on_event(Event::RequestSent(&flow.request_text()));

    // ********************************** RecvResponse

    let mut flow = flow.proceed();

    while !flow.can_proceed() {
        match conn.read_line()? {
            Some(line) => flow.push_line(&line),
            None => {
                debug!("Stream ended before response head was complete");
                return Err(Error::NoResponse);
            }
        }
    }

    on_event(Event::ResponseHead(&flow.head()));

    let mut flow = flow.proceed()?;

    on_event(Event::Response(flow.response()));

    if !flow.response().is_known_status() {
        on_event(Event::UnknownStatus(flow.response().status()));
    }

    // ********************************** RecvBody

    while !flow.can_proceed() {
        match conn.read_line()? {
            Some(line) => flow.push_line(&line),
            None => flow.end_of_stream(),
        }
    }

    match flow.proceed() {
        // ********************************** Redirect
        RecvBodyResult::Redirect(mut flow) => {
            on_event(Event::Body {
                body: flow.body(),
                truncated: flow.is_truncated(),
            });
            on_event(Event::Redirect(flow.redirect()));

            if let Some(next) = flow.as_new_flow() {
                debug!("Close connection: {}", flow.close_reasons());
                return Ok(Step::Redirect(next));
            }

            let flow = flow.proceed();
            debug!("Close connection: {}", flow.close_reasons());

            Ok(Step::Done(flow.into_exchange()))
        }

        // ********************************** Cleanup
        RecvBodyResult::Cleanup(flow) => {
            debug!("Close connection: {}", flow.close_reasons());
            let exchange = flow.into_exchange();

            on_event(Event::Body {
                body: &exchange.body,
                truncated: exchange.truncated,
            });

            Ok(Step::Done(exchange))
        }
    }
}
