/// Reasons for closing the connection at the end of an exchange.
///
/// Connections are never reused, so an exchange always ends with a close.
/// The reasons are kept for logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CloseReason {
    /// We sent `connection: close`.
    ClientConnectionClose,

    /// Server sent `connection: close`.
    ServerConnectionClose,

    /// The stream ended before the body framing was satisfied.
    TruncatedBody,

    /// The response has a location we follow, which needs a new connection.
    Redirect,
}

impl CloseReason {
    pub(crate) fn explain(&self) -> &'static str {
        match self {
            CloseReason::ClientConnectionClose => "client sent Connection: close",
            CloseReason::ServerConnectionClose => "server sent Connection: close",
            CloseReason::TruncatedBody => "response body ended early",
            CloseReason::Redirect => "following redirect",
        }
    }
}
