use std::fmt;
use std::io;

/// Error type for termfetch
#[derive(Debug, Clone, PartialEq, Eq)]
#[allow(missing_docs)]
#[non_exhaustive]
pub enum Error {
    EmptyInput,
    EmptyHost,
    EmptyHostname,
    InvalidPort(String),
    PortOutOfRange(String),
    Connect {
        host: String,
        port: u16,
        reason: String,
    },
    Io(String),
    Timeout,
    NoResponse,
    NotHttp(String),
    MalformedStatusLine(String),
    InvalidStatusCode(String),
    TooManyRedirects(usize),
}

impl Error {
    /// Tell if this error comes from parsing user input as a URL.
    ///
    /// Such errors are recoverable by asking for a new URL.
    pub fn is_url_error(&self) -> bool {
        matches!(
            self,
            Error::EmptyInput
                | Error::EmptyHost
                | Error::EmptyHostname
                | Error::InvalidPort(_)
                | Error::PortOutOfRange(_)
        )
    }

    /// Tell if this error comes from parsing the response head.
    pub fn is_header_error(&self) -> bool {
        matches!(
            self,
            Error::NoResponse
                | Error::NotHttp(_)
                | Error::MalformedStatusLine(_)
                | Error::InvalidStatusCode(_)
        )
    }
}

impl From<io::Error> for Error {
    fn from(value: io::Error) -> Self {
        match value.kind() {
            // Read timeouts surface as WouldBlock on unix and TimedOut on windows.
            io::ErrorKind::TimedOut | io::ErrorKind::WouldBlock => Error::Timeout,
            _ => Error::Io(value.to_string()),
        }
    }
}

impl std::error::Error for Error {}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::EmptyInput => write!(f, "a url is required"),
            Error::EmptyHost => write!(f, "the host is required"),
            Error::EmptyHostname => write!(f, "the host name is required"),
            Error::InvalidPort(v) => write!(f, "failed to parse the port number: {}", v),
            Error::PortOutOfRange(v) => {
                write!(f, "port must be between 0 and 65535 (inclusive): {}", v)
            }
            Error::Connect { host, port, reason } => {
                write!(f, "failed to connect to {}:{}: {}", host, port, reason)
            }
            Error::Io(v) => write!(f, "io error: {}", v),
            Error::Timeout => write!(f, "timed out waiting for the server"),
            Error::NoResponse => write!(f, "no response from server"),
            Error::NotHttp(v) => write!(f, "response is not http: {}", v),
            Error::MalformedStatusLine(v) => write!(f, "malformed status line: {}", v),
            Error::InvalidStatusCode(v) => write!(f, "status code is not a number: {}", v),
            Error::TooManyRedirects(v) => write!(f, "more than {} redirects", v),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::test::scenario::Scenario;
    use crate::{response, url};

    fn lines(v: &[&str]) -> Vec<String> {
        v.iter().map(|s| s.to_string()).collect()
    }

    // EmptyInput
    #[test]
    fn test_empty_input() {
        let err = url::parse("").unwrap_err();
        assert_eq!(err, Error::EmptyInput);
        assert!(err.is_url_error());
    }

    // EmptyHost
    #[test]
    fn test_empty_host() {
        assert_eq!(url::parse("/x").unwrap_err(), Error::EmptyHost);
    }

    // EmptyHostname
    #[test]
    fn test_empty_hostname() {
        assert_eq!(url::parse(":81/x").unwrap_err(), Error::EmptyHostname);
    }

    // InvalidPort
    #[test]
    fn test_invalid_port() {
        let err = url::parse("h:notanum/x").unwrap_err();
        assert_eq!(err, Error::InvalidPort("notanum".into()));
    }

    // PortOutOfRange
    #[test]
    fn test_port_out_of_range() {
        let err = url::parse("h:99999/x").unwrap_err();
        assert_eq!(err, Error::PortOutOfRange("99999".into()));
    }

    // Connect
    #[test]
    fn test_connect() {
        let scenario = Scenario::builder().refuse_connect().build();
        let err = scenario.fetch().unwrap_err();
        assert!(matches!(err, Error::Connect { port: 80, .. }));
        assert!(!err.is_url_error());
    }

    // NoResponse
    #[test]
    fn test_no_response() {
        let err = response::parse(&[]).unwrap_err();
        assert_eq!(err, Error::NoResponse);
        assert!(err.is_header_error());
    }

    // NotHttp
    #[test]
    fn test_not_http() {
        let err = response::parse(&lines(&["SSH-2.0-OpenSSH_9.6", ""])).unwrap_err();
        assert!(matches!(err, Error::NotHttp(_)));
    }

    // MalformedStatusLine
    #[test]
    fn test_malformed_status_line() {
        let err = response::parse(&lines(&["HTTP/1.1 200", ""])).unwrap_err();
        assert!(matches!(err, Error::MalformedStatusLine(_)));
    }

    // InvalidStatusCode
    #[test]
    fn test_invalid_status_code() {
        let err = response::parse(&lines(&["HTTP/1.1 abc OK", ""])).unwrap_err();
        assert_eq!(err, Error::InvalidStatusCode("abc".into()));
    }

    // TooManyRedirects
    #[test]
    fn test_too_many_redirects() {
        let scenario = Scenario::builder()
            .max_redirects(0)
            .respond(&["HTTP/1.1 302 Found", "Location: http://b.test/", ""])
            .build();
        let err = scenario.fetch().unwrap_err();
        assert_eq!(err, Error::TooManyRedirects(0));
    }

    // Timeout
    #[test]
    fn test_from_io_error() {
        let timeout = io::Error::new(io::ErrorKind::WouldBlock, "resource unavailable");
        assert_eq!(Error::from(timeout), Error::Timeout);

        let reset = io::Error::new(io::ErrorKind::ConnectionReset, "reset");
        assert!(matches!(Error::from(reset), Error::Io(_)));
    }
}
