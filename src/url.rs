//! Parsing user input into connection coordinates.
//!
//! The input is the part of a URL that follows `http://`, i.e.
//! `host[:port][/path]`. The scheme is implied, there is no support for
//! user info, queries get no special treatment (they stay in the path).

use std::fmt;
use std::num::IntErrorKind;
use std::str::FromStr;

use crate::Error;

/// Port used when the input does not name one.
pub const DEFAULT_PORT: u16 = 80;

/// Where to connect and what to ask for.
///
/// The `path` is stored without its leading `/`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Target {
    host: String,
    port: u16,
    path: String,
}

impl Target {
    /// The host name (or ip) to connect to.
    pub fn host(&self) -> &str {
        &self.host
    }

    /// The port to connect to.
    pub fn port(&self) -> u16 {
        self.port
    }

    /// The path, without leading `/`.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// `host` or `host:port` when the port is not the default.
    pub fn authority(&self) -> String {
        if self.port == DEFAULT_PORT {
            self.host.clone()
        } else {
            format!("{}:{}", self.host, self.port)
        }
    }
}

/// Parse `host[:port][/path]` into a [`Target`].
///
/// ```
/// let t = termfetch::url::parse("example.test:8080/index.html").unwrap();
/// assert_eq!(t.host(), "example.test");
/// assert_eq!(t.port(), 8080);
/// assert_eq!(t.path(), "index.html");
/// ```
pub fn parse(raw: &str) -> Result<Target, Error> {
    if raw.is_empty() {
        return Err(Error::EmptyInput);
    }

    let (host_part, path) = raw.split_once('/').unwrap_or((raw, ""));

    if host_part.is_empty() {
        return Err(Error::EmptyHost);
    }

    let (hostname, port_text) = host_part.split_once(':').unwrap_or((host_part, "80"));

    if hostname.is_empty() {
        return Err(Error::EmptyHostname);
    }

    let port = parse_port(port_text)?;

    Ok(Target {
        host: hostname.to_string(),
        port,
        path: path.to_string(),
    })
}

fn parse_port(text: &str) -> Result<u16, Error> {
    // i64 so we can tell "not a number" apart from "a number, but not a port".
    match text.parse::<i64>() {
        Ok(n) => u16::try_from(n).map_err(|_| Error::PortOutOfRange(text.to_string())),
        // Still an integer, just a very large one.
        Err(e) if matches!(e.kind(), IntErrorKind::PosOverflow | IntErrorKind::NegOverflow) => {
            Err(Error::PortOutOfRange(text.to_string()))
        }
        Err(_) => Err(Error::InvalidPort(text.to_string())),
    }
}

impl FromStr for Target {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse(s)
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.authority())?;
        if !self.path.is_empty() {
            write!(f, "/{}", self.path)?;
        }
        Ok(())
    }
}
