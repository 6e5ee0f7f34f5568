//! The byte stream an exchange runs over.
//!
//! The protocol engine only needs to write bytes and read lines. [`TcpTransport`]
//! is the blocking `std::net` implementation, tests use scripted connections.

use std::io::{self, BufRead, BufReader, Write};
use std::net::{Shutdown, TcpStream, ToSocketAddrs};
use std::time::Duration;

use crate::util::log_data;
use crate::Error;

/// A source of text lines.
pub trait LineSource {
    /// Read the next line without its `\n` or `\r\n` ending.
    ///
    /// `Ok(None)` signals end of stream.
    fn read_line(&mut self) -> Result<Option<String>, Error>;
}

/// An open connection, exclusively owned by one exchange.
pub trait Connection: LineSource {
    /// Write all of `data` to the peer.
    fn write_bytes(&mut self, data: &[u8]) -> Result<(), Error>;

    /// Close the connection.
    fn close(self)
    where
        Self: Sized;
}

/// Opens connections.
pub trait Transport {
    /// The connection type.
    type Conn: Connection;

    /// Open a new connection to `host:port`.
    fn open(&mut self, host: &str, port: u16) -> Result<Self::Conn, Error>;
}

impl<T: LineSource + ?Sized> LineSource for &mut T {
    fn read_line(&mut self) -> Result<Option<String>, Error> {
        (**self).read_line()
    }
}

/// Blocking TCP transport.
#[derive(Debug, Clone, Default)]
pub struct TcpTransport {
    connect_timeout: Option<Duration>,
    read_timeout: Option<Duration>,
}

impl TcpTransport {
    /// New transport without timeouts.
    pub fn new() -> Self {
        Self::default()
    }

    /// Limit how long each connect attempt may take.
    pub fn connect_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.connect_timeout = timeout;
        self
    }

    /// Limit how long a single read may block.
    pub fn read_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.read_timeout = timeout;
        self
    }

    fn connect(&self, host: &str, port: u16) -> io::Result<TcpStream> {
        let Some(timeout) = self.connect_timeout else {
            return TcpStream::connect((host, port));
        };

        let mut last_err = None;

        for addr in (host, port).to_socket_addrs()? {
            match TcpStream::connect_timeout(&addr, timeout) {
                Ok(stream) => return Ok(stream),
                Err(e) => {
                    debug!("Connect to {} failed: {}", addr, e);
                    last_err = Some(e);
                }
            }
        }

        Err(last_err.unwrap_or_else(|| {
            io::Error::new(io::ErrorKind::NotFound, "host resolved to no addresses")
        }))
    }
}

impl Transport for TcpTransport {
    type Conn = TcpConnection;

    fn open(&mut self, host: &str, port: u16) -> Result<TcpConnection, Error> {
        let stream = self.connect(host, port).map_err(|e| Error::Connect {
            host: host.to_string(),
            port,
            reason: e.to_string(),
        })?;

        stream.set_read_timeout(self.read_timeout)?;

        debug!("Connected to {}:{}", host, port);

        Ok(TcpConnection {
            reader: BufReader::new(stream),
        })
    }
}

/// A TCP connection reading lines through a buffer.
#[derive(Debug)]
pub struct TcpConnection {
    reader: BufReader<TcpStream>,
}

impl LineSource for TcpConnection {
    fn read_line(&mut self) -> Result<Option<String>, Error> {
        let mut buf = Vec::new();

        let n = self.reader.read_until(b'\n', &mut buf)?;
        if n == 0 {
            return Ok(None);
        }

        log_data(&buf);

        Ok(Some(strip_line_ending(buf)))
    }
}

impl Connection for TcpConnection {
    fn write_bytes(&mut self, data: &[u8]) -> Result<(), Error> {
        log_data(data);

        let stream = self.reader.get_mut();
        stream.write_all(data)?;
        stream.flush()?;

        Ok(())
    }

    fn close(self) {
        // The peer might already have closed, which is fine.
        let _ = self.reader.get_ref().shutdown(Shutdown::Both);
    }
}

/// Turn a raw line into text without its `\n` or `\r\n` ending.
///
/// Invalid UTF-8 is replaced rather than failing the read.
pub(crate) fn strip_line_ending(mut buf: Vec<u8>) -> String {
    if buf.last() == Some(&b'\n') {
        buf.pop();
        if buf.last() == Some(&b'\r') {
            buf.pop();
        }
    }

    match String::from_utf8(buf) {
        Ok(v) => v,
        Err(e) => String::from_utf8_lossy(e.as_bytes()).into_owned(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strip_crlf() {
        assert_eq!(strip_line_ending(b"abc\r\n".to_vec()), "abc");
        assert_eq!(strip_line_ending(b"abc\n".to_vec()), "abc");
        assert_eq!(strip_line_ending(b"\r\n".to_vec()), "");
    }

    #[test]
    fn last_line_without_ending() {
        assert_eq!(strip_line_ending(b"abc".to_vec()), "abc");
        // Lone \r is kept, it is not a line ending on its own.
        assert_eq!(strip_line_ending(b"abc\r".to_vec()), "abc\r");
    }

    #[test]
    fn lossy_utf8() {
        assert_eq!(strip_line_ending(b"a\xFFb\r\n".to_vec()), "a\u{FFFD}b");
    }

    #[test]
    fn unresolvable_host() {
        let mut transport = TcpTransport::new().connect_timeout(Some(Duration::from_millis(50)));
        let err = transport.open("host.invalid", 80).unwrap_err();
        assert!(matches!(err, Error::Connect { port: 80, .. }));
    }
}
