//! Request serialization.

use std::io::Write;

use crate::url::Target;

/// Fixed `User-Agent` sent with every request.
pub const USER_AGENT: &str = "Terminal-Web-Client/1.0";

/// Build the bytes of a `GET` request for the target.
///
/// The header set is fixed. `Connection: close` is always sent, which means
/// the server ends the exchange by closing the socket.
///
/// ```
/// let target = termfetch::url::parse("example.test/page").unwrap();
/// let bytes = termfetch::request::build(&target);
///
/// assert_eq!(bytes, b"\
///     GET /page HTTP/1.1\r\n\
///     Host: example.test\r\n\
///     User-Agent: Terminal-Web-Client/1.0\r\n\
///     Accept: */*\r\n\
///     Connection: close\r\n\
///     \r\n");
/// ```
pub fn build(target: &Target) -> Vec<u8> {
    let mut w = Vec::with_capacity(128);

    // Writing to a Vec does not fail.
    let _ = write_prelude(target, &mut w);

    w
}

fn write_prelude(target: &Target, w: &mut Vec<u8>) -> std::io::Result<()> {
    write!(w, "GET /{} HTTP/1.1\r\n", target.path())?;

    write!(w, "Host: {}\r\n", target.authority())?;
    write!(w, "User-Agent: {}\r\n", USER_AGENT)?;
    write!(w, "Accept: */*\r\n")?;
    write!(w, "Connection: close\r\n")?;

    write!(w, "\r\n")
}
