use super::state::{RecvResponse, SendRequest};
use super::Flow;

impl Flow<SendRequest> {
    /// The request bytes to write to the connection.
    ///
    /// ```text
    /// GET /bar HTTP/1.1\r\n
    /// Host: my.server.test\r\n
    /// User-Agent: Terminal-Web-Client/1.0\r\n
    /// Accept: */*\r\n
    /// Connection: close\r\n
    /// \r\n
    /// ```
    pub fn request(&self) -> &[u8] {
        &self.inner.request
    }

    /// The request as text, for showing to a user.
    pub fn request_text(&self) -> String {
        String::from_utf8_lossy(&self.inner.request).into_owned()
    }

    /// Continue to receiving the response.
    ///
    /// Call this once [`request()`](Self::request) has been written to the connection.
    pub fn proceed(self) -> Flow<RecvResponse> {
        Flow::wrap(self.inner)
    }
}
