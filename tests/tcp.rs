use std::io::{BufRead, BufReader, Write};
use std::net::TcpListener;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use termfetch::client::{FetchConfig, Fetcher};
use termfetch::url;
use termfetch::Error;

/// Serve one connection with `response`, returning the request head as read.
fn serve_once(response: &'static str) -> (u16, JoinHandle<String>) {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();

    let handle = thread::spawn(move || {
        let (stream, _) = listener.accept().unwrap();
        let mut reader = BufReader::new(stream);

        let mut request = String::new();
        loop {
            let mut line = String::new();
            if reader.read_line(&mut line).unwrap() == 0 || line == "\r\n" {
                break;
            }
            request.push_str(&line);
        }

        let mut stream = reader.into_inner();
        stream.write_all(response.as_bytes()).unwrap();
        stream.flush().unwrap();

        request
    });

    (port, handle)
}

fn fetcher() -> Fetcher<termfetch::transport::TcpTransport> {
    Fetcher::tcp(FetchConfig::default().read_timeout(Some(Duration::from_secs(5))))
}

#[test]
fn content_length_over_tcp() {
    let (port, server) = serve_once(
        "HTTP/1.1 200 OK\r\n\
         Content-Length: 12\r\n\
         Content-Type: text/plain\r\n\
         \r\n\
         hello\r\n\
         world\r\n",
    );

    let target = url::parse(&format!("127.0.0.1:{}/greeting", port)).unwrap();
    let exchange = fetcher().fetch(target, |_| {}).unwrap();

    assert_eq!(exchange.response.status(), 200);
    assert_eq!(exchange.body, "hello\nworld\n");
    assert!(!exchange.truncated);

    let request = server.join().unwrap();
    assert_eq!(
        request,
        format!(
            "GET /greeting HTTP/1.1\r\n\
             Host: 127.0.0.1:{}\r\n\
             User-Agent: Terminal-Web-Client/1.0\r\n\
             Accept: */*\r\n\
             Connection: close\r\n",
            port
        )
    );
}

#[test]
fn chunked_over_tcp() {
    let (port, server) = serve_once(
        "HTTP/1.1 200 OK\r\n\
         Transfer-Encoding: chunked\r\n\
         \r\n\
         2\r\n\
         ab\r\n\
         cd\r\n\
         \r\n\
         0\r\n\
         \r\n",
    );

    let target = url::parse(&format!("127.0.0.1:{}", port)).unwrap();
    let exchange = fetcher().fetch(target, |_| {}).unwrap();

    assert_eq!(exchange.body, "ab\ncd\n");
    server.join().unwrap();
}

#[test]
fn server_closes_early() {
    let (port, server) = serve_once(
        "HTTP/1.1 200 OK\r\n\
         Content-Length: 1000\r\n\
         \r\n\
         partial\r\n",
    );

    let target = url::parse(&format!("127.0.0.1:{}", port)).unwrap();
    let exchange = fetcher().fetch(target, |_| {}).unwrap();

    assert!(exchange.truncated);
    assert_eq!(exchange.body, "partial\n");
    server.join().unwrap();
}

#[test]
fn redirect_between_servers() {
    let (second_port, second) = serve_once(
        "HTTP/1.1 200 OK\r\n\
         Content-Length: 3\r\n\
         \r\n\
         end\r\n",
    );

    // The location needs the port of the second server, so leak the response.
    let redirect: &'static str = Box::leak(
        format!(
            "HTTP/1.1 302 Found\r\n\
             Location: http://127.0.0.1:{}/final\r\n\
             Content-Length: 0\r\n\
             \r\n",
            second_port
        )
        .into_boxed_str(),
    );
    let (first_port, first) = serve_once(redirect);

    let target = url::parse(&format!("127.0.0.1:{}/start", first_port)).unwrap();
    let exchange = fetcher().fetch(target, |_| {}).unwrap();

    assert_eq!(exchange.redirects, 1);
    assert_eq!(exchange.target.port(), second_port);
    assert_eq!(exchange.body, "end\n");

    assert!(first.join().unwrap().starts_with("GET /start HTTP/1.1\r\n"));
    assert!(second.join().unwrap().starts_with("GET /final HTTP/1.1\r\n"));
}

#[test]
fn connection_refused() {
    // Bind and drop to find a port nobody listens on.
    let port = {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap().port()
    };

    let target = url::parse(&format!("127.0.0.1:{}", port)).unwrap();
    let err = fetcher().fetch(target, |_| {}).unwrap_err();

    assert!(matches!(err, Error::Connect { .. }));
}

#[test]
fn not_http_over_tcp() {
    let (port, server) = serve_once("SSH-2.0-OpenSSH_9.6\r\n\r\n");

    let target = url::parse(&format!("127.0.0.1:{}", port)).unwrap();
    let err = fetcher().fetch(target, |_| {}).unwrap_err();

    assert!(matches!(err, Error::NotHttp(_)));
    server.join().unwrap();
}

#[test]
fn silent_server_times_out() {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();

    // Accept, then hold the connection open without answering.
    let server = thread::spawn(move || {
        let (stream, _) = listener.accept().unwrap();
        thread::sleep(Duration::from_millis(1000));
        drop(stream);
    });

    let config = FetchConfig::default().read_timeout(Some(Duration::from_millis(100)));
    let target = url::parse(&format!("127.0.0.1:{}", port)).unwrap();

    let err = Fetcher::tcp(config).fetch(target, |_| {}).unwrap_err();

    assert_eq!(err, Error::Timeout);
    server.join().unwrap();
}
