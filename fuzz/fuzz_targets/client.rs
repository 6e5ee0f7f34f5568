#![no_main]

use libfuzzer_sys::fuzz_target;
use termfetch::client::state::RecvBody;
use termfetch::client::{Flow, RecvBodyResult};
use termfetch::transport::LineSource;
use termfetch::{body, response, url, Error};

// Response headers that drive body framing and redirects
const RELEVANT_RESPONSE_HEADERS: &[(&str, &[&str])] = &[
    // Header name, possible values
    ("Content-Length", &["0", "5", "10", "100", "-1", "abc"]),
    ("Transfer-Encoding", &["chunked", "CHUNKED", "gzip"]),
    ("Connection", &["close", "keep-alive"]),
    (
        "Location",
        &[
            "http://example.com/redirect",
            "http://example.com:99999/",
            "https://example.com/",
            "/relative/path",
        ],
    ),
    ("Content-Type", &["text/plain", "text/html"]),
];

// List of status codes to randomly choose from
const STATUS_CODES: &[u16] = &[200, 204, 301, 302, 404, 500, 299, 999];

fuzz_target!(|data: &[u8]| {
    let text = String::from_utf8_lossy(data);
    let lines: Vec<String> = text.lines().map(|l| l.to_string()).collect();

    // The raw input as user typed url and as a response head.
    if let Ok(t) = url::parse(text.trim()) {
        // Display must parse back to the same target.
        assert_eq!(url::parse(&t.to_string()), Ok(t));
    }
    let _ = response::parse(&lines);

    if data.len() < 4 {
        return;
    }

    let flow = Flow::new(url::parse("fuzz.test/path").unwrap());
    let mut flow = flow.proceed().proceed();

    let status = STATUS_CODES[(data[0] as usize) % STATUS_CODES.len()];
    flow.push_line(&format!("HTTP/1.1 {} Fuzz", status));

    // Randomize the number of headers, 0 to 4
    let header_count = (data[1] as usize) % 5;

    for i in 0..header_count {
        if data.len() <= 3 + i {
            break;
        }

        let (name, values) =
            RELEVANT_RESPONSE_HEADERS[(data[2 + i] as usize) % RELEVANT_RESPONSE_HEADERS.len()];
        let value = values[(data[3 + i] as usize) % values.len()];

        flow.push_line(&format!("{}: {}", name, value));
    }

    flow.push_line("");

    let flow = match flow.proceed() {
        Ok(v) => v,
        Err(_) => return,
    };

    // The rest of the input is the body.
    let body_lines = &lines[lines.len().min(1)..];

    // The incremental decoder and the one-shot decoder must agree.
    let decoded = match body::decode(flow.response(), Lines(body_lines.iter())) {
        Ok(v) => v,
        Err(_) => return,
    };

    handle_recv_body(flow, body_lines, decoded);
});

struct Lines<'a>(std::slice::Iter<'a, String>);

impl LineSource for Lines<'_> {
    fn read_line(&mut self) -> Result<Option<String>, Error> {
        Ok(self.0.next().cloned())
    }
}

fn handle_recv_body(mut flow: Flow<RecvBody>, lines: &[String], expected: body::Decoded) {
    for line in lines {
        if flow.can_proceed() {
            break;
        }
        flow.push_line(line);
    }

    if !flow.can_proceed() {
        flow.end_of_stream();
    }

    let exchange = match flow.proceed() {
        RecvBodyResult::Cleanup(flow) => flow.into_exchange(),
        RecvBodyResult::Redirect(mut flow) => {
            let _ = flow.as_new_flow();
            flow.proceed().into_exchange()
        }
    };

    assert_eq!(exchange.body, expected.body);
    assert_eq!(exchange.truncated, expected.truncated);
}
