use std::str;

/// Trace log raw wire data, line by line.
pub(crate) fn log_data(data: &[u8]) {
    if !log_enabled!(log::Level::Trace) {
        return;
    }

    for line in data.split_inclusive(|c| *c == b'\n') {
        match str::from_utf8(line) {
            Ok(s) => trace!("{:?}", s),
            Err(_) => trace!("{:?}", line),
        }
    }
}

/// Join lines with `\n`, the way they are shown to a user.
pub(crate) fn join_lines(lines: &[String]) -> String {
    lines.join("\n")
}
