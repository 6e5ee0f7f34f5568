//! Interactive prompt: read a URL, fetch it, print the exchange.

use std::env;
use std::io::{self, BufRead, Write};
use std::process::ExitCode;
use std::time::Duration;

use log::warn;
use termfetch::client::{Event, FetchConfig, Fetcher};
use termfetch::redirect::Redirect;
use termfetch::url;

const PROMPT: &str = "URL: http://";

fn main() -> ExitCode {
    env_logger::init();

    let mut fetcher = Fetcher::tcp(config_from_env());

    let stdin = io::stdin();
    let mut input = stdin.lock();

    loop {
        let raw = match prompt(&mut input) {
            Ok(Some(v)) => v,
            // End of input.
            Ok(None) => return ExitCode::SUCCESS,
            Err(e) => {
                eprintln!("Failed to read input: {}", e);
                return ExitCode::FAILURE;
            }
        };

        let target = match url::parse(raw.trim()) {
            Ok(v) => v,
            Err(e) => {
                println!("Invalid URL: {}", e);
                continue;
            }
        };

        if let Err(e) = fetcher.fetch(target, print_event) {
            println!("Error: {}", e);
        }

        println!();
    }
}

fn prompt(input: &mut impl BufRead) -> io::Result<Option<String>> {
    print!("{}", PROMPT);
    io::stdout().flush()?;

    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        println!();
        return Ok(None);
    }

    Ok(Some(line))
}

fn print_event(event: Event<'_>) {
    match event {
        Event::Connecting(target) => {
            println!("Connecting to {}:{}", target.host(), target.port());
        }
        Event::Connected(_) => {}
        Event::RequestSent(text) => {
            println!("Request:");
            print!("{}", text.replace("\r\n", "\n"));
        }
        Event::ResponseHead(text) => {
            println!("Response:");
            println!("{}", text);
        }
        Event::Response(_) => {}
        Event::UnknownStatus(status) => {
            println!("Warning: unknown status code {}", status);
        }
        Event::Body { body, truncated } => {
            println!("Body:");
            print!("{}", body);
            if truncated {
                println!("(body ended early)");
            }
        }
        Event::Redirect(redirect) => match redirect {
            Redirect::None => {}
            Redirect::Follow { target, .. } => println!("Redirecting to http://{}", target),
            Redirect::UnsupportedScheme { location } => {
                println!("Not following redirect to {}", location);
            }
            Redirect::Invalid { location, error } => {
                println!("Not following redirect to {}: {}", location, error);
            }
        },
    }
}

fn config_from_env() -> FetchConfig {
    let mut config = FetchConfig::default();

    if let Some(v) = env_number("TERMFETCH_MAX_REDIRECTS") {
        config = config.max_redirects(v as usize);
    }

    if let Some(v) = env_number("TERMFETCH_TIMEOUT_SECS") {
        // 0 disables the timeouts.
        let timeout = (v > 0).then(|| Duration::from_secs(v));
        config = config.connect_timeout(timeout).read_timeout(timeout);
    }

    config
}

fn env_number(name: &str) -> Option<u64> {
    let value = env::var(name).ok()?;

    match value.trim().parse() {
        Ok(v) => Some(v),
        Err(_) => {
            warn!("Ignoring {}, not a number: {:?}", name, value);
            None
        }
    }
}
