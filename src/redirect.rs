//! Deciding whether to follow a `Location` header.

use http::header;

use crate::response::ParsedResponse;
use crate::url::{self, Target};
use crate::Error;

/// The only scheme we can follow.
const HTTP_PREFIX: &str = "http://";

/// The outcome of looking at the `Location` header of a response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Redirect {
    /// No `location` header.
    None,

    /// Follow the redirect to `target`.
    Follow {
        /// The header value as sent.
        location: String,
        /// Where to go next.
        target: Target,
    },

    /// The location uses some scheme other than `http://`. Not followed.
    UnsupportedScheme {
        /// The header value as sent.
        location: String,
    },

    /// The location could not be parsed. Not followed.
    Invalid {
        /// The header value as sent.
        location: String,
        /// Why it could not be parsed.
        error: Error,
    },
}

impl Redirect {
    /// The target to go to, if the redirect is to be followed.
    pub fn target(&self) -> Option<&Target> {
        match self {
            Redirect::Follow { target, .. } => Some(target),
            _ => None,
        }
    }

    /// The raw location header, if there was one.
    pub fn location(&self) -> Option<&str> {
        match self {
            Redirect::None => None,
            Redirect::Follow { location, .. }
            | Redirect::UnsupportedScheme { location }
            | Redirect::Invalid { location, .. } => Some(location),
        }
    }
}

/// Decide where to redirect given a parsed response.
///
/// Only absolute `http://` locations are followed. Anything else is reported
/// (logged) and ends the exchange without following.
pub fn resolve(response: &ParsedResponse) -> Redirect {
    let Some(value) = response.headers().get(header::LOCATION) else {
        return Redirect::None;
    };

    let location = String::from_utf8_lossy(value.as_bytes()).into_owned();

    let Some(rest) = location.strip_prefix(HTTP_PREFIX) else {
        warn!("Unsupported redirect scheme: {}", location);
        return Redirect::UnsupportedScheme { location };
    };

    match url::parse(rest) {
        Ok(target) => {
            debug!("Redirect to: {}", target);
            Redirect::Follow { location, target }
        }
        Err(error) => {
            warn!("Failed to parse redirect location {:?}: {}", location, error);
            Redirect::Invalid { location, error }
        }
    }
}
