use reqwest::StatusCode;
use thiserror::Error;

/// Failure of a single HTTP round-trip to one of the upstream APIs.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request to {service} failed")]
    Transport {
        service: &'static str,
        #[source]
        source: reqwest::Error,
    },

    #[error("{service} request failed with status {status}: {body}")]
    Status { service: &'static str, status: StatusCode, body: String },

    #[error("failed to parse {service} response")]
    Decode {
        service: &'static str,
        #[source]
        source: serde_json::Error,
    },
}

#[derive(Debug, Error)]
pub enum GeocodeError {
    #[error("no location found for '{0}'")]
    NotFound(String),

    #[error(transparent)]
    Service(#[from] FetchError),
}

/// Outcome of a failed lookup. Every leaf failure ends up as one of these.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LookupError {
    #[error("No location found for the given input")]
    NotFound,

    #[error("No temperature data found for the given location.")]
    NoData,

    #[error("Error fetching temperature: {0}")]
    Network(String),
}

impl From<GeocodeError> for LookupError {
    fn from(err: GeocodeError) -> Self {
        match err {
            GeocodeError::NotFound(_) => LookupError::NotFound,
            GeocodeError::Service(e) => e.into(),
        }
    }
}

impl From<FetchError> for LookupError {
    fn from(err: FetchError) -> Self {
        // reqwest keeps the OS-level cause (refused, timed out, ...) in `source()`.
        LookupError::Network(format!("{:#}", anyhow::Error::from(err)))
    }
}

/// Cut an error body down to something printable.
pub(crate) fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    if body.len() <= MAX {
        return body.to_string();
    }

    let mut end = MAX;
    while !body.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}...", &body[..end])
}
