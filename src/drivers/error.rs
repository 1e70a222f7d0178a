use std::io;
use thiserror::Error;
/// Recoverable failure while decoding one capture frame.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DecodeError {
    #[error("invalid frame length {actual}; expected one of {accepted:?}")]
    InvalidFrameLength { actual: usize, accepted: Vec<usize> },
}
/// Fatal failure of the instrument connection. Never retried.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("could not resolve instrument address {addr}: {source}")]
    Resolve {
        addr: String,
        #[source]
        source: io::Error,
    },
    #[error("instrument address {0} resolved to nothing")]
    NoAddress(String),
    #[error("failed to connect to {addr}: {source}")]
    Connect {
        addr: String,
        #[source]
        source: io::Error,
    },
    #[error("connection closed by the instrument")]
    Closed,
    #[error("transport I/O failure: {0}")]
    Io(#[from] io::Error),
}
