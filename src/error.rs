//! Error types shared by the parser and the upstream lookups.

use thiserror::Error;

/// Failure modes of the reservation text parser.
///
/// Either variant fails the whole parse; partial itineraries are never
/// returned.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("no ticket number line in reservation text")]
    NoTicketNumber,

    #[error("segment line {line:?} split into {found} fields, expected {expected}")]
    MalformedSegment {
        line: String,
        found: usize,
        expected: usize,
    },
}

/// Failure modes of a single upstream lookup.
///
/// `Body` covers a 2xx response whose payload is not valid JSON; responses
/// that decode but are missing fare fields are classified later, at the
/// compare stage.
#[derive(Error, Debug)]
pub enum LookupError {
    #[error("transport error: {0}")]
    Transport(String),

    #[error("upstream returned status {0}")]
    Status(u16),

    #[error("invalid response body: {0}")]
    Body(String),
}
