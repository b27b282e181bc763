pub mod gemini_service;
pub mod geodb_service;
pub mod hotel_service;
pub mod itinerary_service;
pub mod places_service;
pub mod profile_service;
pub mod trip_service;

use thiserror::Error;

/// Failures talking to the third-party travel APIs.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("invalid endpoint: {0}")]
    Endpoint(#[from] url::ParseError),
    #[error("{service} returned {status}: {body}")]
    Status {
        service: &'static str,
        status: u16,
        body: String,
    },
    #[error("{0} API key is not configured")]
    MissingKey(&'static str),
    #[error("failed to parse itinerary: {reason}")]
    Generation { reason: String, raw: String },
}
