use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use serde_json::json;
use thiserror::Error;

use crate::db::store::StoreError;
use crate::services::ClientError;

/// Failures of the trip persistence operations.
#[derive(Debug, Error)]
pub enum TripError {
    #[error("validation error: {0}")]
    Validation(String),
    #[error("persistence error: {0}")]
    Persistence(#[from] StoreError),
}

#[derive(Debug, Error)]
pub enum ProfileError {
    #[error("validation error: {0}")]
    Validation(String),
    #[error("no profile stored for {0}")]
    NotFound(String),
    #[error("profile read failed: {0}")]
    Load(StoreError),
    #[error("profile write failed: {0}")]
    Save(StoreError),
}

/// Errors surfaced by the HTTP handlers.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    Upstream(String),
    #[error("{0}")]
    Internal(String),
}

impl From<TripError> for ApiError {
    fn from(err: TripError) -> Self {
        match err {
            TripError::Validation(msg) => ApiError::BadRequest(msg),
            TripError::Persistence(err) => {
                log::error!("Failed to persist trip: {}", err);
                ApiError::Internal("Failed to save trip.".to_string())
            }
        }
    }
}

impl From<ProfileError> for ApiError {
    fn from(err: ProfileError) -> Self {
        match err {
            ProfileError::Validation(msg) => ApiError::BadRequest(msg),
            ProfileError::NotFound(_) => ApiError::NotFound("Failed to load profile data".to_string()),
            ProfileError::Load(err) => {
                log::error!("Error loading profile: {}", err);
                ApiError::Internal("An error occurred while loading your profile".to_string())
            }
            ProfileError::Save(err) => {
                log::error!("Error updating profile: {}", err);
                ApiError::Internal("Failed to update profile".to_string())
            }
        }
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        log::error!("Store operation failed: {}", err);
        ApiError::Internal("Failed to retrieve trips.".to_string())
    }
}

impl From<ClientError> for ApiError {
    fn from(err: ClientError) -> Self {
        log::error!("Upstream API failed: {}", err);
        ApiError::Upstream(err.to_string())
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Upstream(_) => StatusCode::BAD_GATEWAY,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(json!({ "error": self.to_string() }))
    }
}
