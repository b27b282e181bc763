use std::sync::Arc;

use mongodb::bson::{self, Document};

use crate::db::store::{DocumentStore, StoreError, AI_GENERATED_TRIPS, SERVER_TIMESTAMP, TRIPS};
use crate::error::TripError;
use crate::models::itinerary::Itinerary;
use crate::models::trip::{Trip, TripDate, TripView};
use crate::services::itinerary_service::normalize_itinerary;

/// Validates, orders and writes trips for one store.
pub struct TripService {
    store: Arc<dyn DocumentStore>,
}

impl TripService {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    /// Saves a user-built trip with each day ordered by time of day.
    pub async fn save_trip(
        &self,
        user_id: &str,
        city_name: &str,
        start_date: impl Into<TripDate>,
        end_date: impl Into<TripDate>,
        itinerary: Itinerary,
    ) -> Result<String, TripError> {
        let city = validate_city(city_name)?;
        let document = trip_document(
            user_id,
            city,
            start_date.into(),
            end_date.into(),
            normalize_itinerary(itinerary),
            false,
        )?;

        let id = self.store.add(TRIPS, document).await?;
        log::info!("Saved trip {} to {} for user {}", id, city, user_id);
        Ok(id)
    }

    /// Saves a generated itinerary exactly in the order it was produced.
    pub async fn save_ai_trip(
        &self,
        user_id: &str,
        city_name: &str,
        start_date: impl Into<TripDate>,
        end_date: impl Into<TripDate>,
        itinerary: Itinerary,
    ) -> Result<String, TripError> {
        let city = validate_city(city_name)?;
        let document = trip_document(
            user_id,
            city,
            start_date.into(),
            end_date.into(),
            itinerary,
            true,
        )?;

        let id = self.store.add(AI_GENERATED_TRIPS, document).await?;
        log::info!("Saved generated trip {} to {} for user {}", id, city, user_id);
        Ok(id)
    }

    /// Saved and generated trips of a user, newest first.
    pub async fn trips_for_user(&self, user_id: &str) -> Result<Vec<TripView>, TripError> {
        let mut trips = Vec::new();
        for collection in [TRIPS, AI_GENERATED_TRIPS] {
            for document in self.store.find_by_user(collection, user_id).await? {
                let trip: Trip = bson::from_document(document)
                    .map_err(|err| StoreError::Malformed(err.to_string()))?;
                trips.push(trip);
            }
        }

        trips.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(trips.into_iter().map(TripView::from).collect())
    }
}

fn validate_city(city_name: &str) -> Result<&str, TripError> {
    let city = city_name.trim();
    if city.is_empty() {
        return Err(TripError::Validation("City name is required".to_string()));
    }
    Ok(city)
}

fn trip_document(
    user_id: &str,
    city: &str,
    start_date: TripDate,
    end_date: TripDate,
    itinerary: Itinerary,
    ai_generated: bool,
) -> Result<Document, TripError> {
    let trip = Trip {
        id: None,
        user_id: user_id.to_string(),
        city: city.to_string(),
        start_date: start_date.to_stored(),
        end_date: end_date.to_stored(),
        itinerary,
        created_at: None,
        ai_generated: ai_generated.then_some(true),
    };

    let mut document = bson::to_document(&trip)
        .map_err(|err| TripError::Validation(format!("Trip cannot be stored: {}", err)))?;
    document.insert("created_at", SERVER_TIMESTAMP);
    Ok(document)
}
