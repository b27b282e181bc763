use chrono::{DateTime, NaiveDate, Utc};
use mongodb::bson::{self, oid::ObjectId};
use serde::{Deserialize, Serialize};
use serde_with::skip_serializing_none;

use super::generated::GeneratedItinerary;
use super::itinerary::Itinerary;

pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// A trip boundary as handed to the persister.
#[derive(Debug, Clone, PartialEq)]
pub enum TripDate {
    Date(NaiveDate),
    Text(String),
}

impl TripDate {
    /// Dates are rendered as `YYYY-MM-DD`, strings are kept verbatim.
    pub fn to_stored(&self) -> String {
        match self {
            TripDate::Date(date) => date.format(DATE_FORMAT).to_string(),
            TripDate::Text(text) => text.clone(),
        }
    }
}

impl From<NaiveDate> for TripDate {
    fn from(date: NaiveDate) -> Self {
        TripDate::Date(date)
    }
}

impl From<String> for TripDate {
    fn from(text: String) -> Self {
        TripDate::Text(text)
    }
}

impl From<&str> for TripDate {
    fn from(text: &str) -> Self {
        TripDate::Text(text.to_string())
    }
}

/// Trip document as stored in the `trips` and `ai_generated_trips` collections.
#[skip_serializing_none]
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Trip {
    #[serde(rename = "_id")]
    pub id: Option<ObjectId>,
    pub user_id: String,
    pub city: String,
    pub start_date: String,
    pub end_date: String,
    pub itinerary: Itinerary,
    pub created_at: Option<bson::DateTime>,
    pub ai_generated: Option<bool>,
}

/// Trip as returned to API clients.
#[skip_serializing_none]
#[derive(Debug, Clone, Serialize)]
pub struct TripView {
    pub id: Option<String>,
    pub city: String,
    pub start_date: String,
    pub end_date: String,
    pub itinerary: Itinerary,
    pub created_at: Option<DateTime<Utc>>,
    pub ai_generated: bool,
}

impl From<Trip> for TripView {
    fn from(trip: Trip) -> Self {
        Self {
            id: trip.id.map(|id| id.to_hex()),
            city: trip.city,
            start_date: trip.start_date,
            end_date: trip.end_date,
            itinerary: trip.itinerary,
            created_at: trip.created_at.map(|at| at.to_chrono()),
            ai_generated: trip.ai_generated.unwrap_or(false),
        }
    }
}

/// City and dates picked on the trip search form.
#[derive(Debug, Deserialize)]
pub struct TripSearch {
    pub city: String,
    pub start_date: String,
    pub end_date: String,
}

#[derive(Debug, Deserialize)]
pub struct SaveTripRequest {
    pub city_name: String,
    pub start_date: String,
    pub end_date: String,
    #[serde(default)]
    pub itinerary: Itinerary,
}

#[derive(Debug, Deserialize)]
pub struct SaveAiTripRequest {
    pub city_name: String,
    pub start_date: String,
    pub end_date: String,
    pub itinerary: GeneratedItinerary,
}

#[derive(Debug, Serialize)]
pub struct SavedTrip {
    pub id: String,
}
