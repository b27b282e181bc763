use actix_web::{web, HttpResponse};
use chrono::NaiveDate;
use serde::Deserialize;

use crate::error::ApiError;
use crate::middleware::auth::Claims;
use crate::models::place::TripResults;
use crate::models::trip::{SaveAiTripRequest, SaveTripRequest, SavedTrip, TripSearch, DATE_FORMAT};
use crate::services::gemini_service::{BudgetLevel, Preferences, TravelStyle};
use crate::state::AppState;

const MAX_CITY_LENGTH: usize = 100;

#[derive(Debug, Deserialize)]
pub struct GenerateRequest {
    pub city_name: String,
    pub start_date: String,
    pub end_date: String,
    #[serde(default)]
    pub prompt: String,
    #[serde(default)]
    pub travel_style: TravelStyle,
    #[serde(default)]
    pub budget: BudgetLevel,
}

fn parse_date(field: &str, raw: &str) -> Result<NaiveDate, ApiError> {
    NaiveDate::parse_from_str(raw.trim(), DATE_FORMAT)
        .map_err(|_| ApiError::BadRequest(format!("{} must be a YYYY-MM-DD date", field)))
}

/*
    /api/trips/search
*/
pub async fn search(
    state: web::Data<AppState>,
    input: web::Json<TripSearch>,
) -> Result<HttpResponse, ApiError> {
    let search = input.into_inner();
    let city = search.city.trim();
    if city.is_empty() {
        return Err(ApiError::BadRequest("City is required".to_string()));
    }
    if city.chars().count() > MAX_CITY_LENGTH {
        return Err(ApiError::BadRequest(format!(
            "City must be at most {} characters",
            MAX_CITY_LENGTH
        )));
    }
    let start_date = parse_date("start_date", &search.start_date)?;
    let end_date = parse_date("end_date", &search.end_date)?;

    let city_info = state.geodb.find_city(city).await?.ok_or_else(|| {
        ApiError::NotFound(format!("Sorry, city '{}' could not be found.", city))
    })?;

    let pois = state.places.top_pois(city_info.lat, city_info.lon).await;
    let mut warnings = Vec::new();
    let hotels = state.hotels.hotels_for(city, &mut warnings).await;

    Ok(HttpResponse::Ok().json(TripResults {
        city_name_searched: city.to_string(),
        city_info,
        pois,
        hotels,
        check_in_date: start_date.format(DATE_FORMAT).to_string(),
        check_out_date: end_date.format(DATE_FORMAT).to_string(),
        warnings,
    }))
}

/*
    /api/trips (POST)
*/
pub async fn save(
    claims: web::ReqData<Claims>,
    state: web::Data<AppState>,
    input: web::Json<SaveTripRequest>,
) -> Result<HttpResponse, ApiError> {
    let request = input.into_inner();
    let id = state
        .trips
        .save_trip(
            &claims.user_id,
            &request.city_name,
            request.start_date,
            request.end_date,
            request.itinerary,
        )
        .await?;

    Ok(HttpResponse::Created().json(SavedTrip { id }))
}

/*
    /api/trips (GET)
*/
pub async fn list(
    claims: web::ReqData<Claims>,
    state: web::Data<AppState>,
) -> Result<HttpResponse, ApiError> {
    let trips = state.trips.trips_for_user(&claims.user_id).await?;
    Ok(HttpResponse::Ok().json(trips))
}

/*
    /api/trips/ai/generate
*/
pub async fn generate_ai(
    state: web::Data<AppState>,
    input: web::Json<GenerateRequest>,
) -> Result<HttpResponse, ApiError> {
    let request = input.into_inner();
    if request.prompt.trim().is_empty() {
        return Err(ApiError::BadRequest(
            "Please provide a prompt for the itinerary generation.".to_string(),
        ));
    }
    let city = request.city_name.trim();
    if city.is_empty() {
        return Err(ApiError::BadRequest("City is required".to_string()));
    }
    let start_date = parse_date("start_date", &request.start_date)?;
    let end_date = parse_date("end_date", &request.end_date)?;

    let preferences = Preferences {
        prompt: request.prompt.trim().to_string(),
        travel_style: request.travel_style,
        budget: request.budget,
    };
    let itinerary = state
        .gemini
        .generate_itinerary(city, start_date, end_date, Some(&preferences))
        .await?;

    Ok(HttpResponse::Ok().json(itinerary))
}

/*
    /api/trips/ai (POST)
*/
pub async fn save_ai(
    claims: web::ReqData<Claims>,
    state: web::Data<AppState>,
    input: web::Json<SaveAiTripRequest>,
) -> Result<HttpResponse, ApiError> {
    let request = input.into_inner();
    let id = state
        .trips
        .save_ai_trip(
            &claims.user_id,
            &request.city_name,
            request.start_date,
            request.end_date,
            request.itinerary.into_itinerary(),
        )
        .await?;

    Ok(HttpResponse::Created().json(SavedTrip { id }))
}
