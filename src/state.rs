use std::sync::Arc;

use crate::config::{ApiKeys, AppConfig, Endpoints};
use crate::db::store::DocumentStore;
use crate::services::gemini_service::GeminiService;
use crate::services::geodb_service::GeoDbService;
use crate::services::hotel_service::HotelService;
use crate::services::places_service::PlacesService;
use crate::services::profile_service::ProfileService;
use crate::services::trip_service::TripService;
use crate::services::ClientError;

/// Services shared by every worker.
pub struct AppState {
    pub store: Arc<dyn DocumentStore>,
    pub trips: TripService,
    pub profiles: ProfileService,
    pub geodb: GeoDbService,
    pub places: PlacesService,
    pub hotels: HotelService,
    pub gemini: GeminiService,
    pub keys: ApiKeys,
}

impl AppState {
    pub fn new(store: Arc<dyn DocumentStore>, config: &AppConfig) -> Result<Self, ClientError> {
        Self::with_endpoints(store, config.keys.clone(), &config.endpoints)
    }

    pub fn with_endpoints(
        store: Arc<dyn DocumentStore>,
        keys: ApiKeys,
        endpoints: &Endpoints,
    ) -> Result<Self, ClientError> {
        Ok(Self {
            trips: TripService::new(store.clone()),
            profiles: ProfileService::new(store.clone()),
            geodb: GeoDbService::new(endpoints.geodb.clone(), keys.geodb.clone())?,
            places: PlacesService::new(endpoints.geoapify.clone(), keys.geoapify.clone())?,
            hotels: HotelService::new(
                endpoints.amadeus.clone(),
                keys.amadeus_key.clone(),
                keys.amadeus_secret.clone(),
            )?,
            gemini: GeminiService::new(endpoints.gemini.clone(), keys.google.clone())?,
            store,
            keys,
        })
    }
}
