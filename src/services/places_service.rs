use serde::Deserialize;
use std::collections::HashSet;
use std::time::Duration;
use url::Url;

use super::ClientError;
use crate::models::place::PointOfInterest;

const SEARCH_RADIUS_METERS: u32 = 10_000;
const PER_CATEGORY_LIMIT: u32 = 20;
const MAX_POIS: usize = 20;

pub const TOURISM_CATEGORIES: [&str; 10] = [
    "tourism.sights",
    "tourism.museum",
    "tourism.attraction",
    "tourism.historic",
    "tourism.art",
    "tourism.park",
    "tourism.viewpoint",
    "tourism.architecture",
    "tourism.monument",
    "tourism.cultural",
];

#[derive(Debug, Deserialize)]
struct PlacesResponse {
    #[serde(default)]
    features: Vec<PointOfInterest>,
}

/// Points of interest around a coordinate, from the Geoapify Places API.
pub struct PlacesService {
    http_client: reqwest::Client,
    base_url: Url,
    api_key: String,
}

impl PlacesService {
    pub fn new(base_url: Url, api_key: String) -> Result<Self, ClientError> {
        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(10))
            .build()?;

        Ok(Self {
            http_client,
            base_url,
            api_key,
        })
    }

    pub async fn find_pois(
        &self,
        lat: f64,
        lon: f64,
        category: &str,
    ) -> Result<Vec<PointOfInterest>, ClientError> {
        let url = self.base_url.join("v2/places")?;
        let filter = format!("circle:{},{},{}", lon, lat, SEARCH_RADIUS_METERS);
        let limit = PER_CATEGORY_LIMIT.to_string();

        let response = self
            .http_client
            .get(url)
            .query(&[
                ("categories", category),
                ("filter", filter.as_str()),
                ("limit", limit.as_str()),
                ("apiKey", self.api_key.as_str()),
            ])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(ClientError::Status {
                service: "Geoapify",
                status: response.status().as_u16(),
                body: response.text().await.unwrap_or_default(),
            });
        }

        let places: PlacesResponse = response.json().await?;
        Ok(places.features)
    }

    /// Up to twenty distinct named attractions across the tourism categories.
    ///
    /// A failing category is logged and skipped.
    pub async fn top_pois(&self, lat: f64, lon: f64) -> Vec<PointOfInterest> {
        let mut pois = Vec::new();
        for category in TOURISM_CATEGORIES {
            match self.find_pois(lat, lon, category).await {
                Ok(found) => pois.extend(found),
                Err(err) => log::warn!("Failed to fetch {} places: {}", category, err),
            }
        }
        unique_named(pois, MAX_POIS)
    }
}

/// Drops unnamed places and repeated names, keeping the first `limit`.
pub fn unique_named(pois: Vec<PointOfInterest>, limit: usize) -> Vec<PointOfInterest> {
    let mut seen = HashSet::new();
    pois.into_iter()
        .filter(|poi| match poi.name() {
            Some(name) => seen.insert(name.to_string()),
            None => false,
        })
        .take(limit)
        .collect()
}
