use serde::Deserialize;
use std::time::Duration;
use url::Url;

use super::ClientError;
use crate::models::place::CityInfo;

const RAPIDAPI_HOST: &str = "wft-geo-db.p.rapidapi.com";

#[derive(Debug, Deserialize)]
struct CitiesResponse {
    #[serde(default)]
    data: Vec<GeoDbCity>,
}

#[derive(Debug, Deserialize)]
struct GeoDbCity {
    city: String,
    #[serde(rename = "countryCode")]
    country_code: String,
    latitude: f64,
    longitude: f64,
}

impl From<GeoDbCity> for CityInfo {
    fn from(city: GeoDbCity) -> Self {
        CityInfo {
            lat: city.latitude,
            lon: city.longitude,
            full_name: format!("{}, {}", city.city, city.country_code),
        }
    }
}

/// City geocoding over the GeoDB Cities API.
pub struct GeoDbService {
    http_client: reqwest::Client,
    base_url: Url,
    api_key: String,
}

impl GeoDbService {
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

    /// Most populous city whose name starts with `name`.
    pub async fn find_city(&self, name: &str) -> Result<Option<CityInfo>, ClientError> {
        let url = self.base_url.join("v1/geo/cities")?;

        let response = self
            .http_client
            .get(url)
            .header("X-RapidAPI-Key", &self.api_key)
            .header("X-RapidAPI-Host", RAPIDAPI_HOST)
            .query(&[("namePrefix", name), ("limit", "1"), ("sort", "-population")])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(ClientError::Status {
                service: "GeoDB",
                status: response.status().as_u16(),
                body: response.text().await.unwrap_or_default(),
            });
        }

        let cities: CitiesResponse = response.json().await?;
        Ok(first_city(cities))
    }
}

fn first_city(response: CitiesResponse) -> Option<CityInfo> {
    response.data.into_iter().next().map(CityInfo::from)
}
