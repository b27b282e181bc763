use serde::Deserialize;
use serde_json::Value;
use std::time::Duration;
use url::Url;

use super::ClientError;
use crate::models::place::Hotel;

pub const DEFAULT_RADIUS_KM: u32 = 20;

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
}

#[derive(Debug, Deserialize)]
struct LocationsResponse {
    #[serde(default)]
    data: Vec<Location>,
}

#[derive(Debug, Deserialize)]
struct Location {
    #[serde(rename = "iataCode")]
    iata_code: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct HotelsResponse {
    #[serde(default)]
    pub data: Vec<Hotel>,
    #[serde(default)]
    pub meta: Option<Value>,
}

/// Hotel listings from the Amadeus self-service APIs.
pub struct HotelService {
    http_client: reqwest::Client,
    base_url: Url,
    client_id: String,
    client_secret: String,
}

impl HotelService {
    pub fn new(base_url: Url, client_id: String, client_secret: String) -> Result<Self, ClientError> {
        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(15))
            .build()?;

        Ok(Self {
            http_client,
            base_url,
            client_id,
            client_secret,
        })
    }

    /// Client-credentials access token.
    pub async fn access_token(&self) -> Result<String, ClientError> {
        if self.client_id.is_empty() || self.client_secret.is_empty() {
            return Err(ClientError::MissingKey("Amadeus"));
        }

        let url = self.base_url.join("v1/security/oauth2/token")?;
        let response = self
            .http_client
            .post(url)
            .form(&[
                ("grant_type", "client_credentials"),
                ("client_id", self.client_id.as_str()),
                ("client_secret", self.client_secret.as_str()),
            ])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(ClientError::Status {
                service: "Amadeus",
                status: response.status().as_u16(),
                body: response.text().await.unwrap_or_default(),
            });
        }

        let token: TokenResponse = response.json().await?;
        Ok(token.access_token)
    }

    /// IATA code of the first city matching `city_name`.
    pub async fn city_code(&self, city_name: &str, token: &str) -> Result<Option<String>, ClientError> {
        let url = self.base_url.join("v1/reference-data/locations")?;
        let response = self
            .http_client
            .get(url)
            .bearer_auth(token)
            .query(&[("keyword", city_name), ("subType", "CITY")])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(ClientError::Status {
                service: "Amadeus",
                status: response.status().as_u16(),
                body: response.text().await.unwrap_or_default(),
            });
        }

        let locations: LocationsResponse = response.json().await?;
        log::debug!("Amadeus returned {} locations for {}", locations.data.len(), city_name);
        Ok(first_city_code(locations))
    }

    pub async fn hotels_in_city(
        &self,
        city_code: &str,
        token: &str,
        radius_km: u32,
    ) -> Result<HotelsResponse, ClientError> {
        let url = self
            .base_url
            .join("v1/reference-data/locations/hotels/by-city")?;
        let radius = radius_km.to_string();

        log::info!("Fetching hotels for city code '{}' within {}km", city_code, radius_km);
        let response = self
            .http_client
            .get(url)
            .bearer_auth(token)
            .query(&[
                ("cityCode", city_code),
                ("radius", radius.as_str()),
                ("radiusUnit", "KM"),
            ])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(ClientError::Status {
                service: "Amadeus",
                status: response.status().as_u16(),
                body: response.text().await.unwrap_or_default(),
            });
        }

        Ok(response.json().await?)
    }

    /// Hotels for a city name, degrading to an empty list.
    ///
    /// Each step that fails adds a user-facing warning instead of an error.
    pub async fn hotels_for(&self, city_name: &str, warnings: &mut Vec<String>) -> Vec<Hotel> {
        let token = match self.access_token().await {
            Ok(token) => token,
            Err(err) => {
                log::warn!("Amadeus authentication failed: {}", err);
                warnings.push(
                    "Failed to authenticate for hotel search. Hotel list may be unavailable."
                        .to_string(),
                );
                return Vec::new();
            }
        };

        let city_code = match self.city_code(city_name, &token).await {
            Ok(Some(code)) => code,
            Ok(None) => {
                warnings.push(format!(
                    "Could not find IATA code for '{}'. Hotel list may be unavailable.",
                    city_name
                ));
                return Vec::new();
            }
            Err(err) => {
                log::warn!("Amadeus city lookup failed for {}: {}", city_name, err);
                warnings.push(format!(
                    "Could not find IATA code for '{}'. Hotel list may be unavailable.",
                    city_name
                ));
                return Vec::new();
            }
        };

        match self.hotels_in_city(&city_code, &token, DEFAULT_RADIUS_KM).await {
            Ok(response) if !response.data.is_empty() => {
                log::info!("Found {} hotels for {}", response.data.len(), city_name);
                response.data
            }
            Ok(_) => {
                warnings.push(format!("No hotels found for '{}'.", city_name));
                Vec::new()
            }
            Err(err) => {
                log::warn!("Amadeus hotel search failed for {}: {}", city_code, err);
                warnings.push(format!("No hotels found for '{}'.", city_name));
                Vec::new()
            }
        }
    }
}

fn first_city_code(response: LocationsResponse) -> Option<String> {
    response
        .data
        .into_iter()
        .next()
        .and_then(|location| location.iata_code)
}
