use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct CityInfo {
    pub lat: f64,
    pub lon: f64,
    pub full_name: String,
}

/// A Geoapify place feature, passed through to the client.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PointOfInterest {
    #[serde(default)]
    pub properties: Map<String, Value>,
    #[serde(flatten)]
    pub other: Map<String, Value>,
}

impl PointOfInterest {
    pub fn name(&self) -> Option<&str> {
        self.properties
            .get("name")
            .and_then(Value::as_str)
            .filter(|name| !name.is_empty())
    }
}

/// An Amadeus hotel listing.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Hotel {
    #[serde(rename = "hotelId", default)]
    pub hotel_id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(flatten)]
    pub other: Map<String, Value>,
}

/// Everything shown for a searched city.
#[derive(Debug, Serialize)]
pub struct TripResults {
    pub city_name_searched: String,
    pub city_info: CityInfo,
    pub pois: Vec<PointOfInterest>,
    pub hotels: Vec<Hotel>,
    pub check_in_date: String,
    pub check_out_date: String,
    pub warnings: Vec<String>,
}
