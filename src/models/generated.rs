use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::itinerary::{Activity, Itinerary};

/// Itinerary in the shape the generation model is asked to answer with.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct GeneratedItinerary {
    pub itinerary: Vec<GeneratedDay>,
    #[serde(default)]
    pub total_estimated_cost: Option<Value>,
    #[serde(default)]
    pub additional_tips: Vec<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct GeneratedDay {
    #[serde(default)]
    pub day: Option<u32>,
    pub date: String,
    #[serde(default)]
    pub activities: Vec<Activity>,
}

impl GeneratedItinerary {
    /// Re-keys the generated days by date, keeping each day's activity order.
    pub fn into_itinerary(self) -> Itinerary {
        let mut itinerary = Itinerary::new();
        for day in self.itinerary {
            itinerary
                .entry(day.date)
                .or_default()
                .extend(day.activities);
        }
        itinerary
    }
}
