use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Activities per day, keyed by the day's date string.
pub type Itinerary = BTreeMap<String, Vec<Activity>>;

/// Display time given to activities that arrive without one.
pub const DEFAULT_TIME: &str = "00:00";

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Activity {
    /// Wall-clock time as entered, either `14:30` or `2:30 PM`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time: Option<String>,
    /// Title, location, cost and whatever else the client sent.
    #[serde(flatten)]
    pub details: Map<String, Value>,
}

impl Activity {
    pub fn display_time(&self) -> &str {
        self.time.as_deref().unwrap_or(DEFAULT_TIME)
    }
}
