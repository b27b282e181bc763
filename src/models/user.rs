use chrono::{DateTime, Utc};
use mongodb::bson::{self, Bson, Document};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Number of entries shown in a profile's activity feed.
pub const RECENT_ACTIVITY_LIMIT: i64 = 5;

fn enabled() -> bool {
    true
}

/// A `users` document keyed by user id. Missing fields take profile defaults.
#[derive(Debug, Clone, Deserialize)]
pub struct UserRecord {
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub photo_url: Option<String>,
    #[serde(default)]
    pub bio: Option<String>,
    #[serde(default)]
    pub created_at: Option<bson::DateTime>,
    #[serde(default)]
    pub last_login: Option<bson::DateTime>,
    #[serde(default)]
    pub is_premium: bool,
    #[serde(default)]
    pub trips_planned: i64,
    #[serde(default)]
    pub destinations_visited: i64,
    #[serde(default)]
    pub reviews_count: i64,
    #[serde(default = "enabled")]
    pub email_notifications: bool,
    #[serde(default)]
    pub dark_mode: bool,
}

/// Profile page data returned to the owner.
#[derive(Debug, Clone, Serialize)]
pub struct Profile {
    pub uid: String,
    pub email: String,
    pub display_name: String,
    pub photo_url: String,
    pub bio: String,
    pub created_at: DateTime<Utc>,
    pub last_login: Option<DateTime<Utc>>,
    pub is_premium: bool,
    pub trips_planned: i64,
    pub destinations_visited: i64,
    pub reviews_count: i64,
    pub email_notifications: bool,
    pub dark_mode: bool,
    pub recent_activities: Vec<Value>,
}

impl Profile {
    /// `email` stands in when the record has none.
    pub fn from_record(
        uid: &str,
        email: &str,
        record: UserRecord,
        recent_activities: Vec<Value>,
    ) -> Self {
        Self {
            uid: uid.to_string(),
            email: record.email.unwrap_or_else(|| email.to_string()),
            display_name: record.display_name.unwrap_or_default(),
            photo_url: record.photo_url.unwrap_or_default(),
            bio: record.bio.unwrap_or_default(),
            created_at: record
                .created_at
                .map(|at| at.to_chrono())
                .unwrap_or_else(Utc::now),
            last_login: record.last_login.map(|at| at.to_chrono()),
            is_premium: record.is_premium,
            trips_planned: record.trips_planned,
            destinations_visited: record.destinations_visited,
            reviews_count: record.reviews_count,
            email_notifications: record.email_notifications,
            dark_mode: record.dark_mode,
            recent_activities,
        }
    }
}

/// Activity feed entry as JSON, without store bookkeeping fields.
pub fn activity_json(mut document: Document) -> Value {
    document.remove("_id");
    document.remove("user_id");
    Bson::Document(document).into_relaxed_extjson()
}

#[derive(Debug, Default, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub photo_url: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ProfileUpdate {
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub bio: Option<String>,
}
