use std::env;

use thiserror::Error;
use url::Url;

const HOST: &str = "0.0.0.0";
const PORT: u16 = 8080;
const DATABASE: &str = "WanderVerse";

pub const GEODB_BASE_URL: &str = "https://wft-geo-db.p.rapidapi.com";
pub const GEOAPIFY_BASE_URL: &str = "https://api.geoapify.com";
pub const AMADEUS_BASE_URL: &str = "https://test.api.amadeus.com";
pub const GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),
    #[error("invalid {name}: {reason}")]
    Invalid { name: &'static str, reason: String },
}

/// Keys and endpoints of the third-party travel APIs.
#[derive(Debug, Clone, Default)]
pub struct ApiKeys {
    pub geodb: String,
    pub geoapify: String,
    pub amadeus_key: String,
    pub amadeus_secret: String,
    pub google: String,
}

#[derive(Debug, Clone)]
pub struct Endpoints {
    pub geodb: Url,
    pub geoapify: Url,
    pub amadeus: Url,
    pub gemini: Url,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub mongo_uri: String,
    pub database: String,
    pub jwt_secret: String,
    pub keys: ApiKeys,
    pub endpoints: Endpoints,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        let host = env::var("HOST").unwrap_or_else(|_| HOST.to_string());
        let port = match env::var("PORT") {
            Ok(raw) => raw.parse().map_err(|err| ConfigError::Invalid {
                name: "PORT",
                reason: format!("{}", err),
            })?,
            Err(_) => PORT,
        };

        let mongo_uri = env::var("MONGODB_URI").map_err(|_| ConfigError::Missing("MONGODB_URI"))?;
        let database = env::var("MONGODB_DATABASE").unwrap_or_else(|_| DATABASE.to_string());
        let jwt_secret =
            env::var("JWT_SECRET").unwrap_or_else(|_| "default_secret".to_string());

        if jwt_secret == "default_secret" {
            log::warn!("JWT_SECRET not set, falling back to the development secret");
        }

        let keys = ApiKeys {
            geodb: optional_key("GEODB_API"),
            geoapify: optional_key("GEOAPIFY_API"),
            amadeus_key: optional_key("AMADEUS_API_KEY"),
            amadeus_secret: optional_key("AMADEUS_SECRET"),
            google: optional_key("GOOGLE_API_KEY"),
        };

        let endpoints = Endpoints {
            geodb: endpoint("GEODB_BASE_URL", GEODB_BASE_URL)?,
            geoapify: endpoint("GEOAPIFY_BASE_URL", GEOAPIFY_BASE_URL)?,
            amadeus: endpoint("AMADEUS_BASE_URL", AMADEUS_BASE_URL)?,
            gemini: endpoint("GEMINI_BASE_URL", GEMINI_BASE_URL)?,
        };

        Ok(Self {
            host,
            port,
            mongo_uri,
            database,
            jwt_secret,
            keys,
            endpoints,
        })
    }
}

fn optional_key(name: &'static str) -> String {
    env::var(name).unwrap_or_else(|_| {
        log::warn!("{} not set, the matching API calls will fail", name);
        String::new()
    })
}

fn endpoint(name: &'static str, default: &str) -> Result<Url, ConfigError> {
    let raw = env::var(name).unwrap_or_else(|_| default.to_string());
    Url::parse(&raw).map_err(|err| ConfigError::Invalid {
        name,
        reason: err.to_string(),
    })
}
