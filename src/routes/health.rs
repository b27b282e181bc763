use actix_web::{web, HttpResponse, Responder};
use serde::Serialize;
use std::collections::BTreeMap;
use std::env;

use crate::state::AppState;

#[derive(Serialize)]
struct HealthStatus {
    status: String,
    services: BTreeMap<String, ServiceStatus>,
    environment: String,
    version: String,
}

#[derive(Serialize, Clone)]
struct ServiceStatus {
    status: String,
    details: Option<String>,
}

impl ServiceStatus {
    fn ok(details: &str) -> Self {
        Self {
            status: "ok".to_string(),
            details: Some(details.to_string()),
        }
    }

    fn error(details: String) -> Self {
        Self {
            status: "error".to_string(),
            details: Some(details),
        }
    }
}

/*
    /health
*/
pub async fn health_check(state: web::Data<AppState>) -> impl Responder {
    let mut health = HealthStatus {
        status: "ok".to_string(),
        services: BTreeMap::new(),
        environment: env::var("RUST_ENV").unwrap_or("development".to_string()),
        version: env!("CARGO_PKG_VERSION").to_string(),
    };

    let store = match state.store.ping().await {
        Ok(()) => ServiceStatus::ok("Connected successfully"),
        Err(err) => ServiceStatus::error(format!("Connection failed: {}", err)),
    };
    health.services.insert("store".to_string(), store);

    let keys = &state.keys;
    for (name, configured) in [
        ("geodb", !keys.geodb.is_empty()),
        ("geoapify", !keys.geoapify.is_empty()),
        ("amadeus", !keys.amadeus_key.is_empty() && !keys.amadeus_secret.is_empty()),
        ("gemini", !keys.google.is_empty()),
    ] {
        let status = if configured {
            ServiceStatus::ok("API key configured")
        } else {
            ServiceStatus::error("API key not configured".to_string())
        };
        health.services.insert(name.to_string(), status);
    }

    if health.services.values().any(|service| service.status != "ok") {
        health.status = "degraded".to_string();
    }

    HttpResponse::Ok().json(health)
}
