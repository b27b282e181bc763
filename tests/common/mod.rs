#![allow(dead_code)]

use actix_web::{web, App, HttpResponse, HttpServer};
use async_trait::async_trait;
use jsonwebtoken::{encode, EncodingKey, Header};
use mongodb::bson::{self, oid::ObjectId, Bson, Document};
use serde_json::json;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use wanderverse_api::config::{ApiKeys, Endpoints};
use wanderverse_api::db::store::{is_server_timestamp, DocumentStore, StoreError};
use wanderverse_api::middleware::auth::Claims;
use wanderverse_api::routes;
use wanderverse_api::state::AppState;

pub const JWT_SECRET: &str = "test_secret";

/// In-process stand-in for MongoDB.
#[derive(Default)]
pub struct MemoryStore {
    pub documents: Mutex<Vec<(String, Document)>>,
    pub fail_writes: bool,
}

impl MemoryStore {
    pub fn in_collection(&self, collection: &str) -> Vec<Document> {
        self.documents
            .lock()
            .unwrap()
            .iter()
            .filter(|(name, _)| name == collection)
            .map(|(_, document)| document.clone())
            .collect()
    }

    pub fn insert(&self, collection: &str, document: Document) {
        self.documents
            .lock()
            .unwrap()
            .push((collection.to_string(), document));
    }
}

fn stamp(value: Bson) -> Bson {
    if is_server_timestamp(&value) {
        Bson::DateTime(bson::DateTime::now())
    } else {
        value
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn add(&self, collection: &str, fields: Document) -> Result<String, StoreError> {
        if self.fail_writes {
            return Err(StoreError::Write("store unavailable".to_string()));
        }

        let id = ObjectId::new();
        let mut document = Document::new();
        document.insert("_id", id);
        for (key, value) in fields {
            document.insert(key, stamp(value));
        }

        self.insert(collection, document);
        Ok(id.to_hex())
    }

    async fn find_by_user(
        &self,
        collection: &str,
        user_id: &str,
    ) -> Result<Vec<Document>, StoreError> {
        let mut found: Vec<Document> = self
            .in_collection(collection)
            .into_iter()
            .filter(|document| document.get_str("user_id").ok() == Some(user_id))
            .collect();
        found.reverse();
        Ok(found)
    }

    async fn get(&self, collection: &str, id: &str) -> Result<Option<Document>, StoreError> {
        Ok(self
            .in_collection(collection)
            .into_iter()
            .find(|document| document.get_str("_id").ok() == Some(id)))
    }

    async fn merge(&self, collection: &str, id: &str, fields: Document) -> Result<(), StoreError> {
        if self.fail_writes {
            return Err(StoreError::Write("store unavailable".to_string()));
        }

        let mut documents = self.documents.lock().unwrap();
        let existing = documents
            .iter_mut()
            .find(|(name, document)| name == collection && document.get_str("_id").ok() == Some(id));
        match existing {
            Some((_, document)) => {
                for (key, value) in fields {
                    document.insert(key, stamp(value));
                }
            }
            None => {
                let mut document = Document::new();
                document.insert("_id", id);
                for (key, value) in fields {
                    document.insert(key, stamp(value));
                }
                documents.push((collection.to_string(), document));
            }
        }
        Ok(())
    }

    async fn recent_by_user(
        &self,
        collection: &str,
        user_id: &str,
        order_by: &str,
        limit: i64,
    ) -> Result<Vec<Document>, StoreError> {
        let mut found: Vec<Document> = self
            .in_collection(collection)
            .into_iter()
            .filter(|document| document.get_str("user_id").ok() == Some(user_id))
            .collect();
        found.sort_by_key(|document| std::cmp::Reverse(document.get_datetime(order_by).ok().copied()));
        found.truncate(limit as usize);
        Ok(found)
    }
}

/// Local stand-in for the GeoDB, Geoapify, Amadeus and Gemini APIs.
///
/// GeoDB knows every city except `Atlantis`. The Geoapify museum category
/// fails, and the Amadeus hotel listing fails after a successful token and
/// city-code lookup.
pub async fn start_upstream() -> url::Url {
    let server = HttpServer::new(|| {
        App::new()
            .route("/v1/geo/cities", web::get().to(geodb_cities))
            .route("/v2/places", web::get().to(geoapify_places))
            .route("/v1/security/oauth2/token", web::post().to(amadeus_token))
            .route("/v1/reference-data/locations", web::get().to(amadeus_locations))
            .route(
                "/v1/reference-data/locations/hotels/by-city",
                web::get().to(|| async { HttpResponse::ServiceUnavailable().finish() }),
            )
            .route(
                "/v1beta/models/gemini-1.5-flash:generateContent",
                web::post().to(gemini_generate),
            )
    })
    .workers(1)
    .disable_signals()
    .bind(("127.0.0.1", 0))
    .unwrap();

    let addr = server.addrs()[0];
    actix_rt::spawn(server.run());
    url::Url::parse(&format!("http://{}/", addr)).unwrap()
}

async fn geodb_cities(query: web::Query<HashMap<String, String>>) -> HttpResponse {
    let data = match query.get("namePrefix").map(String::as_str) {
        Some("Atlantis") | None => json!([]),
        Some(name) => json!([{
            "city": name,
            "countryCode": "FR",
            "latitude": 48.8566,
            "longitude": 2.3522,
            "population": 2138551
        }]),
    };
    HttpResponse::Ok().json(json!({ "data": data }))
}

async fn geoapify_places(query: web::Query<HashMap<String, String>>) -> HttpResponse {
    let category = query.get("categories").cloned().unwrap_or_default();
    if category == "tourism.museum" {
        return HttpResponse::InternalServerError().body("category unavailable");
    }
    HttpResponse::Ok().json(json!({
        "type": "FeatureCollection",
        "features": [
            { "type": "Feature", "properties": { "name": "Eiffel Tower" } },
            { "type": "Feature", "properties": { "name": format!("Best of {}", category) } }
        ]
    }))
}

async fn amadeus_token() -> HttpResponse {
    HttpResponse::Ok().json(json!({ "access_token": "stub-token", "expires_in": 1799 }))
}

async fn amadeus_locations() -> HttpResponse {
    HttpResponse::Ok().json(json!({ "data": [{ "subType": "CITY", "iataCode": "PAR" }] }))
}

async fn gemini_generate() -> HttpResponse {
    HttpResponse::Ok().json(json!({
        "candidates": [{
            "content": {
                "parts": [
                    { "text": "```json\n{\"itinerary\": [{\"day\": 1, \"date\": \"2025-06-01\", " },
                    { "text": "\"activities\": [{\"time\": \"09:00\", \"title\": \"Colosseum\"}]}], \"total_estimated_cost\": \"90 EUR\", \"additional_tips\": [\"Book ahead\"]}\n```" }
                ]
            }
        }]
    }))
}

pub struct TestApp {
    pub store: Arc<MemoryStore>,
    pub state: web::Data<AppState>,
}

impl TestApp {
    pub fn new() -> Self {
        Self::with_store(MemoryStore::default())
    }

    pub fn with_store(store: MemoryStore) -> Self {
        // Nothing listens on the discard port, so upstream calls fail fast.
        let unreachable = url::Url::parse("http://127.0.0.1:9").unwrap();
        Self::build(store, ApiKeys::default(), unreachable)
    }

    /// App whose travel APIs are served by `start_upstream`.
    pub async fn with_upstream() -> Self {
        let base = start_upstream().await;
        let keys = ApiKeys {
            geodb: "geodb-key".to_string(),
            geoapify: "geoapify-key".to_string(),
            amadeus_key: "amadeus-id".to_string(),
            amadeus_secret: "amadeus-secret".to_string(),
            google: "google-key".to_string(),
        };
        Self::build(MemoryStore::default(), keys, base)
    }

    fn build(store: MemoryStore, keys: ApiKeys, base: url::Url) -> Self {
        let store = Arc::new(store);
        let endpoints = Endpoints {
            geodb: base.clone(),
            geoapify: base.clone(),
            amadeus: base.clone(),
            gemini: base,
        };
        let state = AppState::with_endpoints(store.clone(), keys, &endpoints)
            .expect("test clients build");

        Self {
            store,
            state: web::Data::new(state),
        }
    }

    pub fn create_app(
        &self,
    ) -> App<
        impl actix_web::dev::ServiceFactory<
            actix_web::dev::ServiceRequest,
            Config = (),
            Response = actix_web::dev::ServiceResponse,
            Error = actix_web::Error,
            InitError = (),
        >,
    > {
        App::new()
            .app_data(self.state.clone())
            .configure(|cfg| routes::configure(cfg, JWT_SECRET))
    }
}

pub fn get_test_user_id() -> String {
    "test_user_123".to_string()
}

pub fn bearer_token(user_id: &str) -> String {
    let now = chrono::Utc::now().timestamp() as usize;
    let claims = Claims {
        sub: "test@example.com".to_string(),
        exp: now + 3600,
        iat: now,
        user_id: user_id.to_string(),
    };
    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(JWT_SECRET.as_bytes()),
    )
    .unwrap();
    format!("Bearer {}", token)
}
