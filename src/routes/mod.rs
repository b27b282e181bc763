pub mod health;
pub mod profile;
pub mod trip;

use actix_web::web;

use crate::error::ApiError;
use crate::middleware::auth::AuthMiddleware;

/// Registers every route. Trip and profile routes sit behind `AuthMiddleware`.
pub fn configure(cfg: &mut web::ServiceConfig, jwt_secret: &str) {
    cfg.app_data(
        web::JsonConfig::default()
            .error_handler(|err, _| ApiError::BadRequest(err.to_string()).into()),
    )
    .route("/health", web::get().to(health::health_check))
    .service(
        web::scope("/api/trips")
            .wrap(AuthMiddleware::new(jwt_secret))
            .route("", web::get().to(trip::list))
            .route("", web::post().to(trip::save))
            .route("/search", web::post().to(trip::search))
            .route("/ai/generate", web::post().to(trip::generate_ai))
            .route("/ai", web::post().to(trip::save_ai)),
    )
    .service(
        web::scope("/api/profile")
            .wrap(AuthMiddleware::new(jwt_secret))
            .route("", web::get().to(profile::get_profile))
            .route("", web::put().to(profile::update_profile))
            .route("/login", web::post().to(profile::record_login)),
    );
}
