use actix_web::{web, HttpResponse};
use serde_json::json;

use crate::error::ApiError;
use crate::middleware::auth::Claims;
use crate::models::user::{LoginRequest, ProfileUpdate};
use crate::state::AppState;

/*
    /api/profile (GET)
*/
pub async fn get_profile(
    claims: web::ReqData<Claims>,
    state: web::Data<AppState>,
) -> Result<HttpResponse, ApiError> {
    let profile = state.profiles.profile(&claims.user_id, &claims.sub).await?;
    Ok(HttpResponse::Ok().json(profile))
}

/*
    /api/profile (PUT)
*/
pub async fn update_profile(
    claims: web::ReqData<Claims>,
    state: web::Data<AppState>,
    input: web::Json<ProfileUpdate>,
) -> Result<HttpResponse, ApiError> {
    state
        .profiles
        .update_profile(&claims.user_id, input.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(json!({ "success": true })))
}

/*
    /api/profile/login
*/
pub async fn record_login(
    claims: web::ReqData<Claims>,
    state: web::Data<AppState>,
    input: Option<web::Json<LoginRequest>>,
) -> Result<HttpResponse, ApiError> {
    let login = input.map(web::Json::into_inner).unwrap_or_default();
    state
        .profiles
        .record_login(&claims.user_id, &claims.sub, login)
        .await?;

    let profile = state.profiles.profile(&claims.user_id, &claims.sub).await?;
    Ok(HttpResponse::Ok().json(profile))
}
