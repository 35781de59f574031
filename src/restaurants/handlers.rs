use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use tracing::{info, instrument, warn};

use crate::error::AppError;
use crate::extract::AppJson;
use crate::restaurants::dto::{AllergenResponse, RestaurantMenuResponse, RestaurantResponse};
use crate::restaurants::repo::{NewRestaurant, RestaurantPatch};
use crate::restaurants::services;
use crate::state::AppState;

pub fn restaurant_routes() -> Router<AppState> {
    Router::new()
        .route("/restaurants", get(list_restaurants).post(create_restaurant))
        .route(
            "/restaurants/:id",
            get(get_restaurant)
                .put(update_restaurant)
                .delete(delete_restaurant),
        )
        .route("/restaurants/:id/allergens", get(get_restaurant_allergens))
        .route("/restaurants/:id/menu", get(get_restaurant_menu))
}

#[instrument(skip(state))]
pub async fn list_restaurants(
    State(state): State<AppState>,
) -> Result<Json<Vec<RestaurantResponse>>, AppError> {
    let restaurants = services::list_restaurants(&state.db).await?;
    Ok(Json(
        restaurants.into_iter().map(RestaurantResponse::from).collect(),
    ))
}

#[instrument(skip(state))]
pub async fn get_restaurant(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<RestaurantResponse>, AppError> {
    let restaurant = services::get_restaurant(&state.db, id)
        .await?
        .ok_or(AppError::NotFound("Restaurant"))?;
    Ok(Json(restaurant.into()))
}

#[instrument(skip(state, payload))]
pub async fn create_restaurant(
    State(state): State<AppState>,
    AppJson(payload): AppJson<NewRestaurant>,
) -> Result<(StatusCode, Json<RestaurantResponse>), AppError> {
    payload.validate()?;
    let restaurant = services::create_restaurant(&state.db, payload).await?;
    info!(restaurant_id = restaurant.id, name = %restaurant.name, "restaurant created");
    Ok((StatusCode::CREATED, Json(restaurant.into())))
}

#[instrument(skip(state, payload))]
pub async fn update_restaurant(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    AppJson(payload): AppJson<RestaurantPatch>,
) -> Result<Json<RestaurantResponse>, AppError> {
    payload.validate()?;
    let restaurant = services::update_restaurant(&state.db, id, payload)
        .await?
        .ok_or(AppError::NotFound("Restaurant"))?;
    Ok(Json(restaurant.into()))
}

#[instrument(skip(state))]
pub async fn delete_restaurant(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<StatusCode, AppError> {
    if !services::delete_restaurant(&state.db, id).await? {
        warn!(restaurant_id = id, "delete for unknown or inactive restaurant");
        return Err(AppError::NotFound("Restaurant"));
    }
    info!(restaurant_id = id, "restaurant deactivated");
    Ok(StatusCode::NO_CONTENT)
}

#[instrument(skip(state))]
pub async fn get_restaurant_allergens(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<Vec<AllergenResponse>>, AppError> {
    // The rollup itself tolerates unknown restaurants; the 404 lives here.
    services::get_restaurant(&state.db, id)
        .await?
        .ok_or(AppError::NotFound("Restaurant"))?;
    let allergens = services::get_restaurant_allergens(&state.db, id).await?;
    Ok(Json(
        allergens.into_iter().map(AllergenResponse::from).collect(),
    ))
}

#[instrument(skip(state))]
pub async fn get_restaurant_menu(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<RestaurantMenuResponse>, AppError> {
    let menu = services::get_restaurant_menu(&state.db, id).await?;
    Ok(Json(menu))
}
