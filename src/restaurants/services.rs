use sqlx::PgPool;

use crate::catalog;
use crate::catalog::repo_types::Allergen;
use crate::error::AppError;
use crate::repo;
use crate::restaurants::dto::{MenuCategory, RestaurantMenuResponse};
use crate::restaurants::repo::{self as restaurant_repo, NewRestaurant, RestaurantPatch};
use crate::restaurants::repo_types::Restaurant;

pub async fn list_restaurants(db: &PgPool) -> Result<Vec<Restaurant>, AppError> {
    repo::list_active::<Restaurant>(db).await
}

pub async fn get_restaurant(db: &PgPool, id: i32) -> Result<Option<Restaurant>, AppError> {
    repo::get_by_id::<Restaurant>(db, id).await
}

pub async fn create_restaurant(db: &PgPool, new: NewRestaurant) -> Result<Restaurant, AppError> {
    restaurant_repo::create(db, new).await
}

pub async fn update_restaurant(
    db: &PgPool,
    id: i32,
    patch: RestaurantPatch,
) -> Result<Option<Restaurant>, AppError> {
    restaurant_repo::update(db, id, patch).await
}

pub async fn delete_restaurant(db: &PgPool, id: i32) -> Result<bool, AppError> {
    repo::soft_delete::<Restaurant>(db, id).await
}

/// Menu grouped by category: active categories in display order, each with
/// its available items. One item query per category; fine for the tens of
/// categories a single restaurant carries.
pub async fn get_restaurant_menu(
    db: &PgPool,
    restaurant_id: i32,
) -> Result<RestaurantMenuResponse, AppError> {
    let Some(restaurant) = repo::get_by_id::<Restaurant>(db, restaurant_id).await? else {
        return Err(AppError::NotFound("Restaurant"));
    };

    let categories = catalog::repo::categories_for_restaurant(db, restaurant_id).await?;
    let mut groups = Vec::with_capacity(categories.len());
    for category in categories {
        let items = catalog::repo::items_for_category(db, category.id).await?;
        groups.push(MenuCategory::from_rows(category, items));
    }

    Ok(RestaurantMenuResponse {
        restaurant_id: restaurant.id,
        restaurant_name: restaurant.name,
        categories: groups,
    })
}

/// Distinct allergens across the restaurant's menu, alphabetical. Whether
/// the restaurant exists is the caller's concern; an unknown id simply
/// yields an empty list here.
pub async fn get_restaurant_allergens(
    db: &PgPool,
    restaurant_id: i32,
) -> Result<Vec<Allergen>, AppError> {
    catalog::repo::allergens_for_restaurant(db, restaurant_id).await
}
