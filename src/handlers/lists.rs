use actix_web::{web, HttpResponse};

use crate::error::ApiError;
use crate::id;
use crate::models::{CompareItem, WishlistItem};
use crate::repository::{FieldEquality, Repositories};

use super::{empty_list, insert_outcome, listed, EmailQuery};

pub(super) fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/wishlist", web::get().to(get_wishlist))
        .route("/wishlist", web::post().to(add_to_wishlist))
        .route("/wishlist/{id}", web::delete().to(remove_from_wishlist))
        .route("/compare", web::get().to(get_compare))
        .route("/compare", web::post().to(add_to_compare))
        .route("/compare/{id}", web::delete().to(remove_from_compare));
}

// Anonymous visitors browse with no email and get an empty list.
async fn get_wishlist(
    repos: web::Data<Repositories>,
    query: web::Query<EmailQuery>,
) -> Result<HttpResponse, ApiError> {
    let Some(email) = query.email() else {
        return Ok(empty_list());
    };
    let items = repos
        .wishlist
        .list_by_filter(FieldEquality::new().field("userEmail", email))
        .await?;
    Ok(listed(items))
}

async fn add_to_wishlist(
    repos: web::Data<Repositories>,
    item: web::Json<WishlistItem>,
) -> Result<HttpResponse, ApiError> {
    Ok(insert_outcome(repos.wishlist.insert_if_absent(&item).await?))
}

async fn remove_from_wishlist(
    repos: web::Data<Repositories>,
    item_id: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    let id = id::decode(&item_id)?;
    Ok(HttpResponse::Ok().json(repos.wishlist.delete_by_id(id).await?))
}

async fn get_compare(
    repos: web::Data<Repositories>,
    query: web::Query<EmailQuery>,
) -> Result<HttpResponse, ApiError> {
    let Some(email) = query.email() else {
        return Ok(empty_list());
    };
    let items = repos
        .compare
        .list_by_filter(FieldEquality::new().field("userEmail", email))
        .await?;
    Ok(listed(items))
}

async fn add_to_compare(
    repos: web::Data<Repositories>,
    item: web::Json<CompareItem>,
) -> Result<HttpResponse, ApiError> {
    Ok(insert_outcome(repos.compare.insert_if_absent(&item).await?))
}

async fn remove_from_compare(
    repos: web::Data<Repositories>,
    item_id: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    let id = id::decode(&item_id)?;
    Ok(HttpResponse::Ok().json(repos.compare.delete_by_id(id).await?))
}
