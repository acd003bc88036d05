use actix_web::{web, HttpResponse};

use crate::error::ApiError;
use crate::id;
use crate::models::{Product, ProductPatch};
use crate::repository::Repositories;

use super::{found, listed};

pub(super) fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/products", web::get().to(list_products))
        .route("/products", web::post().to(add_product))
        .route("/products/{id}", web::get().to(get_product))
        .route("/products/{id}", web::patch().to(update_product))
        .route("/products/{id}", web::delete().to(delete_product));
}

async fn list_products(repos: web::Data<Repositories>) -> Result<HttpResponse, ApiError> {
    Ok(listed(repos.products.list_all().await?))
}

async fn get_product(
    repos: web::Data<Repositories>,
    product_id: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    let id = id::decode(&product_id)?;
    Ok(found(repos.products.get_by_id(id).await?))
}

async fn add_product(
    repos: web::Data<Repositories>,
    product: web::Json<Product>,
) -> Result<HttpResponse, ApiError> {
    let result = repos.products.insert(&product).await?;
    Ok(HttpResponse::Created().json(result))
}

async fn update_product(
    repos: web::Data<Repositories>,
    product_id: web::Path<String>,
    patch: web::Json<ProductPatch>,
) -> Result<HttpResponse, ApiError> {
    let id = id::decode(&product_id)?;
    let result = repos.products.update_fields(id, patch.into_inner()).await?;
    Ok(HttpResponse::Ok().json(result))
}

async fn delete_product(
    repos: web::Data<Repositories>,
    product_id: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    let id = id::decode(&product_id)?;
    Ok(HttpResponse::Ok().json(repos.products.delete_by_id(id).await?))
}
