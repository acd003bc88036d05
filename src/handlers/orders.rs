use actix_web::{web, HttpResponse};

use crate::error::ApiError;
use crate::id;
use crate::models::{Order, OrderDetails, OrderStatus};
use crate::repository::{FieldEquality, Repositories};

use super::{empty_list, found, listed, EmailQuery};

pub(super) fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/orders", web::post().to(place_order))
        .route("/my-orders", web::get().to(my_orders))
        .route("/all-orders", web::get().to(all_orders))
        .route("/orders/single/{id}", web::get().to(get_order))
        .route("/orders/update/{id}", web::patch().to(update_order_details))
        .route("/orders/{id}", web::patch().to(update_order_status))
        .route("/orders/{id}", web::delete().to(delete_order));
}

async fn place_order(
    repos: web::Data<Repositories>,
    order: web::Json<Order>,
) -> Result<HttpResponse, ApiError> {
    let result = repos.orders.insert(&order).await?;
    Ok(HttpResponse::Created().json(result))
}

async fn my_orders(
    repos: web::Data<Repositories>,
    query: web::Query<EmailQuery>,
) -> Result<HttpResponse, ApiError> {
    let Some(email) = query.email() else {
        return Ok(empty_list());
    };
    let orders = repos
        .orders
        .list_by_filter(FieldEquality::new().field("customerEmail", email))
        .await?;
    Ok(listed(orders))
}

async fn all_orders(repos: web::Data<Repositories>) -> Result<HttpResponse, ApiError> {
    Ok(listed(repos.orders.list_all().await?))
}

async fn get_order(
    repos: web::Data<Repositories>,
    order_id: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    let id = id::decode(&order_id)?;
    Ok(found(repos.orders.get_by_id(id).await?))
}

async fn update_order_status(
    repos: web::Data<Repositories>,
    order_id: web::Path<String>,
    status: web::Json<OrderStatus>,
) -> Result<HttpResponse, ApiError> {
    let id = id::decode(&order_id)?;
    let result = repos.orders.update_fields(id, status.into_inner()).await?;
    Ok(HttpResponse::Ok().json(result))
}

async fn update_order_details(
    repos: web::Data<Repositories>,
    order_id: web::Path<String>,
    details: web::Json<OrderDetails>,
) -> Result<HttpResponse, ApiError> {
    let id = id::decode(&order_id)?;
    let result = repos.orders.update_fields(id, details.into_inner()).await?;
    Ok(HttpResponse::Ok().json(result))
}

async fn delete_order(
    repos: web::Data<Repositories>,
    order_id: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    let id = id::decode(&order_id)?;
    Ok(HttpResponse::Ok().json(repos.orders.delete_by_id(id).await?))
}
