use actix_web::{web, HttpResponse};

use crate::error::ApiError;
use crate::id;
use crate::models::{Review, ReviewEdit};
use crate::repository::{FieldEquality, Repositories};

use super::listed;

pub(super) fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/reviews", web::post().to(post_review))
        .route("/reviews/{product_id}", web::get().to(product_reviews))
        .route("/reviews/{id}", web::patch().to(edit_review))
        .route("/reviews/{id}", web::delete().to(delete_review));
}

async fn post_review(
    repos: web::Data<Repositories>,
    review: web::Json<Review>,
) -> Result<HttpResponse, ApiError> {
    let result = repos.reviews.insert(&review).await?;
    Ok(HttpResponse::Created().json(result))
}

/// Newest first.
async fn product_reviews(
    repos: web::Data<Repositories>,
    product_id: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    let filter = FieldEquality::new().field("productId", product_id.into_inner());
    Ok(listed(repos.reviews.list_by_filter(filter).await?))
}

async fn edit_review(
    repos: web::Data<Repositories>,
    review_id: web::Path<String>,
    edit: web::Json<ReviewEdit>,
) -> Result<HttpResponse, ApiError> {
    let id = id::decode(&review_id)?;
    let result = repos.reviews.update_fields(id, edit.into_inner()).await?;
    Ok(HttpResponse::Ok().json(result))
}

async fn delete_review(
    repos: web::Data<Repositories>,
    review_id: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    let id = id::decode(&review_id)?;
    Ok(HttpResponse::Ok().json(repos.reviews.delete_by_id(id).await?))
}
