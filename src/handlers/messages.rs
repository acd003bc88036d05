use actix_web::{web, HttpResponse};

use crate::error::ApiError;
use crate::id;
use crate::models::Message;
use crate::repository::Repositories;

use super::listed;

pub(super) fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/messages", web::post().to(send_message))
        .route("/messages", web::get().to(list_messages))
        .route("/messages/{id}", web::delete().to(delete_message));
}

async fn send_message(
    repos: web::Data<Repositories>,
    message: web::Json<Message>,
) -> Result<HttpResponse, ApiError> {
    let result = repos
        .messages
        .insert(&message)
        .await
        .map_err(ApiError::MessageNotSaved)?;
    Ok(HttpResponse::Created().json(result))
}

async fn list_messages(repos: web::Data<Repositories>) -> Result<HttpResponse, ApiError> {
    Ok(listed(repos.messages.list_all().await?))
}

async fn delete_message(
    repos: web::Data<Repositories>,
    message_id: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    let id = id::decode(&message_id)?;
    Ok(HttpResponse::Ok().json(repos.messages.delete_by_id(id).await?))
}
