use actix_web::{web, HttpResponse};

use crate::error::ApiError;
use crate::id;
use crate::models::{RoleChange, User};
use crate::repository::{FieldEquality, Repositories};

use super::{found, insert_outcome, listed};

pub(super) fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/users", web::get().to(list_users))
        .route("/users", web::post().to(register_user))
        .route("/users/role/{id}", web::patch().to(change_role))
        .route("/users/{email}", web::get().to(get_user_by_email))
        .route("/users/{id}", web::delete().to(delete_user));
}

async fn list_users(repos: web::Data<Repositories>) -> Result<HttpResponse, ApiError> {
    Ok(listed(repos.users.list_all().await?))
}

async fn get_user_by_email(
    repos: web::Data<Repositories>,
    email: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    let filter = FieldEquality::new().field("email", email.into_inner());
    Ok(found(repos.users.get_by_filter(filter).await?))
}

async fn register_user(
    repos: web::Data<Repositories>,
    user: web::Json<User>,
) -> Result<HttpResponse, ApiError> {
    Ok(insert_outcome(repos.users.insert_if_absent(&user).await?))
}

async fn change_role(
    repos: web::Data<Repositories>,
    user_id: web::Path<String>,
    change: web::Json<RoleChange>,
) -> Result<HttpResponse, ApiError> {
    let id = id::decode(&user_id)?;
    let result = repos.users.update_fields(id, change.into_inner()).await?;
    Ok(HttpResponse::Ok().json(result))
}

async fn delete_user(
    repos: web::Data<Repositories>,
    user_id: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    let id = id::decode(&user_id)?;
    Ok(HttpResponse::Ok().json(repos.users.delete_by_id(id).await?))
}
