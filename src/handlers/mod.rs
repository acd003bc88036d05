use actix_web::{web, HttpResponse, Responder};
use mongodb::bson::Document;
use serde::Deserialize;
use serde_json::Value;

use crate::error::ApiError;
use crate::repository::InsertOutcome;
use crate::wire;

mod lists;
mod messages;
mod orders;
mod products;
mod reviews;
mod users;

pub const LIVENESS_MESSAGE: &str = "Smart E-Commerce Server is Running";

/// Registers every route plus the JSON body configuration.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(json_config())
        .route("/", web::get().to(index));
    products::configure(cfg);
    orders::configure(cfg);
    users::configure(cfg);
    reviews::configure(cfg);
    lists::configure(cfg);
    messages::configure(cfg);
}

/// Malformed bodies are answered in the API's own error shape.
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default()
        .error_handler(|err, _req| ApiError::InvalidBody(err.to_string()).into())
}

async fn index() -> impl Responder {
    LIVENESS_MESSAGE
}

/// `?email=` on per-customer listings. Absent and empty are treated alike.
#[derive(Debug, Deserialize)]
pub(crate) struct EmailQuery {
    email: Option<String>,
}

impl EmailQuery {
    fn email(&self) -> Option<&str> {
        self.email.as_deref().filter(|email| !email.is_empty())
    }
}

fn found(doc: Option<Document>) -> HttpResponse {
    HttpResponse::Ok().json(doc.map_or(Value::Null, wire::document_to_json))
}

fn listed(docs: Vec<Document>) -> HttpResponse {
    HttpResponse::Ok().json(wire::documents_to_json(docs))
}

fn empty_list() -> HttpResponse {
    HttpResponse::Ok().json(Vec::<Value>::new())
}

// A duplicate is a soft failure: 200 with `insertedId: null`.
fn insert_outcome(outcome: InsertOutcome) -> HttpResponse {
    match outcome {
        InsertOutcome::Inserted(result) => HttpResponse::Created().json(result),
        InsertOutcome::AlreadyExists(notice) => HttpResponse::Ok().json(notice),
    }
}
