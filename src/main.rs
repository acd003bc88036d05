use std::io;

use actix_web::middleware::Logger;
use actix_web::{web, App, HttpServer};

use smart_ecommerce::config::{Config, StoreConfig};
use smart_ecommerce::db::MongoStore;
use smart_ecommerce::handlers;
use smart_ecommerce::memory::MemoryStore;
use smart_ecommerce::middleware;
use smart_ecommerce::repository::Repositories;
use smart_ecommerce::store::DocumentStore;

#[actix_web::main]
async fn main() -> io::Result<()> {
    dotenv::dotenv().ok(); // Load environment variables from .env file
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = Config::from_env().map_err(io::Error::other)?;

    let store: Box<dyn DocumentStore> = match &config.store {
        StoreConfig::Mongo { uri, database } => Box::new(
            MongoStore::connect(uri, database)
                .await
                .map_err(io::Error::other)?,
        ),
        StoreConfig::Memory => {
            log::warn!("Using the in-memory store; data is lost on exit");
            Box::new(MemoryStore::new())
        }
    };
    store.ping().await.map_err(io::Error::other)?;
    log::info!("Pinged your deployment. You successfully connected to the store!");

    // Built once and shared by every worker.
    let repositories = web::Data::new(Repositories::new(store.as_ref()));

    log::info!(
        "Smart E-Commerce Server is running on {}:{}",
        config.host,
        config.port
    );
    HttpServer::new(move || {
        App::new()
            .app_data(repositories.clone())
            .wrap(middleware::cors())
            .wrap(Logger::default())
            .configure(handlers::configure)
    })
    .bind((config.host.as_str(), config.port))?
    .run()
    .await
}
