pub mod config;
pub mod db;
pub mod error;
pub mod handlers;
pub mod id;
pub mod memory;
pub mod middleware;
pub mod models;
pub mod repository;
pub mod store;
pub mod wire;
