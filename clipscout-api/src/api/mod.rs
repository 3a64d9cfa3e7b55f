//! HTTP API handlers for clipscout-api

pub mod health;
pub mod searches;
pub mod upload;

pub use health::health_routes;
pub use searches::search_routes;
pub use upload::upload_routes;
