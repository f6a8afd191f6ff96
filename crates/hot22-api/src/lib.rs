// hot22-api: Async Rust client for the HOT22 back-office REST API

pub mod client;
pub mod endpoints;
pub mod error;
pub mod models;
pub mod params;
pub mod transport;

pub use client::{ApiClient, Endpoint, RequestOptions, percent_complete};
pub use error::{Error, ErrorClass};
pub use models::*;
pub use params::{DATE_FORMAT, QueryParams, parse_date};
pub use transport::TransportConfig;
