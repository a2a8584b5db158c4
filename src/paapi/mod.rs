//! Product Advertising API 5.0: endpoints, signing, wire models and client.

pub mod client;
pub mod models;
pub mod parser;
pub mod regions;
pub mod signing;

pub use client::{PaapiClient, ProductSearch, SearchQuery};
pub use models::{Candidate, Listing, Price, SearchItemsResponse};
pub use parser::Parser;
pub use regions::Region;
