//! headphone-deals - Static page of Amazon listings under a price ceiling
//!
//! Queries the Product Advertising API 5.0 `SearchItems` operation, keeps the
//! listings priced under the ceiling, orders them cheapest first and writes a
//! self-contained HTML page.

pub mod commands;
pub mod config;
pub mod credentials;
pub mod error;
pub mod filters;
pub mod output;
pub mod paapi;
pub mod render;

pub use commands::{BuildCommand, BuildReport};
pub use config::Config;
pub use credentials::Credentials;
pub use error::{ApiError, Error, Result};
pub use filters::ListingSet;
pub use paapi::{Listing, Price, Region};
