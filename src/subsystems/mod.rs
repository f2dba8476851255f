mod catalog_prefetch;
mod web_server;

pub use catalog_prefetch::CatalogPrefetch;
pub use web_server::{WebServer, router};
