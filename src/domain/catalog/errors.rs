use super::{FarmerId, ProductId};

#[derive(Debug, PartialEq, thiserror::Error)]
pub enum ListingError {
    #[error("Farmer {0} does not exist.")]
    UnknownFarmer(FarmerId),
    #[error("Product {0} is not a local listing.")]
    UnknownProduct(ProductId),
    #[error("Invalid listing: {0}")]
    InvalidListing(String),
}

/// Reasons an external catalog feed contributed nothing. Never shown to shoppers.
#[derive(Debug, thiserror::Error)]
pub enum FeedError {
    #[error("request timed out after {0:?}")]
    Timeout(std::time::Duration),
    #[error("endpoint returned status {0}")]
    Status(reqwest::StatusCode),
    #[error(transparent)]
    Http(#[from] reqwest::Error),
    #[error("payload held no catalog items")]
    EmptyPayload,
}
