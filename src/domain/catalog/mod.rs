mod aggregator;
mod browse;
mod enam;
mod errors;
mod feeds;
mod fruityvice;
mod listings;
mod product;

pub use aggregator::CatalogAggregator;
pub use browse::{
    CatalogBrowser, CatalogFilter, CatalogPage, CatalogParams, SortOrder, SourceFilter,
    apply_filter, catalog_endpoint, product_endpoint,
};
pub use enam::{EnamFeed, detect_category, detect_emoji, transform_enam_item};
pub use errors::{FeedError, ListingError};
pub use feeds::{CatalogFeed, fetch_or_empty};
#[cfg(test)]
pub(crate) use feeds::stubs;
pub use fruityvice::{Fruit, FruitNutrition, FruityviceFeed, fruit_price, transform_fruit};
pub use listings::{
    FarmerProfile, ListingStore, ListingUpdate, LocalListings, NewListing,
    add_listing_endpoint, farmer_profile_endpoint, farmers_endpoint, remove_listing_endpoint,
    update_listing_endpoint,
};
pub use product::{Farmer, FarmerId, FutureHarvest, Product, ProductId, Source, category_emoji};
