//! Farmer listings slice

use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use rust_decimal::Decimal;
use tokio::sync::RwLock;
use tracing::info;

use crate::infra::ClientError;

use super::{Farmer, FarmerId, ListingError, Product, ProductId, Source, category_emoji};

const SEED_CATALOG: &str = include_str!("../../../data/local_catalog.json");
const PLACEHOLDER_IMAGE: &str =
    "https://images.unsplash.com/photo-1542838132-92c53300491e?w=400&h=300&fit=crop";

//------------------------- Web API ----------------------------

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewListing {
    pub name: String,
    pub category: String,
    pub price: Decimal,
    pub available_qty: u32,
    #[serde(default)]
    pub unit: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    pub farming_method: String,
    #[serde(default)]
    pub images: Vec<String>,
}

#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListingUpdate {
    pub name: Option<String>,
    pub price: Option<Decimal>,
    pub available_qty: Option<u32>,
    pub description: Option<String>,
    pub farming_method: Option<String>,
    #[serde(default)]
    pub sold_out: bool,
}

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct FarmerProfile {
    pub farmer: Farmer,
    pub products: Vec<Product>,
}

pub async fn farmers_endpoint(
    State(listings): State<ListingStore>,
) -> Result<Json<Vec<Farmer>>, ClientError> {
    Ok(Json(listings.read().await.farmers().to_vec()))
}

pub async fn farmer_profile_endpoint(
    State(listings): State<ListingStore>,
    Path(farmer_id): Path<String>,
) -> Result<Json<FarmerProfile>, ClientError> {
    let farmer_id = FarmerId::from(farmer_id);
    let listings = listings.read().await;
    let farmer = listings
        .farmer(&farmer_id)
        .cloned()
        .ok_or(ListingError::UnknownFarmer(farmer_id.clone()))?;
    let products = listings.products_of(&farmer_id).cloned().collect();
    Ok(Json(FarmerProfile { farmer, products }))
}

pub async fn add_listing_endpoint(
    State(listings): State<ListingStore>,
    Path(farmer_id): Path<String>,
    Json(payload): Json<NewListing>,
) -> Result<(StatusCode, Json<Product>), ClientError> {
    let farmer_id = FarmerId::from(farmer_id);
    let today = jiff::Zoned::now().date();
    let product = listings
        .write()
        .await
        .add_listing(&farmer_id, payload, today)?;
    info!("Farmer {farmer_id} listed product {}", product.id);
    Ok((StatusCode::CREATED, Json(product)))
}

pub async fn update_listing_endpoint(
    State(listings): State<ListingStore>,
    Path(product_id): Path<String>,
    Json(payload): Json<ListingUpdate>,
) -> Result<Json<Product>, ClientError> {
    let product_id = ProductId::from(product_id);
    let product = listings
        .write()
        .await
        .update_listing(&product_id, payload)?;
    Ok(Json(product))
}

pub async fn remove_listing_endpoint(
    State(listings): State<ListingStore>,
    Path(product_id): Path<String>,
) -> Result<Json<Product>, ClientError> {
    let product_id = ProductId::from(product_id);
    let product = listings.write().await.remove_listing(&product_id)?;
    info!("Listing {product_id} removed");
    Ok(Json(product))
}

//----------------------- Implementation --------------------------

/// Shared handle on the local listings, owned by the application state.
#[derive(Debug, Clone)]
pub struct ListingStore(Arc<RwLock<LocalListings>>);

impl ListingStore {
    pub fn new(listings: LocalListings) -> Self {
        Self(Arc::new(RwLock::new(listings)))
    }

    pub async fn read(&self) -> tokio::sync::RwLockReadGuard<'_, LocalListings> {
        self.0.read().await
    }

    pub async fn write(&self) -> tokio::sync::RwLockWriteGuard<'_, LocalListings> {
        self.0.write().await
    }
}

#[derive(Debug, serde::Deserialize)]
struct SeedCatalog {
    farmers: Vec<Farmer>,
    products: Vec<Product>,
}

/// The farmers and the produce they list directly on the marketplace.
#[derive(Debug, Clone)]
pub struct LocalListings {
    farmers: Vec<Farmer>,
    products: Vec<Product>,
    next_id: u64,
}

impl LocalListings {
    pub fn new(farmers: Vec<Farmer>, products: Vec<Product>) -> Self {
        // New listings get ids well above the seeded ones.
        let next_id = products.len() as u64 + 100;
        Self {
            farmers,
            products,
            next_id,
        }
    }

    /// The listings bundled with the marketplace.
    pub fn seeded() -> Result<Self, serde_json::Error> {
        let seed: SeedCatalog = serde_json::from_str(SEED_CATALOG)?;
        Ok(Self::new(seed.farmers, seed.products))
    }

    pub fn farmers(&self) -> &[Farmer] {
        &self.farmers
    }

    pub fn farmer(&self, farmer_id: &FarmerId) -> Option<&Farmer> {
        self.farmers.iter().find(|farmer| &farmer.id == farmer_id)
    }

    pub fn products(&self) -> &[Product] {
        &self.products
    }

    pub fn products_of<'a>(
        &'a self,
        farmer_id: &'a FarmerId,
    ) -> impl Iterator<Item = &'a Product> + 'a {
        self.products
            .iter()
            .filter(move |product| &product.farmer_id == farmer_id)
    }

    pub fn add_listing(
        &mut self,
        farmer_id: &FarmerId,
        listing: NewListing,
        today: jiff::civil::Date,
    ) -> Result<Product, ListingError> {
        let farmer = self
            .farmer(farmer_id)
            .ok_or_else(|| ListingError::UnknownFarmer(farmer_id.clone()))?;

        let name = listing.name.trim().to_owned();
        if name.is_empty() {
            return Err(ListingError::InvalidListing("name is required".to_owned()));
        }
        if listing.price <= Decimal::ZERO {
            return Err(ListingError::InvalidListing(
                "price must be positive".to_owned(),
            ));
        }

        let images = if listing.images.is_empty() {
            vec![PLACEHOLDER_IMAGE.to_owned()]
        } else {
            listing.images
        };
        let description = listing
            .description
            .filter(|description| !description.trim().is_empty())
            .unwrap_or_else(|| format!("Fresh {name} from {}'s farm", farmer.name));

        let product = Product {
            id: ProductId::from(self.next_id),
            emoji: category_emoji(&listing.category).to_owned(),
            category: listing.category,
            image: images[0].clone(),
            images,
            farmer_id: farmer_id.clone(),
            price: listing.price,
            unit: listing.unit.unwrap_or_else(|| "kg".to_owned()),
            available_qty: listing.available_qty,
            freshness: "fresh".to_owned(),
            harvest_date: today,
            farming_method: listing.farming_method,
            description,
            rating: 0.0,
            review_count: 0,
            source: Some(Source::Local),
            market: None,
            state: None,
            name,
        };
        self.next_id += 1;
        self.products.insert(0, product.clone());
        Ok(product)
    }

    pub fn update_listing(
        &mut self,
        product_id: &ProductId,
        update: ListingUpdate,
    ) -> Result<Product, ListingError> {
        let product = self
            .products
            .iter_mut()
            .find(|product| &product.id == product_id)
            .ok_or_else(|| ListingError::UnknownProduct(product_id.clone()))?;

        if let Some(price) = update.price {
            if price <= Decimal::ZERO {
                return Err(ListingError::InvalidListing(
                    "price must be positive".to_owned(),
                ));
            }
            product.price = price;
        }
        if let Some(name) = update.name.filter(|name| !name.trim().is_empty()) {
            product.name = name;
        }
        if let Some(available_qty) = update.available_qty {
            product.available_qty = available_qty;
        }
        if let Some(description) = update.description {
            product.description = description;
        }
        if let Some(farming_method) = update.farming_method {
            product.farming_method = farming_method;
        }
        if update.sold_out {
            product.available_qty = 0;
        }
        Ok(product.clone())
    }

    pub fn remove_listing(&mut self, product_id: &ProductId) -> Result<Product, ListingError> {
        let index = self
            .products
            .iter()
            .position(|product| &product.id == product_id)
            .ok_or_else(|| ListingError::UnknownProduct(product_id.clone()))?;
        Ok(self.products.remove(index))
    }
}

//-------------------------- Tests -------------------------------
