//! Catalog browsing slice

use axum::{
    Json,
    extract::{Path, Query, State},
};

use crate::infra::{ClientError, Settings};

use super::{CatalogAggregator, ListingStore, Product, ProductId, Source};

//------------------------- Web API ----------------------------

/// Query string of `GET /catalog`. Kept flat so numbers parse from the urlencoded form.
#[derive(Debug, Clone, Default, serde::Deserialize)]
pub struct CatalogParams {
    #[serde(default)]
    pub source: SourceFilter,
    pub category: Option<String>,
    pub q: Option<String>,
    #[serde(default)]
    pub sort: SortOrder,
    pub pages: Option<usize>,
}

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogPage {
    pub total: usize,
    pub visible: usize,
    pub has_more: bool,
    pub products: Vec<Product>,
}

pub async fn catalog_endpoint(
    State(settings): State<Settings>,
    State(listings): State<ListingStore>,
    State(aggregator): State<CatalogAggregator>,
    Query(params): Query<CatalogParams>,
) -> Result<Json<CatalogPage>, ClientError> {
    let local = listings.read().await.products().to_vec();
    let catalog = aggregator.catalog(&local).await;

    let mut browser = CatalogBrowser::new(settings.catalog.page_size);
    browser.set_filter(CatalogFilter {
        source: params.source,
        category: params.category,
        search: params.q.unwrap_or_default(),
        sort: params.sort,
    });
    for _ in 1..params.pages.unwrap_or(1) {
        browser.load_more();
    }

    Ok(Json(browser.page(&catalog)))
}

pub async fn product_endpoint(
    State(listings): State<ListingStore>,
    State(aggregator): State<CatalogAggregator>,
    Path(product_id): Path<String>,
) -> Result<Json<Product>, ClientError> {
    let product_id = ProductId::from(product_id);
    let local = listings.read().await.products().to_vec();
    aggregator
        .product(&local, &product_id)
        .await
        .map(Json)
        .ok_or_else(|| ClientError::NotFound(format!("Product {product_id} not found.")))
}

//----------------------- Implementation --------------------------

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceFilter {
    #[default]
    All,
    Local,
    Enam,
    Fruityvice,
}

impl SourceFilter {
    fn admits(self, product: &Product) -> bool {
        match self {
            SourceFilter::All => true,
            // Untagged products can only be local listings.
            SourceFilter::Local => matches!(product.source, None | Some(Source::Local)),
            SourceFilter::Enam => product.is_from(Source::Enam),
            SourceFilter::Fruityvice => product.is_from(Source::Fruityvice),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SortOrder {
    #[default]
    Default,
    PriceLow,
    PriceHigh,
    Rating,
    Newest,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CatalogFilter {
    pub source: SourceFilter,
    /// `None` or `"all"` admits every category.
    pub category: Option<String>,
    pub search: String,
    pub sort: SortOrder,
}

fn category_rank(category: &str) -> u8 {
    match category {
        "fruits" => 1,
        "vegetables" => 2,
        "grains" => 3,
        "dairy" => 4,
        "organic" => 5,
        _ => 99,
    }
}

/// Source, then category, then free text, then a stable sort.
pub fn apply_filter(products: &[Product], filter: &CatalogFilter) -> Vec<Product> {
    let category = filter
        .category
        .as_deref()
        .filter(|category| *category != "all");
    let needle = filter.search.trim().to_lowercase();

    let mut matching: Vec<Product> = products
        .iter()
        .filter(|product| filter.source.admits(product))
        .filter(|product| category.is_none_or(|category| product.category == category))
        .filter(|product| {
            needle.is_empty()
                || product.name.to_lowercase().contains(&needle)
                || product.category.to_lowercase().contains(&needle)
                || product.description.to_lowercase().contains(&needle)
        })
        .cloned()
        .collect();

    // `sort_by` is stable, so ties keep their catalog order.
    match filter.sort {
        SortOrder::Default => {
            matching.sort_by_key(|product| category_rank(&product.category));
        }
        SortOrder::PriceLow => matching.sort_by(|a, b| a.price.cmp(&b.price)),
        SortOrder::PriceHigh => matching.sort_by(|a, b| b.price.cmp(&a.price)),
        SortOrder::Rating => matching.sort_by(|a, b| b.rating.total_cmp(&a.rating)),
        SortOrder::Newest => matching.sort_by(|a, b| b.harvest_date.cmp(&a.harvest_date)),
    }
    matching
}

/// Filter state plus the "show more" visible count.
#[derive(Debug, Clone)]
pub struct CatalogBrowser {
    filter: CatalogFilter,
    page_size: usize,
    visible: usize,
}

impl CatalogBrowser {
    pub fn new(page_size: usize) -> Self {
        let page_size = page_size.max(1);
        Self {
            filter: CatalogFilter::default(),
            page_size,
            visible: page_size,
        }
    }

    pub fn filter(&self) -> &CatalogFilter {
        &self.filter
    }

    /// Any change to the filter or sort goes back to the first page.
    pub fn set_filter(&mut self, filter: CatalogFilter) {
        if filter != self.filter {
            self.filter = filter;
            self.visible = self.page_size;
        }
    }

    pub fn load_more(&mut self) {
        self.visible += self.page_size;
    }

    pub fn visible(&self) -> usize {
        self.visible
    }

    pub fn page(&self, catalog: &[Product]) -> CatalogPage {
        let mut products = apply_filter(catalog, &self.filter);
        let total = products.len();
        products.truncate(self.visible);
        CatalogPage {
            total,
            visible: products.len(),
            has_more: total > self.visible,
            products,
        }
    }
}

//-------------------------- Tests -------------------------------
