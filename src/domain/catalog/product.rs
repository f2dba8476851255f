use rust_decimal::Decimal;

use crate::string_id;

string_id!(ProductId, "product");
string_id!(FarmerId, "farmer");

/// Where a catalog item came from.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    serde::Serialize,
    serde::Deserialize,
    strum_macros::Display,
)]
pub enum Source {
    #[serde(rename = "local")]
    #[strum(serialize = "local")]
    Local,
    #[serde(rename = "eNAM")]
    #[strum(serialize = "eNAM")]
    Enam,
    #[serde(rename = "Fruityvice")]
    #[strum(serialize = "Fruityvice")]
    Fruityvice,
}

/// A catalog item. Treated as a read-only value once it has been fetched or listed.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub emoji: String,
    pub category: String,
    pub image: String,
    pub images: Vec<String>,
    pub farmer_id: FarmerId,
    pub price: Decimal,
    pub unit: String,
    pub available_qty: u32,
    pub freshness: String,
    pub harvest_date: jiff::civil::Date,
    pub farming_method: String,
    pub description: String,
    pub rating: f64,
    pub review_count: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<Source>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub market: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
}

impl Product {
    pub fn with_source(mut self, source: Source) -> Self {
        self.source = Some(source);
        self
    }

    pub fn is_from(&self, source: Source) -> bool {
        self.source == Some(source)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct FutureHarvest {
    pub crop: String,
    pub date: String,
}

/// A seller profile.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Farmer {
    pub id: FarmerId,
    pub name: String,
    pub photo: String,
    pub village: String,
    pub phone: String,
    pub whatsapp: String,
    pub rating: f64,
    pub total_orders: u32,
    pub farm_photos: Vec<String>,
    pub future_harvests: Vec<FutureHarvest>,
    pub farming_method: String,
    pub joined_date: jiff::civil::Date,
    pub bio: String,
}

/// Emoji shown for a whole category when nothing more specific is known.
pub fn category_emoji(category: &str) -> &'static str {
    match category {
        "fruits" => "🍎",
        "vegetables" => "🥦",
        "grains" => "🌾",
        "dairy" => "🥛",
        "organic" => "🌿",
        _ => "🛒",
    }
}
