//! National Agriculture Market (eNAM) commodity feed.

use async_trait::async_trait;
use rand::Rng;
use reqwest::Client;
use rust_decimal::Decimal;
use serde_json::Value;

use super::{CatalogFeed, FarmerId, FeedError, Product, ProductId, Source, category_emoji};

/// Commodity keywords in match order. The first keyword contained in a name wins.
const CATEGORY_KEYWORDS: &[(&str, &str)] = &[
    ("mango", "fruits"),
    ("banana", "fruits"),
    ("apple", "fruits"),
    ("grapes", "fruits"),
    ("watermelon", "fruits"),
    ("pomegranate", "fruits"),
    ("papaya", "fruits"),
    ("guava", "fruits"),
    ("orange", "fruits"),
    ("lemon", "fruits"),
    ("coconut", "fruits"),
    ("pineapple", "fruits"),
    ("tomato", "vegetables"),
    ("onion", "vegetables"),
    ("potato", "vegetables"),
    ("brinjal", "vegetables"),
    ("cauliflower", "vegetables"),
    ("cabbage", "vegetables"),
    ("carrot", "vegetables"),
    ("green chilli", "vegetables"),
    ("capsicum", "vegetables"),
    ("ladyfinger", "vegetables"),
    ("okra", "vegetables"),
    ("drumstick", "vegetables"),
    ("bitter gourd", "vegetables"),
    ("bottle gourd", "vegetables"),
    ("spinach", "vegetables"),
    ("coriander", "vegetables"),
    ("beans", "vegetables"),
    ("peas", "vegetables"),
    ("cucumber", "vegetables"),
    ("rice", "grains"),
    ("wheat", "grains"),
    ("jowar", "grains"),
    ("bajra", "grains"),
    ("maize", "grains"),
    ("ragi", "grains"),
    ("paddy", "grains"),
    ("barley", "grains"),
    ("turmeric", "organic"),
    ("ginger", "organic"),
    ("honey", "organic"),
    ("milk", "dairy"),
    ("ghee", "dairy"),
    ("curd", "dairy"),
    ("paneer", "dairy"),
];

const EMOJI_KEYWORDS: &[(&str, &str)] = &[
    ("mango", "🥭"),
    ("banana", "🍌"),
    ("apple", "🍎"),
    ("grapes", "🍇"),
    ("watermelon", "🍉"),
    ("pomegranate", "🍎"),
    ("papaya", "🍈"),
    ("guava", "🍐"),
    ("orange", "🍊"),
    ("lemon", "🍋"),
    ("coconut", "🥥"),
    ("pineapple", "🍍"),
    ("tomato", "🍅"),
    ("onion", "🧅"),
    ("potato", "🥔"),
    ("brinjal", "🍆"),
    ("cauliflower", "🥦"),
    ("cabbage", "🥬"),
    ("carrot", "🥕"),
    ("green chilli", "🌶️"),
    ("capsicum", "🫑"),
    ("rice", "🍚"),
    ("wheat", "🌾"),
    ("turmeric", "🟡"),
    ("ginger", "🫚"),
    ("honey", "🍯"),
    ("milk", "🥛"),
    ("ghee", "🧈"),
];

/// Keys under which the payload array has been seen.
const PAYLOAD_KEYS: &[&str] = &["products", "data", "result", "records", "commodities"];

fn placeholder_image(category: &str) -> &'static str {
    match category {
        "fruits" => "https://images.unsplash.com/photo-1619566636858-adf3ef46400b?w=400&h=300&fit=crop",
        "grains" => "https://images.unsplash.com/photo-1574323347407-f5e1ad6d020b?w=400&h=300&fit=crop",
        "dairy" => "https://images.unsplash.com/photo-1563636619-e9143da7973b?w=400&h=300&fit=crop",
        "organic" => "https://images.unsplash.com/photo-1542838132-92c53300491e?w=400&h=300&fit=crop",
        _ => "https://images.unsplash.com/photo-1540420773420-3366772f4999?w=400&h=300&fit=crop",
    }
}

//----------------------- Feed --------------------------

pub struct EnamFeed {
    client: Client,
    url: String,
    limit: usize,
}

impl EnamFeed {
    pub fn new(client: Client, url: impl Into<String>, limit: usize) -> Self {
        Self {
            client,
            url: url.into(),
            limit,
        }
    }
}

#[async_trait]
impl CatalogFeed for EnamFeed {
    fn source(&self) -> Source {
        Source::Enam
    }

    async fn fetch(&self) -> Result<Vec<Product>, FeedError> {
        let tracker = jiff::Timestamp::now().as_millisecond().to_string();
        let response = self
            .client
            .post(&self.url)
            .header(reqwest::header::ACCEPT, "application/json")
            .json(&serde_json::json!({
                "tkn": "",
                "trkr": tracker,
                "lang": "en",
                "lat": "",
                "lon": "",
                "lac": "",
                "did": "agritech-marketplace",
                "usag": "agritech",
                "apitrkr": tracker,
            }))
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(FeedError::Status(response.status()));
        }

        let payload: Value = response.json().await?;
        let items = extract_items(&payload);
        if items.is_empty() {
            return Err(FeedError::EmptyPayload);
        }

        let today = jiff::Zoned::now().date();
        let mut rng = rand::thread_rng();
        Ok(items
            .iter()
            .take(self.limit)
            .enumerate()
            .map(|(index, item)| transform_enam_item(item, index, today, &mut rng))
            .collect())
    }
}

//----------------------- Implementation --------------------------

fn extract_items(payload: &Value) -> &[Value] {
    PAYLOAD_KEYS
        .iter()
        .find_map(|key| payload.get(key).and_then(Value::as_array))
        .map(Vec::as_slice)
        .unwrap_or_default()
}

/// Reads the first present, non-empty field among `keys`, accepting strings or numbers.
fn text_field(item: &Value, keys: &[&str]) -> Option<String> {
    keys.iter().find_map(|key| match item.get(key)? {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    })
}

fn number_field(item: &Value, keys: &[&str]) -> Option<f64> {
    text_field(item, keys).and_then(|text| text.trim().parse::<f64>().ok())
}

pub fn detect_category(name: &str) -> &'static str {
    let lower = name.to_lowercase();
    CATEGORY_KEYWORDS
        .iter()
        .find(|(keyword, _)| lower.contains(keyword))
        .map(|(_, category)| *category)
        .unwrap_or("vegetables")
}

pub fn detect_emoji(name: &str) -> &'static str {
    let lower = name.to_lowercase();
    EMOJI_KEYWORDS
        .iter()
        .find(|(keyword, _)| lower.contains(keyword))
        .map(|(_, emoji)| *emoji)
        .unwrap_or_else(|| category_emoji(detect_category(name)))
}

fn capitalize(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Modal price per kilogram. Quintal prices (above 1000) are scaled down to kilograms.
fn price_per_kg(item: &Value) -> (Decimal, f64) {
    let min_price = number_field(item, &["min_price", "minPrice", "modal_price"]).unwrap_or(0.0);
    let max_price = number_field(item, &["max_price", "maxPrice", "modal_price"]).unwrap_or(0.0);
    let modal_price = number_field(item, &["modal_price", "modalPrice"])
        .unwrap_or((min_price + max_price) / 2.0);

    let per_kg = if modal_price > 1000.0 {
        modal_price / 100.0
    } else {
        modal_price
    };
    let rounded = per_kg.round() as i64;
    let price = if rounded > 0 {
        Decimal::new(rounded, 0)
    } else {
        Decimal::new(50, 0)
    };
    (price, modal_price)
}

pub fn transform_enam_item(
    item: &Value,
    index: usize,
    today: jiff::civil::Date,
    rng: &mut impl Rng,
) -> Product {
    let name = text_field(item, &["commodity", "productName", "product_name"])
        .unwrap_or_else(|| "Farm Product".to_owned());
    let category = detect_category(&name);
    let (price, modal_price) = price_per_kg(item);
    let market = text_field(item, &["market", "apmc"]);
    let state = text_field(item, &["state"]);
    let image = placeholder_image(category).to_owned();
    let rating_tenths: u32 = rng.gen_range(40..=49);

    Product {
        id: ProductId::new(format!("enam-{}", index + 1)),
        name: capitalize(&name),
        emoji: detect_emoji(&name).to_owned(),
        category: category.to_owned(),
        image: image.clone(),
        images: vec![image],
        farmer_id: FarmerId::from("f1"),
        price,
        unit: text_field(item, &["unit"]).unwrap_or_else(|| "kg".to_owned()),
        available_qty: rng.gen_range(20..100),
        freshness: "fresh".to_owned(),
        harvest_date: today,
        farming_method: "Traditional".to_owned(),
        description: format!(
            "{name} sourced via eNAM (National Agriculture Market). Market: {}. State: {}. Current modal price: ₹{modal_price}/quintal.",
            market.as_deref().unwrap_or("India"),
            state.as_deref().unwrap_or("India"),
        ),
        rating: f64::from(rating_tenths) / 10.0,
        review_count: rng.gen_range(5..45),
        source: Some(Source::Enam),
        market: Some(market.unwrap_or_default()),
        state: Some(state.unwrap_or_default()),
    }
}

//-------------------------- Tests -------------------------------
