//! Fruityvice public fruit feed.

use async_trait::async_trait;
use rand::Rng;
use reqwest::Client;
use rust_decimal::Decimal;
use serde::Deserialize;

use super::{CatalogFeed, FarmerId, FeedError, Product, ProductId, Source};

const DEFAULT_FRUIT_IMAGE: &str =
    "https://images.unsplash.com/photo-1619566636858-adf3ef46400b?w=400&h=300&fit=crop";

/// Typical Indian market prices (₹/kg) for fruits whose nutrition says nothing about cost.
const PREMIUM_PRICES: &[(&str, i64)] = &[
    ("avocado", 250),
    ("dragonfruit", 300),
    ("blueberry", 400),
    ("raspberry", 350),
    ("cherry", 320),
    ("kiwi", 180),
    ("strawberry", 200),
    ("fig", 280),
    ("durian", 500),
    ("passionfruit", 350),
    ("persimmon", 220),
    ("cranberry", 380),
    ("lychee", 160),
    ("jackfruit", 60),
    ("plum", 150),
];

#[derive(Debug, Clone, Deserialize)]
pub struct FruitNutrition {
    pub calories: f64,
    #[serde(default)]
    pub fat: f64,
    #[serde(default)]
    pub sugar: f64,
    #[serde(default)]
    pub carbohydrates: f64,
    #[serde(default)]
    pub protein: f64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Fruit {
    pub name: String,
    pub id: u64,
    #[serde(default)]
    pub family: String,
    pub nutritions: FruitNutrition,
}

//----------------------- Feed --------------------------

pub struct FruityviceFeed {
    client: Client,
    url: String,
    limit: usize,
}

impl FruityviceFeed {
    pub fn new(client: Client, url: impl Into<String>, limit: usize) -> Self {
        Self {
            client,
            url: url.into(),
            limit,
        }
    }
}

#[async_trait]
impl CatalogFeed for FruityviceFeed {
    fn source(&self) -> Source {
        Source::Fruityvice
    }

    async fn fetch(&self) -> Result<Vec<Product>, FeedError> {
        let response = self.client.get(&self.url).send().await?;
        if !response.status().is_success() {
            return Err(FeedError::Status(response.status()));
        }

        let fruits: Vec<Fruit> = response.json().await?;
        if fruits.is_empty() {
            return Err(FeedError::EmptyPayload);
        }

        let today = jiff::Zoned::now().date();
        let mut rng = rand::thread_rng();
        Ok(fruits
            .iter()
            .take(self.limit)
            .map(|fruit| transform_fruit(fruit, today, &mut rng))
            .collect())
    }
}

//----------------------- Implementation --------------------------

fn fruit_images(key: &str) -> (&'static str, Option<&'static str>) {
    match key {
        "apple" => (
            "https://images.unsplash.com/photo-1560806887-1e4cd0b6cbd6?w=400&h=300&fit=crop",
            Some("https://images.unsplash.com/photo-1570913149827-d2ac84ab3f9a?w=600&h=400&fit=crop"),
        ),
        "avocado" => (
            "https://images.unsplash.com/photo-1523049673857-eb18f1d7b578?w=400&h=300&fit=crop",
            None,
        ),
        "banana" => (
            "https://images.unsplash.com/photo-1571771894821-ce9b6c11b08e?w=400&h=300&fit=crop",
            Some("https://images.unsplash.com/photo-1603833665858-e61d17a86224?w=600&h=400&fit=crop"),
        ),
        "blueberry" => (
            "https://images.unsplash.com/photo-1498557850523-fd3d118b962e?w=400&h=300&fit=crop",
            None,
        ),
        "cherry" => (
            "https://images.unsplash.com/photo-1528821128474-27f963b062bf?w=400&h=300&fit=crop",
            None,
        ),
        "grape" | "grapes" => (
            "https://images.unsplash.com/photo-1537640538966-79f369143f8f?w=400&h=300&fit=crop",
            None,
        ),
        "kiwi" => (
            "https://images.unsplash.com/photo-1585059895524-72359e06133a?w=400&h=300&fit=crop",
            None,
        ),
        "lemon" | "lime" => (
            "https://images.unsplash.com/photo-1590502593747-42a996133562?w=400&h=300&fit=crop",
            None,
        ),
        "mango" => (
            "https://images.unsplash.com/photo-1553279768-865429fa0078?w=400&h=300&fit=crop",
            Some("https://images.unsplash.com/photo-1601493700631-2b16ec4b4716?w=600&h=400&fit=crop"),
        ),
        "orange" | "tangerine" => (
            "https://images.unsplash.com/photo-1547514701-42782101795e?w=400&h=300&fit=crop",
            None,
        ),
        "papaya" => (
            "https://images.unsplash.com/photo-1517282009859-f000ec3b26fe?w=400&h=300&fit=crop",
            None,
        ),
        "pear" => (
            "https://images.unsplash.com/photo-1514756331096-242fdeb70d4a?w=400&h=300&fit=crop",
            None,
        ),
        "pineapple" => (
            "https://images.unsplash.com/photo-1550258987-190a2d41a8ba?w=400&h=300&fit=crop",
            None,
        ),
        "strawberry" => (
            "https://images.unsplash.com/photo-1464965911861-746a04b4bca6?w=400&h=300&fit=crop",
            Some("https://images.unsplash.com/photo-1518635017498-87f514b751ba?w=600&h=400&fit=crop"),
        ),
        "watermelon" => (
            "https://images.unsplash.com/photo-1589984662646-e7b2e4962f18?w=400&h=300&fit=crop",
            Some("https://images.unsplash.com/photo-1563114773-84221bd62daa?w=600&h=400&fit=crop"),
        ),
        _ => (DEFAULT_FRUIT_IMAGE, None),
    }
}

fn fruit_emoji(key: &str) -> &'static str {
    match key {
        "apricot" | "peach" | "plum" => "🍑",
        "avocado" => "🥑",
        "banana" => "🍌",
        "blackberry" | "blueberry" => "🫐",
        "cherry" | "cranberry" | "lychee" => "🍒",
        "coconut" => "🥥",
        "dragonfruit" => "🐉",
        "durian" | "jackfruit" | "melon" | "papaya" | "passionfruit" => "🍈",
        "fig" | "guava" | "pear" => "🍐",
        "gooseberry" | "grape" | "grapes" => "🍇",
        "greenapple" => "🍏",
        "kiwi" => "🥝",
        "lemon" | "lime" => "🍋",
        "mango" => "🥭",
        "orange" | "persimmon" | "tangerine" => "🍊",
        "pineapple" => "🍍",
        "raspberry" | "strawberry" => "🍓",
        "tomato" => "🍅",
        "watermelon" => "🍉",
        _ => "🍎",
    }
}

/// Premium fruits have a fixed price; the rest are banded by calorie density.
pub fn fruit_price(name: &str, calories: f64, rng: &mut impl Rng) -> Decimal {
    let lower = name.to_lowercase();
    if let Some((_, price)) = PREMIUM_PRICES.iter().find(|(fruit, _)| *fruit == lower) {
        return Decimal::new(*price, 0);
    }

    let base = if calories > 100.0 {
        80
    } else if calories > 60.0 {
        50
    } else {
        30
    };
    Decimal::new(base + rng.gen_range(0..=40), 0)
}

pub fn transform_fruit(fruit: &Fruit, today: jiff::civil::Date, rng: &mut impl Rng) -> Product {
    let key: String = fruit
        .name
        .to_lowercase()
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect();
    let (main_image, extra_image) = fruit_images(&key);
    let nutrition = &fruit.nutritions;
    let rating_tenths: u32 = rng.gen_range(40..=49);

    Product {
        id: ProductId::new(format!("fruit-{}", fruit.id)),
        name: fruit.name.clone(),
        emoji: fruit_emoji(&key).to_owned(),
        category: "fruits".to_owned(),
        image: main_image.to_owned(),
        images: std::iter::once(main_image)
            .chain(extra_image)
            .map(str::to_owned)
            .collect(),
        farmer_id: FarmerId::from("f1"),
        price: fruit_price(&fruit.name, nutrition.calories, rng),
        unit: "kg".to_owned(),
        available_qty: rng.gen_range(20..100),
        freshness: "fresh".to_owned(),
        harvest_date: today,
        farming_method: "Natural".to_owned(),
        description: format!(
            "Fresh {} ({} family). Per 100g: {} cal, {}g protein, {}g carbs, {}g sugar, {}g fat. Sourced via Fruityvice.",
            fruit.name,
            fruit.family,
            nutrition.calories,
            nutrition.protein,
            nutrition.carbohydrates,
            nutrition.sugar,
            nutrition.fat,
        ),
        rating: f64::from(rating_tenths) / 10.0,
        review_count: rng.gen_range(10..70),
        source: Some(Source::Fruityvice),
        market: None,
        state: None,
    }
}

//-------------------------- Tests -------------------------------
