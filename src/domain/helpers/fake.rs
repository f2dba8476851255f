use fake::{Dummy, Fake, Faker};
use rust_decimal::Decimal;

use crate::domain::catalog::{FarmerId, Product, ProductId, Source};

/// Whole-rupee prices between 10 and 999.
pub struct Price;

impl Dummy<Price> for Decimal {
    fn dummy_with_rng<R: fake::Rng + ?Sized>(_config: &Price, rng: &mut R) -> Self {
        let value: i64 = (10..1000).fake_with_rng(rng);
        Decimal::new(value, 0)
    }
}

pub struct Category;

impl Dummy<Category> for String {
    fn dummy_with_rng<R: fake::Rng + ?Sized>(_config: &Category, rng: &mut R) -> Self {
        let categories = ["fruits", "vegetables", "grains", "dairy", "organic"];
        let index: usize = (0..categories.len()).fake_with_rng(rng);
        categories[index].to_owned()
    }
}

impl Dummy<Faker> for Product {
    fn dummy_with_rng<R: fake::Rng + ?Sized>(config: &Faker, rng: &mut R) -> Self {
        let name: String = fake::faker::lorem::en::Word().fake_with_rng(rng);
        let image: String = format!("https://images.example.com/{name}.jpg");
        let day: i8 = (1..=28).fake_with_rng(rng);
        let rating_tenths: i64 = (30..=50).fake_with_rng(rng);
        Product {
            id: ProductId::dummy_with_rng(config, rng),
            name: name.clone(),
            emoji: "🌱".to_owned(),
            category: Category.fake_with_rng(rng),
            image: image.clone(),
            images: vec![image],
            farmer_id: FarmerId::dummy_with_rng(config, rng),
            price: Price.fake_with_rng(rng),
            unit: "kg".to_owned(),
            available_qty: (1..500).fake_with_rng(rng),
            freshness: "fresh".to_owned(),
            harvest_date: jiff::civil::date(2026, 2, day),
            farming_method: "Organic".to_owned(),
            description: format!("Fresh {name} from the farm."),
            rating: rating_tenths as f64 / 10.0,
            review_count: (0..200).fake_with_rng(rng),
            source: Some(Source::Local),
            market: None,
            state: None,
        }
    }
}
