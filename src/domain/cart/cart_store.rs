//! Cart slice

use rust_decimal::Decimal;

use crate::domain::catalog::{Product, ProductId};

/// A product and the number of units requested. `qty` is never zero inside a cart.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct CartItem {
    #[serde(flatten)]
    pub product: Product,
    pub qty: u32,
}

impl CartItem {
    pub fn line_total(&self) -> Decimal {
        self.product.price * Decimal::from(self.qty)
    }
}

/// Line items keyed by product identity, at most one per product.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Cart {
    items: Vec<CartItem>,
}

impl Cart {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn items(&self) -> &[CartItem] {
        &self.items
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn item(&self, product_id: &ProductId) -> Option<&CartItem> {
        self.items
            .iter()
            .find(|item| &item.product.id == product_id)
    }

    /// Adding a product already in the cart increments its quantity.
    pub fn add_to_cart(&mut self, product: &Product, qty: u32) {
        if qty == 0 {
            return;
        }
        match self
            .items
            .iter_mut()
            .find(|item| item.product.id == product.id)
        {
            Some(item) => item.qty = item.qty.saturating_add(qty),
            None => self.items.push(CartItem {
                product: product.clone(),
                qty,
            }),
        }
    }

    pub fn remove_from_cart(&mut self, product_id: &ProductId) {
        self.items.retain(|item| &item.product.id != product_id);
    }

    /// Sets the quantity outright. Zero or less removes the item.
    pub fn update_qty(&mut self, product_id: &ProductId, qty: i64) {
        if qty <= 0 {
            self.remove_from_cart(product_id);
            return;
        }
        let qty = u32::try_from(qty).unwrap_or(u32::MAX);
        if let Some(item) = self
            .items
            .iter_mut()
            .find(|item| &item.product.id == product_id)
        {
            item.qty = qty;
        }
    }

    pub fn clear_cart(&mut self) {
        self.items.clear();
    }

    pub fn cart_total(&self) -> Decimal {
        self.items.iter().map(CartItem::line_total).sum()
    }

    /// Total units, not distinct lines.
    pub fn cart_count(&self) -> u64 {
        self.items.iter().map(|item| u64::from(item.qty)).sum()
    }

    pub(crate) fn take_items(&mut self) -> Vec<CartItem> {
        std::mem::take(&mut self.items)
    }
}

//-------------------------- Tests -------------------------------
