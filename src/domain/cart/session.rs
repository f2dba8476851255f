use super::{Cart, CartError, DeliveryInfo, Favorites, Order, OrderId, OrderLedger};

/// Everything a shopper accumulates in one session. Owned by whoever drives the
/// front end and passed by reference to checkout.
#[derive(Debug, Clone, Default)]
pub struct MarketSession {
    pub cart: Cart,
    pub orders: OrderLedger,
    pub favorites: Favorites,
}

impl MarketSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshots the cart into a new order, records it and empties the cart.
    pub fn place_order(&mut self, info: DeliveryInfo) -> Order {
        let order = Order::from_cart(self.cart.take_items(), info, jiff::Timestamp::now());
        self.orders.record(order.clone());
        order
    }

    pub fn order(&self, order_id: &OrderId) -> Result<&Order, CartError> {
        self.orders
            .get(order_id)
            .ok_or(CartError::OrderDoesNotExist(*order_id))
    }
}
