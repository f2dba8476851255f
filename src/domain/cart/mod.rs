mod cart_store;
mod errors;
mod favorites;
mod ids;
mod orders;
mod session;

pub use cart_store::{Cart, CartItem};
pub use errors::CartError;
pub use favorites::Favorites;
pub use ids::*;
pub use orders::{
    DeliveryInfo, Order, OrderLedger, OrderStatus, PaymentMethod, PaymentStatus,
};
pub use session::MarketSession;
