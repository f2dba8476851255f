pub mod cart;
pub mod catalog;
pub mod checkout;
mod helpers;
pub mod payments;

pub use helpers::fake::*;
