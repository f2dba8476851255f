//! Order ledger slice

use std::collections::HashMap;
use std::fmt::Write;

use rust_decimal::Decimal;

use crate::domain::catalog::FarmerId;

use super::{CartItem, OrderId};

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    serde::Serialize,
    serde::Deserialize,
    strum_macros::Display,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum PaymentMethod {
    /// Cash on delivery.
    Cod,
    Upi,
    Card,
}

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    serde::Serialize,
    serde::Deserialize,
    strum_macros::Display,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum PaymentStatus {
    Paid,
    Pending,
}

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    serde::Serialize,
    serde::Deserialize,
    strum_macros::Display,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum OrderStatus {
    Confirmed,
}

/// Input used once to build an order.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeliveryInfo {
    pub name: String,
    pub phone: String,
    pub address: String,
    pub payment_method: PaymentMethod,
    /// Set by checkout once a payment has been confirmed.
    #[serde(default)]
    pub payment_status: Option<PaymentStatus>,
    #[serde(default)]
    pub payment_reference: Option<String>,
}

impl DeliveryInfo {
    pub fn new(
        name: impl Into<String>,
        phone: impl Into<String>,
        address: impl Into<String>,
        payment_method: PaymentMethod,
    ) -> Self {
        Self {
            name: name.into(),
            phone: phone.into(),
            address: address.into(),
            payment_method,
            payment_status: None,
            payment_reference: None,
        }
    }

    /// Names of the delivery fields that are still blank.
    pub fn missing_fields(&self) -> Vec<&'static str> {
        [
            ("name", &self.name),
            ("phone", &self.phone),
            ("address", &self.address),
        ]
        .into_iter()
        .filter(|(_, value)| value.trim().is_empty())
        .map(|(field, _)| field)
        .collect()
    }
}

/// A frozen snapshot of the cart at the moment of placement.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: OrderId,
    pub items: Vec<CartItem>,
    pub total: Decimal,
    pub status: OrderStatus,
    pub payment_status: PaymentStatus,
    pub payment_method: PaymentMethod,
    pub payment_reference: Option<String>,
    pub name: String,
    pub phone: String,
    pub address: String,
    pub placed_at: jiff::Timestamp,
}

impl Order {
    pub fn from_cart(items: Vec<CartItem>, info: DeliveryInfo, placed_at: jiff::Timestamp) -> Self {
        let total = items.iter().map(CartItem::line_total).sum();
        let payment_status = match info.payment_method {
            PaymentMethod::Cod => PaymentStatus::Pending,
            PaymentMethod::Upi | PaymentMethod::Card => {
                info.payment_status.unwrap_or(PaymentStatus::Pending)
            }
        };
        Self {
            id: OrderId::new(),
            items,
            total,
            status: OrderStatus::Confirmed,
            payment_status,
            payment_method: info.payment_method,
            payment_reference: info.payment_reference,
            name: info.name,
            phone: info.phone,
            address: info.address,
            placed_at,
        }
    }

    /// Distinct sellers in the order their items appear.
    pub fn farmer_ids(&self) -> Vec<FarmerId> {
        let mut farmer_ids: Vec<FarmerId> = Vec::new();
        for item in &self.items {
            if !farmer_ids.contains(&item.product.farmer_id) {
                farmer_ids.push(item.product.farmer_id.clone());
            }
        }
        farmer_ids
    }

    pub fn invoice_summary(&self) -> String {
        let mut invoice = String::new();
        // Writing into a String cannot fail.
        let _ = writeln!(invoice, "Invoice for order {}", self.id);
        let _ = writeln!(invoice, "Customer: {} ({})", self.name, self.phone);
        let _ = writeln!(invoice, "Deliver to: {}", self.address);
        let _ = writeln!(invoice, "Date: {}", self.placed_at.strftime("%Y-%m-%d"));
        let _ = writeln!(
            invoice,
            "Payment: {} ({})",
            self.payment_method, self.payment_status
        );
        for item in &self.items {
            let _ = writeln!(
                invoice,
                "{} {} x ₹{} = ₹{}",
                item.product.name,
                item.qty,
                item.product.price,
                item.line_total()
            );
        }
        let _ = write!(invoice, "Total: ₹{}", self.total);
        invoice
    }
}

/// Append-only record of placed orders.
#[derive(Debug, Clone, Default)]
pub struct OrderLedger {
    orders: Vec<Order>,
    index: HashMap<OrderId, usize>,
}

impl OrderLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn record(&mut self, order: Order) {
        self.index.insert(order.id, self.orders.len());
        self.orders.push(order);
    }

    /// Newest first.
    pub fn orders(&self) -> impl Iterator<Item = &Order> {
        self.orders.iter().rev()
    }

    pub fn get(&self, order_id: &OrderId) -> Option<&Order> {
        self.index.get(order_id).map(|&position| &self.orders[position])
    }

    pub fn len(&self) -> usize {
        self.orders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.orders.is_empty()
    }
}

//-------------------------- Tests -------------------------------
