use super::OrderId;

#[derive(Debug, PartialEq, thiserror::Error)]
pub enum CartError {
    #[error("Order with ID {0} does not exist.")]
    OrderDoesNotExist(OrderId),
}
