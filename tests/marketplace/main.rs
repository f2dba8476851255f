mod catalog;
mod checkout;
mod health_check;
mod payments;
mod test_utils;
