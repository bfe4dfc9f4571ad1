//! Configuration options for the storefront client

use rust_decimal::Decimal;
use std::time::Duration;

/// Configuration options for the storefront client
#[derive(Debug, Clone)]
pub struct ClientOptions {
    /// The request timeout
    pub request_timeout: Option<Duration>,

    /// Whether to persist the auth session to the local store
    pub persist_session: bool,

    /// Tax rate applied to the subtotal when totals are computed client-side
    pub tax_rate: Decimal,

    /// Subtotal above which shipping is free
    pub free_shipping_threshold: Decimal,

    /// Flat shipping fee charged below the free-shipping threshold
    pub flat_shipping_fee: Decimal,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            request_timeout: Some(Duration::from_secs(30)),
            persist_session: true,
            // 10% tax, free shipping over 1,000,000 VND, 50,000 VND flat fee
            tax_rate: Decimal::new(10, 2),
            free_shipping_threshold: Decimal::from(1_000_000),
            flat_shipping_fee: Decimal::from(50_000),
        }
    }
}

impl ClientOptions {
    /// Set the request timeout
    pub fn with_request_timeout(mut self, value: Option<Duration>) -> Self {
        self.request_timeout = value;
        self
    }

    /// Set whether to persist the auth session
    pub fn with_persist_session(mut self, value: bool) -> Self {
        self.persist_session = value;
        self
    }

    /// Set the tax rate
    pub fn with_tax_rate(mut self, value: Decimal) -> Self {
        self.tax_rate = value;
        self
    }

    /// Set the free-shipping threshold
    pub fn with_free_shipping_threshold(mut self, value: Decimal) -> Self {
        self.free_shipping_threshold = value;
        self
    }

    /// Set the flat shipping fee
    pub fn with_flat_shipping_fee(mut self, value: Decimal) -> Self {
        self.flat_shipping_fee = value;
        self
    }
}
