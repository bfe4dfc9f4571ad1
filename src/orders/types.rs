//! Types for checkout and orders

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::cart::CartItem;

/// One checkout line: the product reference with its quantity and price
/// snapshot
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutItem {
    /// The product ID
    pub product_id: i64,

    /// Quantity ordered
    pub quantity: u32,

    /// Unit price snapshot carried over from the cart
    pub price: Decimal,
}

impl From<&CartItem> for CheckoutItem {
    fn from(item: &CartItem) -> Self {
        Self {
            product_id: item.product_id,
            quantity: item.quantity,
            price: item.price,
        }
    }
}

/// Payload for `POST /cart/checkout`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutRequest {
    /// Customer email address
    pub customer_email: String,

    /// Customer full name
    pub customer_name: String,

    /// Customer phone number
    pub customer_phone: String,

    /// Shipping address as a single display string
    pub shipping_address: String,

    /// Billing address as a single display string
    pub billing_address: String,

    /// Selected shipping method
    pub shipping_method: String,

    /// Free-form order notes
    #[serde(default)]
    pub notes: String,

    /// The lines being ordered
    pub items: Vec<CheckoutItem>,
}

impl CheckoutRequest {
    /// Build the checkout lines from cart items
    pub fn items_from(items: &[CartItem]) -> Vec<CheckoutItem> {
        items.iter().map(CheckoutItem::from).collect()
    }
}

/// Order lifecycle status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatus {
    Cart,
    Pending,
    Confirmed,
    Processing,
    Shipped,
    Delivered,
    Cancelled,
    Refunded,
}

/// Payment status of an order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentStatus {
    Pending,
    Paid,
    Failed,
    Refunded,
    PartiallyRefunded,
}

/// A line item on a placed order
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItem {
    /// The order item ID
    pub id: i64,

    /// The product ordered
    pub product_id: i64,

    /// Product name captured at order time
    #[serde(default)]
    pub product_name: String,

    /// Quantity ordered
    pub quantity: u32,

    /// Unit price at order time
    pub unit_price: Decimal,

    /// Line total
    #[serde(default)]
    pub total_price: Decimal,
}

/// A placed order
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    /// The order ID
    pub id: i64,

    /// Human-facing order number
    #[serde(default)]
    pub order_number: String,

    /// Order lifecycle status
    pub status: OrderStatus,

    /// Payment status
    #[serde(default = "default_payment_status")]
    pub payment_status: PaymentStatus,

    /// Sum of line totals
    #[serde(default)]
    pub subtotal: Decimal,

    /// Tax charged
    #[serde(default)]
    pub tax_amount: Decimal,

    /// Shipping fee charged
    #[serde(default)]
    pub shipping_amount: Decimal,

    /// Discount applied
    #[serde(default)]
    pub discount_amount: Decimal,

    /// Grand total
    #[serde(default)]
    pub total_amount: Decimal,

    /// ISO currency code
    #[serde(default)]
    pub currency: String,

    /// The ordered lines
    #[serde(default)]
    pub items: Vec<OrderItem>,
}

fn default_payment_status() -> PaymentStatus {
    PaymentStatus::Pending
}
