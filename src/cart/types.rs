//! Wire types for the cart endpoints

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Catalog product snapshot
///
/// Guest carts embed a denormalized copy of the product at add-time so the
/// cart view can render without re-reading the catalog. Only the fields the
/// cart needs are modeled here; the catalog itself is a separate service.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    /// The product ID
    pub id: i64,

    /// The SKU-like product code
    #[serde(default)]
    pub product_code: String,

    /// The product name
    #[serde(default)]
    pub name: String,

    /// List price
    pub price: Decimal,

    /// Sale price, when the product is discounted
    #[serde(default)]
    pub sale_price: Option<Decimal>,

    /// Size variant tag
    #[serde(default)]
    pub size: Option<String>,

    /// URL of the primary product image
    #[serde(default)]
    pub image_url: Option<String>,
}

impl Product {
    /// The price a new cart item snapshots: sale price if present, list
    /// price otherwise
    pub fn unit_price(&self) -> Decimal {
        self.sale_price.unwrap_or(self.price)
    }
}

/// A single cart line item
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartItem {
    /// The item ID
    pub id: i64,

    /// The owning user, 0 for guest items
    #[serde(default)]
    pub user_id: i64,

    /// The product this line refers to
    pub product_id: i64,

    /// Denormalized product snapshot, when available
    #[serde(default)]
    pub product: Option<Product>,

    /// Quantity, always at least 1
    pub quantity: u32,

    /// Unit price snapshot taken when the item was added
    pub price: Decimal,

    /// Size variant tag
    #[serde(default)]
    pub size: Option<String>,

    /// Creation time, unix milliseconds
    #[serde(default)]
    pub created_at: i64,

    /// Last update time, unix milliseconds
    #[serde(default)]
    pub updated_at: i64,
}

/// The cart: line items plus aggregates derived from them
///
/// Aggregates are recomputed before every publish in local mode and taken
/// verbatim from the backend in remote mode; a `Cart` value is never
/// partially updated. Every field defaults so a sparse backend payload still
/// parses into a well-formed cart.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Cart {
    /// The line items, in insertion order
    #[serde(default)]
    pub items: Vec<CartItem>,

    /// Sum of all item quantities
    #[serde(default)]
    pub total_items: u32,

    /// Sum of price times quantity over all items
    #[serde(default)]
    pub subtotal: Decimal,

    /// Tax charged on the subtotal
    #[serde(default)]
    pub tax_amount: Decimal,

    /// Shipping fee
    #[serde(default)]
    pub shipping_amount: Decimal,

    /// Discount applied by coupons
    #[serde(default)]
    pub discount_amount: Decimal,

    /// Grand total: subtotal + tax + shipping - discount
    #[serde(default)]
    pub total_amount: Decimal,
}

impl Cart {
    /// Whether the cart has no items
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Payload for `POST /cart/items`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct AddItemRequest {
    pub product_id: i64,
    pub quantity: u32,
    pub price: Decimal,
}

/// Payload for `PUT /cart/items/{id}`
///
/// Price and product ID ride along so the backend can reconcile the line
/// against the catalog.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct UpdateItemRequest {
    pub quantity: u32,
    pub price: Decimal,
    pub product_id: i64,
}

/// Payload for `POST /cart/migrate`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct MigrateRequest {
    pub items: Vec<CartItem>,
}

/// Payload for `POST /cart/coupon`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct CouponRequest {
    pub coupon_code: String,
}
