//! Cart state management
//!
//! [`CartManager`] is the single source of truth for the current cart. Every
//! mutation goes through one of its operations, which talk to the backing
//! store for the current session mode, recompute aggregates where needed and
//! publish the resulting snapshot to all subscribers.
//!
//! Anonymous sessions keep the cart in the durable local store and price it
//! client-side; once a user signs in the backend owns the cart and its
//! numbers are taken verbatim. [`CartManager::migrate_guest_cart_to_server`]
//! bridges the two on login.

mod totals;
mod types;

use log::{info, warn};
use reqwest::Client;
use rust_decimal::Decimal;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, RwLock};
use std::time::{SystemTime, UNIX_EPOCH};
use tokio::sync::{broadcast, Mutex};

use crate::auth::Auth;
use crate::config::ClientOptions;
use crate::error::Error;
use crate::fetch::Fetch;
use crate::storage::LocalStore;

pub use totals::{calculate_totals, format_amount};
pub use types::*;

/// Store key holding the serialized guest cart
const GUEST_CART_KEY: &str = "guest_cart";

/// State container for the session's cart
///
/// Holds exactly one current [`Cart`] value and broadcasts every new
/// snapshot in mutation order. Mutations are serialized through an internal
/// lock, so two concurrent operations cannot interleave their round trips
/// and publish out of order.
pub struct CartManager {
    /// The base URL for the storefront API
    url: String,

    /// HTTP client used for requests
    client: Client,

    /// Auth client; a present token switches operations to remote mode
    auth: Arc<Auth>,

    /// Durable store for the guest cart
    store: Arc<dyn LocalStore>,

    /// Client options, including the pricing policy
    options: ClientOptions,

    /// The current cart snapshot
    cart: RwLock<Cart>,

    /// Broadcasts each published snapshot to subscribers
    changes: broadcast::Sender<Cart>,

    /// Set once `load` has run; operations are invalid before that
    ready: AtomicBool,

    /// Serializes mutating operations
    op_lock: Mutex<()>,
}

fn now_millis() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as i64
}

/// Timestamp-flavored id that stays unique even when two items are added
/// within the same millisecond
fn next_item_id(items: &[CartItem]) -> i64 {
    let max = items.iter().map(|item| item.id).max().unwrap_or(0);
    now_millis().max(max + 1)
}

impl CartManager {
    /// Create a new CartManager
    pub(crate) fn new(
        url: &str,
        client: Client,
        auth: Arc<Auth>,
        store: Arc<dyn LocalStore>,
        options: ClientOptions,
    ) -> Self {
        let (changes, _) = broadcast::channel(16);

        Self {
            url: url.to_string(),
            client,
            auth,
            store,
            options,
            cart: RwLock::new(Cart::default()),
            changes,
            ready: AtomicBool::new(false),
            op_lock: Mutex::new(()),
        }
    }

    fn get_cart_url(&self, path: &str) -> String {
        format!("{}/cart{}", self.url, path)
    }

    /// Load the cart for the current session
    ///
    /// Remote mode fetches the server cart, falling back to an empty cart if
    /// the request fails. Local mode rehydrates the guest cart from the
    /// durable store; a missing or malformed payload also yields an empty
    /// cart. Operations become valid once this has run.
    pub async fn load(&self) -> Result<Cart, Error> {
        let _guard = self.op_lock.lock().await;

        let cart = if self.auth.is_logged_in() {
            match self.fetch_remote_cart().await {
                Ok(cart) => cart,
                Err(err) => {
                    warn!("Failed to load cart from backend: {}", err);
                    Cart::default()
                }
            }
        } else {
            self.load_guest_cart().await
        };

        self.ready.store(true, Ordering::SeqCst);
        Ok(self.publish(cart))
    }

    /// Add a product to the cart
    ///
    /// An existing line for the same product is incremented instead of
    /// duplicated. The unit price is snapshotted at add time: the sale price
    /// when the product has one, the list price otherwise.
    pub async fn add_to_cart(&self, product: &Product, quantity: u32) -> Result<Cart, Error> {
        self.ensure_ready()?;
        if quantity < 1 {
            return Err(Error::cart("quantity must be at least 1"));
        }

        let _guard = self.op_lock.lock().await;

        if self.auth.is_logged_in() {
            let payload = AddItemRequest {
                product_id: product.id,
                quantity,
                price: product.unit_price(),
            };

            let url = self.get_cart_url("/items");
            let result = Fetch::post(&self.client, &url)
                .maybe_bearer_auth(self.auth.access_token().as_deref())
                .timeout(self.options.request_timeout)
                .json(&payload)?
                .execute::<Cart>()
                .await;

            match result {
                Ok(cart) => {
                    info!("Added {} to cart", product.name);
                    Ok(self.publish(cart))
                }
                Err(err) => {
                    warn!("Failed to add item to cart: {}", err);
                    Err(err)
                }
            }
        } else {
            let mut items = self.current().items;

            let next_id = next_item_id(&items);
            match items.iter_mut().find(|item| item.product_id == product.id) {
                Some(existing) => existing.quantity += quantity,
                None => items.push(CartItem {
                    id: next_id,
                    user_id: 0,
                    product_id: product.id,
                    product: Some(product.clone()),
                    quantity,
                    price: product.unit_price(),
                    size: product.size.clone(),
                    created_at: now_millis(),
                    updated_at: now_millis(),
                }),
            }

            let cart = calculate_totals(items, &self.options);
            self.save_guest_cart(&cart).await?;
            info!("Added {} to cart", product.name);
            Ok(self.publish(cart))
        }
    }

    /// Set the quantity of a cart item
    ///
    /// Quantities below 1 are rejected; removing an item goes through
    /// [`CartManager::remove_from_cart`] instead.
    pub async fn update_cart_item(&self, item_id: i64, quantity: u32) -> Result<Cart, Error> {
        self.ensure_ready()?;
        if quantity < 1 {
            return Err(Error::cart("quantity must be at least 1"));
        }

        let _guard = self.op_lock.lock().await;

        if self.auth.is_logged_in() {
            // Price and product ID ride along for backend reconciliation
            let item = self
                .current()
                .items
                .into_iter()
                .find(|item| item.id == item_id)
                .ok_or_else(|| Error::cart(format!("no cart item with id {}", item_id)))?;

            let payload = UpdateItemRequest {
                quantity,
                price: item.price,
                product_id: item.product_id,
            };

            let url = self.get_cart_url(&format!("/items/{}", item_id));
            let result = Fetch::put(&self.client, &url)
                .maybe_bearer_auth(self.auth.access_token().as_deref())
                .timeout(self.options.request_timeout)
                .json(&payload)?
                .execute::<Cart>()
                .await;

            match result {
                Ok(cart) => {
                    info!("Cart updated");
                    Ok(self.publish(cart))
                }
                Err(err) => {
                    warn!("Failed to update cart: {}", err);
                    Err(err)
                }
            }
        } else {
            let mut items = self.current().items;

            if let Some(item) = items.iter_mut().find(|item| item.id == item_id) {
                item.quantity = quantity;
                item.updated_at = now_millis();
            }

            let cart = calculate_totals(items, &self.options);
            self.save_guest_cart(&cart).await?;
            Ok(self.publish(cart))
        }
    }

    /// Remove an item from the cart
    pub async fn remove_from_cart(&self, item_id: i64) -> Result<Cart, Error> {
        self.ensure_ready()?;
        let _guard = self.op_lock.lock().await;

        if self.auth.is_logged_in() {
            let url = self.get_cart_url(&format!("/items/{}", item_id));
            let result = Fetch::delete(&self.client, &url)
                .maybe_bearer_auth(self.auth.access_token().as_deref())
                .timeout(self.options.request_timeout)
                .execute::<Cart>()
                .await;

            match result {
                Ok(cart) => {
                    info!("Item removed from cart");
                    self.publish(cart);

                    // Follow up with a full reload so the published state
                    // matches whatever the backend settled on
                    match self.fetch_remote_cart().await {
                        Ok(cart) => Ok(self.publish(cart)),
                        Err(err) => {
                            warn!("Failed to reload cart after removal: {}", err);
                            Ok(self.current())
                        }
                    }
                }
                Err(err) => {
                    warn!("Failed to remove item from cart: {}", err);
                    Err(err)
                }
            }
        } else {
            let mut items = self.current().items;
            items.retain(|item| item.id != item_id);

            let cart = calculate_totals(items, &self.options);
            self.save_guest_cart(&cart).await?;
            info!("Item removed from cart");
            Ok(self.publish(cart))
        }
    }

    /// Remove every item from the cart
    pub async fn clear_cart(&self) -> Result<Cart, Error> {
        self.ensure_ready()?;
        let _guard = self.op_lock.lock().await;

        if self.auth.is_logged_in() {
            let url = self.get_cart_url("");
            let result = Fetch::delete(&self.client, &url)
                .maybe_bearer_auth(self.auth.access_token().as_deref())
                .timeout(self.options.request_timeout)
                .execute::<Cart>()
                .await;

            match result {
                Ok(cart) => {
                    info!("Cart cleared");
                    Ok(self.publish(cart))
                }
                Err(err) => {
                    warn!("Failed to clear cart: {}", err);
                    Err(err)
                }
            }
        } else {
            let cart = Cart::default();
            self.save_guest_cart(&cart).await?;
            info!("Cart cleared");
            Ok(self.publish(cart))
        }
    }

    /// Transfer the guest cart to the signed-in user's server cart
    ///
    /// Meant to run once, right after authentication and before any further
    /// remote mutation, so guest items are not lost. A failed migration
    /// leaves the guest cart in the durable store untouched and can simply
    /// be retried.
    pub async fn migrate_guest_cart_to_server(&self) -> Result<Cart, Error> {
        self.ensure_ready()?;
        let _guard = self.op_lock.lock().await;

        let guest_cart = self.load_guest_cart().await;
        if guest_cart.items.is_empty() {
            return Ok(Cart::default());
        }

        let item_count = guest_cart.items.len();
        let payload = MigrateRequest {
            items: guest_cart.items,
        };

        let url = self.get_cart_url("/migrate");
        let result = Fetch::post(&self.client, &url)
            .maybe_bearer_auth(self.auth.access_token().as_deref())
            .timeout(self.options.request_timeout)
            .json(&payload)?
            .execute::<Cart>()
            .await;

        match result {
            Ok(cart) => {
                self.store.clear(GUEST_CART_KEY).await?;
                info!("Migrated {} guest cart items to server", item_count);
                Ok(self.publish(cart))
            }
            Err(err) => {
                // Guest cart stays in the store so migration can be retried
                warn!("Guest cart migration failed: {}", err);
                Err(err)
            }
        }
    }

    /// Apply a coupon code to the server cart
    pub async fn apply_coupon(&self, coupon_code: &str) -> Result<Cart, Error> {
        self.ensure_ready()?;
        let _guard = self.op_lock.lock().await;

        let payload = CouponRequest {
            coupon_code: coupon_code.to_string(),
        };

        let url = self.get_cart_url("/coupon");
        let result = Fetch::post(&self.client, &url)
            .maybe_bearer_auth(self.auth.access_token().as_deref())
            .timeout(self.options.request_timeout)
            .json(&payload)?
            .execute::<Cart>()
            .await;

        match result {
            Ok(cart) => {
                info!("Coupon applied");
                Ok(self.publish(cart))
            }
            Err(err) => {
                warn!("Failed to apply coupon: {}", err);
                Err(err)
            }
        }
    }

    /// Remove the applied coupon from the server cart
    pub async fn remove_coupon(&self) -> Result<Cart, Error> {
        self.ensure_ready()?;
        let _guard = self.op_lock.lock().await;

        let url = self.get_cart_url("/coupon");
        let result = Fetch::delete(&self.client, &url)
            .maybe_bearer_auth(self.auth.access_token().as_deref())
            .timeout(self.options.request_timeout)
            .execute::<Cart>()
            .await;

        match result {
            Ok(cart) => {
                info!("Coupon removed");
                Ok(self.publish(cart))
            }
            Err(err) => {
                warn!("Failed to remove coupon: {}", err);
                Err(err)
            }
        }
    }

    /// The current cart snapshot
    pub fn current(&self) -> Cart {
        self.cart.read().unwrap().clone()
    }

    /// Subscribe to cart snapshots
    ///
    /// Each published snapshot is delivered in mutation order. The receiver
    /// only sees snapshots published after subscribing; pair with
    /// [`CartManager::current`] for the starting value.
    pub fn on_change(&self) -> broadcast::Receiver<Cart> {
        self.changes.subscribe()
    }

    /// The current items, a read-only view derived from the cart snapshot
    pub fn items(&self) -> Vec<CartItem> {
        self.current().items
    }

    /// Total number of units in the cart
    pub fn item_count(&self) -> u32 {
        self.current().total_items
    }

    /// Whether the cart has no items
    pub fn is_empty(&self) -> bool {
        self.current().is_empty()
    }

    /// Whether the cart contains the given product
    pub fn is_product_in_cart(&self, product_id: i64) -> bool {
        self.current()
            .items
            .iter()
            .any(|item| item.product_id == product_id)
    }

    /// The cart item for the given product, if present
    pub fn item_by_product(&self, product_id: i64) -> Option<CartItem> {
        self.current()
            .items
            .into_iter()
            .find(|item| item.product_id == product_id)
    }

    /// The current subtotal
    pub fn subtotal(&self) -> Decimal {
        self.current().subtotal
    }

    /// The current tax amount
    pub fn tax_amount(&self) -> Decimal {
        self.current().tax_amount
    }

    /// The current shipping amount
    pub fn shipping_amount(&self) -> Decimal {
        self.current().shipping_amount
    }

    /// The current discount amount
    pub fn discount_amount(&self) -> Decimal {
        self.current().discount_amount
    }

    /// The current grand total
    pub fn total(&self) -> Decimal {
        self.current().total_amount
    }

    /// Whether the current cart ships free
    pub fn is_free_shipping(&self) -> bool {
        self.current().shipping_amount == Decimal::ZERO
    }

    /// How much more the subtotal needs to reach free shipping
    pub fn amount_for_free_shipping(&self) -> Decimal {
        let remaining = self.options.free_shipping_threshold - self.current().subtotal;
        remaining.max(Decimal::ZERO)
    }

    fn ensure_ready(&self) -> Result<(), Error> {
        if self.ready.load(Ordering::SeqCst) {
            Ok(())
        } else {
            Err(Error::cart("cart has not been loaded"))
        }
    }

    fn publish(&self, cart: Cart) -> Cart {
        {
            let mut current = self.cart.write().unwrap();
            *current = cart.clone();
        }

        // No receivers is fine; subscribers come and go
        let _ = self.changes.send(cart.clone());

        cart
    }

    async fn fetch_remote_cart(&self) -> Result<Cart, Error> {
        let url = self.get_cart_url("");
        Fetch::get(&self.client, &url)
            .maybe_bearer_auth(self.auth.access_token().as_deref())
            .timeout(self.options.request_timeout)
            .execute::<Cart>()
            .await
    }

    async fn load_guest_cart(&self) -> Cart {
        let json = match self.store.load(GUEST_CART_KEY).await {
            Ok(Some(json)) => json,
            Ok(None) => return Cart::default(),
            Err(err) => {
                warn!("Failed to read guest cart from store: {}", err);
                return Cart::default();
            }
        };

        match serde_json::from_str::<Cart>(&json) {
            Ok(cart) => cart,
            Err(err) => {
                warn!("Discarding unreadable guest cart: {}", err);
                Cart::default()
            }
        }
    }

    async fn save_guest_cart(&self, cart: &Cart) -> Result<(), Error> {
        let json = serde_json::to_string(cart)?;
        self.store.save(GUEST_CART_KEY, &json).await
    }
}
