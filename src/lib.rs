//! Storefront Rust Client Library
//!
//! A Rust client library for an e-commerce storefront REST backend,
//! providing authentication, cart state management and checkout.
//!
//! The cart is the stateful heart of the library: [`cart::CartManager`]
//! owns the current cart snapshot, keeps guest carts in a durable local
//! store, defers to the backend once a user signs in, and publishes every
//! new snapshot to subscribers.

pub mod auth;
pub mod cart;
pub mod config;
pub mod error;
pub mod fetch;
pub mod orders;
pub mod storage;

use reqwest::Client;
use std::sync::Arc;

use crate::auth::Auth;
use crate::cart::CartManager;
use crate::config::ClientOptions;
use crate::error::Error;
use crate::orders::OrdersClient;
use crate::storage::LocalStore;

/// The main entry point for the storefront Rust client
///
/// Owns the shared HTTP client, the durable local store, the auth client
/// and the cart state manager. Create one per session at application start;
/// the cart manager's lifecycle is tied to it.
pub struct Storefront {
    /// The base URL for the storefront API
    pub url: String,

    /// HTTP client used for requests
    pub http_client: Client,

    /// Durable local store for guest carts and sessions
    store: Arc<dyn LocalStore>,

    /// Auth client for user management and authentication
    auth: Arc<Auth>,

    /// Cart state manager
    cart: CartManager,

    /// Client options
    pub options: ClientOptions,
}

impl Storefront {
    /// Create a new storefront client
    ///
    /// # Arguments
    ///
    /// * `url` - The base URL of the storefront API
    /// * `store` - Durable key-value store for guest carts and sessions
    ///
    /// # Example
    ///
    /// ```
    /// use std::sync::Arc;
    /// use storefront_rust::storage::MemoryStore;
    /// use storefront_rust::Storefront;
    ///
    /// let storefront = Storefront::new("https://shop.example.com/api", Arc::new(MemoryStore::new()));
    /// ```
    pub fn new(url: &str, store: Arc<dyn LocalStore>) -> Self {
        Self::new_with_options(url, store, ClientOptions::default())
    }

    /// Create a new storefront client with custom options
    ///
    /// # Example
    ///
    /// ```
    /// use std::sync::Arc;
    /// use storefront_rust::config::ClientOptions;
    /// use storefront_rust::storage::MemoryStore;
    /// use storefront_rust::Storefront;
    ///
    /// let options = ClientOptions::default().with_persist_session(false);
    /// let storefront = Storefront::new_with_options(
    ///     "https://shop.example.com/api",
    ///     Arc::new(MemoryStore::new()),
    ///     options,
    /// );
    /// ```
    pub fn new_with_options(url: &str, store: Arc<dyn LocalStore>, options: ClientOptions) -> Self {
        let http_client = Client::new();

        let auth = Arc::new(Auth::new(
            url,
            http_client.clone(),
            store.clone(),
            options.clone(),
        ));

        let cart = CartManager::new(
            url,
            http_client.clone(),
            auth.clone(),
            store.clone(),
            options.clone(),
        );

        Self {
            url: url.to_string(),
            http_client,
            store,
            auth,
            cart,
            options,
        }
    }

    /// Restore any persisted session and load the cart
    ///
    /// Runs the once-per-session startup sequence: rehydrate the auth
    /// session from the store, then load the cart for the resulting mode.
    /// Cart operations are invalid until this has run.
    pub async fn init(&self) -> Result<(), Error> {
        self.auth.restore_session().await?;
        self.cart.load().await?;
        Ok(())
    }

    /// Get a reference to the auth client for user management and
    /// authentication
    pub fn auth(&self) -> &Auth {
        &self.auth
    }

    /// Get a reference to the cart state manager
    pub fn cart(&self) -> &CartManager {
        &self.cart
    }

    /// Create an orders client for checkout operations
    pub fn orders(&self) -> OrdersClient {
        OrdersClient::new(
            &self.url,
            self.http_client.clone(),
            self.auth.clone(),
            self.options.clone(),
        )
    }

    /// Get a reference to the durable local store
    pub fn store(&self) -> &Arc<dyn LocalStore> {
        &self.store
    }
}

/// A convenience module for common imports
pub mod prelude {
    pub use crate::cart::{Cart, CartItem, CartManager, Product};
    pub use crate::config::ClientOptions;
    pub use crate::error::Error;
    pub use crate::Storefront;
}
