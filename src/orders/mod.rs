//! Checkout against the storefront order endpoint

mod types;

use log::{info, warn};
use reqwest::Client;
use std::sync::Arc;

use crate::auth::Auth;
use crate::config::ClientOptions;
use crate::error::Error;
use crate::fetch::Fetch;

pub use types::*;

/// Client for placing orders
pub struct OrdersClient {
    /// The base URL for the storefront API
    url: String,

    /// HTTP client used for requests
    client: Client,

    /// Auth client providing the bearer token
    auth: Arc<Auth>,

    /// Client options
    options: ClientOptions,
}

impl OrdersClient {
    /// Create a new OrdersClient
    pub(crate) fn new(
        url: &str,
        client: Client,
        auth: Arc<Auth>,
        options: ClientOptions,
    ) -> Self {
        Self {
            url: url.to_string(),
            client,
            auth,
            options,
        }
    }

    /// Place an order for the given checkout payload
    ///
    /// Clearing the cart after a successful order is left to the caller,
    /// which typically wants to navigate away first.
    pub async fn place_order(&self, request: &CheckoutRequest) -> Result<Order, Error> {
        let url = format!("{}/cart/checkout", self.url);

        let result = Fetch::post(&self.client, &url)
            .maybe_bearer_auth(self.auth.access_token().as_deref())
            .timeout(self.options.request_timeout)
            .json(request)?
            .execute::<Order>()
            .await;

        match result {
            Ok(order) => {
                info!("Order {} placed", order.order_number);
                Ok(order)
            }
            Err(err) => {
                warn!("Failed to place order: {}", err);
                Err(err)
            }
        }
    }
}
