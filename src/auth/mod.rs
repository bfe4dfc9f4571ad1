//! Authentication and user management for the storefront API

mod types;

use log::{info, warn};
use reqwest::Client;
use std::sync::{Arc, Mutex};

use crate::config::ClientOptions;
use crate::error::Error;
use crate::fetch::Fetch;
use crate::storage::LocalStore;

pub use types::*;

/// Store key holding the bearer token
const TOKEN_KEY: &str = "token";

/// Store key holding the serialized current user
const USER_KEY: &str = "user";

/// Client for storefront authentication
///
/// Holds the current session in memory and, when session persistence is
/// enabled, mirrors the token and user into the durable local store so a
/// restarted client can pick the session back up via [`Auth::restore_session`].
pub struct Auth {
    /// The base URL for the storefront API
    url: String,

    /// HTTP client used for requests
    client: Client,

    /// Durable store for the persisted session
    store: Arc<dyn LocalStore>,

    /// The current session
    session: Arc<Mutex<Option<Session>>>,

    /// Client options
    options: ClientOptions,
}

impl Auth {
    /// Create a new Auth client
    pub(crate) fn new(
        url: &str,
        client: Client,
        store: Arc<dyn LocalStore>,
        options: ClientOptions,
    ) -> Self {
        Self {
            url: url.to_string(),
            client,
            store,
            session: Arc::new(Mutex::new(None)),
            options,
        }
    }

    fn get_auth_url(&self, path: &str) -> String {
        format!("{}/auth{}", self.url, path)
    }

    /// Sign in with username and password
    pub async fn login(&self, request: &LoginRequest) -> Result<LoginResponse, Error> {
        let url = self.get_auth_url("/login");

        let response = Fetch::post(&self.client, &url)
            .timeout(self.options.request_timeout)
            .json(request)?
            .execute::<LoginResponse>()
            .await?;

        self.store_session(&response.token, &response.user).await?;
        info!("Signed in as {}", response.user.username);

        Ok(response)
    }

    /// Register a new account
    ///
    /// When the backend returns a token the new account is signed in
    /// immediately, mirroring the auto-login behavior of the storefront.
    pub async fn register(&self, request: &RegisterRequest) -> Result<RegisterResponse, Error> {
        let url = self.get_auth_url("/register");

        let response = Fetch::post(&self.client, &url)
            .timeout(self.options.request_timeout)
            .json(request)?
            .execute::<RegisterResponse>()
            .await?;

        if let Some(ref token) = response.token {
            self.store_session(token, &response.user).await?;
            info!("Registered and signed in as {}", response.user.username);
        }

        Ok(response)
    }

    /// Sign out the current user, notifying the backend
    pub async fn logout(&self) -> Result<(), Error> {
        let url = self.get_auth_url("/logout");

        let token = self
            .access_token()
            .ok_or_else(|| Error::auth("Not logged in"))?;

        Fetch::post(&self.client, &url)
            .timeout(self.options.request_timeout)
            .bearer_auth(&token)
            .json(&serde_json::json!({}))?
            .execute_empty()
            .await?;

        self.clear_session().await?;
        Ok(())
    }

    /// Sign out locally without a server call
    ///
    /// For cases where the backend is unreachable; the token is simply
    /// forgotten on this side.
    pub async fn logout_local(&self) -> Result<(), Error> {
        self.clear_session().await
    }

    /// Rehydrate the session from the durable store
    ///
    /// A missing token means no session. A malformed persisted user payload
    /// is discarded rather than surfaced as an error.
    pub async fn restore_session(&self) -> Result<Option<Session>, Error> {
        let token = match self.store.load(TOKEN_KEY).await? {
            Some(token) => token,
            None => return Ok(None),
        };

        let user = match self.store.load(USER_KEY).await? {
            Some(json) => match serde_json::from_str::<User>(&json) {
                Ok(user) => user,
                Err(err) => {
                    warn!("Discarding unreadable persisted user: {}", err);
                    self.store.clear(TOKEN_KEY).await?;
                    self.store.clear(USER_KEY).await?;
                    return Ok(None);
                }
            },
            None => {
                self.store.clear(TOKEN_KEY).await?;
                return Ok(None);
            }
        };

        let session = Session { token, user };

        let mut current_session = self.session.lock().unwrap();
        *current_session = Some(session.clone());

        Ok(Some(session))
    }

    /// Whether a user is currently signed in
    pub fn is_logged_in(&self) -> bool {
        self.access_token().is_some()
    }

    /// The bearer token of the current session
    pub fn access_token(&self) -> Option<String> {
        let current_session = self.session.lock().unwrap();
        current_session.as_ref().map(|session| session.token.clone())
    }

    /// The currently signed-in user
    pub fn current_user(&self) -> Option<User> {
        let current_session = self.session.lock().unwrap();
        current_session.as_ref().map(|session| session.user.clone())
    }

    /// Whether the current user holds the given role
    pub fn has_role(&self, role: &str) -> bool {
        self.current_user()
            .map(|user| user.roles.iter().any(|r| r.name == role))
            .unwrap_or(false)
    }

    /// Whether the current user holds any of the given roles
    pub fn has_any_role(&self, roles: &[&str]) -> bool {
        roles.iter().any(|role| self.has_role(role))
    }

    /// Whether the current user is an administrator
    pub fn is_admin(&self) -> bool {
        self.has_role("ADMIN")
    }

    /// Whether the current user is a seller
    pub fn is_seller(&self) -> bool {
        self.has_role("SELLER")
    }

    async fn store_session(&self, token: &str, user: &User) -> Result<(), Error> {
        if self.options.persist_session {
            self.store.save(TOKEN_KEY, token).await?;
            self.store
                .save(USER_KEY, &serde_json::to_string(user)?)
                .await?;
        }

        let mut current_session = self.session.lock().unwrap();
        *current_session = Some(Session {
            token: token.to_string(),
            user: user.clone(),
        });

        Ok(())
    }

    async fn clear_session(&self) -> Result<(), Error> {
        self.store.clear(TOKEN_KEY).await?;
        self.store.clear(USER_KEY).await?;

        let mut current_session = self.session.lock().unwrap();
        *current_session = None;

        Ok(())
    }
}
