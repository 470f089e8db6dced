//! Session gate.
//!
//! Access to protected views hinges on a single token slot in a transient
//! store: present means signed in. Dropping the store (closing the tab)
//! signs the user out.

use thiserror::Error;
use tracing::{info, warn};

use crate::config::DemoCredentials;
use crate::store::{KeyValueStore, MemoryStore, StoreError};

/// Slot holding the session token.
pub const TOKEN_KEY: &str = "token";

#[derive(Error, Debug)]
pub enum AuthError {
    #[error("Email and password are required")]
    MissingFields,

    #[error("Invalid email or password")]
    InvalidCredentials,

    #[error("Session storage error: {0}")]
    Store(#[from] StoreError),
}

pub type AuthResult<T> = Result<T, AuthError>;

pub struct SessionGate<S: KeyValueStore = MemoryStore> {
    store: S,
}

impl SessionGate<MemoryStore> {
    /// Gate backed by a fresh in-memory session store.
    pub fn in_memory() -> Self {
        Self::new(MemoryStore::new())
    }
}

impl<S: KeyValueStore> SessionGate<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// True while a token is stored. Storage failures count as signed out.
    pub fn is_authenticated(&self) -> bool {
        match self.store.get(TOKEN_KEY) {
            Ok(token) => token.is_some_and(|t| !t.is_empty()),
            Err(e) => {
                warn!(error = %e, "failed to read session token");
                false
            }
        }
    }

    /// Current token, if signed in.
    pub fn token(&self) -> AuthResult<Option<String>> {
        Ok(self.store.get(TOKEN_KEY)?)
    }

    /// Check the credentials and, on success, store and return a fresh token.
    pub fn login(
        &self,
        email: &str,
        password: &str,
        credentials: &DemoCredentials,
    ) -> AuthResult<String> {
        let email = email.trim();
        if email.is_empty() || password.is_empty() {
            return Err(AuthError::MissingFields);
        }
        if !credentials.matches(email, password) {
            warn!(email, "login rejected");
            return Err(AuthError::InvalidCredentials);
        }

        let token = uuid::Uuid::new_v4().to_string();
        self.store.set(TOKEN_KEY, &token)?;
        info!(email, "signed in");
        Ok(token)
    }

    pub fn logout(&self) -> AuthResult<()> {
        self.store.remove(TOKEN_KEY)?;
        info!("signed out");
        Ok(())
    }
}
