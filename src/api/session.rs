use crate::store::{LocalStore, StoreError};

/// Store key (and cookie name) holding the bearer token.
pub const TOKEN_KEY: &str = "rod-token";

/// The caller's authentication state. Passed explicitly to the API client.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    token: Option<String>,
}

impl Session {
    pub fn anonymous() -> Self {
        Self::default()
    }

    pub fn with_token(token: impl Into<String>) -> Self {
        let token = token.into();
        if token.trim().is_empty() {
            return Self::anonymous();
        }
        Self { token: Some(token) }
    }

    pub fn restore(store: &dyn LocalStore) -> Self {
        match store.get(TOKEN_KEY) {
            Some(token) => Self::with_token(token),
            None => Self::anonymous(),
        }
    }

    pub async fn login(
        token: impl Into<String>,
        store: &dyn LocalStore,
    ) -> Result<Self, StoreError> {
        let session = Self::with_token(token);
        if let Some(token) = &session.token {
            store.set(TOKEN_KEY, token).await?;
        }
        Ok(session)
    }

    /// Clears the stored token first; the session stays signed in if that fails.
    pub async fn logout(&mut self, store: &dyn LocalStore) -> Result<(), StoreError> {
        store.remove(TOKEN_KEY).await?;
        self.token = None;
        Ok(())
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }
}
