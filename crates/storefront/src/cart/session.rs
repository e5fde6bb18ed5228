//! Session-backed key-value store.
//!
//! The session cookie identifies the visitor; values live in the session
//! store configured in [`crate::middleware::create_session_layer`].

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use tower_sessions::Session;

use super::{CartStore, KeyValueStore, StorageError};

/// A [`KeyValueStore`] over the visitor's `tower-sessions` session.
#[derive(Debug, Clone)]
pub struct SessionStorage {
    session: Session,
}

impl SessionStorage {
    #[must_use]
    pub const fn new(session: Session) -> Self {
        Self { session }
    }
}

impl KeyValueStore for SessionStorage {
    async fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.session.get::<String>(key).await?)
    }

    async fn set_item(&self, key: &str, value: String) -> Result<(), StorageError> {
        Ok(self.session.insert(key, value).await?)
    }
}

/// Extract the visitor's cart store straight from a request.
impl<St> FromRequestParts<St> for CartStore<SessionStorage>
where
    St: Send + Sync,
{
    type Rejection = <Session as FromRequestParts<St>>::Rejection;

    async fn from_request_parts(parts: &mut Parts, state: &St) -> Result<Self, Self::Rejection> {
        let session = Session::from_request_parts(parts, state).await?;
        Ok(Self::new(SessionStorage::new(session)))
    }
}
