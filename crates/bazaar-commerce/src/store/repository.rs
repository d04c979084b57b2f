//! Durable store state keyed by session.

use crate::error::CommerceError;
use crate::money::Currency;
use crate::store::LineItemStore;
use bazaar_cache::{Cache, SessionId, SessionStore};

/// Loads and saves a [`LineItemStore`] per shopper session.
pub struct StoreRepository {
    sessions: SessionStore<LineItemStore>,
    currency: Currency,
}

impl StoreRepository {
    pub fn new(cache: Cache, currency: Currency) -> Self {
        Self {
            sessions: SessionStore::new(cache),
            currency,
        }
    }

    /// The session's store, or an empty one in the repository currency.
    pub fn load(&self, session: &SessionId) -> Result<LineItemStore, CommerceError> {
        Ok(self
            .sessions
            .get(session)?
            .unwrap_or_else(|| LineItemStore::new(self.currency)))
    }

    pub fn save(&self, session: &SessionId, store: &LineItemStore) -> Result<(), CommerceError> {
        self.sessions.set(session, store)?;
        tracing::debug!(session = %session, revision = store.revision(), "store saved");
        Ok(())
    }

    /// Load, mutate and save in one step.
    ///
    /// The write is version checked: if another writer saved the session in
    /// the meantime, `f` runs again on the newer store. Nothing is saved when
    /// `f` fails.
    pub fn modify<R>(
        &self,
        session: &SessionId,
        f: impl FnMut(&mut LineItemStore) -> Result<R, CommerceError>,
    ) -> Result<R, CommerceError> {
        let currency = self.currency;
        let (store, result) =
            self.sessions
                .try_update(session, || LineItemStore::new(currency), f)?;
        tracing::debug!(session = %session, revision = store.revision(), "store saved");
        Ok(result)
    }

    /// Forget the session's store.
    pub fn discard(&self, session: &SessionId) -> Result<(), CommerceError> {
        Ok(self.sessions.delete(session)?)
    }
}
