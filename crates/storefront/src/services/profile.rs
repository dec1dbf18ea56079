//! Customer profile persistence.
//!
//! Profiles accumulate whatever the customer chooses to save: each save is
//! a field-wise merge of the update over the stored record, so saving a new
//! display name never clobbers a stored phone number.

use std::sync::Arc;

use thiserror::Error;
use tracing::instrument;

use emberwick_core::{AccountId, CustomerProfile, ProfileUpdate};

use crate::stores::{ProfileStore, StoreError};

/// Errors that can occur during profile operations.
#[derive(Debug, Error)]
pub enum ProfileError {
    /// The profile store failed.
    #[error("profile store error: {0}")]
    Store(#[from] StoreError),
}

/// Profile service over the per-account profile store.
#[derive(Clone)]
pub struct ProfileService {
    profiles: Arc<dyn ProfileStore>,
}

impl ProfileService {
    /// Create a profile service.
    #[must_use]
    pub fn new(profiles: Arc<dyn ProfileStore>) -> Self {
        Self { profiles }
    }

    /// Load the stored profile for `account`, if any.
    ///
    /// # Errors
    ///
    /// Returns a store error if the read fails.
    pub async fn load(&self, account: &AccountId) -> Result<Option<CustomerProfile>, ProfileError> {
        Ok(self.profiles.get(account).await?)
    }

    /// Merge `update` into the stored profile and save the result.
    ///
    /// Starts from an empty profile when none is stored yet. Returns the
    /// profile as written (the store stamps `updated_at` on its copy).
    ///
    /// # Errors
    ///
    /// Returns a store error if the read or write fails.
    #[instrument(skip(self, update))]
    pub async fn save(
        &self,
        account: &AccountId,
        update: ProfileUpdate,
    ) -> Result<CustomerProfile, ProfileError> {
        let mut profile = self.profiles.get(account).await?.unwrap_or_default();
        profile.apply(update);
        self.profiles.put(account, &profile).await?;
        Ok(profile)
    }
}
