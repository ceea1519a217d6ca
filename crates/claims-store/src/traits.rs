//! Trait for claim storage backends.
//!
//! The HTTP layer talks to [`ClaimLog`] so it can be driven by the file-backed
//! [`ClaimStore`](crate::ClaimStore) in production and by test doubles in tests.

use crate::error::Result;
use crate::types::{Claim, ClaimFields, ClaimId};

/// Operations every claim backend provides.
pub trait ClaimLog: Send + Sync {
    /// Returns every stored claim in storage order.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing storage cannot be read.
    fn list(&self) -> Result<Vec<Claim>>;

    /// Returns the first stored claim with the given id.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing storage cannot be read.
    fn get(&self, id: ClaimId) -> Result<Option<Claim>> {
        Ok(self.list()?.into_iter().find(|claim| claim.id == id))
    }

    /// Stores a new claim and returns it with its assigned id.
    ///
    /// # Errors
    ///
    /// Returns an error if the fields are invalid or the write fails.
    fn append(&self, fields: ClaimFields) -> Result<Claim>;

    /// Replaces the fields of the claim with the given id, keeping its id.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`](crate::StoreError::NotFound) if no
    /// claim has the id.
    fn update_by_id(&self, id: ClaimId, fields: ClaimFields) -> Result<Claim>;

    /// Removes every claim with the given id.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`](crate::StoreError::NotFound) if no
    /// claim has the id.
    fn delete_by_id(&self, id: ClaimId) -> Result<()>;
}
