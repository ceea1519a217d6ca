//! # claims-store
//!
//! Claim records persisted as one line per claim in a single text file.
//!
//! This crate provides:
//!
//! - [`Claim`] / [`ClaimFields`] — The stored record and its caller-supplied part
//! - [`LineCodec`] — Line formats: [`LegacyLineCodec`] and [`JsonLineCodec`]
//! - [`ClaimStore`] — File-backed store with list, append, update and delete
//! - [`ClaimLog`] — Abstract trait over claim backends
//! - [`StoreConfig`] — Store file, line format and id assignment
//!
//! ## Example
//!
//! ```rust,no_run
//! use claims_store::{ClaimFields, ClaimStore};
//!
//! # fn main() -> claims_store::Result<()> {
//! let store = ClaimStore::open("claims.log")?;
//!
//! let claim = store.append(ClaimFields::new("2024-01-01", "Auto", "Fender dent"))?;
//! store.update_by_id(
//!     claim.id,
//!     ClaimFields::new("2024-01-02", "Auto", "Fender dent repaired"),
//! )?;
//!
//! for claim in store.list()? {
//!     println!("{}: {}", claim.id, claim.description);
//! }
//!
//! store.delete_by_id(claim.id)?;
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod codec;
pub mod config;
pub mod error;
pub mod store;
pub mod traits;
pub mod types;

// Re-export main types
pub use codec::{JsonLineCodec, LegacyLineCodec, LineCodec, LineFormat};
pub use config::{IdStrategy, StoreConfig, DEFAULT_ID_RANGE, DEFAULT_STORE_PATH};
pub use error::{Result, StoreError};
pub use store::ClaimStore;
pub use traits::ClaimLog;
pub use types::{Claim, ClaimFields, ClaimId};
