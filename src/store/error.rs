//! Store error types.

use derive_more::{Display, Error};

/// Failure of a document-store operation.
///
/// All store failures are recoverable; retry policy belongs to the caller,
/// not the store.
#[derive(Debug, Clone, PartialEq, Eq, Display, Error)]
pub enum StoreError {
    /// A document already exists at the key.
    #[display("key '{key}' already exists")]
    KeyExists {
        /// Conflicting key.
        key: String,
    },

    /// No document at the key.
    #[display("key '{key}' not found")]
    Missing {
        /// Key that failed to resolve.
        key: String,
    },
}
