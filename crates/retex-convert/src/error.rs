//! Errors from conversion dispatch.
//!
//! Failures are scoped to a single texture slot; [`dispatch_all`]
//! isolates them so one slot never aborts its siblings.
//!
//! [`dispatch_all`]: crate::dispatch::dispatch_all

use retex_import::{ChannelRole, RetrieveError};
use thiserror::Error;

use crate::pack::PackError;
use crate::store::StoreError;

/// Error converting one texture slot.
#[derive(Debug, Error)]
pub enum ConvertError {
    /// A non-recombined texture has no primary byte source. Reserved
    /// for the passthrough path; the recombination path substitutes
    /// defaults for absent channels instead.
    #[error("no primary byte source for texture '{0}'")]
    MissingPrimaryChannel(String),

    /// A channel handle failed while fetching its bytes.
    #[error("retrieval failed for {role} channel of '{name}': {source}")]
    Retrieval {
        /// Canonical name of the texture slot.
        name: String,
        /// Which channel's handle failed.
        role: ChannelRole,
        /// The underlying retrieval failure.
        #[source]
        source: RetrieveError,
    },

    /// Channel recombination failed.
    #[error("channel packing failed for '{name}': {source}")]
    Pack {
        /// Canonical name of the texture slot.
        name: String,
        /// The underlying packing failure.
        #[source]
        source: PackError,
    },

    /// Writing the converted bytes failed.
    #[error("failed to store output for '{name}': {source}")]
    Store {
        /// Canonical name of the texture slot.
        name: String,
        /// The underlying store failure.
        #[source]
        source: StoreError,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_primary_display() {
        let err = ConvertError::MissingPrimaryChannel("albedo".to_string());
        assert_eq!(err.to_string(), "no primary byte source for texture 'albedo'");
    }

    #[test]
    fn test_retrieval_names_the_channel() {
        let err = ConvertError::Retrieval {
            name: "metal".to_string(),
            role: ChannelRole::Roughness,
            source: RetrieveError::Decode("bad payload".to_string()),
        };
        let message = err.to_string();
        assert!(message.contains("roughness"));
        assert!(message.contains("metal"));
    }
}
