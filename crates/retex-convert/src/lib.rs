//! ReTex Conversion Dispatch
//!
//! Consumes the descriptors planned by `retex-import`: fetches channel
//! bytes through their deferred handles, recombines packed PBR maps,
//! and writes results through an atomic texture store.
//!
//! # Overview
//!
//! - [`dispatch`]: converts one descriptor — passthrough for
//!   non-recombined types, concurrent fetch + ORM packing for the
//!   packed/standard type.
//! - [`dispatch_all`]: converts a batch with per-slot failure
//!   isolation.
//! - [`pack::recombine`]: the packing stage's input contract — up to
//!   six optional raw buffers plus the two factors, one PNG out.
//! - [`TextureStore`]: where converted bytes end up; the directory
//!   store persists atomically so no partial output is ever visible.
//!
//! # Example
//!
//! ```
//! use retex_convert::{dispatch, ChannelFailurePolicy};
//! use retex_import::{
//!     resolve_addressing, ByteSource, SourceAddressing, TextureImportDescriptor,
//!     TextureImportType,
//! };
//!
//! # fn main() {
//! # let rt = tokio::runtime::Builder::new_current_thread().build().unwrap();
//! # rt.block_on(async {
//! let addressing = resolve_addressing(&SourceAddressing::named("albedo")).unwrap();
//! let descriptor = TextureImportDescriptor::builder(addressing, TextureImportType::Srgb)
//!     .primary(ByteSource::from_bytes(vec![1, 2, 3]))
//!     .build();
//!
//! let converted = dispatch(&descriptor, ChannelFailurePolicy::default())
//!     .await
//!     .unwrap();
//! assert_eq!(converted.file_name, "albedo.png");
//! assert_eq!(converted.bytes, vec![1, 2, 3]);
//! # });
//! # }
//! ```

pub mod dispatch;
pub mod error;
pub mod pack;
pub mod store;

// Re-export commonly used types at the crate root
pub use dispatch::{
    dispatch, dispatch_all, ChannelFailurePolicy, ConvertedTexture, SlotResult,
};
pub use error::ConvertError;
pub use pack::{recombine, PackError, NEUTRAL_DIMENSIONS};
pub use store::{DirectoryStore, MemoryStore, StoreError, TextureStore};
