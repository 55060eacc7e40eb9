//! ReTex Texture Import Data Model
//!
//! This crate models texture assets for a 3D-model import pipeline: for
//! each texture slot a material requires, it describes how to locate,
//! name, and (if necessary) recombine source image channels into the
//! representation the target engine expects.
//!
//! # Overview
//!
//! Two pieces form the core:
//!
//! - The **name resolver** ([`name::resolve_addressing`]) turns raw
//!   source addressing into a [`TextureAddressing`]: the canonical
//!   identity used internally plus the identity a repacked replacement
//!   is persisted under.
//! - The **import descriptor** ([`TextureImportDescriptor`]) aggregates
//!   addressing, sampling configuration, a texture-type classification,
//!   recombination factors, and six independently optional deferred
//!   byte-retrieval handles ([`ByteSource`]), one per potential channel
//!   contributor.
//!
//! An import stage builds descriptors while planning; a conversion
//! stage (the `retex-convert` crate) consumes them, fetching bytes only
//! through the handles.
//!
//! # Example
//!
//! ```
//! use retex_import::{
//!     resolve_addressing, ByteSource, ChannelRole, SourceAddressing,
//!     TextureImportDescriptor, TextureImportType,
//! };
//!
//! let addressing = resolve_addressing(&SourceAddressing::named("metal")).unwrap();
//! assert_eq!(addressing.converted_file_name, "metal.converted.png");
//!
//! let descriptor =
//!     TextureImportDescriptor::builder(addressing, TextureImportType::StandardMap)
//!         .metallic_factor(1.0)
//!         .roughness_factor(0.5)
//!         .channel(ChannelRole::Metallic, ByteSource::from_bytes(vec![0u8; 4]))
//!         .build();
//!
//! assert!(descriptor.requires_conversion());
//! ```
//!
//! # Modules
//!
//! - [`name`]: addressing resolution
//! - [`sampler`]: pass-through sampling configuration
//! - [`texture_type`]: slot classification and the recombination predicate
//! - [`source`]: deferred byte-retrieval handles
//! - [`descriptor`]: the immutable per-slot descriptor
//! - [`error`]: addressing and retrieval errors

pub mod descriptor;
pub mod error;
pub mod name;
pub mod sampler;
pub mod source;
pub mod texture_type;

// Re-export commonly used types at the crate root
pub use descriptor::{
    ChannelRole, TextureImportDescriptor, TextureImportDescriptorBuilder, CHANNEL_COUNT,
};
pub use error::{AddressingError, RetrieveError};
pub use name::{resolve_addressing, SourceAddressing, TextureAddressing};
pub use sampler::{MagFilter, MinFilter, SamplerParam, WrapMode};
pub use source::ByteSource;
pub use texture_type::TextureImportType;
