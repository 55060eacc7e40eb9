//! Conversion dispatch over texture import descriptors.
//!
//! Given a descriptor, the dispatcher either passes the primary source
//! through unchanged (non-recombined types) or fetches every wired
//! channel and recombines them into a packed map. All fetching happens
//! through the descriptor's deferred handles; the handles of one
//! descriptor are invoked concurrently, and no ordering is assumed
//! between them.

use futures_util::future::join_all;
use retex_import::{ChannelRole, TextureImportDescriptor, CHANNEL_COUNT};

use crate::error::ConvertError;
use crate::pack;

/// What to do when a non-primary channel handle fails during
/// recombination.
///
/// Missing channels always become defaults; this policy only governs
/// channels that are present but fail. A failed primary channel
/// propagates under either policy.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ChannelFailurePolicy {
    /// Propagate the retrieval failure (default).
    #[default]
    Propagate,
    /// Treat the failed channel like an absent one and substitute the
    /// neutral default.
    SubstituteDefault,
}

/// The final encoded content for one texture slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConvertedTexture {
    /// File name the bytes belong under: the canonical file name for
    /// passthrough textures, the converted file name for recombined
    /// ones.
    pub file_name: String,
    /// The encoded texture content.
    pub bytes: Vec<u8>,
    /// Whether the bytes are a recombined artifact.
    pub recombined: bool,
}

/// Converts one texture slot.
///
/// Non-recombined types return the primary handle's bytes unchanged
/// under the canonical file name; a missing primary handle is
/// [`ConvertError::MissingPrimaryChannel`]. Recombined types fetch all
/// wired channels concurrently, substitute the neutral default for
/// absent ones, and return the packed bytes under the converted file
/// name.
pub async fn dispatch(
    descriptor: &TextureImportDescriptor,
    policy: ChannelFailurePolicy,
) -> Result<ConvertedTexture, ConvertError> {
    if descriptor.requires_conversion() {
        recombine_slot(descriptor, policy).await
    } else {
        passthrough_slot(descriptor).await
    }
}

async fn passthrough_slot(
    descriptor: &TextureImportDescriptor,
) -> Result<ConvertedTexture, ConvertError> {
    let addressing = descriptor.addressing();
    let primary = descriptor
        .channel(ChannelRole::Primary)
        .ok_or_else(|| ConvertError::MissingPrimaryChannel(addressing.gltf_name.clone()))?;

    let bytes = primary
        .fetch()
        .await
        .map_err(|source| ConvertError::Retrieval {
            name: addressing.gltf_name.clone(),
            role: ChannelRole::Primary,
            source,
        })?;

    Ok(ConvertedTexture {
        file_name: addressing.gltf_file_name.clone(),
        bytes,
        recombined: false,
    })
}

async fn recombine_slot(
    descriptor: &TextureImportDescriptor,
    policy: ChannelFailurePolicy,
) -> Result<ConvertedTexture, ConvertError> {
    let addressing = descriptor.addressing();

    let fetches = descriptor.present_channels().map(|(role, source)| async move {
        (role, source.fetch().await)
    });
    let fetched = join_all(fetches).await;

    let mut channels: [Option<Vec<u8>>; CHANNEL_COUNT] = std::array::from_fn(|_| None);
    for (role, result) in fetched {
        match result {
            Ok(bytes) => channels[role.index()] = Some(bytes),
            Err(source) => {
                let substitute = policy == ChannelFailurePolicy::SubstituteDefault
                    && role != ChannelRole::Primary;
                if !substitute {
                    return Err(ConvertError::Retrieval {
                        name: addressing.gltf_name.clone(),
                        role,
                        source,
                    });
                }
            }
        }
    }

    let bytes = pack::recombine(
        &channels,
        descriptor.metallic_factor(),
        descriptor.roughness_factor(),
    )
    .map_err(|source| ConvertError::Pack {
        name: addressing.gltf_name.clone(),
        source,
    })?;

    Ok(ConvertedTexture {
        file_name: addressing.converted_file_name.clone(),
        bytes,
        recombined: true,
    })
}

/// Outcome of converting one slot in a batch.
#[derive(Debug)]
pub struct SlotResult {
    /// Canonical name of the slot.
    pub slot: String,
    /// The slot's conversion outcome.
    pub result: Result<ConvertedTexture, ConvertError>,
}

/// Converts a batch of descriptors, isolating failures per slot.
///
/// Slots are converted concurrently; results come back in descriptor
/// order, and one slot's failure never aborts its siblings.
pub async fn dispatch_all(
    descriptors: &[TextureImportDescriptor],
    policy: ChannelFailurePolicy,
) -> Vec<SlotResult> {
    let conversions = descriptors.iter().map(|descriptor| async move {
        SlotResult {
            slot: descriptor.addressing().gltf_name.clone(),
            result: dispatch(descriptor, policy).await,
        }
    });
    join_all(conversions).await
}
