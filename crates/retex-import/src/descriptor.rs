//! The per-texture-slot import requirement record.

use std::fmt;

use crate::name::TextureAddressing;
use crate::sampler::SamplerParam;
use crate::source::ByteSource;
use crate::texture_type::TextureImportType;

/// Number of channel-source slots a descriptor carries.
pub const CHANNEL_COUNT: usize = 6;

/// Positional role of a channel-source slot.
///
/// Roles are fixed by position so the conversion stage can iterate the
/// slots while preserving their meaning: the primary payload, the three
/// packed-map contributors, and two reserved composition inputs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChannelRole {
    /// The texture's own payload; the only slot used when no
    /// recombination is required.
    Primary,
    /// Metallic contributor for packed maps.
    Metallic,
    /// Roughness contributor for packed maps.
    Roughness,
    /// Occlusion contributor for packed maps.
    Occlusion,
    /// Reserved composition input.
    ExtraA,
    /// Reserved composition input.
    ExtraB,
}

impl ChannelRole {
    /// Every role in slot order.
    pub const ALL: [ChannelRole; CHANNEL_COUNT] = [
        ChannelRole::Primary,
        ChannelRole::Metallic,
        ChannelRole::Roughness,
        ChannelRole::Occlusion,
        ChannelRole::ExtraA,
        ChannelRole::ExtraB,
    ];

    /// Slot index of this role.
    pub fn index(self) -> usize {
        match self {
            ChannelRole::Primary => 0,
            ChannelRole::Metallic => 1,
            ChannelRole::Roughness => 2,
            ChannelRole::Occlusion => 3,
            ChannelRole::ExtraA => 4,
            ChannelRole::ExtraB => 5,
        }
    }

    /// Role at a slot index, if the index is in range.
    pub fn from_index(index: usize) -> Option<ChannelRole> {
        ChannelRole::ALL.get(index).copied()
    }

    /// Stable lowercase label.
    pub fn as_str(self) -> &'static str {
        match self {
            ChannelRole::Primary => "primary",
            ChannelRole::Metallic => "metallic",
            ChannelRole::Roughness => "roughness",
            ChannelRole::Occlusion => "occlusion",
            ChannelRole::ExtraA => "extra_a",
            ChannelRole::ExtraB => "extra_b",
        }
    }
}

impl fmt::Display for ChannelRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One texture slot's full import requirement.
///
/// Immutable after construction: the constructing stage configures it
/// through [`TextureImportDescriptorBuilder`], and the conversion stage
/// only reads it. The descriptor performs no I/O itself; all retrieval
/// is delegated to the channel handles, and it does not own the byte
/// stores those handles reference.
///
/// Descriptors are `Send + Sync` and safe to read from multiple tasks.
#[derive(Debug, Clone)]
pub struct TextureImportDescriptor {
    addressing: TextureAddressing,
    sampler: SamplerParam,
    texture_type: TextureImportType,
    metallic_factor: f32,
    roughness_factor: f32,
    channels: [Option<ByteSource>; CHANNEL_COUNT],
    // Computed once at construction; there is no mutable state to
    // recompute it from.
    requires_conversion: bool,
}

impl TextureImportDescriptor {
    /// Starts building a descriptor for one texture slot.
    ///
    /// # Example
    ///
    /// ```
    /// use retex_import::descriptor::{ChannelRole, TextureImportDescriptor};
    /// use retex_import::name::{resolve_addressing, SourceAddressing};
    /// use retex_import::source::ByteSource;
    /// use retex_import::texture_type::TextureImportType;
    ///
    /// let addressing = resolve_addressing(&SourceAddressing::named("metal")).unwrap();
    /// let descriptor =
    ///     TextureImportDescriptor::builder(addressing, TextureImportType::StandardMap)
    ///         .roughness_factor(0.5)
    ///         .channel(ChannelRole::Metallic, ByteSource::from_bytes(vec![1]))
    ///         .build();
    /// assert!(descriptor.requires_conversion());
    /// ```
    pub fn builder(
        addressing: TextureAddressing,
        texture_type: TextureImportType,
    ) -> TextureImportDescriptorBuilder {
        TextureImportDescriptorBuilder {
            addressing,
            texture_type,
            sampler: SamplerParam::default(),
            metallic_factor: 1.0,
            roughness_factor: 1.0,
            channels: std::array::from_fn(|_| None),
        }
    }

    /// Resolved source/converted identity of this slot.
    pub fn addressing(&self) -> &TextureAddressing {
        &self.addressing
    }

    /// Sampling configuration, passed through unmodified.
    pub fn sampler(&self) -> SamplerParam {
        self.sampler
    }

    /// Classification tag of this slot.
    pub fn texture_type(&self) -> TextureImportType {
        self.texture_type
    }

    /// Multiplier applied to the metallic channel during recombination.
    pub fn metallic_factor(&self) -> f32 {
        self.metallic_factor
    }

    /// Multiplier applied to the roughness channel during recombination.
    pub fn roughness_factor(&self) -> f32 {
        self.roughness_factor
    }

    /// The handle in the given role's slot, if one was wired.
    pub fn channel(&self, role: ChannelRole) -> Option<&ByteSource> {
        self.channels[role.index()].as_ref()
    }

    /// All six slots in positional order.
    pub fn channels(&self) -> &[Option<ByteSource>; CHANNEL_COUNT] {
        &self.channels
    }

    /// The wired slots in positional order.
    pub fn present_channels(&self) -> impl Iterator<Item = (ChannelRole, &ByteSource)> {
        ChannelRole::ALL
            .into_iter()
            .filter_map(|role| self.channel(role).map(|source| (role, source)))
    }

    /// Whether this slot's channels must be recombined into a repacked
    /// artifact. Derived from the texture type at construction.
    pub fn requires_conversion(&self) -> bool {
        self.requires_conversion
    }
}

/// Builder for [`TextureImportDescriptor`].
///
/// The sampler and factors may be adjusted freely here; once `build`
/// runs, the descriptor is frozen.
#[derive(Debug)]
pub struct TextureImportDescriptorBuilder {
    addressing: TextureAddressing,
    texture_type: TextureImportType,
    sampler: SamplerParam,
    metallic_factor: f32,
    roughness_factor: f32,
    channels: [Option<ByteSource>; CHANNEL_COUNT],
}

impl TextureImportDescriptorBuilder {
    /// Sets the sampling configuration.
    pub fn sampler(mut self, sampler: SamplerParam) -> Self {
        self.sampler = sampler;
        self
    }

    /// Sets the metallic multiplier (default 1.0).
    pub fn metallic_factor(mut self, factor: f32) -> Self {
        self.metallic_factor = factor;
        self
    }

    /// Sets the roughness multiplier (default 1.0).
    pub fn roughness_factor(mut self, factor: f32) -> Self {
        self.roughness_factor = factor;
        self
    }

    /// Wires a byte-retrieval handle into the given role's slot.
    pub fn channel(mut self, role: ChannelRole, source: ByteSource) -> Self {
        self.channels[role.index()] = Some(source);
        self
    }

    /// Wires the primary slot.
    pub fn primary(self, source: ByteSource) -> Self {
        self.channel(ChannelRole::Primary, source)
    }

    /// Freezes the descriptor.
    pub fn build(self) -> TextureImportDescriptor {
        TextureImportDescriptor {
            requires_conversion: self.texture_type.requires_conversion(),
            addressing: self.addressing,
            sampler: self.sampler,
            texture_type: self.texture_type,
            metallic_factor: self.metallic_factor,
            roughness_factor: self.roughness_factor,
            channels: self.channels,
        }
    }
}
