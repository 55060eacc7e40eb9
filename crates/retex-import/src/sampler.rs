//! Sampler configuration passed through the import pipeline unmodified.

use serde::{Deserialize, Serialize};

/// Texture coordinate wrapping mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WrapMode {
    /// Clamp coordinates to the edge texel.
    ClampToEdge,
    /// Mirror the texture at every repeat.
    MirroredRepeat,
    /// Tile the texture.
    Repeat,
}

/// Minification filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MinFilter {
    /// Nearest texel.
    Nearest,
    /// Linear interpolation.
    Linear,
    /// Nearest texel on the nearest mip level.
    NearestMipmapNearest,
    /// Linear interpolation on the nearest mip level.
    LinearMipmapNearest,
    /// Nearest texel, linear between mip levels.
    NearestMipmapLinear,
    /// Linear interpolation, linear between mip levels.
    LinearMipmapLinear,
}

/// Magnification filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MagFilter {
    /// Nearest texel.
    Nearest,
    /// Linear interpolation.
    Linear,
}

/// Opaque sampling configuration for one texture slot.
///
/// The import pipeline copies these values through to whatever consumes
/// the texture; it never interprets them. The default matches glTF's
/// default sampler (repeat wrapping, linear filtering).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SamplerParam {
    /// Horizontal wrap mode.
    pub wrap_s: WrapMode,
    /// Vertical wrap mode.
    pub wrap_t: WrapMode,
    /// Minification filter.
    pub min_filter: MinFilter,
    /// Magnification filter.
    pub mag_filter: MagFilter,
}

impl Default for SamplerParam {
    fn default() -> Self {
        Self {
            wrap_s: WrapMode::Repeat,
            wrap_t: WrapMode::Repeat,
            min_filter: MinFilter::LinearMipmapLinear,
            mag_filter: MagFilter::Linear,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_matches_gltf_default_sampler() {
        let sampler = SamplerParam::default();
        assert_eq!(sampler.wrap_s, WrapMode::Repeat);
        assert_eq!(sampler.wrap_t, WrapMode::Repeat);
        assert_eq!(sampler.min_filter, MinFilter::LinearMipmapLinear);
        assert_eq!(sampler.mag_filter, MagFilter::Linear);
    }

    #[test]
    fn test_serde_snake_case() {
        let json = serde_json::to_string(&WrapMode::ClampToEdge).unwrap();
        assert_eq!(json, "\"clamp_to_edge\"");

        let filter: MinFilter = serde_json::from_str("\"linear_mipmap_linear\"").unwrap();
        assert_eq!(filter, MinFilter::LinearMipmapLinear);
    }

    #[test]
    fn test_plain_value_copy() {
        let sampler = SamplerParam {
            wrap_s: WrapMode::ClampToEdge,
            ..SamplerParam::default()
        };
        let copy = sampler;
        assert_eq!(sampler, copy);
    }
}
