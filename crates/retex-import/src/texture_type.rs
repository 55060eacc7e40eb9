//! Texture slot classification and the recombination predicate.

use serde::{Deserialize, Serialize};

/// Semantic role of a texture slot in the importing material.
///
/// The set is closed; every slot the import stage plans carries exactly
/// one of these tags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TextureImportType {
    /// Color data sampled in sRGB (base color, emissive).
    Srgb,
    /// Non-color data used as-is (masks, plain RGBA payloads).
    Linear,
    /// Tangent-space normal map.
    NormalMap,
    /// Packed PBR map combining occlusion, roughness, and metallic
    /// channels.
    StandardMap,
}

impl TextureImportType {
    /// Every classification tag, for exhaustive checks.
    pub const ALL: [TextureImportType; 4] = [
        TextureImportType::Srgb,
        TextureImportType::Linear,
        TextureImportType::NormalMap,
        TextureImportType::StandardMap,
    ];

    /// Whether this texture type needs its source channels recombined
    /// into a repacked artifact before the target engine can use it.
    ///
    /// The mapping lives in this single table; call sites read the
    /// cached flag on the descriptor instead of comparing tags.
    pub fn requires_conversion(self) -> bool {
        match self {
            TextureImportType::StandardMap => true,
            TextureImportType::Srgb
            | TextureImportType::Linear
            | TextureImportType::NormalMap => false,
        }
    }

    /// Stable lowercase label, matching the serde encoding.
    pub fn as_str(self) -> &'static str {
        match self {
            TextureImportType::Srgb => "srgb",
            TextureImportType::Linear => "linear",
            TextureImportType::NormalMap => "normal_map",
            TextureImportType::StandardMap => "standard_map",
        }
    }
}

impl std::fmt::Display for TextureImportType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_standard_map_requires_conversion() {
        for texture_type in TextureImportType::ALL {
            assert_eq!(
                texture_type.requires_conversion(),
                texture_type == TextureImportType::StandardMap,
                "predicate mismatch for {texture_type}"
            );
        }
    }

    #[test]
    fn test_display_matches_serde() {
        for texture_type in TextureImportType::ALL {
            let json = serde_json::to_string(&texture_type).unwrap();
            assert_eq!(json, format!("\"{texture_type}\""));
        }
    }
}
