//! Machine-readable reports for the `plan` and `extract` commands.

use retex_import::{TextureImportDescriptor, TextureImportType};
use serde::{Deserialize, Serialize};

/// One planned texture slot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SlotPlan {
    /// Canonical texture name.
    pub name: String,
    /// File name of the texture as addressed in the source asset.
    pub file_name: String,
    /// Classification of the slot.
    pub texture_type: TextureImportType,
    /// Whether conversion dispatch will recombine this slot.
    pub requires_conversion: bool,
    /// File name a recombined artifact is written under; only present
    /// when conversion is required.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub converted_file_name: Option<String>,
    /// Roles of the wired channel handles, in slot order.
    pub channels: Vec<String>,
}

impl SlotPlan {
    /// Summarizes a descriptor for reporting.
    pub fn from_descriptor(descriptor: &TextureImportDescriptor) -> Self {
        let addressing = descriptor.addressing();
        Self {
            name: addressing.gltf_name.clone(),
            file_name: addressing.gltf_file_name.clone(),
            texture_type: descriptor.texture_type(),
            requires_conversion: descriptor.requires_conversion(),
            converted_file_name: descriptor
                .requires_conversion()
                .then(|| addressing.converted_file_name.clone()),
            channels: descriptor
                .present_channels()
                .map(|(role, _)| role.as_str().to_string())
                .collect(),
        }
    }
}

/// Report for `retex plan`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanReport {
    /// The planned document.
    pub input: String,
    /// One entry per planned slot.
    pub slots: Vec<SlotPlan>,
}

/// One written output of `retex extract`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputEntry {
    /// Canonical name of the slot the bytes came from.
    pub slot: String,
    /// File name the bytes were written under.
    pub file_name: String,
    /// Whether the bytes are a recombined artifact.
    pub recombined: bool,
    /// Output size in bytes.
    pub bytes: usize,
    /// Hex-encoded BLAKE3 hash of the written content.
    pub hash: String,
}

/// One failed slot of `retex extract`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SlotError {
    /// Canonical name of the failed slot.
    pub slot: String,
    /// Why the slot failed.
    pub message: String,
}

/// Report for `retex extract`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractReport {
    /// The extracted document.
    pub input: String,
    /// Directory outputs were written into.
    pub out_root: String,
    /// Whether every slot succeeded.
    pub ok: bool,
    /// Successfully written outputs.
    pub outputs: Vec<OutputEntry>,
    /// Failed slots. Failures never abort sibling slots.
    pub errors: Vec<SlotError>,
    /// Total execution time in milliseconds.
    pub duration_ms: u64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use retex_import::{resolve_addressing, ByteSource, ChannelRole, SourceAddressing};

    #[test]
    fn test_slot_plan_for_passthrough() {
        let addressing = resolve_addressing(&SourceAddressing::named("albedo")).unwrap();
        let descriptor =
            TextureImportDescriptor::builder(addressing, TextureImportType::Srgb)
                .primary(ByteSource::from_bytes(vec![0]))
                .build();

        let plan = SlotPlan::from_descriptor(&descriptor);
        assert_eq!(plan.name, "albedo");
        assert_eq!(plan.file_name, "albedo.png");
        assert!(!plan.requires_conversion);
        assert_eq!(plan.converted_file_name, None);
        assert_eq!(plan.channels, vec!["primary"]);
    }

    #[test]
    fn test_slot_plan_for_standard_map() {
        let addressing = resolve_addressing(&SourceAddressing::named("metal")).unwrap();
        let descriptor =
            TextureImportDescriptor::builder(addressing, TextureImportType::StandardMap)
                .channel(ChannelRole::Metallic, ByteSource::from_bytes(vec![0]))
                .build();

        let plan = SlotPlan::from_descriptor(&descriptor);
        assert!(plan.requires_conversion);
        assert_eq!(
            plan.converted_file_name.as_deref(),
            Some("metal.converted.png")
        );
        assert_eq!(plan.channels, vec!["metallic"]);
    }

    #[test]
    fn test_plan_report_serializes() {
        let report = PlanReport {
            input: "model.gltf".to_string(),
            slots: Vec::new(),
        };
        let json = serde_json::to_string(&report).unwrap();
        let parsed: PlanReport = serde_json::from_str(&json).unwrap();
        assert_eq!(report, parsed);
    }
}
