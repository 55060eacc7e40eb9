//! Texture addressing resolution.
//!
//! Maps the raw naming information of a source asset (texture name, image
//! URI, texture index) onto the two identities the import pipeline works
//! with: the canonical name the texture has inside the source document,
//! and the name to use when a repacked replacement must be materialized.
//!
//! Resolution is a pure string transform: no disk or network access, and
//! the same input always produces the same [`TextureAddressing`].

use serde::{Deserialize, Serialize};

use crate::error::AddressingError;

/// Suffix appended to the canonical name for repacked artifacts.
const CONVERTED_SUFFIX: &str = "converted";

/// Extension used when the source addressing carries none.
const DEFAULT_EXTENSION: &str = "png";

/// Extension of materialized converted textures. Converted maps are
/// always re-encoded, so the source extension does not carry over.
const CONVERTED_EXTENSION: &str = "png";

/// Image file extensions recognized when embedded in a source name.
const KNOWN_EXTENSIONS: [&str; 6] = ["png", "jpg", "jpeg", "webp", "bmp", "tga"];

/// Raw addressing inputs exactly as the surrounding asset format supplies
/// them. Every field is optional; resolution fails only when no field
/// yields a usable name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SourceAddressing {
    /// Name assigned in the source document, if any.
    pub name: Option<String>,
    /// URI of the backing image (relative path, absolute path, or data URI).
    pub uri: Option<String>,
    /// Index of the texture in the source document.
    pub index: Option<usize>,
}

impl SourceAddressing {
    /// Addressing from a source-document name alone.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::default()
        }
    }

    /// Sets the backing image URI.
    pub fn with_uri(mut self, uri: impl Into<String>) -> Self {
        self.uri = Some(uri.into());
        self
    }

    /// Sets the source-document texture index.
    pub fn with_index(mut self, index: usize) -> Self {
        self.index = Some(index);
        self
    }
}

/// Resolved texture identity: the canonical ("gltf") side and the
/// converted side used when a repacked artifact is persisted.
///
/// All fields derive deterministically from one [`SourceAddressing`];
/// two descriptors referencing the same source texture resolve to
/// identical addressing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextureAddressing {
    /// Canonical texture name inside the source document.
    pub gltf_name: String,
    /// File name for the texture as addressed in the source asset.
    pub gltf_file_name: String,
    /// Backing image URI, when the source supplied one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub uri: Option<String>,
    /// Name to use for a repacked replacement texture.
    pub converted_name: String,
    /// File name under which a repacked replacement is persisted.
    pub converted_file_name: String,
}

/// Resolves raw source addressing into a [`TextureAddressing`].
///
/// The canonical name is taken from the source name when one survives
/// sanitization, then from the URI stem, then from `texture_{index}`.
/// The extension comes from the name or URI (data-URI MIME types
/// included), defaulting to `png`.
///
/// # Errors
///
/// Returns [`AddressingError::InvalidAddressing`] when no non-empty
/// canonical name can be derived.
///
/// # Example
///
/// ```
/// use retex_import::name::{resolve_addressing, SourceAddressing};
///
/// let addressing = resolve_addressing(&SourceAddressing::named("albedo")).unwrap();
/// assert_eq!(addressing.gltf_file_name, "albedo.png");
/// assert_eq!(addressing.converted_file_name, "albedo.converted.png");
/// ```
pub fn resolve_addressing(
    source: &SourceAddressing,
) -> Result<TextureAddressing, AddressingError> {
    let mut stem = String::new();
    let mut extension: Option<String> = None;

    if let Some(name) = source.name.as_deref() {
        let (s, e) = split_known_extension(&sanitize_segment(name));
        stem = s;
        extension = e;
    }

    if let Some(uri) = source.uri.as_deref() {
        if extension.is_none() {
            extension = extension_from_uri(uri);
        }
        if stem.is_empty() {
            stem = uri_stem(uri);
        }
    }

    if stem.is_empty() {
        if let Some(index) = source.index {
            stem = format!("texture_{index}");
        }
    }

    if stem.is_empty() {
        return Err(AddressingError::InvalidAddressing(format!(
            "no usable name in {source:?}"
        )));
    }

    let extension = extension.unwrap_or_else(|| DEFAULT_EXTENSION.to_string());
    let converted_name = format!("{stem}.{CONVERTED_SUFFIX}");

    Ok(TextureAddressing {
        gltf_file_name: format!("{stem}.{extension}"),
        converted_file_name: format!("{converted_name}.{CONVERTED_EXTENSION}"),
        gltf_name: stem,
        uri: source.uri.clone(),
        converted_name,
    })
}

/// Reduces a raw name to a file-name-safe stem: final path segment only,
/// unusable characters dropped, surrounding whitespace and dots trimmed.
fn sanitize_segment(raw: &str) -> String {
    let segment = raw
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or("");
    let filtered: String = segment
        .chars()
        .filter(|c| c.is_alphanumeric() || matches!(c, '-' | '_' | '.' | ' '))
        .collect();
    filtered
        .trim()
        .trim_matches('.')
        .trim()
        .to_string()
}

/// Splits a trailing recognized image extension off a sanitized name.
fn split_known_extension(name: &str) -> (String, Option<String>) {
    if let Some((stem, ext)) = name.rsplit_once('.') {
        let lowered = ext.to_ascii_lowercase();
        if !stem.is_empty() && KNOWN_EXTENSIONS.contains(&lowered.as_str()) {
            return (stem.to_string(), Some(lowered));
        }
    }
    (name.to_string(), None)
}

/// Extracts a sanitized stem from a URI path. Data URIs carry no name.
fn uri_stem(uri: &str) -> String {
    if uri.starts_with("data:") {
        return String::new();
    }
    let path = uri.split(['?', '#']).next().unwrap_or(uri);
    let (stem, _) = split_known_extension(&sanitize_segment(path));
    stem
}

/// Derives an extension from a URI: the path extension for file-like
/// URIs, the MIME subtype for data URIs.
fn extension_from_uri(uri: &str) -> Option<String> {
    if let Some(rest) = uri.strip_prefix("data:") {
        let mime = rest.split([';', ',']).next().unwrap_or("");
        return match mime {
            "image/png" => Some("png".to_string()),
            "image/jpeg" => Some("jpg".to_string()),
            "image/webp" => Some("webp".to_string()),
            "image/bmp" => Some("bmp".to_string()),
            _ => None,
        };
    }
    let path = uri
        .split(['?', '#'])
        .next()
        .unwrap_or(uri);
    let ext = path.rsplit('.').next()?;
    let lowered = ext.to_ascii_lowercase();
    if KNOWN_EXTENSIONS.contains(&lowered.as_str()) {
        Some(lowered)
    } else {
        None
    }
}
