//! Builds texture import descriptors from a glTF document.
//!
//! One descriptor is planned per required material texture slot: base
//! color and emissive as sRGB passthroughs, normal maps as linear
//! passthroughs with normal-map classification, and the
//! metallic-roughness/occlusion pair as one standard-map slot whose
//! channels recombine at conversion time.
//!
//! Planning never touches image bytes: every channel handle defers its
//! fetch (external file, base64 data URI, or GLB buffer slice) until
//! the conversion stage invokes it.

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use base64::Engine as _;
use gltf::Document;
use retex_import::{
    resolve_addressing, AddressingError, ByteSource, ChannelRole, MagFilter, MinFilter,
    RetrieveError, SamplerParam, SourceAddressing, TextureAddressing, TextureImportDescriptor,
    TextureImportType, WrapMode,
};
use thiserror::Error;

/// Errors from import planning.
#[derive(Debug, Error)]
pub enum PlanError {
    /// A texture's naming could not be resolved.
    #[error(transparent)]
    Addressing(#[from] AddressingError),

    /// An image references the GLB binary blob, but the document
    /// carries none.
    #[error("{0} references binary data, but the document has no GLB blob")]
    MissingBinary(String),

    /// A data URI has no payload section.
    #[error("{0} has a malformed data URI")]
    MalformedDataUri(String),
}

/// Opens a glTF or GLB document, returning it with its binary blob (if
/// any) and the directory external URIs resolve against.
pub fn load_document(path: &Path) -> Result<(Document, Option<Vec<u8>>, PathBuf), gltf::Error> {
    let gltf = gltf::Gltf::open(path)?;
    let base_dir = path.parent().unwrap_or_else(|| Path::new(".")).to_path_buf();
    Ok((gltf.document, gltf.blob, base_dir))
}

/// Plans one descriptor per required material texture slot.
///
/// Descriptors referencing the same source texture in the same role are
/// planned once, so repeated materials do not produce duplicate slots.
pub fn plan_document(
    document: &Document,
    blob: Option<Vec<u8>>,
    base_dir: &Path,
) -> Result<Vec<TextureImportDescriptor>, PlanError> {
    let blob = blob.map(Arc::new);
    let mut planned: HashSet<(usize, TextureImportType)> = HashSet::new();
    let mut descriptors = Vec::new();

    for material in document.materials() {
        let pbr = material.pbr_metallic_roughness();

        if let Some(info) = pbr.base_color_texture() {
            plan_passthrough(
                &mut descriptors,
                &mut planned,
                &info.texture(),
                TextureImportType::Srgb,
                &blob,
                base_dir,
            )?;
        }

        if let Some(normal) = material.normal_texture() {
            plan_passthrough(
                &mut descriptors,
                &mut planned,
                &normal.texture(),
                TextureImportType::NormalMap,
                &blob,
                base_dir,
            )?;
        }

        if let Some(emissive) = material.emissive_texture() {
            plan_passthrough(
                &mut descriptors,
                &mut planned,
                &emissive.texture(),
                TextureImportType::Srgb,
                &blob,
                base_dir,
            )?;
        }

        let metallic_roughness = pbr.metallic_roughness_texture();
        let occlusion = material.occlusion_texture();
        if metallic_roughness.is_none() && occlusion.is_none() {
            continue;
        }

        // The metallic-roughness texture anchors the standard slot's
        // naming; occlusion-only materials anchor on the occlusion
        // texture instead.
        let anchor = metallic_roughness
            .as_ref()
            .map(|info| info.texture())
            .or_else(|| occlusion.as_ref().map(|occ| occ.texture()))
            .expect("at least one packed-map texture is present");

        if !planned.insert((anchor.index(), TextureImportType::StandardMap)) {
            continue;
        }

        let mut builder = TextureImportDescriptor::builder(
            addressing_for(&anchor)?,
            TextureImportType::StandardMap,
        )
        .sampler(sampler_for(&anchor))
        .metallic_factor(pbr.metallic_factor())
        .roughness_factor(pbr.roughness_factor());

        if let Some(info) = &metallic_roughness {
            // One glTF texture carries both contributors; the packer
            // reads roughness from green and metallic from blue.
            let source = image_source(&info.texture(), &blob, base_dir)?;
            builder = builder
                .channel(ChannelRole::Metallic, source.clone())
                .channel(ChannelRole::Roughness, source);
        }
        if let Some(occ) = &occlusion {
            builder = builder.channel(
                ChannelRole::Occlusion,
                image_source(&occ.texture(), &blob, base_dir)?,
            );
        }

        descriptors.push(builder.build());
    }

    Ok(descriptors)
}

fn plan_passthrough(
    descriptors: &mut Vec<TextureImportDescriptor>,
    planned: &mut HashSet<(usize, TextureImportType)>,
    texture: &gltf::Texture,
    texture_type: TextureImportType,
    blob: &Option<Arc<Vec<u8>>>,
    base_dir: &Path,
) -> Result<(), PlanError> {
    if !planned.insert((texture.index(), texture_type)) {
        return Ok(());
    }
    let descriptor = TextureImportDescriptor::builder(addressing_for(texture)?, texture_type)
        .sampler(sampler_for(texture))
        .primary(image_source(texture, blob, base_dir)?)
        .build();
    descriptors.push(descriptor);
    Ok(())
}

fn addressing_for(texture: &gltf::Texture) -> Result<TextureAddressing, AddressingError> {
    let image = texture.source();
    let uri = match image.source() {
        gltf::image::Source::Uri { uri, .. } => Some(uri.to_string()),
        gltf::image::Source::View { .. } => None,
    };
    resolve_addressing(&SourceAddressing {
        name: texture.name().or_else(|| image.name()).map(str::to_string),
        uri,
        index: Some(texture.index()),
    })
}

fn sampler_for(texture: &gltf::Texture) -> SamplerParam {
    let sampler = texture.sampler();
    let default = SamplerParam::default();
    SamplerParam {
        wrap_s: wrap_mode(sampler.wrap_s()),
        wrap_t: wrap_mode(sampler.wrap_t()),
        min_filter: sampler.min_filter().map_or(default.min_filter, min_filter),
        mag_filter: sampler.mag_filter().map_or(default.mag_filter, mag_filter),
    }
}

fn wrap_mode(mode: gltf::texture::WrappingMode) -> WrapMode {
    match mode {
        gltf::texture::WrappingMode::ClampToEdge => WrapMode::ClampToEdge,
        gltf::texture::WrappingMode::MirroredRepeat => WrapMode::MirroredRepeat,
        gltf::texture::WrappingMode::Repeat => WrapMode::Repeat,
    }
}

fn min_filter(filter: gltf::texture::MinFilter) -> MinFilter {
    match filter {
        gltf::texture::MinFilter::Nearest => MinFilter::Nearest,
        gltf::texture::MinFilter::Linear => MinFilter::Linear,
        gltf::texture::MinFilter::NearestMipmapNearest => MinFilter::NearestMipmapNearest,
        gltf::texture::MinFilter::LinearMipmapNearest => MinFilter::LinearMipmapNearest,
        gltf::texture::MinFilter::NearestMipmapLinear => MinFilter::NearestMipmapLinear,
        gltf::texture::MinFilter::LinearMipmapLinear => MinFilter::LinearMipmapLinear,
    }
}

fn mag_filter(filter: gltf::texture::MagFilter) -> MagFilter {
    match filter {
        gltf::texture::MagFilter::Nearest => MagFilter::Nearest,
        gltf::texture::MagFilter::Linear => MagFilter::Linear,
    }
}

/// Wires a deferred handle to wherever the texture's image bytes live.
fn image_source(
    texture: &gltf::Texture,
    blob: &Option<Arc<Vec<u8>>>,
    base_dir: &Path,
) -> Result<ByteSource, PlanError> {
    let image = texture.source();
    match image.source() {
        gltf::image::Source::Uri { uri, .. } => {
            if uri.starts_with("data:") {
                data_uri_source(uri, &image)
            } else {
                Ok(ByteSource::from_file(base_dir.join(uri)))
            }
        }
        gltf::image::Source::View { view, .. } => {
            let (offset, length) = (view.offset(), view.length());
            match view.buffer().source() {
                gltf::buffer::Source::Bin => {
                    let blob = blob
                        .as_ref()
                        .map(Arc::clone)
                        .ok_or_else(|| PlanError::MissingBinary(describe_image(&image)))?;
                    Ok(ByteSource::from_shared_slice(blob, offset, length))
                }
                gltf::buffer::Source::Uri(uri) => {
                    if uri.starts_with("data:") {
                        return data_uri_source(uri, &image);
                    }
                    Ok(buffer_file_slice(base_dir.join(uri), offset, length))
                }
            }
        }
    }
}

fn data_uri_source(uri: &str, image: &gltf::Image) -> Result<ByteSource, PlanError> {
    let encoded = uri
        .split_once(',')
        .map(|(_, payload)| payload.to_string())
        .ok_or_else(|| PlanError::MalformedDataUri(describe_image(image)))?;
    Ok(ByteSource::new(move || {
        let encoded = encoded.clone();
        async move {
            base64::engine::general_purpose::STANDARD
                .decode(encoded.as_bytes())
                .map_err(|err| RetrieveError::Decode(err.to_string()))
        }
    }))
}

/// A handle that reads an external buffer file and slices the image's
/// byte range out of it.
fn buffer_file_slice(path: PathBuf, offset: usize, length: usize) -> ByteSource {
    ByteSource::new(move || {
        let path = path.clone();
        async move {
            let data = tokio::fs::read(&path)
                .await
                .map_err(|source| RetrieveError::Io { path, source })?;
            let end = offset
                .checked_add(length)
                .filter(|end| *end <= data.len())
                .ok_or(RetrieveError::OutOfRange {
                    offset,
                    length,
                    len: data.len(),
                })?;
            Ok(data[offset..end].to_vec())
        }
    })
}

fn describe_image(image: &gltf::Image) -> String {
    match image.name() {
        Some(name) => format!("image '{name}'"),
        None => format!("image {}", image.index()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const MINIMAL_GLTF: &str = r#"{
        "asset": {"version": "2.0"},
        "images": [
            {"uri": "albedo.png"},
            {"uri": "data:image/png;base64,AAAA"},
            {"uri": "orm.png"}
        ],
        "samplers": [{"wrapS": 33071, "magFilter": 9728}],
        "textures": [
            {"name": "albedo", "source": 0, "sampler": 0},
            {"name": "normal", "source": 1},
            {"name": "orm", "source": 2}
        ],
        "materials": [
            {
                "pbrMetallicRoughness": {
                    "baseColorTexture": {"index": 0},
                    "metallicRoughnessTexture": {"index": 2},
                    "metallicFactor": 1.0,
                    "roughnessFactor": 0.5
                },
                "normalTexture": {"index": 1},
                "occlusionTexture": {"index": 2}
            }
        ]
    }"#;

    fn plan_minimal() -> Vec<TextureImportDescriptor> {
        let gltf = gltf::Gltf::from_slice(MINIMAL_GLTF.as_bytes()).unwrap();
        plan_document(&gltf.document, gltf.blob, Path::new("models")).unwrap()
    }

    #[test]
    fn test_plans_one_slot_per_material_texture() {
        let descriptors = plan_minimal();

        let names: Vec<&str> = descriptors
            .iter()
            .map(|d| d.addressing().gltf_name.as_str())
            .collect();
        assert_eq!(names, vec!["albedo", "normal", "orm"]);

        let types: Vec<TextureImportType> =
            descriptors.iter().map(|d| d.texture_type()).collect();
        assert_eq!(
            types,
            vec![
                TextureImportType::Srgb,
                TextureImportType::NormalMap,
                TextureImportType::StandardMap,
            ]
        );
    }

    #[test]
    fn test_standard_slot_wires_packed_channels() {
        let descriptors = plan_minimal();
        let standard = &descriptors[2];

        assert!(standard.requires_conversion());
        assert_eq!(standard.metallic_factor(), 1.0);
        assert_eq!(standard.roughness_factor(), 0.5);

        let present: Vec<ChannelRole> = standard
            .present_channels()
            .map(|(role, _)| role)
            .collect();
        assert_eq!(
            present,
            vec![
                ChannelRole::Metallic,
                ChannelRole::Roughness,
                ChannelRole::Occlusion,
            ]
        );
        assert_eq!(standard.addressing().converted_file_name, "orm.converted.png");
    }

    #[test]
    fn test_sampler_mapping_and_defaults() {
        let descriptors = plan_minimal();

        let albedo = descriptors[0].sampler();
        assert_eq!(albedo.wrap_s, WrapMode::ClampToEdge);
        assert_eq!(albedo.wrap_t, WrapMode::Repeat);
        assert_eq!(albedo.mag_filter, MagFilter::Nearest);

        // No sampler on the normal texture: glTF defaults apply.
        assert_eq!(descriptors[1].sampler(), SamplerParam::default());
    }

    #[test]
    fn test_shared_textures_plan_once() {
        let json = r#"{
            "asset": {"version": "2.0"},
            "images": [{"uri": "shared.png"}],
            "textures": [{"name": "shared", "source": 0}],
            "materials": [
                {"pbrMetallicRoughness": {"baseColorTexture": {"index": 0}}},
                {"pbrMetallicRoughness": {"baseColorTexture": {"index": 0}}}
            ]
        }"#;
        let gltf = gltf::Gltf::from_slice(json.as_bytes()).unwrap();
        let descriptors = plan_document(&gltf.document, gltf.blob, Path::new(".")).unwrap();
        assert_eq!(descriptors.len(), 1);
    }

    #[tokio::test]
    async fn test_data_uri_handle_decodes_lazily() {
        let descriptors = plan_minimal();
        let normal = &descriptors[1];

        let primary = normal.channel(ChannelRole::Primary).unwrap();
        // "AAAA" decodes to three zero bytes.
        assert_eq!(primary.fetch().await.unwrap(), vec![0, 0, 0]);
    }

    #[tokio::test]
    async fn test_file_handles_defer_until_fetch() {
        // Planning succeeds even though the files do not exist; only
        // fetching fails.
        let descriptors = plan_minimal();
        let albedo = &descriptors[0];

        let err = albedo
            .channel(ChannelRole::Primary)
            .unwrap()
            .fetch()
            .await
            .unwrap_err();
        assert!(matches!(err, RetrieveError::Io { .. }));
    }
}
