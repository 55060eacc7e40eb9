//! Occlusion/roughness/metallic channel recombination.
//!
//! Packs up to six optional channel-source buffers plus the two
//! descriptor factors into one PNG in the glTF ORM layout: occlusion in
//! red, roughness in green, metallic in blue. Each contributor is read
//! from its dedicated slot first, then from the corresponding channel
//! of the primary slot (which may already hold a combined map), then
//! from the neutral constant 1.0.
//!
//! Encoding uses fixed filter and compression settings so the same
//! inputs always produce byte-identical output.

use image::RgbaImage;
use png::{BitDepth, ColorType, Compression, Encoder, FilterType};
use retex_import::{ChannelRole, CHANNEL_COUNT};
use thiserror::Error;

/// Output dimensions when every channel source is absent.
pub const NEUTRAL_DIMENSIONS: (u32, u32) = (4, 4);

/// Neutral value substituted for a missing channel.
const NEUTRAL_VALUE: f32 = 1.0;

/// Errors from channel recombination.
#[derive(Debug, Error)]
pub enum PackError {
    /// A channel source did not decode as an image.
    #[error("failed to decode {role} channel source: {source}")]
    Decode {
        /// Slot the undecodable bytes came from.
        role: ChannelRole,
        /// The underlying decoding failure.
        #[source]
        source: image::ImageError,
    },

    /// Encoding the packed output failed.
    #[error("failed to encode packed texture: {0}")]
    Encode(#[from] png::EncodingError),
}

/// Recombines channel-source buffers into one packed ORM texture.
///
/// Input contract: up to six optional raw encoded image buffers in
/// [`ChannelRole`] slot order, plus the metallic and roughness
/// multipliers. Output: one encoded PNG. Missing channels become the
/// neutral constant, never an error. The extra slots (4 and 5) are
/// accepted but not consumed by the ORM packer.
///
/// Output dimensions are the maximum over the present inputs
/// ([`NEUTRAL_DIMENSIONS`] when all are absent); smaller inputs are
/// point-sampled across the output.
pub fn recombine(
    channels: &[Option<Vec<u8>>; CHANNEL_COUNT],
    metallic_factor: f32,
    roughness_factor: f32,
) -> Result<Vec<u8>, PackError> {
    let primary = decode_slot(channels, ChannelRole::Primary)?;
    let metallic = decode_slot(channels, ChannelRole::Metallic)?;
    let roughness = decode_slot(channels, ChannelRole::Roughness)?;
    let occlusion = decode_slot(channels, ChannelRole::Occlusion)?;

    let (width, height) = [&primary, &metallic, &roughness, &occlusion]
        .into_iter()
        .flatten()
        .fold(None, |acc: Option<(u32, u32)>, image| {
            let (w, h) = (image.width(), image.height());
            Some(match acc {
                Some((aw, ah)) => (aw.max(w), ah.max(h)),
                None => (w, h),
            })
        })
        .unwrap_or(NEUTRAL_DIMENSIONS);

    let mut pixels = Vec::with_capacity((width * height * 3) as usize);
    for y in 0..height {
        for x in 0..width {
            // glTF ORM layout: occlusion.r, roughness.g, metallic.b.
            let o = read_channel(&occlusion, &primary, 0, x, y, width, height);
            let r = read_channel(&roughness, &primary, 1, x, y, width, height);
            let m = read_channel(&metallic, &primary, 2, x, y, width, height);
            pixels.push(to_u8(o));
            pixels.push(to_u8(r * roughness_factor));
            pixels.push(to_u8(m * metallic_factor));
        }
    }

    encode_rgb(&pixels, width, height)
}

fn decode_slot(
    channels: &[Option<Vec<u8>>; CHANNEL_COUNT],
    role: ChannelRole,
) -> Result<Option<RgbaImage>, PackError> {
    channels[role.index()]
        .as_deref()
        .map(|bytes| {
            image::load_from_memory(bytes)
                .map(|image| image.to_rgba8())
                .map_err(|source| PackError::Decode { role, source })
        })
        .transpose()
}

/// Reads one component from the dedicated source, falling back to the
/// primary source's same component, then to the neutral constant.
fn read_channel(
    dedicated: &Option<RgbaImage>,
    primary: &Option<RgbaImage>,
    component: usize,
    x: u32,
    y: u32,
    out_width: u32,
    out_height: u32,
) -> f32 {
    dedicated
        .as_ref()
        .or(primary.as_ref())
        .map(|image| sample(image, component, x, y, out_width, out_height))
        .unwrap_or(NEUTRAL_VALUE)
}

/// Point-samples a component, mapping output coordinates onto the
/// source proportionally.
fn sample(
    image: &RgbaImage,
    component: usize,
    x: u32,
    y: u32,
    out_width: u32,
    out_height: u32,
) -> f32 {
    let sx = ((x as u64 * image.width() as u64) / out_width as u64) as u32;
    let sy = ((y as u64 * image.height() as u64) / out_height as u64) as u32;
    let sx = sx.min(image.width() - 1);
    let sy = sy.min(image.height() - 1);
    f32::from(image.get_pixel(sx, sy).0[component]) / 255.0
}

fn to_u8(value: f32) -> u8 {
    (value.clamp(0.0, 1.0) * 255.0).round() as u8
}

/// Encodes RGB pixels with fixed settings for byte-identical output.
fn encode_rgb(pixels: &[u8], width: u32, height: u32) -> Result<Vec<u8>, PackError> {
    let mut out = Vec::new();
    {
        let mut encoder = Encoder::new(&mut out, width, height);
        encoder.set_color(ColorType::Rgb);
        encoder.set_depth(BitDepth::Eight);
        encoder.set_compression(Compression::Default);
        encoder.set_filter(FilterType::NoFilter);
        let mut writer = encoder.write_header()?;
        writer.write_image_data(pixels)?;
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    /// Encodes a solid-color RGB PNG test fixture.
    fn solid_png(width: u32, height: u32, rgb: [u8; 3]) -> Vec<u8> {
        let mut pixels = Vec::with_capacity((width * height * 3) as usize);
        for _ in 0..width * height {
            pixels.extend_from_slice(&rgb);
        }
        encode_rgb(&pixels, width, height).unwrap()
    }

    fn slots(entries: &[(ChannelRole, Vec<u8>)]) -> [Option<Vec<u8>>; CHANNEL_COUNT] {
        let mut channels: [Option<Vec<u8>>; CHANNEL_COUNT] = std::array::from_fn(|_| None);
        for (role, bytes) in entries {
            channels[role.index()] = Some(bytes.clone());
        }
        channels
    }

    fn decode_pixel(bytes: &[u8], x: u32, y: u32) -> ([u8; 4], (u32, u32)) {
        let image = image::load_from_memory(bytes).unwrap().to_rgba8();
        let dims = (image.width(), image.height());
        (image.get_pixel(x, y).0, dims)
    }

    #[test]
    fn test_all_absent_yields_neutral_output() {
        let channels: [Option<Vec<u8>>; CHANNEL_COUNT] = std::array::from_fn(|_| None);
        let packed = recombine(&channels, 1.0, 1.0).unwrap();

        let (pixel, dims) = decode_pixel(&packed, 0, 0);
        assert_eq!(dims, NEUTRAL_DIMENSIONS);
        assert_eq!(pixel, [255, 255, 255, 255]);
    }

    #[test]
    fn test_orm_layout_from_dedicated_slots() {
        let channels = slots(&[
            (ChannelRole::Occlusion, solid_png(2, 2, [40, 0, 0])),
            (ChannelRole::Roughness, solid_png(2, 2, [0, 120, 0])),
            (ChannelRole::Metallic, solid_png(2, 2, [0, 0, 200])),
        ]);
        let packed = recombine(&channels, 1.0, 1.0).unwrap();

        let (pixel, dims) = decode_pixel(&packed, 1, 1);
        assert_eq!(dims, (2, 2));
        assert_eq!(pixel, [40, 120, 200, 255]);
    }

    #[test]
    fn test_factors_scale_their_channels() {
        let channels = slots(&[
            (ChannelRole::Roughness, solid_png(2, 2, [0, 200, 0])),
            (ChannelRole::Metallic, solid_png(2, 2, [0, 0, 200])),
        ]);
        let packed = recombine(&channels, 0.25, 0.5).unwrap();

        let (pixel, _) = decode_pixel(&packed, 0, 0);
        // occlusion defaults to neutral, roughness 200 * 0.5, metallic 200 * 0.25
        assert_eq!(pixel, [255, 100, 50, 255]);
    }

    #[test]
    fn test_factor_results_clamped() {
        let channels = slots(&[(ChannelRole::Metallic, solid_png(1, 1, [0, 0, 200]))]);
        let packed = recombine(&channels, 4.0, 1.0).unwrap();

        let (pixel, _) = decode_pixel(&packed, 0, 0);
        assert_eq!(pixel[2], 255);
    }

    #[test]
    fn test_primary_fallback_uses_matching_components() {
        // A combined ORM map in the primary slot feeds every channel
        // that has no dedicated source.
        let channels = slots(&[(ChannelRole::Primary, solid_png(2, 2, [10, 20, 30]))]);
        let packed = recombine(&channels, 1.0, 1.0).unwrap();

        let (pixel, _) = decode_pixel(&packed, 0, 0);
        assert_eq!(pixel, [10, 20, 30, 255]);
    }

    #[test]
    fn test_dedicated_slot_beats_primary_fallback() {
        let channels = slots(&[
            (ChannelRole::Primary, solid_png(2, 2, [10, 20, 30])),
            (ChannelRole::Roughness, solid_png(2, 2, [0, 220, 0])),
        ]);
        let packed = recombine(&channels, 1.0, 1.0).unwrap();

        let (pixel, _) = decode_pixel(&packed, 0, 0);
        assert_eq!(pixel, [10, 220, 30, 255]);
    }

    #[test]
    fn test_output_takes_maximum_dimensions() {
        let channels = slots(&[
            (ChannelRole::Metallic, solid_png(1, 1, [0, 0, 90])),
            (ChannelRole::Roughness, solid_png(4, 2, [0, 60, 0])),
        ]);
        let packed = recombine(&channels, 1.0, 1.0).unwrap();

        let (pixel, dims) = decode_pixel(&packed, 3, 1);
        assert_eq!(dims, (4, 2));
        // the 1x1 metallic source covers every output pixel
        assert_eq!(pixel, [255, 60, 90, 255]);
    }

    #[test]
    fn test_extra_slots_are_ignored() {
        let channels = slots(&[
            (ChannelRole::Metallic, solid_png(1, 1, [0, 0, 90])),
            (ChannelRole::ExtraA, b"not an image".to_vec()),
        ]);
        // Undecodable bytes in an extra slot do not fail the pack.
        assert!(recombine(&channels, 1.0, 1.0).is_ok());
    }

    #[test]
    fn test_undecodable_contributor_errors() {
        let channels = slots(&[(ChannelRole::Metallic, b"not an image".to_vec())]);
        let err = recombine(&channels, 1.0, 1.0).unwrap_err();
        assert!(matches!(
            err,
            PackError::Decode {
                role: ChannelRole::Metallic,
                ..
            }
        ));
    }

    #[test]
    fn test_recombine_is_deterministic() {
        let channels = slots(&[(ChannelRole::Occlusion, solid_png(3, 3, [77, 0, 0]))]);
        let first = recombine(&channels, 1.0, 1.0).unwrap();
        let second = recombine(&channels, 1.0, 1.0).unwrap();
        assert_eq!(first, second);
    }
}
