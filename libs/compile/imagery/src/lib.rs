// This file is part of BigBoxDB.
//
// BigBoxDB is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// BigBoxDB is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License
// along with BigBoxDB.  If not, see <http://www.gnu.org/licenses/>.

// Everything that turns a scan file into pixels: thumbnailing at the
// descriptor-derived working size, decoding to RGBA, lossy WebP encoding,
// and the black placeholder used when a base face was never scanned.
//
// TIFF scans are huge (often several hundred MB) and go through the
// external vipsthumbnail binary, which decodes them in streaming fashion;
// everything else is decoded and resampled in-process.

use descriptor::{Descriptor, TextureSlot};
use image::{imageops::FilterType, Rgba, RgbaImage};
use log::debug;
use std::{
    fs,
    path::{Path, PathBuf},
    process::Command,
};
use thiserror::Error;

/// Pixels per descriptor unit for the high-quality working set.
pub const UPSIZE_RATIO: u32 = 80;
/// Pixels per descriptor unit for the low-quality working set.
pub const UPSIZE_RATIO_LOW: u32 = 60;

pub const WEBP_QUALITY: f32 = 70.0;

#[derive(Debug, Error)]
pub enum ImageError {
    #[error("failed to decode {path}")]
    Decode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
    #[error("vipsthumbnail failed on {path}: {detail}")]
    Thumbnail { path: PathBuf, detail: String },
    #[error("failed to encode {path}: {detail}")]
    Encode { path: PathBuf, detail: String },
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// The working-set size for a slot's thumbnail: descriptor units times the
/// quality tier's upsize ratio, on the two axes the face actually spans.
pub fn scan_size(slot: TextureSlot, desc: &Descriptor, ratio: u32) -> (u32, u32) {
    let (w, h) = match slot {
        TextureSlot::Left | TextureSlot::Right => (desc.depth, desc.height),
        TextureSlot::Top | TextureSlot::Bottom => (desc.width, desc.depth),
        // Front, back, and every gatefold flap span the full cover.
        _ => (desc.width, desc.height),
    };
    (
        ((w * ratio as f32) as u32).max(1),
        ((h * ratio as f32) as u32).max(1),
    )
}

/// Produce a WebP thumbnail of `src` at `dst`, preserving aspect with both
/// axes at most the target (the larger axis lands exactly on it).
pub fn thumbnail(src: &Path, dst: &Path, width: u32, height: u32) -> Result<(), ImageError> {
    let ext = src
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);
    if matches!(ext.as_deref(), Some("tif") | Some("tiff")) {
        return vips_thumbnail(src, dst, width, height);
    }

    let img = image::open(src).map_err(|source| ImageError::Decode {
        path: src.to_owned(),
        source,
    })?;
    let resized = img.resize(width, height, FilterType::Lanczos3);
    write_webp(&resized.to_rgba8(), dst, WEBP_QUALITY)
}

fn vips_thumbnail(src: &Path, dst: &Path, width: u32, height: u32) -> Result<(), ImageError> {
    debug!(
        "vipsthumbnail {} -> {} at {}x{}",
        src.display(),
        dst.display(),
        width,
        height
    );
    let output = Command::new("vipsthumbnail")
        .arg(src)
        .arg("-o")
        .arg(format!("{}[Q={}]", dst.display(), WEBP_QUALITY as u32))
        .arg("-s")
        .arg(format!("{}x{}", width, height))
        .output()
        .map_err(|e| ImageError::Thumbnail {
            path: src.to_owned(),
            detail: e.to_string(),
        })?;
    if !output.status.success() {
        return Err(ImageError::Thumbnail {
            path: src.to_owned(),
            detail: String::from_utf8_lossy(&output.stderr).trim().to_owned(),
        });
    }
    Ok(())
}

/// Decode any supported scan format to RGBA.
pub fn open_pixels(path: &Path) -> Result<RgbaImage, ImageError> {
    Ok(image::open(path)
        .map_err(|source| ImageError::Decode {
            path: path.to_owned(),
            source,
        })?
        .to_rgba8())
}

/// Lossy WebP encode. The image crate only writes lossless WebP, so this
/// goes through libwebp.
pub fn write_webp(surface: &RgbaImage, path: &Path, quality: f32) -> Result<(), ImageError> {
    let (w, h) = surface.dimensions();
    if w == 0 || h == 0 {
        return Err(ImageError::Encode {
            path: path.to_owned(),
            detail: "surface is empty".to_owned(),
        });
    }
    let encoded = webp::Encoder::from_rgba(surface.as_raw(), w, h).encode(quality);
    fs::write(path, &*encoded)?;
    Ok(())
}

/// The substitute surface for a base face with no scan.
pub fn black_placeholder(width: u32, height: u32) -> RgbaImage {
    RgbaImage::from_pixel(width.max(1), height.max(1), Rgba([0, 0, 0, 255]))
}

/// Re-fit a stored cover to half the high-quality working size and rewrite
/// it in place. The catalog keeps this beside the model for listing pages.
pub fn shrink_cover(path: &Path, width: f32, height: f32) -> Result<(), ImageError> {
    let target_w = ((width * UPSIZE_RATIO as f32) / 2.) as u32;
    let target_h = ((height * UPSIZE_RATIO as f32) / 2.) as u32;
    let img = image::open(path).map_err(|source| ImageError::Decode {
        path: path.to_owned(),
        source,
    })?;
    let resized = img.resize(target_w.max(1), target_h.max(1), FilterType::Lanczos3);
    write_webp(&resized.to_rgba8(), path, WEBP_QUALITY)
}
