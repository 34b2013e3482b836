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

// One compile call: bundle in, textured .glb out. Every intermediate file
// lives in a scratch directory inside the output directory, so the final
// publish is a same-filesystem rename and no partial artifact can survive
// an error or panic.

use boxmesh::UvMapper;
use bundle::{BundleError, ScanSource};
use descriptor::{Descriptor, DescriptorError, TextureSlot};
use image::RgbaImage;
use imagery::ImageError;
use log::{debug, info};
use std::{
    collections::{BTreeMap, BTreeSet},
    fs,
    path::{Path, PathBuf},
};
use thiserror::Error;

/// Output tier. The archive serves the low tier to slow clients.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Quality {
    High,
    Low,
}

impl Quality {
    pub fn upsize_ratio(&self) -> u32 {
        match self {
            Quality::High => imagery::UPSIZE_RATIO,
            Quality::Low => imagery::UPSIZE_RATIO_LOW,
        }
    }

    pub fn ktx2_qlevel(&self) -> u32 {
        match self {
            Quality::High => ktx2enc::QUALITY,
            Quality::Low => ktx2enc::QUALITY_LOW,
        }
    }

    pub fn suffix(&self) -> &'static str {
        match self {
            Quality::High => "",
            Quality::Low => "-low",
        }
    }

    pub fn artifact_name(&self) -> String {
        format!("box{}.glb", self.suffix())
    }

    pub fn label(&self) -> &'static str {
        match self {
            Quality::High => "HIGH",
            Quality::Low => "LOW",
        }
    }
}

#[derive(Debug, Error)]
pub enum CompileError {
    #[error("descriptor invalid")]
    DescriptorInvalid(#[source] anyhow::Error),
    #[error("'{0}' is not a recognized scan name")]
    UnknownSlot(String),
    #[error("failed to read or decode input")]
    Decode(#[source] anyhow::Error),
    #[error("thumbnailing failed")]
    Thumbnail(#[source] anyhow::Error),
    #[error("texture encoding failed")]
    Encode(#[source] anyhow::Error),
    #[error("geometry is degenerate")]
    GeometryDegenerate(#[source] anyhow::Error),
    #[error("failed to write output artifact")]
    WriterIo(#[source] anyhow::Error),
}

impl From<BundleError> for CompileError {
    fn from(e: BundleError) -> Self {
        match e {
            BundleError::UnknownSlot(name) => CompileError::UnknownSlot(name),
            BundleError::MissingDescriptor => CompileError::DescriptorInvalid(e.into()),
            BundleError::Io(_) | BundleError::Zip(_) => CompileError::Decode(e.into()),
        }
    }
}

impl From<DescriptorError> for CompileError {
    fn from(e: DescriptorError) -> Self {
        CompileError::DescriptorInvalid(e.into())
    }
}

fn image_err(e: ImageError) -> CompileError {
    match e {
        ImageError::Decode { .. } => CompileError::Decode(e.into()),
        ImageError::Thumbnail { .. } => CompileError::Thumbnail(e.into()),
        ImageError::Encode { .. } => CompileError::Encode(e.into()),
        ImageError::Io(_) => CompileError::Decode(e.into()),
    }
}

/// Compile one bundle into `<out_dir>/box[-low].glb` and return the
/// artifact path.
pub fn compile(
    source: &mut ScanSource,
    out_dir: &Path,
    quality: Quality,
) -> Result<PathBuf, CompileError> {
    let desc = Descriptor::from_json(&source.read_descriptor()?)?;
    info!(
        "compiling '{}' ({}) at {} quality",
        desc.title,
        desc.box_type,
        quality.label()
    );

    fs::create_dir_all(out_dir).map_err(|e| CompileError::WriterIo(e.into()))?;
    let scratch = tempfile::Builder::new()
        .prefix(".bbdb-compile-")
        .tempdir_in(out_dir)
        .map_err(|e| CompileError::WriterIo(e.into()))?;

    let staged = source.stage(&scratch.path().join("scans"))?;
    let present: BTreeSet<TextureSlot> = staged.iter().map(|(slot, _)| slot).collect();
    let mode = boxmesh::select(desc.box_type, &present);
    debug!("gatefold mode: {:?}", mode);

    // Thumbnail every scan to its working size, then substitute black
    // placeholders for base faces that were never scanned. A missing base
    // face is not an error.
    let thumbs_dir = scratch.path().join("thumbs");
    fs::create_dir_all(&thumbs_dir).map_err(|e| CompileError::WriterIo(e.into()))?;
    let ratio = quality.upsize_ratio();
    let mut surfaces: BTreeMap<TextureSlot, RgbaImage> = BTreeMap::new();
    for (slot, path) in staged.iter() {
        let (w, h) = imagery::scan_size(slot, &desc, ratio);
        let thumb = thumbs_dir.join(format!("{}.webp", slot.key()));
        imagery::thumbnail(path, &thumb, w, h).map_err(image_err)?;
        surfaces.insert(slot, imagery::open_pixels(&thumb).map_err(image_err)?);
    }
    for face in TextureSlot::BASE_FACES {
        if !surfaces.contains_key(&face) {
            debug!("no {} scan; substituting a black placeholder", face);
            let (w, h) = imagery::scan_size(face, &desc, ratio);
            let path = thumbs_dir.join(format!("{}.webp", face.key()));
            imagery::write_webp(&imagery::black_placeholder(w, h), &path, imagery::WEBP_QUALITY)
                .map_err(image_err)?;
            surfaces.insert(face, imagery::open_pixels(&path).map_err(image_err)?);
        }
    }

    let entries = boxmesh::arrange(mode, surfaces);
    let (layout, surface) = atlas::pack(&entries).map_err(CompileError::GeometryDegenerate)?;

    let ktx2_path = scratch.path().join(format!("atlas{}.ktx2", quality.suffix()));
    ktx2enc::encode(&surface, &ktx2_path, quality.ktx2_qlevel())
        .map_err(|e| CompileError::Encode(e.into()))?;

    let uv = UvMapper::new(&layout);
    let parts = boxmesh::build(&desc, mode, &uv).map_err(CompileError::GeometryDegenerate)?;

    // The atlas is embedded whole; its file is a scratch by-product.
    let ktx2 = fs::read(&ktx2_path).map_err(|e| CompileError::Encode(e.into()))?;
    let staged_glb = scratch.path().join(quality.artifact_name());
    glb::write_glb(&staged_glb, &desc.title, &parts, &ktx2)
        .map_err(|e| CompileError::WriterIo(e.into()))?;

    let out_path = out_dir.join(quality.artifact_name());
    fs::rename(&staged_glb, &out_path).map_err(|e| CompileError::WriterIo(e.into()))?;
    info!("{} quality model saved: {}", quality.label(), out_path.display());
    Ok(out_path)
}
