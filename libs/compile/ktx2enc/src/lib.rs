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

// The contract around the external toktx binary: RGBA surface in, ETC1S
// supercompressed KTX2 with a full mip chain out. ETC1S blocks are 4x4, so
// the surface handed in must already be padded to multiples of 4 (the atlas
// packer guarantees this).

use image::RgbaImage;
use log::debug;
use std::{
    ffi::OsString,
    path::{Path, PathBuf},
    process::Command,
};
use thiserror::Error;

pub const QUALITY: u32 = 255;
pub const QUALITY_LOW: u32 = 180;

#[derive(Debug, Error)]
pub enum EncodeError {
    #[error("surface is {width}x{height}; KTX2 encoding needs positive multiples of 4")]
    BadDimensions { width: u32, height: u32 },
    #[error("failed to write intermediate png")]
    Png(#[from] image::ImageError),
    #[error("toktx failed on {path}: {detail}")]
    Tool { path: PathBuf, detail: String },
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Transcode `surface` into a KTX2 file at `out`.
pub fn encode(surface: &RgbaImage, out: &Path, qlevel: u32) -> Result<(), EncodeError> {
    let (width, height) = surface.dimensions();
    if width == 0 || height == 0 || width % 4 != 0 || height % 4 != 0 {
        return Err(EncodeError::BadDimensions { width, height });
    }

    // toktx reads from a file, so round-trip the surface through a scratch
    // png that disappears when this returns.
    let png = tempfile::Builder::new().suffix(".png").tempfile()?;
    surface.save_with_format(png.path(), image::ImageFormat::Png)?;

    let args = toktx_args(out, png.path(), qlevel);
    debug!("toktx {:?}", args);
    let output = Command::new("toktx")
        .args(&args)
        .output()
        .map_err(|e| EncodeError::Tool {
            path: out.to_owned(),
            detail: e.to_string(),
        })?;
    if !output.status.success() {
        return Err(EncodeError::Tool {
            path: out.to_owned(),
            detail: String::from_utf8_lossy(&output.stderr).trim().to_owned(),
        });
    }
    Ok(())
}

fn toktx_args(out: &Path, png: &Path, qlevel: u32) -> Vec<OsString> {
    let mut args: Vec<OsString> = ["--t2", "--genmipmap", "--encode", "etc1s", "--clevel", "1"]
        .iter()
        .map(OsString::from)
        .collect();
    args.push("--qlevel".into());
    args.push(qlevel.to_string().into());
    args.push(out.into());
    args.push(png.into());
    args
}
