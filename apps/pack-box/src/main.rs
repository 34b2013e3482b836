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
use anyhow::{bail, Result};
use bigbox::Quality;
use bundle::ScanSource;
use descriptor::{Descriptor, TextureSlot};
use log::warn;
use std::{
    env, fs,
    path::{Path, PathBuf},
};
use structopt::StructOpt;

/// Compile a scan bundle (zip or directory) into textured 3D box models
#[derive(Debug, StructOpt)]
struct Opt {
    /// Write artifacts into this directory
    #[structopt(short = "o", long = "output", parse(from_os_str))]
    output: PathBuf,

    /// Tier to compile: high, low or both
    #[structopt(short = "q", long = "quality", default_value = "both")]
    quality: String,

    /// Also export a half-resolution front cover beside the models
    #[structopt(long)]
    cover: bool,

    /// The bundle to compile
    #[structopt(parse(from_os_str))]
    input: PathBuf,
}

fn main() -> Result<()> {
    // Anything but a production deployment gets verbose progress output,
    // unless the caller already pinned RUST_LOG.
    let default_filter = if env::var("APP_ENV").map(|v| v == "production").unwrap_or(false) {
        "error"
    } else {
        "debug"
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();

    let opt = Opt::from_args();
    let tiers: &[Quality] = match opt.quality.as_str() {
        "high" => &[Quality::High],
        "low" => &[Quality::Low],
        "both" => &[Quality::High, Quality::Low],
        other => bail!("unknown quality '{}'; expected high, low or both", other),
    };

    let mut source = ScanSource::open(&opt.input)?;
    for &quality in tiers {
        let path = bigbox::compile(&mut source, &opt.output, quality)?;
        let size = fs::metadata(&path)?.len();
        println!(
            "{} quality GLB saved: {} ({:.1} KB)",
            quality.label(),
            path.display(),
            size as f64 / 1024.
        );
    }

    if opt.cover {
        export_cover(&mut source, &opt.output)?;
    }
    Ok(())
}

// The catalog's listing pages want a small front cover next to the models.
fn export_cover(source: &mut ScanSource, out_dir: &Path) -> Result<()> {
    let desc = Descriptor::from_json(&source.read_descriptor()?)?;
    let scratch = tempfile::tempdir()?;
    let staged = source.stage(scratch.path())?;
    let front = match staged.get(TextureSlot::Front) {
        Some(path) => path,
        None => {
            warn!("bundle has no front scan; skipping cover export");
            return Ok(());
        }
    };
    let (w, h) = imagery::scan_size(TextureSlot::Front, &desc, imagery::UPSIZE_RATIO);
    let cover = out_dir.join("front.webp");
    imagery::thumbnail(front, &cover, w, h)?;
    imagery::shrink_cover(&cover, desc.width, desc.height)?;
    println!("cover saved: {}", cover.display());
    Ok(())
}
