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

// A scan bundle is either a zip archive or a plain directory holding an
// info.json descriptor plus one image per texture slot. Both shapes stage
// into a scratch directory so the rest of the pipeline only ever sees
// canonically-named files on disk.

use descriptor::TextureSlot;
use log::{debug, warn};
use std::{
    collections::{btree_map::Entry, BTreeMap},
    fs,
    io::{Cursor, Read},
    path::{Path, PathBuf},
};
use thiserror::Error;
use zip::ZipArchive;

pub const DESCRIPTOR_NAME: &str = "info.json";

// Artifacts from a previous import that may ride along in a re-uploaded
// bundle. Not scans, not errors.
const RESERVED_NAMES: [&str; 3] = [DESCRIPTOR_NAME, "box.glb", "box-low.glb"];

// When the same slot is present with several extensions, the rawest scan
// wins.
const EXT_PRECEDENCE: [&str; 6] = ["tif", "tiff", "png", "jpg", "jpeg", "webp"];

#[derive(Debug, Error)]
pub enum BundleError {
    #[error("failed to read bundle")]
    Io(#[from] std::io::Error),
    #[error("bundle is not a valid zip archive")]
    Zip(#[from] zip::result::ZipError),
    #[error("bundle has no {DESCRIPTOR_NAME} descriptor")]
    MissingDescriptor,
    #[error("file name '{0}' is not in the recognized scan set")]
    UnknownSlot(String),
}

/// Where a bundle's bytes come from.
pub enum ScanSource {
    Zip(Box<ZipArchive<Cursor<Vec<u8>>>>),
    Dir(PathBuf),
}

impl ScanSource {
    /// A directory path opens as `Dir`; anything else is read whole and
    /// opened as a zip archive.
    pub fn open(path: &Path) -> Result<Self, BundleError> {
        if fs::metadata(path)?.is_dir() {
            Ok(ScanSource::Dir(path.to_owned()))
        } else {
            Self::from_zip_bytes(fs::read(path)?)
        }
    }

    pub fn from_zip_bytes(data: Vec<u8>) -> Result<Self, BundleError> {
        Ok(ScanSource::Zip(Box::new(ZipArchive::new(Cursor::new(
            data,
        ))?)))
    }

    pub fn read_descriptor(&mut self) -> Result<Vec<u8>, BundleError> {
        match self.read_file(DESCRIPTOR_NAME) {
            Ok(data) => Ok(data),
            Err(BundleError::Io(e)) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(BundleError::MissingDescriptor)
            }
            Err(BundleError::Zip(zip::result::ZipError::FileNotFound)) => {
                Err(BundleError::MissingDescriptor)
            }
            Err(e) => Err(e),
        }
    }

    /// Base names of every plain file in the bundle.
    pub fn file_names(&mut self) -> Result<Vec<String>, BundleError> {
        let mut names = Vec::new();
        match self {
            ScanSource::Zip(archive) => {
                for i in 0..archive.len() {
                    let entry = archive.by_index(i)?;
                    if entry.is_dir() {
                        continue;
                    }
                    names.push(entry.name().to_owned());
                }
            }
            ScanSource::Dir(path) => {
                for entry in fs::read_dir(path)? {
                    let entry = entry?;
                    if entry.file_type()?.is_dir() {
                        continue;
                    }
                    names.push(entry.file_name().to_string_lossy().into_owned());
                }
            }
        }
        Ok(names)
    }

    fn read_file(&mut self, name: &str) -> Result<Vec<u8>, BundleError> {
        match self {
            ScanSource::Zip(archive) => {
                let mut entry = archive.by_name(name)?;
                let mut data = Vec::with_capacity(entry.size() as usize);
                entry.read_to_end(&mut data)?;
                Ok(data)
            }
            ScanSource::Dir(path) => Ok(fs::read(path.join(name))?),
        }
    }

    /// Validate every file name against the closed scan set and copy the
    /// winners into `into` under canonical `<slot>.<ext>` names. Rejects the
    /// whole bundle on the first unrecognized name.
    pub fn stage(&mut self, into: &Path) -> Result<StagedScans, BundleError> {
        let mut names = self.file_names()?;
        names.sort();

        let mut picks: BTreeMap<TextureSlot, (usize, String)> = BTreeMap::new();
        for name in &names {
            // Scans are keyed by base name; zip entries may carry a folder
            // prefix.
            let base = base_name(name);
            if RESERVED_NAMES.contains(&base.to_ascii_lowercase().as_str()) {
                continue;
            }
            let (slot, precedence) =
                classify(base).ok_or_else(|| BundleError::UnknownSlot(name.clone()))?;
            match picks.entry(slot) {
                Entry::Vacant(e) => {
                    e.insert((precedence, name.clone()));
                }
                Entry::Occupied(mut e) => {
                    if precedence < e.get().0 {
                        warn!("scan {} shadows {}", name, e.get().1);
                        e.insert((precedence, name.clone()));
                    } else {
                        warn!("scan {} shadowed by {}", name, e.get().1);
                    }
                }
            }
        }

        fs::create_dir_all(into)?;
        let mut scans = BTreeMap::new();
        for (slot, (_, name)) in &picks {
            let ext = extension_of(name).expect("classified scans have extensions");
            let dst = into.join(format!("{}.{}", slot.key(), ext));
            fs::write(&dst, self.read_file(name)?)?;
            debug!("staged {} -> {}", name, dst.display());
            scans.insert(*slot, dst);
        }
        Ok(StagedScans { scans })
    }
}

/// The scans that survived staging, keyed by slot, pointing at canonical
/// paths in the staging directory.
#[derive(Debug)]
pub struct StagedScans {
    scans: BTreeMap<TextureSlot, PathBuf>,
}

impl StagedScans {
    pub fn get(&self, slot: TextureSlot) -> Option<&Path> {
        self.scans.get(&slot).map(PathBuf::as_path)
    }

    pub fn contains(&self, slot: TextureSlot) -> bool {
        self.scans.contains_key(&slot)
    }

    pub fn iter(&self) -> impl Iterator<Item = (TextureSlot, &Path)> {
        self.scans.iter().map(|(slot, path)| (*slot, path.as_path()))
    }

    pub fn len(&self) -> usize {
        self.scans.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scans.is_empty()
    }
}

fn base_name(name: &str) -> &str {
    name.rsplit('/').next().unwrap_or(name)
}

fn extension_of(name: &str) -> Option<String> {
    let (_, ext) = name.rsplit_once('.')?;
    Some(ext.to_ascii_lowercase())
}

fn classify(name: &str) -> Option<(TextureSlot, usize)> {
    let (stem, ext) = name.rsplit_once('.')?;
    let precedence = EXT_PRECEDENCE
        .iter()
        .position(|e| ext.eq_ignore_ascii_case(e))?;
    let slot = TextureSlot::from_stem(stem)?;
    Some((slot, precedence))
}
