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

// Parse and validate the info.json descriptor that travels inside a scan
// bundle. Legacy quirks are normalized at this boundary so that nothing
// downstream has to know about them.

mod box_type;
mod slot;

pub use crate::{box_type::BoxType, slot::TextureSlot};

use log::trace;
use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DescriptorError {
    #[error("descriptor is not valid JSON")]
    Json(#[from] serde_json::Error),
    #[error("descriptor title is empty")]
    EmptyTitle,
    #[error("descriptor {field} is {value}; expected a positive finite number")]
    BadDimension { field: &'static str, value: f32 },
    #[error("unknown box type id {0}")]
    UnknownBoxType(u32),
}

// The raw wire shape. The catalog stores many more fields in info.json
// (publisher, links, IGDB ids, ...); only these drive model generation.
#[derive(Debug, Deserialize)]
struct RawDescriptor {
    title: String,
    width: f32,
    height: f32,
    depth: f32,
    box_type: u32,
    bbdb_version: Option<u32>,
}

#[derive(Debug, Clone)]
pub struct Descriptor {
    pub title: String,
    pub width: f32,
    pub height: f32,
    pub depth: f32,
    pub box_type: BoxType,
}

impl Descriptor {
    pub fn from_json(data: &[u8]) -> Result<Self, DescriptorError> {
        let raw: RawDescriptor = serde_json::from_slice(data)?;

        // Descriptors authored before the bbdb_version field carry
        // zero-indexed box type ids.
        let mut box_type_id = raw.box_type;
        if raw.bbdb_version.is_none() {
            box_type_id += 1;
            trace!("legacy descriptor: box_type normalized to {}", box_type_id);
        }

        let title = raw.title.trim().to_owned();
        if title.is_empty() {
            return Err(DescriptorError::EmptyTitle);
        }
        for (field, value) in [
            ("width", raw.width),
            ("height", raw.height),
            ("depth", raw.depth),
        ] {
            if !value.is_finite() || value <= 0. {
                return Err(DescriptorError::BadDimension { field, value });
            }
        }
        let box_type =
            BoxType::from_id(box_type_id).ok_or(DescriptorError::UnknownBoxType(box_type_id))?;

        Ok(Self {
            title,
            width: raw.width,
            height: raw.height,
            depth: raw.depth,
            box_type,
        })
    }

    /// Width of the box's +y edge. Equal to `width` for every rectangular
    /// prism; narrower for the Eidos trapezoid.
    pub fn top_width(&self) -> f32 {
        self.box_type.top_width().unwrap_or(self.width)
    }
}
