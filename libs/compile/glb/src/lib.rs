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

// Assemble mesh parts plus the KTX2 atlas into a single binary glTF
// container: magic/version/length header, a space-padded JSON chunk, then a
// zero-padded BIN chunk holding every vertex stream, every index stream and
// finally the KTX2 bytes.

pub mod document;

use crate::document::{
    Accessor, Asset, Attributes, Buffer, BufferView, Document, Image, Material, Mesh, Node,
    PbrMetallicRoughness, Primitive, Scene, Texture, TextureBasisu, TextureExtensions, TextureRef,
    COMPONENT_F32, COMPONENT_U16, EXT_TEXTURE_BASISU, GENERATOR, MIME_KTX2, TARGET_ARRAY_BUFFER,
    TARGET_ELEMENT_ARRAY_BUFFER,
};
use boxmesh::MeshPart;
use byteorder::{LittleEndian, WriteBytesExt};
use log::debug;
use std::{fs, io::Write, path::Path};
use thiserror::Error;

const MAGIC: &[u8; 4] = b"glTF";
const VERSION: u32 = 2;

#[derive(Debug, Error)]
pub enum GlbError {
    #[error("no mesh parts to write")]
    Empty,
    #[error("failed to serialize document")]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Lowercase, dashed, trimmed. Used for the material name.
pub fn slugify(title: &str) -> String {
    let mut out = String::with_capacity(title.len());
    for c in title.chars() {
        if c.is_ascii_alphanumeric() {
            out.push(c.to_ascii_lowercase());
        } else if !out.is_empty() && !out.ends_with('-') {
            out.push('-');
        }
    }
    while out.ends_with('-') {
        out.pop();
    }
    out
}

fn material_name(title: &str) -> String {
    let slug = slugify(title);
    if slug.is_empty() {
        "box-material".to_owned()
    } else {
        format!("{}-material", slug)
    }
}

fn position_bounds(positions: &[[f32; 3]]) -> ([f32; 3], [f32; 3]) {
    let mut min = positions[0];
    let mut max = positions[0];
    for p in positions {
        for axis in 0..3 {
            min[axis] = min[axis].min(p[axis]);
            max[axis] = max[axis].max(p[axis]);
        }
    }
    (min, max)
}

/// Serialize `parts` and the KTX2 atlas into a `.glb` at `out`.
pub fn write_glb(out: &Path, title: &str, parts: &[MeshPart], ktx2: &[u8]) -> Result<(), GlbError> {
    if parts.is_empty() {
        return Err(GlbError::Empty);
    }

    let mut bin: Vec<u8> = Vec::new();
    let mut views = Vec::new();
    let mut accessors = Vec::new();
    let mut nodes = Vec::new();
    let mut meshes = Vec::new();

    for (mesh_index, part) in parts.iter().enumerate() {
        let first_accessor = accessors.len();

        let offset = bin.len();
        for p in &part.positions {
            for c in p {
                bin.write_f32::<LittleEndian>(*c)?;
            }
        }
        views.push(BufferView {
            buffer: 0,
            byte_offset: offset,
            byte_length: bin.len() - offset,
            target: Some(TARGET_ARRAY_BUFFER),
        });
        let (min, max) = position_bounds(&part.positions);
        accessors.push(Accessor {
            buffer_view: views.len() - 1,
            component_type: COMPONENT_F32,
            count: part.positions.len(),
            element_type: "VEC3",
            min: Some(min),
            max: Some(max),
        });

        let offset = bin.len();
        for n in &part.normals {
            for c in n {
                bin.write_f32::<LittleEndian>(*c)?;
            }
        }
        views.push(BufferView {
            buffer: 0,
            byte_offset: offset,
            byte_length: bin.len() - offset,
            target: Some(TARGET_ARRAY_BUFFER),
        });
        accessors.push(Accessor {
            buffer_view: views.len() - 1,
            component_type: COMPONENT_F32,
            count: part.normals.len(),
            element_type: "VEC3",
            min: None,
            max: None,
        });

        let offset = bin.len();
        for uv in &part.uvs {
            for c in uv {
                bin.write_f32::<LittleEndian>(*c)?;
            }
        }
        views.push(BufferView {
            buffer: 0,
            byte_offset: offset,
            byte_length: bin.len() - offset,
            target: Some(TARGET_ARRAY_BUFFER),
        });
        accessors.push(Accessor {
            buffer_view: views.len() - 1,
            component_type: COMPONENT_F32,
            count: part.uvs.len(),
            element_type: "VEC2",
            min: None,
            max: None,
        });

        let offset = bin.len();
        for i in &part.indices {
            bin.write_u16::<LittleEndian>(*i)?;
        }
        views.push(BufferView {
            buffer: 0,
            byte_offset: offset,
            byte_length: bin.len() - offset,
            target: Some(TARGET_ELEMENT_ARRAY_BUFFER),
        });
        accessors.push(Accessor {
            buffer_view: views.len() - 1,
            component_type: COMPONENT_U16,
            count: part.indices.len(),
            element_type: "SCALAR",
            min: None,
            max: None,
        });

        nodes.push(Node {
            name: part.name.clone(),
            mesh: mesh_index,
        });
        meshes.push(Mesh {
            name: part.name.clone(),
            primitives: vec![Primitive {
                attributes: Attributes {
                    position: first_accessor,
                    normal: first_accessor + 1,
                    texcoord_0: first_accessor + 2,
                },
                indices: first_accessor + 3,
                material: 0,
            }],
        });
    }

    let image_view = views.len();
    let offset = bin.len();
    bin.extend_from_slice(ktx2);
    views.push(BufferView {
        buffer: 0,
        byte_offset: offset,
        byte_length: ktx2.len(),
        target: None,
    });

    let document = Document {
        asset: Asset {
            version: "2.0",
            generator: GENERATOR,
        },
        extensions_used: vec![EXT_TEXTURE_BASISU],
        scene: 0,
        scenes: vec![Scene {
            nodes: (0..nodes.len()).collect(),
        }],
        nodes,
        meshes,
        materials: vec![Material {
            name: material_name(title),
            pbr_metallic_roughness: PbrMetallicRoughness {
                base_color_texture: TextureRef { index: 0 },
                metallic_factor: 0.,
                roughness_factor: 1.,
            },
        }],
        textures: vec![Texture {
            extensions: TextureExtensions {
                texture_basisu: TextureBasisu { source: 0 },
            },
        }],
        images: vec![Image {
            mime_type: MIME_KTX2,
            buffer_view: image_view,
        }],
        accessors,
        buffer_views: views,
        buffers: vec![Buffer {
            byte_length: bin.len(),
        }],
    };

    let mut json = serde_json::to_vec(&document)?;
    while json.len() % 4 != 0 {
        json.push(b' ');
    }
    while bin.len() % 4 != 0 {
        bin.push(0);
    }

    let total = 12 + 8 + json.len() + 8 + bin.len();
    let mut file = fs::File::create(out)?;
    file.write_all(MAGIC)?;
    file.write_u32::<LittleEndian>(VERSION)?;
    file.write_u32::<LittleEndian>(total as u32)?;
    file.write_u32::<LittleEndian>(json.len() as u32)?;
    file.write_all(b"JSON")?;
    file.write_all(&json)?;
    file.write_u32::<LittleEndian>(bin.len() as u32)?;
    file.write_all(b"BIN\0")?;
    file.write_all(&bin)?;
    file.flush()?;
    debug!("wrote {} ({} bytes)", out.display(), total);
    Ok(())
}
