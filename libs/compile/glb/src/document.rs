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

// The slice of the glTF 2.0 document model this generator emits, typed so
// the JSON chunk is serialized in one shot instead of assembled from maps.

use serde::Serialize;

pub const GENERATOR: &str = "BigBoxDB glTF Generator";
pub const MIME_KTX2: &str = "image/ktx2";
pub const EXT_TEXTURE_BASISU: &str = "KHR_texture_basisu";

pub const COMPONENT_F32: u32 = 5126;
pub const COMPONENT_U16: u32 = 5123;
pub const TARGET_ARRAY_BUFFER: u32 = 34962;
pub const TARGET_ELEMENT_ARRAY_BUFFER: u32 = 34963;

#[derive(Debug, Serialize)]
pub struct Document {
    pub asset: Asset,
    #[serde(rename = "extensionsUsed")]
    pub extensions_used: Vec<&'static str>,
    pub scene: usize,
    pub scenes: Vec<Scene>,
    pub nodes: Vec<Node>,
    pub meshes: Vec<Mesh>,
    pub materials: Vec<Material>,
    pub textures: Vec<Texture>,
    pub images: Vec<Image>,
    pub accessors: Vec<Accessor>,
    #[serde(rename = "bufferViews")]
    pub buffer_views: Vec<BufferView>,
    pub buffers: Vec<Buffer>,
}

#[derive(Debug, Serialize)]
pub struct Asset {
    pub version: &'static str,
    pub generator: &'static str,
}

#[derive(Debug, Serialize)]
pub struct Scene {
    pub nodes: Vec<usize>,
}

#[derive(Debug, Serialize)]
pub struct Node {
    pub name: String,
    pub mesh: usize,
}

#[derive(Debug, Serialize)]
pub struct Mesh {
    pub name: String,
    pub primitives: Vec<Primitive>,
}

#[derive(Debug, Serialize)]
pub struct Primitive {
    pub attributes: Attributes,
    pub indices: usize,
    pub material: usize,
}

#[derive(Debug, Serialize)]
pub struct Attributes {
    #[serde(rename = "POSITION")]
    pub position: usize,
    #[serde(rename = "NORMAL")]
    pub normal: usize,
    #[serde(rename = "TEXCOORD_0")]
    pub texcoord_0: usize,
}

#[derive(Debug, Serialize)]
pub struct Material {
    pub name: String,
    #[serde(rename = "pbrMetallicRoughness")]
    pub pbr_metallic_roughness: PbrMetallicRoughness,
}

#[derive(Debug, Serialize)]
pub struct PbrMetallicRoughness {
    #[serde(rename = "baseColorTexture")]
    pub base_color_texture: TextureRef,
    #[serde(rename = "metallicFactor")]
    pub metallic_factor: f32,
    #[serde(rename = "roughnessFactor")]
    pub roughness_factor: f32,
}

#[derive(Debug, Serialize)]
pub struct TextureRef {
    pub index: usize,
}

// The image source rides behind KHR_texture_basisu; a top-level source
// would point conformant loaders at a png/jpeg that does not exist.
#[derive(Debug, Serialize)]
pub struct Texture {
    pub extensions: TextureExtensions,
}

#[derive(Debug, Serialize)]
pub struct TextureExtensions {
    #[serde(rename = "KHR_texture_basisu")]
    pub texture_basisu: TextureBasisu,
}

#[derive(Debug, Serialize)]
pub struct TextureBasisu {
    pub source: usize,
}

#[derive(Debug, Serialize)]
pub struct Image {
    #[serde(rename = "mimeType")]
    pub mime_type: &'static str,
    #[serde(rename = "bufferView")]
    pub buffer_view: usize,
}

#[derive(Debug, Serialize)]
pub struct Accessor {
    #[serde(rename = "bufferView")]
    pub buffer_view: usize,
    #[serde(rename = "componentType")]
    pub component_type: u32,
    pub count: usize,
    #[serde(rename = "type")]
    pub element_type: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min: Option<[f32; 3]>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max: Option<[f32; 3]>,
}

#[derive(Debug, Serialize)]
pub struct BufferView {
    pub buffer: usize,
    #[serde(rename = "byteOffset")]
    pub byte_offset: usize,
    #[serde(rename = "byteLength")]
    pub byte_length: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target: Option<u32>,
}

#[derive(Debug, Serialize)]
pub struct Buffer {
    #[serde(rename = "byteLength")]
    pub byte_length: usize,
}
